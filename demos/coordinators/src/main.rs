use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{error, info};

use backend::Store;
use clubinho_core::{
    ClubIndex, ControllerConfig, CreateBody, ListController, assign_club_by_number,
};
use clubinho_model::records::{Club, Coordinator, CoordinatorFilters};
use clubinho_model::{NoFilters, resources};
use clubinho_observe::{LoggerConfig, log_events, logger_init};
use clubinho_prometheus::{Encoder, PrometheusMetrics, TextEncoder};
use clubinho_rest::RestClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger
    logger_init(&LoggerConfig::default())?;
    info!("logger initialized");

    // 2) In-process backend on an ephemeral port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    let app = backend::router(Store::seeded());
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("backend stopped: {e}");
        }
    });
    info!("demo backend at {base_url}");

    // 3) REST client + metrics backend
    let client = RestClient::new(&base_url).with_bearer("demo-token");
    let metrics = PrometheusMetrics::new()?;

    // 4) Clubs listing feeds the number -> id index
    let clubs: ListController<Club, NoFilters> = ListController::new(
        ControllerConfig::new(resources::clubs()).with_page_size(50),
        Arc::new(client.gateway::<Club>(resources::clubs())),
    );
    clubs.refresh().await?;
    let mut index = ClubIndex::new();
    index.sync(&clubs.snapshot());
    info!(clubs = index.len(), "club index ready");

    // 5) Coordinators controller, events drained into the log
    let controller: ListController<Coordinator, CoordinatorFilters> =
        ListController::with_metrics(
            ControllerConfig::new(resources::coordinators()),
            Arc::new(client.gateway::<Coordinator>(resources::coordinators())),
            Arc::new(metrics.clone()),
        );
    tokio::spawn(log_events(controller.subscribe()));

    // 6) First page
    controller.refresh().await?;
    let snapshot = controller.snapshot();
    info!(
        rows = snapshot.rows.len(),
        total = snapshot.total,
        "first page loaded"
    );

    // 7) Debounced search: the typing burst collapses into one request
    for text in ["0", "05"] {
        controller.set_filters_debounced(CoordinatorFilters::search(text));
        tokio::time::sleep(Duration::from_millis(40)).await;
    }
    tokio::time::sleep(Duration::from_millis(400)).await;
    info!(
        rows = controller.snapshot().rows.len(),
        "search for \"05\" settled"
    );

    // 8) Back to the full list, then create
    controller.set_filters(CoordinatorFilters::default()).await?;
    let outcome = controller
        .create(CreateBody::json(json!({
            "name": "Marina Lopes",
            "email": "marina@nib.org",
        })))
        .await?;
    info!(
        message = outcome.message.as_deref().unwrap_or("-"),
        "create settled"
    );

    // 9) Assign her to club 7 the way the dialog does: by typed number
    let marina = controller
        .snapshot()
        .rows
        .first()
        .map(|row| row.id.clone())
        .ok_or_else(|| anyhow::anyhow!("created row not on the first page"))?;
    let outcome = assign_club_by_number(&controller, &index, &marina, "7").await?;
    info!(
        message = outcome.message.as_deref().unwrap_or("-"),
        "assign settled"
    );

    // 10) A duplicate e-mail lands in the dialog, not the banner
    if let Err(err) = controller
        .create(CreateBody::json(json!({
            "name": "Marina Lopes",
            "email": "marina@nib.org",
        })))
        .await
    {
        info!(dialog_error = %err, "duplicate create rejected");
    }

    // 11) Metrics dump
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metrics.gather(), &mut buffer)?;
    print!("{}", String::from_utf8(buffer)?);

    // 12) Shutdown cancels pending debounces and in-flight fetches
    controller.shutdown();
    clubs.shutdown();
    info!("controllers shut down");

    Ok(())
}
