use std::sync::{Arc, RwLock};

use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use clubinho_model::EntityId;
use clubinho_model::records::{Club, Coordinator};

use crate::{ApiError, ListParams};

/// In-memory dataset behind the demo API.
#[derive(Clone)]
pub struct Store {
    inner: Arc<RwLock<Inner>>,
}

struct Inner {
    coordinators: Vec<Coordinator>,
    clubs: Vec<Club>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                coordinators: Vec::new(),
                clubs: Vec::new(),
            })),
        }
    }

    /// A dataset big enough to page through: 12 clubs, 30 coordinators.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.write().unwrap();
            for number in 1..=12 {
                inner.clubs.push(Club {
                    id: new_id(),
                    number,
                    weekday: if number % 2 == 0 { "sunday" } else { "saturday" }.to_string(),
                });
            }
            for n in 1..=30 {
                inner.coordinators.push(Coordinator {
                    id: new_id(),
                    name: format!("Coordenador {n:02}"),
                    email: Some(format!("coordenador{n:02}@nib.org")),
                    active: n % 4 != 0,
                    club_id: None,
                    updated_at: Some(now()),
                });
            }
        }
        store
    }

    pub fn list_coordinators(&self, params: &ListParams) -> (Vec<Coordinator>, usize) {
        let inner = self.inner.read().unwrap();
        let mut rows: Vec<Coordinator> = inner
            .coordinators
            .iter()
            .filter(|c| match params.q.as_deref().map(str::trim) {
                Some(q) => c.name.to_lowercase().contains(&q.to_lowercase()),
                None => true,
            })
            .filter(|c| params.active.is_none_or(|active| c.active == active))
            .cloned()
            .collect();

        if let Some(field) = params.sort.as_deref() {
            match field {
                "name" => rows.sort_by(|a, b| a.name.cmp(&b.name)),
                "email" => rows.sort_by(|a, b| a.email.cmp(&b.email)),
                "updatedAt" => rows.sort_by(|a, b| a.updated_at.cmp(&b.updated_at)),
                _ => {}
            }
            if params.descending() {
                rows.reverse();
            }
        }

        let total = rows.len();
        (paginate(rows, params), total)
    }

    pub fn coordinator(&self, id: &EntityId) -> Result<Coordinator, ApiError> {
        self.inner
            .read()
            .unwrap()
            .coordinators
            .iter()
            .find(|c| &c.id == id)
            .cloned()
            .ok_or(ApiError::NotFound("Coordenador"))
    }

    pub fn create_coordinator(
        &self,
        name: String,
        email: Option<String>,
    ) -> Result<Coordinator, ApiError> {
        let mut inner = self.inner.write().unwrap();
        if let Some(email) = &email
            && inner
                .coordinators
                .iter()
                .any(|c| c.email.as_deref() == Some(email))
        {
            return Err(ApiError::DuplicateEmail);
        }

        let created = Coordinator {
            id: new_id(),
            name,
            email,
            active: true,
            club_id: None,
            updated_at: Some(now()),
        };
        inner.coordinators.insert(0, created.clone());
        Ok(created)
    }

    pub fn update_coordinator(&self, id: &EntityId, patch: &Value) -> Result<Coordinator, ApiError> {
        let mut inner = self.inner.write().unwrap();
        let row = inner
            .coordinators
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or(ApiError::NotFound("Coordenador"))?;

        if let Some(name) = patch.get("name").and_then(Value::as_str) {
            row.name = name.to_string();
        }
        if let Some(email) = patch.get("email").and_then(Value::as_str) {
            row.email = Some(email.to_string());
        }
        if let Some(active) = patch.get("active").and_then(Value::as_bool) {
            row.active = active;
        }
        row.updated_at = Some(now());
        Ok(row.clone())
    }

    pub fn delete_coordinator(&self, id: &EntityId) -> Result<(), ApiError> {
        let mut inner = self.inner.write().unwrap();
        let before = inner.coordinators.len();
        inner.coordinators.retain(|c| &c.id != id);
        if inner.coordinators.len() == before {
            return Err(ApiError::NotFound("Coordenador"));
        }
        Ok(())
    }

    /// Link a coordinator to a club; answers with the club's number for
    /// the confirmation message.
    pub fn assign_club(&self, id: &EntityId, club_id: &EntityId) -> Result<u32, ApiError> {
        let mut inner = self.inner.write().unwrap();
        let number = inner
            .clubs
            .iter()
            .find(|c| &c.id == club_id)
            .map(|c| c.number)
            .ok_or(ApiError::NotFound("Clube"))?;

        let row = inner
            .coordinators
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or(ApiError::NotFound("Coordenador"))?;
        row.club_id = Some(club_id.clone());
        row.updated_at = Some(now());
        Ok(number)
    }

    pub fn unassign_club(&self, id: &EntityId) -> Result<(), ApiError> {
        let mut inner = self.inner.write().unwrap();
        let row = inner
            .coordinators
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or(ApiError::NotFound("Coordenador"))?;
        row.club_id = None;
        row.updated_at = Some(now());
        Ok(())
    }

    pub fn list_clubs(&self, params: &ListParams) -> (Vec<Club>, usize) {
        let inner = self.inner.read().unwrap();
        let mut rows = inner.clubs.clone();

        if let Some(field) = params.sort.as_deref() {
            match field {
                "number" => rows.sort_by_key(|c| c.number),
                "weekday" => rows.sort_by(|a, b| a.weekday.cmp(&b.weekday)),
                _ => {}
            }
            if params.descending() {
                rows.reverse();
            }
        }

        let total = rows.len();
        (paginate(rows, params), total)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

fn paginate<T>(rows: Vec<T>, params: &ListParams) -> Vec<T> {
    let limit = params.limit();
    let page = params.page();
    rows.into_iter()
        .skip((page - 1) * limit)
        .take(limit)
        .collect()
}

fn new_id() -> EntityId {
    EntityId::from(Uuid::new_v4().to_string())
}

fn now() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
