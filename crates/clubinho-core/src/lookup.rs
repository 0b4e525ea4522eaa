//! Club lookup for the "assign to club by number" dialog.
//!
//! Coordinators, teachers and sheltered children are linked to clubs by
//! the club's human-facing number, but the backend wants the club id.
//! The dialog resolves the typed number against a [`ClubIndex`] derived
//! from a clubs listing; an unknown number fails locally before anything
//! reaches the wire.

use std::collections::HashMap;

use clubinho_model::records::Club;
use clubinho_model::{EntityId, FilterSet, MutationOutcome, ResourceRow, resources::verbs};

use crate::{controller::ListController, error::CoreError, state::ListSnapshot};

/// Version-memoized `club number -> club id` map.
///
/// Pure data derived from a clubs controller's snapshot; re-`sync` it
/// whenever that listing changes. Syncing the same snapshot version twice
/// is a no-op.
#[derive(Debug, Default)]
pub struct ClubIndex {
    version: Option<u64>,
    by_number: HashMap<u32, EntityId>,
}

impl ClubIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a clubs snapshot. Returns false when this snapshot
    /// version was already absorbed.
    pub fn sync(&mut self, snapshot: &ListSnapshot<Club>) -> bool {
        if self.version == Some(snapshot.version) {
            return false;
        }
        self.version = Some(snapshot.version);
        self.by_number = snapshot
            .rows
            .iter()
            .map(|club| (club.number, club.id.clone()))
            .collect();
        true
    }

    pub fn resolve(&self, number: u32) -> Option<&EntityId> {
        self.by_number.get(&number)
    }

    /// Resolve the dialog's free-text club number.
    pub fn resolve_text(&self, text: &str) -> Result<EntityId, CoreError> {
        let number: u32 = text
            .trim()
            .parse()
            .map_err(|_| CoreError::InvalidClubNumber(text.trim().to_string()))?;
        self.resolve(number)
            .cloned()
            .ok_or(CoreError::UnknownClubNumber(number))
    }

    pub fn len(&self) -> usize {
        self.by_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }
}

/// Resolve `number_text` and assign the record to that club.
///
/// A malformed or unknown number fails locally: no gateway call is made
/// and the dialog state is left untouched. On success this is a plain
/// [`ListController::relate`] with the `assign-club` verb.
pub async fn assign_club_by_number<R, F>(
    controller: &ListController<R, F>,
    index: &ClubIndex,
    id: &EntityId,
    number_text: &str,
) -> Result<MutationOutcome, CoreError>
where
    R: ResourceRow,
    F: FilterSet,
{
    let club_id = index.resolve_text(number_text)?;
    controller
        .relate(id, verbs::ASSIGN_CLUB, serde_json::json!({ "clubId": club_id }))
        .await
}
