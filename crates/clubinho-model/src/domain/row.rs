use crate::EntityId;

/// Contract the controller needs from a row: identity, nothing else.
///
/// Row fields belong to the backend. The controller only compares ids when
/// splicing a refreshed row back into place or dropping a vanished one.
pub trait ResourceRow: Clone + Send + Sync + 'static {
    fn id(&self) -> &EntityId;
}
