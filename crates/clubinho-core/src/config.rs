use std::time::Duration;

use clubinho_model::{DEFAULT_PAGE_SIZE, resources::ResourceConfig};

/// Quiet window applied to debounced filter edits.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);
/// Capacity of the controller's event broadcast channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Tuning for one controller instance.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// The backend collection this controller drives.
    pub resource: ResourceConfig,
    /// Rows per page at construction.
    pub page_size: u32,
    pub debounce_window: Duration,
    pub event_capacity: usize,
}

impl ControllerConfig {
    pub fn new(resource: ResourceConfig) -> Self {
        Self {
            resource,
            page_size: DEFAULT_PAGE_SIZE,
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_debounce_window(mut self, window: Duration) -> Self {
        self.debounce_window = window;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clubinho_model::resources;

    #[test]
    fn defaults_follow_the_manager_grids() {
        let cfg = ControllerConfig::new(resources::coordinators());
        assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(cfg.debounce_window, DEFAULT_DEBOUNCE_WINDOW);
        assert_eq!(cfg.event_capacity, DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn builders_override_fields() {
        let cfg = ControllerConfig::new(resources::clubs())
            .with_page_size(50)
            .with_debounce_window(Duration::from_millis(25))
            .with_event_capacity(8);
        assert_eq!(cfg.page_size, 50);
        assert_eq!(cfg.debounce_window, Duration::from_millis(25));
        assert_eq!(cfg.event_capacity, 8);
    }
}
