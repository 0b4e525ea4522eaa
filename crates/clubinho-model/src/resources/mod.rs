//! Per-resource wiring: endpoint paths, sortable fields, update method and
//! the relationship verbs the backend understands.

use crate::SortSpec;

/// Static description of one backend collection.
///
/// An instance is handed to the controller factory and to the REST gateway;
/// everything here mirrors what the backend exposes for that resource.
#[derive(Debug, Clone)]
pub struct ResourceConfig {
    path: &'static str,
    sortable: &'static [&'static str],
    default_sort: Option<SortSpec>,
    update_via_put: bool,
}

impl ResourceConfig {
    pub fn new(path: &'static str) -> Self {
        Self {
            path,
            sortable: &[],
            default_sort: None,
            update_via_put: false,
        }
    }

    pub fn with_sortable(mut self, fields: &'static [&'static str]) -> Self {
        self.sortable = fields;
        self
    }

    pub fn with_default_sort(mut self, sort: SortSpec) -> Self {
        self.default_sort = Some(sort);
        self
    }

    /// Resources whose backend expects full-record `PUT` updates instead of
    /// partial `PATCH` ones.
    pub fn with_put_updates(mut self) -> Self {
        self.update_via_put = true;
        self
    }

    /// Collection path segment, e.g. `coordinators`.
    pub fn path(&self) -> &'static str {
        self.path
    }

    pub fn sortable(&self) -> &'static [&'static str] {
        self.sortable
    }

    pub fn default_sort(&self) -> Option<&SortSpec> {
        self.default_sort.as_ref()
    }

    pub fn updates_via_put(&self) -> bool {
        self.update_via_put
    }

    pub fn allows_sort(&self, field: &str) -> bool {
        self.sortable.contains(&field)
    }
}

/// Relationship verbs the platform API exposes as
/// `PATCH /{resource}/{id}/{verb}`.
pub mod verbs {
    /// Link a coordinator or teacher to a club.
    pub const ASSIGN_CLUB: &str = "assign-club";
    /// Detach a coordinator or teacher from their club.
    pub const UNASSIGN_CLUB: &str = "unassign-club";
    /// Move a sheltered child to another club.
    pub const MOVE_CLUB: &str = "move-club";
    /// Detach a sheltered child from their shelter.
    pub const UNASSIGN_SHELTER: &str = "unassign-shelter";
}

pub fn coordinators() -> ResourceConfig {
    ResourceConfig::new("coordinators")
        .with_sortable(&["name", "email", "updatedAt"])
        .with_default_sort(SortSpec::desc("updatedAt"))
}

pub fn teachers() -> ResourceConfig {
    ResourceConfig::new("teachers")
        .with_sortable(&["name", "email", "updatedAt"])
        .with_default_sort(SortSpec::desc("updatedAt"))
}

pub fn sheltered() -> ResourceConfig {
    ResourceConfig::new("sheltered")
        .with_sortable(&["name", "birthDate", "updatedAt"])
        .with_default_sort(SortSpec::asc("name"))
}

pub fn clubs() -> ResourceConfig {
    ResourceConfig::new("clubs").with_sortable(&["number", "weekday"])
}

pub fn pagelas() -> ResourceConfig {
    ResourceConfig::new("pagelas").with_sortable(&["year", "week"])
}

pub fn documents() -> ResourceConfig {
    ResourceConfig::new("documents")
        .with_sortable(&["title", "updatedAt"])
        .with_default_sort(SortSpec::desc("updatedAt"))
}

pub fn meditations() -> ResourceConfig {
    ResourceConfig::new("meditations")
        .with_sortable(&["topic", "startDate"])
        .with_default_sort(SortSpec::desc("startDate"))
}

pub fn week_materials() -> ResourceConfig {
    ResourceConfig::new("week-materials")
        .with_sortable(&["title", "updatedAt"])
        .with_default_sort(SortSpec::desc("updatedAt"))
}

pub fn ideas_sections() -> ResourceConfig {
    ResourceConfig::new("ideas-sections")
        .with_sortable(&["title", "updatedAt"])
        .with_default_sort(SortSpec::desc("updatedAt"))
}

pub fn image_pages() -> ResourceConfig {
    ResourceConfig::new("image-pages")
        .with_sortable(&["title", "updatedAt"])
        .with_default_sort(SortSpec::desc("updatedAt"))
}
