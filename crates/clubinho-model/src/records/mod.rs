//! Typed records for the platform's managed resources.
//!
//! Field sets mirror what the API returns today; unknown fields are
//! ignored on deserialization so the backend can grow without breaking
//! clients. Every record implements [`ResourceRow`](crate::ResourceRow) so
//! it can flow through the generic list controller.

mod club;
pub use club::Club;

mod coordinator;
pub use coordinator::{Coordinator, CoordinatorFilters};

mod teacher;
pub use teacher::Teacher;

mod sheltered;
pub use sheltered::{Sheltered, ShelteredFilters};

mod pagela;
pub use pagela::{Pagela, PagelaFilters};

mod content;
pub use content::{Document, IdeasSection, ImagePage, Meditation, WeekMaterial};
