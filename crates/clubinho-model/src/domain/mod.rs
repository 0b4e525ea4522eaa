mod entity_id;
pub use entity_id::EntityId;

mod sort;
pub use sort::{InvalidSortDirection, SortDirection, SortSpec};

mod filter;
pub use filter::{FilterSet, NoFilters, SearchFilters};

mod query;
pub use query::{DEFAULT_PAGE_SIZE, ListRequest, MAX_PAGE_SIZE, QueryState};

mod page;
pub use page::{Page, page_count};

mod row;
pub use row::ResourceRow;

mod outcome;
pub use outcome::{MutationKind, MutationOutcome, RelationReceipt};
