mod logger;
pub use logger::*;

mod view;
pub use view::*;
