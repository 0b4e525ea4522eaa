//! REST adapter for the Clubinho platform API.
//!
//! Implements [`clubinho_core::ResourceGateway`] on top of `reqwest`:
//! renders the 1-based `page`/`limit`/`sort`/`order` query parameters,
//! normalizes the two list body shapes the backend serves, extracts
//! `{"message"}` error envelopes and routes relationship verbs to
//! `PATCH /{resource}/{id}/{verb}`.

pub mod client;
pub mod params;
pub mod shape;

pub use client::{RestClient, RestGateway};
pub use params::list_query_pairs;
pub use shape::{ListBody, ListMeta};
