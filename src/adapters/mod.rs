// Adapters layer: concrete implementations of the catalog port (HTTP API, in-memory fixture).

pub mod http;
pub mod memory;

pub use http::HttpCatalogApi;
pub use memory::{CatalogFixture, InMemoryCatalog};
