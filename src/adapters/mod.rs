// Adapters layer: concrete implementations for external systems (order store over HTTP).

pub mod http_store;

pub use http_store::HttpOrderStore;
