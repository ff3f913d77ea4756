// Adapters layer: concrete clients for external systems (relational db, document store, http).

pub mod document;
pub mod http;
pub mod relational;
