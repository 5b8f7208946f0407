//! HTTP transport for the gateway

mod server;

pub use server::{
    catalog_reload_handler, health_check, query_handler, AppState, QueryRequest, QueryResponse,
};
