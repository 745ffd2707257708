//! Camada HTTP: rotas, middleware e handlers

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::{AppState, build_router};
