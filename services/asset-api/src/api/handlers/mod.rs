//! Handlers HTTP

pub mod health;
pub mod iaf;
pub mod lojas;
