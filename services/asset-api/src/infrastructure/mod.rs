//! Infraestrutura: persistência PostgreSQL e migrações

pub mod migrations;
pub mod persistence;
