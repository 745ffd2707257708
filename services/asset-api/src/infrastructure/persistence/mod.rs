//! Persistência PostgreSQL do inventário

pub mod ingest_uow;
pub mod postgres;
pub mod rows;

pub use ingest_uow::PgIngestUnitOfWork;
pub use postgres::AssetRepository;
