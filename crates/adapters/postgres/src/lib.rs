//! sfera-adapter-postgres - adaptador PostgreSQL

mod connection;
mod migration;
mod transaction;

pub use connection::*;
pub use migration::*;
pub use transaction::*;
