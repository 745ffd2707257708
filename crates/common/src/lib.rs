//! sfera-common - tipos e utilitários compartilhados

pub mod types;
pub mod utils;

pub use types::*;
