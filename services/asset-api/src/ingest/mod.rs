//! Pipeline de ingestão de planilhas do módulo IAF
//!
//! Decodificação da planilha, normalização de datas, mapeamento de
//! colunas e reconciliação transacional contra o inventário.

pub mod dates;
pub mod reconcile;
pub mod schema;
pub mod spreadsheet;

pub use reconcile::{IngestOptions, IngestStats, IngestUnitOfWork, ingest_rows};
pub use spreadsheet::{SheetRow, parse_workbook};
