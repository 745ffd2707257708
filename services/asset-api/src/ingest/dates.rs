//! Normalização de datas vindas da planilha
//!
//! As datas chegam como texto `DD/MM/YYYY` ou como número serial do
//! Excel (sistema de datas com origem em 1899-12-30).

use calamine::Data;
use chrono::{DateTime, NaiveDate};
use tracing::warn;

/// Dias entre a origem do serial do Excel e a época Unix
pub const EXCEL_EPOCH_OFFSET_DAYS: f64 = 25569.0;

/// Canonicaliza uma célula de data para `YYYY-MM-DD`
///
/// Regra de compatibilidade com o importador antigo: texto fora do
/// formato de três partes vira None; as partes não são validadas
/// quanto ao intervalo de dia/mês.
pub fn normalize_cell_date(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let parts: Vec<&str> = s.trim().split('/').collect();
            if parts.len() != 3 {
                return None;
            }
            Some(format!("{}-{:0>2}-{:0>2}", parts[2], parts[1], parts[0]))
        }
        Data::Int(i) => serial_to_iso(*i as f64),
        Data::Float(f) => serial_to_iso(*f),
        Data::DateTime(dt) => serial_to_iso(dt.as_f64()),
        _ => None,
    }
}

/// Converte o serial do Excel em `YYYY-MM-DD`, truncando a hora
fn serial_to_iso(serial: f64) -> Option<String> {
    let seconds = (serial - EXCEL_EPOCH_OFFSET_DAYS) * 86400.0;
    let datetime = DateTime::from_timestamp(seconds as i64, 0)?;
    Some(datetime.date_naive().format("%Y-%m-%d").to_string())
}

/// Data de término de garantia pronta para a coluna DATE
///
/// Mantém a canonicalização acima, mas componentes fora do intervalo
/// viram um aviso de qualidade de dados e um campo nulo, em vez de um
/// literal malformado no banco.
pub fn parse_warranty_date(cell: &Data) -> Option<NaiveDate> {
    let canonical = normalize_cell_date(cell)?;

    match NaiveDate::parse_from_str(&canonical, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(valor = %canonical, "Data de garantia fora do intervalo, ignorando");
            None
        }
    }
}
