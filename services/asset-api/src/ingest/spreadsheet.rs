//! Decodificação de planilhas
//!
//! Apenas a primeira aba é considerada; a primeira linha é o cabeçalho
//! e cada linha seguinte vira um mapeamento coluna → célula.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};

use crate::error::IngestError;

/// Linha da planilha indexada pelo texto do cabeçalho
#[derive(Debug, Clone, Default)]
pub struct SheetRow {
    cells: HashMap<String, Data>,
}

impl SheetRow {
    pub fn from_cells(cells: impl IntoIterator<Item = (String, Data)>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    /// Primeira célula não vazia entre os aliases de cabeçalho
    pub fn raw(&self, aliases: &[&str]) -> Option<&Data> {
        aliases
            .iter()
            .filter_map(|alias| self.cells.get(*alias))
            .find(|cell| !matches!(cell, Data::Empty))
    }

    /// Valor textual da célula, com espaços aparados
    pub fn text(&self, aliases: &[&str]) -> Option<String> {
        let value = match self.raw(aliases)? {
            Data::String(s) => s.trim().to_string(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => format_float(*f),
            Data::Bool(b) => b.to_string(),
            _ => return None,
        };

        if value.is_empty() { None } else { Some(value) }
    }

    /// Valor inteiro da célula; texto segue a regra do `parseInt`
    /// (prefixo numérico de "5 anos" vale 5)
    pub fn integer(&self, aliases: &[&str]) -> Option<i32> {
        match self.raw(aliases)? {
            Data::Int(i) => i32::try_from(*i).ok(),
            Data::Float(f) => Some(*f as i32),
            Data::String(s) => leading_int(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

fn leading_int(s: &str) -> Option<i32> {
    let trimmed = s.trim();
    let digits: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Decodifica o buffer da planilha em linhas indexadas pelo cabeçalho
pub fn parse_workbook(bytes: &[u8]) -> Result<Vec<SheetRow>, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| IngestError::Parse(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestError::Parse("planilha sem abas".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestError::Parse(e.to_string()))?;

    let rows = rows_from_range(&range);
    if rows.is_empty() {
        return Err(IngestError::EmptyFile);
    }

    Ok(rows)
}

/// Converte o intervalo da primeira aba em linhas indexadas
///
/// Linhas totalmente vazias são descartadas, como no importador antigo.
pub fn rows_from_range(range: &Range<Data>) -> Vec<SheetRow> {
    let mut rows_iter = range.rows();

    let headers: Vec<Option<String>> = match rows_iter.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| match cell {
                Data::String(s) => {
                    let trimmed = s.trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                }
                Data::Empty => None,
                other => Some(other.to_string()),
            })
            .collect(),
        None => return Vec::new(),
    };

    let mut rows = Vec::new();
    for data_row in rows_iter {
        let mut cells = Vec::new();
        for (header, cell) in headers.iter().zip(data_row.iter()) {
            if let Some(header) = header {
                if !matches!(cell, Data::Empty) {
                    cells.push((header.clone(), cell.clone()));
                }
            }
        }

        let row = SheetRow::from_cells(cells);
        if !row.is_empty() {
            rows.push(row);
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_range() -> Range<Data> {
        let mut range = Range::new((0, 0), (3, 2));
        range.set_value((0, 0), Data::String("Cód. Loja".to_string()));
        range.set_value((0, 1), Data::String("Computador".to_string()));
        range.set_value((0, 2), Data::String("Memória".to_string()));

        range.set_value((1, 0), Data::String("L001".to_string()));
        range.set_value((1, 1), Data::String("PDV-01".to_string()));
        range.set_value((1, 2), Data::String("8GB".to_string()));

        // linha em branco, deve ser descartada

        range.set_value((3, 0), Data::Float(102.0));
        range.set_value((3, 1), Data::String("PDV-02".to_string()));
        range
    }

    #[test]
    fn test_rows_from_range_keys_by_header() {
        let rows = rows_from_range(&sample_range());
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].text(&["Cód. Loja"]), Some("L001".to_string()));
        assert_eq!(rows[0].text(&["Computador"]), Some("PDV-01".to_string()));
        assert_eq!(rows[0].text(&["Memória", "Memoria"]), Some("8GB".to_string()));
    }

    #[test]
    fn test_numeric_store_code_becomes_text() {
        let rows = rows_from_range(&sample_range());
        assert_eq!(rows[1].text(&["Cód. Loja"]), Some("102".to_string()));
        assert_eq!(rows[1].text(&["Memória", "Memoria"]), None);
    }

    #[test]
    fn test_alias_fallback() {
        let row = SheetRow::from_cells([(
            "Cod Loja".to_string(),
            Data::String("L009".to_string()),
        )]);
        assert_eq!(
            row.text(&["Cód. Loja", "Cod Loja", "Loja"]),
            Some("L009".to_string())
        );
    }

    #[test]
    fn test_integer_parses_leading_digits() {
        let row = SheetRow::from_cells([
            ("Tempo de Uso (Ano)".to_string(), Data::String("5 anos".to_string())),
            ("Outro".to_string(), Data::Float(3.0)),
        ]);
        assert_eq!(row.integer(&["Tempo de Uso (Ano)"]), Some(5));
        assert_eq!(row.integer(&["Outro"]), Some(3));
        assert_eq!(row.integer(&["Inexistente"]), None);
    }

    #[test]
    fn test_parse_workbook_rejects_garbage() {
        let err = parse_workbook(b"isto nao e uma planilha").unwrap_err();
        assert!(matches!(err, IngestError::Parse(_)));
    }
}
