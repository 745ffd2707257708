//! Mapeamento de colunas da planilha para registros tipados
//!
//! Os aliases de cabeçalho e os campos obrigatórios são declarados
//! aqui; a reconciliação só enxerga registros já tipados.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::TipoAtivo;
use crate::ingest::dates::parse_warranty_date;
use crate::ingest::spreadsheet::SheetRow;

// Aliases aceitos para cada coluna (variantes com e sem acento que já
// apareceram nos arquivos das lojas)
pub const COD_LOJA: &[&str] = &["Cód. Loja", "Cod Loja", "Loja"];
pub const LOCAL: &[&str] = &["Local"];
pub const COMPUTADOR: &[&str] = &["Computador"];
pub const MODELO: &[&str] = &["Modelo"];
pub const TAG: &[&str] = &["Tag"];
pub const MEMORIA: &[&str] = &["Memória", "Memoria"];
pub const TERMINO_GARANTIA: &[&str] = &["Término Garantia", "Termino Garantia"];
pub const TEMPO_USO_ANOS: &[&str] = &["Tempo de Uso (Ano)", "Tempo de Uso (Anos)"];
pub const CELULAR: &[&str] = &["Celular"];
pub const MODELO_DETALHADO: &[&str] = &["Modelo Detalhado"];
pub const STATUS: &[&str] = &["Status"];

/// Erro leve de linha: campo obrigatório ausente
///
/// Contabilizado e ignorado; nunca aborta o lote.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("campo obrigatório ausente: {campo}")]
pub struct RowError {
    pub campo: &'static str,
}

/// Linha tipada do inventário de computadores
#[derive(Debug, Clone, PartialEq)]
pub struct LinhaComputador {
    pub cod_loja: String,
    pub local: Option<String>,
    pub computador: String,
    pub modelo: Option<String>,
    pub tag: Option<String>,
    pub memoria: Option<String>,
    pub termino_garantia: Option<NaiveDate>,
    pub tempo_uso_anos: Option<i32>,
}

impl LinhaComputador {
    pub fn from_sheet_row(row: &SheetRow) -> Result<Self, RowError> {
        let cod_loja = row.text(COD_LOJA).ok_or(RowError { campo: "Cód. Loja" })?;
        let computador = row.text(COMPUTADOR).ok_or(RowError { campo: "Computador" })?;

        Ok(Self {
            cod_loja,
            local: row.text(LOCAL),
            computador,
            modelo: row.text(MODELO),
            tag: row.text(TAG),
            memoria: row.text(MEMORIA),
            termino_garantia: row.raw(TERMINO_GARANTIA).and_then(parse_warranty_date),
            tempo_uso_anos: row.integer(TEMPO_USO_ANOS),
        })
    }
}

/// Linha tipada do inventário de celulares
#[derive(Debug, Clone, PartialEq)]
pub struct LinhaCelular {
    pub cod_loja: String,
    pub local: Option<String>,
    pub celular: String,
    pub modelo: Option<String>,
    pub modelo_detalhado: Option<String>,
    pub termino_garantia: Option<NaiveDate>,
    pub status: String,
}

impl LinhaCelular {
    pub fn from_sheet_row(row: &SheetRow) -> Result<Self, RowError> {
        let cod_loja = row.text(COD_LOJA).ok_or(RowError { campo: "Cód. Loja" })?;
        let celular = row.text(CELULAR).ok_or(RowError { campo: "Celular" })?;

        Ok(Self {
            cod_loja,
            local: row.text(LOCAL),
            celular,
            modelo: row.text(MODELO),
            modelo_detalhado: row.text(MODELO_DETALHADO),
            termino_garantia: row.raw(TERMINO_GARANTIA).and_then(parse_warranty_date),
            status: row
                .text(STATUS)
                .map(|s| s.to_lowercase())
                .unwrap_or_else(|| "ativo".to_string()),
        })
    }
}

/// Registro tipado de qualquer tipo de ativo
#[derive(Debug, Clone, PartialEq)]
pub enum LinhaInventario {
    Computador(LinhaComputador),
    Celular(LinhaCelular),
}

impl LinhaInventario {
    pub fn map(tipo: TipoAtivo, row: &SheetRow) -> Result<Self, RowError> {
        match tipo {
            TipoAtivo::Computadores => {
                LinhaComputador::from_sheet_row(row).map(LinhaInventario::Computador)
            }
            TipoAtivo::Celulares => {
                LinhaCelular::from_sheet_row(row).map(LinhaInventario::Celular)
            }
        }
    }

    pub fn cod_loja(&self) -> &str {
        match self {
            LinhaInventario::Computador(c) => &c.cod_loja,
            LinhaInventario::Celular(c) => &c.cod_loja,
        }
    }

    /// Identificador primário do ativo: hostname ou número da linha
    pub fn identificador(&self) -> &str {
        match self {
            LinhaInventario::Computador(c) => &c.computador,
            LinhaInventario::Celular(c) => &c.celular,
        }
    }
}
