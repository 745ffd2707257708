//! Tipo de ativo inventariado

use serde::{Deserialize, Serialize};

/// Tipo de ativo coberto pelo módulo IAF
///
/// Cada upload substitui integralmente o inventário de um único tipo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoAtivo {
    Computadores,
    Celulares,
}

impl TipoAtivo {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoAtivo::Computadores => "computadores",
            TipoAtivo::Celulares => "celulares",
        }
    }

    /// Tabela de inventário correspondente
    pub fn table(&self) -> &'static str {
        match self {
            TipoAtivo::Computadores => "inventario_computadores",
            TipoAtivo::Celulares => "inventario_celulares",
        }
    }

    /// Coluna do identificador primário do ativo (hostname ou linha)
    pub fn id_column(&self) -> &'static str {
        match self {
            TipoAtivo::Computadores => "computador",
            TipoAtivo::Celulares => "celular",
        }
    }
}

impl std::fmt::Display for TipoAtivo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
