//! Erros do serviço

use sfera_errors::AppError;
use thiserror::Error;

/// Erros da ingestão de planilhas (módulo IAF)
#[derive(Debug, Error)]
pub enum IngestError {
    /// O buffer não é uma planilha reconhecível
    #[error("Arquivo inválido ou corrompido: {0}")]
    Parse(String),

    /// A planilha não tem linhas de dados
    #[error("Arquivo vazio ou sem dados")]
    EmptyFile,

    /// Trava de remoção: o upload removeria uma fração grande demais do
    /// inventário e o operador não passou `forcar=true`
    #[error(
        "Upload removeria {would_remove} de {total} registros existentes; \
         reenvie com forcar=true para confirmar a substituição completa"
    )]
    RemovalGuard { would_remove: u64, total: u64 },

    /// Falha inesperada de banco/transação: lote inteiro desfeito
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Parse(_) | IngestError::EmptyFile => {
                AppError::validation(err.to_string())
            }
            IngestError::RemovalGuard { .. } => AppError::failed_precondition(err.to_string()),
            IngestError::App(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_maps_to_validation() {
        let app: AppError = IngestError::EmptyFile.into();
        assert_eq!(app.status_code(), 400);
    }

    #[test]
    fn test_removal_guard_maps_to_precondition() {
        let app: AppError = IngestError::RemovalGuard {
            would_remove: 10,
            total: 12,
        }
        .into();
        assert_eq!(app.status_code(), 412);
    }
}
