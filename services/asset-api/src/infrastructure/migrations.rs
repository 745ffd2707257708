//! Migrações embutidas do serviço de ativos

use sfera_adapter_postgres::{Migration, MigrationManager};
use sfera_errors::{AppError, AppResult};
use sqlx::PgPool;

pub fn migrations() -> Vec<Migration> {
    vec![Migration::new(
        1,
        "schema_inicial",
        include_str!("../../migrations/0001_schema_inicial.sql"),
    )]
}

/// Aplica as migrações pendentes na inicialização
pub async fn run(pool: &PgPool) -> AppResult<()> {
    let result = MigrationManager::new(pool.clone())
        .migrate(&migrations())
        .await?;

    if !result.is_success() {
        let detalhes: Vec<String> = result
            .errors
            .iter()
            .map(|e| format!("{} ({}): {}", e.version, e.name, e.error))
            .collect();
        return Err(AppError::database(format!(
            "Migration failed: {}",
            detalhes.join("; ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_inicial_cobre_cadastro_completo() {
        let sql = include_str!("../../migrations/0001_schema_inicial.sql");

        // cadastro de lojas com código único e dados de contato
        assert!(sql.contains("codigo VARCHAR(20) NOT NULL UNIQUE"));
        for coluna in [
            "tipo_franquia",
            "endereco",
            "telefone",
            "email",
            "gerente_nome",
            "updated_at",
        ] {
            assert!(sql.contains(coluna), "lojas sem a coluna {coluna}");
        }

        assert!(sql.contains("ativo BOOLEAN NOT NULL DEFAULT TRUE"));
        assert_eq!(sql.matches("created_at TIMESTAMPTZ").count(), 5);
        assert_eq!(sql.matches("updated_at TIMESTAMPTZ").count(), 3);
    }

    #[test]
    fn test_migrations_are_ordered_and_unique() {
        let migrations = migrations();
        assert!(!migrations.is_empty());

        let mut versions: Vec<i64> = migrations.iter().map(|m| m.version).collect();
        let original = versions.clone();
        versions.sort_unstable();
        versions.dedup();
        assert_eq!(versions, original);
    }
}
