//! Unidade de trabalho da ingestão sobre uma transação PostgreSQL

use async_trait::async_trait;
use sfera_adapter_postgres::TransactionManager;
use sfera_errors::{AppError, AppResult};
use sqlx::{Postgres, Transaction};

use crate::domain::{NovoUploadIaf, TipoAtivo};
use crate::ingest::IngestUnitOfWork;
use crate::ingest::schema::LinhaInventario;

pub struct PgIngestUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

impl PgIngestUnitOfWork {
    /// Abre a transação que envolve todo o upload
    pub async fn begin(manager: &TransactionManager) -> AppResult<Self> {
        Ok(Self {
            tx: manager.begin().await?,
        })
    }
}

#[async_trait]
impl IngestUnitOfWork for PgIngestUnitOfWork {
    async fn store_id_by_code(&mut self, cod_loja: &str) -> AppResult<Option<i32>> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM lojas WHERE codigo = $1")
            .bind(cod_loja)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to resolve store: {}", e)))?;

        Ok(row.map(|(id,)| id))
    }

    async fn find_record(
        &mut self,
        tipo: TipoAtivo,
        cod_loja: &str,
        identificador: &str,
    ) -> AppResult<Option<i32>> {
        // nomes de tabela e coluna vêm do enum, nunca da requisição
        let sql = format!(
            "SELECT id FROM {} WHERE cod_loja = $1 AND {} = $2",
            tipo.table(),
            tipo.id_column()
        );

        let row: Option<(i32,)> = sqlx::query_as(&sql)
            .bind(cod_loja)
            .bind(identificador)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to find record: {}", e)))?;

        Ok(row.map(|(id,)| id))
    }

    async fn insert_record(
        &mut self,
        loja_id: Option<i32>,
        nome_arquivo: &str,
        linha: &LinhaInventario,
    ) -> AppResult<()> {
        match linha {
            LinhaInventario::Computador(c) => {
                sqlx::query(
                    r#"
                    INSERT INTO inventario_computadores
                        (cod_loja, loja_id, local, computador, modelo, tag, memoria,
                         termino_garantia, tempo_uso_anos, arquivo_origem, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
                    "#,
                )
                .bind(&c.cod_loja)
                .bind(loja_id)
                .bind(&c.local)
                .bind(&c.computador)
                .bind(&c.modelo)
                .bind(&c.tag)
                .bind(&c.memoria)
                .bind(c.termino_garantia)
                .bind(c.tempo_uso_anos)
                .bind(nome_arquivo)
                .execute(&mut *self.tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to insert computer: {}", e)))?;
            }
            LinhaInventario::Celular(c) => {
                sqlx::query(
                    r#"
                    INSERT INTO inventario_celulares
                        (cod_loja, loja_id, local, celular, modelo, modelo_detalhado,
                         termino_garantia, status, arquivo_origem, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
                    "#,
                )
                .bind(&c.cod_loja)
                .bind(loja_id)
                .bind(&c.local)
                .bind(&c.celular)
                .bind(&c.modelo)
                .bind(&c.modelo_detalhado)
                .bind(c.termino_garantia)
                .bind(&c.status)
                .bind(nome_arquivo)
                .execute(&mut *self.tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to insert phone: {}", e)))?;
            }
        }

        Ok(())
    }

    async fn update_record(
        &mut self,
        id: i32,
        loja_id: Option<i32>,
        nome_arquivo: &str,
        linha: &LinhaInventario,
    ) -> AppResult<()> {
        match linha {
            LinhaInventario::Computador(c) => {
                sqlx::query(
                    r#"
                    UPDATE inventario_computadores
                    SET loja_id = $2, local = $3, modelo = $4, tag = $5, memoria = $6,
                        termino_garantia = $7, tempo_uso_anos = $8, arquivo_origem = $9,
                        updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(loja_id)
                .bind(&c.local)
                .bind(&c.modelo)
                .bind(&c.tag)
                .bind(&c.memoria)
                .bind(c.termino_garantia)
                .bind(c.tempo_uso_anos)
                .bind(nome_arquivo)
                .execute(&mut *self.tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to update computer: {}", e)))?;
            }
            LinhaInventario::Celular(c) => {
                sqlx::query(
                    r#"
                    UPDATE inventario_celulares
                    SET loja_id = $2, local = $3, modelo = $4, modelo_detalhado = $5,
                        termino_garantia = $6, status = $7, arquivo_origem = $8,
                        updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(loja_id)
                .bind(&c.local)
                .bind(&c.modelo)
                .bind(&c.modelo_detalhado)
                .bind(c.termino_garantia)
                .bind(&c.status)
                .bind(nome_arquivo)
                .execute(&mut *self.tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to update phone: {}", e)))?;
            }
        }

        Ok(())
    }

    async fn count_total(&mut self, tipo: TipoAtivo) -> AppResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", tipo.table());
        let (count,): (i64,) = sqlx::query_as(&sql)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to count records: {}", e)))?;

        Ok(count as u64)
    }

    async fn count_stale(&mut self, tipo: TipoAtivo, nome_arquivo: &str) -> AppResult<u64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE arquivo_origem IS DISTINCT FROM $1",
            tipo.table()
        );
        let (count,): (i64,) = sqlx::query_as(&sql)
            .bind(nome_arquivo)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to count stale records: {}", e)))?;

        Ok(count as u64)
    }

    async fn delete_stale(&mut self, tipo: TipoAtivo, nome_arquivo: &str) -> AppResult<u64> {
        let sql = format!(
            "DELETE FROM {} WHERE arquivo_origem IS DISTINCT FROM $1",
            tipo.table()
        );
        let result = sqlx::query(&sql)
            .bind(nome_arquivo)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete stale records: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn record_upload(&mut self, upload: &NovoUploadIaf) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO iaf_uploads
                (usuario_id, tipo, nome_arquivo, registros_inseridos,
                 registros_atualizados, registros_removidos, registros_com_erro)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(upload.usuario_id.0)
        .bind(upload.tipo.as_str())
        .bind(&upload.nome_arquivo)
        .bind(upload.registros_inseridos)
        .bind(upload.registros_atualizados)
        .bind(upload.registros_removidos)
        .bind(upload.registros_com_erro)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to record upload: {}", e)))?;

        Ok(())
    }

    async fn commit(self) -> AppResult<()> {
        TransactionManager::commit(self.tx).await
    }

    async fn rollback(self) -> AppResult<()> {
        TransactionManager::rollback(self.tx).await
    }
}
