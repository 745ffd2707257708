//! Consultas de leitura do inventário

use sfera_common::StoreId;
use sfera_errors::{AppError, AppResult};
use sqlx::PgPool;

use crate::application::RegistroGarantia;
use crate::domain::TipoAtivo;
use crate::infrastructure::persistence::rows::{
    GarantiaRow, InventarioCelularRow, InventarioComputadorRow, LojaRow, UploadIafRow,
};

pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lojas ativas do cadastro, em ordem alfabética
    pub async fn list_lojas(&self) -> AppResult<Vec<LojaRow>> {
        sqlx::query_as::<_, LojaRow>(
            r#"
            SELECT id, nome, codigo, tipo_franquia, endereco, cidade, estado,
                   telefone, email, gerente_nome, ativo
            FROM lojas
            WHERE ativo = TRUE
            ORDER BY nome ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list stores: {}", e)))
    }

    pub async fn get_loja(&self, id: StoreId) -> AppResult<Option<LojaRow>> {
        sqlx::query_as::<_, LojaRow>(
            r#"
            SELECT id, nome, codigo, tipo_franquia, endereco, cidade, estado,
                   telefone, email, gerente_nome, ativo
            FROM lojas
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get store: {}", e)))
    }

    /// Projeção de garantia de todo o inventário, ambos os tipos
    pub async fn fetch_registros_garantia(&self) -> AppResult<Vec<RegistroGarantia>> {
        let computadores = sqlx::query_as::<_, GarantiaRow>(
            r#"
            SELECT i.cod_loja, i.loja_id, l.nome AS loja_nome,
                   i.computador AS identificador, i.local, i.modelo, i.termino_garantia
            FROM inventario_computadores i
            LEFT JOIN lojas l ON l.id = i.loja_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch computer warranties: {}", e)))?;

        let celulares = sqlx::query_as::<_, GarantiaRow>(
            r#"
            SELECT i.cod_loja, i.loja_id, l.nome AS loja_nome,
                   i.celular AS identificador, i.local, i.modelo, i.termino_garantia
            FROM inventario_celulares i
            LEFT JOIN lojas l ON l.id = i.loja_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch phone warranties: {}", e)))?;

        let mut registros =
            Vec::with_capacity(computadores.len() + celulares.len());
        registros.extend(
            computadores
                .into_iter()
                .map(|r| registro_garantia(TipoAtivo::Computadores, r)),
        );
        registros.extend(
            celulares
                .into_iter()
                .map(|r| registro_garantia(TipoAtivo::Celulares, r)),
        );
        Ok(registros)
    }

    pub async fn list_computadores(
        &self,
        loja_id: Option<i32>,
    ) -> AppResult<Vec<InventarioComputadorRow>> {
        let base = r#"
            SELECT id, cod_loja, loja_id, local, computador, modelo, tag, memoria,
                   termino_garantia, tempo_uso_anos, arquivo_origem, created_at, updated_at
            FROM inventario_computadores
        "#;
        // mesmo critério do painel antigo: mais urgente primeiro, sem data por último
        let ordem = "ORDER BY termino_garantia ASC NULLS LAST, cod_loja, computador";

        let rows = match loja_id {
            Some(loja_id) => {
                sqlx::query_as::<_, InventarioComputadorRow>(&format!(
                    "{base} WHERE loja_id = $1 {ordem}"
                ))
                .bind(loja_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, InventarioComputadorRow>(&format!("{base} {ordem}"))
                    .fetch_all(&self.pool)
                    .await
            }
        };

        rows.map_err(|e| AppError::database(format!("Failed to list computers: {}", e)))
    }

    pub async fn list_celulares(
        &self,
        loja_id: Option<i32>,
        status: Option<&str>,
    ) -> AppResult<Vec<InventarioCelularRow>> {
        let mut sql = String::from(
            r#"
            SELECT id, cod_loja, loja_id, local, celular, modelo, modelo_detalhado,
                   termino_garantia, status, arquivo_origem, created_at, updated_at
            FROM inventario_celulares
            WHERE TRUE
        "#,
        );

        let mut bind = 0;
        if loja_id.is_some() {
            bind += 1;
            sql.push_str(&format!(" AND loja_id = ${bind}"));
        }
        if status.is_some() {
            bind += 1;
            sql.push_str(&format!(" AND status = ${bind}"));
        }
        sql.push_str(" ORDER BY termino_garantia ASC NULLS LAST, cod_loja, celular");

        let mut query = sqlx::query_as::<_, InventarioCelularRow>(&sql);
        if let Some(loja_id) = loja_id {
            query = query.bind(loja_id);
        }
        if let Some(status) = status {
            query = query.bind(status.to_string());
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list phones: {}", e)))
    }

    /// Uploads mais recentes, limitados aos últimos cinquenta
    pub async fn upload_history(&self) -> AppResult<Vec<UploadIafRow>> {
        sqlx::query_as::<_, UploadIafRow>(
            r#"
            SELECT u.id, u.usuario_id, us.nome AS usuario_nome, u.tipo, u.nome_arquivo,
                   u.registros_inseridos, u.registros_atualizados, u.registros_removidos,
                   u.registros_com_erro, u.created_at
            FROM iaf_uploads u
            LEFT JOIN usuarios us ON us.id = u.usuario_id
            ORDER BY u.created_at DESC
            LIMIT 50
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch upload history: {}", e)))
    }
}

fn registro_garantia(tipo: TipoAtivo, row: GarantiaRow) -> RegistroGarantia {
    RegistroGarantia {
        tipo,
        cod_loja: row.cod_loja,
        loja_id: row.loja_id,
        loja_nome: row.loja_nome,
        identificador: row.identificador,
        local: row.local,
        modelo: row.modelo,
        termino_garantia: row.termino_garantia,
    }
}
