//! Reconciliação transacional do inventário
//!
//! O arquivo carregado é a fotografia completa do inventário da rede:
//! linhas presentes são inseridas ou atualizadas e registros que não
//! constam do arquivo atual são removidos, tudo dentro de uma única
//! transação, com trava contra remoções em massa.

use async_trait::async_trait;
use serde::Serialize;
use sfera_common::UserId;
use sfera_errors::AppResult;
use tracing::{info, warn};

use crate::domain::{NovoUploadIaf, TipoAtivo};
use crate::error::IngestError;
use crate::ingest::schema::LinhaInventario;
use crate::ingest::spreadsheet::SheetRow;

/// Opções da reconciliação de um upload
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Ignora a trava de remoção em massa
    pub forcar_remocao: bool,
    /// Fração máxima do inventário que um upload pode remover
    pub max_removal_ratio: f64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            forcar_remocao: false,
            max_removal_ratio: 0.5,
        }
    }
}

/// Estatísticas devolvidas ao cliente e gravadas na auditoria
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub total_linhas: usize,
    pub inseridos: u32,
    pub atualizados: u32,
    pub removidos: u32,
    pub erros: u32,
}

/// Unidade de trabalho da ingestão
///
/// Abstrai a transação do banco para que o motor de reconciliação
/// possa ser exercitado sem Postgres. `commit` e `rollback` consomem a
/// unidade: nada escapa da transação.
#[async_trait]
pub trait IngestUnitOfWork: Send {
    /// Resolve o código da loja para o id do cadastro, se houver
    async fn store_id_by_code(&mut self, cod_loja: &str) -> AppResult<Option<i32>>;

    /// Busca o registro pelo par (código da loja, identificador)
    async fn find_record(
        &mut self,
        tipo: TipoAtivo,
        cod_loja: &str,
        identificador: &str,
    ) -> AppResult<Option<i32>>;

    async fn insert_record(
        &mut self,
        loja_id: Option<i32>,
        nome_arquivo: &str,
        linha: &LinhaInventario,
    ) -> AppResult<()>;

    async fn update_record(
        &mut self,
        id: i32,
        loja_id: Option<i32>,
        nome_arquivo: &str,
        linha: &LinhaInventario,
    ) -> AppResult<()>;

    /// Total de registros do tipo, após os upserts deste upload
    async fn count_total(&mut self, tipo: TipoAtivo) -> AppResult<u64>;

    /// Registros que não vieram do arquivo atual
    async fn count_stale(&mut self, tipo: TipoAtivo, nome_arquivo: &str) -> AppResult<u64>;

    async fn delete_stale(&mut self, tipo: TipoAtivo, nome_arquivo: &str) -> AppResult<u64>;

    async fn record_upload(&mut self, upload: &NovoUploadIaf) -> AppResult<()>;

    async fn commit(self) -> AppResult<()>
    where
        Self: Sized;

    async fn rollback(self) -> AppResult<()>
    where
        Self: Sized;
}

/// Reconcilia as linhas decodificadas contra o inventário
///
/// Confirma a transação somente se todo o fluxo passar; qualquer erro,
/// inclusive a trava de remoção, desfaz o lote inteiro.
pub async fn ingest_rows<U: IngestUnitOfWork>(
    mut uow: U,
    tipo: TipoAtivo,
    usuario_id: UserId,
    nome_arquivo: &str,
    rows: &[SheetRow],
    options: &IngestOptions,
) -> Result<IngestStats, IngestError> {
    match process(&mut uow, tipo, usuario_id, nome_arquivo, rows, options).await {
        Ok(stats) => {
            uow.commit().await?;
            info!(
                tipo = %tipo,
                arquivo = %nome_arquivo,
                inseridos = stats.inseridos,
                atualizados = stats.atualizados,
                removidos = stats.removidos,
                erros = stats.erros,
                "Upload IAF reconciliado"
            );
            Ok(stats)
        }
        Err(err) => {
            uow.rollback().await?;
            Err(err)
        }
    }
}

async fn process<U: IngestUnitOfWork>(
    uow: &mut U,
    tipo: TipoAtivo,
    usuario_id: UserId,
    nome_arquivo: &str,
    rows: &[SheetRow],
    options: &IngestOptions,
) -> Result<IngestStats, IngestError> {
    let mut stats = IngestStats {
        total_linhas: rows.len(),
        ..IngestStats::default()
    };

    for (idx, row) in rows.iter().enumerate() {
        let linha = match LinhaInventario::map(tipo, row) {
            Ok(linha) => linha,
            Err(err) => {
                // linha inválida não aborta o lote, só entra na contagem
                warn!(linha = idx + 2, erro = %err, "Linha da planilha descartada");
                stats.erros += 1;
                continue;
            }
        };

        let loja_id = uow.store_id_by_code(linha.cod_loja()).await?;

        match uow
            .find_record(tipo, linha.cod_loja(), linha.identificador())
            .await?
        {
            Some(id) => {
                uow.update_record(id, loja_id, nome_arquivo, &linha).await?;
                stats.atualizados += 1;
            }
            None => {
                uow.insert_record(loja_id, nome_arquivo, &linha).await?;
                stats.inseridos += 1;
            }
        }
    }

    let total = uow.count_total(tipo).await?;
    let stale = uow.count_stale(tipo, nome_arquivo).await?;

    if total > 0 && !options.forcar_remocao {
        let ratio = stale as f64 / total as f64;
        if ratio > options.max_removal_ratio {
            warn!(
                tipo = %tipo,
                arquivo = %nome_arquivo,
                removeria = stale,
                total = total,
                "Upload recusado pela trava de remoção em massa"
            );
            return Err(IngestError::RemovalGuard {
                would_remove: stale,
                total,
            });
        }
    }

    stats.removidos = u32::try_from(uow.delete_stale(tipo, nome_arquivo).await?).unwrap_or(u32::MAX);

    uow.record_upload(&NovoUploadIaf {
        usuario_id,
        tipo,
        nome_arquivo: nome_arquivo.to_string(),
        registros_inseridos: stats.inseridos as i32,
        registros_atualizados: stats.atualizados as i32,
        registros_removidos: stats.removidos as i32,
        registros_com_erro: stats.erros as i32,
    })
    .await?;

    Ok(stats)
}
