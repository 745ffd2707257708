//! Handlers do módulo IAF: upload de planilhas e consultas de garantia

use axum::{
    Json,
    extract::{Multipart, Query, State},
};
use chrono::{NaiveDate, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use sfera_auth_core::Claims;
use sfera_common::StoreId;
use sfera_errors::{AppError, AppResult};
use tracing::info;

use crate::api::middleware::AuthClaims;
use crate::api::routes::AppState;
use crate::application::{
    AlertaGarantia, EstatisticasGerais, PontoGraficoMes, ResumoLoja, alertas,
    estatisticas_gerais, grafico_garantias_mes, resumo_por_loja,
};
use crate::domain::{StatusGarantia, TipoAtivo, days_until};
use crate::infrastructure::persistence::rows::{
    InventarioCelularRow, InventarioComputadorRow, UploadIafRow,
};
use crate::infrastructure::persistence::{AssetRepository, PgIngestUnitOfWork};
use crate::ingest::{IngestOptions, IngestStats, ingest_rows, parse_workbook};

const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
];

#[derive(Debug, Default, Deserialize)]
pub struct UploadParams {
    /// Ignora a trava de remoção em massa
    #[serde(default)]
    pub forcar: bool,
}

/// Resposta do upload, no formato que o painel consome
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub estatisticas: IngestStats,
}

pub async fn upload_computadores(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Query(params): Query<UploadParams>,
    multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    upload(state, claims, params, multipart, TipoAtivo::Computadores).await
}

pub async fn upload_celulares(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Query(params): Query<UploadParams>,
    multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    upload(state, claims, params, multipart, TipoAtivo::Celulares).await
}

async fn upload(
    state: AppState,
    claims: Claims,
    params: UploadParams,
    mut multipart: Multipart,
    tipo: TipoAtivo,
) -> AppResult<Json<UploadResponse>> {
    let mut arquivo: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Falha ao ler o formulário: {}", e)))?
    {
        if field.name() != Some("arquivo") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !ALLOWED_MIME_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::validation(
                "Apenas planilhas .xlsx ou .xls são aceitas",
            ));
        }

        let nome_arquivo = field
            .file_name()
            .unwrap_or("planilha.xlsx")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Falha ao ler o arquivo: {}", e)))?;

        arquivo = Some((nome_arquivo, bytes.to_vec()));
        break;
    }

    let (nome_arquivo, bytes) =
        arquivo.ok_or_else(|| AppError::validation("Campo 'arquivo' não enviado"))?;

    info!(
        tipo = %tipo,
        arquivo = %nome_arquivo,
        tamanho = bytes.len(),
        usuario = %claims.sub,
        "Processing IAF upload"
    );

    let rows = parse_workbook(&bytes).map_err(AppError::from)?;

    let options = IngestOptions {
        forcar_remocao: params.forcar,
        max_removal_ratio: state.upload.max_removal_ratio,
    };

    let uow = PgIngestUnitOfWork::begin(&state.tx).await?;
    let stats = ingest_rows(
        uow,
        tipo,
        claims.user_id()?,
        &nome_arquivo,
        &rows,
        &options,
    )
    .await
    .map_err(AppError::from)?;

    counter!("iaf_uploads_total", "tipo" => tipo.as_str()).increment(1);

    Ok(Json(UploadResponse {
        success: true,
        message: format!("Upload de {} processado com sucesso", tipo),
        estatisticas: stats,
    }))
}

fn hoje() -> NaiveDate {
    Utc::now().date_naive()
}

pub async fn estatisticas(
    State(state): State<AppState>,
) -> AppResult<Json<EstatisticasGerais>> {
    let repo = AssetRepository::new(state.tx.pool().clone());
    let registros = repo.fetch_registros_garantia().await?;
    Ok(Json(estatisticas_gerais(&registros, hoje())))
}

pub async fn resumo_lojas(State(state): State<AppState>) -> AppResult<Json<Vec<ResumoLoja>>> {
    let repo = AssetRepository::new(state.tx.pool().clone());
    let registros = repo.fetch_registros_garantia().await?;
    Ok(Json(resumo_por_loja(&registros, hoje())))
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertaParams {
    pub loja_id: Option<i32>,
}

pub async fn alertas_garantia(
    State(state): State<AppState>,
    Query(params): Query<AlertaParams>,
) -> AppResult<Json<Vec<AlertaGarantia>>> {
    let repo = AssetRepository::new(state.tx.pool().clone());

    // o filtro é pelo código da loja, para não perder linhas com loja_id nulo
    let codigo = match params.loja_id {
        Some(id) => match repo.get_loja(StoreId(id)).await? {
            Some(loja) => Some(loja.codigo),
            None => return Ok(Json(Vec::new())),
        },
        None => None,
    };

    let registros = repo.fetch_registros_garantia().await?;
    Ok(Json(alertas(&registros, hoje(), codigo.as_deref())))
}

pub async fn grafico_garantias(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PontoGraficoMes>>> {
    let repo = AssetRepository::new(state.tx.pool().clone());
    let registros = repo.fetch_registros_garantia().await?;
    Ok(Json(grafico_garantias_mes(&registros, hoje())))
}

#[derive(Debug, Default, Deserialize)]
pub struct ComputadorParams {
    pub loja_id: Option<i32>,
    pub status_garantia: Option<String>,
}

/// Registro de computador com o status de garantia já calculado
#[derive(Debug, Serialize)]
pub struct ComputadorDto {
    #[serde(flatten)]
    pub registro: InventarioComputadorRow,
    pub status_garantia: Option<StatusGarantia>,
    pub dias_restantes: Option<i64>,
}

pub async fn computadores(
    State(state): State<AppState>,
    Query(params): Query<ComputadorParams>,
) -> AppResult<Json<Vec<ComputadorDto>>> {
    let filtro = parse_status_filter(params.status_garantia.as_deref())?;

    let repo = AssetRepository::new(state.tx.pool().clone());
    let hoje = hoje();

    let mut registros = repo
        .list_computadores(params.loja_id)
        .await?
        .into_iter()
        .map(|registro| {
            let status_garantia = registro
                .termino_garantia
                .map(|t| StatusGarantia::classify(t, hoje));
            let dias_restantes = registro.termino_garantia.map(|t| days_until(t, hoje));
            ComputadorDto {
                registro,
                status_garantia,
                dias_restantes,
            }
        })
        .filter(|dto| filtro.is_none() || dto.status_garantia == filtro)
        .collect::<Vec<_>>();
    registros.sort_by_key(|dto| chave_urgencia(dto.dias_restantes));

    Ok(Json(registros))
}

#[derive(Debug, Default, Deserialize)]
pub struct CelularParams {
    pub loja_id: Option<i32>,
    /// Status do aparelho (ativo, inativo, ...)
    pub status: Option<String>,
    pub status_garantia: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CelularDto {
    #[serde(flatten)]
    pub registro: InventarioCelularRow,
    pub status_garantia: Option<StatusGarantia>,
    pub dias_restantes: Option<i64>,
}

pub async fn celulares(
    State(state): State<AppState>,
    Query(params): Query<CelularParams>,
) -> AppResult<Json<Vec<CelularDto>>> {
    let filtro = parse_status_filter(params.status_garantia.as_deref())?;

    let repo = AssetRepository::new(state.tx.pool().clone());
    let hoje = hoje();

    let mut registros = repo
        .list_celulares(params.loja_id, params.status.as_deref())
        .await?
        .into_iter()
        .map(|registro| {
            let status_garantia = registro
                .termino_garantia
                .map(|t| StatusGarantia::classify(t, hoje));
            let dias_restantes = registro.termino_garantia.map(|t| days_until(t, hoje));
            CelularDto {
                registro,
                status_garantia,
                dias_restantes,
            }
        })
        .filter(|dto| filtro.is_none() || dto.status_garantia == filtro)
        .collect::<Vec<_>>();
    registros.sort_by_key(|dto| chave_urgencia(dto.dias_restantes));

    Ok(Json(registros))
}

pub async fn historico_uploads(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UploadIafRow>>> {
    let repo = AssetRepository::new(state.tx.pool().clone());
    Ok(Json(repo.upload_history().await?))
}

/// Mais urgente primeiro; registros sem data de garantia vão para o fim.
/// A ordenação é estável, então o desempate por loja e identificador
/// vindo do banco é preservado.
fn chave_urgencia(dias_restantes: Option<i64>) -> (bool, i64) {
    match dias_restantes {
        Some(dias) => (false, dias),
        None => (true, 0),
    }
}

fn parse_status_filter(valor: Option<&str>) -> AppResult<Option<StatusGarantia>> {
    match valor {
        None => Ok(None),
        Some(valor) => StatusGarantia::parse(valor).map(Some).ok_or_else(|| {
            AppError::validation(format!("Status de garantia desconhecido: {}", valor))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chave_urgencia_poe_sem_data_no_fim() {
        let mut dias = vec![None, Some(30), Some(-5), None, Some(0)];
        dias.sort_by_key(|d| chave_urgencia(*d));
        assert_eq!(dias, vec![Some(-5), Some(0), Some(30), None, None]);
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("vencida")).unwrap(),
            Some(StatusGarantia::Vencida)
        );
        assert!(parse_status_filter(Some("qualquer")).is_err());
    }
}
