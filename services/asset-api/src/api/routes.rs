//! Montagem do roteador e estado compartilhado

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use sfera_adapter_postgres::TransactionManager;
use sfera_auth_core::TokenService;
use sfera_config::UploadConfig;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::handlers::{health, iaf, lojas};
use crate::api::middleware::auth_middleware;

/// Estado compartilhado entre os handlers
///
/// Tudo é injetado na montagem do roteador; nenhum handler alcança
/// recursos globais.
#[derive(Clone)]
pub struct AppState {
    pub tx: TransactionManager,
    pub token_service: TokenService,
    pub upload: UploadConfig,
    pub metrics: PrometheusHandle,
}

/// Monta o roteador completo do serviço
///
/// `/api/health` e `/metrics` ficam fora do middleware de autenticação.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/iaf/upload-computadores", post(iaf::upload_computadores))
        .route("/api/iaf/upload-celulares", post(iaf::upload_celulares))
        .route("/api/iaf/estatisticas-gerais", get(iaf::estatisticas))
        .route("/api/iaf/resumo-lojas", get(iaf::resumo_lojas))
        .route("/api/iaf/alertas", get(iaf::alertas_garantia))
        .route("/api/iaf/computadores", get(iaf::computadores))
        .route("/api/iaf/celulares", get(iaf::celulares))
        .route("/api/iaf/grafico-garantias-mes", get(iaf::grafico_garantias))
        .route("/api/iaf/historico-uploads", get(iaf::historico_uploads))
        .route("/api/lojas", get(lojas::list))
        .route("/api/lojas/{id}", get(lojas::get_by_id))
        .layer(DefaultBodyLimit::max(state.upload.max_file_size))
        .layer(middleware::from_fn_with_state(
            state.token_service.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/api/health", get(health::health))
        .route("/metrics", get(health::metrics))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
