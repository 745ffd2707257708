//! Consulta ao cadastro de lojas

use axum::{
    Json,
    extract::{Path, State},
};
use sfera_common::StoreId;
use sfera_errors::{AppError, AppResult};

use crate::api::routes::AppState;
use crate::infrastructure::persistence::AssetRepository;
use crate::infrastructure::persistence::rows::LojaRow;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<LojaRow>>> {
    let repo = AssetRepository::new(state.tx.pool().clone());
    Ok(Json(repo.list_lojas().await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
) -> AppResult<Json<LojaRow>> {
    let repo = AssetRepository::new(state.tx.pool().clone());
    let loja = repo
        .get_loja(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Loja {} não encontrada", id)))?;

    Ok(Json(loja))
}
