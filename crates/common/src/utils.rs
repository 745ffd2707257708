//! Funções utilitárias

use uuid::Uuid;

/// Gera um novo UUID v7 (ordenado no tempo)
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}
