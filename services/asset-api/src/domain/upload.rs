//! Registro de auditoria de uploads IAF

use sfera_common::UserId;

use crate::domain::TipoAtivo;

/// Linha de auditoria gravada ao final de cada ingestão
///
/// Imutável depois de inserida; uma por upload concluído.
#[derive(Debug, Clone)]
pub struct NovoUploadIaf {
    pub usuario_id: UserId,
    pub tipo: TipoAtivo,
    pub nome_arquivo: String,
    pub registros_inseridos: i32,
    pub registros_atualizados: i32,
    pub registros_removidos: i32,
    pub registros_com_erro: i32,
}
