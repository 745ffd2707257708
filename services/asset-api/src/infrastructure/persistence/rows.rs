//! Linhas do banco devolvidas pelas consultas de leitura

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Loja do cadastro da rede
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LojaRow {
    pub id: i32,
    pub nome: String,
    pub codigo: String,
    pub tipo_franquia: Option<String>,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub gerente_nome: Option<String>,
    pub ativo: bool,
}

/// Registro do inventário de computadores
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventarioComputadorRow {
    pub id: i32,
    pub cod_loja: String,
    pub loja_id: Option<i32>,
    pub local: Option<String>,
    pub computador: String,
    pub modelo: Option<String>,
    pub tag: Option<String>,
    pub memoria: Option<String>,
    pub termino_garantia: Option<NaiveDate>,
    pub tempo_uso_anos: Option<i32>,
    pub arquivo_origem: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registro do inventário de celulares
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventarioCelularRow {
    pub id: i32,
    pub cod_loja: String,
    pub loja_id: Option<i32>,
    pub local: Option<String>,
    pub celular: String,
    pub modelo: Option<String>,
    pub modelo_detalhado: Option<String>,
    pub termino_garantia: Option<NaiveDate>,
    pub status: String,
    pub arquivo_origem: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Linha do histórico de uploads, com o nome de quem subiu o arquivo
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UploadIafRow {
    pub id: i32,
    pub usuario_id: i32,
    pub usuario_nome: Option<String>,
    pub tipo: String,
    pub nome_arquivo: String,
    pub registros_inseridos: i32,
    pub registros_atualizados: i32,
    pub registros_removidos: i32,
    pub registros_com_erro: i32,
    pub created_at: DateTime<Utc>,
}

/// Projeção de garantia usada pelas agregações
#[derive(Debug, Clone, FromRow)]
pub struct GarantiaRow {
    pub cod_loja: String,
    pub loja_id: Option<i32>,
    pub loja_nome: Option<String>,
    pub identificador: String,
    pub local: Option<String>,
    pub modelo: Option<String>,
    pub termino_garantia: Option<NaiveDate>,
}
