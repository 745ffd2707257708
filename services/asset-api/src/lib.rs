//! Serviço de gestão de ativos de TI da rede de lojas
//!
//! Núcleo do sistema: ingestão das planilhas IAF, reconciliação do
//! inventário de computadores e celulares e alertas de garantia.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ingest;
