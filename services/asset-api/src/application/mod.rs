//! Camada de aplicação: agregações sobre o inventário
//!
//! Funções puras sobre registros já carregados; as consultas SQL ficam
//! na infraestrutura.

pub mod alerts;

pub use alerts::{
    AlertaGarantia, ContagemStatus, EstatisticasGerais, PontoGraficoMes, RegistroGarantia,
    ResumoLoja, alertas, estatisticas_gerais, grafico_garantias_mes, resumo_por_loja,
};
