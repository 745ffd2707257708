//! Agregações de garantia para os painéis da equipe de TI

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::domain::{StatusGarantia, TipoAtivo, days_until};

/// Projeção mínima de um ativo para as agregações de garantia
#[derive(Debug, Clone)]
pub struct RegistroGarantia {
    pub tipo: TipoAtivo,
    pub cod_loja: String,
    pub loja_id: Option<i32>,
    pub loja_nome: Option<String>,
    pub identificador: String,
    pub local: Option<String>,
    pub modelo: Option<String>,
    pub termino_garantia: Option<NaiveDate>,
}

/// Contagem por status de garantia
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContagemStatus {
    pub total: u32,
    pub vigentes: u32,
    pub vencendo: u32,
    pub vencidas: u32,
}

impl ContagemStatus {
    fn conta(&mut self, termino: Option<NaiveDate>, hoje: NaiveDate) {
        self.total += 1;
        match termino.map(|t| StatusGarantia::classify(t, hoje)) {
            Some(StatusGarantia::Vigente) => self.vigentes += 1,
            Some(StatusGarantia::Vencendo) => self.vencendo += 1,
            Some(StatusGarantia::Vencida) => self.vencidas += 1,
            // sem data de garantia não entra em nenhum status
            None => {}
        }
    }
}

/// Números do painel inicial
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EstatisticasGerais {
    pub total_computadores: u32,
    pub total_celulares: u32,
    pub total_lojas: u32,
    pub garantias_vigentes: u32,
    pub garantias_vencendo: u32,
    pub garantias_vencidas: u32,
    /// Registros sem data de término cadastrada
    pub sem_garantia: u32,
}

pub fn estatisticas_gerais(registros: &[RegistroGarantia], hoje: NaiveDate) -> EstatisticasGerais {
    let mut stats = EstatisticasGerais::default();
    let mut lojas = std::collections::BTreeSet::new();

    for registro in registros {
        match registro.tipo {
            TipoAtivo::Computadores => stats.total_computadores += 1,
            TipoAtivo::Celulares => stats.total_celulares += 1,
        }
        lojas.insert(registro.cod_loja.as_str());

        match registro
            .termino_garantia
            .map(|t| StatusGarantia::classify(t, hoje))
        {
            Some(StatusGarantia::Vigente) => stats.garantias_vigentes += 1,
            Some(StatusGarantia::Vencendo) => stats.garantias_vencendo += 1,
            Some(StatusGarantia::Vencida) => stats.garantias_vencidas += 1,
            None => stats.sem_garantia += 1,
        }
    }

    stats.total_lojas = lojas.len() as u32;
    stats
}

/// Resumo de uma loja, separado por tipo de ativo
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumoLoja {
    pub cod_loja: String,
    pub loja_nome: Option<String>,
    pub computadores: ContagemStatus,
    pub celulares: ContagemStatus,
}

/// Resumo por loja, ordenado pelo nome cadastrado (código como desempate)
pub fn resumo_por_loja(registros: &[RegistroGarantia], hoje: NaiveDate) -> Vec<ResumoLoja> {
    let mut por_loja: BTreeMap<String, ResumoLoja> = BTreeMap::new();

    for registro in registros {
        let resumo = por_loja
            .entry(registro.cod_loja.clone())
            .or_insert_with(|| ResumoLoja {
                cod_loja: registro.cod_loja.clone(),
                loja_nome: registro.loja_nome.clone(),
                computadores: ContagemStatus::default(),
                celulares: ContagemStatus::default(),
            });

        if resumo.loja_nome.is_none() {
            resumo.loja_nome = registro.loja_nome.clone();
        }

        match registro.tipo {
            TipoAtivo::Computadores => resumo.computadores.conta(registro.termino_garantia, hoje),
            TipoAtivo::Celulares => resumo.celulares.conta(registro.termino_garantia, hoje),
        }
    }

    let mut resumos: Vec<ResumoLoja> = por_loja.into_values().collect();
    resumos.sort_by(|a, b| {
        (a.loja_nome.as_deref(), a.cod_loja.as_str())
            .cmp(&(b.loja_nome.as_deref(), b.cod_loja.as_str()))
    });
    resumos
}

/// Alerta de garantia vencida ou prestes a vencer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertaGarantia {
    pub tipo: TipoAtivo,
    pub cod_loja: String,
    pub loja_nome: Option<String>,
    pub identificador: String,
    pub local: Option<String>,
    pub modelo: Option<String>,
    pub termino_garantia: NaiveDate,
    pub dias_restantes: i64,
    pub status: StatusGarantia,
}

/// Alertas ordenados do mais urgente para o menos urgente
///
/// Garantias vigentes e ativos sem data ficam de fora. O filtro usa o
/// código da loja: registros ainda sem `loja_id` resolvido na ingestão
/// continuam aparecendo.
pub fn alertas(
    registros: &[RegistroGarantia],
    hoje: NaiveDate,
    cod_loja: Option<&str>,
) -> Vec<AlertaGarantia> {
    let mut alertas: Vec<AlertaGarantia> = registros
        .iter()
        .filter(|r| cod_loja.is_none() || Some(r.cod_loja.as_str()) == cod_loja)
        .filter_map(|r| {
            let termino = r.termino_garantia?;
            let status = StatusGarantia::classify(termino, hoje);
            if status == StatusGarantia::Vigente {
                return None;
            }
            Some(AlertaGarantia {
                tipo: r.tipo,
                cod_loja: r.cod_loja.clone(),
                loja_nome: r.loja_nome.clone(),
                identificador: r.identificador.clone(),
                local: r.local.clone(),
                modelo: r.modelo.clone(),
                termino_garantia: termino,
                dias_restantes: days_until(termino, hoje),
                status,
            })
        })
        .collect();

    alertas.sort_by_key(|a| a.dias_restantes);
    alertas
}

/// Ponto do gráfico de vencimentos por mês
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PontoGraficoMes {
    pub mes: String,
    pub computadores: u32,
    pub celulares: u32,
}

/// Vencimentos de garantia nos próximos doze meses
///
/// Cada mês aparece mesmo sem vencimentos; garantias já vencidas não
/// entram no gráfico.
pub fn grafico_garantias_mes(
    registros: &[RegistroGarantia],
    hoje: NaiveDate,
) -> Vec<PontoGraficoMes> {
    let mut meses: BTreeMap<String, (u32, u32)> = BTreeMap::new();
    for offset in 0..12u32 {
        if let Some(mes) = hoje.checked_add_months(Months::new(offset)) {
            meses.insert(format!("{:04}-{:02}", mes.year(), mes.month()), (0, 0));
        }
    }

    let limite = hoje.checked_add_months(Months::new(12));

    for registro in registros {
        let Some(termino) = registro.termino_garantia else {
            continue;
        };
        if termino < hoje {
            continue;
        }
        if let Some(limite) = limite {
            if termino >= limite {
                continue;
            }
        }

        let chave = format!("{:04}-{:02}", termino.year(), termino.month());
        if let Some((computadores, celulares)) = meses.get_mut(&chave) {
            match registro.tipo {
                TipoAtivo::Computadores => *computadores += 1,
                TipoAtivo::Celulares => *celulares += 1,
            }
        }
    }

    meses
        .into_iter()
        .map(|(mes, (computadores, celulares))| PontoGraficoMes {
            mes,
            computadores,
            celulares,
        })
        .collect()
}
