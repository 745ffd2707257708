//! Classificação de garantias
//!
//! Status derivado, nunca armazenado: calculado a partir de
//! `termino_garantia` em relação à data da consulta.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Janela de alerta: garantias vencendo em até 120 dias
pub const ALERT_WINDOW_DAYS: i64 = 120;

/// Status de garantia derivado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusGarantia {
    /// Mais de 120 dias restantes
    Vigente,
    /// Entre 0 e 120 dias restantes
    Vencendo,
    /// Término no passado
    Vencida,
}

impl StatusGarantia {
    /// Classifica uma data de término em relação a `today`
    pub fn classify(end: NaiveDate, today: NaiveDate) -> Self {
        let dias = days_until(end, today);
        if dias < 0 {
            StatusGarantia::Vencida
        } else if dias <= ALERT_WINDOW_DAYS {
            StatusGarantia::Vencendo
        } else {
            StatusGarantia::Vigente
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusGarantia::Vigente => "vigente",
            StatusGarantia::Vencendo => "vencendo",
            StatusGarantia::Vencida => "vencida",
        }
    }

    /// Interpreta o valor de filtro vindo da query string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "vigente" => Some(StatusGarantia::Vigente),
            "vencendo" => Some(StatusGarantia::Vencendo),
            "vencida" => Some(StatusGarantia::Vencida),
            _ => None,
        }
    }
}

/// Dias inteiros até o término; negativo significa vencida
pub fn days_until(end: NaiveDate, today: NaiveDate) -> i64 {
    (end - today).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_boundary_120_days_is_vencendo() {
        let end = today() + Duration::days(120);
        assert_eq!(StatusGarantia::classify(end, today()), StatusGarantia::Vencendo);
    }

    #[test]
    fn test_boundary_121_days_is_vigente() {
        let end = today() + Duration::days(121);
        assert_eq!(StatusGarantia::classify(end, today()), StatusGarantia::Vigente);
    }

    #[test]
    fn test_yesterday_is_vencida() {
        let end = today() - Duration::days(1);
        assert_eq!(StatusGarantia::classify(end, today()), StatusGarantia::Vencida);
    }

    #[test]
    fn test_same_day_is_vencendo() {
        assert_eq!(StatusGarantia::classify(today(), today()), StatusGarantia::Vencendo);
    }

    #[test]
    fn test_days_until_negative_when_expired() {
        let end = today() - Duration::days(30);
        assert_eq!(days_until(end, today()), -30);
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(StatusGarantia::parse("vencendo"), Some(StatusGarantia::Vencendo));
        assert_eq!(StatusGarantia::parse("qualquer"), None);
    }
}
