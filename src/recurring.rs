//! Detection of services that repeat sooner than they should.
//!
//! Records are grouped by their exact service type. Within a group the window
//! is anchored at the most recent service and reaches back the type's minimum
//! interval, so only a recent cluster is reported; an old cluster with no
//! recent repeat is left alone.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::dates;
use crate::models::{MaintenanceRecord, RecurringEvent, RecurringProblem};

pub const DEFAULT_MIN_INTERVAL_MONTHS: u32 = 3;

struct ServiceProfile {
    service_type: &'static str,
    min_interval_months: u32,
    suggestions: &'static [&'static str],
}

const SERVICE_PROFILES: &[ServiceProfile] = &[
    ServiceProfile {
        service_type: "Alinhamento",
        min_interval_months: 4,
        suggestions: &[
            "Verifique a suspensão e os terminais de direção",
            "Confira se os pneus apresentam desgaste irregular",
            "Evite buracos e meios-fios, que desalinham a direção",
        ],
    },
    ServiceProfile {
        service_type: "Balanceamento",
        min_interval_months: 4,
        suggestions: &[
            "Inspecione os pneus em busca de bolhas ou deformações",
            "Verifique se as rodas não estão empenadas",
        ],
    },
    ServiceProfile {
        service_type: "Troca de Óleo",
        min_interval_months: 3,
        suggestions: &[
            "Verifique se há vazamentos de óleo no motor",
            "Confirme se o óleo usado segue a especificação do fabricante",
            "Consumo elevado de óleo pode indicar desgaste de anéis ou retentores",
        ],
    },
    ServiceProfile {
        service_type: "Troca de Filtro de Ar",
        min_interval_months: 6,
        suggestions: &["Confira a vedação da caixa do filtro de ar"],
    },
    ServiceProfile {
        service_type: "Troca de Pastilhas de Freio",
        min_interval_months: 6,
        suggestions: &[
            "Verifique o estado dos discos de freio",
            "Pinças travadas causam desgaste prematuro das pastilhas",
        ],
    },
    ServiceProfile {
        service_type: "Troca de Bateria",
        min_interval_months: 12,
        suggestions: &[
            "Teste o alternador e o sistema de carga",
            "Procure consumidores de corrente com o carro desligado",
        ],
    },
    ServiceProfile {
        service_type: "Troca de Pneus",
        min_interval_months: 12,
        suggestions: &[
            "Faça alinhamento e balanceamento junto com a troca",
            "Mantenha a calibragem recomendada pelo fabricante",
        ],
    },
    ServiceProfile {
        service_type: "Revisão",
        min_interval_months: 6,
        suggestions: &["Peça à oficina o relatório detalhado da última revisão"],
    },
];

const GENERIC_SUGGESTIONS: &[&str] = &[
    "Serviço repetido em pouco tempo: peça um diagnóstico completo à oficina",
    "Guarde as notas fiscais para acionar a garantia do serviço",
];

fn profile(service_type: &str) -> Option<&'static ServiceProfile> {
    SERVICE_PROFILES
        .iter()
        .find(|p| p.service_type == service_type)
}

pub fn min_interval_months(service_type: &str) -> u32 {
    profile(service_type).map_or(DEFAULT_MIN_INTERVAL_MONTHS, |p| p.min_interval_months)
}

pub fn suggestions_for(service_type: &str) -> Vec<String> {
    profile(service_type)
        .map_or(GENERIC_SUGGESTIONS, |p| p.suggestions)
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Service types with a known interval, in table order.
pub fn known_service_types() -> impl Iterator<Item = &'static str> {
    SERVICE_PROFILES.iter().map(|p| p.service_type)
}

fn describe(count: usize, within_months: u32) -> String {
    let span = match within_months {
        0 => "menos de 1 mês".to_string(),
        1 => "1 mês".to_string(),
        m => format!("{m} meses"),
    };
    if count == 2 {
        format!("2 vezes em {span}")
    } else {
        format!("{count} vezes em apenas {span}")
    }
}

pub fn find_recurring_problems(records: &[MaintenanceRecord]) -> Vec<RecurringProblem> {
    let mut groups: BTreeMap<&str, Vec<&MaintenanceRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.service_type.as_str())
            .or_default()
            .push(record);
    }

    let mut problems: Vec<RecurringProblem> = groups
        .into_iter()
        .filter(|(_, group)| group.len() >= 2)
        .filter_map(|(service_type, group)| detect_cluster(service_type, &group))
        .collect();

    problems.sort_by(|a, b| b.count.cmp(&a.count));
    problems
}

fn detect_cluster(service_type: &str, group: &[&MaintenanceRecord]) -> Option<RecurringProblem> {
    let mut dated: Vec<(NaiveDate, &MaintenanceRecord)> = group
        .iter()
        .filter_map(|r| dates::parse_date(&r.date).map(|d| (d, *r)))
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let anchor = dated.first()?.0;
    let window_start = dates::subtract_months(anchor, min_interval_months(service_type));

    let cluster: Vec<(NaiveDate, &MaintenanceRecord)> = dated
        .into_iter()
        .filter(|(date, _)| *date >= window_start && *date <= anchor)
        .collect();

    if cluster.len() < 2 {
        return None;
    }

    let oldest = cluster[cluster.len() - 1].0;
    let within_months = dates::months_between_ceil(oldest, anchor);
    let count = cluster.len();

    let events = cluster
        .iter()
        .map(|(date, record)| RecurringEvent {
            id: record.id.id.to_string(),
            date: dates::to_iso(*date),
            cost: record.cost,
            odometer: record.odometer,
        })
        .collect();

    Some(RecurringProblem {
        service_type: service_type.to_string(),
        count,
        within_months,
        events,
        reason: describe(count, within_months),
        suggestions: suggestions_for(service_type),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use surrealdb::sql::Thing;

    fn record(id: &str, service_type: &str, date: &str) -> MaintenanceRecord {
        MaintenanceRecord {
            id: Thing::from(("maintenance", id)),
            service_type: service_type.to_string(),
            date: date.to_string(),
            cost: None,
            odometer: None,
            workshop: None,
            notes: None,
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(find_recurring_problems(&[]).is_empty());
    }

    #[test]
    fn test_single_record_per_type() {
        let records = vec![
            record("a", "Alinhamento", "2024-01-10"),
            record("b", "Troca de Óleo", "2024-01-12"),
        ];
        assert!(find_recurring_problems(&records).is_empty());
    }

    #[test]
    fn test_two_alignments_within_interval() {
        let mut first = record("a", "Alinhamento", "2024-01-10");
        first.cost = Some(dec!(120.00));
        first.odometer = Some(41000);
        let records = vec![first, record("b", "Alinhamento", "2024-02-15")];

        let problems = find_recurring_problems(&records);
        assert_eq!(problems.len(), 1);

        let problem = &problems[0];
        assert_eq!(problem.service_type, "Alinhamento");
        assert_eq!(problem.count, 2);
        assert_eq!(problem.within_months, 2);
        assert_eq!(problem.reason, "2 vezes em 2 meses");
        assert_eq!(problem.events[0].id, "b");
        assert_eq!(problem.events[1].id, "a");
        assert_eq!(problem.events[1].cost, Some(dec!(120.00)));
        assert_eq!(problem.events[1].odometer, Some(41000));
        assert!(!problem.suggestions.is_empty());
    }

    #[test]
    fn test_record_outside_window_is_excluded() {
        let records = vec![
            record("a", "Alinhamento", "2024-01-10"),
            record("b", "Alinhamento", "2024-02-15"),
            record("c", "Alinhamento", "2023-06-01"),
        ];

        let problems = find_recurring_problems(&records);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].count, 2);
        assert!(problems[0].events.iter().all(|e| e.id != "c"));
    }

    #[test]
    fn test_historical_cluster_without_recent_repeat() {
        let records = vec![
            record("a", "Troca de Óleo", "2022-01-01"),
            record("b", "Troca de Óleo", "2022-02-01"),
            record("c", "Troca de Óleo", "2024-01-01"),
        ];
        assert!(find_recurring_problems(&records).is_empty());
    }

    #[test]
    fn test_interval_depends_on_type() {
        // 3.5 months apart: inside the 4 month alignment window,
        // outside the 3 month oil change window
        let records = vec![
            record("a", "Alinhamento", "2024-01-01"),
            record("b", "Alinhamento", "2024-04-15"),
            record("c", "Troca de Óleo", "2024-01-01"),
            record("d", "Troca de Óleo", "2024-04-15"),
        ];

        let problems = find_recurring_problems(&records);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].service_type, "Alinhamento");
    }

    #[test]
    fn test_localized_dates_are_read() {
        let records = vec![
            record("a", "Balanceamento", "10/01/2024"),
            record("b", "Balanceamento", "2024-02-15"),
        ];

        let problems = find_recurring_problems(&records);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].events[1].date, "2024-01-10");
    }

    #[test]
    fn test_undated_records_are_ignored() {
        let records = vec![
            record("a", "Alinhamento", "2024-02-15"),
            record("b", "Alinhamento", ""),
            record("c", "Alinhamento", "31/04/2024"),
        ];
        assert!(find_recurring_problems(&records).is_empty());
    }

    #[test]
    fn test_three_or_more_wording() {
        let records = vec![
            record("a", "Troca de Óleo", "2024-01-05"),
            record("b", "Troca de Óleo", "2024-02-05"),
            record("c", "Troca de Óleo", "2024-03-05"),
        ];

        let problems = find_recurring_problems(&records);
        assert_eq!(problems[0].count, 3);
        assert_eq!(problems[0].within_months, 2);
        assert_eq!(problems[0].reason, "3 vezes em apenas 2 meses");
    }

    #[test]
    fn test_same_day_wording() {
        let records = vec![
            record("a", "Revisão", "2024-03-05"),
            record("b", "Revisão", "2024-03-05"),
        ];

        let problems = find_recurring_problems(&records);
        assert_eq!(problems[0].within_months, 0);
        assert_eq!(problems[0].reason, "2 vezes em menos de 1 mês");
    }

    #[test]
    fn test_grouping_is_exact_match() {
        let records = vec![
            record("a", "Alinhamento", "2024-01-10"),
            record("b", "alinhamento", "2024-02-15"),
        ];
        assert!(find_recurring_problems(&records).is_empty());
    }

    #[test]
    fn test_unlisted_type_uses_defaults() {
        assert_eq!(min_interval_months("Lavagem"), DEFAULT_MIN_INTERVAL_MONTHS);

        let records = vec![
            record("a", "Lavagem", "2024-01-10"),
            record("b", "Lavagem", "2024-02-15"),
        ];

        let problems = find_recurring_problems(&records);
        assert_eq!(problems.len(), 1);
        assert_eq!(
            problems[0].suggestions,
            GENERIC_SUGGESTIONS
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_sorted_by_count_descending() {
        let records = vec![
            record("a", "Alinhamento", "2024-01-10"),
            record("b", "Alinhamento", "2024-02-15"),
            record("c", "Troca de Óleo", "2024-01-05"),
            record("d", "Troca de Óleo", "2024-02-05"),
            record("e", "Troca de Óleo", "2024-03-05"),
        ];

        let problems = find_recurring_problems(&records);
        assert_eq!(problems.len(), 2);
        assert_eq!(problems[0].service_type, "Troca de Óleo");
        assert_eq!(problems[1].service_type, "Alinhamento");
    }

    #[test]
    fn test_known_service_types() {
        let known: Vec<_> = known_service_types().collect();
        assert!(known.contains(&"Alinhamento"));
        assert!(known.contains(&"Troca de Óleo"));
    }
}
