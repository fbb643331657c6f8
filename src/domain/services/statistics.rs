use serde::Serialize;
use std::collections::HashMap;
use crate::domain::models::{procedure::Procedure, reservation::ReservationLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PopularityLevel {
    MostPopular,
    VeryPopular,
    Popular,
    Average,
    LessPopular,
    Unpopular,
    LeastPopular,
}

#[derive(Debug, Serialize)]
pub struct ProcedureStats {
    pub procedure_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub procedure_type: String,
    pub price: f64,
    pub count: usize,
    pub percentage: f64,
    pub popularity: PopularityLevel,
}

fn count_by_procedure(logs: &[ReservationLog]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for log in logs {
        *counts.entry(log.procedure_id.as_str()).or_default() += 1;
    }
    counts
}

/// Reservation counts and popularity level per procedure, most booked first.
///
/// Logs for procedures that no longer exist are ignored by the per-procedure
/// counts but still contribute to the total used for percentages.
pub fn procedure_stats(procedures: &[Procedure], logs: &[ReservationLog]) -> Vec<ProcedureStats> {
    let counts = count_by_procedure(logs);
    let total = logs.len();

    let per_procedure: Vec<usize> = procedures
        .iter()
        .map(|p| counts.get(p.id.as_str()).copied().unwrap_or(0))
        .collect();
    let max_count = per_procedure.iter().copied().max().unwrap_or(0).max(1);
    let min_count = per_procedure.iter().copied().min().unwrap_or(0);

    let mut stats: Vec<ProcedureStats> = procedures
        .iter()
        .zip(per_procedure)
        .map(|(procedure, count)| {
            let percentage = if total > 0 { count as f64 / total as f64 * 100.0 } else { 0.0 };

            let popularity = if total == 0 {
                PopularityLevel::Average
            } else if count == max_count && count > 0 {
                PopularityLevel::MostPopular
            } else if count == min_count && procedures.len() > 1 {
                PopularityLevel::LeastPopular
            } else {
                let percentile = count as f64 / max_count as f64 * 100.0;
                match percentile {
                    p if p >= 80.0 => PopularityLevel::VeryPopular,
                    p if p >= 60.0 => PopularityLevel::Popular,
                    p if p >= 40.0 => PopularityLevel::Average,
                    p if p >= 20.0 => PopularityLevel::LessPopular,
                    _ => PopularityLevel::Unpopular,
                }
            };

            ProcedureStats {
                procedure_id: procedure.id.clone(),
                name: procedure.name.clone(),
                procedure_type: procedure.procedure_type.clone(),
                price: procedure.price,
                count,
                percentage,
                popularity,
            }
        })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Procedure ids ordered by log count (ties broken by id), at most `limit`.
pub fn most_booked_ids(logs: &[ReservationLog], limit: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = count_by_procedure(logs)
        .into_iter()
        .map(|(id, count)| (id.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}
