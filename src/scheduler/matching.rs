use super::types::{MatchRun, Proposal, SCORE_TIE_EPSILON};
use crate::model::{Employee, EmployeeId, Shift};
use std::collections::HashMap;
use tracing::debug;

/// Charge accumulée pendant un passage ; jamais partagée entre deux appels.
type Loads = HashMap<EmployeeId, u32>;

/// Remplit les shifts non assignés, du plus gros objectif de ventes au plus
/// petit. Les shifts déjà assignés ne sont jamais touchés.
pub fn propose(shifts: &[Shift], employees: &[Employee]) -> MatchRun {
    let mut open: Vec<(usize, &Shift)> = shifts
        .iter()
        .enumerate()
        .filter(|(_, s)| s.assigned.is_none())
        .collect();
    // tri stable : à objectif égal, l'ordre d'entrée est conservé
    open.sort_by(|(_, a), (_, b)| b.target_sales.total_cmp(&a.target_sales));

    let (run, _loads) = open.into_iter().fold(
        (MatchRun::default(), Loads::new()),
        |(mut run, mut loads), (shift_index, shift)| {
            match pick(shift, employees, &loads) {
                Some((employee, score)) => {
                    debug!(
                        shift = shift.id.as_str(),
                        employee = employee.id.as_str(),
                        score,
                        "matched"
                    );
                    *loads.entry(employee.id.clone()).or_insert(0) += 1;
                    run.proposals.push(Proposal {
                        shift_index,
                        shift_id: shift.id.clone(),
                        employee_id: employee.id.clone(),
                        score,
                    });
                }
                None => {
                    debug!(shift = shift.id.as_str(), "no eligible employee");
                    run.unfilled.push(shift.id.clone());
                }
            }
            (run, loads)
        },
    );

    run
}

/// `(productivité × objectif) / (taux × (charge + 1))`.
pub fn match_score(employee: &Employee, shift: &Shift, load: u32) -> f64 {
    let score = (employee.productivity_score * shift.target_sales)
        / (employee.hourly_rate * f64::from(load + 1));
    if score.is_nan() {
        0.0
    } else {
        score
    }
}

fn pick<'a>(shift: &Shift, employees: &'a [Employee], loads: &Loads) -> Option<(&'a Employee, f64)> {
    let load_of = |e: &Employee| loads.get(&e.id).copied().unwrap_or(0);

    employees
        .iter()
        .filter(|e| e.is_available_on(shift.day))
        .map(|e| (e, match_score(e, shift, load_of(e)), load_of(e)))
        .fold(None, |best: Option<(&Employee, f64, u32)>, cand| match best {
            None => Some(cand),
            Some(current) => {
                let (_, best_score, best_load) = current;
                let (_, score, load) = cand;
                if (score - best_score).abs() < SCORE_TIE_EPSILON {
                    // quasi-égalité : le moins chargé l'emporte
                    if load < best_load {
                        Some(cand)
                    } else {
                        Some(current)
                    }
                } else if score > best_score {
                    Some(cand)
                } else {
                    Some(current)
                }
            }
        })
        .map(|(e, score, _)| (e, score))
}
