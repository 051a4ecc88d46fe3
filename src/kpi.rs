//! Indicateurs agrégés d'un roster.
//!
//! | Indicateur | Définition |
//! |------------|-----------|
//! | Coût total | Σ (taux horaire × 6 h) sur les shifts assignés |
//! | Ventes cibles | Σ objectifs sur **tous** les shifts |
//! | Efficacité | ventes ÷ coût, 0 si coût nul |
//! | Couverture | round(assignés ÷ total × 100), `None` sans shift |

use crate::model::{Employee, Shift};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub total_cost: f64,
    pub total_target_sales: f64,
    pub efficiency_ratio: f64,
    /// `None` quand il n'y a aucun shift : « pas de données ».
    pub coverage_percentage: Option<u32>,
}

impl KpiSnapshot {
    /// Fonction pure de (shifts, employés).
    pub fn calculate(shifts: &[Shift], employees: &[Employee]) -> Self {
        let total_cost = labor_cost(shifts, employees);
        let total_target_sales = total(shifts.iter().map(|s| s.target_sales));
        let efficiency_ratio = ratio(total_target_sales, total_cost);
        let assigned = shifts.iter().filter(|s| s.is_assigned()).count();

        Self {
            total_cost,
            total_target_sales,
            efficiency_ratio,
            coverage_percentage: coverage_percentage(assigned, shifts.len()),
        }
    }

    pub fn coverage_or_zero(&self) -> u32 {
        self.coverage_percentage.unwrap_or(0)
    }
}

impl fmt::Display for KpiSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total labor cost:   ${:.2}", self.total_cost)?;
        writeln!(f, "Total target sales: ${:.2}", self.total_target_sales)?;
        writeln!(f, "Efficiency ratio:   {:.2}", self.efficiency_ratio)?;
        match self.coverage_percentage {
            Some(pct) => write!(f, "Coverage:           {pct}%"),
            None => write!(f, "Coverage:           n/a"),
        }
    }
}

/// Σ taux × heures sur les shifts assignés ; un employé inconnu ne coûte rien.
pub(crate) fn labor_cost(shifts: &[Shift], employees: &[Employee]) -> f64 {
    total(shifts.iter().filter_map(|s| {
        let id = s.assigned.as_ref()?;
        let employee = employees.iter().find(|e| &e.id == id)?;
        Some(employee.hourly_rate * s.hours())
    }))
}

/// Somme partant de +0.0 (un `sum()` vide donnerait -0.0).
pub(crate) fn total<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub(crate) fn coverage_percentage(assigned: usize, total: usize) -> Option<u32> {
    if total == 0 {
        return None;
    }
    Some((assigned as f64 / total as f64 * 100.0).round() as u32)
}
