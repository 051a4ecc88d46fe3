//! Rapport d'analyse d'un roster : couverture, ventes, coûts, recommandations.

use crate::kpi::{coverage_percentage, labor_cost, ratio, total};
use crate::model::{Employee, EmployeeId, Shift, ShiftId, SHIFT_HOURS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seuils du rapport, surchargeables via le template de semaine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportThresholds {
    /// Un shift est « à forte valeur » à partir de cet objectif.
    pub high_value_sales: f64,
    /// Couverture minimale attendue (%).
    pub coverage_target: u32,
    pub efficiency_target: f64,
    /// Taux > moyenne × facteur ⇒ candidat à optimisation.
    pub high_cost_factor: f64,
}

impl Default for ReportThresholds {
    fn default() -> Self {
        Self {
            high_value_sales: 3000.0,
            coverage_target: 80,
            efficiency_target: 8.0,
            high_cost_factor: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftRef {
    pub shift_id: ShiftId,
    pub label: String,
    pub target_sales: f64,
}

impl ShiftRef {
    fn of(shift: &Shift) -> Self {
        Self {
            shift_id: shift.id.clone(),
            label: shift.label(),
            target_sales: shift.target_sales,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSection {
    pub total_shifts: usize,
    pub assigned_shifts: usize,
    pub coverage_percentage: Option<u32>,
    pub unassigned: Vec<ShiftRef>,
    pub high_value_total: usize,
    pub high_value_assigned: usize,
    pub high_value_unfilled: Vec<ShiftRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestMatch {
    pub shift: ShiftRef,
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub productivity_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSection {
    pub total_target_sales: f64,
    /// Σ objectif × productivité/100 sur les shifts assignés.
    pub total_expected_sales: f64,
    pub efficiency_ratio: f64,
    pub adjusted_efficiency_ratio: f64,
    pub best_matches: Vec<BestMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostCandidate {
    pub employee_id: EmployeeId,
    pub name: String,
    pub hourly_rate: f64,
    pub shift_count: usize,
    pub estimated_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSection {
    pub total_cost: f64,
    pub avg_hourly_rate: f64,
    pub high_cost: Vec<CostCandidate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Recommendation {
    FillUnassigned { count: usize },
    RaiseCoverage { coverage: u32, target: u32 },
    ImproveEfficiency { ratio: f64, target: f64 },
    ReviewHighCost { count: usize, factor: f64 },
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::FillUnassigned { count } => {
                write!(f, "Fill the {count} unassigned shift(s) to reach full coverage.")
            }
            Recommendation::RaiseCoverage { coverage, target } => write!(
                f,
                "Coverage is {coverage}%, below the {target}% target; schedule more staff or widen availability."
            ),
            Recommendation::ImproveEfficiency { ratio, target } => write!(
                f,
                "Efficiency ratio {ratio:.2} is below the {target:.1} target; put the most productive staff on high-value shifts."
            ),
            Recommendation::ReviewHighCost { count, factor } => write!(
                f,
                "Review {count} high-cost employee(s) paid more than {:.0}% above the average rate.",
                (factor - 1.0) * 100.0
            ),
        }
    }
}

const BALANCED: &str = "Roster is well balanced; no changes recommended.";
const BEST_MATCHES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub coverage: CoverageSection,
    pub sales: SalesSection,
    pub cost: CostSection,
    /// Vide quand rien n'est à signaler.
    pub recommendations: Vec<Recommendation>,
}

impl Report {
    /// Fonction pure de (shifts, employés) ; un roster vide donne un rapport vide mais valide.
    pub fn generate(shifts: &[Shift], employees: &[Employee], thresholds: &ReportThresholds) -> Self {
        let coverage = coverage_section(shifts, thresholds);
        let total_cost = labor_cost(shifts, employees);
        let sales = sales_section(shifts, employees, total_cost);
        let cost = cost_section(shifts, employees, total_cost, coverage.assigned_shifts, thresholds);
        let recommendations = recommend(&coverage, &sales, &cost, thresholds);
        Self {
            coverage,
            sales,
            cost,
            recommendations,
        }
    }
}

fn find<'a>(employees: &'a [Employee], id: &EmployeeId) -> Option<&'a Employee> {
    employees.iter().find(|e| &e.id == id)
}

fn coverage_section(shifts: &[Shift], thresholds: &ReportThresholds) -> CoverageSection {
    let assigned = shifts.iter().filter(|s| s.is_assigned()).count();
    let unassigned = shifts
        .iter()
        .filter(|s| !s.is_assigned())
        .map(ShiftRef::of)
        .collect();
    let high_value: Vec<&Shift> = shifts
        .iter()
        .filter(|s| s.target_sales >= thresholds.high_value_sales)
        .collect();
    CoverageSection {
        total_shifts: shifts.len(),
        assigned_shifts: assigned,
        coverage_percentage: coverage_percentage(assigned, shifts.len()),
        unassigned,
        high_value_total: high_value.len(),
        high_value_assigned: high_value.iter().filter(|s| s.is_assigned()).count(),
        high_value_unfilled: high_value
            .iter()
            .filter(|s| !s.is_assigned())
            .copied()
            .map(ShiftRef::of)
            .collect(),
    }
}

fn sales_section(shifts: &[Shift], employees: &[Employee], total_cost: f64) -> SalesSection {
    let total_target_sales = total(shifts.iter().map(|s| s.target_sales));

    let mut matches: Vec<BestMatch> = shifts
        .iter()
        .filter_map(|s| {
            let employee = find(employees, s.assigned.as_ref()?)?;
            Some(BestMatch {
                shift: ShiftRef::of(s),
                employee_id: employee.id.clone(),
                employee_name: employee.name.clone(),
                productivity_score: employee.productivity_score,
            })
        })
        .collect();

    let total_expected_sales = total(
        matches
            .iter()
            .map(|m| m.shift.target_sales * (m.productivity_score / 100.0)),
    );

    matches.sort_by(|a, b| b.productivity_score.total_cmp(&a.productivity_score));
    matches.truncate(BEST_MATCHES);

    SalesSection {
        total_target_sales,
        total_expected_sales,
        efficiency_ratio: ratio(total_target_sales, total_cost),
        adjusted_efficiency_ratio: ratio(total_expected_sales, total_cost),
        best_matches: matches,
    }
}

fn cost_section(
    shifts: &[Shift],
    employees: &[Employee],
    total_cost: f64,
    assigned: usize,
    thresholds: &ReportThresholds,
) -> CostSection {
    let avg_hourly_rate = ratio(total_cost, assigned as f64 * SHIFT_HOURS);
    let limit = avg_hourly_rate * thresholds.high_cost_factor;

    // sans moyenne définie, tout employé payé passerait le seuil
    if avg_hourly_rate <= 0.0 {
        return CostSection {
            total_cost,
            avg_hourly_rate,
            high_cost: Vec::new(),
        };
    }

    let mut high_cost: Vec<CostCandidate> = employees
        .iter()
        .filter(|e| e.hourly_rate > limit)
        .map(|e| {
            let shift_count = shifts
                .iter()
                .filter(|s| s.assigned.as_ref() == Some(&e.id))
                .count();
            CostCandidate {
                employee_id: e.id.clone(),
                name: e.name.clone(),
                hourly_rate: e.hourly_rate,
                shift_count,
                estimated_savings: (e.hourly_rate - avg_hourly_rate)
                    * shift_count as f64
                    * SHIFT_HOURS,
            }
        })
        .collect();
    high_cost.sort_by(|a, b| b.hourly_rate.total_cmp(&a.hourly_rate));

    CostSection {
        total_cost,
        avg_hourly_rate,
        high_cost,
    }
}

fn recommend(
    coverage: &CoverageSection,
    sales: &SalesSection,
    cost: &CostSection,
    thresholds: &ReportThresholds,
) -> Vec<Recommendation> {
    let mut out = Vec::new();
    if !coverage.unassigned.is_empty() {
        out.push(Recommendation::FillUnassigned {
            count: coverage.unassigned.len(),
        });
    }
    if let Some(pct) = coverage.coverage_percentage {
        if pct < thresholds.coverage_target {
            out.push(Recommendation::RaiseCoverage {
                coverage: pct,
                target: thresholds.coverage_target,
            });
        }
    }
    if cost.total_cost > 0.0 && sales.efficiency_ratio < thresholds.efficiency_target {
        out.push(Recommendation::ImproveEfficiency {
            ratio: sales.efficiency_ratio,
            target: thresholds.efficiency_target,
        });
    }
    if !cost.high_cost.is_empty() {
        out.push(Recommendation::ReviewHighCost {
            count: cost.high_cost.len(),
            factor: thresholds.high_cost_factor,
        });
    }
    out
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{title}")?;
    writeln!(f, "{}", "-".repeat(title.len()))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.coverage;
        heading(f, "COVERAGE ANALYSIS")?;
        match c.coverage_percentage {
            Some(pct) => writeln!(f, "Assigned shifts: {}/{} ({pct}%)", c.assigned_shifts, c.total_shifts)?,
            None => writeln!(f, "Assigned shifts: {}/{} (n/a)", c.assigned_shifts, c.total_shifts)?,
        }
        writeln!(f, "Unassigned shifts: {}", c.unassigned.len())?;
        for s in &c.unassigned {
            writeln!(f, "  - {} (${:.2})", s.label, s.target_sales)?;
        }
        writeln!(
            f,
            "High-value shifts: {}/{} covered",
            c.high_value_assigned, c.high_value_total
        )?;
        for s in &c.high_value_unfilled {
            writeln!(f, "  ! unfilled: {} (${:.2})", s.label, s.target_sales)?;
        }
        writeln!(f)?;

        let s = &self.sales;
        heading(f, "SALES OPTIMIZATION")?;
        writeln!(f, "Total target sales: ${:.2}", s.total_target_sales)?;
        writeln!(f, "Expected sales (productivity-adjusted): ${:.2}", s.total_expected_sales)?;
        writeln!(f, "Efficiency ratio: {:.2}", s.efficiency_ratio)?;
        writeln!(f, "Adjusted efficiency ratio: {:.2}", s.adjusted_efficiency_ratio)?;
        if !s.best_matches.is_empty() {
            writeln!(f, "Best matches:")?;
            for (rank, m) in s.best_matches.iter().enumerate() {
                writeln!(
                    f,
                    "  {}. {} -> {} (productivity {}, target ${:.2})",
                    rank + 1,
                    m.employee_name,
                    m.shift.label,
                    m.productivity_score,
                    m.shift.target_sales
                )?;
            }
        }
        writeln!(f)?;

        let k = &self.cost;
        heading(f, "COST MANAGEMENT")?;
        writeln!(f, "Total labor cost: ${:.2}", k.total_cost)?;
        writeln!(f, "Average hourly rate: ${:.2}", k.avg_hourly_rate)?;
        if k.high_cost.is_empty() {
            writeln!(f, "No high-cost outliers.")?;
        } else {
            writeln!(f, "Cost optimization candidates:")?;
            for e in &k.high_cost {
                writeln!(
                    f,
                    "  - {}: ${:.2}/hr, {} shift(s), est. savings ${:.2}",
                    e.name, e.hourly_rate, e.shift_count, e.estimated_savings
                )?;
            }
        }
        writeln!(f)?;

        heading(f, "RECOMMENDATIONS")?;
        if self.recommendations.is_empty() {
            write!(f, "- {BALANCED}")
        } else {
            let lines: Vec<String> = self.recommendations.iter().map(|r| format!("- {r}")).collect();
            write!(f, "{}", lines.join("\n"))
        }
    }
}
