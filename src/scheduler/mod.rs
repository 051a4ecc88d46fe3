mod gate;
mod manage;
mod matching;
mod types;
mod util;

pub use gate::check_assignment;
pub use manage::EmployeeUpdate;
pub use matching::{match_score, propose};
pub use types::{MatchRun, Proposal, SchedError, SCORE_TIE_EPSILON};

use crate::availability::Slot;
use crate::kpi::KpiSnapshot;
use crate::model::{Employee, EmployeeId, Roster, ShiftId};
use crate::report::{Report, ReportThresholds};
use crate::template::{generate_week, WeekTemplate};
use std::collections::HashSet;
use tracing::info;

/// Scheduler : encapsule le Roster de la semaine en cours
#[derive(Debug, Default)]
pub struct Scheduler {
    roster: Roster,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            roster: Roster::default(),
        }
    }

    pub fn from_roster(roster: Roster) -> Self {
        Self { roster }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }
    pub fn into_roster(self) -> Roster {
        self.roster
    }

    /// Remplace tous les shifts par les 14 de la semaine type (assignations perdues).
    pub fn initialize_week(&mut self, template: &WeekTemplate) -> anyhow::Result<()> {
        let shifts = generate_week(template)?;
        info!(template = %template.id, shifts = shifts.len(), "week initialized");
        self.roster.shifts = shifts;
        Ok(())
    }

    pub fn add_employee(&mut self, employee: Employee) -> Result<EmployeeId, SchedError> {
        manage::add_employee(self, employee)
    }

    pub fn update_employee(
        &mut self,
        id: &EmployeeId,
        update: EmployeeUpdate,
    ) -> Result<(), SchedError> {
        manage::update_employee(self, id, update)
    }

    pub fn remove_employee(&mut self, id: &EmployeeId) -> Result<Employee, SchedError> {
        manage::remove_employee(self, id)
    }

    pub fn set_availability(&mut self, employee: &EmployeeId, slot: Slot, available: bool) {
        self.roster
            .availability
            .set(employee.clone(), slot, available);
    }

    /// Employés disponibles (disponibilité fine) pour le créneau d'un shift.
    pub fn availability_for_shift(&self, shift_id: &ShiftId) -> Result<HashSet<EmployeeId>, SchedError> {
        let shift = self
            .roster
            .find_shift(shift_id)
            .ok_or_else(|| SchedError::UnknownShift(shift_id.as_str().to_string()))?;
        Ok(self.roster.availability.available_for_shift(shift))
    }

    /// Lance le moteur et applique ses propositions au roster.
    pub fn auto_assign(&mut self) -> MatchRun {
        let run = propose(&self.roster.shifts, &self.roster.employees);
        for proposal in &run.proposals {
            if let Some(shift) = self.roster.shifts.get_mut(proposal.shift_index) {
                if shift.assigned.is_none() {
                    shift.assigned = Some(proposal.employee_id.clone());
                }
            }
        }
        if run.is_empty() {
            info!("no assignments made");
        } else {
            info!(
                assigned = run.len(),
                unfilled = run.unfilled.len(),
                "automatic assignment committed"
            );
        }
        run
    }

    /// Assignation manuelle, soumise aux disponibilités déclarées.
    pub fn assign(&mut self, shift_id: &ShiftId, employee_id: &EmployeeId) -> Result<(), SchedError> {
        let available = self.availability_for_shift(shift_id)?;
        let pos = check_assignment(
            shift_id,
            employee_id,
            &available,
            &self.roster.shifts,
            &self.roster.employees,
        )?;
        self.roster.shifts[pos].assigned = Some(employee_id.clone());
        info!(
            shift = shift_id.as_str(),
            employee = employee_id.as_str(),
            "shift assigned"
        );
        Ok(())
    }

    /// Toujours permis ; renvoie l'ancien titulaire éventuel.
    pub fn unassign(&mut self, shift_id: &ShiftId) -> Result<Option<EmployeeId>, SchedError> {
        let shift = self
            .roster
            .find_shift_mut(shift_id)
            .ok_or_else(|| SchedError::UnknownShift(shift_id.as_str().to_string()))?;
        let previous = shift.assigned.take();
        info!(shift = shift_id.as_str(), "shift unassigned");
        Ok(previous)
    }

    pub fn kpis(&self) -> KpiSnapshot {
        KpiSnapshot::calculate(&self.roster.shifts, &self.roster.employees)
    }

    pub fn report(&self, thresholds: &ReportThresholds) -> Report {
        Report::generate(&self.roster.shifts, &self.roster.employees, thresholds)
    }
}
