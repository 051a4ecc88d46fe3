use super::{util, SchedError};
use crate::model::{Employee, EmployeeId, Shift, ShiftId};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Valide une assignation manuelle (glisser-déposer) et renvoie l'index du
/// shift à modifier.
///
/// `available` est l'ensemble des employés ayant déclaré une disponibilité
/// pour le créneau du shift. Un ensemble vide laisse passer : on ne sait pas
/// distinguer « personne n'est disponible » de « données pas encore chargées ».
pub fn check_assignment(
    shift_id: &ShiftId,
    employee_id: &EmployeeId,
    available: &HashSet<EmployeeId>,
    shifts: &[Shift],
    employees: &[Employee],
) -> Result<usize, SchedError> {
    let Some(pos) = util::find_shift_index(shifts, shift_id) else {
        return Err(SchedError::UnknownShift(shift_id.as_str().to_string()));
    };
    let employee = employees
        .iter()
        .find(|e| &e.id == employee_id)
        .ok_or_else(|| SchedError::UnknownEmployee(employee_id.as_str().to_string()))?;

    if available.is_empty() {
        debug!(
            shift = shift_id.as_str(),
            "no availability data for slot, allowing assignment"
        );
        return Ok(pos);
    }

    if !available.contains(employee_id) {
        warn!(
            shift = shift_id.as_str(),
            employee = employee_id.as_str(),
            "assignment rejected: employee not available"
        );
        return Err(SchedError::AssignmentNotAvailable {
            employee: employee.name.clone(),
            shift: shifts[pos].label(),
        });
    }

    Ok(pos)
}
