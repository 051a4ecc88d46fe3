use super::{util, SchedError, Scheduler};
use crate::model::{canonical_days, Employee, EmployeeId};
use chrono::Weekday;
use tracing::info;

/// Modification partielle d'un employé ; `None` = inchangé.
#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub hourly_rate: Option<f64>,
    pub productivity_score: Option<f64>,
    pub available_days: Option<Vec<Weekday>>,
}

pub(super) fn add_employee(
    scheduler: &mut Scheduler,
    employee: Employee,
) -> Result<EmployeeId, SchedError> {
    if scheduler.roster.find_employee(&employee.id).is_some() {
        return Err(SchedError::DuplicateEmployee(employee.id.as_str().to_string()));
    }
    // revalide ce qui a pu être construit à la main
    Employee::new(employee.name.clone(), employee.hourly_rate, employee.productivity_score)
        .map_err(SchedError::InvalidEmployee)?;
    let id = employee.id.clone();
    info!(employee = id.as_str(), name = %employee.name, "employee added");
    scheduler.roster.employees.push(employee);
    Ok(id)
}

pub(super) fn update_employee(
    scheduler: &mut Scheduler,
    id: &EmployeeId,
    update: EmployeeUpdate,
) -> Result<(), SchedError> {
    let Some(pos) = util::find_employee_index(&scheduler.roster.employees, id) else {
        return Err(SchedError::UnknownEmployee(id.as_str().to_string()));
    };
    let current = &scheduler.roster.employees[pos];
    let mut next = Employee::new(
        update.name.unwrap_or_else(|| current.name.clone()),
        update.hourly_rate.unwrap_or(current.hourly_rate),
        update.productivity_score.unwrap_or(current.productivity_score),
    )
    .map_err(SchedError::InvalidEmployee)?
    .with_id(id.clone());
    next.available_days = match update.available_days {
        Some(days) => canonical_days(days),
        None => current.available_days.clone(),
    };
    scheduler.roster.employees[pos] = next;
    info!(employee = id.as_str(), "employee updated");
    Ok(())
}

/// Supprime l'employé, libère ses shifts et oublie ses disponibilités.
pub(super) fn remove_employee(
    scheduler: &mut Scheduler,
    id: &EmployeeId,
) -> Result<Employee, SchedError> {
    let Some(pos) = util::find_employee_index(&scheduler.roster.employees, id) else {
        return Err(SchedError::UnknownEmployee(id.as_str().to_string()));
    };
    let removed = scheduler.roster.employees.remove(pos);
    let mut freed = 0usize;
    for shift in scheduler
        .roster
        .shifts
        .iter_mut()
        .filter(|s| s.assigned.as_ref() == Some(id))
    {
        shift.assigned = None;
        freed += 1;
    }
    scheduler.roster.availability.remove_employee(id);
    info!(employee = id.as_str(), freed, "employee removed");
    Ok(removed)
}
