use crate::model::{Employee, EmployeeId, Shift, ShiftId};

pub(super) fn find_shift_index(shifts: &[Shift], shift_id: &ShiftId) -> Option<usize> {
    shifts.iter().position(|s| &s.id == shift_id)
}

pub(super) fn find_employee_index(employees: &[Employee], id: &EmployeeId) -> Option<usize> {
    employees.iter().position(|e| &e.id == id)
}
