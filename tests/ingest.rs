#![forbid(unsafe_code)]
use chrono::Weekday;
use shiftwise::{
    ingest::{normalize_employee, normalize_shift, RawEmployee, RawShift},
    io, EmployeeId, ShiftType, Slot,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn field_spellings_are_normalized_once() {
    let lower: RawEmployee = serde_json::from_str(
        r#"{"id":"emp_1","name":"Alice","hourly_rate":18.5,"productivity_score":72,"available_days":["Mon","tuesday"]}"#,
    )
    .unwrap();
    let upper: RawEmployee = serde_json::from_str(
        r#"{"Id":"emp_1","Name":"Alice","HourlyRate":18.5,"ProductivityScore":72,"AvailableDays":"Tuesday;Monday"}"#,
    )
    .unwrap();
    let camel: RawEmployee = serde_json::from_str(
        r#"{"employeeId":"emp_1","name":"Alice","hourlyRate":18.5,"productivityScore":72,"availableDays":"Mon,Tue"}"#,
    )
    .unwrap();

    let a = normalize_employee(lower).unwrap();
    let b = normalize_employee(upper).unwrap();
    let c = normalize_employee(camel).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(a.available_days, vec![Weekday::Mon, Weekday::Tue]);
}

#[test]
fn missing_days_default_to_the_whole_week_and_numeric_ids_are_accepted() {
    let raw: RawEmployee =
        serde_json::from_str(r#"{"ID":42,"Name":"Bob","rate":20,"productivity":55}"#).unwrap();
    let employee = normalize_employee(raw).unwrap();
    assert_eq!(employee.id, EmployeeId::new("42"));
    assert_eq!(employee.available_days.len(), 7);
}

#[test]
fn invalid_values_are_rejected_at_the_boundary() {
    let negative: RawEmployee =
        serde_json::from_str(r#"{"name":"Neg","hourly_rate":-1,"productivity_score":50}"#).unwrap();
    assert!(normalize_employee(negative).is_err());

    let bad_day: RawEmployee = serde_json::from_str(
        r#"{"name":"Odd","hourly_rate":10,"productivity_score":50,"available_days":["Funday"]}"#,
    )
    .unwrap();
    assert!(normalize_employee(bad_day).is_err());

    let zero_sales: RawShift = serde_json::from_str(
        r#"{"day":"Mon","shiftType":"Morning","startTime":"09:00","endTime":"15:00","targetSales":0}"#,
    )
    .unwrap();
    assert!(normalize_shift(zero_sales).is_err());
}

#[test]
fn shift_without_id_gets_a_slot_id() {
    let raw: RawShift = serde_json::from_str(
        r#"{"Day":"Saturday","ShiftType":"afternoon","StartTime":"15:00","EndTime":"21:00","TargetSales":4500,"AssignedEmployeeId":null}"#,
    )
    .unwrap();
    let shift = normalize_shift(raw).unwrap();
    assert_eq!(shift.id.as_str(), "saturday-afternoon");
    assert_eq!(shift.shift_type, ShiftType::Afternoon);
    assert!(shift.assigned.is_none());
}

#[test]
fn csv_imports_go_through_the_same_boundary() {
    let dir = tempdir().unwrap();
    let employees = dir.path().join("employees.csv");
    fs::write(
        &employees,
        "EmployeeId,Name,HourlyRate,ProductivityScore,AvailableDays\n\
         7,Alice,18,80,Mon;Tue\n\
         emp_9,Bob,22.5,65,\n",
    )
    .unwrap();
    let staff = io::import_employees(&employees).unwrap();
    assert_eq!(staff.len(), 2);
    assert_eq!(staff[0].id, EmployeeId::new("7"));
    assert_eq!(staff[0].available_days, vec![Weekday::Mon, Weekday::Tue]);
    assert_eq!(staff[1].available_days.len(), 7);

    let availability = dir.path().join("availability.csv");
    fs::write(
        &availability,
        "employeeId,slotNumber,isAvailable\n7,1,true\nemp_9,2,no\nemp_9,14,1\n",
    )
    .unwrap();
    let records = io::import_availability(&availability).unwrap();
    assert_eq!(
        records,
        vec![
            (EmployeeId::new("7"), Slot::new(1).unwrap(), true),
            (EmployeeId::new("emp_9"), Slot::new(2).unwrap(), false),
            (EmployeeId::new("emp_9"), Slot::new(14).unwrap(), true),
        ]
    );

    let bad = dir.path().join("bad.csv");
    fs::write(&bad, "employee_id,slot,available\n7,15,true\n").unwrap();
    assert!(io::import_availability(&bad).is_err());
}

#[test]
fn json_shift_import_and_csv_export() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("shifts.json");
    fs::write(
        &input,
        r#"[{"id":"x","day":"Mon","shift_type":"Morning","start":"09:00","end":"15:00","target_sales":2500,"assigned":"emp_1"}]"#,
    )
    .unwrap();
    let shifts = io::import_shifts(&input).unwrap();
    assert_eq!(shifts.len(), 1);
    assert_eq!(shifts[0].assigned, Some(EmployeeId::new("emp_1")));

    let roster = shiftwise::Roster {
        shifts,
        ..Default::default()
    };
    let out = dir.path().join("shifts.csv");
    io::export_shifts_csv(&out, &roster).unwrap();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("id,day,shift_type,start,end,target_sales,assigned_employee\n"));
    // unknown employee exports as an empty cell
    assert!(text.contains("x,Monday,Morning,09:00,15:00,2500.00,\n"));
}

#[test]
fn csv_ids_keep_their_leading_zeros() {
    let dir = tempdir().unwrap();
    let employees = dir.path().join("employees.csv");
    fs::write(&employees, "id,name,hourly_rate,productivity_score\n007,Alice,18,80\n").unwrap();
    let staff = io::import_employees(&employees).unwrap();
    assert_eq!(staff[0].id, EmployeeId::new("007"));

    let availability = dir.path().join("availability.csv");
    fs::write(&availability, "employee_id,slot,available\n007,03,yes\n").unwrap();
    let records = io::import_availability(&availability).unwrap();
    assert_eq!(records, vec![(EmployeeId::new("007"), Slot::new(3).unwrap(), true)]);

    let shifts = dir.path().join("shifts.csv");
    fs::write(
        &shifts,
        "id,day,shift_type,start,end,target_sales,assigned_employee_id\n\
         0100,Mon,Morning,09:00,15:00,1000,007\n",
    )
    .unwrap();
    let imported = io::import_shifts(&shifts).unwrap();
    assert_eq!(imported[0].id.as_str(), "0100");
    assert_eq!(imported[0].assigned, Some(EmployeeId::new("007")));
}

#[test]
fn scalar_json_ids_are_kept_as_text() {
    let decimal: RawEmployee =
        serde_json::from_str(r#"{"id":1.5,"name":"Ann","hourly_rate":"15","productivity_score":60}"#)
            .unwrap();
    let flag: RawEmployee =
        serde_json::from_str(r#"{"id":true,"name":"Ben","hourly_rate":15,"productivity_score":60}"#)
            .unwrap();
    assert_eq!(normalize_employee(decimal).unwrap().id, EmployeeId::new("1.5"));
    assert_eq!(normalize_employee(flag).unwrap().id, EmployeeId::new("true"));
}

#[test]
fn shift_import_rejects_repeated_ids() {
    let dir = tempdir().unwrap();
    let shifts = dir.path().join("shifts.csv");
    fs::write(
        &shifts,
        "day,shift_type,start,end,target_sales,assigned_employee_id\n\
         Mon,Morning,09:00,15:00,1000,emp_old\n\
         Mon,Morning,09:00,15:00,5000,\n",
    )
    .unwrap();
    let err = io::import_shifts(&shifts).unwrap_err();
    assert!(err.to_string().contains("duplicate shift id monday-morning"));

    let explicit = dir.path().join("explicit.json");
    fs::write(
        &explicit,
        r#"[{"id":"a","day":"Mon","shift_type":"Morning","start":"09:00","end":"15:00","target_sales":1000},
            {"id":"a","day":"Tue","shift_type":"Morning","start":"09:00","end":"15:00","target_sales":1000}]"#,
    )
    .unwrap();
    assert!(io::import_shifts(&explicit).is_err());
}
