#![forbid(unsafe_code)]
use chrono::{NaiveTime, Weekday};
use shiftwise::{
    generate_week, scheduler::propose, Employee, EmployeeId, KpiSnapshot, Scheduler, Shift,
    ShiftId, ShiftType, WeekTemplate,
};

fn shift(id: &str, day: Weekday, shift_type: ShiftType, sales: f64) -> Shift {
    let (start, end) = match shift_type {
        ShiftType::Morning => (9, 15),
        _ => (15, 21),
    };
    Shift::new(
        ShiftId::new(id),
        day,
        shift_type,
        NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
        sales,
    )
    .unwrap()
}

fn employee(id: &str, rate: f64, productivity: f64) -> Employee {
    Employee::new(id.to_uppercase(), rate, productivity)
        .unwrap()
        .with_id(EmployeeId::new(id))
}

#[test]
fn full_week_without_employees_makes_no_assignment() {
    let shifts = generate_week(&WeekTemplate::default()).unwrap();
    assert_eq!(shifts.len(), 14);

    let run = propose(&shifts, &[]);
    assert!(run.is_empty());
    assert_eq!(run.unfilled.len(), 14);

    let kpi = KpiSnapshot::calculate(&shifts, &[]);
    assert_eq!(kpi.coverage_percentage, Some(0));
    assert_eq!(kpi.total_cost, 0.0);
    assert_eq!(kpi.efficiency_ratio, 0.0);
}

#[test]
fn highest_sales_shift_is_served_first_and_sole_candidate_takes_both() {
    let mut s = Scheduler::new();
    s.roster_mut().shifts = vec![
        shift("tue-am", Weekday::Tue, ShiftType::Morning, 1000.0),
        shift("mon-am", Weekday::Mon, ShiftType::Morning, 5000.0),
    ];
    let solo = employee("emp_1", 20.0, 80.0).with_days([Weekday::Mon, Weekday::Tue]);
    s.add_employee(solo).unwrap();

    let run = s.auto_assign();
    assert_eq!(run.len(), 2);
    assert_eq!(run.proposals[0].shift_id, ShiftId::new("mon-am"));
    assert_eq!(run.proposals[1].shift_id, ShiftId::new("tue-am"));
    assert!(run.proposals.iter().all(|p| p.employee_id == EmployeeId::new("emp_1")));
    // second pick is divided by (1 + 1)
    assert!((run.proposals[0].score - 80.0 * 5000.0 / 20.0).abs() < 1e-9);
    assert!((run.proposals[1].score - 80.0 * 1000.0 / 40.0).abs() < 1e-9);

    assert_eq!(s.kpis().total_cost, 240.0);
    assert_eq!(s.kpis().coverage_percentage, Some(100));
}

#[test]
fn already_assigned_shifts_are_left_alone() {
    let mut taken = shift("mon-am", Weekday::Mon, ShiftType::Morning, 9000.0);
    taken.assigned = Some(EmployeeId::new("emp_old"));
    let open = shift("mon-pm", Weekday::Mon, ShiftType::Afternoon, 100.0);
    let shifts = vec![taken.clone(), open];

    let run = propose(&shifts, &[employee("emp_1", 10.0, 50.0)]);
    assert_eq!(run.len(), 1);
    assert_eq!(run.proposals[0].shift_id, ShiftId::new("mon-pm"));
    assert_eq!(shifts[0], taken);
}

#[test]
fn weekday_list_filters_candidates() {
    let shifts = vec![
        shift("sat-am", Weekday::Sat, ShiftType::Morning, 3000.0),
        shift("mon-am", Weekday::Mon, ShiftType::Morning, 2000.0),
    ];
    let weekday_only = employee("emp_1", 15.0, 70.0).with_days([Weekday::Mon, Weekday::Fri]);

    let run = propose(&shifts, &[weekday_only]);
    assert_eq!(run.len(), 1);
    assert_eq!(run.proposals[0].shift_id, ShiftId::new("mon-am"));
    assert_eq!(run.unfilled, vec![ShiftId::new("sat-am")]);
}

#[test]
fn near_equal_scores_go_to_the_less_loaded_employee() {
    let shifts = vec![
        shift("mon-am", Weekday::Mon, ShiftType::Morning, 1000.0),
        shift("mon-pm", Weekday::Mon, ShiftType::Afternoon, 1000.0),
    ];
    let cheap = employee("emp_a", 10.0, 100.0);
    // 4999.9995 against 5000 on the second shift
    let pricey = employee("emp_b", 20.0, 99.9999);

    let run = propose(&shifts, &[cheap, pricey]);
    assert_eq!(run.proposals[0].employee_id, EmployeeId::new("emp_a"));
    assert_eq!(run.proposals[1].employee_id, EmployeeId::new("emp_b"));
}

#[test]
fn clear_score_gap_beats_load_balancing() {
    let shifts = vec![
        shift("mon-am", Weekday::Mon, ShiftType::Morning, 1000.0),
        shift("mon-pm", Weekday::Mon, ShiftType::Afternoon, 1000.0),
    ];
    let star = employee("emp_a", 10.0, 100.0);
    let weak = employee("emp_b", 20.0, 50.0);

    let run = propose(&shifts, &[star, weak]);
    assert!(run.proposals.iter().all(|p| p.employee_id == EmployeeId::new("emp_a")));
}

#[test]
fn repeated_runs_are_identical() {
    let shifts = generate_week(&WeekTemplate::default()).unwrap();
    let staff = vec![
        employee("emp_1", 18.0, 75.0),
        employee("emp_2", 22.0, 90.0).with_days([Weekday::Fri, Weekday::Sat, Weekday::Sun]),
        employee("emp_3", 15.0, 60.0),
    ];

    let first = propose(&shifts, &staff);
    let second = propose(&shifts, &staff);
    assert_eq!(first, second);
    assert_eq!(first.len(), 14);

    // each shift appears at most once
    let mut ids: Vec<&str> = first.proposals.iter().map(|p| p.shift_id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 14);
}

#[test]
fn proposals_follow_descending_target_sales() {
    let shifts = generate_week(&WeekTemplate::default()).unwrap();
    let run = propose(&shifts, &[employee("emp_1", 20.0, 80.0)]);
    let sales: Vec<f64> = run
        .proposals
        .iter()
        .map(|p| shifts.iter().find(|s| s.id == p.shift_id).unwrap().target_sales)
        .collect();
    assert!(sales.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn zero_rate_employee_is_preferred_without_panicking() {
    let shifts = vec![shift("mon-am", Weekday::Mon, ShiftType::Morning, 1000.0)];
    let volunteer = employee("emp_free", 0.0, 50.0);
    let paid = employee("emp_paid", 25.0, 100.0);

    let run = propose(&shifts, &[paid, volunteer]);
    assert_eq!(run.proposals[0].employee_id, EmployeeId::new("emp_free"));
    assert!(run.proposals[0].score.is_infinite());
}

#[test]
fn commits_target_the_proposed_position_even_with_repeated_ids() {
    let mut held = shift("monday-morning", Weekday::Mon, ShiftType::Morning, 1000.0);
    held.assigned = Some(EmployeeId::new("emp_old"));
    let open = shift("monday-morning", Weekday::Mon, ShiftType::Morning, 5000.0);
    let roster = shiftwise::Roster {
        employees: vec![employee("emp_new", 20.0, 80.0)],
        shifts: vec![held, open],
        ..Default::default()
    };

    let mut scheduler = Scheduler::from_roster(roster);
    let run = scheduler.auto_assign();
    assert_eq!(run.len(), 1);
    assert_eq!(run.proposals[0].shift_index, 1);

    let shifts = &scheduler.roster().shifts;
    assert_eq!(shifts[0].assigned, Some(EmployeeId::new("emp_old")));
    assert_eq!(shifts[1].assigned, Some(EmployeeId::new("emp_new")));
}
