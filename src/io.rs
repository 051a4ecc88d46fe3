//! Import/export fichiers. Toute lecture passe par `ingest` : aucune
//! variante de nommage des champs ne dépasse ce module.

use crate::availability::Slot;
use crate::ingest::{
    normalize_availability, normalize_employee, normalize_shift, RawAvailability, RawEmployee,
    RawShift,
};
use crate::model::{weekday_name, Employee, EmployeeId, Roster, Shift};
use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Lit des lignes brutes depuis un CSV à en-tête ou un tableau JSON.
///
/// Les cellules CSV restent du texte jusqu'aux normaliseurs : `007` garde
/// ses zéros. Une cellule vide équivaut à un champ absent.
fn read_raw<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let path = path.as_ref();
    if is_json(path) {
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        return serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()));
    }
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = rdr
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?
        .clone();
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let row = line + 2;
        let rec = rec.with_context(|| format!("{} row {row}", path.display()))?;
        let cells: Map<String, Value> = headers
            .iter()
            .zip(rec.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(name, cell)| (name.to_string(), Value::String(cell.to_string())))
            .collect();
        let raw = serde_json::from_value(Value::Object(cells))
            .with_context(|| format!("{} row {row}", path.display()))?;
        out.push(raw);
    }
    Ok(out)
}

/// Employés : `id,name,hourly_rate,productivity_score[,available_days]`
/// (jours séparés par `;`).
pub fn import_employees<P: AsRef<Path>>(path: P) -> Result<Vec<Employee>> {
    let rows: Vec<RawEmployee> = read_raw(path)?;
    let employees = rows
        .into_iter()
        .map(normalize_employee)
        .collect::<Result<Vec<_>>>()?;
    debug!(count = employees.len(), "employees imported");
    Ok(employees)
}

/// Shifts : `id,day,shift_type,start,end,target_sales[,assigned_employee_id]`.
/// Les ids doivent être uniques dans le fichier.
pub fn import_shifts<P: AsRef<Path>>(path: P) -> Result<Vec<Shift>> {
    let rows: Vec<RawShift> = read_raw(path)?;
    let shifts = rows
        .into_iter()
        .map(normalize_shift)
        .collect::<Result<Vec<_>>>()?;
    let mut seen = HashSet::new();
    for shift in &shifts {
        if !seen.insert(&shift.id) {
            bail!(
                "duplicate shift id {} ({}); give each shift an explicit id",
                shift.id,
                shift.label()
            );
        }
    }
    debug!(count = shifts.len(), "shifts imported");
    Ok(shifts)
}

/// Disponibilités : `employee_id,slot,available`.
pub fn import_availability<P: AsRef<Path>>(path: P) -> Result<Vec<(EmployeeId, Slot, bool)>> {
    let rows: Vec<RawAvailability> = read_raw(path)?;
    rows.into_iter().map(normalize_availability).collect()
}

/// Export JSON du roster (jolie mise en forme)
pub fn export_roster_json<P: AsRef<Path>>(path: P, roster: &Roster) -> Result<()> {
    let s = serde_json::to_string_pretty(roster)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des shifts: header `id,day,shift_type,start,end,target_sales,assigned_employee`
pub fn export_shifts_csv<P: AsRef<Path>>(path: P, roster: &Roster) -> Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "id",
        "day",
        "shift_type",
        "start",
        "end",
        "target_sales",
        "assigned_employee",
    ])?;
    for s in &roster.shifts {
        let assigned = s
            .assigned
            .as_ref()
            .and_then(|id| roster.find_employee(id))
            .map(|e| e.name.as_str())
            .unwrap_or("");
        let start = s.start.format("%H:%M").to_string();
        let end = s.end.format("%H:%M").to_string();
        let sales = format!("{:.2}", s.target_sales);
        w.write_record([
            s.id.as_str(),
            weekday_name(s.day),
            s.shift_type.as_str(),
            start.as_str(),
            end.as_str(),
            sales.as_str(),
            assigned,
        ])?;
    }
    w.flush()?;
    Ok(())
}
