use crate::availability::AvailabilityMap;
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Durée retenue pour chaque shift, quelle que soit l'heure de début/fin.
pub const SHIFT_HOURS: f64 = 6.0;

/// Jours de la semaine, lundi en tête.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Nom complet (anglais) d'un jour.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Identifiant fort pour Employee
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Employé (vendeur, caissier…)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub hourly_rate: f64,
    /// Plage nominale 0–100, plus haut = meilleur.
    pub productivity_score: f64,
    #[serde(default = "all_days")]
    pub available_days: Vec<Weekday>,
}

fn all_days() -> Vec<Weekday> {
    WEEK.to_vec()
}

impl Employee {
    /// Crée un employé disponible tous les jours, en validant le taux horaire.
    pub fn new<N: Into<String>>(
        name: N,
        hourly_rate: f64,
        productivity_score: f64,
    ) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("employee name cannot be empty".to_string());
        }
        if !hourly_rate.is_finite() || hourly_rate < 0.0 {
            return Err("hourly rate must be a non-negative number".to_string());
        }
        if !productivity_score.is_finite() {
            return Err("productivity score must be a number".to_string());
        }
        Ok(Self {
            id: EmployeeId::random(),
            name,
            hourly_rate,
            productivity_score,
            available_days: all_days(),
        })
    }

    pub fn with_id(mut self, id: EmployeeId) -> Self {
        self.id = id;
        self
    }

    /// Remplace les jours de disponibilité (dédoublonnés, ordre lundi→dimanche).
    pub fn with_days<I: IntoIterator<Item = Weekday>>(mut self, days: I) -> Self {
        self.available_days = canonical_days(days);
        self
    }

    pub fn is_available_on(&self, day: Weekday) -> bool {
        self.available_days.contains(&day)
    }
}

pub(crate) fn canonical_days<I: IntoIterator<Item = Weekday>>(days: I) -> Vec<Weekday> {
    let wanted: Vec<Weekday> = days.into_iter().collect();
    WEEK.iter().copied().filter(|d| wanted.contains(d)).collect()
}

/// Type de shift. `Evening` existe mais n'est jamais généré.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftType {
    Morning,
    Afternoon,
    Evening,
}

impl ShiftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Morning => "Morning",
            ShiftType::Afternoon => "Afternoon",
            ShiftType::Evening => "Evening",
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiant fort pour Shift
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    /// Id stable d'un shift de semaine type, ex. `monday-morning`.
    pub fn for_slot(day: Weekday, shift_type: ShiftType) -> Self {
        Self(format!(
            "{}-{}",
            weekday_name(day).to_ascii_lowercase(),
            shift_type.as_str().to_ascii_lowercase()
        ))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shift hebdomadaire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub shift_type: ShiftType,
    /// Objectif de chiffre d'affaires du shift.
    pub target_sales: f64,
    #[serde(default)]
    pub assigned: Option<EmployeeId>,
}

impl Shift {
    /// Crée un shift non assigné en validant `end > start` et `target_sales > 0`.
    pub fn new(
        id: ShiftId,
        day: Weekday,
        shift_type: ShiftType,
        start: NaiveTime,
        end: NaiveTime,
        target_sales: f64,
    ) -> Result<Self, String> {
        if end <= start {
            return Err("end must be strictly after start".to_string());
        }
        if !target_sales.is_finite() || target_sales <= 0.0 {
            return Err("target sales must be a positive number".to_string());
        }
        Ok(Self {
            id,
            day,
            start,
            end,
            shift_type,
            target_sales,
            assigned: None,
        })
    }

    /// Ex. `Monday Morning`.
    pub fn label(&self) -> String {
        format!("{} {}", weekday_name(self.day), self.shift_type)
    }

    /// Heures facturées : constante, indépendante de start/end.
    pub fn hours(&self) -> f64 {
        SHIFT_HOURS
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned.is_some()
    }
}

/// Roster d'une semaine
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Roster {
    pub employees: Vec<Employee>,
    pub shifts: Vec<Shift>,
    #[serde(default)]
    pub availability: AvailabilityMap,
}

impl Roster {
    pub fn find_employee<'a>(&'a self, id: &EmployeeId) -> Option<&'a Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }
    pub fn find_employee_by_name<'a>(&'a self, name: &str) -> Option<&'a Employee> {
        self.employees.iter().find(|e| e.name == name)
    }
    pub fn find_shift<'a>(&'a self, id: &ShiftId) -> Option<&'a Shift> {
        self.shifts.iter().find(|s| &s.id == id)
    }
    pub fn find_shift_mut(&mut self, id: &ShiftId) -> Option<&mut Shift> {
        self.shifts.iter_mut().find(|s| &s.id == id)
    }

    pub fn assigned_count(&self) -> usize {
        self.shifts.iter().filter(|s| s.is_assigned()).count()
    }
}
