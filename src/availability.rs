//! Instantané des disponibilités fines (employé × créneau).
//!
//! Une semaine compte 14 créneaux : `slot = jour*2 + (1 si Afternoon) + 1`,
//! lundi = 0. Une entrée absente vaut « indisponible ».

use crate::model::{EmployeeId, Shift, ShiftType, WEEK};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

pub const SLOTS_PER_WEEK: u8 = 14;

/// Numéro de créneau hebdomadaire (1..=14).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Slot(u8);

impl Slot {
    pub fn new(n: u8) -> Option<Self> {
        (1..=SLOTS_PER_WEEK).contains(&n).then_some(Self(n))
    }

    /// `None` pour `Evening`, qui n'a pas de créneau.
    pub fn for_shift(day: Weekday, shift_type: ShiftType) -> Option<Self> {
        let offset = match shift_type {
            ShiftType::Morning => 0,
            ShiftType::Afternoon => 1,
            ShiftType::Evening => return None,
        };
        let day_index = day.num_days_from_monday() as u8;
        Some(Self(day_index * 2 + offset + 1))
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn day(&self) -> Weekday {
        WEEK[usize::from((self.0 - 1) / 2)]
    }

    pub fn shift_type(&self) -> ShiftType {
        if (self.0 - 1) % 2 == 0 {
            ShiftType::Morning
        } else {
            ShiftType::Afternoon
        }
    }
}

impl TryFrom<u8> for Slot {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Slot::new(n).ok_or_else(|| format!("slot must be within 1..={SLOTS_PER_WEEK}, got {n}"))
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> u8 {
        slot.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Un booléen par couple (employé, créneau).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityMap {
    records: BTreeMap<EmployeeId, BTreeMap<Slot, bool>>,
}

impl AvailabilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Écrase la valeur existante éventuelle.
    pub fn set(&mut self, employee: EmployeeId, slot: Slot, available: bool) {
        self.records.entry(employee).or_default().insert(slot, available);
    }

    pub fn is_available(&self, employee: &EmployeeId, slot: Slot) -> bool {
        self.records
            .get(employee)
            .and_then(|slots| slots.get(&slot))
            .copied()
            .unwrap_or(false)
    }

    /// Employés ayant déclaré `true` pour ce créneau.
    pub fn available_for(&self, slot: Slot) -> HashSet<EmployeeId> {
        self.records
            .iter()
            .filter(|(_, slots)| slots.get(&slot).copied().unwrap_or(false))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Ensemble vide pour un shift sans créneau (Evening).
    pub fn available_for_shift(&self, shift: &Shift) -> HashSet<EmployeeId> {
        Slot::for_shift(shift.day, shift.shift_type)
            .map(|slot| self.available_for(slot))
            .unwrap_or_default()
    }

    pub fn remove_employee(&mut self, employee: &EmployeeId) {
        self.records.remove(employee);
    }

    pub fn is_empty(&self) -> bool {
        self.records.values().all(|slots| slots.is_empty())
    }

    /// Nombre de couples (employé, créneau) connus.
    pub fn len(&self) -> usize {
        self.records.values().map(BTreeMap::len).sum()
    }
}
