//! Frontière de normalisation : formes brutes (JSON/CSV d'un store externe)
//! vers les types canoniques de `model`.
//!
//! Les stores amont mélangent `hourly_rate`, `hourlyRate` et `HourlyRate`,
//! des ids numériques ou textuels, des listes de jours en tableau ou en
//! chaîne. Seules les fonctions `normalize_*` ci-dessous voient ces variantes.

use crate::availability::Slot;
use crate::model::{canonical_days, Employee, EmployeeId, Shift, ShiftId, ShiftType, WEEK};
use anyhow::{bail, Context, Result};
use chrono::{NaiveTime, Weekday};
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Deserialize)]
pub struct RawEmployee {
    #[serde(default, alias = "Id", alias = "ID", alias = "employeeId", alias = "EmployeeId", deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(alias = "Name", alias = "display_name", alias = "displayName")]
    pub name: String,
    #[serde(alias = "hourlyRate", alias = "HourlyRate", alias = "rate", deserialize_with = "de_number")]
    pub hourly_rate: f64,
    #[serde(
        alias = "productivityScore",
        alias = "ProductivityScore",
        alias = "productivity",
        deserialize_with = "de_number"
    )]
    pub productivity_score: f64,
    #[serde(default, alias = "availableDays", alias = "AvailableDays", alias = "availability")]
    pub available_days: Option<DayList>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawShift {
    #[serde(default, alias = "Id", alias = "ID", alias = "shiftId", alias = "ShiftId", deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(alias = "Day", alias = "weekday", alias = "Weekday")]
    pub day: String,
    #[serde(alias = "shiftType", alias = "ShiftType", alias = "type", alias = "Type")]
    pub shift_type: String,
    #[serde(alias = "startTime", alias = "StartTime", alias = "Start")]
    pub start: String,
    #[serde(alias = "endTime", alias = "EndTime", alias = "End")]
    pub end: String,
    #[serde(alias = "targetSales", alias = "TargetSales", deserialize_with = "de_number")]
    pub target_sales: f64,
    #[serde(
        default,
        alias = "assignedEmployeeId",
        alias = "AssignedEmployeeId",
        alias = "assigned_employee",
        alias = "assigned",
        deserialize_with = "de_opt_id"
    )]
    pub assigned_employee_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAvailability {
    #[serde(alias = "employeeId", alias = "EmployeeId", deserialize_with = "de_id")]
    pub employee_id: String,
    #[serde(
        alias = "Slot",
        alias = "slot_number",
        alias = "slotNumber",
        alias = "SlotNumber",
        deserialize_with = "de_slot"
    )]
    pub slot: u8,
    #[serde(alias = "Available", alias = "isAvailable", alias = "IsAvailable", deserialize_with = "de_flag")]
    pub available: bool,
}

/// Liste de jours, en tableau JSON ou en chaîne `Mon;Tue` / `Mon,Tue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayList(pub Vec<String>);

impl<'de> Deserialize<'de> for DayList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DayListVisitor;

        impl<'de> Visitor<'de> for DayListVisitor {
            type Value = DayList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a list of weekday names or a separated string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<DayList, E> {
                Ok(DayList(
                    v.split([';', ','])
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect(),
                ))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<DayList, A::Error> {
                let mut out = Vec::new();
                while let Some(day) = seq.next_element::<String>()? {
                    out.push(day);
                }
                Ok(DayList(out))
            }
        }

        deserializer.deserialize_any(DayListVisitor)
    }
}

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or scalar identifier")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.trim().to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
        Ok(v.to_string())
    }
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    deserializer.deserialize_any(IdVisitor)
}

fn de_opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    struct OptIdVisitor;

    impl<'de> Visitor<'de> for OptIdVisitor {
        type Value = Option<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an optional identifier")
        }

        fn visit_none<E: de::Error>(self) -> Result<Option<String>, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Option<String>, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Option<String>, D::Error> {
            let id = de_id(d)?;
            Ok((!id.is_empty()).then_some(id))
        }
    }

    deserializer.deserialize_option(OptIdVisitor)
}

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a boolean, 0/1 or yes/no")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::custom(format!("expected 0 or 1, got {v}"))),
            }
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            match v {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::custom(format!("expected 0 or 1, got {v}"))),
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            parse_bool(v).map_err(|_| E::custom(format!("expected boolean, got {v:?}")))
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

/// Nombre JSON, ou texte tel qu'il sort d'une cellule CSV.
fn de_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            v.trim()
                .parse()
                .map_err(|_| E::custom(format!("expected a number, got {v:?}")))
        }
    }

    deserializer.deserialize_any(NumberVisitor)
}

fn de_slot<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    struct SlotVisitor;

    impl<'de> Visitor<'de> for SlotVisitor {
        type Value = u8;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a slot number")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u8, E> {
            u8::try_from(v).map_err(|_| E::custom(format!("slot out of range: {v}")))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u8, E> {
            u8::try_from(v).map_err(|_| E::custom(format!("slot out of range: {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u8, E> {
            v.trim()
                .parse()
                .map_err(|_| E::custom(format!("expected a slot number, got {v:?}")))
        }
    }

    deserializer.deserialize_any(SlotVisitor)
}

pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// `Mon`, `monday`, `MONDAY`… vers `Weekday`.
pub fn parse_weekday(raw: &str) -> Result<Weekday> {
    raw.trim()
        .parse::<Weekday>()
        .map_err(|_| anyhow::anyhow!("invalid weekday: {raw}"))
}

pub fn parse_shift_type(raw: &str) -> Result<ShiftType> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "morning" | "am" => Ok(ShiftType::Morning),
        "afternoon" | "pm" => Ok(ShiftType::Afternoon),
        "evening" => Ok(ShiftType::Evening),
        other => bail!("invalid shift type: {other}"),
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .with_context(|| format!("invalid time: {raw}"))
}

pub fn normalize_employee(raw: RawEmployee) -> Result<Employee> {
    let mut employee = Employee::new(raw.name.trim(), raw.hourly_rate, raw.productivity_score)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("invalid employee {:?}", raw.name))?;
    if let Some(id) = raw.id {
        employee = employee.with_id(EmployeeId::new(id));
    }
    let days = match raw.available_days {
        Some(DayList(names)) if !names.is_empty() => names
            .iter()
            .map(|d| parse_weekday(d))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("invalid available days for {}", employee.name))?,
        _ => WEEK.to_vec(),
    };
    employee.available_days = canonical_days(days);
    Ok(employee)
}

pub fn normalize_shift(raw: RawShift) -> Result<Shift> {
    let day = parse_weekday(&raw.day)?;
    let shift_type = parse_shift_type(&raw.shift_type)?;
    let id = raw
        .id
        .map(ShiftId::new)
        .unwrap_or_else(|| ShiftId::for_slot(day, shift_type));
    let mut shift = Shift::new(
        id,
        day,
        shift_type,
        parse_time(&raw.start)?,
        parse_time(&raw.end)?,
        raw.target_sales,
    )
    .map_err(anyhow::Error::msg)
    .with_context(|| format!("invalid shift {} {}", raw.day, raw.shift_type))?;
    shift.assigned = raw.assigned_employee_id.map(EmployeeId::new);
    Ok(shift)
}

pub fn normalize_availability(raw: RawAvailability) -> Result<(EmployeeId, Slot, bool)> {
    if raw.employee_id.is_empty() {
        bail!("availability record without employee id");
    }
    let slot = Slot::new(raw.slot)
        .with_context(|| format!("invalid slot {} for employee {}", raw.slot, raw.employee_id))?;
    Ok((EmployeeId::new(raw.employee_id), slot, raw.available))
}
