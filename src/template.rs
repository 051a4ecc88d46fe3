use crate::model::{weekday_name, Shift, ShiftId, ShiftType, WEEK};
use crate::report::ReportThresholds;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Semaine type : horaires des deux créneaux, objectifs de ventes par jour
/// et seuils du rapport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub morning: SlotTimes,
    pub afternoon: SlotTimes,
    pub target_sales: Vec<DayTargets>,
    #[serde(default)]
    pub thresholds: ReportThresholds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotTimes {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayTargets {
    pub day: Weekday,
    pub morning: f64,
    pub afternoon: f64,
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default()
}

impl Default for WeekTemplate {
    fn default() -> Self {
        let targets = [
            (Weekday::Mon, 2000.0, 2500.0),
            (Weekday::Tue, 2000.0, 2500.0),
            (Weekday::Wed, 2200.0, 2800.0),
            (Weekday::Thu, 2200.0, 3000.0),
            (Weekday::Fri, 2800.0, 4000.0),
            (Weekday::Sat, 3500.0, 4500.0),
            (Weekday::Sun, 2500.0, 3000.0),
        ];
        Self {
            id: "standard-retail".into(),
            name: "Standard retail week".into(),
            description: Some("Morning 09:00-15:00, afternoon 15:00-21:00".into()),
            morning: SlotTimes {
                start: hm(9, 0),
                end: hm(15, 0),
            },
            afternoon: SlotTimes {
                start: hm(15, 0),
                end: hm(21, 0),
            },
            target_sales: targets
                .into_iter()
                .map(|(day, morning, afternoon)| DayTargets {
                    day,
                    morning,
                    afternoon,
                })
                .collect(),
            thresholds: ReportThresholds::default(),
        }
    }
}

impl WeekTemplate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            bail!("template id cannot be empty");
        }
        if self.name.trim().is_empty() {
            bail!("template name cannot be empty");
        }
        for (label, times) in [("morning", &self.morning), ("afternoon", &self.afternoon)] {
            if times.end <= times.start {
                bail!("{label} slot must end after it starts");
            }
        }
        if self.target_sales.len() != WEEK.len() {
            bail!(
                "template must define targets for 7 days, got {}",
                self.target_sales.len()
            );
        }
        for day in WEEK {
            let count = self.target_sales.iter().filter(|t| t.day == day).count();
            if count != 1 {
                bail!("{} must appear exactly once in target_sales", weekday_name(day));
            }
        }
        for t in &self.target_sales {
            for value in [t.morning, t.afternoon] {
                if !value.is_finite() || value <= 0.0 {
                    bail!("target sales for {} must be positive", weekday_name(t.day));
                }
            }
        }
        let th = &self.thresholds;
        if th.high_cost_factor < 1.0 || th.coverage_target > 100 {
            bail!("invalid report thresholds");
        }
        Ok(())
    }

    fn targets_for(&self, day: Weekday) -> Option<&DayTargets> {
        self.target_sales.iter().find(|t| t.day == day)
    }
}

#[derive(Debug, Clone)]
pub struct TemplateInfo {
    pub template: WeekTemplate,
    pub path: PathBuf,
    pub modified: Option<DateTime<Utc>>,
}

/// Gestion simple des templates persistés sur disque.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    base_dir: PathBuf,
}

impl TemplateStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            base_dir: dir.as_ref().to_path_buf(),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("creating template directory {}", self.base_dir.display()))
    }

    pub fn save(&self, template: &WeekTemplate) -> Result<PathBuf> {
        template.validate()?;
        self.ensure_dir()?;
        let path = self.base_dir.join(format!("{}.json", template.id));
        export_template_json(&path, template)?;
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<WeekTemplate> {
        load_template_from_file(self.base_dir.join(format!("{id}.json")))
    }

    pub fn list(&self) -> Result<Vec<TemplateInfo>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }
        let mut infos = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let template = match load_template_from_file(&path) {
                Ok(t) => t,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable template");
                    continue;
                }
            };
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            infos.push(TemplateInfo {
                template,
                path,
                modified,
            });
        }
        infos.sort_by(|a, b| a.template.id.cmp(&b.template.id));
        Ok(infos)
    }
}

/// Les 14 shifts de la semaine : lundi → dimanche, Morning avant Afternoon.
pub fn generate_week(template: &WeekTemplate) -> Result<Vec<Shift>> {
    template.validate()?;
    let mut shifts = Vec::with_capacity(WEEK.len() * 2);
    for day in WEEK {
        let targets = template
            .targets_for(day)
            .with_context(|| format!("no targets for {}", weekday_name(day)))?;
        for (shift_type, times, sales) in [
            (ShiftType::Morning, template.morning, targets.morning),
            (ShiftType::Afternoon, template.afternoon, targets.afternoon),
        ] {
            let shift = Shift::new(
                ShiftId::for_slot(day, shift_type),
                day,
                shift_type,
                times.start,
                times.end,
                sales,
            )
            .map_err(anyhow::Error::msg)?;
            shifts.push(shift);
        }
    }
    Ok(shifts)
}

pub fn export_template_json<P: AsRef<Path>>(path: P, template: &WeekTemplate) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(template)?;
    fs::write(path, json).with_context(|| format!("writing template {}", path.display()))?;
    Ok(())
}

pub fn load_template_from_file<P: AsRef<Path>>(path: P) -> Result<WeekTemplate> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading template {}", path.display()))?;
    let template: WeekTemplate = serde_json::from_slice(&data)
        .with_context(|| format!("parsing template {}", path.display()))?;
    template.validate()?;
    Ok(template)
}
