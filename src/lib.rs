#![forbid(unsafe_code)]
//! Shiftwise — affectation hebdomadaire des employés d'un magasin.
//!
//! - Moteur glouton : shifts triés par objectif de ventes, score
//!   productivité/coût avec équilibrage de charge.
//! - Contrôle des assignations manuelles contre les disponibilités déclarées.
//! - KPI (coût, ventes, efficacité, couverture) et rapport d'analyse.
//! - Stockage fichiers (JSON/CSV) ; toute donnée externe passe par `ingest`.

pub mod availability;
pub mod ingest;
pub mod insight;
pub mod io;
pub mod kpi;
pub mod model;
pub mod report;
pub mod scheduler;
pub mod storage;
pub mod template;

pub use availability::{AvailabilityMap, Slot};
pub use insight::{render_with_insights, CommandInsights, InsightProvider};
pub use kpi::KpiSnapshot;
pub use model::{Employee, EmployeeId, Roster, Shift, ShiftId, ShiftType, SHIFT_HOURS};
pub use report::{Recommendation, Report, ReportThresholds};
pub use scheduler::{EmployeeUpdate, MatchRun, Proposal, SchedError, Scheduler};
pub use storage::{JsonStorage, Storage};
pub use template::{
    export_template_json, generate_week, load_template_from_file, TemplateInfo, TemplateStore,
    WeekTemplate,
};
