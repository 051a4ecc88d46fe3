#![forbid(unsafe_code)]
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use shiftwise::{
    ingest::{parse_bool, parse_weekday},
    insight::{render_with_insights, CommandInsights, InsightProvider},
    io,
    model::{Employee, EmployeeId, Roster, ShiftId},
    scheduler::{EmployeeUpdate, SchedError, Scheduler},
    storage::{JsonStorage, Storage},
    template::{export_template_json, load_template_from_file, WeekTemplate},
    Slot,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Affectation hebdomadaire des shifts d'un magasin
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`, filtre via RUST_LOG)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de roster
    #[arg(long, global = true, default_value = "roster.json")]
    roster: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// (Ré)initialiser les 14 shifts de la semaine (efface les assignations)
    InitWeek {
        /// Template JSON (semaine standard sinon)
        #[arg(long)]
        template: Option<String>,
    },

    /// Écrire le template de semaine standard dans un fichier
    ExportTemplate {
        #[arg(long)]
        out: String,
    },

    /// Importer des employés (CSV ou JSON)
    ImportEmployees {
        #[arg(long)]
        file: String,
    },

    /// Importer des shifts (CSV ou JSON), remplace les shifts existants
    ImportShifts {
        #[arg(long)]
        file: String,
    },

    /// Importer des disponibilités (CSV ou JSON)
    ImportAvailability {
        #[arg(long)]
        file: String,
    },

    /// Ajouter un employé
    AddEmployee {
        #[arg(long)]
        name: String,
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        productivity: f64,
        /// liste "Mon,Tue,..." (tous les jours sinon)
        #[arg(long)]
        days: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },

    /// Modifier un employé (id ou nom)
    UpdateEmployee {
        #[arg(long)]
        employee: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long)]
        productivity: Option<f64>,
        #[arg(long)]
        days: Option<String>,
    },

    /// Supprimer un employé et libérer ses shifts
    RemoveEmployee {
        #[arg(long)]
        employee: String,
    },

    /// Déclarer une disponibilité (créneau 1 à 14)
    SetAvailability {
        #[arg(long)]
        employee: String,
        #[arg(long)]
        slot: u8,
        /// true/false, yes/no, 1/0
        #[arg(long)]
        available: String,
    },

    /// Remplir automatiquement les shifts libres
    Match,

    /// Assigner un shift à la main (contrôle des disponibilités)
    Assign {
        #[arg(long)]
        shift: String,
        #[arg(long)]
        employee: String,
    },

    /// Libérer un shift
    Unassign {
        #[arg(long)]
        shift: String,
    },

    /// Lister et optionnellement exporter
    List {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Afficher les KPI
    Kpi,

    /// Générer le rapport d'analyse
    Report {
        /// Fichier de sortie (stdout sinon)
        #[arg(long)]
        out: Option<String>,
        /// Commande externe produisant des conseils (lit le rapport sur stdin)
        #[arg(long)]
        insights_cmd: Option<String>,
        /// Template dont on reprend les seuils
        #[arg(long)]
        template: Option<String>,
    },
}

fn resolve_employee(roster: &Roster, key: &str) -> Result<EmployeeId> {
    let id = EmployeeId::new(key);
    if roster.find_employee(&id).is_some() {
        return Ok(id);
    }
    roster
        .find_employee_by_name(key)
        .map(|e| e.id.clone())
        .ok_or_else(|| anyhow!("unknown employee: {key}"))
}

fn parse_days(list: &str) -> Result<Vec<chrono::Weekday>> {
    list.split([',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_weekday)
        .collect()
}

fn load_template(path: Option<String>) -> Result<WeekTemplate> {
    match path {
        Some(p) => load_template_from_file(p),
        None => Ok(WeekTemplate::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let storage = JsonStorage::open(&cli.roster)?;
    let mut scheduler = Scheduler::from_roster(storage.load_or_default()?);

    let code = match cli.cmd {
        Commands::InitWeek { template } => {
            let template = load_template(template)?;
            scheduler.initialize_week(&template)?;
            storage.save(scheduler.roster())?;
            println!("{} shifts created from {}", scheduler.roster().shifts.len(), template.id);
            0
        }
        Commands::ExportTemplate { out } => {
            export_template_json(&out, &WeekTemplate::default())?;
            0
        }
        Commands::ImportEmployees { file } => {
            let employees = io::import_employees(&file)?;
            let count = employees.len();
            for employee in employees {
                scheduler.add_employee(employee)?;
            }
            storage.save(scheduler.roster())?;
            println!("{count} employee(s) imported");
            0
        }
        Commands::ImportShifts { file } => {
            let shifts = io::import_shifts(&file)?;
            println!("{} shift(s) imported", shifts.len());
            scheduler.roster_mut().shifts = shifts;
            storage.save(scheduler.roster())?;
            0
        }
        Commands::ImportAvailability { file } => {
            let records = io::import_availability(&file)?;
            let count = records.len();
            for (employee, slot, available) in records {
                scheduler.set_availability(&employee, slot, available);
            }
            storage.save(scheduler.roster())?;
            println!("{count} availability record(s) imported");
            0
        }
        Commands::AddEmployee {
            name,
            rate,
            productivity,
            days,
            id,
        } => {
            let mut employee = Employee::new(name, rate, productivity).map_err(anyhow::Error::msg)?;
            if let Some(id) = id {
                employee = employee.with_id(EmployeeId::new(id));
            }
            if let Some(days) = days {
                employee = employee.with_days(parse_days(&days)?);
            }
            let id = scheduler.add_employee(employee)?;
            storage.save(scheduler.roster())?;
            println!("{id}");
            0
        }
        Commands::UpdateEmployee {
            employee,
            name,
            rate,
            productivity,
            days,
        } => {
            let id = resolve_employee(scheduler.roster(), &employee)?;
            let update = EmployeeUpdate {
                name,
                hourly_rate: rate,
                productivity_score: productivity,
                available_days: days.as_deref().map(parse_days).transpose()?,
            };
            scheduler.update_employee(&id, update)?;
            storage.save(scheduler.roster())?;
            0
        }
        Commands::RemoveEmployee { employee } => {
            let id = resolve_employee(scheduler.roster(), &employee)?;
            let removed = scheduler.remove_employee(&id)?;
            storage.save(scheduler.roster())?;
            println!("removed {}", removed.name);
            0
        }
        Commands::SetAvailability {
            employee,
            slot,
            available,
        } => {
            let id = resolve_employee(scheduler.roster(), &employee)?;
            let slot = Slot::new(slot).with_context(|| format!("slot must be 1..=14, got {slot}"))?;
            scheduler.set_availability(&id, slot, parse_bool(&available)?);
            storage.save(scheduler.roster())?;
            0
        }
        Commands::Match => {
            let run = scheduler.auto_assign();
            storage.save(scheduler.roster())?;
            if run.is_empty() {
                println!("no assignments made");
            } else {
                for p in &run.proposals {
                    println!("{} -> {} (score {:.2})", p.shift_id, p.employee_id, p.score);
                }
                println!(
                    "{} assignment(s) made, {} shift(s) left unassigned",
                    run.len(),
                    run.unfilled.len()
                );
            }
            0
        }
        Commands::Assign { shift, employee } => {
            let id = resolve_employee(scheduler.roster(), &employee)?;
            match scheduler.assign(&ShiftId::new(&shift), &id) {
                Ok(()) => {
                    storage.save(scheduler.roster())?;
                    0
                }
                Err(err @ SchedError::AssignmentNotAvailable { .. }) => {
                    eprintln!("{err}");
                    eprintln!("assignment rejected; roster unchanged");
                    2
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::Unassign { shift } => {
            let previous = scheduler.unassign(&ShiftId::new(&shift))?;
            storage.save(scheduler.roster())?;
            if let Some(previous) = previous {
                println!("{shift} released from {previous}");
            }
            0
        }
        Commands::List { out_json, out_csv } => {
            if let Some(path) = out_json {
                io::export_roster_json(path, scheduler.roster())?;
            }
            if let Some(path) = out_csv {
                io::export_shifts_csv(path, scheduler.roster())?;
            }
            let roster = scheduler.roster();
            for s in &roster.shifts {
                let assigned = s
                    .assigned
                    .as_ref()
                    .and_then(|id| roster.find_employee(id))
                    .map(|e| e.name.as_str())
                    .unwrap_or("-");
                println!(
                    "{} | {} {}–{} | ${:.2} | {}",
                    s.id,
                    s.label(),
                    s.start.format("%H:%M"),
                    s.end.format("%H:%M"),
                    s.target_sales,
                    assigned
                );
            }
            0
        }
        Commands::Kpi => {
            println!("{}", scheduler.kpis());
            0
        }
        Commands::Report {
            out,
            insights_cmd,
            template,
        } => {
            let thresholds = load_template(template)?.thresholds;
            let report = scheduler.report(&thresholds);
            let provider = insights_cmd.as_deref().map(CommandInsights::parse).transpose()?;
            let text = render_with_insights(
                &report,
                provider.as_ref().map(|p| p as &dyn InsightProvider),
            );
            match out {
                Some(path) => std::fs::write(&path, text)?,
                None => println!("{text}"),
            }
            0
        }
    };

    std::process::exit(code);
}
