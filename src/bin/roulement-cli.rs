#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use roulement::{
    conflict::{detect_conflicts, ShiftProposal},
    io,
    model::{Booking, CustomerId, EmployeeId, ShiftId, Snapshot},
    notification::{prepare_notices, TextNotice},
    roster,
    storage::{load_roster, save_roster, JsonStorage, Storage},
    strategy::{
        select_for_booking, AssignmentStrategy, SelectionContext, DEFAULT_ROTATION_WINDOW_DAYS,
    },
};
use std::fs;
use std::path::PathBuf;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de planification du personnel (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON d'instantané (templates, profils, absences, contraintes)
    #[arg(long, global = true, default_value = "snapshot.json")]
    snapshot: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des profils depuis un CSV
    ImportProfiles {
        #[arg(long)]
        csv: String,
    },

    /// Importer des absences depuis un CSV
    ImportAbsences {
        #[arg(long)]
        csv: String,
    },

    /// Générer un roster brouillon sur une période
    Generate {
        /// Date de début (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Date de fin incluse (YYYY-MM-DD)
        #[arg(long)]
        to: String,
        #[arg(long, default_value = "roster.json")]
        out_json: String,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Vérifier un shift proposé contre l'existant
    Check {
        /// Nom affiché de l'employé
        #[arg(long)]
        employee: String,
        /// Date du shift (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// RFC3339 UTC
        #[arg(long)]
        start: String,
        /// RFC3339 UTC
        #[arg(long)]
        end: String,
        /// Id de shift à exclure (re-validation d'une édition)
        #[arg(long)]
        exclude: Option<String>,
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Choisir un employé pour un rendez-vous
    Select {
        #[arg(long)]
        service: String,
        /// RFC3339 UTC
        #[arg(long)]
        start: String,
        /// Durée en minutes
        #[arg(long)]
        duration: i64,
        /// availability | workload | round-robin | priority | same-employee
        #[arg(long, default_value = "workload")]
        strategy: String,
        /// Liste "nom1,nom2,..." pour la stratégie priority
        #[arg(long)]
        priority: Option<String>,
        /// Fenêtre glissante de round-robin, en jours
        #[arg(long, default_value_t = DEFAULT_ROTATION_WINDOW_DAYS)]
        window_days: i64,
        /// Id client pour la stratégie same-employee
        #[arg(long)]
        customer: Option<String>,
    },

    /// Publier un roster brouillon
    Publish {
        #[arg(long, default_value = "roster.json")]
        roster: String,
        #[arg(long)]
        actor: String,
        /// Répertoire de sortie des messages (un .txt par employé)
        #[arg(long)]
        notices_dir: Option<String>,
    },

    /// Repasser un roster publié en brouillon
    Unpublish {
        #[arg(long, default_value = "roster.json")]
        roster: String,
    },

    /// Lister les lignes d'un roster
    List {
        #[arg(long, default_value = "roster.json")]
        roster: String,
        #[arg(long)]
        out_csv: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.snapshot)?;
    let mut snapshot = storage.load().unwrap_or_default();

    let code = match cli.cmd {
        Commands::ImportProfiles { csv } => {
            let profiles = io::import_profiles_csv(csv)?;
            snapshot.profiles.extend(profiles);
            storage.save(&snapshot)?;
            0
        }
        Commands::ImportAbsences { csv } => {
            let absences = io::import_absences_csv(csv, &snapshot.profiles)?;
            snapshot.absences.extend(absences);
            storage.save(&snapshot)?;
            0
        }
        Commands::Generate {
            from,
            to,
            out_json,
            out_csv,
        } => {
            let from: NaiveDate = from.parse().context("from date (YYYY-MM-DD)")?;
            let to: NaiveDate = to.parse().context("to date (YYYY-MM-DD)")?;
            if snapshot.profiles.is_empty() {
                bail!("aucun profil dans l'instantané");
            }
            let roster = roster::generate_roster(
                &snapshot.templates,
                &snapshot.profiles,
                &snapshot.absences,
                &snapshot.limits,
                from,
                to,
                Utc::now(),
            )?;
            let assigned = roster.assigned_rows().count();
            let open = roster.open_rows().count();
            io::export_roster_json(&out_json, &roster)?;
            if let Some(path) = out_csv {
                io::export_roster_csv(path, &roster, &snapshot.profiles)?;
            }
            println!("{assigned} assigned, {open} open -> {out_json}");
            if open > 0 {
                2
            } else {
                0
            }
        }
        Commands::Check {
            employee,
            date,
            start,
            end,
            exclude,
            report,
        } => {
            let profile = snapshot
                .find_profile_by_name(&employee)
                .with_context(|| format!("unknown employee: {employee}"))?;
            let date: NaiveDate = date.parse().context("date (YYYY-MM-DD)")?;
            let start: DateTime<Utc> = start.parse().context("start RFC3339")?;
            let end: DateTime<Utc> = end.parse().context("end RFC3339")?;
            let exclude = exclude.map(ShiftId::new);
            let proposal = ShiftProposal {
                employee: &profile.employee,
                date,
                start,
                end,
                exclude: exclude.as_ref(),
            };
            let found = detect_conflicts(
                &snapshot.shifts,
                &snapshot.absences,
                &snapshot.limits,
                &proposal,
            )?;
            if found.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!(
                    "Found {} overlap(s), {} absence(s), {} rest violation(s)",
                    found.overlapping_shifts.len(),
                    found.absences.len(),
                    found.rest_violations.len()
                );
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["kind", "detail"])?;
                    for s in &found.overlapping_shifts {
                        w.write_record(["overlap", s.id.as_str()])?;
                    }
                    for a in &found.absences {
                        let detail = format!("{}..{}", a.start_date, a.end_date);
                        w.write_record(["absence", detail.as_str()])?;
                    }
                    for r in &found.rest_violations {
                        let detail =
                            format!("gap {}min < {}min", r.gap_minutes, r.required_minutes);
                        w.write_record(["rest", detail.as_str()])?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Select {
            service,
            start,
            duration,
            strategy,
            priority,
            window_days,
            customer,
        } => {
            let start: DateTime<Utc> = start.parse().context("start RFC3339")?;
            let booking = Booking::new(service, start, duration).map_err(anyhow::Error::msg)?;
            let strategy = parse_strategy(&strategy, priority, window_days, &snapshot)?;
            let customer = customer.map(CustomerId::new);
            let pool: Vec<EmployeeId> = snapshot
                .profiles
                .iter()
                .map(|p| p.employee.clone())
                .collect();
            let ctx = SelectionContext {
                date: start.date_naive(),
                start,
                end: booking.end(),
                bookings: &snapshot.bookings,
                profiles: &snapshot.profiles,
                customer: customer.as_ref(),
            };
            match select_for_booking(&booking, &pool, &strategy, &ctx) {
                Some(id) => {
                    let name = snapshot
                        .find_profile(&id)
                        .map(|p| p.display_name.as_str())
                        .unwrap_or(id.as_str());
                    println!("{name}");
                    0
                }
                None => {
                    // Rendez-vous valide mais en attente d'affectation manuelle
                    println!("-");
                    2
                }
            }
        }
        Commands::Publish {
            roster,
            actor,
            notices_dir,
        } => {
            let mut plan = load_roster(&roster)?;
            let dispatches = roster::publish(&mut plan, &actor, Utc::now())?;
            save_roster(&roster, &plan)?;
            let notices = prepare_notices(&plan, &dispatches, &snapshot.profiles, &TextNotice)?;
            if let Some(dir) = notices_dir {
                let dir = PathBuf::from(dir);
                fs::create_dir_all(&dir)?;
                for notice in &notices {
                    fs::write(
                        dir.join(format!("{}.txt", notice.employee.as_str())),
                        &notice.content,
                    )?;
                }
            }
            println!("published: {} notice(s)", notices.len());
            0
        }
        Commands::Unpublish { roster } => {
            let mut plan = load_roster(&roster)?;
            roster::unpublish(&mut plan)?;
            save_roster(&roster, &plan)?;
            println!("back to draft");
            0
        }
        Commands::List { roster, out_csv } => {
            let plan = load_roster(&roster)?;
            if let Some(path) = out_csv {
                io::export_roster_csv(path, &plan, &snapshot.profiles)?;
            }
            // impression compacte
            for row in &plan.assignments {
                let employee = row
                    .employee
                    .as_ref()
                    .and_then(|id| snapshot.find_profile(id))
                    .map(|p| p.display_name.as_str())
                    .unwrap_or("-");
                println!(
                    "{} | {} | {} | {} → {} | {}",
                    row.date,
                    row.template.as_str(),
                    row.role,
                    row.start.to_rfc3339(),
                    row.end.to_rfc3339(),
                    employee
                );
            }
            0
        }
    };

    std::process::exit(code);
}

fn parse_strategy(
    name: &str,
    priority: Option<String>,
    window_days: i64,
    snapshot: &Snapshot,
) -> Result<AssignmentStrategy> {
    match name {
        "availability" => Ok(AssignmentStrategy::Availability),
        "workload" | "workload-balance" => Ok(AssignmentStrategy::WorkloadBalance),
        "round-robin" => Ok(AssignmentStrategy::RoundRobin { window_days }),
        "priority" => {
            let raw = priority.context("--priority required for the priority strategy")?;
            let mut order = Vec::new();
            for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let profile = snapshot
                    .find_profile_by_name(name)
                    .with_context(|| format!("unknown employee: {name}"))?;
                order.push(profile.employee.clone());
            }
            Ok(AssignmentStrategy::Priority { order })
        }
        "same-employee" => Ok(AssignmentStrategy::SameEmployee),
        other => bail!("unknown strategy: {other}"),
    }
}
