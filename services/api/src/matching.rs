use clap::Args;
use placement::config::{AppConfig, ConfigError};
use placement::error::AppError;
use placement::telemetry;
use placement::workflows::placement::report::export;
use placement::workflows::placement::report::views::ExplanationView;
use placement::workflows::placement::report::explain;
use placement::workflows::placement::{
    AllocationOutcome, GreedyAllocator, MatchingConfig, PlacementError, PlacementReport,
    PlacementServiceError, ScoringVariant, Slot,
};
use placement::workflows::roster::{ImportDiagnostic, RosterImporter};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Student roster (CSV, Hebrew or English headers)
    #[arg(long)]
    pub(crate) students: PathBuf,
    /// Site roster (CSV, Hebrew or English headers)
    #[arg(long)]
    pub(crate) sites: PathBuf,
    /// Scoring variant: a (asymmetric) or b (uniform)
    #[arg(long, value_parser = parse_variant)]
    pub(crate) variant: Option<ScoringVariant>,
    /// Maximum placements per supervisor before the quota is relaxed
    #[arg(long)]
    pub(crate) quota: Option<u32>,
    /// Capacity used for sites whose capacity cell cannot be read
    #[arg(long)]
    pub(crate) capacity_default: Option<u32>,
    /// Write ranked results to this CSV file
    #[arg(long)]
    pub(crate) results_out: Option<PathBuf>,
    /// Write the per-site summary to this CSV file
    #[arg(long)]
    pub(crate) summary_out: Option<PathBuf>,
    /// Write the capacity reconciliation to this CSV file
    #[arg(long)]
    pub(crate) capacities_out: Option<PathBuf>,
    /// Candidate id to explain (defaults to the first candidate)
    #[arg(long, conflicts_with = "explain_position")]
    pub(crate) explain: Option<String>,
    /// Zero-based row to explain; use when several students share an id
    #[arg(long)]
    pub(crate) explain_position: Option<usize>,
}

fn parse_variant(raw: &str) -> Result<ScoringVariant, String> {
    ScoringVariant::parse(raw).ok_or_else(|| format!("unknown scoring variant '{raw}'"))
}

/// A finished CLI run with the inputs it needs for reporting.
pub(crate) struct MatchRun {
    pub(crate) config: MatchingConfig,
    pub(crate) slots: Vec<Slot>,
    pub(crate) outcome: AllocationOutcome,
    pub(crate) diagnostics: Vec<ImportDiagnostic>,
}

impl MatchRun {
    pub(crate) fn report(&self) -> PlacementReport<'_> {
        PlacementReport::new(&self.slots, &self.outcome)
    }
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let run = execute_match(&args, config.matching)?;
    write_exports(&run, &args)?;

    let explanation = explanation_for(&run, &args).map_err(PlacementServiceError::from)?;

    render_run(&run, explanation.as_ref());
    Ok(())
}

pub(crate) fn explanation_for(
    run: &MatchRun,
    args: &MatchArgs,
) -> Result<Option<ExplanationView>, PlacementError> {
    let record = match (args.explain_position, args.explain.as_deref()) {
        (Some(index), _) => Some(run.outcome.record_at(index)?),
        (None, Some(candidate_id)) => Some(run.outcome.record_for(candidate_id)?),
        (None, None) => run.outcome.records.first(),
    };
    Ok(record.map(explain))
}

pub(crate) fn apply_overrides(mut matching: MatchingConfig, args: &MatchArgs) -> MatchingConfig {
    if let Some(variant) = args.variant {
        matching.scoring_variant = variant;
    }
    if let Some(quota) = args.quota {
        matching.supervisor_quota = quota;
    }
    if let Some(capacity) = args.capacity_default {
        matching.capacity_default = capacity;
    }
    matching
}

pub(crate) fn execute_match(args: &MatchArgs, matching: MatchingConfig) -> Result<MatchRun, AppError> {
    let config = apply_overrides(matching, args);
    config.validate().map_err(ConfigError::from)?;

    let importer = RosterImporter::from_config(&config);
    let students = importer.candidates_from_path(&args.students)?;
    let sites = importer.slots_from_path(&args.sites)?;

    let outcome = GreedyAllocator::from_config(&config).allocate(&students.candidates, &sites.slots);

    let mut diagnostics = students.diagnostics;
    diagnostics.extend(sites.diagnostics);

    Ok(MatchRun {
        config,
        slots: sites.slots,
        outcome,
        diagnostics,
    })
}

fn write_exports(run: &MatchRun, args: &MatchArgs) -> Result<(), AppError> {
    let report = run.report();
    if let Some(path) = &args.results_out {
        write_file(path, export::results_csv(&report.results())?)?;
    }
    if let Some(path) = &args.summary_out {
        write_file(path, export::summary_csv(&report.slot_summaries())?)?;
    }
    if let Some(path) = &args.capacities_out {
        write_file(path, export::capacities_csv(&report.capacities())?)?;
    }
    Ok(())
}

fn write_file(path: &Path, bytes: Vec<u8>) -> Result<(), AppError> {
    std::fs::write(path, bytes)?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub(crate) fn diagnostic_line(diagnostic: &ImportDiagnostic) -> String {
    match diagnostic {
        ImportDiagnostic::MissingCandidateId { line } => {
            format!("line {line}: student row without an id was skipped")
        }
        ImportDiagnostic::DuplicateCandidateId { id, lines } => {
            let lines = lines
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("student id {id} appears on lines {lines}")
        }
        ImportDiagnostic::MissingSiteName { line } => {
            format!("line {line}: site row without a name was skipped")
        }
        ImportDiagnostic::CapacityDefaulted {
            site,
            line,
            raw,
            capacity,
        } => format!("line {line}: capacity '{raw}' for {site} replaced with {capacity}"),
    }
}

fn render_run(run: &MatchRun, explanation: Option<&ExplanationView>) {
    let report = run.report();
    let summary = report.summary();

    println!("Internship placement");
    println!(
        "Scoring variant {} | supervisor quota {}",
        run.config.scoring_variant.label(),
        run.config.supervisor_quota
    );
    println!(
        "{} placed, {} unassigned",
        summary.assigned, summary.unassigned
    );

    if !run.diagnostics.is_empty() {
        println!("\nImport notes");
        for diagnostic in &run.diagnostics {
            println!("- {}", diagnostic_line(diagnostic));
        }
    }

    println!("\nResults (best match first)");
    for row in &summary.results {
        println!(
            "- {:>3}% {} ({}) -> {} [{}]",
            row.score, row.candidate_name, row.candidate_id, row.slot_name, row.status_label
        );
    }

    if summary.slot_summaries.is_empty() {
        println!("\nSite summary: none");
    } else {
        println!("\nSite summary");
        for entry in &summary.slot_summaries {
            println!(
                "- {} / {} / {}: {} ({})",
                entry.slot_name,
                entry.slot_field,
                entry.supervisor,
                entry.recommendation,
                entry.candidate_count
            );
        }
    }

    println!("\nCapacity");
    for entry in &summary.capacities {
        println!(
            "- {}: {} of {} used, balance {}",
            entry.slot_name, entry.used, entry.capacity, entry.balance
        );
    }

    if let Some(view) = explanation {
        println!(
            "\nWhy {} -> {} ({}%)",
            view.candidate_name, view.slot_name, view.score
        );
        for part in &view.parts {
            println!(
                "- {}: {} x {:.2} = {}",
                part.label, part.raw, part.weight, part.contribution
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placement::workflows::placement::AssignmentStatus;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../crates/placement/fixtures")
            .join(name)
    }

    fn args() -> MatchArgs {
        MatchArgs {
            students: fixture("students.csv"),
            sites: fixture("sites.csv"),
            variant: None,
            quota: None,
            capacity_default: None,
            results_out: None,
            summary_out: None,
            capacities_out: None,
            explain: None,
            explain_position: None,
        }
    }

    #[test]
    fn overrides_replace_configured_values() {
        let args = MatchArgs {
            variant: Some(ScoringVariant::Uniform),
            quota: Some(4),
            ..args()
        };
        let config = apply_overrides(MatchingConfig::default(), &args);
        assert_eq!(config.scoring_variant, ScoringVariant::Uniform);
        assert_eq!(config.supervisor_quota, 4);
        assert_eq!(config.capacity_default, 1);
    }

    #[test]
    fn fixture_rosters_allocate_end_to_end() {
        let run = execute_match(&args(), MatchingConfig::default()).expect("run succeeds");

        assert_eq!(run.outcome.records.len(), 5);
        assert_eq!(run.outcome.assigned_count(), 5);
        assert_eq!(
            run.outcome.records[4].status,
            AssignmentStatus::AssignedOverQuota
        );
        assert_eq!(run.diagnostics.len(), 1);
        assert_eq!(
            diagnostic_line(&run.diagnostics[0]),
            "line 4: capacity 'two' for Akko School replaced with 1"
        );
    }

    #[test]
    fn larger_capacity_default_applies_to_unreadable_cells() {
        let args = MatchArgs {
            capacity_default: Some(3),
            ..args()
        };
        let run = execute_match(&args, MatchingConfig::default()).expect("run succeeds");
        let akko = run
            .slots
            .iter()
            .find(|slot| slot.name == "Akko School")
            .expect("site present");
        assert_eq!(akko.capacity, 3);
    }

    #[test]
    fn zero_quota_is_a_config_error() {
        let args = MatchArgs {
            quota: Some(0),
            ..args()
        };
        let err = execute_match(&args, MatchingConfig::default())
            .err()
            .expect("quota rejected");
        assert!(matches!(err, AppError::Config(ConfigError::Matching(_))));
    }

    #[test]
    fn missing_roster_file_is_a_roster_error() {
        let args = MatchArgs {
            students: fixture("does-not-exist.csv"),
            ..args()
        };
        let err = execute_match(&args, MatchingConfig::default())
            .err()
            .expect("file missing");
        assert!(matches!(err, AppError::Roster(_)));
    }

    #[test]
    fn explain_position_selects_rows_sharing_an_id() {
        let dir = std::env::temp_dir().join(format!("placement-dup-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        std::fs::write(
            dir.join("students.csv"),
            "ID,First Name,Last Name,City,Preferred Field\n1,Ava,A,X,biology\n1,Ben,B,Y,physics\n",
        )
        .expect("students written");
        std::fs::write(
            dir.join("sites.csv"),
            "Site,City,Field,Capacity,Supervisor\nLab,X,biology,1,Dr. A\nDesk,Y,physics,1,Dr. B\n",
        )
        .expect("sites written");

        let base = MatchArgs {
            students: dir.join("students.csv"),
            sites: dir.join("sites.csv"),
            ..args()
        };
        let run = execute_match(&base, MatchingConfig::default()).expect("run succeeds");

        let by_id = MatchArgs {
            explain: Some("1".to_string()),
            ..args()
        };
        assert!(matches!(
            explanation_for(&run, &by_id),
            Err(PlacementError::AmbiguousCandidateId { occurrences: 2, .. })
        ));

        let by_position = MatchArgs {
            explain_position: Some(1),
            ..args()
        };
        let view = explanation_for(&run, &by_position)
            .expect("position in range")
            .expect("view present");
        assert_eq!(view.slot_name, "Desk");
        assert_eq!(view.score, 78);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn exports_write_requested_files() {
        let dir = std::env::temp_dir().join(format!("placement-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let args = MatchArgs {
            results_out: Some(dir.join("results.csv")),
            capacities_out: Some(dir.join("capacities.csv")),
            ..args()
        };

        let run = execute_match(&args, MatchingConfig::default()).expect("run succeeds");
        write_exports(&run, &args).expect("exports written");

        let results = std::fs::read_to_string(dir.join("results.csv")).expect("results file");
        assert!(results.starts_with("Candidate,"));
        assert!(dir.join("capacities.csv").exists());
        assert!(!dir.join("summary.csv").exists());
        std::fs::remove_dir_all(&dir).ok();
    }
}
