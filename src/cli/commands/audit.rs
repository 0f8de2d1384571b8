//! Audit command handler
//!
//! Audits each transcript against the catalog and writes one report per
//! transcript. Transcripts are processed sequentially; a failure on one is
//! reported and the rest still run.

use crate::args::AuditArgs;
use degree_audit::audit::{audit, AuditReport};
use degree_audit::catalog::RequirementCatalog;
use degree_audit::config::Config;
use degree_audit::models::Transcript;
use degree_audit::parser::parse_transcript_csv;
use degree_audit::report::{ReportContext, ReportFormat};
use degree_audit::logger::is_verbose_enabled;
use degree_audit::{error, info};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Output path meaning "write to stdout"
const STDOUT_MARKER: &str = "-";

/// Where one report goes
#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    Stdout,
    File(PathBuf),
}

/// Run the audit command.
///
/// # Arguments
/// * `args` - Parsed `audit` arguments
/// * `config` - Configuration with CLI overrides already applied
pub fn run(args: &AuditArgs, config: &Config) -> ExitCode {
    let destinations = match plan_destinations(args, config) {
        Ok(destinations) => destinations,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let catalog = match super::open_catalog(args.catalog.as_deref(), config) {
        Ok(catalog) => catalog,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let mut failures = 0usize;
    for (transcript_path, destination) in args.transcripts.iter().zip(&destinations) {
        if let Err(message) = audit_one(transcript_path, destination, &catalog, args, config) {
            error!("Audit failed for {}: {message}", transcript_path.display());
            eprintln!("{message}");
            failures += 1;
        }
    }

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Pair every transcript with an output destination
fn plan_destinations(args: &AuditArgs, config: &Config) -> Result<Vec<Destination>, String> {
    if !args.output.is_empty() {
        if args.output.len() != args.transcripts.len() {
            return Err(format!(
                "✗ Got {} output paths for {} transcripts; they must match 1:1",
                args.output.len(),
                args.transcripts.len()
            ));
        }
        return Ok(args
            .output
            .iter()
            .map(|path| {
                if path.as_os_str() == STDOUT_MARKER {
                    Destination::Stdout
                } else {
                    Destination::File(path.clone())
                }
            })
            .collect());
    }

    if config.paths.reports_dir.is_empty() {
        return Ok(vec![Destination::Stdout; args.transcripts.len()]);
    }

    let reports_dir = PathBuf::from(&config.paths.reports_dir);
    Ok(args
        .transcripts
        .iter()
        .map(|transcript| Destination::File(default_output_path(&reports_dir, transcript, args.format)))
        .collect())
}

/// `<reports_dir>/<transcript stem>_audit.<ext>`
fn default_output_path(reports_dir: &Path, transcript: &Path, format: ReportFormat) -> PathBuf {
    let stem = transcript
        .file_stem()
        .map_or_else(|| "transcript".into(), |s| s.to_string_lossy());
    reports_dir.join(format!("{stem}_audit.{}", format.extension()))
}

/// Major and admission year from flags, falling back to transcript metadata
fn resolve_target(args: &AuditArgs, transcript: &Transcript, path: &Path) -> Result<(String, u16), String> {
    let major = args
        .major
        .clone()
        .or_else(|| transcript.major.clone())
        .ok_or_else(|| {
            format!(
                "✗ {}: no major given; pass --major or add a 'Major' row",
                path.display()
            )
        })?;
    let year = args.year.or(transcript.admission_year).ok_or_else(|| {
        format!(
            "✗ {}: no admission year given; pass --year or add an 'Admission Year' row",
            path.display()
        )
    })?;
    Ok((major, year))
}

fn audit_one(
    transcript_path: &Path,
    destination: &Destination,
    catalog: &RequirementCatalog,
    args: &AuditArgs,
    config: &Config,
) -> Result<(), String> {
    let transcript = parse_transcript_csv(transcript_path)
        .map_err(|e| format!("✗ Failed to load {}: {e}", transcript_path.display()))?;
    info!("Transcript loaded: {}", transcript_path.display());

    let (major, year) = resolve_target(args, &transcript, transcript_path)?;
    let report = audit(&transcript, catalog, &major, year, config.audit_options())
        .map_err(|e| format!("✗ Audit of {} failed: {e}", transcript_path.display()))?;

    print_advisories(&report);

    let source = transcript_path.to_string_lossy();
    let ctx = ReportContext::new(&report, Some(&source));
    let reporter = args.format.reporter();

    match destination {
        Destination::Stdout => {
            let content = reporter
                .render(&ctx)
                .map_err(|e| format!("✗ Failed to render report: {e}"))?;
            print!("{content}");
        }
        Destination::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    format!("✗ Failed to create directory {}: {e}", parent.display())
                })?;
            }
            reporter
                .generate(&ctx, path)
                .map_err(|e| format!("✗ Failed to write {}: {e}", path.display()))?;
            eprintln!(
                "✓ {} audit written: {} ({} satisfied, {} pending)",
                args.format,
                path.display(),
                report.summary.satisfied_count,
                report.summary.pending_count
            );
        }
    }
    Ok(())
}

/// Surface advisories on stderr so stdout only ever carries report content
fn print_advisories(report: &AuditReport) {
    let mut stderr = std::io::stderr().lock();
    if let Err(e) = write_advisories(report, is_verbose_enabled(), &mut stderr) {
        error!("Failed to print advisories: {e}");
    }
}

fn write_advisories(report: &AuditReport, with_totals: bool, out: &mut impl Write) -> io::Result<()> {
    for advisory in &report.advisories {
        writeln!(out, "  ! {advisory}")?;
    }
    if with_totals {
        writeln!(
            out,
            "  {} of {} credits applied",
            report.summary.total_applied, report.summary.total_required
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use degree_audit::audit::AuditOptions;
    use degree_audit::parser::{parse_catalog_toml, parse_transcript_str};

    fn args(transcripts: &[&str], output: &[&str]) -> AuditArgs {
        AuditArgs {
            transcripts: transcripts.iter().map(PathBuf::from).collect(),
            catalog: None,
            major: None,
            year: None,
            format: ReportFormat::Json,
            output: output.iter().map(PathBuf::from).collect(),
            allow_year_fallback: false,
            allow_in_progress: false,
            pooling: false,
        }
    }

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("/reports"), Path::new("in/jane.csv"), ReportFormat::Html);
        assert_eq!(path, PathBuf::from("/reports/jane_audit.html"));
    }

    #[test]
    fn test_output_count_must_match() {
        let config = Config::default();
        let result = plan_destinations(&args(&["a.csv", "b.csv"], &["a.json"]), &config);
        assert!(result.is_err());
    }

    #[test]
    fn test_stdout_marker_and_empty_reports_dir() {
        let config = Config::default();
        let planned = plan_destinations(&args(&["a.csv", "b.csv"], &["-", "b.json"]), &config).unwrap();
        assert_eq!(
            planned,
            vec![Destination::Stdout, Destination::File(PathBuf::from("b.json"))]
        );

        let planned = plan_destinations(&args(&["a.csv"], &[]), &config).unwrap();
        assert_eq!(planned, vec![Destination::Stdout]);
    }

    #[test]
    fn test_target_from_metadata_and_flags() {
        let transcript = parse_transcript_str(
            "Major,Computer Science\nAdmission Year,2021\nTerm,Course Code,Title,Grade,Credits\n",
        )
        .unwrap();
        let path = Path::new("jane.csv");

        let (major, year) = resolve_target(&args(&["jane.csv"], &[]), &transcript, path).unwrap();
        assert_eq!((major.as_str(), year), ("Computer Science", 2021));

        let mut explicit = args(&["jane.csv"], &[]);
        explicit.year = Some(2020);
        let (_, year) = resolve_target(&explicit, &transcript, path).unwrap();
        assert_eq!(year, 2020);
    }

    #[test]
    fn test_missing_major_is_reported() {
        let transcript = parse_transcript_str("Term,Course Code,Title,Grade,Credits\n").unwrap();
        let err = resolve_target(&args(&["x.csv"], &[]), &transcript, Path::new("x.csv")).unwrap_err();
        assert!(err.contains("no major"));
    }

    #[test]
    fn test_advisories_written_without_totals_unless_verbose() {
        let catalog = parse_catalog_toml(
            "[[table]]\nmajor = \"Biology\"\nyear = 2021\n\
             [[table.requirement]]\ncourse_code = \"BIOL 110\"\ncredits = 4\nallow_transfer = false\n",
        )
        .unwrap();
        let transcript = parse_transcript_str(
            "Term,Course Code,Title,Grade,Credits\nFall 2021,BIOL 110,Biology I,TC,4\n",
        )
        .unwrap();
        let report = audit(&transcript, &catalog, "Biology", 2021, AuditOptions::default()).unwrap();

        let mut quiet = Vec::new();
        write_advisories(&report, false, &mut quiet).unwrap();
        let quiet = String::from_utf8(quiet).unwrap();
        assert_eq!(quiet.lines().count(), 1);
        assert!(quiet.starts_with("  ! BIOL 110"));

        let mut loud = Vec::new();
        write_advisories(&report, true, &mut loud).unwrap();
        let loud = String::from_utf8(loud).unwrap();
        assert_eq!(
            loud,
            "  ! BIOL 110: transfer credit BIOL 110 applied where transfer is discouraged\n  4.0 of 4.0 credits applied\n"
        );
    }
}
