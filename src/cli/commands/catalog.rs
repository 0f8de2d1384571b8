//! Catalog command handler

use crate::args::CatalogSubcommand;
use degree_audit::catalog::{RequirementCatalog, RequirementTable};
use degree_audit::config::Config;
use std::fmt::Write as _;
use std::process::ExitCode;

/// Dispatch catalog subcommands
pub fn run(subcommand: CatalogSubcommand, config: &Config) -> ExitCode {
    let outcome = match subcommand {
        CatalogSubcommand::List { file } => {
            super::open_catalog(file.as_deref(), config).map(|catalog| list_tables(&catalog))
        }
        CatalogSubcommand::Show { major, year, file } => super::open_catalog(file.as_deref(), config)
            .and_then(|catalog| {
                catalog
                    .lookup(&major, year)
                    .map(render_table)
                    .map_err(|e| format!("✗ {e}"))
            }),
    };

    match outcome {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// One line per (major, year) with row count and total credits
fn list_tables(catalog: &RequirementCatalog) -> String {
    let mut out = String::new();
    for table in catalog.tables() {
        let _ = writeln!(
            out,
            "{:<32} {:>4}  {:>3} requirements  {:>6} credits",
            table.major,
            table.year,
            table.requirements.len(),
            table.total_credits().to_string()
        );
    }
    if catalog.is_empty() {
        out.push_str("(catalog has no tables)\n");
    }
    out
}

/// Merged table as aligned text, in catalog order
fn render_table(table: &RequirementTable) -> String {
    let mut out = format!("{} ({})\n\n", table.major, table.year);
    let _ = writeln!(
        out,
        "{:<12} {:<32} {:>7} {:<5} {:<16} Notes",
        "Code", "Name", "Credits", "Min", "Category"
    );
    for req in &table.requirements {
        let mut notes = Vec::new();
        if !req.accepts.is_empty() {
            let accepts: Vec<&str> = req.accepts.iter().map(|c| c.as_str()).collect();
            notes.push(format!("accepts {}", accepts.join(", ")));
        }
        if let Some(pool) = &req.pool_id {
            notes.push(format!("pool '{pool}'"));
        }
        if !req.allow_transfer {
            notes.push("no transfer".to_string());
        }
        if req.alternative {
            notes.push("alternative".to_string());
        }
        if !req.comments.is_empty() {
            notes.push(req.comments.clone());
        }
        let _ = writeln!(
            out,
            "{:<12} {:<32} {:>7} {:<5} {:<16} {}",
            req.course_code.as_str(),
            req.course_name,
            req.credits_need.to_string(),
            req.min_grade.to_string(),
            req.category,
            notes.join("; ")
        );
    }
    let _ = writeln!(out, "\nTotal credits: {}", table.total_credits());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use degree_audit::parser::parse_catalog_toml;

    const CATALOG: &str = r#"
[[table]]
major = "Computer Science"
year = 2021

[[table.requirement]]
course_code = "MATH 101"
course_name = "Calculus I"
credits = 4
min_grade = "C"

[[table.requirement]]
course_code = "HIST *"
course_name = "History elective"
credits = 3
category = "elective"
allow_transfer = false
"#;

    #[test]
    fn test_list_tables() {
        let catalog = parse_catalog_toml(CATALOG).unwrap();
        let text = list_tables(&catalog);
        assert!(text.contains("Computer Science"));
        assert!(text.contains("2 requirements"));
        assert!(text.contains("7.0 credits"));
    }

    #[test]
    fn test_render_table() {
        let catalog = parse_catalog_toml(CATALOG).unwrap();
        let table = catalog.lookup("computer science", 2021).unwrap();
        let text = render_table(table);
        assert!(text.starts_with("Computer Science (2021)"));
        assert!(text.contains("MATH 101"));
        assert!(text.contains("no transfer"));
        assert!(text.contains("Total credits: 7.0"));
    }
}
