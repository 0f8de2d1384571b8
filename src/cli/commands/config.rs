//! Config command handler
//!
//! Reads and edits the persisted settings that seed every audit run
//! (catalog location, reports directory, audit switches, logging).

use crate::args::ConfigSubcommand;
use degree_audit::config::Config;
use degree_audit::info;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

/// Dispatch config subcommands
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) -> ExitCode {
    let outcome = match subcommand {
        None | Some(ConfigSubcommand::Get { key: None }) => {
            print_all(config);
            Ok(())
        }
        Some(ConfigSubcommand::Get { key: Some(key) }) => lookup(config, &key).map(|value| println!("{value}")),
        Some(ConfigSubcommand::Set { key, value }) => config
            .set(&key, &value)
            .and_then(|()| persist(config))
            .map(|()| {
                info!("Config key '{key}' set to '{value}'");
                println!("✓ {key} = {}", display_value(&value));
            }),
        Some(ConfigSubcommand::Unset { key }) => config
            .unset(&key, defaults)
            .and_then(|()| persist(config))
            .and_then(|()| lookup(config, &key))
            .map(|value| println!("✓ {key} restored to default ({value})")),
        Some(ConfigSubcommand::Reset) => reset(),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("✗ {message}");
            ExitCode::FAILURE
        }
    }
}

fn print_all(config: &Config) {
    println!("# {}\n", Config::get_config_file_path().display());
    print!("{config}");
}

/// Current value of `key`, with empty strings shown as `(unset)`
fn lookup(config: &Config, key: &str) -> Result<String, String> {
    config
        .get(key)
        .map(|value| display_value(&value).to_string())
        .ok_or_else(|| format!("Unknown config key: '{key}'"))
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

fn persist(config: &Config) -> Result<(), String> {
    config.save().map_err(|e| format!("Failed to save config: {e}"))
}

fn reset() -> Result<(), String> {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config already matches the built-in defaults");
        return Ok(());
    }

    let confirmed = confirm_reset(&mut io::stdin().lock(), &mut io::stdout().lock())
        .map_err(|e| format!("Failed to read confirmation: {e}"))?;
    if !confirmed {
        println!("Reset cancelled; config left unchanged");
        return Ok(());
    }

    Config::reset().map_err(|e| format!("Failed to remove config file: {e}"))?;
    info!("Config file removed; defaults restored");
    println!("✓ Config reset to defaults");
    Ok(())
}

/// Ask before discarding the saved config. Anything but `y`/`yes` declines.
fn confirm_reset(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<bool> {
    write!(
        out,
        "Discard {} and return to defaults? [y/N]: ",
        Config::get_config_file_path().display()
    )?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(reply: &str) -> bool {
        let mut prompt = Vec::new();
        let confirmed = confirm_reset(&mut reply.as_bytes(), &mut prompt).unwrap();
        assert!(String::from_utf8(prompt).unwrap().ends_with("[y/N]: "));
        confirmed
    }

    #[test]
    fn test_confirm_reset_accepts_only_yes() {
        assert!(answer("y\n"));
        assert!(answer("  YES \r\n"));
        assert!(!answer("n\n"));
        assert!(!answer("\n"));
        assert!(!answer(""));
        assert!(!answer("yep\n"));
    }

    #[test]
    fn test_lookup_shows_unset_and_rejects_unknown_keys() {
        let mut config = Config::default();
        config.set("reports_dir", "").unwrap();
        assert_eq!(lookup(&config, "reports-dir").unwrap(), "(unset)");

        config.set("pooling", "true").unwrap();
        assert_eq!(lookup(&config, "enable_pooling").unwrap(), "true");

        let err = lookup(&config, "database").unwrap_err();
        assert!(err.contains("'database'"));
    }
}
