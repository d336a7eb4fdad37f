// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — `patterns` Command
// ─────────────────────────────────────────────────────────────────────

use std::fs;

use anyhow::{Context, Result};

use gmode_grid::PatternOrchestrator;
use gmode_types::{PatternConfig, PatternMethod};

use crate::cli::{MethodArg, PatternsArgs};

pub fn run(args: PatternsArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let orchestrator = PatternOrchestrator::new(config).context("invalid pattern configuration")?;

    let table = orchestrator
        .run_files(&args.grid, &args.observations, &args.output)
        .with_context(|| {
            format!(
                "building patterns from {} against {}",
                args.grid.display(),
                args.observations.display()
            )
        })?;

    tracing::info!(
        models = table.rows.len(),
        unmatched = table.unmatched_count(),
        output = %args.output.display(),
        "patterns written"
    );
    Ok(())
}

/// JSON config (if any) with command-line overrides applied.
fn resolve_config(args: &PatternsArgs) -> Result<PatternConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            PatternConfig::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => PatternConfig::default(),
    };

    if let Some(observable) = args.observable {
        config.observable = observable;
    }
    if let Some(method) = args.method {
        config.method = match method {
            MethodArg::ChisqLongestSequence => PatternMethod::ChisqLongestSequence,
            MethodArg::HighestAmplitude => PatternMethod::HighestAmplitude {
                anchors: args.anchors.clone(),
            },
            MethodArg::HighestFrequency => PatternMethod::HighestFrequency,
        };
    } else if !args.anchors.is_empty() {
        if let PatternMethod::HighestAmplitude { anchors } = &mut config.method {
            *anchors = args.anchors.clone();
        } else {
            tracing::warn!("--anchor is only used by the highest-amplitude method; ignoring");
        }
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use gmode_types::Observable;

    use crate::cli::{Cli, Commands};

    fn parse(argv: &[&str]) -> PatternsArgs {
        match Cli::parse_from(argv).command {
            Commands::Patterns(args) => args,
            _ => panic!("expected patterns subcommand"),
        }
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = parse(&[
            "gmode",
            "patterns",
            "--grid",
            "grid.tsv",
            "--observations",
            "obs.tsv",
            "--observable",
            "frequency",
            "--method",
            "highest-amplitude",
            "--anchor",
            "1.2",
            "--anchor",
            "2.4",
            "--threads",
            "4",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.observable, Observable::Frequency);
        assert_eq!(
            config.method,
            PatternMethod::HighestAmplitude {
                anchors: vec![1.2, 2.4]
            }
        );
        assert_eq!(config.threads, 4);
    }

    #[test]
    fn test_json_config_with_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patterns.json");
        fs::write(
            &path,
            r#"{"observable": "frequency", "method": {"kind": "highest_frequency"}, "threads": 2}"#,
        )
        .unwrap();
        let config_arg = path.to_string_lossy().to_string();
        let args = parse(&[
            "gmode",
            "patterns",
            "--grid",
            "g.tsv",
            "--observations",
            "o.tsv",
            "--config",
            &config_arg,
            "--threads",
            "8",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.method, PatternMethod::HighestFrequency);
        assert_eq!(config.observable, Observable::Frequency);
        assert_eq!(config.threads, 8);
    }

    #[test]
    fn test_unknown_observable_rejected() {
        let result = Cli::try_parse_from([
            "gmode",
            "patterns",
            "--grid",
            "g.tsv",
            "--observations",
            "o.tsv",
            "--observable",
            "amplitude",
        ]);
        assert!(result.is_err());
    }
}
