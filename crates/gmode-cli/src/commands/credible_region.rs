// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — `credible-region` Command
// ─────────────────────────────────────────────────────────────────────

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use gmode_bayes::credible_region_files;
use gmode_types::{CredibleRegionConfig, MeritFunction};

use crate::cli::{CredibleRegionArgs, MeritArg};

pub fn run(args: CredibleRegionArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.merit_table, config.sigma));

    if output.exists() && !args.force {
        tracing::warn!(output = %output.display(), "output already exists; use --force to overwrite");
        return Ok(());
    }

    let region = credible_region_files(&args.merit_table, &output, &config)
        .with_context(|| format!("credible region of {}", args.merit_table.display()))?;

    tracing::info!(
        models = region.table.len(),
        probability = region.probability,
        output = %output.display(),
        "credible region written"
    );
    Ok(())
}

/// `<dir>/<stem>_<sigma>sigma-error-ellipse.tsv`
fn default_output(input: &Path, sigma: u8) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "merit".to_string());
    input.with_file_name(format!("{stem}_{sigma}sigma-error-ellipse.tsv"))
}

fn resolve_config(args: &CredibleRegionArgs) -> Result<CredibleRegionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            CredibleRegionConfig::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => CredibleRegionConfig::default(),
    };

    if let Some(merit) = args.merit_function {
        config.merit_function = match merit {
            MeritArg::Cs => MeritFunction::ChiSquare,
            MeritArg::Md => MeritFunction::Mahalanobis,
        };
    }
    if let Some(n) = args.n_observables {
        config.n_observables = n;
    }
    if let Some(k) = args.n_free_parameters {
        config.n_free_parameters = k;
    }
    if !args.free_parameters.is_empty() {
        config.free_parameters = args.free_parameters.clone();
    }
    if let Some(sigma) = args.sigma {
        config.sigma = sigma;
    }
    if args.ln_det_v.is_some() {
        config.ln_det_v = args.ln_det_v;
    }
    config.validate().context("invalid credible-region configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn parse(argv: &[&str]) -> CredibleRegionArgs {
        match Cli::parse_from(argv).command {
            Commands::CredibleRegion(args) => args,
            _ => panic!("expected credible-region subcommand"),
        }
    }

    #[test]
    fn test_default_output_name() {
        let out = default_output(Path::new("meritvalues/star_CS_period.tsv"), 2);
        assert_eq!(
            out,
            PathBuf::from("meritvalues/star_CS_period_2sigma-error-ellipse.tsv")
        );
    }

    #[test]
    fn test_md_flags() {
        let args = parse(&[
            "gmode",
            "credible-region",
            "--merit-table",
            "m.tsv",
            "--merit-function",
            "MD",
            "-k",
            "5",
            "--free-parameter",
            "M",
            "--free-parameter",
            "Z",
            "--ln-det-v",
            "-42.5",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.merit_function, MeritFunction::Mahalanobis);
        assert_eq!(config.n_free_parameters, 5);
        assert_eq!(config.free_parameters, vec!["M", "Z"]);
        assert_eq!(config.ln_det_v, Some(-42.5));
        assert_eq!(config.sigma, 2);
    }

    #[test]
    fn test_cs_requires_enough_observables() {
        let args = parse(&[
            "gmode",
            "credible-region",
            "--merit-table",
            "m.tsv",
            "--n-observables",
            "3",
            "-k",
            "3",
        ]);
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_run_writes_region() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("star_CS.tsv");
        fs::write(&input, "M\tmeritValue\n1.5\t0\n2.0\t50\n").unwrap();
        let input_arg = input.to_string_lossy().to_string();
        let args = parse(&[
            "gmode",
            "credible-region",
            "--merit-table",
            &input_arg,
            "--n-observables",
            "3",
            "-k",
            "1",
        ]);
        run(args).unwrap();

        let written =
            fs::read_to_string(dir.path().join("star_CS_2sigma-error-ellipse.tsv")).unwrap();
        assert_eq!(written, "M\tmeritValue\n1.5\t0\n");
    }
}
