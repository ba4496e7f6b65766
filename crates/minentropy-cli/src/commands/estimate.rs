use std::path::Path;

use log::info;
use minentropy_core::{
    Alphabet, AssessmentConfig, AssessmentReport, Error, EstimatorKind, Result, assess,
    load_config_from_path,
};

pub struct EstimateCommandConfig<'a> {
    pub path: &'a Path,
    pub alphabet: Alphabet,
    pub max_symbols: Option<usize>,
    pub estimators: Option<Vec<EstimatorKind>>,
    pub sequential: bool,
    pub config_path: Option<&'a Path>,
    pub output_path: Option<&'a Path>,
}

pub fn run(cmd: EstimateCommandConfig<'_>) -> Result<()> {
    let config = resolve_config(&cmd)?;
    let sample = super::read_sample(cmd.path, cmd.alphabet, config.max_symbols)?;
    let symbols = sample.symbols(cmd.alphabet);
    info!("read {} symbols from {}", symbols.len(), cmd.path.display());

    println!(
        "Assessing {} ({} {} symbols, {} estimators{})...\n",
        cmd.path.display(),
        symbols.len(),
        cmd.alphabet,
        config.estimators.len(),
        if config.parallel { "" } else { ", sequential" },
    );

    let report = assess(symbols, cmd.alphabet, &config)?;
    print_report(&report);

    if let Some(path) = cmd.output_path {
        write_report(path, &report)?;
        println!("\nReport saved to: {}", path.display());
    }
    Ok(())
}

/// Write the JSON report. Encoding failures surface as I/O errors, not as
/// configuration errors.
fn write_report(path: &Path, report: &AssessmentReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(report_encoding_error)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn report_encoding_error(e: serde_json::Error) -> Error {
    Error::Io(std::io::Error::from(e))
}

/// Config file first, then command-line overrides.
fn resolve_config(cmd: &EstimateCommandConfig<'_>) -> Result<AssessmentConfig> {
    let mut config = match cmd.config_path {
        Some(path) => load_config_from_path(path)?,
        None => AssessmentConfig::default(),
    };
    if let Some(estimators) = &cmd.estimators {
        config.estimators = estimators.clone();
    }
    if cmd.sequential {
        config.parallel = false;
    }
    if cmd.max_symbols.is_some() {
        config.max_symbols = cmd.max_symbols;
    }
    Ok(config)
}

fn print_report(report: &AssessmentReport) {
    println!(
        "  {:<34} {:>10} {:>8}  Details",
        "Estimator", "H (bits)", "Time"
    );
    println!("  {}", "-".repeat(72));
    for r in &report.estimators {
        match &r.result {
            Ok(estimate) => println!(
                "  {:<34} {:>10.6} {:>7.2}s  {}",
                r.name, estimate.min_entropy, r.elapsed_secs, estimate.details
            ),
            Err(e) => println!(
                "  {:<34} {:>10} {:>7.2}s  {e}",
                r.name, "error", r.elapsed_secs
            ),
        }
    }
    println!("  {}", "-".repeat(72));

    match (report.min_entropy, report.limiting_estimator()) {
        (Some(h), Some(limiting)) => println!(
            "\n  min-entropy = {h:.6} bits per {} symbol (limited by {})",
            report.alphabet, limiting.name
        ),
        _ => println!("\n  No estimator produced a result."),
    }
    if report.failures() > 0 {
        println!("  {} estimator(s) failed.", report.failures());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn command<'a>(path: &'a Path, config_path: Option<&'a Path>) -> EstimateCommandConfig<'a> {
        EstimateCommandConfig {
            path,
            alphabet: Alphabet::Binary,
            max_symbols: None,
            estimators: None,
            sequential: false,
            config_path,
            output_path: None,
        }
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"estimators": ["mcv", "markov"], "parallel": true, "max_symbols": 500}}"#
        )
        .unwrap();

        let sample = Path::new("unused.bin");
        let mut cmd = command(sample, Some(file.path()));
        cmd.sequential = true;
        cmd.estimators = Some(vec![EstimatorKind::Lag]);

        let config = resolve_config(&cmd).unwrap();
        assert_eq!(config.estimators, vec![EstimatorKind::Lag]);
        assert!(!config.parallel);
        assert_eq!(config.max_symbols, Some(500));
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let sample = Path::new("unused.bin");
        let missing = Path::new("/nonexistent/minentropy.json");
        assert!(resolve_config(&command(sample, Some(missing))).is_err());
    }

    #[test]
    fn test_report_encoding_error_is_not_a_config_error() {
        let json_error = serde_json::from_str::<u8>("not json").unwrap_err();
        let err = report_encoding_error(json_error);
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.to_string().contains("configuration"), "{err}");
    }

    #[test]
    fn test_unwritable_report_path_is_an_io_error() {
        let data = vec![0u8; 64];
        let config = AssessmentConfig {
            estimators: vec![EstimatorKind::Mcv],
            parallel: false,
            max_symbols: None,
        };
        let report = assess(&data, Alphabet::Byte, &config).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");
        let err = write_report(&path, &report).unwrap_err();
        assert!(matches!(err, Error::Io(_)), "got {err:?}");
    }

    #[test]
    fn test_run_writes_json_report() {
        let mut sample = tempfile::NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..4096u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
        sample.write_all(&data).unwrap();
        let out = tempfile::NamedTempFile::new().unwrap();

        let mut cmd = command(sample.path(), None);
        cmd.estimators = Some(vec![EstimatorKind::Mcv, EstimatorKind::Markov]);
        cmd.output_path = Some(out.path());
        run(cmd).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.path()).unwrap()).unwrap();
        assert_eq!(json["symbols"], 4096 * 8);
        assert_eq!(json["estimators"].as_array().unwrap().len(), 2);
    }
}
