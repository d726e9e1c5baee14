use crate::app::SetupError;
use crate::orchestration::RunReport;
use crate::shared::logging;
use serde_json::json;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub const OUTPUT_FILE_ENV: &str = "GITHUB_OUTPUT";

fn output_lines(report: &RunReport) -> Vec<String> {
    let failed: Vec<_> = report
        .failed()
        .into_iter()
        .map(|(id, error)| json!({ "id": id, "error": error }))
        .collect();

    vec![
        format!("environment={}", report.environment),
        format!("deployed={}", json!(report.deployed())),
        format!("destroyed={}", json!(report.destroyed())),
        format!("skipped={}", json!(report.skipped())),
        format!("failed={}", json!(failed)),
    ]
}

/// Appends the run's outputs to the runner's output file. Without one the
/// lines go to the log, which keeps local runs inspectable.
pub fn write_outputs(report: &RunReport) -> Result<(), SetupError> {
    let lines = output_lines(report);
    match std::env::var(OUTPUT_FILE_ENV) {
        Ok(path) => append_lines(Path::new(&path), &lines),
        Err(_) => {
            for line in &lines {
                logging::info(line);
            }
            Ok(())
        }
    }
}

fn append_lines(path: &Path, lines: &[String]) -> Result<(), SetupError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| SetupError::OutputWrite {
            path: path.display().to_string(),
            source,
        })?;
    for line in lines {
        writeln!(file, "{line}").map_err(|source| SetupError::OutputWrite {
            path: path.display().to_string(),
            source,
        })?;
    }
    Ok(())
}
