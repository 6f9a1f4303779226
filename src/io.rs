use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::config::EvaluationConfig;
use crate::error::Result;
use crate::evaluation::EvaluationResults;

/// Serializes an object to a JSON file.
pub fn object_to_json<T: Serialize>(output_path: &Path, object: &T) -> Result<()> {
    let j = serde_json::to_string_pretty(object)?;
    std::fs::write(output_path, j)?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[derive(Debug, Serialize)]
struct ResultsReport<'a> {
    timestamp: String,
    config: &'a EvaluationConfig,
    pose_count: usize,
    prediction_file_count: usize,
    metrics: &'a EvaluationResults,
}

/// Writes the evaluation outcome and the config that produced it as JSON.
pub fn write_results_report(
    output_path: &Path,
    config: &EvaluationConfig,
    pose_count: usize,
    prediction_file_count: usize,
    metrics: &EvaluationResults,
) -> Result<()> {
    use std::time::SystemTime;

    let timestamp = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let report = ResultsReport {
        timestamp: timestamp.to_string(),
        config,
        pose_count,
        prediction_file_count,
        metrics,
    };
    object_to_json(output_path, &report)
}
