use std::path::PathBuf;

use clap::Parser;

use crate::config::EvaluationConfig;
use crate::error::{EvalError, Result};
use crate::io::object_from_json;

#[derive(Debug, Parser)]
#[command(version, about = "Evaluate 3D pose predictions on ASPset-510", author)]
pub struct EvalCli {
    /// path to the base dataset directory
    #[arg(long)]
    pub data_dir: PathBuf,

    /// path to the predictions directory
    #[arg(long)]
    pub predictions: PathBuf,

    /// split of the dataset to evaluate on (e.g. train, val, or test)
    #[arg(long, required_unless_present = "config")]
    pub split: Option<String>,

    /// enable universal pose scale
    #[arg(long, overrides_with = "no_univ")]
    pub univ: bool,

    /// disable universal pose scale
    #[arg(long, overrides_with = "univ")]
    pub no_univ: bool,

    /// skip missing prediction files
    #[arg(long, overrides_with = "no_skip_missing")]
    pub skip_missing: bool,

    /// do not skip missing prediction files
    #[arg(long, overrides_with = "skip_missing")]
    pub no_skip_missing: bool,

    /// skeleton to evaluate in
    #[arg(long)]
    pub skeleton: Option<String>,

    /// PCK distance threshold in millimetres
    #[arg(long)]
    pub pck_threshold: Option<f64>,

    /// JSON file with base evaluation settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// write the results to this JSON file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// load clips in parallel
    #[arg(long)]
    pub parallel: bool,
}

fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl EvalCli {
    /// Settings from `--config` (if any) with explicit flags taking precedence.
    ///
    /// The split has no default: it comes from `--split` or from the config file.
    pub fn evaluation_config(&self) -> Result<EvaluationConfig> {
        let (mut config, has_split) = match &self.config {
            Some(path) => {
                let value: serde_json::Value = object_from_json(path)?;
                let has_split = value.get("split").is_some();
                (serde_json::from_value(value)?, has_split)
            }
            None => (EvaluationConfig::default(), false),
        };
        match &self.split {
            Some(split) => config.split = split.clone(),
            None if !has_split => {
                return Err(EvalError::Configuration(
                    "no split given, pass --split or set \"split\" in the config file".to_string(),
                ));
            }
            None => {}
        }
        if let Some(skeleton) = &self.skeleton {
            config.skeleton = skeleton.clone();
        }
        if let Some(threshold) = self.pck_threshold {
            config.pck_threshold = threshold;
        }
        config.univ = flag_pair(self.univ, self.no_univ).unwrap_or(config.univ);
        config.skip_missing =
            flag_pair(self.skip_missing, self.no_skip_missing).unwrap_or(config.skip_missing);
        Ok(config)
    }
}

pub fn summary_line(pose_count: usize, prediction_file_count: usize) -> String {
    format!(
        "Found {} poses in {} prediction files.",
        pose_count, prediction_file_count
    )
}
