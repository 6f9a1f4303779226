use serde::{Deserialize, Serialize};

use crate::evaluation::DEFAULT_PCK_THRESHOLD;
use crate::skeleton::ASPSET_17J;

/// Ground truth capture rate of ASPset-510.
pub const CAPTURE_SAMPLE_RATE: f64 = 50.0;
/// Test split predictions are evaluated at this rate.
pub const TEST_SAMPLE_RATE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub split: String,
    pub skeleton: String,
    /// Normalize ground truth to universal scale.
    pub univ: bool,
    /// Skip cameras whose prediction file is missing or ambiguous.
    pub skip_missing: bool,
    pub pck_threshold: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            split: "test".to_string(),
            skeleton: ASPSET_17J.to_string(),
            univ: false,
            skip_missing: false,
            pck_threshold: DEFAULT_PCK_THRESHOLD,
        }
    }
}

impl EvaluationConfig {
    pub fn eval_sample_rate(&self) -> f64 {
        eval_sample_rate(&self.split)
    }
}

pub fn eval_sample_rate(split: &str) -> f64 {
    if split == "test" {
        TEST_SAMPLE_RATE
    } else {
        CAPTURE_SAMPLE_RATE
    }
}
