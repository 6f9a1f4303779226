use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};
use crate::procrustes::procrustes;
use crate::skeleton::Skeleton;
use crate::types::Pose;

/// Default PCK distance threshold, in millimetres.
pub const DEFAULT_PCK_THRESHOLD: f64 = 150.0;

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean over pose pairs of the mean per-joint Euclidean distance.
///
/// Returns 0 when there are no poses.
pub fn calculate_mpjpe(actual_poses: &[Pose], expected_poses: &[Pose]) -> f64 {
    let per_pose: Vec<f64> = actual_poses
        .iter()
        .zip(expected_poses)
        .map(|(actual, expected)| mean(&actual.joint_distances(expected)))
        .collect();
    mean(&per_pose)
}

/// Mean over pose pairs of the fraction of joints within `threshold` of the expected position.
///
/// Returns 0 when there are no poses.
pub fn calculate_pck(actual_poses: &[Pose], expected_poses: &[Pose], threshold: f64) -> f64 {
    let per_pose: Vec<f64> = actual_poses
        .iter()
        .zip(expected_poses)
        .map(|(actual, expected)| {
            let dists = actual.joint_distances(expected);
            if dists.is_empty() {
                return 0.0;
            }
            dists.iter().filter(|&&d| d <= threshold).count() as f64 / dists.len() as f64
        })
        .collect();
    mean(&per_pose)
}

/// The six aggregate metrics, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResults {
    pub mpjpe: f64,
    pub rr_mpjpe: f64,
    pub pa_mpjpe: f64,
    pub pck: f64,
    pub rr_pck: f64,
    pub pa_pck: f64,
}

impl EvaluationResults {
    pub fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("MPJPE", self.mpjpe),
            ("Root-relative MPJPE", self.rr_mpjpe),
            ("Procrustes-aligned MPJPE", self.pa_mpjpe),
            ("PCK", self.pck),
            ("Root-relative PCK", self.rr_pck),
            ("Procrustes-aligned PCK", self.pa_pck),
        ]
    }
}

impl fmt::Display for EvaluationResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.named() {
            writeln!(f, "{}: {:.4}", name, value)?;
        }
        Ok(())
    }
}

/// Accumulates predicted/ground-truth pose pairs for one skeleton.
///
/// The Procrustes-aligned prediction is computed when a pair is added, so
/// reading metrics only does distance arithmetic.
pub struct Joints3dEvaluator {
    skeleton: Skeleton,
    actual_poses: Vec<Pose>,
    pa_actual_poses: Vec<Pose>,
    expected_poses: Vec<Pose>,
}

impl Joints3dEvaluator {
    pub fn new(skeleton: Skeleton) -> Joints3dEvaluator {
        Joints3dEvaluator {
            skeleton,
            actual_poses: Vec::new(),
            pa_actual_poses: Vec::new(),
            expected_poses: Vec::new(),
        }
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn len(&self) -> usize {
        self.actual_poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actual_poses.is_empty()
    }

    /// Adds one predicted pose and its ground truth.
    pub fn add(&mut self, actual: &Pose, expected: &Pose) -> Result<()> {
        self.check_pair(actual, expected)?;
        let pa_actual = procrustes(expected, actual)?;
        self.actual_poses.push(actual.clone());
        self.pa_actual_poses.push(pa_actual);
        self.expected_poses.push(expected.clone());
        Ok(())
    }

    /// Joint counts must agree before either pose is checked against the skeleton.
    fn check_pair(&self, actual: &Pose, expected: &Pose) -> Result<()> {
        if actual.num_joints() != expected.num_joints() {
            return Err(EvalError::ShapeMismatch(format!(
                "actual has {} joints, expected has {}",
                actual.num_joints(),
                expected.num_joints()
            )));
        }
        self.skeleton.check_plausible(actual)?;
        self.skeleton.check_plausible(expected)
    }

    /// Adds a sequence of pose pairs, pairing by index.
    ///
    /// Both sequences are validated before anything is added.
    pub fn add_batch(&mut self, actual: &[Pose], expected: &[Pose]) -> Result<()> {
        if actual.len() != expected.len() {
            return Err(EvalError::ShapeMismatch(format!(
                "{} actual poses but {} expected poses",
                actual.len(),
                expected.len()
            )));
        }
        for (a, e) in actual.iter().zip(expected) {
            self.check_pair(a, e)?;
        }
        for (a, e) in actual.iter().zip(expected) {
            self.add(a, e)?;
        }
        Ok(())
    }

    fn to_rr(&self, poses: &[Pose]) -> Vec<Pose> {
        let root = self.skeleton.root_joint_id();
        poses.iter().map(|p| p.root_relative(root)).collect()
    }

    pub fn mpjpe(&self) -> f64 {
        calculate_mpjpe(&self.actual_poses, &self.expected_poses)
    }

    pub fn rr_mpjpe(&self) -> f64 {
        calculate_mpjpe(
            &self.to_rr(&self.actual_poses),
            &self.to_rr(&self.expected_poses),
        )
    }

    pub fn pa_mpjpe(&self) -> f64 {
        calculate_mpjpe(&self.pa_actual_poses, &self.expected_poses)
    }

    pub fn pck(&self, threshold: f64) -> f64 {
        calculate_pck(&self.actual_poses, &self.expected_poses, threshold)
    }

    pub fn rr_pck(&self, threshold: f64) -> f64 {
        calculate_pck(
            &self.to_rr(&self.actual_poses),
            &self.to_rr(&self.expected_poses),
            threshold,
        )
    }

    pub fn pa_pck(&self, threshold: f64) -> f64 {
        calculate_pck(&self.pa_actual_poses, &self.expected_poses, threshold)
    }

    pub fn collect_results(&self) -> EvaluationResults {
        self.collect_results_with_threshold(DEFAULT_PCK_THRESHOLD)
    }

    pub fn collect_results_with_threshold(&self, threshold: f64) -> EvaluationResults {
        EvaluationResults {
            mpjpe: self.mpjpe(),
            rr_mpjpe: self.rr_mpjpe(),
            pa_mpjpe: self.pa_mpjpe(),
            pck: self.pck(threshold),
            rr_pck: self.rr_pck(threshold),
            pa_pck: self.pa_pck(threshold),
        }
    }

    pub fn print_results(&self) {
        print!("{}", self.collect_results());
    }
}
