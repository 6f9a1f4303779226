use std::collections::BTreeMap;
use std::fmt;

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};

/// One skeleton's worth of 3D joint positions, in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<[f32; 3]>", into = "Vec<[f32; 3]>")]
pub struct Pose {
    joints: Vec<na::Vector3<f32>>,
}

impl Pose {
    pub fn new(joints: Vec<na::Vector3<f32>>) -> Pose {
        Pose { joints }
    }

    pub fn from_arrays(joints: &[[f32; 3]]) -> Pose {
        Pose {
            joints: joints.iter().map(|j| na::Vector3::from(*j)).collect(),
        }
    }

    /// Builds a pose from double precision points, rounding to storage precision.
    pub fn from_f64(joints: &[na::Vector3<f64>]) -> Pose {
        Pose {
            joints: joints.iter().map(|j| j.cast::<f32>()).collect(),
        }
    }

    pub fn num_joints(&self) -> usize {
        self.joints.len()
    }

    pub fn joints(&self) -> &[na::Vector3<f32>] {
        &self.joints
    }

    pub fn joint(&self, idx: usize) -> &na::Vector3<f32> {
        &self.joints[idx]
    }

    pub fn to_f64(&self) -> Vec<na::Vector3<f64>> {
        self.joints.iter().map(|j| j.cast::<f64>()).collect()
    }

    pub fn is_finite(&self) -> bool {
        self.joints.iter().all(|j| j.iter().all(|v| v.is_finite()))
    }

    /// Expresses every joint relative to the joint at `root_idx`.
    pub fn root_relative(&self, root_idx: usize) -> Pose {
        let root = self.joints[root_idx];
        Pose {
            joints: self.joints.iter().map(|j| j - root).collect(),
        }
    }

    /// Per-joint Euclidean distances to `other`, computed in double precision.
    pub fn joint_distances(&self, other: &Pose) -> Vec<f64> {
        self.joints
            .iter()
            .zip(&other.joints)
            .map(|(a, b)| (a.cast::<f64>() - b.cast::<f64>()).norm())
            .collect()
    }
}

impl From<Vec<[f32; 3]>> for Pose {
    fn from(joints: Vec<[f32; 3]>) -> Self {
        Pose::from_arrays(&joints)
    }
}

impl From<Pose> for Vec<[f32; 3]> {
    fn from(pose: Pose) -> Self {
        pose.joints.iter().map(|j| [j.x, j.y, j.z]).collect()
    }
}

/// A time series of poses tagged with its skeleton and sample rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseSequence {
    pub skeleton_name: String,
    /// Samples per second.
    pub sample_rate: f64,
    #[serde(rename = "joint_positions")]
    pub poses: Vec<Pose>,
}

impl PoseSequence {
    pub fn new(poses: Vec<Pose>, skeleton_name: &str, sample_rate: f64) -> PoseSequence {
        PoseSequence {
            skeleton_name: skeleton_name.to_string(),
            sample_rate,
            poses,
        }
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Keeps every k-th sample, where k = sample_rate / target_rate.
    ///
    /// Fails with [`EvalError::Configuration`] unless k is a positive integer.
    pub fn resample(&self, target_rate: f64) -> Result<PoseSequence> {
        let ratio = self.sample_rate / target_rate;
        if !ratio.is_finite() || ratio < 1.0 || (ratio - ratio.round()).abs() > 1e-6 {
            return Err(EvalError::Configuration(format!(
                "sample rate not evenly divisible: {} / {}",
                self.sample_rate, target_rate
            )));
        }
        let stride = ratio.round() as usize;
        Ok(PoseSequence {
            skeleton_name: self.skeleton_name.clone(),
            sample_rate: target_rate,
            poses: self.poses.iter().step_by(stride).cloned().collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipIdentity {
    pub subject_id: String,
    pub clip_id: String,
}

impl ClipIdentity {
    pub fn new(subject_id: &str, clip_id: &str) -> ClipIdentity {
        ClipIdentity {
            subject_id: subject_id.to_string(),
            clip_id: clip_id.to_string(),
        }
    }
}

impl fmt::Display for ClipIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.subject_id, self.clip_id)
    }
}

/// Predictions for one clip keyed by camera id, plus the clip's ground truth.
///
/// Both sides share the evaluation sample rate and skeleton.
#[derive(Debug, Clone)]
pub struct EvaluationPair {
    pub clip: ClipIdentity,
    pub predictions: BTreeMap<String, PoseSequence>,
    pub ground_truth: PoseSequence,
}
