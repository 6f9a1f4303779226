use nalgebra as na;

use crate::error::{EvalError, Result};
use crate::skeleton::Skeleton;
use crate::types::Pose;

/// Universal body scale: 910 mm measured along the limbs from knee to neck.
pub const UNIV_KNEE_NECK_HEIGHT: f64 = 910.0;

fn scale_factor(pose: &Pose, skeleton: &Skeleton) -> Result<f64> {
    let height = skeleton.knee_neck_height(pose)?;
    if !(height.is_finite() && height > 0.0) {
        return Err(EvalError::DegeneratePose(format!(
            "knee-neck height is {}",
            height
        )));
    }
    Ok(UNIV_KNEE_NECK_HEIGHT / height)
}

/// Scales a pose to universal scale about the origin.
pub fn to_univ_scale(pose: &Pose, skeleton: &Skeleton) -> Result<Pose> {
    let k = scale_factor(pose, skeleton)?;
    let joints: Vec<_> = pose.to_f64().iter().map(|j| j * k).collect();
    Ok(Pose::from_f64(&joints))
}

/// Scales a pose to universal scale about its root joint, leaving the root in place.
pub fn to_root_relative_univ_scale(pose: &Pose, skeleton: &Skeleton) -> Result<Pose> {
    let k = scale_factor(pose, skeleton)?;
    let joints = pose.to_f64();
    let root: na::Vector3<f64> = joints[skeleton.root_joint_id()];
    let scaled: Vec<_> = joints.iter().map(|j| (j - root) * k + root).collect();
    Ok(Pose::from_f64(&scaled))
}

pub fn to_univ_scale_batch(poses: &[Pose], skeleton: &Skeleton) -> Result<Vec<Pose>> {
    poses.iter().map(|p| to_univ_scale(p, skeleton)).collect()
}

pub fn to_root_relative_univ_scale_batch(poses: &[Pose], skeleton: &Skeleton) -> Result<Vec<Pose>> {
    poses
        .iter()
        .map(|p| to_root_relative_univ_scale(p, skeleton))
        .collect()
}
