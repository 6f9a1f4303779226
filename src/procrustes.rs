//! Similarity alignment (Umeyama) of one pose onto another.
//!
//! All intermediate quantities are computed in `f64`, whatever the storage
//! precision of the poses, so that rounding does not build up over long
//! evaluation runs.

use nalgebra as na;

use crate::error::{EvalError, Result};
use crate::types::Pose;

/// `x -> scale * rotation * x + translation`
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityTransform {
    pub rotation: na::Matrix3<f64>,
    pub scale: f64,
    pub translation: na::Vector3<f64>,
}

impl SimilarityTransform {
    pub fn transform_point(&self, p: &na::Vector3<f64>) -> na::Vector3<f64> {
        self.rotation * p * self.scale + self.translation
    }

    pub fn apply(&self, pose: &Pose) -> Pose {
        let joints: Vec<_> = pose
            .to_f64()
            .iter()
            .map(|p| self.transform_point(p))
            .collect();
        Pose::from_f64(&joints)
    }
}

fn centroid(points: &[na::Vector3<f64>]) -> na::Vector3<f64> {
    points.iter().fold(na::Vector3::zeros(), |acc, p| acc + p) / points.len() as f64
}

/// Finds the similarity transform minimising the squared distance between
/// the transformed `source` and `target`.
///
/// A reflection in the SVD solution is replaced by the closest proper rotation.
pub fn estimate_similarity(target: &Pose, source: &Pose) -> Result<SimilarityTransform> {
    if target.num_joints() != source.num_joints() {
        return Err(EvalError::ShapeMismatch(format!(
            "cannot align {} joints onto {} joints",
            source.num_joints(),
            target.num_joints()
        )));
    }
    if source.num_joints() == 0 {
        return Err(EvalError::DegeneratePose("pose has no joints".to_string()));
    }
    let src = source.to_f64();
    let dst = target.to_f64();
    let mu_src = centroid(&src);
    let mu_dst = centroid(&dst);

    // H = sum((dst_i - mu_dst) * (src_i - mu_src)^T)
    let mut h = na::Matrix3::<f64>::zeros();
    let mut src_var = 0.0;
    for (s, d) in src.iter().zip(&dst) {
        let sc = s - mu_src;
        let dc = d - mu_dst;
        h += dc * sc.transpose();
        src_var += sc.norm_squared();
    }
    if src_var <= f64::EPSILON {
        return Err(EvalError::DegeneratePose(
            "source joints have zero spread".to_string(),
        ));
    }

    let svd = h.svd(true, true);
    let u = svd
        .u
        .ok_or_else(|| EvalError::DegeneratePose("SVD did not produce U".to_string()))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| EvalError::DegeneratePose("SVD did not produce V^T".to_string()))?;
    let sigma = svd.singular_values;

    let mut signs = na::Vector3::new(1.0, 1.0, 1.0);
    if (u * v_t).determinant() < 0.0 {
        let smallest = sigma
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap_or(2);
        signs[smallest] = -1.0;
    }
    let rotation = u * na::Matrix3::from_diagonal(&signs) * v_t;
    let scale = sigma.component_mul(&signs).sum() / src_var;
    let translation = mu_dst - rotation * mu_src * scale;

    Ok(SimilarityTransform {
        rotation,
        scale,
        translation,
    })
}

/// Returns `source` after optimal similarity alignment onto `target`.
pub fn procrustes(target: &Pose, source: &Pose) -> Result<Pose> {
    let transform = estimate_similarity(target, source)?;
    Ok(transform.apply(source))
}
