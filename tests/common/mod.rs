#![allow(dead_code)]

use std::path::Path;

use aspset_eval::mocap::save_json_mocap;
use aspset_eval::types::{Pose, PoseSequence};
use nalgebra as na;

/// Ground truth joints of 04ac-0026, aspset_17j layout, millimetres.
pub const JOINTS_3D: [[f32; 3]; 17] = [
    [-5.18131775e+02, 1.12147400e+03, 1.85388398e+04],
    [-4.73199890e+02, 7.00602722e+02, 1.85234902e+04],
    [-4.23036896e+02, 3.08107239e+02, 1.85275508e+04],
    [-2.80203583e+02, 1.95340317e+02, 1.84224238e+04],
    [-4.86079163e+02, 6.23998604e+01, 1.83367559e+04],
    [-3.91279541e+02, -1.83917984e+02, 1.83915391e+04],
    [-5.05070129e+02, 1.01266479e+03, 1.87362852e+04],
    [-2.35622971e+02, 6.76157654e+02, 1.86908340e+04],
    [-3.80700531e+02, 3.06988159e+02, 1.86746523e+04],
    [-2.01497665e+02, 9.60998917e+01, 1.86923438e+04],
    [-3.99593689e+02, 5.71454849e+01, 1.87760781e+04],
    [-4.34380341e+02, -1.88396454e+02, 1.87668672e+04],
    [-4.12053192e+02, -5.11558380e+02, 1.85718145e+04],
    [-3.89499725e+02, -3.58688873e+02, 1.85686406e+04],
    [-4.15598541e+02, -2.77202179e+02, 1.85831680e+04],
    [-4.56611267e+02, 6.73956985e+01, 1.86147578e+04],
    [-4.72049225e+02, 2.43091171e+02, 1.86294688e+04],
];

pub fn fixture_pose() -> Pose {
    Pose::from_arrays(&JOINTS_3D)
}

pub fn translated(pose: &Pose, offset: [f32; 3]) -> Pose {
    let offset = na::Vector3::from(offset);
    Pose::new(pose.joints().iter().map(|j| j + offset).collect())
}

/// `n` frames of the fixture walking along x by `step` mm per frame.
pub fn walking_sequence(n: usize, step: f32, sample_rate: f64) -> PoseSequence {
    let base = fixture_pose();
    let poses = (0..n)
        .map(|i| translated(&base, [i as f32 * step, 0.0, 0.0]))
        .collect();
    PoseSequence::new(poses, "aspset_17j", sample_rate)
}

pub fn write_sequence(dir: &Path, file_name: &str, sequence: &PoseSequence) {
    std::fs::create_dir_all(dir).unwrap();
    save_json_mocap(&dir.join(file_name), sequence).unwrap();
}
