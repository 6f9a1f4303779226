mod common;

use approx::assert_abs_diff_eq;
use aspset_eval::EvalError;
use aspset_eval::evaluation::{Joints3dEvaluator, calculate_mpjpe, calculate_pck};
use aspset_eval::skeleton::aspset_17j;
use aspset_eval::types::Pose;
use common::{fixture_pose, translated};

fn two_joint_example() -> (Vec<Pose>, Vec<Pose>) {
    let actual = vec![Pose::from_arrays(&[[1.0, 1.0, 1.0], [0.0, 0.0, 2.0]])];
    let expected = vec![Pose::from_arrays(&[[1.0, 1.0, 1.0], [3.0, 4.0, 2.0]])];
    (actual, expected)
}

#[test]
fn test_calculate_mpjpe() {
    let (actual, expected) = two_joint_example();
    assert_eq!(calculate_mpjpe(&actual, &expected), 2.5);
}

#[test]
fn test_calculate_pck() {
    let (actual, expected) = two_joint_example();
    assert_eq!(calculate_pck(&actual, &expected, 4.0), 0.5);
}

#[test]
fn test_mpjpe_is_symmetric() {
    let (actual, expected) = two_joint_example();
    assert_eq!(
        calculate_mpjpe(&actual, &expected),
        calculate_mpjpe(&expected, &actual)
    );
}

#[test]
fn test_empty_evaluator_reports_zero() {
    let evaluator = Joints3dEvaluator::new(aspset_17j());
    assert!(evaluator.is_empty());
    let results = evaluator.collect_results();
    for (_, value) in results.named() {
        assert_eq!(value, 0.0);
    }
}

#[test]
fn test_identical_poses() {
    let mut evaluator = Joints3dEvaluator::new(aspset_17j());
    let pose = fixture_pose();
    evaluator.add(&pose, &pose).unwrap();
    assert_eq!(evaluator.len(), 1);
    assert_eq!(evaluator.mpjpe(), 0.0);
    assert_eq!(evaluator.rr_mpjpe(), 0.0);
    assert_abs_diff_eq!(evaluator.pa_mpjpe(), 0.0, epsilon = 1e-2);
    for threshold in [1.0, 150.0] {
        assert_eq!(evaluator.pck(threshold), 1.0);
        assert_eq!(evaluator.rr_pck(threshold), 1.0);
        assert_eq!(evaluator.pa_pck(threshold), 1.0);
    }
}

#[test]
fn test_translated_prediction() {
    let mut evaluator = Joints3dEvaluator::new(aspset_17j());
    let expected = fixture_pose();
    let actual = translated(&expected, [0.0, 0.0, 200.0]);
    evaluator.add(&actual, &expected).unwrap();

    let results = evaluator.collect_results();
    assert_abs_diff_eq!(results.mpjpe, 200.0, epsilon = 1e-2);
    assert_abs_diff_eq!(results.rr_mpjpe, 0.0, epsilon = 1e-2);
    assert_abs_diff_eq!(results.pa_mpjpe, 0.0, epsilon = 1e-2);
    assert_eq!(results.pck, 0.0);
    assert_eq!(results.rr_pck, 1.0);
    assert_eq!(results.pa_pck, 1.0);
}

#[test]
fn test_add_batch_pairs_by_index() {
    let mut evaluator = Joints3dEvaluator::new(aspset_17j());
    let expected: Vec<_> = (0..4)
        .map(|i| translated(&fixture_pose(), [i as f32 * 50.0, 0.0, 0.0]))
        .collect();
    let actual: Vec<_> = expected
        .iter()
        .map(|p| translated(p, [0.0, 30.0, 40.0]))
        .collect();
    evaluator.add_batch(&actual, &expected).unwrap();
    assert_eq!(evaluator.len(), 4);
    assert_abs_diff_eq!(evaluator.mpjpe(), 50.0, epsilon = 1e-2);
}

#[test]
fn test_add_batch_length_mismatch() {
    let mut evaluator = Joints3dEvaluator::new(aspset_17j());
    let poses = vec![fixture_pose(), fixture_pose()];
    let result = evaluator.add_batch(&poses, &poses[..1]);
    assert!(matches!(result, Err(EvalError::ShapeMismatch(_))));
    assert!(evaluator.is_empty());
}

#[test]
fn test_implausible_poses_are_rejected() {
    let mut evaluator = Joints3dEvaluator::new(aspset_17j());
    let pose = fixture_pose();

    let zeros = Pose::from_arrays(&[[0.0; 3]; 17]);
    assert!(matches!(
        evaluator.add(&zeros, &pose),
        Err(EvalError::Plausibility(_))
    ));

    let mut joints = common::JOINTS_3D;
    joints[3][1] = f32::NAN;
    let nan_pose = Pose::from_arrays(&joints);
    assert!(matches!(
        evaluator.add(&pose, &nan_pose),
        Err(EvalError::Plausibility(_))
    ));

    let short = Pose::from_arrays(&common::JOINTS_3D[..16]);
    assert!(matches!(
        evaluator.add(&short, &short),
        Err(EvalError::Plausibility(_))
    ));
    assert!(evaluator.is_empty());
}

#[test]
fn test_joint_count_mismatch() {
    let mut evaluator = Joints3dEvaluator::new(aspset_17j());
    let pose = fixture_pose();
    let short = Pose::from_arrays(&common::JOINTS_3D[..16]);

    assert!(matches!(
        evaluator.add(&short, &pose),
        Err(EvalError::ShapeMismatch(_))
    ));
    assert!(matches!(
        evaluator.add_batch(&[pose.clone(), short], &[pose.clone(), pose.clone()]),
        Err(EvalError::ShapeMismatch(_))
    ));
    assert!(evaluator.is_empty());
}

#[test]
fn test_results_formatting() {
    let mut evaluator = Joints3dEvaluator::new(aspset_17j());
    let expected = fixture_pose();
    evaluator
        .add(&translated(&expected, [10.0, 0.0, 0.0]), &expected)
        .unwrap();
    let text = evaluator.collect_results().to_string();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "MPJPE: 10.0000");
    assert!(lines[1].starts_with("Root-relative MPJPE: "));
    assert!(lines[2].starts_with("Procrustes-aligned MPJPE: "));
    assert_eq!(lines[3], "PCK: 1.0000");
    assert_eq!(lines[4], "Root-relative PCK: 1.0000");
    assert_eq!(lines[5], "Procrustes-aligned PCK: 1.0000");
}
