mod common;

use std::path::Path;

use aspset_eval::EvalError;
use aspset_eval::dataset::{Aspset510, Dataset};
use aspset_eval::types::ClipIdentity;
use common::{walking_sequence, write_sequence};
use tempfile::TempDir;

fn make_dataset(root: &Path) {
    std::fs::write(
        root.join("splits.csv"),
        "04ac,0026,train\n04ac,0027,val\n1e28,0001,test\n04ac,0030,train\n",
    )
    .unwrap();
    let trainval = root.join("trainval").join("joints_3d").join("04ac");
    write_sequence(&trainval, "04ac-0026.json", &walking_sequence(8, 10.0, 50.0));
    let test = root.join("test").join("joints_3d").join("1e28");
    write_sequence(&test, "1e28-0001.json", &walking_sequence(3, 10.0, 50.0));
    let cameras = root.join("test").join("cameras").join("1e28");
    std::fs::create_dir_all(&cameras).unwrap();
    std::fs::write(cameras.join("1e28-mid.json"), "{}").unwrap();
}

#[test]
fn test_splits() {
    let temp_dir = TempDir::new().unwrap();
    make_dataset(temp_dir.path());
    let dataset = Aspset510::open(temp_dir.path()).unwrap();

    assert_eq!(dataset.split_names(), vec!["train", "val", "test"]);
    let train = dataset.split_clips("train").unwrap();
    assert_eq!(
        train,
        vec![ClipIdentity::new("04ac", "0026"), ClipIdentity::new("04ac", "0030")]
    );
    assert_eq!(
        dataset.find_split(&ClipIdentity::new("1e28", "0001")),
        Some("test")
    );
    let trainval: Vec<_> = dataset
        .trainval_clips()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(trainval, vec!["04ac-0026", "04ac-0030", "04ac-0027"]);
    assert_eq!(dataset.all_clips().len(), 4);
    assert!(matches!(
        dataset.split_clips("holdout"),
        Err(EvalError::UnknownSplit(_))
    ));
}

#[test]
fn test_load_ground_truth() {
    let temp_dir = TempDir::new().unwrap();
    make_dataset(temp_dir.path());
    let dataset = Aspset510::open(temp_dir.path()).unwrap();

    let gt = dataset
        .load_ground_truth(&ClipIdentity::new("04ac", "0026"))
        .unwrap();
    assert_eq!(gt.len(), 8);
    assert_eq!(gt.skeleton_name, "aspset_17j");

    let test_gt = dataset
        .load_ground_truth(&ClipIdentity::new("1e28", "0001"))
        .unwrap();
    assert_eq!(test_gt.len(), 3);

    let missing = dataset.load_ground_truth(&ClipIdentity::new("04ac", "0027"));
    assert!(matches!(missing, Err(EvalError::Dataset(_))));
}

#[test]
fn test_camera_ids() {
    let temp_dir = TempDir::new().unwrap();
    make_dataset(temp_dir.path());
    let dataset = Aspset510::open(temp_dir.path()).unwrap();

    assert_eq!(
        dataset.camera_ids(&ClipIdentity::new("1e28", "0001")),
        vec!["mid"]
    );
    assert_eq!(
        dataset.camera_ids(&ClipIdentity::new("04ac", "0026")),
        vec!["left", "mid", "right"]
    );
}

#[test]
fn test_malformed_splits() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("splits.csv"), "04ac,0026\n").unwrap();
    assert!(matches!(
        Aspset510::open(temp_dir.path()),
        Err(EvalError::Csv(_))
    ));
    assert!(Aspset510::open(&temp_dir.path().join("nowhere")).is_err());
}

#[test]
fn test_quoted_splits() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("splits.csv"),
        "\u{feff}\"04ac\",\"0026\",\"test\"\n04ac,\"0027\",val\n",
    )
    .unwrap();
    let dataset = Aspset510::open(temp_dir.path()).unwrap();

    assert_eq!(dataset.split_names(), vec!["test", "val"]);
    assert_eq!(
        dataset.split_clips("test").unwrap(),
        vec![ClipIdentity::new("04ac", "0026")]
    );
    assert_eq!(
        dataset.find_split(&ClipIdentity::new("04ac", "0027")),
        Some("val")
    );
}
