use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glob::{Pattern, glob};

use crate::error::{EvalError, Result};
use crate::mocap::{MocapFormats, MocapLoader};
use crate::types::{ClipIdentity, PoseSequence};

pub const CAMERA_IDS: [&str; 3] = ["left", "mid", "right"];

/// Ground truth source for evaluation.
pub trait Dataset: Sync {
    /// Clips of `split` in dataset order.
    fn split_clips(&self, split: &str) -> Result<Vec<ClipIdentity>>;
    /// Cameras that observed `clip`, in a stable order.
    fn camera_ids(&self, clip: &ClipIdentity) -> Vec<String>;
    fn load_ground_truth(&self, clip: &ClipIdentity) -> Result<PoseSequence>;
}

/// ASPset-510 on disk.
///
/// ```text
/// {data_dir}/splits.csv
/// {data_dir}/{trainval|test}/joints_3d/{subject}/{subject}-{clip}.{ext}
/// {data_dir}/{trainval|test}/cameras/{subject}/{subject}-{camera}.json
/// ```
pub struct Aspset510 {
    data_dir: PathBuf,
    splits: Vec<(String, Vec<ClipIdentity>)>,
    inv_splits: HashMap<ClipIdentity, String>,
    formats: MocapFormats,
}

impl Aspset510 {
    pub fn open(data_dir: &Path) -> Result<Aspset510> {
        Self::with_formats(data_dir, MocapFormats::with_defaults())
    }

    pub fn with_formats(data_dir: &Path, formats: MocapFormats) -> Result<Aspset510> {
        let splits_file = data_dir.join("splits.csv");
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_path(&splits_file)?;
        let mut splits: Vec<(String, Vec<ClipIdentity>)> = Vec::new();
        let mut inv_splits = HashMap::new();
        for record in reader.deserialize() {
            let (subject_id, clip_id, split): (String, String, String) = record?;
            let clip = ClipIdentity::new(&subject_id, &clip_id);
            match splits.iter_mut().find(|(name, _)| *name == split) {
                Some((_, clips)) => clips.push(clip.clone()),
                None => splits.push((split.clone(), vec![clip.clone()])),
            }
            inv_splits.insert(clip, split);
        }
        log::debug!(
            "read {} clips in {} splits from {}",
            inv_splits.len(),
            splits.len(),
            splits_file.display()
        );
        Ok(Aspset510 {
            data_dir: data_dir.to_path_buf(),
            splits,
            inv_splits,
            formats,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn split_names(&self) -> Vec<&str> {
        self.splits.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn find_split(&self, clip: &ClipIdentity) -> Option<&str> {
        self.inv_splits.get(clip).map(String::as_str)
    }

    /// Train clips followed by val clips.
    pub fn trainval_clips(&self) -> Vec<ClipIdentity> {
        ["train", "val"]
            .iter()
            .filter_map(|s| self.split_clips(s).ok())
            .flatten()
            .collect()
    }

    /// Train, val, then test clips.
    pub fn all_clips(&self) -> Vec<ClipIdentity> {
        let mut clips = self.trainval_clips();
        clips.extend(self.split_clips("test").unwrap_or_default());
        clips
    }

    fn clip_dir(&self, clip: &ClipIdentity, kind: &str) -> PathBuf {
        let part = if self.find_split(clip) == Some("test") {
            "test"
        } else {
            "trainval"
        };
        self.data_dir.join(part).join(kind).join(&clip.subject_id)
    }

    pub fn ground_truth_path(&self, clip: &ClipIdentity) -> Result<PathBuf> {
        let dir = self.clip_dir(clip, "joints_3d");
        let pattern = format!(
            "{}/{}.*",
            Pattern::escape(&dir.to_string_lossy()),
            Pattern::escape(&clip.to_string())
        );
        let mut candidates: Vec<PathBuf> = glob(&pattern)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        candidates.retain(|p| p.is_file() && self.formats.supports(p));
        candidates.sort();
        candidates.into_iter().next().ok_or_else(|| {
            EvalError::Dataset(format!(
                "no readable ground truth for {} in {}",
                clip,
                dir.display()
            ))
        })
    }
}

impl Dataset for Aspset510 {
    fn split_clips(&self, split: &str) -> Result<Vec<ClipIdentity>> {
        self.splits
            .iter()
            .find(|(name, _)| name == split)
            .map(|(_, clips)| clips.clone())
            .ok_or_else(|| EvalError::UnknownSplit(split.to_string()))
    }

    /// Cameras with a calibration file; all of [`CAMERA_IDS`] when calibration is absent.
    fn camera_ids(&self, clip: &ClipIdentity) -> Vec<String> {
        let dir = self.clip_dir(clip, "cameras");
        let calibrated: Vec<String> = CAMERA_IDS
            .iter()
            .filter(|cam| {
                dir.join(format!("{}-{}.json", clip.subject_id, cam))
                    .is_file()
            })
            .map(|cam| cam.to_string())
            .collect();
        if calibrated.is_empty() {
            CAMERA_IDS.iter().map(|cam| cam.to_string()).collect()
        } else {
            calibrated
        }
    }

    fn load_ground_truth(&self, clip: &ClipIdentity) -> Result<PoseSequence> {
        let path = self.ground_truth_path(clip)?;
        self.formats.load(&path)
    }
}
