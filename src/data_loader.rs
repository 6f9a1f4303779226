use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

use crate::config::EvaluationConfig;
use crate::dataset::Dataset;
use crate::error::{EvalError, Result};
use crate::mocap::MocapLoader;
use crate::prediction::find_and_load_prediction;
use crate::scale::to_root_relative_univ_scale_batch;
use crate::skeleton::{Skeleton, SkeletonConverter, SkeletonRegistry};
use crate::types::{ClipIdentity, EvaluationPair, PoseSequence};

/// Outcome of looking up one camera's prediction.
#[derive(Debug)]
pub enum CameraLookup {
    Found(PoseSequence),
    /// Missing or ambiguous file while skipping is enabled.
    Skippable(EvalError),
    Fatal(EvalError),
}

/// Pairs every ground truth clip of a split with its per-camera predictions.
///
/// Both sides are resampled to the split's evaluation rate and converted to the
/// target skeleton. Iterate with [`EvaluationDataLoader::iter`]; each call
/// starts a fresh pass.
pub struct EvaluationDataLoader<'a> {
    dataset: &'a dyn Dataset,
    converter: &'a dyn SkeletonConverter,
    mocap_loader: &'a dyn MocapLoader,
    skeleton: Skeleton,
    preds_dir: PathBuf,
    split: String,
    univ: bool,
    skip_missing: bool,
    clips: Vec<ClipIdentity>,
}

impl<'a> EvaluationDataLoader<'a> {
    pub fn new(
        dataset: &'a dyn Dataset,
        skeletons: &'a SkeletonRegistry,
        mocap_loader: &'a dyn MocapLoader,
        preds_dir: &Path,
        config: &EvaluationConfig,
    ) -> Result<EvaluationDataLoader<'a>> {
        let skeleton = skeletons.get(&config.skeleton)?.clone();
        let clips = dataset.split_clips(&config.split)?;
        log::info!("{} clips in split {}", clips.len(), config.split);
        Ok(EvaluationDataLoader {
            dataset,
            converter: skeletons,
            mocap_loader,
            skeleton,
            preds_dir: preds_dir.to_path_buf(),
            split: config.split.clone(),
            univ: config.univ,
            skip_missing: config.skip_missing,
            clips,
        })
    }

    /// Replaces the registry's name-matching converter.
    pub fn with_converter(mut self, converter: &'a dyn SkeletonConverter) -> Self {
        self.converter = converter;
        self
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn clips(&self) -> &[ClipIdentity] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn sample_rate(&self) -> f64 {
        crate::config::eval_sample_rate(&self.split)
    }

    /// Resamples to the evaluation rate and converts to the target skeleton.
    fn prepare(&self, sequence: &PoseSequence) -> Result<PoseSequence> {
        let resampled = sequence.resample(self.sample_rate())?;
        let poses = self.converter.convert(
            &resampled.poses,
            &resampled.skeleton_name,
            self.skeleton.name(),
        )?;
        Ok(PoseSequence::new(
            poses,
            self.skeleton.name(),
            resampled.sample_rate,
        ))
    }

    pub fn lookup_camera(
        &self,
        clip: &ClipIdentity,
        camera_id: &str,
        include_unknown_camera: bool,
    ) -> CameraLookup {
        match find_and_load_prediction(
            &self.preds_dir,
            &clip.subject_id,
            &clip.clip_id,
            camera_id,
            include_unknown_camera,
            self.mocap_loader,
        ) {
            Ok(sequence) => CameraLookup::Found(sequence),
            Err(e) if e.is_lookup() && self.skip_missing => CameraLookup::Skippable(e),
            Err(e) => CameraLookup::Fatal(e),
        }
    }

    pub fn load_clip(&self, clip: &ClipIdentity) -> Result<EvaluationPair> {
        let ground_truth = self.prepare(&self.dataset.load_ground_truth(clip)?)?;
        let ground_truth = if self.univ {
            let poses = to_root_relative_univ_scale_batch(&ground_truth.poses, &self.skeleton)?;
            PoseSequence::new(poses, self.skeleton.name(), ground_truth.sample_rate)
        } else {
            ground_truth
        };

        let camera_ids = self.dataset.camera_ids(clip);
        let include_unknown_camera = camera_ids.len() == 1;
        let mut predictions = BTreeMap::new();
        for camera_id in &camera_ids {
            match self.lookup_camera(clip, camera_id, include_unknown_camera) {
                CameraLookup::Found(sequence) => {
                    predictions.insert(camera_id.clone(), self.prepare(&sequence)?);
                }
                CameraLookup::Skippable(e) => log::warn!("skipping: {}", e),
                CameraLookup::Fatal(e) => return Err(e),
            }
        }
        log::debug!(
            "{}: {} ground truth poses, {} of {} cameras",
            clip,
            ground_truth.len(),
            predictions.len(),
            camera_ids.len()
        );
        Ok(EvaluationPair {
            clip: clip.clone(),
            predictions,
            ground_truth,
        })
    }

    pub fn iter(&self) -> EvaluationIter<'_, 'a> {
        EvaluationIter {
            loader: self,
            next_clip: 0,
            failed: false,
        }
    }

    /// Loads every clip on the rayon pool. Pairs come back in split order; the
    /// first error aborts the whole load.
    pub fn load_all_parallel(&self) -> Result<Vec<EvaluationPair>> {
        self.clips
            .par_iter()
            .progress_count(self.clips.len() as u64)
            .map(|clip| self.load_clip(clip))
            .collect()
    }
}

/// One pass over the loader's clips. Stops after the first error.
pub struct EvaluationIter<'l, 'a> {
    loader: &'l EvaluationDataLoader<'a>,
    next_clip: usize,
    failed: bool,
}

impl Iterator for EvaluationIter<'_, '_> {
    type Item = Result<EvaluationPair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let clip = self.loader.clips.get(self.next_clip)?;
        self.next_clip += 1;
        let pair = self.loader.load_clip(clip);
        self.failed = pair.is_err();
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = self.loader.clips.len() - self.next_clip;
        (0, Some(remaining))
    }
}

impl<'l, 'a> IntoIterator for &'l EvaluationDataLoader<'a> {
    type Item = Result<EvaluationPair>;
    type IntoIter = EvaluationIter<'l, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
