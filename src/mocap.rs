use std::collections::HashMap;
use std::path::Path;

use crate::error::{EvalError, Result};
use crate::io::{object_from_json, object_to_json};
use crate::types::PoseSequence;

/// Reads a motion capture file into a pose sequence.
pub trait MocapLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<PoseSequence>;
}

/// JSON mocap files:
/// `{"skeleton_name": .., "sample_rate": .., "joint_positions": [[[x, y, z], ..], ..]}`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMocapLoader;

impl MocapLoader for JsonMocapLoader {
    fn load(&self, path: &Path) -> Result<PoseSequence> {
        let sequence: PoseSequence = object_from_json(path)?;
        if !(sequence.sample_rate.is_finite() && sequence.sample_rate > 0.0) {
            return Err(EvalError::Configuration(format!(
                "{} declares an invalid sample rate {}",
                path.display(),
                sequence.sample_rate
            )));
        }
        if let Some(first) = sequence.poses.first() {
            if sequence
                .poses
                .iter()
                .any(|p| p.num_joints() != first.num_joints())
            {
                return Err(EvalError::ShapeMismatch(format!(
                    "{} mixes poses with different joint counts",
                    path.display()
                )));
            }
        }
        Ok(sequence)
    }
}

pub fn save_json_mocap(path: &Path, sequence: &PoseSequence) -> Result<()> {
    object_to_json(path, sequence)
}

/// Picks a [`MocapLoader`] by file extension (case-insensitive).
#[derive(Default)]
pub struct MocapFormats {
    loaders: HashMap<String, Box<dyn MocapLoader>>,
}

impl MocapFormats {
    pub fn new() -> MocapFormats {
        MocapFormats::default()
    }

    /// Formats readable without external decoders.
    pub fn with_defaults() -> MocapFormats {
        let mut formats = MocapFormats::new();
        formats.register("json", Box::new(JsonMocapLoader));
        formats
    }

    pub fn register(&mut self, extension: &str, loader: Box<dyn MocapLoader>) {
        self.loaders.insert(extension.to_lowercase(), loader);
    }

    pub fn supports(&self, path: &Path) -> bool {
        extension_of(path).is_some_and(|ext| self.loaders.contains_key(&ext))
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

impl MocapLoader for MocapFormats {
    fn load(&self, path: &Path) -> Result<PoseSequence> {
        let loader = extension_of(path)
            .and_then(|ext| self.loaders.get(&ext))
            .ok_or_else(|| EvalError::UnsupportedFormat(path.display().to_string()))?;
        log::trace!("loading mocap {}", path.display());
        loader.load(path)
    }
}
