use std::path::{Path, PathBuf};

use glob::{Pattern, glob};

use crate::error::{LookupError, Result};
use crate::mocap::MocapLoader;
use crate::types::PoseSequence;

/// Recursively lists files under `root` whose name matches `name_pattern`.
fn find_files(root: &Path, name_pattern: &str) -> Result<Vec<PathBuf>> {
    let root = Pattern::escape(&root.to_string_lossy());
    let pattern = format!("{}/**/{}", root, name_pattern);
    let mut files = glob(&pattern)?.collect::<std::result::Result<Vec<_>, _>>()?;
    files.retain(|p| p.is_file());
    Ok(files)
}

/// Finds the single prediction file for a clip and camera.
///
/// Files are named `{subject}-{clip}-{camera}.{ext}` anywhere below `preds_dir`.
/// With `include_unknown_camera`, files named `{subject}-{clip}.{ext}` are assumed
/// to belong to `camera_id` too.
pub fn find_prediction(
    preds_dir: &Path,
    subject_id: &str,
    clip_id: &str,
    camera_id: &str,
    include_unknown_camera: bool,
) -> Result<PathBuf> {
    let (subject, clip) = (Pattern::escape(subject_id), Pattern::escape(clip_id));
    let camera = Pattern::escape(camera_id);
    let mut pred_files = find_files(preds_dir, &format!("{}-{}-{}.*", subject, clip, camera))?;
    if include_unknown_camera {
        pred_files.extend(find_files(preds_dir, &format!("{}-{}.*", subject, clip))?);
    }
    let key = format!("{}-{}-{}", subject_id, clip_id, camera_id);
    match pred_files.len() {
        0 => Err(LookupError::NotFound(key).into()),
        1 => Ok(pred_files.remove(0)),
        _ => Err(LookupError::Multiple(key).into()),
    }
}

/// [`find_prediction`] followed by loading the file with `loader`.
pub fn find_and_load_prediction(
    preds_dir: &Path,
    subject_id: &str,
    clip_id: &str,
    camera_id: &str,
    include_unknown_camera: bool,
    loader: &dyn MocapLoader,
) -> Result<PoseSequence> {
    let path = find_prediction(
        preds_dir,
        subject_id,
        clip_id,
        camera_id,
        include_unknown_camera,
    )?;
    loader.load(&path)
}
