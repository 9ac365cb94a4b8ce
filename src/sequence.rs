//! Numbered frame sequences on disk.
//!
//! The extraction passes, the splice, the retarget pass, and the encoder all
//! communicate through directories of `0001.png`-style files. This module
//! owns the naming convention, directory scanning, and the splice that blends
//! the portrait and landscape passes into one sequence.

use std::path::{Path, PathBuf};

use crate::error::ReframeError;

/// File extension used for extracted frames.
pub(crate) const FRAME_EXTENSION: &str = "png";

/// A single frame file in a sequence directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFile {
    /// 1-based frame number parsed from the file stem.
    pub number: u64,
    /// Full path to the frame image.
    pub path: PathBuf,
}

/// The canonical file name for frame `number`: zero-padded to four digits,
/// growing naturally past 9999 (`0001.png`, `0042.png`, `12345.png`).
pub fn frame_file_name(number: u64) -> String {
    format!("{number:04}.{FRAME_EXTENSION}")
}

/// List the frame files in `dir`, sorted numerically by frame number.
///
/// Only `.png` files whose stem parses as an integer are considered; anything
/// else in the directory is ignored. Numeric sorting matters once a sequence
/// grows past 9999 frames and file names gain a digit.
///
/// # Errors
///
/// Returns [`ReframeError::IoError`] if the directory cannot be read.
pub fn scan<P: AsRef<Path>>(dir: P) -> Result<Vec<FrameFile>, ReframeError> {
    let mut frames = Vec::new();

    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let extension_matches = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case(FRAME_EXTENSION));
        if !extension_matches {
            continue;
        }
        let Some(number) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<u64>().ok())
        else {
            continue;
        };
        frames.push(FrameFile { number, path });
    }

    frames.sort_by_key(|frame| frame.number);
    Ok(frames)
}

/// Splice the portrait and landscape passes into one sequence.
///
/// Frames numbered below `split_frame` are taken from `portrait_dir`, frames
/// at or above it from `landscape_dir`. Files are moved by filesystem rename,
/// keeping their names, so the merged directory ends up with the same dense
/// numbering the passes produced. Returns the number of frames moved.
///
/// A `split_frame` of 0 or 1 takes everything from the landscape pass; one
/// past the last frame number takes everything from the portrait pass.
///
/// # Errors
///
/// Returns [`ReframeError::IoError`] if a directory cannot be read or a
/// rename fails (e.g. the directories are on different filesystems).
pub fn splice<P1, P2, P3>(
    portrait_dir: P1,
    landscape_dir: P2,
    merged_dir: P3,
    split_frame: u64,
) -> Result<u64, ReframeError>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
    P3: AsRef<Path>,
{
    let merged_dir = merged_dir.as_ref();
    std::fs::create_dir_all(merged_dir)?;

    let mut moved: u64 = 0;

    for frame in scan(portrait_dir)? {
        if frame.number < split_frame {
            std::fs::rename(&frame.path, merged_dir.join(frame_file_name(frame.number)))?;
            moved += 1;
        }
    }

    for frame in scan(landscape_dir)? {
        if frame.number >= split_frame {
            std::fs::rename(&frame.path, merged_dir.join(frame_file_name(frame.number)))?;
            moved += 1;
        }
    }

    log::debug!(
        "Spliced {moved} frames into {} (split at {split_frame})",
        merged_dir.display(),
    );
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::frame_file_name;

    #[test]
    fn frame_names_are_zero_padded() {
        assert_eq!(frame_file_name(1), "0001.png");
        assert_eq!(frame_file_name(999), "0999.png");
        assert_eq!(frame_file_name(10000), "10000.png");
    }
}
