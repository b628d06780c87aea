use std::fs;
use std::path::{Path, PathBuf};

use image::GrayImage;
use log::debug;

use crate::RunError;

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "pgm", "pnm"];

/// One frame pulled from a [`FrameSource`].
#[derive(Debug)]
pub struct SourceFrame {
    /// 1-based position in the sequence.
    pub index: usize,
    pub path: PathBuf,
    /// Decoded grayscale frame, or why decoding failed.
    pub image: Result<GrayImage, RunError>,
}

/// Ordered grayscale frames from an image file or a directory of frames.
///
/// Directory entries are sorted by file name; files with unknown extensions
/// are ignored. Color images are converted to 8-bit luma on read.
#[derive(Debug)]
pub struct FrameSource {
    paths: Vec<PathBuf>,
    next: usize,
}

impl FrameSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RunError> {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|e| RunError::io(path, e))?;
        let paths = if meta.is_dir() {
            list_frames(path)?
        } else {
            vec![path.to_path_buf()]
        };
        if paths.is_empty() {
            return Err(RunError::NoFrames(path.to_path_buf()));
        }
        debug!("frame source {}: {} frames", path.display(), paths.len());
        Ok(Self { paths, next: 0 })
    }

    /// Source over an explicit list of files, in the given order.
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths, next: 0 }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl Iterator for FrameSource {
    type Item = SourceFrame;

    fn next(&mut self) -> Option<SourceFrame> {
        let path = self.paths.get(self.next)?.clone();
        self.next += 1;
        let image = image::open(&path)
            .map(|img| img.to_luma8())
            .map_err(|e| RunError::image(&path, e));
        Some(SourceFrame {
            index: self.next,
            path,
            image,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.paths.len() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for FrameSource {}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            FRAME_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, RunError> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| RunError::io(dir, e))? {
        let entry = entry.map_err(|e| RunError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() && has_frame_extension(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
