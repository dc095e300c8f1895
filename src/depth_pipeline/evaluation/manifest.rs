//! Dataset split files
//!
//! One sample per line: `<rgb path> <depth path> [extra fields...]`, paths relative to the RGB
//! and depth roots.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::depth_pipeline::{
    common::error::{PipelineError, Result},
    evaluation::preset::DatasetPreset,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetManifest {
    rgb_paths: Vec<PathBuf>,
    depth_paths: Vec<PathBuf>,
}

impl DatasetManifest {
    pub fn load(
        path: impl AsRef<Path>,
        preset: DatasetPreset,
        rgb_root: impl AsRef<Path>,
        depth_root: impl AsRef<Path>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let manifest = Self::parse(BufReader::new(file), preset, rgb_root, depth_root)?;
        debug!("Read {} samples from {}", manifest.len(), path.display());
        Ok(manifest)
    }

    pub fn parse<R: BufRead>(
        reader: R,
        preset: DatasetPreset,
        rgb_root: impl AsRef<Path>,
        depth_root: impl AsRef<Path>,
    ) -> Result<Self> {
        let (rgb_root, depth_root) = (rgb_root.as_ref(), depth_root.as_ref());
        let mut manifest = Self::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let mut tokens = line.split_whitespace();
            let Some(rgb) = tokens.next() else {
                continue;
            };
            let Some(depth) = tokens.next() else {
                return Err(PipelineError::Manifest {
                    line: index + 1,
                    reason: format!("expected '<rgb> <depth>', got '{}'", line.trim()),
                });
            };

            manifest.rgb_paths.push(rgb_root.join(rgb));
            manifest
                .depth_paths
                .push(depth_root.join(preset.depth_relative_path(rgb, depth)));
        }
        Ok(manifest)
    }

    pub fn rgb_paths(&self) -> &[PathBuf] {
        &self.rgb_paths
    }

    pub fn depth_paths(&self) -> &[PathBuf] {
        &self.depth_paths
    }

    pub fn len(&self) -> usize {
        self.rgb_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rgb_paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const KITTI_SPLIT: &str = "\
2011_09_26/2011_09_26_drive_0002_sync/image_02/data/0000000069.png 2011_09_26_drive_0002_sync/proj_depth/groundtruth/image_02/0000000069.png 721.5377

2011_09_26/2011_09_26_drive_0002_sync/image_02/data/0000000054.png 2011_09_26_drive_0002_sync/proj_depth/groundtruth/image_02/0000000054.png 721.5377
";

    #[test]
    fn test_kitti_depth_goes_under_drive_date() {
        let manifest =
            DatasetManifest::parse(Cursor::new(KITTI_SPLIT), DatasetPreset::Kitti, "/data/rgb", "/data/gt").unwrap();

        assert_eq!(manifest.len(), 2);
        assert_eq!(
            manifest.rgb_paths()[0],
            PathBuf::from("/data/rgb/2011_09_26/2011_09_26_drive_0002_sync/image_02/data/0000000069.png")
        );
        assert_eq!(
            manifest.depth_paths()[1],
            PathBuf::from(
                "/data/gt/2011_09_26/2011_09_26_drive_0002_sync/proj_depth/groundtruth/image_02/0000000054.png"
            )
        );
    }

    #[test]
    fn test_nyu_depth_is_taken_as_is() {
        let split = "/kitchen_0028b/rgb_00045.jpg /kitchen_0028b/sync_depth_00045.png 518.8579\n";
        let manifest = DatasetManifest::parse(Cursor::new(split), DatasetPreset::Nyu, "rgb", "gt").unwrap();

        // Absolute entries replace the root, which matches how the split files are written.
        assert_eq!(manifest.rgb_paths(), &[PathBuf::from("/kitchen_0028b/rgb_00045.jpg")]);
        assert_eq!(manifest.depth_paths(), &[PathBuf::from("/kitchen_0028b/sync_depth_00045.png")]);
    }

    #[test]
    fn test_single_token_line_is_rejected_with_line_number() {
        let split = "a.png b.png\n\nc.png\n";
        let err = DatasetManifest::parse(Cursor::new(split), DatasetPreset::Nyu, "", "").unwrap_err();
        assert!(matches!(err, PipelineError::Manifest { line: 3, .. }));
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = DatasetManifest::parse(Cursor::new("\n  \n"), DatasetPreset::Kitti, "", "").unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("split.txt");
        std::fs::write(&path, "x/a.png b.png\n").unwrap();

        let manifest = DatasetManifest::load(&path, DatasetPreset::Kitti, "r", "d").unwrap();
        assert_eq!(manifest.depth_paths(), &[PathBuf::from("d/x/b.png")]);
        assert!(matches!(
            DatasetManifest::load(dir.path().join("missing.txt"), DatasetPreset::Kitti, "r", "d"),
            Err(PipelineError::IoError(_))
        ));
    }
}
