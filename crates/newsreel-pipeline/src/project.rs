//! Per-article on-disk project layout.

use std::path::{Path, PathBuf};

use tracing::debug;

use newsreel_models::article::sanitize_title;
use newsreel_models::segment_file_name;

/// Audio container for segment clips.
const AUDIO_EXT: &str = "mp3";
/// Image container for segment stills.
const IMAGE_EXT: &str = "png";

/// Per-article namespace under the videos root:
///
/// ```text
/// <videos_root>/<slug>/
///   script/script.txt
///   audio/segment-NN.mp3
///   images/segment-NN.png
///   plan.json
///   output.mp4
/// ```
///
/// Creation is idempotent; re-running for the same article reuses the
/// existing tree. Directories are partitioned per article, so no
/// cross-run locking is needed.
#[derive(Debug, Clone)]
pub struct ProjectDirectory {
    root: PathBuf,
}

impl ProjectDirectory {
    /// Create (or re-open) the project tree for an article title.
    pub async fn create(videos_root: impl AsRef<Path>, title: &str) -> std::io::Result<Self> {
        let root = videos_root.as_ref().join(sanitize_title(title));
        for dir in ["script", "audio", "images"] {
            tokio::fs::create_dir_all(root.join(dir)).await?;
        }
        debug!("Project directory ready at {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn script_file(&self) -> PathBuf {
        self.root.join("script").join("script.txt")
    }

    pub fn audio_file(&self, index: usize) -> PathBuf {
        self.root.join("audio").join(segment_file_name(index, AUDIO_EXT))
    }

    pub fn image_file(&self, index: usize) -> PathBuf {
        self.root.join("images").join(segment_file_name(index, IMAGE_EXT))
    }

    pub fn plan_file(&self) -> PathBuf {
        self.root.join("plan.json")
    }

    pub fn output_file(&self) -> PathBuf {
        self.root.join("output.mp4")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_layout_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let project = ProjectDirectory::create(tmp.path(), "Council Approves Budget")
            .await
            .unwrap();

        assert!(project.root().ends_with("Council_Approves_Budget"));
        assert!(project.root().join("audio").is_dir());
        assert!(project.root().join("images").is_dir());
        assert_eq!(
            project.audio_file(0).file_name().unwrap(),
            "segment-01.mp3"
        );
        assert_eq!(
            project.image_file(11).file_name().unwrap(),
            "segment-12.png"
        );
        assert!(project.script_file().ends_with("script/script.txt"));
    }

    #[tokio::test]
    async fn test_recreation_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let first = ProjectDirectory::create(tmp.path(), "Same Article").await.unwrap();
        tokio::fs::write(first.script_file(), "existing script").await.unwrap();

        // Second run for the same article must not error or clobber
        let second = ProjectDirectory::create(tmp.path(), "Same Article").await.unwrap();
        assert_eq!(first.root(), second.root());
        let contents = tokio::fs::read_to_string(second.script_file()).await.unwrap();
        assert_eq!(contents, "existing script");
    }
}
