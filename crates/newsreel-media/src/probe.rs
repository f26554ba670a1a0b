//! FFprobe duration lookup.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// FFprobe JSON output, reduced to what segment timing needs.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

/// Probe a media file's duration in seconds.
pub async fn probe_duration(path: impl AsRef<Path>) -> MediaResult<f64> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_format"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::FfprobeFailed {
            message: format!(
                "ffprobe exited with {:?} for {}",
                output.status.code(),
                path.display()
            ),
        });
    }

    let parsed: FfprobeOutput = serde_json::from_slice(&output.stdout)?;
    let duration = parsed
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| MediaError::FfprobeFailed {
            message: format!("no duration reported for {}", path.display()),
        })?;

    if duration <= 0.0 {
        return Err(MediaError::FfprobeFailed {
            message: format!("non-positive duration for {}", path.display()),
        });
    }
    Ok(duration)
}

/// Duration lookup behind a trait so the planner is testable without
/// ffprobe on PATH.
#[async_trait]
pub trait DurationProbe: Send + Sync {
    async fn duration(&self, path: &Path) -> MediaResult<f64>;
}

/// The real ffprobe-backed probe.
pub struct FfprobeDuration;

#[async_trait]
impl DurationProbe for FfprobeDuration {
    async fn duration(&self, path: &Path) -> MediaResult<f64> {
        probe_duration(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_missing_file() {
        let err = probe_duration("/nonexistent/audio.mp3").await.unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }
}
