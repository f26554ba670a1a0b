//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Lines of trailing stderr kept for failure diagnostics.
const STDERR_TAIL_LINES: usize = 40;

/// Builder for multi-input FFmpeg commands with a filter graph.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input files, in argument order
    inputs: Vec<PathBuf>,
    /// Output file path
    output: PathBuf,
    /// Filter graph
    filter_complex: Option<String>,
    /// Stream labels to map into the output
    maps: Vec<String>,
    /// Output arguments (codecs, bitrates, size)
    output_args: Vec<String>,
    /// Whether to overwrite output
    overwrite: bool,
    /// Log level
    log_level: String,
}

impl FfmpegCommand {
    /// Create a new FFmpeg command.
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            inputs: Vec::new(),
            output: output.as_ref().to_path_buf(),
            filter_complex: None,
            maps: Vec::new(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error".to_string(),
        }
    }

    /// Add an input file.
    pub fn input(mut self, path: impl AsRef<Path>) -> Self {
        self.inputs.push(path.as_ref().to_path_buf());
        self
    }

    /// Set the filter graph.
    pub fn filter_complex(mut self, filter: impl Into<String>) -> Self {
        self.filter_complex = Some(filter.into());
        self
    }

    /// Map a labeled stream into the output.
    pub fn map(mut self, label: impl Into<String>) -> Self {
        self.maps.push(label.into());
        self
    }

    /// Add an output argument.
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Set output frame size.
    pub fn size(self, width: u32, height: u32) -> Self {
        self.output_arg("-s").output_arg(format!("{}x{}", width, height))
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Set encoder preset.
    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.output_arg("-preset").output_arg(preset)
    }

    /// Set CRF (quality).
    pub fn crf(self, crf: u8) -> Self {
        self.output_arg("-crf").output_arg(crf.to_string())
    }

    /// Set audio codec.
    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    /// Set audio bitrate.
    pub fn audio_bitrate(self, bitrate: impl Into<String>) -> Self {
        self.output_arg("-b:a").output_arg(bitrate)
    }

    /// Set log level.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Number of input files added so far.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Build the command arguments.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        args.push("-v".to_string());
        args.push(self.log_level.clone());

        for input in &self.inputs {
            args.push("-i".to_string());
            args.push(input.to_string_lossy().to_string());
        }

        if let Some(filter) = &self.filter_complex {
            args.push("-filter_complex".to_string());
            args.push(filter.clone());
        }

        for label in &self.maps {
            args.push("-map".to_string());
            args.push(label.clone());
        }

        args.extend(self.output_args.clone());
        args.push(self.output.to_string_lossy().to_string());

        args
    }
}

/// Runner for FFmpeg commands with timeout and cancellation.
pub struct FfmpegRunner {
    /// Cancellation signal receiver
    cancel_rx: Option<watch::Receiver<bool>>,
    /// Timeout in seconds
    timeout_secs: Option<u64>,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self {
            cancel_rx: None,
            timeout_secs: None,
        }
    }

    /// Set cancellation signal.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Set timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Run an FFmpeg command to completion.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stderr = child.stderr.take();
        let tail_handle = tokio::spawn(async move {
            let mut tail: Vec<String> = Vec::new();
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.remove(0);
                    }
                    tail.push(line);
                }
            }
            tail.join("\n")
        });

        let result = self.wait_for_completion(&mut child).await;
        let stderr_tail = tail_handle.await.unwrap_or_default();

        match result {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => {
                warn!("FFmpeg exited with status {:?}", status.code());
                Err(MediaError::ffmpeg_failed(
                    "FFmpeg exited with non-zero status",
                    Some(stderr_tail).filter(|s| !s.is_empty()),
                    status.code(),
                ))
            }
            Err(e) => Err(e),
        }
    }

    /// Wait for the child process, applying cancellation and timeout.
    async fn wait_for_completion(
        &self,
        child: &mut Child,
    ) -> MediaResult<std::process::ExitStatus> {
        let mut cancel_rx = self.cancel_rx.clone();

        let wait = async {
            if let Some(cancel_rx) = cancel_rx.as_mut() {
                tokio::select! {
                    status = child.wait() => status.map_err(MediaError::from),
                    changed = cancel_rx.changed() => {
                        if changed.is_ok() && *cancel_rx.borrow() {
                            warn!("FFmpeg cancelled, killing process");
                            let _ = child.kill().await;
                            Err(MediaError::Cancelled)
                        } else {
                            // Sender dropped: keep waiting normally
                            child.wait().await.map_err(MediaError::from)
                        }
                    }
                }
            } else {
                child.wait().await.map_err(MediaError::from)
            }
        };

        if let Some(timeout_secs) = self.timeout_secs {
            match tokio::time::timeout(std::time::Duration::from_secs(timeout_secs), wait).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("FFmpeg timed out after {} seconds, killing process", timeout_secs);
                    let _ = child.kill().await;
                    Err(MediaError::Timeout(timeout_secs))
                }
            }
        } else {
            wait.await
        }
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check if FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_builder_argument_order() {
        let cmd = FfmpegCommand::new("out.mp4")
            .input("a1.mp3")
            .input("i1.png")
            .filter_complex("[1:v]zoompan[v0];[v0][0:a]concat=n=1:v=1:a=1[outv][outa]")
            .map("[outv]")
            .map("[outa]")
            .size(1920, 1080)
            .video_codec("libx264")
            .preset("slow")
            .crf(18)
            .audio_codec("aac")
            .audio_bitrate("192k");

        let args = cmd.build_args();
        assert_eq!(args[0], "-y");

        let i_positions: Vec<usize> = args
            .iter()
            .enumerate()
            .filter(|(_, a)| *a == "-i")
            .map(|(i, _)| i)
            .collect();
        assert_eq!(i_positions.len(), 2);
        assert_eq!(args[i_positions[0] + 1], "a1.mp3");
        assert_eq!(args[i_positions[1] + 1], "i1.png");

        let fc = args.iter().position(|a| a == "-filter_complex").unwrap();
        assert!(fc > i_positions[1]);
        assert!(args.contains(&"-map".to_string()));
        assert!(args.contains(&"1920x1080".to_string()));
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[tokio::test]
    async fn test_missing_input_fails_with_terminal_error() {
        if check_ffmpeg().is_err() {
            // Still a valid terminal failure path, nothing more to assert
            return;
        }
        let cmd = FfmpegCommand::new("/tmp/newsreel-test-never-written.mp4")
            .input("/nonexistent/input.mp3");
        let err = FfmpegRunner::new().with_timeout(30).run(&cmd).await.unwrap_err();
        assert!(matches!(err, MediaError::FfmpegFailed { .. }));
    }
}
