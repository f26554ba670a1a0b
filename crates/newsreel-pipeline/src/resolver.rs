//! Per-segment asset resolution.
//!
//! Audio and image sub-resolutions for one segment run concurrently with
//! each other; across segments a semaphore bounds parallelism to respect
//! collaborator rate limits. Results are re-assembled by segment index,
//! never by completion order.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use newsreel_models::{Article, ImageSourceKind, Segment};
use newsreel_providers::{
    ImageFetcher, ImageGenerator, ImageSearcher, ProviderError, SpeechSynthesizer,
};

use crate::error::{MissingAsset, PipelineError};
use crate::project::ProjectDirectory;

/// Resolves one audio clip and one image per segment.
pub struct AssetResolver {
    speech: Arc<dyn SpeechSynthesizer>,
    search: Arc<dyn ImageSearcher>,
    generator: Arc<dyn ImageGenerator>,
    fetcher: Arc<dyn ImageFetcher>,
    max_parallel: usize,
}

/// Everything one segment's resolution task needs, owned.
struct SegmentJob {
    index: usize,
    text: String,
    lead_image_url: Option<String>,
    summary: String,
    prompt: String,
    audio_dest: PathBuf,
    image_dest: PathBuf,
}

/// A sub-resolution failure. Provider failures are per-segment and
/// recoverable through the fallback chain; filesystem failures abort the
/// whole run.
enum AssetError {
    Provider(ProviderError),
    Io(std::io::Error),
}

struct SegmentAssets {
    index: usize,
    audio: Result<PathBuf, AssetError>,
    image: Result<(PathBuf, ImageSourceKind), AssetError>,
}

impl SegmentAssets {
    fn io_failure(&self) -> Option<&std::io::Error> {
        let audio_io = match &self.audio {
            Err(AssetError::Io(e)) => Some(e),
            _ => None,
        };
        let image_io = match &self.image {
            Err(AssetError::Io(e)) => Some(e),
            _ => None,
        };
        audio_io.or(image_io)
    }
}

impl AssetResolver {
    pub fn new(
        speech: Arc<dyn SpeechSynthesizer>,
        search: Arc<dyn ImageSearcher>,
        generator: Arc<dyn ImageGenerator>,
        fetcher: Arc<dyn ImageFetcher>,
        max_parallel: usize,
    ) -> Self {
        Self {
            speech,
            search,
            generator,
            fetcher,
            max_parallel: max_parallel.max(1),
        }
    }

    /// Resolve assets for every segment, attaching the resulting paths.
    ///
    /// Segment indices must be contiguous from 0 and match slice
    /// positions, as the segmenter produces them; anything else is a
    /// configuration error. Fails with `SegmentIncomplete` if any
    /// segment ends resolution missing an asset; when both of a
    /// segment's sub-resolutions fail, in-flight resolutions for other
    /// segments are aborted rather than run to completion for a doomed
    /// run.
    pub async fn resolve_all(
        &self,
        article: &Article,
        segments: &mut [Segment],
        project: &ProjectDirectory,
    ) -> Result<(), PipelineError> {
        if segments.is_empty() {
            return Ok(());
        }
        if segments.iter().enumerate().any(|(i, s)| s.index != i) {
            return Err(PipelineError::Config(
                "segment indices must be contiguous from 0".to_string(),
            ));
        }

        let semaphore = Arc::new(Semaphore::new(self.max_parallel));
        let mut join_set: JoinSet<SegmentAssets> = JoinSet::new();

        for segment in segments.iter() {
            let job = SegmentJob {
                index: segment.index,
                text: segment.text.clone(),
                lead_image_url: article.url_to_image.clone(),
                summary: article.topic_summary().to_string(),
                prompt: build_image_prompt(article, &segment.text),
                audio_dest: project.audio_file(segment.index),
                image_dest: project.image_file(segment.index),
            };
            let speech = Arc::clone(&self.speech);
            let search = Arc::clone(&self.search);
            let generator = Arc::clone(&self.generator);
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&semaphore);

            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.unwrap();
                let (audio, image) = tokio::join!(
                    resolve_audio(speech.as_ref(), &job),
                    resolve_image(search.as_ref(), generator.as_ref(), fetcher.as_ref(), &job),
                );
                SegmentAssets { index: job.index, audio, image }
            });
        }

        let mut slots: Vec<Option<SegmentAssets>> = Vec::new();
        slots.resize_with(segments.len(), || None);
        let mut fatal: Option<PipelineError> = None;

        while let Some(joined) = join_set.join_next().await {
            let assets = match joined {
                Ok(assets) => assets,
                Err(e) if e.is_cancelled() => continue,
                Err(e) => {
                    fatal = Some(PipelineError::Io(std::io::Error::other(e)));
                    join_set.abort_all();
                    continue;
                }
            };

            // Filesystem failures abort everything
            if let Some(io) = assets.io_failure() {
                fatal = Some(PipelineError::Io(std::io::Error::new(
                    io.kind(),
                    format!("asset write failed for segment {}: {}", assets.index, io),
                )));
                join_set.abort_all();
                continue;
            }

            if assets.audio.is_err() && assets.image.is_err() && fatal.is_none() {
                warn!(
                    "Segment {} lost both assets, cancelling in-flight resolutions",
                    assets.index
                );
                fatal = Some(PipelineError::SegmentIncomplete {
                    index: assets.index,
                    missing: MissingAsset::Both,
                });
                join_set.abort_all();
                continue;
            }

            let index = assets.index;
            slots[index] = Some(assets);
        }

        if let Some(e) = fatal {
            return Err(e);
        }

        for (index, slot) in slots.into_iter().enumerate() {
            let assets = slot.ok_or(PipelineError::SegmentIncomplete {
                index,
                missing: MissingAsset::Both,
            })?;
            match (assets.audio, assets.image) {
                (Ok(audio), Ok((image, source))) => {
                    info!("Segment {} resolved (image via {})", index, source);
                    segments[index].audio_path = Some(audio);
                    segments[index].image_path = Some(image);
                }
                (Err(e), Ok(_)) => {
                    warn!("Segment {} audio failed: {}", index, e);
                    return Err(PipelineError::SegmentIncomplete {
                        index,
                        missing: MissingAsset::Audio,
                    });
                }
                (Ok(_), Err(e)) => {
                    warn!("Segment {} image failed after fallbacks: {}", index, e);
                    return Err(PipelineError::SegmentIncomplete {
                        index,
                        missing: MissingAsset::Image,
                    });
                }
                (Err(_), Err(_)) => {
                    return Err(PipelineError::SegmentIncomplete {
                        index,
                        missing: MissingAsset::Both,
                    });
                }
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::Provider(e) => e.fmt(f),
            AssetError::Io(e) => e.fmt(f),
        }
    }
}

async fn resolve_audio(speech: &dyn SpeechSynthesizer, job: &SegmentJob) -> Result<PathBuf, AssetError> {
    let bytes = speech
        .synthesize(&job.text)
        .await
        .map_err(AssetError::Provider)?;
    tokio::fs::write(&job.audio_dest, &bytes)
        .await
        .map_err(AssetError::Io)?;
    Ok(job.audio_dest.clone())
}

async fn resolve_image(
    search: &dyn ImageSearcher,
    generator: &dyn ImageGenerator,
    fetcher: &dyn ImageFetcher,
    job: &SegmentJob,
) -> Result<(PathBuf, ImageSourceKind), AssetError> {
    let mut source = ImageSourceKind::preferred_for(job.index);

    loop {
        match attempt_image(search, generator, fetcher, job, source).await {
            Ok(bytes) => {
                tokio::fs::write(&job.image_dest, &bytes)
                    .await
                    .map_err(AssetError::Io)?;
                return Ok((job.image_dest.clone(), source));
            }
            Err(e) => {
                warn!("Segment {} image source {} failed: {}", job.index, source, e);
                match source.next_fallback() {
                    Some(next) => source = next,
                    None => return Err(AssetError::Provider(e)),
                }
            }
        }
    }
}

async fn attempt_image(
    search: &dyn ImageSearcher,
    generator: &dyn ImageGenerator,
    fetcher: &dyn ImageFetcher,
    job: &SegmentJob,
    source: ImageSourceKind,
) -> Result<Vec<u8>, ProviderError> {
    match source {
        ImageSourceKind::LeadImage => {
            let url = job
                .lead_image_url
                .as_deref()
                .ok_or(ProviderError::NotFound)?;
            fetcher.fetch(url).await
        }
        ImageSourceKind::ExternalSearch => {
            // The segment index offsets into the result list so repeated
            // queries surface different results
            let url = search.search(&job.summary, job.index).await?;
            fetcher.fetch(&url).await
        }
        ImageSourceKind::Generative => {
            let mut blobs = generator.generate(&job.prompt, 1).await?;
            if blobs.is_empty() {
                return Err(ProviderError::InvalidResponse(
                    "generator returned no image".to_string(),
                ));
            }
            Ok(blobs.remove(0))
        }
    }
}

/// Generation prompt composed from the article metadata and the segment
/// this image will illustrate.
pub fn build_image_prompt(article: &Article, segment_text: &str) -> String {
    format!(
        "You will be generating an image for a news story with the title: \"{}\" and \
         description \"{}\". The story is segmented into smaller parts, and this image \
         will cover this part of the story: \"{}\". The image should be related to the \
         story, visually appealing, and as realistic as possible. If the prompt calls \
         for a specific celebrity, public figure, or trademarked brand, generate a \
         lookalike image that will not cause any legal infractions.",
        article.title,
        article.topic_summary(),
        segment_text
    )
}
