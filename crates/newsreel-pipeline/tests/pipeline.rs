//! End-to-end pipeline tests with fake collaborators.
//!
//! These exercise stage attribution and artifact persistence: which
//! stage a failure is pinned to and which files a run leaves behind.
//! The encode itself always fails here (the fake image bytes are not
//! decodable media), which is exactly what the rendering-stage tests
//! rely on.

use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;

use newsreel_media::{DurationProbe, MediaResult, RenderExecutor};
use newsreel_models::{Article, ArticleSource, EffectWeights, RenderPlan};
use newsreel_pipeline::{
    AssetResolver, Pipeline, PipelineConfig, RenderPlanner, Stage,
};
use newsreel_providers::{
    ImageFetcher, ImageGenerator, ImageSearcher, ProviderError, SpeechSynthesizer,
};

struct FakeSpeech;

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, ProviderError> {
        Ok(b"fake-mp3".to_vec())
    }
}

struct FakeSearch {
    fail: bool,
    calls: Mutex<Vec<(String, usize)>>,
}

#[async_trait]
impl ImageSearcher for FakeSearch {
    async fn search(&self, query: &str, offset: usize) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push((query.to_string(), offset));
        if self.fail {
            Err(ProviderError::NotFound)
        } else {
            Ok(format!("http://images.test/{}.png", offset))
        }
    }
}

struct FakeGenerator {
    fail: bool,
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate(&self, _prompt: &str, _count: usize) -> Result<Vec<Vec<u8>>, ProviderError> {
        if self.fail {
            Err(ProviderError::ServiceUnavailable("generator down".into()))
        } else {
            Ok(vec![b"fake-png".to_vec()])
        }
    }
}

struct FakeFetcher;

#[async_trait]
impl ImageFetcher for FakeFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, ProviderError> {
        Ok(b"fake-png".to_vec())
    }
}

struct FixedProbe;

#[async_trait]
impl DurationProbe for FixedProbe {
    async fn duration(&self, _path: &Path) -> MediaResult<f64> {
        Ok(2.5)
    }
}

fn article() -> Article {
    Article {
        title: "Council approves budget".to_string(),
        author: Some("A. Reporter".to_string()),
        source: ArticleSource {
            name: "The Daily".to_string(),
        },
        description: Some("The city budget vote".to_string()),
        content: "Full body.".to_string(),
        url_to_image: Some("http://images.test/lead.jpg".to_string()),
        published_at: None,
    }
}

const NARRATION: &str =
    "The council met on Tuesday evening. The vote passed by a single ballot! \
     Residents now wait for the new budget to take effect.";

struct Harness {
    _tmp: TempDir,
    pipeline: Pipeline,
    project_root: std::path::PathBuf,
}

fn harness(search_fail: bool, gen_fail: bool) -> Harness {
    let tmp = TempDir::new().unwrap();
    let config = PipelineConfig {
        videos_root: tmp.path().to_path_buf(),
        effect_seed: Some(1),
        render_timeout_secs: 30,
        ..PipelineConfig::default()
    };
    let resolver = AssetResolver::new(
        Arc::new(FakeSpeech),
        Arc::new(FakeSearch {
            fail: search_fail,
            calls: Mutex::new(vec![]),
        }),
        Arc::new(FakeGenerator { fail: gen_fail }),
        Arc::new(FakeFetcher),
        config.max_parallel_segments,
    );
    let planner = RenderPlanner::new(
        config.output.clone(),
        config.motion.clone(),
        EffectWeights::default(),
        Arc::new(FixedProbe),
    );
    let executor = RenderExecutor::new(config.render_timeout_secs);
    let project_root = tmp.path().join("Council_approves_budget");
    Harness {
        _tmp: tmp,
        pipeline: Pipeline::new(config, resolver, planner, executor),
        project_root,
    }
}

#[tokio::test]
async fn test_run_reaches_rendering_and_persists_artifacts() {
    let h = harness(false, false);
    let err = h
        .pipeline
        .run(&article(), NARRATION)
        .await
        .expect_err("fake image bytes cannot encode");
    assert_eq!(err.stage, Stage::Rendering);

    // Everything before the encode was persisted
    let script = std::fs::read_to_string(h.project_root.join("script/script.txt")).unwrap();
    assert_eq!(script.lines().count(), 3);
    assert!(script.starts_with("The council met on Tuesday evening."));

    let plan: RenderPlan =
        serde_json::from_slice(&std::fs::read(h.project_root.join("plan.json")).unwrap()).unwrap();
    assert_eq!(plan.len(), 3);
    assert!(plan.is_index_aligned());
    assert!((plan.total_duration() - 7.5).abs() < 1e-9);

    // Assets landed under the project tree with index-paired names
    for i in 1..=3 {
        assert!(h
            .project_root
            .join(format!("audio/segment-{:02}.mp3", i))
            .exists());
        assert!(h
            .project_root
            .join(format!("images/segment-{:02}.png", i))
            .exists());
    }
}

#[tokio::test]
async fn test_empty_narration_fails_at_segmenting() {
    let h = harness(false, false);
    let err = h.pipeline.run(&article(), "   ").await.unwrap_err();
    assert_eq!(err.stage, Stage::Segmenting);
    assert!(!h.project_root.join("script/script.txt").exists());
}

#[tokio::test]
async fn test_exhausted_image_sources_fail_at_resolving() {
    // No lead image, search and generation both down: every image
    // cascade dead-ends
    let h = harness(true, true);
    let mut a = article();
    a.url_to_image = None;

    let err = h.pipeline.run(&a, NARRATION).await.unwrap_err();
    assert_eq!(err.stage, Stage::Resolving);

    // The script survived segmenting; planning never ran
    assert!(h.project_root.join("script/script.txt").exists());
    assert!(!h.project_root.join("plan.json").exists());
}

#[tokio::test]
async fn test_rerun_over_existing_project_is_idempotent() {
    let h = harness(false, false);
    let first = h.pipeline.run(&article(), NARRATION).await.unwrap_err();
    assert_eq!(first.stage, Stage::Rendering);

    // Same article again: the project tree is reused, not an error
    let second = h.pipeline.run(&article(), NARRATION).await.unwrap_err();
    assert_eq!(second.stage, Stage::Rendering);
    assert!(h.project_root.join("plan.json").exists());
}

#[tokio::test]
async fn test_seeded_runs_produce_identical_plans() {
    let h1 = harness(false, false);
    let h2 = harness(false, false);
    let _ = h1.pipeline.run(&article(), NARRATION).await;
    let _ = h2.pipeline.run(&article(), NARRATION).await;

    let read = |h: &Harness| -> RenderPlan {
        serde_json::from_slice(&std::fs::read(h.project_root.join("plan.json")).unwrap()).unwrap()
    };
    let (a, b) = (read(&h1), read(&h2));
    // Same seed, same segments: the effect draws match; paths differ by
    // temp directory so compare the drawn effects
    let effects_a: Vec<_> = a.entries.iter().map(|e| e.effect).collect();
    let effects_b: Vec<_> = b.entries.iter().map(|e| e.effect).collect();
    assert_eq!(effects_a, effects_b);
}
