//! Pipeline orchestration.
//!
//! One run walks segmenting, resolving, planning, and rendering in
//! order; a failure at any stage ends the run with that stage attached.
//! The narration script is persisted as soon as segmentation succeeds
//! and the plan as soon as planning succeeds, so a failed run leaves its
//! partial artifacts on disk for inspection.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, info_span, Instrument};

use newsreel_media::RenderExecutor;
use newsreel_models::{Article, RenderPlan, RunId, Segment};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult, RunError, Stage};
use crate::planner::RenderPlanner;
use crate::project::ProjectDirectory;
use crate::resolver::AssetResolver;
use crate::segmenter::segment_script;

/// The assembled pipeline. Construct once, run per article.
pub struct Pipeline {
    config: PipelineConfig,
    resolver: AssetResolver,
    planner: RenderPlanner,
    executor: RenderExecutor,
}

/// What a successful run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub output: PathBuf,
    pub segments: Vec<Segment>,
    pub plan_path: PathBuf,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        resolver: AssetResolver,
        planner: RenderPlanner,
        executor: RenderExecutor,
    ) -> Self {
        Self {
            config,
            resolver,
            planner,
            executor,
        }
    }

    /// Run the full pipeline for one article and its narration script.
    pub async fn run(&self, article: &Article, narration: &str) -> Result<RunOutcome, RunError> {
        let run_id = RunId::new();
        let span = info_span!("run", id = %run_id, article = %article.slug());

        async {
            info!("Starting run for \"{}\"", article.title);

            let (project, segments) = self
                .segment(article, narration)
                .await
                .map_err(|e| RunError::new(Stage::Segmenting, e))?;

            let segments = self
                .resolve(article, segments, &project)
                .await
                .map_err(|e| RunError::new(Stage::Resolving, e))?;

            let plan = self
                .plan(&segments, &project)
                .await
                .map_err(|e| RunError::new(Stage::Planning, e))?;

            let output = self
                .render(plan, &project)
                .await
                .map_err(|e| RunError::new(Stage::Rendering, e))?;

            info!("Run complete: {}", output.display());
            Ok(RunOutcome {
                run_id,
                output,
                segments,
                plan_path: project.plan_file(),
            })
        }
        .instrument(span)
        .await
    }

    async fn segment(
        &self,
        article: &Article,
        narration: &str,
    ) -> PipelineResult<(ProjectDirectory, Vec<Segment>)> {
        let project =
            ProjectDirectory::create(&self.config.videos_root, &article.title).await?;

        let segments = segment_script(narration, self.config.min_segment_chars);
        if segments.is_empty() {
            return Err(PipelineError::EmptyScript);
        }
        info!("Script split into {} segments", segments.len());

        // One segment per line, in order; this is the narration of record
        let mut script = String::new();
        for segment in &segments {
            script.push_str(&segment.text);
            script.push('\n');
        }
        tokio::fs::write(project.script_file(), script).await?;

        Ok((project, segments))
    }

    async fn resolve(
        &self,
        article: &Article,
        mut segments: Vec<Segment>,
        project: &ProjectDirectory,
    ) -> PipelineResult<Vec<Segment>> {
        self.resolver
            .resolve_all(article, &mut segments, project)
            .await?;
        Ok(segments)
    }

    async fn plan(
        &self,
        segments: &[Segment],
        project: &ProjectDirectory,
    ) -> PipelineResult<RenderPlan> {
        let mut rng = match self.config.effect_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let plan = self.planner.build_plan(segments, &mut rng).await?;

        let json = serde_json::to_vec_pretty(&plan)?;
        tokio::fs::write(project.plan_file(), json).await?;
        info!(
            "Plan persisted: {} entries, {:.1}s total",
            plan.len(),
            plan.total_duration()
        );
        Ok(plan)
    }

    async fn render(
        &self,
        plan: RenderPlan,
        project: &ProjectDirectory,
    ) -> PipelineResult<PathBuf> {
        let handle = self.executor.spawn(plan, project.output_file());
        let output = handle.wait().await?;
        Ok(output)
    }
}
