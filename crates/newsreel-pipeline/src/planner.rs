//! Render plan construction.
//!
//! Planning is pure data-in, data-out: probe each segment's audio
//! duration, derive a frame count, draw a motion effect, and emit an
//! index-ordered [`RenderPlan`]. Nothing here touches the encoder.

use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use newsreel_media::DurationProbe;
use newsreel_models::{
    EffectWeights, MotionSettings, OutputSettings, PlanEntry, RenderPlan, Segment,
};

use crate::error::{MissingAsset, PipelineError, PipelineResult};

pub struct RenderPlanner {
    output: OutputSettings,
    motion: MotionSettings,
    weights: EffectWeights,
    probe: Arc<dyn DurationProbe>,
}

impl RenderPlanner {
    pub fn new(
        output: OutputSettings,
        motion: MotionSettings,
        weights: EffectWeights,
        probe: Arc<dyn DurationProbe>,
    ) -> Self {
        Self {
            output,
            motion,
            weights,
            probe,
        }
    }

    /// Build a plan over fully resolved segments.
    ///
    /// Effects are drawn from `rng`, so a seeded generator reproduces
    /// the same plan for the same segments. Entries come out in segment
    /// order regardless of anything else.
    pub async fn build_plan<R: Rng + ?Sized>(
        &self,
        segments: &[Segment],
        rng: &mut R,
    ) -> PipelineResult<RenderPlan> {
        if segments.is_empty() {
            return Err(PipelineError::EmptyScript);
        }
        let total_weight = self.weights.total();
        if total_weight == 0 {
            return Err(PipelineError::Config(
                "effect weights sum to zero".to_string(),
            ));
        }

        let mut entries = Vec::with_capacity(segments.len());
        for segment in segments {
            let (audio, image) = match (&segment.audio_path, &segment.image_path) {
                (Some(a), Some(i)) => (a.clone(), i.clone()),
                (None, Some(_)) => {
                    return Err(PipelineError::SegmentIncomplete {
                        index: segment.index,
                        missing: MissingAsset::Audio,
                    })
                }
                (Some(_), None) => {
                    return Err(PipelineError::SegmentIncomplete {
                        index: segment.index,
                        missing: MissingAsset::Image,
                    })
                }
                (None, None) => {
                    return Err(PipelineError::SegmentIncomplete {
                        index: segment.index,
                        missing: MissingAsset::Both,
                    })
                }
            };

            let duration = self.probe.duration(&audio).await?;
            let frames = ((duration * f64::from(self.output.fps)).ceil() as u32).max(1);
            let effect = self.weights.choose(rng.random_range(0..total_weight));
            debug!(
                "Segment {}: {:.2}s, {} frames, effect {}",
                segment.index, duration, frames, effect
            );

            entries.push(PlanEntry {
                index: segment.index,
                image,
                audio,
                effect,
                duration,
                frames,
            });
        }

        Ok(RenderPlan {
            entries,
            output: self.output.clone(),
            motion: self.motion.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use newsreel_media::MediaResult;
    use newsreel_models::MotionEffect;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::{Path, PathBuf};

    struct FixedProbe(f64);

    #[async_trait]
    impl DurationProbe for FixedProbe {
        async fn duration(&self, _path: &Path) -> MediaResult<f64> {
            Ok(self.0)
        }
    }

    fn resolved_segment(index: usize) -> Segment {
        let mut s = Segment::new(index, format!("Segment {} text.", index));
        s.audio_path = Some(PathBuf::from(format!("audio/segment-{:02}.mp3", index + 1)));
        s.image_path = Some(PathBuf::from(format!("images/segment-{:02}.png", index + 1)));
        s
    }

    fn planner(probe_secs: f64, weights: EffectWeights) -> RenderPlanner {
        RenderPlanner::new(
            OutputSettings::default(),
            MotionSettings::default(),
            weights,
            Arc::new(FixedProbe(probe_secs)),
        )
    }

    #[tokio::test]
    async fn test_frames_from_duration() {
        let p = planner(3.3, EffectWeights::default());
        let segments = vec![resolved_segment(0)];
        let mut rng = StdRng::seed_from_u64(7);
        let plan = p.build_plan(&segments, &mut rng).await.unwrap();

        // 3.3s at 25fps rounds up to 83 frames
        assert_eq!(plan.entries[0].frames, 83);
        assert!((plan.total_duration() - 3.3).abs() < 1e-9);
        assert!(plan.is_index_aligned());
    }

    #[tokio::test]
    async fn test_minimum_one_frame() {
        let p = planner(0.01, EffectWeights::default());
        let segments = vec![resolved_segment(0)];
        let mut rng = StdRng::seed_from_u64(0);
        let plan = p.build_plan(&segments, &mut rng).await.unwrap();
        assert_eq!(plan.entries[0].frames, 1);
    }

    #[tokio::test]
    async fn test_seeded_rng_reproduces_plan() {
        let p = planner(4.0, EffectWeights::default());
        let segments: Vec<Segment> = (0..6).map(resolved_segment).collect();

        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let plan_a = p.build_plan(&segments, &mut a).await.unwrap();
        let plan_b = p.build_plan(&segments, &mut b).await.unwrap();
        assert_eq!(plan_a, plan_b);
    }

    #[tokio::test]
    async fn test_skewed_weights_pin_effect() {
        // All weight on ZoomIn: every draw lands there
        let weights = EffectWeights([0, 0, 100, 0, 0]);
        let p = planner(2.0, weights);
        let segments: Vec<Segment> = (0..5).map(resolved_segment).collect();
        let mut rng = StdRng::seed_from_u64(99);
        let plan = p.build_plan(&segments, &mut rng).await.unwrap();
        assert!(plan.entries.iter().all(|e| e.effect == MotionEffect::ZoomIn));
    }

    #[tokio::test]
    async fn test_zero_weights_rejected() {
        let p = planner(2.0, EffectWeights([0; 5]));
        let segments = vec![resolved_segment(0)];
        let mut rng = StdRng::seed_from_u64(0);
        let err = p.build_plan(&segments, &mut rng).await.unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[tokio::test]
    async fn test_unresolved_segment_rejected() {
        let p = planner(2.0, EffectWeights::default());
        let mut s = resolved_segment(0);
        s.image_path = None;
        let mut rng = StdRng::seed_from_u64(0);
        let err = p.build_plan(&[s], &mut rng).await.unwrap_err();
        match err {
            PipelineError::SegmentIncomplete { index, missing } => {
                assert_eq!(index, 0);
                assert_eq!(missing, MissingAsset::Image);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_segments_rejected() {
        let p = planner(2.0, EffectWeights::default());
        let mut rng = StdRng::seed_from_u64(0);
        let err = p.build_plan(&[], &mut rng).await.unwrap_err();
        assert!(matches!(err, PipelineError::EmptyScript));
    }
}
