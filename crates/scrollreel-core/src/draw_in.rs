//! Stroke draw-in of an inline vector illustration.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::easing::Easing;
use crate::geometry::ElementId;
use crate::Result;

/// Per-stroke stagger step
const STROKE_STAGGER: Duration = Duration::from_millis(10);
/// Stagger cap, so large illustrations still finish together
const MAX_STROKE_DELAY: Duration = Duration::from_millis(1500);
const STROKE_DURATION: Duration = Duration::from_secs(2);
const FILL_DELAY: Duration = Duration::from_millis(1800);
const FILL_DURATION: Duration = Duration::from_millis(800);

/// One drawable shape of a loaded asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeInfo {
    pub id: ElementId,
    pub stroked: bool,
    pub filled: bool,
    /// Total path length, `None` when the shape cannot be measured
    #[serde(default)]
    pub path_length: Option<f64>,
}

/// Fetches and parses vector assets; implemented by the host
#[async_trait]
pub trait VectorAssetLoader: Send + Sync {
    async fn load(&self, path: &str) -> Result<Vec<ShapeInfo>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawInPhase {
    Pending,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeChange {
    DashOffset(f64),
    /// Restore the original fill (`true`) or make it transparent
    Fill(bool),
}

/// Style change with its transition timing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeTransition {
    pub shape: ElementId,
    pub change: ShapeChange,
    pub delay: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl ShapeTransition {
    fn instant(shape: ElementId, change: ShapeChange) -> Self {
        Self {
            shape,
            change,
            delay: Duration::ZERO,
            duration: Duration::ZERO,
            easing: Easing::Linear,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrawIn {
    container: ElementId,
    asset: String,
    phase: DrawInPhase,
    strokes: Vec<(ElementId, f64)>,
    fills: Vec<ElementId>,
}

impl DrawIn {
    pub fn new(container: impl Into<ElementId>, asset: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            asset: asset.into(),
            phase: DrawInPhase::Pending,
            strokes: Vec::new(),
            fills: Vec::new(),
        }
    }

    pub fn container(&self) -> &ElementId {
        &self.container
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn phase(&self) -> DrawInPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == DrawInPhase::Ready
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Load the asset and return its initial hidden styles
    ///
    /// A failed load leaves the draw-in permanently not ready.
    pub async fn load(&mut self, loader: &dyn VectorAssetLoader) -> Result<Vec<ShapeTransition>> {
        match loader.load(&self.asset).await {
            Ok(shapes) => Ok(self.prepare(shapes)),
            Err(e) => {
                warn!(asset = %self.asset, error = %e, "Vector asset failed to load");
                self.phase = DrawInPhase::Failed;
                Err(e)
            }
        }
    }

    /// Record measurable strokes and fills, hiding both
    pub fn prepare(&mut self, shapes: Vec<ShapeInfo>) -> Vec<ShapeTransition> {
        self.strokes.clear();
        self.fills.clear();
        for shape in shapes {
            if shape.stroked {
                match shape.path_length {
                    Some(len) if len.is_finite() && len >= 0.0 => {
                        self.strokes.push((shape.id.clone(), len))
                    }
                    _ => debug!(shape = %shape.id, "Stroke without measurable length skipped"),
                }
            }
            if shape.filled {
                self.fills.push(shape.id);
            }
        }
        self.phase = DrawInPhase::Ready;
        debug!(
            asset = %self.asset,
            strokes = self.strokes.len(),
            fills = self.fills.len(),
            "Draw-in ready"
        );
        self.reset()
    }

    /// Stroke delay for the `index`th stroke
    pub fn stroke_delay(index: usize) -> Duration {
        let delay = STROKE_STAGGER.saturating_mul(index.min(u32::MAX as usize) as u32);
        delay.min(MAX_STROKE_DELAY)
    }

    /// Draw every stroke in, then restore fills
    pub fn trigger(&self) -> Vec<ShapeTransition> {
        if !self.is_ready() {
            return Vec::new();
        }
        let strokes = self
            .strokes
            .iter()
            .enumerate()
            .map(|(i, (id, _))| ShapeTransition {
                shape: id.clone(),
                change: ShapeChange::DashOffset(0.0),
                delay: Self::stroke_delay(i),
                duration: STROKE_DURATION,
                easing: Easing::CubicOut,
            });
        let fills = self.fills.iter().map(|id| ShapeTransition {
            shape: id.clone(),
            change: ShapeChange::Fill(true),
            delay: FILL_DELAY,
            duration: FILL_DURATION,
            easing: Easing::CubicOut,
        });
        strokes.chain(fills).collect()
    }

    /// Undrawn state with no transition
    pub fn reset(&self) -> Vec<ShapeTransition> {
        if !self.is_ready() {
            return Vec::new();
        }
        let strokes = self
            .strokes
            .iter()
            .map(|(id, len)| ShapeTransition::instant(id.clone(), ShapeChange::DashOffset(*len)));
        let fills = self
            .fills
            .iter()
            .map(|id| ShapeTransition::instant(id.clone(), ShapeChange::Fill(false)));
        strokes.chain(fills).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct FakeLoader {
        shapes: usize,
    }

    #[async_trait]
    impl VectorAssetLoader for FakeLoader {
        async fn load(&self, _path: &str) -> Result<Vec<ShapeInfo>> {
            Ok((0..self.shapes)
                .map(|i| ShapeInfo {
                    id: ElementId::new(format!("path-{}", i)),
                    stroked: true,
                    filled: i % 2 == 0,
                    path_length: Some(100.0 + i as f64),
                })
                .collect())
        }
    }

    struct FailingLoader;

    #[async_trait]
    impl VectorAssetLoader for FailingLoader {
        async fn load(&self, path: &str) -> Result<Vec<ShapeInfo>> {
            Err(Error::AssetLoad(format!("{}: 404", path)))
        }
    }

    #[tokio::test]
    async fn test_load_hides_strokes_and_fills() {
        let mut draw = DrawIn::new("s3-interface", "assets/oldinterface.svg");
        let initial = draw.load(&FakeLoader { shapes: 3 }).await.unwrap();
        assert!(draw.is_ready());
        assert_eq!(initial.len(), 5);
        assert_eq!(initial[0].change, ShapeChange::DashOffset(100.0));
        assert_eq!(initial[3].change, ShapeChange::Fill(false));
        assert!(initial.iter().all(|t| t.duration.is_zero()));
    }

    #[tokio::test]
    async fn test_trigger_stagger_is_capped() {
        let mut draw = DrawIn::new("s3-interface", "assets/oldinterface.svg");
        draw.load(&FakeLoader { shapes: 400 }).await.unwrap();
        let transitions = draw.trigger();
        let strokes: Vec<_> = transitions
            .iter()
            .filter(|t| matches!(t.change, ShapeChange::DashOffset(_)))
            .collect();
        assert_eq!(strokes.len(), 400);
        assert_eq!(strokes[0].delay, Duration::ZERO);
        assert_eq!(strokes[7].delay, Duration::from_millis(70));
        assert!(strokes.iter().all(|t| t.delay <= Duration::from_millis(1500)));
        assert_eq!(strokes[399].delay, Duration::from_millis(1500));
        assert!(strokes.iter().all(|t| t.duration == Duration::from_secs(2)));

        let fill = transitions
            .iter()
            .find(|t| t.change == ShapeChange::Fill(true))
            .unwrap();
        assert_eq!(fill.delay, Duration::from_millis(1800));
        assert_eq!(fill.duration, Duration::from_millis(800));
    }

    #[tokio::test]
    async fn test_failed_asset_never_ready() {
        let mut draw = DrawIn::new("s3-interface", "missing.svg");
        assert!(draw.load(&FailingLoader).await.is_err());
        assert_eq!(draw.phase(), DrawInPhase::Failed);
        assert!(draw.trigger().is_empty());
        assert!(draw.reset().is_empty());
    }

    #[test]
    fn test_pending_is_noop() {
        let draw = DrawIn::new("s3-interface", "assets/oldinterface.svg");
        assert_eq!(draw.phase(), DrawInPhase::Pending);
        assert!(draw.trigger().is_empty());
    }

    #[test]
    fn test_unmeasurable_stroke_skipped() {
        let mut draw = DrawIn::new("c", "a.svg");
        draw.prepare(vec![ShapeInfo {
            id: "text".into(),
            stroked: true,
            filled: false,
            path_length: None,
        }]);
        assert!(draw.is_ready());
        assert_eq!(draw.stroke_count(), 0);
    }
}
