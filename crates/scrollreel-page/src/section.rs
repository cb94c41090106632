//! Scroll-driven sections: a container, a progress model and a timeline.

use tracing::{debug, trace, warn};

use scrollreel_core::timeline::{Frame, Gate, Gates, Timeline};
use scrollreel_core::{ElementId, GeometryProvider, ProgressModel, Result, Viewport};

/// Static description of one section's timeline
///
/// `build` runs at setup and on every resize; layout constants measured
/// from geometry are baked into the returned timeline.
pub trait SectionDefinition: Send {
    fn name(&self) -> &'static str;

    /// Element whose rect drives progress
    fn container(&self) -> &ElementId;

    fn model(&self) -> ProgressModel;

    fn build(&self, geometry: &dyn GeometryProvider, viewport: Viewport) -> Result<Timeline>;
}

/// Explicit gate flags of one section
#[derive(Debug, Clone, Default)]
pub struct SectionState {
    gates: Gates,
}

impl SectionState {
    pub fn raise(&mut self, gate: Gate) -> bool {
        self.gates.insert(gate)
    }

    pub fn clear(&mut self, gate: Gate) -> bool {
        self.gates.remove(&gate)
    }

    pub fn is_raised(&self, gate: Gate) -> bool {
        self.gates.contains(&gate)
    }

    pub fn gates(&self) -> &Gates {
        &self.gates
    }
}

/// A section definition with its cached timeline and state
pub struct ScrollSection {
    definition: Box<dyn SectionDefinition>,
    timeline: Option<Timeline>,
    state: SectionState,
}

impl ScrollSection {
    pub fn new(definition: Box<dyn SectionDefinition>) -> Self {
        Self {
            definition,
            timeline: None,
            state: SectionState::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.definition.name()
    }

    pub fn state(&self) -> &SectionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SectionState {
        &mut self.state
    }

    pub fn is_built(&self) -> bool {
        self.timeline.is_some()
    }

    /// Rebuild the timeline; a failed build leaves the section inert
    pub fn rebuild(&mut self, geometry: &dyn GeometryProvider, viewport: Viewport) {
        match self.definition.build(geometry, viewport) {
            Ok(timeline) => {
                debug!(
                    section = self.name(),
                    bindings = timeline.bindings().len(),
                    "Section layout built"
                );
                self.timeline = Some(timeline);
            }
            Err(e) => {
                warn!(section = self.name(), error = %e, "Section layout failed, section disabled");
                self.timeline = None;
            }
        }
    }

    /// Resolve the current frame from fresh geometry
    ///
    /// `None` when the section is inert or its container is absent.
    pub fn frame(&self, geometry: &dyn GeometryProvider) -> Option<Frame> {
        let timeline = self.timeline.as_ref()?;
        let Some(rect) = geometry.rect(self.definition.container()) else {
            debug!(section = self.name(), "Container missing, section skipped");
            return None;
        };
        let progress = self
            .definition
            .model()
            .sample(&rect, geometry.viewport().height);
        trace!(section = self.name(), progress = progress.value(), "Section sampled");
        Some(timeline.resolve(progress, self.state.gates()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use scrollreel_core::{ElementId, GeometryProvider, Rect, Viewport};

    /// Static geometry for tests
    #[derive(Debug, Clone)]
    pub struct FakeGeometry {
        pub viewport: Viewport,
        pub rects: HashMap<ElementId, Rect>,
        pub scroll_y: f64,
    }

    impl FakeGeometry {
        pub fn new(width: f64, height: f64) -> Self {
            Self {
                viewport: Viewport::new(width, height),
                rects: HashMap::new(),
                scroll_y: 0.0,
            }
        }

        pub fn with(mut self, id: &str, rect: Rect) -> Self {
            self.rects.insert(ElementId::new(id), rect);
            self
        }

        pub fn set(&mut self, id: &str, rect: Rect) {
            self.rects.insert(ElementId::new(id), rect);
        }
    }

    impl GeometryProvider for FakeGeometry {
        fn rect(&self, element: &ElementId) -> Option<Rect> {
            self.rects.get(element).copied()
        }

        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn scroll_y(&self) -> f64 {
            self.scroll_y
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeGeometry;
    use super::*;
    use scrollreel_core::progress::Progress;
    use scrollreel_core::timeline::{Property, Track, TrackBinding};
    use scrollreel_core::{Error, Rect};

    const READY: Gate = Gate::new("ready");

    struct Fade {
        container: ElementId,
    }

    impl SectionDefinition for Fade {
        fn name(&self) -> &'static str {
            "fade"
        }

        fn container(&self) -> &ElementId {
            &self.container
        }

        fn model(&self) -> ProgressModel {
            ProgressModel::PinAndRelease
        }

        fn build(&self, _geometry: &dyn GeometryProvider, _viewport: Viewport) -> Result<Timeline> {
            let fade = Track::builder(Property::Opacity, 1.0).to(1.0, 0.0).build()?;
            Ok(Timeline::new()
                .bind("content", fade.clone())
                .with(TrackBinding::new("gated", fade).gated(READY)))
        }
    }

    struct Broken;

    impl SectionDefinition for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn container(&self) -> &ElementId {
            unreachable!("never built")
        }

        fn model(&self) -> ProgressModel {
            ProgressModel::Reveal
        }

        fn build(&self, _geometry: &dyn GeometryProvider, _viewport: Viewport) -> Result<Timeline> {
            Err(Error::MissingElement("hero".to_string()))
        }
    }

    #[test]
    fn test_frame_uses_fresh_geometry() {
        let mut geometry = FakeGeometry::new(1280.0, 800.0).with("box", Rect::new(0.0, 1800.0));
        let mut section = ScrollSection::new(Box::new(Fade {
            container: "box".into(),
        }));
        section.rebuild(&geometry, geometry.viewport);

        let frame = section.frame(&geometry).unwrap();
        assert_eq!(frame[&ElementId::new("content")].opacity, Some(1.0));

        geometry.set("box", Rect::new(-500.0, 1800.0));
        let frame = section.frame(&geometry).unwrap();
        let expected = 1.0 - Progress::new(0.5).value();
        assert_eq!(frame[&ElementId::new("content")].opacity, Some(expected));
    }

    #[test]
    fn test_gate_state_controls_binding() {
        let geometry = FakeGeometry::new(1280.0, 800.0).with("box", Rect::new(0.0, 1800.0));
        let mut section = ScrollSection::new(Box::new(Fade {
            container: "box".into(),
        }));
        section.rebuild(&geometry, geometry.viewport);
        assert!(!section.frame(&geometry).unwrap().contains_key(&ElementId::new("gated")));

        section.state_mut().raise(READY);
        assert!(section.frame(&geometry).unwrap().contains_key(&ElementId::new("gated")));
    }

    #[test]
    fn test_missing_container_skips() {
        let geometry = FakeGeometry::new(1280.0, 800.0);
        let mut section = ScrollSection::new(Box::new(Fade {
            container: "box".into(),
        }));
        section.rebuild(&geometry, geometry.viewport);
        assert!(section.frame(&geometry).is_none());
    }

    #[test]
    fn test_failed_build_is_inert() {
        let geometry = FakeGeometry::new(1280.0, 800.0);
        let mut section = ScrollSection::new(Box::new(Broken));
        section.rebuild(&geometry, geometry.viewport);
        assert!(!section.is_built());
        assert!(section.frame(&geometry).is_none());
    }
}
