//! Mobile slow-scroll of the S2 composition.

use scrollreel_core::timeline::{Axis, Property, Timeline, Track, Unit};
use scrollreel_core::{ElementId, GeometryProvider, ProgressModel, Result, Viewport};

use super::measure;
use crate::section::SectionDefinition;

pub const NAME: &str = "composition_parallax";

const CONTAINER: &str = "section-2";
const COMPOSITION: &str = "section-2-composition";

/// Composition moves at this fraction of scroll speed
const PARALLAX_FACTOR: f64 = 0.35;

pub struct CompositionParallax {
    container: ElementId,
}

impl CompositionParallax {
    pub fn new() -> Self {
        Self {
            container: ElementId::new(CONTAINER),
        }
    }
}

impl Default for CompositionParallax {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionDefinition for CompositionParallax {
    fn name(&self) -> &'static str {
        NAME
    }

    fn container(&self) -> &ElementId {
        &self.container
    }

    fn model(&self) -> ProgressModel {
        ProgressModel::Traverse
    }

    fn build(&self, geometry: &dyn GeometryProvider, _viewport: Viewport) -> Result<Timeline> {
        // progress is scrolled / height, so the shift is linear in scroll distance
        let section = measure(geometry, CONTAINER)?;
        let shift = Track::builder(Property::Translate(Axis::Y, Unit::Px), 0.0)
            .to(1.0, section.height * PARALLAX_FACTOR)
            .build()?;
        Ok(Timeline::new().bind(COMPOSITION, shift))
    }
}
