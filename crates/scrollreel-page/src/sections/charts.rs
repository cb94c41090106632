//! Reports charts (S10, mobile): chart cards cover each other from the
//! right, then the bottom area rises into view.

use scrollreel_core::timeline::{Axis, Interval, Property, StackedCards, Timeline, Track};
use scrollreel_core::{ElementId, GeometryProvider, ProgressModel, Result, Viewport};

use crate::manifest::PageManifest;
use crate::section::SectionDefinition;

pub const NAME: &str = "charts";

const CONTAINER: &str = "s10-scroll-wrapper";
const BOTTOM_AREA: &str = "s10-bottom-area";

const COVERS: [Interval; 2] = [Interval::new(0.20, 0.40), Interval::new(0.55, 0.75)];
/// Last chart is gone halfway through the bottom area's entrance
const TAIL: Interval = Interval::new(0.75, 0.80);
const BOTTOM_ENTER: Interval = Interval::new(0.75, 0.85);
/// Above every chart card
const BOTTOM_Z_INDEX: f64 = 4.0;
/// Bottom area rests near the top so the quote fits
const BOTTOM_FINAL_TOP: f64 = 16.0;

pub struct Charts {
    container: ElementId,
    cards: Vec<ElementId>,
}

impl Charts {
    pub fn new(manifest: &PageManifest) -> Self {
        Self {
            container: ElementId::new(CONTAINER),
            cards: manifest.chart_cards.clone(),
        }
    }
}

impl SectionDefinition for Charts {
    fn name(&self) -> &'static str {
        NAME
    }

    fn container(&self) -> &ElementId {
        &self.container
    }

    fn model(&self) -> ProgressModel {
        ProgressModel::PinAndRelease
    }

    fn build(&self, _geometry: &dyn GeometryProvider, viewport: Viewport) -> Result<Timeline> {
        let vh = viewport.height;
        let bottom_top = Track::builder(Property::Top, vh)
            .hold(BOTTOM_ENTER.start)
            .to(BOTTOM_ENTER.end, vh * 469.0 / 568.0)
            .to(1.0, BOTTOM_FINAL_TOP)
            .build()?;
        let bottom_opacity = Track::builder(Property::Opacity, 0.0)
            .hold(BOTTOM_ENTER.start)
            .to(BOTTOM_ENTER.end, 1.0)
            .build()?;

        let mut timeline = Timeline::new()
            .bind(BOTTOM_AREA, bottom_top)
            .bind(BOTTOM_AREA, bottom_opacity)
            .bind(BOTTOM_AREA, Track::constant(Property::ZIndex, BOTTOM_Z_INDEX));
        let cards = StackedCards::new(self.cards.clone(), Axis::X, COVERS.to_vec()).with_tail(TAIL);
        for binding in cards.bindings()? {
            timeline.push(binding);
        }
        Ok(timeline)
    }
}
