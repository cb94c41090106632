//! Storytelling (S6): three body texts crossfade while screenshots stack,
//! then the article gives way to a closing statement.

use scrollreel_core::timeline::{
    ActiveIndex, Axis, Crossfade, Gate, Interval, Property, StackedCards, Timeline, Track,
    TrackBinding, Unit,
};
use scrollreel_core::{ElementId, Error, GeometryProvider, ProgressModel, Result, Viewport};

use super::measure;
use crate::manifest::PageManifest;
use crate::section::SectionDefinition;

pub const NAME: &str = "storytelling";

/// Raised once the mobile entrance stagger has finished
pub const ENTRANCE_DONE: Gate = Gate::new("entrance_done");

const CONTAINER: &str = "s6-scroll-container";
const ARTICLE: &str = "s6-article";
const ARTICLE_HEADER: &str = "s6-article-header";
const BODY_STATES: &str = "s6-body-states";
const STATEMENT: &str = "s6-statement";
const SCREENSHOTS: &str = "s6-screenshots";
const MOBILE_NAV: &str = "header";

const BODY_FADES: [Crossfade; 2] = [
    Crossfade::new(0.20, 0.24, 0.24, 0.28),
    Crossfade::new(0.44, 0.48, 0.48, 0.52),
];
/// Last body and the article fade together
const ARTICLE_OUT: Interval = Interval::new(0.60, 0.64);
const STATEMENT_IN: Interval = Interval::new(0.64, 0.68);
const STATEMENT_OUT: Interval = Interval::new(0.75, 0.82);
const SHOT_COVERS: [Interval; 2] = [Interval::new(0.14, 0.26), Interval::new(0.34, 0.48)];
/// Bodies rise this far while fading in
const BODY_RISE: f64 = 20.0;
const MOBILE_SLIDE: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variant {
    Desktop,
    Mobile,
}

pub struct Storytelling {
    variant: Variant,
    container: ElementId,
    bodies: Vec<ElementId>,
    shots: Vec<ElementId>,
}

impl Storytelling {
    pub fn desktop(manifest: &PageManifest) -> Self {
        Self::new(Variant::Desktop, manifest)
    }

    pub fn mobile(manifest: &PageManifest) -> Self {
        Self::new(Variant::Mobile, manifest)
    }

    fn new(variant: Variant, manifest: &PageManifest) -> Self {
        Self {
            variant,
            container: ElementId::new(CONTAINER),
            bodies: manifest.storytelling_bodies.clone(),
            shots: manifest.storytelling_shots.clone(),
        }
    }

    fn body_bindings(&self) -> Result<Vec<TrackBinding>> {
        if self.bodies.len() != BODY_FADES.len() + 1 {
            return Err(Error::InvalidTimeline(format!(
                "storytelling expects {} bodies, got {}",
                BODY_FADES.len() + 1,
                self.bodies.len()
            )));
        }
        let rise = Property::Translate(Axis::Y, Unit::Px);
        let mut bindings = Vec::new();

        for (i, body) in self.bodies.iter().enumerate() {
            let incoming = i.checked_sub(1).map(|k| BODY_FADES[k]);
            let outgoing = BODY_FADES.get(i).copied();

            let mut opacity = Track::builder(Property::Opacity, if i == 0 { 1.0 } else { 0.0 });
            let mut offset = Track::builder(rise, if i == 0 { 0.0 } else { BODY_RISE });
            if let Some(fade) = incoming {
                opacity = fade.fade_in(opacity);
                offset = offset.hold(fade.in_start).to(fade.in_end, 0.0);
            }
            // hidden bodies drop back to their resting offset
            let out_end = match outgoing {
                Some(fade) => {
                    opacity = fade.fade_out(opacity);
                    fade.out_end
                }
                None => {
                    opacity = opacity.hold(ARTICLE_OUT.start).to(ARTICLE_OUT.end, 0.0);
                    ARTICLE_OUT.end
                }
            };
            offset = offset.hold(out_end).jump(BODY_RISE);

            bindings.push(TrackBinding::new(body.clone(), opacity.build()?));
            bindings.push(TrackBinding::new(body.clone(), offset.build()?));
        }

        let active = ActiveIndex::new(
            self.bodies.clone(),
            BODY_FADES.iter().map(|f| f.in_start).collect(),
        );
        bindings.extend(active.bindings(Property::Foreground)?);
        Ok(bindings)
    }

    fn article_fade() -> Result<Track> {
        Track::builder(Property::Opacity, 1.0)
            .hold(ARTICLE_OUT.start)
            .to(ARTICLE_OUT.end, 0.0)
            .build()
    }

    fn statement_opacity() -> Result<Track> {
        Track::builder(Property::Opacity, 0.0)
            .hold(STATEMENT_IN.start)
            .to(STATEMENT_IN.end, 1.0)
            .hold(STATEMENT_OUT.start)
            .to(STATEMENT_OUT.end, 0.0)
            .build()
    }

    fn shot_bindings(&self) -> Result<Vec<TrackBinding>> {
        StackedCards::new(self.shots.clone(), Axis::Y, SHOT_COVERS.to_vec())
            .with_tail(STATEMENT_OUT)
            .bindings()
    }

    fn desktop_timeline(&self) -> Result<Timeline> {
        let statement_rise = Track::builder(Property::Translate(Axis::Y, Unit::Px), BODY_RISE)
            .hold(STATEMENT_IN.start)
            .to(STATEMENT_IN.end, 0.0)
            .build()?;

        let mut timeline = Timeline::new()
            .bind(ARTICLE, Self::article_fade()?)
            .bind(STATEMENT, Self::statement_opacity()?)
            .bind(STATEMENT, statement_rise);
        for binding in self.body_bindings()?.into_iter().chain(self.shot_bindings()?) {
            timeline.push(binding);
        }
        Ok(timeline)
    }

    /// Centers the statement between the slid-up screenshots and the nav bar
    fn mobile_statement_top(geometry: &dyn GeometryProvider, viewport: Viewport) -> Result<f64> {
        let screenshots = measure(geometry, SCREENSHOTS)?;
        let statement = measure(geometry, STATEMENT)?;
        let nav_top = geometry
            .rect(&ElementId::new(MOBILE_NAV))
            .map_or(viewport.height, |r| r.top);
        let shots_bottom = screenshots.bottom() - MOBILE_SLIDE;
        let available = nav_top - shots_bottom;
        Ok(shots_bottom + (available - statement.height) / 2.0 - 40.0)
    }

    fn mobile_timeline(&self, geometry: &dyn GeometryProvider, viewport: Viewport) -> Result<Timeline> {
        let slide_up = Track::builder(Property::Translate(Axis::Y, Unit::Px), 0.0)
            .hold(ARTICLE_OUT.start)
            .to(ARTICLE_OUT.end, -MOBILE_SLIDE)
            .build()?;
        let statement_top = Self::mobile_statement_top(geometry, viewport)?;

        // header and bodies are animated individually on mobile; the entrance
        // transition owns them until it has finished
        let mut timeline = Timeline::new()
            .with(TrackBinding::new(ARTICLE_HEADER, Self::article_fade()?).gated(ENTRANCE_DONE))
            .with(TrackBinding::new(BODY_STATES, Self::article_fade()?).gated(ENTRANCE_DONE))
            .with(TrackBinding::new(ARTICLE_HEADER, slide_up.clone()).gated(ENTRANCE_DONE))
            .with(TrackBinding::new(SCREENSHOTS, slide_up).gated(ENTRANCE_DONE))
            .bind(STATEMENT, Self::statement_opacity()?)
            .bind(STATEMENT, Track::constant(Property::Top, statement_top));
        for binding in self.body_bindings()?.into_iter().chain(self.shot_bindings()?) {
            timeline.push(binding);
        }
        Ok(timeline)
    }
}

impl SectionDefinition for Storytelling {
    fn name(&self) -> &'static str {
        NAME
    }

    fn container(&self) -> &ElementId {
        &self.container
    }

    fn model(&self) -> ProgressModel {
        ProgressModel::PinAndRelease
    }

    fn build(&self, geometry: &dyn GeometryProvider, viewport: Viewport) -> Result<Timeline> {
        match self.variant {
            Variant::Desktop => self.desktop_timeline(),
            Variant::Mobile => self.mobile_timeline(geometry, viewport),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::testing::FakeGeometry;
    use scrollreel_core::timeline::{Frame, Gates, Length};
    use scrollreel_core::{Progress, Rect};

    fn desktop() -> Timeline {
        let geometry = FakeGeometry::new(1440.0, 900.0);
        Storytelling::desktop(&PageManifest::default())
            .build(&geometry, geometry.viewport)
            .unwrap()
    }

    fn opacity(frame: &Frame, id: &str) -> f64 {
        frame[&ElementId::new(id)].opacity.unwrap()
    }

    #[test]
    fn test_body_crossfade_endpoints() {
        let timeline = desktop();
        let at = |p: f64| timeline.resolve(Progress::new(p), &Gates::new());
        assert_eq!(opacity(&at(0.20), "s6-body-1"), 1.0);
        assert_eq!(opacity(&at(0.24), "s6-body-1"), 0.0);
        assert_eq!(opacity(&at(0.24), "s6-body-2"), 0.0);
        assert_eq!(opacity(&at(0.28), "s6-body-2"), 1.0);
        assert_eq!(opacity(&at(0.52), "s6-body-3"), 1.0);
        assert_eq!(opacity(&at(0.64), "s6-body-3"), 0.0);
    }

    #[test]
    fn test_single_foreground_body() {
        let timeline = desktop();
        for i in 0..=100 {
            let frame = timeline.resolve(Progress::new(i as f64 / 100.0), &Gates::new());
            let foreground = frame.values().filter(|s| s.foreground == Some(true)).count();
            assert_eq!(foreground, 1);
        }
    }

    #[test]
    fn test_body_rises_in() {
        let timeline = desktop();
        let frame = timeline.resolve(Progress::new(0.26), &Gates::new());
        let rise = frame[&ElementId::new("s6-body-2")].translate_y.unwrap();
        assert_eq!(rise.percent, 0.0);
        assert!((rise.px - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_statement_holds() {
        let timeline = desktop();
        let frame = timeline.resolve(Progress::new(0.70), &Gates::new());
        assert_eq!(opacity(&frame, STATEMENT), 1.0);
        assert_eq!(opacity(&frame, ARTICLE), 0.0);
        assert_eq!(opacity(&frame, "s6-shot-3"), 1.0);
    }

    #[test]
    fn test_mobile_gated_until_entrance_done() {
        let geometry = FakeGeometry::new(375.0, 800.0)
            .with(SCREENSHOTS, Rect::new(300.0, 300.0))
            .with(STATEMENT, Rect::new(0.0, 60.0))
            .with(MOBILE_NAV, Rect::new(720.0, 46.0));
        let timeline = Storytelling::mobile(&PageManifest::default())
            .build(&geometry, geometry.viewport)
            .unwrap();

        let closed = timeline.resolve(Progress::new(0.1), &Gates::new());
        assert!(!closed.contains_key(&ElementId::new(ARTICLE_HEADER)));

        let gates = Gates::from([ENTRANCE_DONE]);
        let open = timeline.resolve(Progress::new(0.7), &gates);
        assert_eq!(open[&ElementId::new(ARTICLE_HEADER)].opacity, Some(0.0));
        assert_eq!(
            open[&ElementId::new(SCREENSHOTS)].translate_y,
            Some(Length::px(-MOBILE_SLIDE))
        );
        // 520 + (720 - 520 - 60) / 2 - 40
        assert_eq!(open[&ElementId::new(STATEMENT)].top, Some(550.0));
    }
}
