//! Hero: the dashboard fades while the logo rises to its center and the
//! tagline follows, then both exit upward.

use scrollreel_core::timeline::{Property, Timeline, Track};
use scrollreel_core::{Easing, ElementId, GeometryProvider, ProgressModel, Result, Viewport};

use super::measure;
use crate::section::SectionDefinition;

const CONTAINER: &str = "scroll-spacer";
const DASHBOARD: &str = "dashboard-video";
const LOGO: &str = "brazos-logo";
const TAGLINE: &str = "tagline";

/// Logo entrance runs over [0, 0.35]
const LOGO_IN_END: f64 = 0.35;
/// Tagline entrance runs over [0.2, 0.5]
const TAGLINE_IN: (f64, f64) = (0.2, 0.5);
/// Both exit over [0.6, 0.85]
const EXIT: (f64, f64) = (0.6, 0.85);
/// Dashboard fade starts 30% into the logo entrance
const DASHBOARD_FADE_START: f64 = LOGO_IN_END * 0.3;
const EXIT_RISE: f64 = 150.0;
const TAGLINE_RISE: f64 = 60.0;

/// Viewport positions measured once per layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroLayout {
    pub logo_start_top: f64,
    pub logo_target_top: f64,
    pub tagline_target_top: f64,
}

impl HeroLayout {
    pub fn measure(geometry: &dyn GeometryProvider, viewport: Viewport) -> Result<Self> {
        let dashboard = measure(geometry, DASHBOARD)?;
        let logo = measure(geometry, LOGO)?;
        let logo_target_top = dashboard.center_y() - logo.height / 2.0 - 100.0;
        Ok(Self {
            logo_start_top: viewport.height + 50.0,
            logo_target_top,
            tagline_target_top: logo_target_top + logo.height + 40.0,
        })
    }
}

pub struct Hero {
    container: ElementId,
}

impl Hero {
    pub fn new() -> Self {
        Self {
            container: ElementId::new(CONTAINER),
        }
    }

    pub fn timeline(layout: &HeroLayout) -> Result<Timeline> {
        let ease = Easing::CubicOut;

        let dashboard = Track::builder(Property::Opacity, 1.0)
            .hold(DASHBOARD_FADE_START)
            .to_with(LOGO_IN_END, 0.0, ease)
            .build()?;

        let logo_top = Track::builder(Property::Top, layout.logo_start_top)
            .to_with(LOGO_IN_END, layout.logo_target_top, ease)
            .hold(EXIT.0)
            .to_with(EXIT.1, layout.logo_target_top - EXIT_RISE, ease)
            .build()?;

        // hidden only before the first scroll
        let logo_opacity = Track::builder(Property::Opacity, 0.0)
            .hold(f64::EPSILON)
            .jump(1.0)
            .hold(EXIT.0)
            .to_with(EXIT.1, 0.0, ease)
            .build()?;

        let tagline_top = Track::builder(Property::Top, layout.tagline_target_top + TAGLINE_RISE)
            .hold(TAGLINE_IN.0)
            .to_with(TAGLINE_IN.1, layout.tagline_target_top, ease)
            .hold(EXIT.0)
            .to_with(EXIT.1, layout.tagline_target_top - EXIT_RISE, ease)
            .build()?;

        let tagline_opacity = Track::builder(Property::Opacity, 0.0)
            .hold(TAGLINE_IN.0)
            .to_with(TAGLINE_IN.1, 1.0, ease)
            .hold(EXIT.0)
            .to_with(EXIT.1, 0.0, ease)
            .build()?;

        Ok(Timeline::new()
            .bind(DASHBOARD, dashboard)
            .bind(LOGO, logo_top)
            .bind(LOGO, logo_opacity)
            .bind(TAGLINE, tagline_top)
            .bind(TAGLINE, tagline_opacity))
    }
}

impl Default for Hero {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionDefinition for Hero {
    fn name(&self) -> &'static str {
        "hero"
    }

    fn container(&self) -> &ElementId {
        &self.container
    }

    fn model(&self) -> ProgressModel {
        ProgressModel::Reveal
    }

    fn build(&self, geometry: &dyn GeometryProvider, viewport: Viewport) -> Result<Timeline> {
        Self::timeline(&HeroLayout::measure(geometry, viewport)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::testing::FakeGeometry;
    use scrollreel_core::timeline::Gates;
    use scrollreel_core::{Progress, Rect};

    fn geometry() -> FakeGeometry {
        FakeGeometry::new(1440.0, 900.0)
            .with(DASHBOARD, Rect::new(100.0, 600.0))
            .with(LOGO, Rect::new(950.0, 80.0))
    }

    #[test]
    fn test_layout_from_geometry() {
        let geometry = geometry();
        let layout = HeroLayout::measure(&geometry, geometry.viewport).unwrap();
        assert_eq!(layout.logo_start_top, 950.0);
        assert_eq!(layout.logo_target_top, 400.0 - 40.0 - 100.0);
        assert_eq!(layout.tagline_target_top, 260.0 + 80.0 + 40.0);
    }

    #[test]
    fn test_logo_reaches_target_and_exits() {
        let geometry = geometry();
        let layout = HeroLayout::measure(&geometry, geometry.viewport).unwrap();
        let timeline = Hero::timeline(&layout).unwrap();
        let at = |p: f64| timeline.resolve(Progress::new(p), &Gates::new());

        let start = at(0.0);
        assert_eq!(start[&ElementId::new(LOGO)].top, Some(950.0));
        assert_eq!(start[&ElementId::new(LOGO)].opacity, Some(0.0));
        assert_eq!(start[&ElementId::new(DASHBOARD)].opacity, Some(1.0));

        let held = at(0.5);
        assert_eq!(held[&ElementId::new(LOGO)].top, Some(260.0));
        assert_eq!(held[&ElementId::new(LOGO)].opacity, Some(1.0));
        assert_eq!(held[&ElementId::new(TAGLINE)].opacity, Some(1.0));
        assert_eq!(held[&ElementId::new(DASHBOARD)].opacity, Some(0.0));

        let gone = at(0.9);
        assert_eq!(gone[&ElementId::new(LOGO)].top, Some(110.0));
        assert_eq!(gone[&ElementId::new(TAGLINE)].opacity, Some(0.0));
    }

    #[test]
    fn test_missing_logo_fails_layout() {
        let geometry = FakeGeometry::new(1440.0, 900.0).with(DASHBOARD, Rect::new(100.0, 600.0));
        assert!(Hero::new().build(&geometry, geometry.viewport).is_err());
    }
}
