//! Sitemap (S7): the tall sitemap image scrolls past while pinned content
//! fades out near the end. Phones pin a sticky block instead.

use scrollreel_core::timeline::{Axis, Gate, Interval, Property, Timeline, Track, TrackBinding, Unit};
use scrollreel_core::{DeviceClass, ElementId, GeometryProvider, ProgressModel, Result, Viewport};

use super::measure;
use crate::section::SectionDefinition;

pub const NAME: &str = "sitemap";

/// Raised with the sitemap's `visible` class
pub const SITEMAP_VISIBLE: Gate = Gate::new("sitemap_visible");
/// Raised once the content entrance has completed
pub const ENTRANCE_COMPLETE: Gate = Gate::new("entrance_complete");

pub const CONTAINER: &str = "s7-scroll-container";
pub const SITEMAP: &str = "s7-sitemap";
pub const CONTENT: &str = "s7-content";
const STICKY: &str = "s7-sticky";

/// Used when the sitemap image has not reported its height yet
const FALLBACK_SITEMAP_HEIGHT: f64 = 1211.0;
const SITEMAP_OPACITY: f64 = 0.9;
const DESKTOP_FADE: Interval = Interval::new(0.72, 0.85);
/// Tablet scroll is shorter, content must be gone before the next section overlaps
const TABLET_FADE: Interval = Interval::new(0.45, 0.62);
/// Space taken by the floating mobile nav bar
const MOBILE_NAV_SPACE: f64 = 112.0;

pub struct Sitemap {
    device: DeviceClass,
    container: ElementId,
}

impl Sitemap {
    pub fn new(device: DeviceClass) -> Self {
        Self {
            device,
            container: ElementId::new(CONTAINER),
        }
    }

    fn scrolling(&self, geometry: &dyn GeometryProvider, viewport: Viewport) -> Result<Timeline> {
        let fade = match self.device {
            DeviceClass::Tablet => TABLET_FADE,
            _ => DESKTOP_FADE,
        };
        let sitemap_height = geometry
            .rect(&ElementId::new(SITEMAP))
            .map(|r| r.height)
            .filter(|h| *h > 0.0)
            .unwrap_or(FALLBACK_SITEMAP_HEIGHT);
        let max_shift = sitemap_height - viewport.height;

        let shift = Track::builder(Property::Translate(Axis::Y, Unit::Px), 0.0)
            .to(1.0, -max_shift)
            .build()?;
        let content = Track::builder(Property::Opacity, 1.0)
            .hold(fade.start)
            .to(fade.end, 0.0)
            .build()?;
        let sitemap = Track::builder(Property::Opacity, SITEMAP_OPACITY)
            .hold(fade.start)
            .to(fade.end, 0.0)
            .build()?;

        Ok(Timeline::new()
            .bind(SITEMAP, shift)
            .with(TrackBinding::new(CONTENT, content).gated(ENTRANCE_COMPLETE))
            .with(TrackBinding::new(SITEMAP, sitemap).gated(SITEMAP_VISIBLE)))
    }

    /// Pins the block once its bottom clears the nav bar
    fn sticky(geometry: &dyn GeometryProvider, viewport: Viewport) -> Result<Timeline> {
        let sticky = measure(geometry, STICKY)?;
        let top = (viewport.height - sticky.height - MOBILE_NAV_SPACE).min(0.0);
        Ok(Timeline::new().bind(STICKY, Track::constant(Property::Top, top)))
    }
}

impl SectionDefinition for Sitemap {
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
        match self.device {
            DeviceClass::Phone => Self::sticky(geometry, viewport),
            DeviceClass::Tablet | DeviceClass::Desktop => self.scrolling(geometry, viewport),
        }
    }
}
