//! Credits (S12): credits and team, then the closing text and call to action.

use scrollreel_core::timeline::{Axis, Gate, Interval, Property, Timeline, Track, TrackBinding, Unit};
use scrollreel_core::{DeviceClass, ElementId, GeometryProvider, ProgressModel, Result, Viewport};

use crate::section::SectionDefinition;

pub const NAME: &str = "credits";

/// Raised when the mobile section first enters the viewport
pub const ENTERED: Gate = Gate::new("entered");

const CONTAINER: &str = "s12-scroll-container";
pub const CREDITS: &str = "s12-credits";
pub const TEAM: &str = "s12-team";
const CLOSING: &str = "s12-closing";
const CTA: &str = "s12-cta";

/// Offset the closing text rises from
const CLOSING_RISE: f64 = 120.0;

#[derive(Debug, Clone, Copy)]
struct Windows {
    /// Desktop-only scroll entrance of credits and team
    entrance: Option<Interval>,
    handover: Interval,
    cta: Interval,
}

const DESKTOP: Windows = Windows {
    entrance: Some(Interval::new(0.0, 0.04)),
    handover: Interval::new(0.28, 0.42),
    cta: Interval::new(0.42, 0.52),
};

const MOBILE: Windows = Windows {
    entrance: None,
    handover: Interval::new(0.50, 0.78),
    cta: Interval::new(0.78, 0.88),
};

/// Entrance rise of credits and team on desktop
const DESKTOP_ENTRANCE_RISE: f64 = 40.0;

pub struct Credits {
    device: DeviceClass,
    container: ElementId,
}

impl Credits {
    pub fn new(device: DeviceClass) -> Self {
        Self {
            device,
            container: ElementId::new(CONTAINER),
        }
    }

    fn timeline(windows: Windows) -> Result<Timeline> {
        let px_y = Property::Translate(Axis::Y, Unit::Px);
        let handover = windows.handover;

        let closing_opacity = Track::builder(Property::Opacity, 0.0)
            .hold(handover.start)
            .to(handover.end, 1.0)
            .build()?;
        let closing_rise = Track::builder(px_y, CLOSING_RISE)
            .hold(handover.start)
            .to(handover.end, 0.0)
            .build()?;
        let cta = Track::builder(Property::Opacity, 0.0)
            .hold(windows.cta.start)
            .to(windows.cta.end, 1.0)
            .build()?;

        let timeline = Timeline::new()
            .bind(CLOSING, closing_opacity)
            .bind(CLOSING, closing_rise)
            .bind(CTA, cta);

        match windows.entrance {
            Some(entrance) => {
                let fade_in = Track::builder(Property::Opacity, 0.0).to(entrance.end, 1.0);
                let rise = Track::builder(px_y, DESKTOP_ENTRANCE_RISE)
                    .hold(entrance.start)
                    .to(entrance.end, 0.0)
                    .build()?;
                let team = fade_in.clone().hold(handover.start).to(handover.end, 0.0);
                Ok(timeline
                    .bind(CREDITS, fade_in.build()?)
                    .bind(CREDITS, rise.clone())
                    .bind(TEAM, team.build()?)
                    .bind(TEAM, rise))
            }
            None => {
                // the entrance transition owns both until the section is entered
                let team = Track::builder(Property::Opacity, 1.0)
                    .hold(handover.start)
                    .to(handover.end, 0.0)
                    .build()?;
                Ok(timeline
                    .with(TrackBinding::new(CREDITS, Track::constant(Property::Opacity, 1.0)).gated(ENTERED))
                    .with(TrackBinding::new(CREDITS, Track::constant(px_y, 0.0)).gated(ENTERED))
                    .with(TrackBinding::new(TEAM, team).gated(ENTERED))
                    .with(TrackBinding::new(TEAM, Track::constant(px_y, 0.0)).gated(ENTERED)))
            }
        }
    }
}

impl SectionDefinition for Credits {
    fn name(&self) -> &'static str {
        NAME
    }

    fn container(&self) -> &ElementId {
        &self.container
    }

    fn model(&self) -> ProgressModel {
        ProgressModel::PinAndRelease
    }

    fn build(&self, _geometry: &dyn GeometryProvider, _viewport: Viewport) -> Result<Timeline> {
        if self.device.is_mobile() {
            Self::timeline(MOBILE)
        } else {
            Self::timeline(DESKTOP)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::testing::FakeGeometry;
    use scrollreel_core::timeline::{Frame, Gates, Length};
    use scrollreel_core::Progress;

    fn build(device: DeviceClass) -> Timeline {
        let geometry = FakeGeometry::new(1440.0, 900.0);
        Credits::new(device).build(&geometry, geometry.viewport).unwrap()
    }

    fn opacity(frame: &Frame, id: &str) -> Option<f64> {
        frame.get(&ElementId::new(id)).and_then(|s| s.opacity)
    }

    #[test]
    fn test_desktop_handover() {
        let timeline = build(DeviceClass::Desktop);
        let at = |p: f64| timeline.resolve(Progress::new(p), &Gates::new());

        let start = at(0.0);
        assert_eq!(opacity(&start, CREDITS), Some(0.0));
        assert_eq!(
            start[&ElementId::new(TEAM)].translate_y,
            Some(Length::px(40.0))
        );

        let shown = at(0.2);
        assert_eq!(opacity(&shown, TEAM), Some(1.0));
        assert_eq!(opacity(&shown, CLOSING), Some(0.0));

        let closed = at(0.6);
        assert_eq!(opacity(&closed, CREDITS), Some(1.0));
        assert_eq!(opacity(&closed, TEAM), Some(0.0));
        assert_eq!(opacity(&closed, CLOSING), Some(1.0));
        assert_eq!(opacity(&closed, CTA), Some(1.0));
    }

    #[test]
    fn test_mobile_credits_wait_for_entry() {
        let timeline = build(DeviceClass::Phone);

        let outside = timeline.resolve(Progress::new(0.1), &Gates::new());
        assert_eq!(opacity(&outside, CREDITS), None);
        assert_eq!(opacity(&outside, TEAM), None);

        let gates = Gates::from([ENTERED]);
        let entered = timeline.resolve(Progress::new(0.1), &gates);
        assert_eq!(opacity(&entered, CREDITS), Some(1.0));
        assert_eq!(opacity(&entered, TEAM), Some(1.0));

        let late = timeline.resolve(Progress::new(0.9), &gates);
        assert_eq!(opacity(&late, TEAM), Some(0.0));
        assert_eq!(opacity(&late, CTA), Some(1.0));
    }
}
