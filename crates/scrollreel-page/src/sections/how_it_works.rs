//! How it works (S9): intro header, three feature image/text pairs handed
//! over in turn, then a closing quote.

use scrollreel_core::timeline::{Axis, Interval, Length, Property, Timeline, Track, TrackBinding, Unit};
use scrollreel_core::{DeviceClass, Easing, ElementId, GeometryProvider, ProgressModel, Result, Viewport};

use crate::section::SectionDefinition;

pub const NAME: &str = "how_it_works";

const CONTAINER: &str = "s9-scroll-container";
const HEADER: &str = "s9-header";
const FEATURES: &str = "s9-features";
const SUBTITLE: &str = "s9-text-subtitle";
const QUOTE: &str = "s9-closing-quote";
const IMAGES: &str = "s9-images";
const TEXT: &str = "s9-text";

/// One image/text pair and its windows
struct Feature {
    image: &'static str,
    text: &'static str,
    image_in: Interval,
    image_out: Option<Interval>,
    text_in: Interval,
    text_out: Option<Interval>,
}

const DESKTOP_FEATURES: [Feature; 3] = [
    Feature {
        image: "s9-img-dashboard",
        text: "s9-feature-dashboard",
        image_in: Interval::new(0.06, 0.14),
        image_out: Some(Interval::new(0.26, 0.34)),
        text_in: Interval::new(0.08, 0.20),
        text_out: Some(Interval::new(0.24, 0.30)),
    },
    Feature {
        image: "s9-img-event",
        text: "s9-feature-event",
        image_in: Interval::new(0.26, 0.34),
        image_out: Some(Interval::new(0.50, 0.58)),
        text_in: Interval::new(0.26, 0.38),
        text_out: Some(Interval::new(0.48, 0.54)),
    },
    // reports stays up and leaves with the features container
    Feature {
        image: "s9-img-reports",
        text: "s9-feature-reports",
        image_in: Interval::new(0.50, 0.58),
        image_out: None,
        text_in: Interval::new(0.50, 0.62),
        text_out: None,
    },
];

const MOBILE_FEATURES: [Feature; 3] = [
    Feature {
        image: "s9-img-dashboard",
        text: "s9-feature-dashboard",
        image_in: Interval::new(0.10, 0.16),
        image_out: Some(Interval::new(0.28, 0.36)),
        text_in: Interval::new(0.12, 0.16),
        text_out: Some(Interval::new(0.26, 0.32)),
    },
    Feature {
        image: "s9-img-event",
        text: "s9-feature-event",
        image_in: Interval::new(0.28, 0.36),
        image_out: Some(Interval::new(0.50, 0.58)),
        text_in: Interval::new(0.30, 0.36),
        text_out: Some(Interval::new(0.48, 0.54)),
    },
    Feature {
        image: "s9-img-reports",
        text: "s9-feature-reports",
        image_in: Interval::new(0.50, 0.58),
        image_out: Some(Interval::new(0.70, 0.78)),
        text_in: Interval::new(0.52, 0.58),
        text_out: Some(Interval::new(0.70, 0.78)),
    },
];

/// Desktop images rise from this offset inside the image frame
const DESKTOP_IMAGE_DROP: f64 = 526.0;
const DESKTOP_QUOTE_START: f64 = 694.0;
const DESKTOP_EXIT: Interval = Interval::new(0.76, 0.88);
const MOBILE_EXIT: Interval = Interval::new(0.74, 0.86);

/// Static mobile layout, measured once per resize
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MobileLayout {
    pub image_top: f64,
    pub image_height: f64,
    pub text_top: f64,
}

impl MobileLayout {
    pub fn measure(geometry: &dyn GeometryProvider, viewport: Viewport, device: DeviceClass) -> Self {
        let vw = viewport.width;
        if device == DeviceClass::Tablet {
            // 40px gutters each side
            let image_top = 167.0;
            let image_height = ((vw - 80.0) * 496.0 / 696.0).round();
            return Self {
                image_top,
                image_height,
                text_top: image_top + image_height + 64.0,
            };
        }

        let subtitle_top = ((vw - 320.0) * 16.0 / 160.0 + 32.0).clamp(32.0, 48.0);
        let subtitle_height = geometry
            .rect(&ElementId::new(SUBTITLE))
            .map_or(48.0, |r| r.height);
        let gap = ((vw - 320.0) * 48.0 / 160.0 + 16.0).clamp(16.0, 64.0);
        let content_width = geometry
            .rect(&ElementId::new(FEATURES))
            .map(|r| r.width)
            .filter(|w| *w > 0.0)
            .unwrap_or(vw - 32.0);
        let image_top = subtitle_top + subtitle_height + gap;
        let image_height = (content_width * 205.0 / 288.0).round();
        Self {
            image_top,
            image_height,
            text_top: image_top + image_height + gap,
        }
    }
}

pub struct HowItWorks {
    device: DeviceClass,
    container: ElementId,
}

impl HowItWorks {
    pub fn new(device: DeviceClass) -> Self {
        Self {
            device,
            container: ElementId::new(CONTAINER),
        }
    }

    fn opacity_in_out(enter: Interval, exit: Option<Interval>, easing: Easing) -> Result<Track> {
        let mut track = Track::builder(Property::Opacity, 0.0)
            .hold(enter.start)
            .to_with(enter.end, 1.0, easing);
        if let Some(exit) = exit {
            track = track.hold(exit.start).to(exit.end, 0.0);
        }
        track.build()
    }

    fn image_rise(enter: Interval, drop: f64) -> Result<Track> {
        Track::builder(Property::Top, drop)
            .hold(enter.start)
            .to(enter.end, 0.0)
            .build()
    }

    fn desktop_timeline(viewport: Viewport) -> Result<Timeline> {
        let px_y = Property::Translate(Axis::Y, Unit::Px);

        let header_opacity = Track::builder(Property::Opacity, 1.0)
            .hold(0.04)
            .to(0.12, 0.5)
            .to(0.16, 0.0)
            .build()?;
        let header_shift = Track::builder(px_y, 0.0)
            .hold(0.04)
            .to(0.12, -200.0)
            .to(0.16, -300.0)
            .build()?;

        let features_shift = Track::builder(px_y, 0.0)
            .hold(DESKTOP_EXIT.start)
            .to(DESKTOP_EXIT.end, -500.0)
            .build()?;
        let features_opacity = Track::builder(Property::Opacity, 1.0)
            .hold(DESKTOP_EXIT.start)
            .to(DESKTOP_EXIT.end, 0.0)
            .build()?;
        let subtitle = Track::builder(Property::Opacity, 0.0)
            .hold(0.08)
            .to(0.14, 1.0)
            .hold(DESKTOP_EXIT.start)
            .jump(0.0)
            .build()?;

        let quote_center = viewport.height / 2.0 - 58.0;
        // waits invisible at its entrance start instead of bottom-anchored
        let quote_top = Track::builder(Property::Top, DESKTOP_QUOTE_START)
            .hold(0.78)
            .to(0.84, quote_center)
            .hold(0.92)
            .to(1.0, quote_center - 150.0)
            .build()?;
        let quote_opacity = Track::builder(Property::Opacity, 0.0)
            .hold(0.78)
            .to(0.84, 1.0)
            .hold(0.92)
            .to(1.0, 0.5)
            .build()?;

        let mut timeline = Timeline::new()
            .bind(HEADER, header_opacity)
            .with(TrackBinding::new(HEADER, header_shift).with_offset(Length::calc(-50.0, -80.0)))
            .bind(FEATURES, features_shift)
            .bind(FEATURES, features_opacity)
            .bind(SUBTITLE, subtitle)
            .bind(QUOTE, quote_top)
            .bind(QUOTE, quote_opacity);

        for feature in &DESKTOP_FEATURES {
            timeline.push(TrackBinding::new(
                feature.image,
                Self::opacity_in_out(feature.image_in, feature.image_out, Easing::Linear)?,
            ));
            timeline.push(TrackBinding::new(
                feature.image,
                Self::image_rise(feature.image_in, DESKTOP_IMAGE_DROP)?,
            ));
            // text pauses at half opacity while its image settles
            timeline.push(TrackBinding::new(
                feature.text,
                Self::opacity_in_out(feature.text_in, feature.text_out, Easing::plateau(0.5))?,
            ));
        }
        Ok(timeline)
    }

    fn mobile_timeline(&self, layout: MobileLayout, viewport: Viewport) -> Result<Timeline> {
        let px_y = Property::Translate(Axis::Y, Unit::Px);

        let header_opacity = Track::builder(Property::Opacity, 1.0)
            .hold(0.04)
            .to(0.12, 0.0)
            .build()?;
        let header_shift = Track::builder(px_y, 0.0).hold(0.04).to(0.12, -150.0).build()?;
        let header_shift = match self.device {
            DeviceClass::Phone => {
                TrackBinding::new(HEADER, header_shift).with_offset(Length::calc(-50.0, -40.0))
            }
            _ => TrackBinding::new(HEADER, header_shift),
        };

        let features_shift = Track::builder(px_y, 80.0)
            .hold(0.10)
            .to(0.16, 0.0)
            .hold(MOBILE_EXIT.start)
            .to(MOBILE_EXIT.end, -200.0)
            .build()?;
        let features_opacity =
            Self::opacity_in_out(Interval::new(0.10, 0.16), Some(MOBILE_EXIT), Easing::Linear)?;
        let subtitle = Track::builder(Property::Opacity, 0.0)
            .hold(0.12)
            .to(0.16, 1.0)
            .hold(MOBILE_EXIT.start)
            .jump(0.0)
            .build()?;

        let quote_in = Interval::new(0.78, 0.86);
        let quote_opacity = Self::opacity_in_out(quote_in, None, Easing::Linear)?;
        let quote_top = Track::builder(Property::Top, viewport.height)
            .hold(quote_in.start)
            .to(quote_in.end, viewport.height / 2.0)
            .build()?;

        let mut timeline = Timeline::new()
            .bind(IMAGES, Track::constant(Property::Top, layout.image_top))
            .bind(IMAGES, Track::constant(Property::Height, layout.image_height))
            .bind(TEXT, Track::constant(Property::Top, layout.text_top))
            .bind(HEADER, header_opacity)
            .with(header_shift)
            .bind(FEATURES, features_shift)
            .bind(FEATURES, features_opacity)
            .bind(SUBTITLE, subtitle)
            .bind(QUOTE, quote_opacity)
            .bind(QUOTE, quote_top);

        for feature in &MOBILE_FEATURES {
            timeline.push(TrackBinding::new(
                feature.image,
                Self::opacity_in_out(feature.image_in, feature.image_out, Easing::Linear)?,
            ));
            timeline.push(TrackBinding::new(
                feature.image,
                Self::image_rise(feature.image_in, layout.image_height)?,
            ));
            timeline.push(TrackBinding::new(
                feature.text,
                Self::opacity_in_out(feature.text_in, feature.text_out, Easing::Linear)?,
            ));
        }
        Ok(timeline)
    }
}

impl SectionDefinition for HowItWorks {
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
            DeviceClass::Desktop => Self::desktop_timeline(viewport),
            DeviceClass::Phone | DeviceClass::Tablet => {
                let layout = MobileLayout::measure(geometry, viewport, self.device);
                self.mobile_timeline(layout, viewport)
            }
        }
    }
}
