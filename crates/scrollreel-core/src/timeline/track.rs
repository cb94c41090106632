//! Tracks: one animated property built from an ordered, gap-free phase table.

use serde::{Deserialize, Serialize};

use crate::easing::{lerp, Easing};
use crate::progress::Progress;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Px,
    /// Percentage of the element's own size
    Percent,
}

/// Output property a track drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Opacity,
    Translate(Axis, Unit),
    Top,
    Height,
    ZIndex,
    PointerEnabled,
    /// Participates in document flow (active-index selection)
    Foreground,
}

impl Property {
    /// Declared value bounds, evaluation clamps into them
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Property::Opacity | Property::PointerEnabled | Property::Foreground => (0.0, 1.0),
            Property::Height => (0.0, f64::MAX),
            Property::ZIndex => (i32::MIN as f64, i32::MAX as f64),
            Property::Translate(..) | Property::Top => (f64::MIN, f64::MAX),
        }
    }

    /// Clamp into [`Property::bounds`]; NaN maps to the nearest bound of 0
    pub fn clamp_value(&self, value: f64) -> f64 {
        let (lo, hi) = self.bounds();
        if value.is_nan() {
            lo.max(0.0)
        } else {
            value.clamp(lo, hi)
        }
    }

    /// Boolean properties only hold values, never interpolate
    pub fn is_discrete(&self) -> bool {
        matches!(
            self,
            Property::ZIndex | Property::PointerEnabled | Property::Foreground
        )
    }
}

/// Interpolation rule of one phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Hold(f64),
    Ramp { from: f64, to: f64, easing: Easing },
}

/// Interval `[start, end)` of progress with one interpolation rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub start: f64,
    pub end: f64,
    pub rule: Rule,
}

impl Phase {
    pub fn value_at(&self, p: f64) -> f64 {
        match self.rule {
            Rule::Hold(value) => value,
            Rule::Ramp { from, to, easing } => {
                let span = self.end - self.start;
                let t = if span > 0.0 { (p - self.start) / span } else { 1.0 };
                lerp(from, to, easing.apply(t))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    property: Property,
    phases: Vec<Phase>,
}

impl Track {
    /// Start building a track whose value at progress 0 is `initial`
    pub fn builder(property: Property, initial: f64) -> TrackBuilder {
        TrackBuilder::new(property, initial)
    }

    /// Single phase holding `value` over [0, 1]
    pub fn constant(property: Property, value: f64) -> Track {
        Track {
            property,
            phases: vec![Phase {
                start: 0.0,
                end: 1.0,
                rule: Rule::Hold(value),
            }],
        }
    }

    /// Validate an explicit phase table
    pub fn from_phases(property: Property, phases: Vec<Phase>) -> Result<Track> {
        let Some(first) = phases.first() else {
            return Err(Error::InvalidTimeline("track has no phases".to_string()));
        };
        if first.start != 0.0 {
            return Err(Error::InvalidTimeline(format!(
                "first phase starts at {} instead of 0",
                first.start
            )));
        }
        for pair in phases.windows(2) {
            if pair[0].end != pair[1].start {
                return Err(Error::InvalidTimeline(format!(
                    "phases [{}, {}) and [{}, {}) are not contiguous",
                    pair[0].start, pair[0].end, pair[1].start, pair[1].end
                )));
            }
        }
        for phase in &phases {
            if !(phase.start < phase.end) || phase.end > 1.0 {
                return Err(Error::InvalidTimeline(format!(
                    "phase [{}, {}) is empty or out of range",
                    phase.start, phase.end
                )));
            }
            if property.is_discrete() && matches!(phase.rule, Rule::Ramp { .. }) {
                return Err(Error::InvalidTimeline(format!(
                    "{:?} cannot interpolate",
                    property
                )));
            }
        }
        if phases.last().map(|p| p.end) != Some(1.0) {
            return Err(Error::InvalidTimeline("last phase does not end at 1".to_string()));
        }
        Ok(Track { property, phases })
    }

    #[inline]
    pub fn property(&self) -> Property {
        self.property
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// First phase with `p < end`; progress 1 falls into the last phase
    pub fn phase_at(&self, progress: Progress) -> Option<&Phase> {
        let p = progress.value();
        self.phases
            .iter()
            .find(|phase| p < phase.end)
            .or_else(|| self.phases.last())
    }

    /// Evaluate the track, clamped into the property's bounds
    pub fn value_at(&self, progress: Progress) -> f64 {
        let raw = self
            .phase_at(progress)
            .map(|phase| phase.value_at(progress.value()))
            .unwrap_or(f64::NAN);
        self.property.clamp_value(raw)
    }
}

/// Builds a track left to right; every segment starts where the previous ended
#[derive(Debug, Clone)]
pub struct TrackBuilder {
    property: Property,
    cursor: f64,
    current: f64,
    phases: Vec<Phase>,
    error: Option<String>,
}

impl TrackBuilder {
    fn new(property: Property, initial: f64) -> Self {
        let mut builder = Self {
            property,
            cursor: 0.0,
            current: initial,
            phases: Vec::new(),
            error: None,
        };
        if !initial.is_finite() {
            builder.fail(format!("initial value {} is not finite", initial));
        }
        builder
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(message);
        }
    }

    /// Returns false (and records an error) for an unusable boundary
    fn advance_to(&mut self, until: f64) -> bool {
        if self.error.is_some() {
            return false;
        }
        if !until.is_finite() || until < self.cursor || until > 1.0 {
            self.fail(format!(
                "{:?}: boundary {} must lie in [{}, 1]",
                self.property, until, self.cursor
            ));
            return false;
        }
        until > self.cursor
    }

    /// Value the next segment starts from
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Hold the current value until `until`
    pub fn hold(mut self, until: f64) -> Self {
        if self.advance_to(until) {
            self.phases.push(Phase {
                start: self.cursor,
                end: until,
                rule: Rule::Hold(self.current),
            });
            self.cursor = until;
        }
        self
    }

    /// Ramp linearly from the current value to `value` by `until`
    pub fn to(self, until: f64, value: f64) -> Self {
        self.to_with(until, value, Easing::Linear)
    }

    /// Ramp from the current value to `value` by `until` with an easing
    pub fn to_with(mut self, until: f64, value: f64, easing: Easing) -> Self {
        if !value.is_finite() {
            self.fail(format!("{:?}: target {} is not finite", self.property, value));
            return self;
        }
        if self.property.is_discrete() {
            self.fail(format!("{:?} cannot interpolate", self.property));
            return self;
        }
        if self.advance_to(until) {
            self.phases.push(Phase {
                start: self.cursor,
                end: until,
                rule: Rule::Ramp {
                    from: self.current,
                    to: value,
                    easing,
                },
            });
            self.cursor = until;
        }
        // a zero-length ramp still lands on its target
        if self.error.is_none() {
            self.current = value;
        }
        self
    }

    /// Change the value discontinuously at the cursor
    pub fn jump(mut self, value: f64) -> Self {
        if value.is_finite() {
            self.current = value;
        } else {
            self.fail(format!("{:?}: jump to {} is not finite", self.property, value));
        }
        self
    }

    /// Hold the last value through 1 and validate
    pub fn build(mut self) -> Result<Track> {
        self = self.hold(1.0);
        if let Some(message) = self.error {
            return Err(Error::InvalidTimeline(message));
        }
        Track::from_phases(self.property, self.phases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(track: &Track, p: f64) -> f64 {
        track.value_at(Progress::new(p))
    }

    #[test]
    fn test_builder_covers_full_range() {
        let track = Track::builder(Property::Opacity, 1.0)
            .hold(0.2)
            .to(0.24, 0.0)
            .build()
            .unwrap();
        let phases = track.phases();
        assert_eq!(phases.first().unwrap().start, 0.0);
        assert_eq!(phases.last().unwrap().end, 1.0);
        for pair in phases.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_lookup_is_half_open() {
        let track = Track::builder(Property::Opacity, 0.0)
            .hold(0.5)
            .jump(1.0)
            .build()
            .unwrap();
        assert_eq!(at(&track, 0.4999), 0.0);
        assert_eq!(at(&track, 0.5), 1.0);
        assert_eq!(at(&track, 1.0), 1.0);
    }

    #[test]
    fn test_ramp_endpoints_exact() {
        let track = Track::builder(Property::Opacity, 1.0)
            .hold(0.6)
            .to(0.64, 0.0)
            .build()
            .unwrap();
        assert_eq!(at(&track, 0.6), 1.0);
        assert!((at(&track, 0.62) - 0.5).abs() < 1e-9);
        assert_eq!(at(&track, 0.64), 0.0);
    }

    #[test]
    fn test_values_stay_in_bounds_everywhere() {
        let track = Track::builder(Property::Opacity, 0.0)
            .to_with(0.3, 1.0, Easing::CubicOut)
            .hold(0.7)
            .to_with(1.0, 0.0, Easing::plateau(0.5))
            .build()
            .unwrap();
        for i in 0..=1000 {
            let v = at(&track, i as f64 / 1000.0);
            assert!(v.is_finite());
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_decreasing_boundary_rejected() {
        let result = Track::builder(Property::Opacity, 1.0)
            .hold(0.5)
            .to(0.4, 0.0)
            .build();
        assert!(matches!(result, Err(Error::InvalidTimeline(_))));
    }

    #[test]
    fn test_discrete_property_cannot_ramp() {
        let result = Track::builder(Property::PointerEnabled, 0.0)
            .to(0.5, 1.0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_from_phases_rejects_gap() {
        let phases = vec![
            Phase {
                start: 0.0,
                end: 0.4,
                rule: Rule::Hold(1.0),
            },
            Phase {
                start: 0.5,
                end: 1.0,
                rule: Rule::Hold(0.0),
            },
        ];
        assert!(Track::from_phases(Property::Opacity, phases).is_err());
    }

    #[test]
    fn test_out_of_bounds_values_clamped() {
        let track = Track::builder(Property::Opacity, 0.0)
            .to(1.0, 2.0)
            .build()
            .unwrap();
        assert_eq!(at(&track, 1.0), 1.0);
    }

    #[test]
    fn test_property_clamp_value() {
        assert_eq!(Property::Opacity.clamp_value(1.5), 1.0);
        assert_eq!(Property::Opacity.clamp_value(f64::NAN), 0.0);
        assert_eq!(Property::Height.clamp_value(-4.0), 0.0);
        assert_eq!(Property::Top.clamp_value(-4.0), -4.0);
    }
}
