//! Phase timelines
//!
//! A [`Timeline`] is a set of tracks bound to elements. Evaluation is a pure
//! function of progress and the explicit gate flags passed in; the render
//! adapter applies the resulting [`Frame`].
//!
//! - `track` - phase tables, lookup and the gap-free builder
//! - `state` - resolved per-element output values
//! - `patterns` - crossfade, slide-in, stacked cards, active index

pub mod patterns;
pub mod state;
pub mod track;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::geometry::ElementId;
use crate::progress::Progress;

pub use patterns::{ActiveIndex, Crossfade, Interval, SlideIn, StackedCards};
pub use state::{ElementState, Length};
pub use track::{Axis, Phase, Property, Rule, Track, TrackBuilder, Unit};

/// Named state flag a binding waits on before it is applied
///
/// Gates carry explicit section state such as "entrance finished" into
/// evaluation instead of reading it from shared context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Gate(&'static str);

impl Gate {
    pub const fn new(name: &'static str) -> Self {
        Gate(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

/// Set of raised gates
pub type Gates = BTreeSet<Gate>;

/// Identifies one output stream: an element's property
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TrackKey {
    pub element: ElementId,
    pub property: Property,
}

/// A track bound to an element
#[derive(Debug, Clone)]
pub struct TrackBinding {
    pub element: ElementId,
    pub track: Track,
    /// Added to translations, e.g. a fixed `-50%` centering offset
    pub offset: Length,
    pub gate: Option<Gate>,
}

impl TrackBinding {
    pub fn new(element: impl Into<ElementId>, track: Track) -> Self {
        Self {
            element: element.into(),
            track,
            offset: Length::ZERO,
            gate: None,
        }
    }

    pub fn with_offset(mut self, offset: Length) -> Self {
        self.offset = offset;
        self
    }

    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }

    fn is_open(&self, gates: &Gates) -> bool {
        self.gate.map_or(true, |gate| gates.contains(&gate))
    }
}

/// Resolved element states for one progress value
pub type Frame = BTreeMap<ElementId, ElementState>;

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    bindings: Vec<TrackBinding>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a track to an element
    pub fn bind(mut self, element: impl Into<ElementId>, track: Track) -> Self {
        self.bindings.push(TrackBinding::new(element, track));
        self
    }

    pub fn push(&mut self, binding: TrackBinding) {
        self.bindings.push(binding);
    }

    pub fn with(mut self, binding: TrackBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn bindings(&self) -> &[TrackBinding] {
        &self.bindings
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Elements driven by this timeline
    pub fn elements(&self) -> BTreeSet<&ElementId> {
        self.bindings.iter().map(|b| &b.element).collect()
    }

    /// Raw value of every track, ignoring gates
    ///
    /// Translations bound twice to the same key accumulate, as in [`resolve`].
    ///
    /// [`resolve`]: Timeline::resolve
    pub fn evaluate(&self, progress: Progress) -> BTreeMap<TrackKey, f64> {
        let mut values = BTreeMap::new();
        for binding in &self.bindings {
            let key = TrackKey {
                element: binding.element.clone(),
                property: binding.track.property(),
            };
            let value = binding.track.value_at(progress);
            match key.property {
                Property::Translate(..) => *values.entry(key).or_insert(0.0) += value,
                _ => {
                    values.insert(key, value);
                }
            }
        }
        values
    }

    /// Resolve per-element states, skipping bindings whose gate is closed
    pub fn resolve(&self, progress: Progress, gates: &Gates) -> Frame {
        let mut frame = Frame::new();
        for binding in self.bindings.iter().filter(|b| b.is_open(gates)) {
            let value = binding.track.value_at(progress);
            frame
                .entry(binding.element.clone())
                .or_default()
                .set(binding.track.property(), value, binding.offset);
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTERED: Gate = Gate::new("entered");

    fn fade_out() -> Track {
        Track::builder(Property::Opacity, 1.0)
            .hold(0.5)
            .to(0.75, 0.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_evaluate_keys_by_element_and_property() {
        let timeline = Timeline::new()
            .bind("a", fade_out())
            .bind("b", Track::constant(Property::Top, 40.0));
        let values = timeline.evaluate(Progress::new(0.625));
        assert_eq!(values.len(), 2);
        let key = TrackKey {
            element: ElementId::new("a"),
            property: Property::Opacity,
        };
        assert!((values[&key] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_gate_blocks_binding_until_raised() {
        let timeline = Timeline::new().with(TrackBinding::new("a", fade_out()).gated(ENTERED));
        let mut gates = Gates::new();
        assert!(timeline.resolve(Progress::new(0.8), &gates).is_empty());

        gates.insert(ENTERED);
        let frame = timeline.resolve(Progress::new(0.8), &gates);
        assert_eq!(frame[&ElementId::new("a")].opacity, Some(0.0));
    }

    #[test]
    fn test_offset_applies_to_translation() {
        let track = Track::builder(Property::Translate(Axis::Y, Unit::Px), 0.0)
            .to(1.0, -200.0)
            .build()
            .unwrap();
        let timeline = Timeline::new()
            .with(TrackBinding::new("header", track).with_offset(Length::calc(-50.0, -80.0)));
        let frame = timeline.resolve(Progress::new(0.5), &Gates::new());
        assert_eq!(
            frame[&ElementId::new("header")].translate_y,
            Some(Length::calc(-50.0, -180.0))
        );
    }
}
