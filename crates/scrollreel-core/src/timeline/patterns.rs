//! Reusable multi-track compositions

use serde::{Deserialize, Serialize};

use super::track::{Axis, Property, Track, TrackBuilder, Unit};
use super::TrackBinding;
use crate::easing::Easing;
use crate::geometry::ElementId;
use crate::{Error, Result};

/// Progress sub-interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// Paired opposite-direction opacity interpolation between two elements
///
/// Out and in windows are independent: `in_start < out_end` leaves both
/// visible for a moment, `in_start > out_end` leaves both hidden.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crossfade {
    pub out_start: f64,
    pub out_end: f64,
    pub in_start: f64,
    pub in_end: f64,
}

impl Crossfade {
    pub const fn new(out_start: f64, out_end: f64, in_start: f64, in_end: f64) -> Self {
        Self {
            out_start,
            out_end,
            in_start,
            in_end,
        }
    }

    /// Positive when both elements are visible at once, negative for a gap
    pub fn overlap(&self) -> f64 {
        self.out_end - self.in_start
    }

    /// Chain the outgoing fade onto a track under construction
    pub fn fade_out(&self, builder: TrackBuilder) -> TrackBuilder {
        builder.hold(self.out_start).to(self.out_end, 0.0)
    }

    /// Chain the incoming fade onto a track under construction
    pub fn fade_in(&self, builder: TrackBuilder) -> TrackBuilder {
        builder.hold(self.in_start).to(self.in_end, 1.0)
    }

    pub fn outgoing(&self) -> Result<Track> {
        self.fade_out(Track::builder(Property::Opacity, 1.0)).build()
    }

    pub fn incoming(&self) -> Result<Track> {
        self.fade_in(Track::builder(Property::Opacity, 0.0)).build()
    }
}

/// Translation from an offset to rest over an interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlideIn {
    pub axis: Axis,
    pub unit: Unit,
    pub from: f64,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub easing: Easing,
}

impl SlideIn {
    pub fn new(axis: Axis, unit: Unit, from: f64, start: f64, end: f64) -> Self {
        Self {
            axis,
            unit,
            from,
            start,
            end,
            easing: Easing::Linear,
        }
    }

    pub fn eased(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn property(&self) -> Property {
        Property::Translate(self.axis, self.unit)
    }

    /// Builder positioned at `end`, resting at 0
    pub fn builder(&self) -> TrackBuilder {
        Track::builder(self.property(), self.from)
            .hold(self.start)
            .to_with(self.end, 0.0, self.easing)
    }

    pub fn track(&self) -> Result<Track> {
        self.builder().build()
    }
}

/// Exactly one of N elements is "on" for every progress value
///
/// Element `i` is on over `[boundaries[i-1], boundaries[i])`; the first starts
/// at 0 and the last runs through 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveIndex {
    pub elements: Vec<ElementId>,
    pub boundaries: Vec<f64>,
}

impl ActiveIndex {
    pub fn new(elements: Vec<ElementId>, boundaries: Vec<f64>) -> Self {
        Self {
            elements,
            boundaries,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.elements.is_empty() {
            return Err(Error::InvalidTimeline("active index has no elements".to_string()));
        }
        if self.boundaries.len() + 1 != self.elements.len() {
            return Err(Error::InvalidTimeline(format!(
                "{} elements need {} boundaries, got {}",
                self.elements.len(),
                self.elements.len() - 1,
                self.boundaries.len()
            )));
        }
        let mut prev = 0.0;
        for &b in &self.boundaries {
            if !(b > prev) || b > 1.0 {
                return Err(Error::InvalidTimeline(format!(
                    "active index boundary {} out of order",
                    b
                )));
            }
            prev = b;
        }
        Ok(())
    }

    /// Index active at `p`
    pub fn index_at(&self, p: f64) -> usize {
        self.boundaries.iter().take_while(|&&b| p >= b).count()
    }

    /// One discrete track per element for `property`
    pub fn bindings(&self, property: Property) -> Result<Vec<TrackBinding>> {
        self.validate()?;
        let last = self.elements.len() - 1;
        self.elements
            .iter()
            .enumerate()
            .map(|(i, element)| {
                let mut builder = Track::builder(property, if i == 0 { 1.0 } else { 0.0 });
                if i > 0 {
                    builder = builder.hold(self.boundaries[i - 1]).jump(1.0);
                }
                if i < last {
                    builder = builder.hold(self.boundaries[i]).jump(0.0);
                }
                Ok(TrackBinding::new(element.clone(), builder.build()?))
            })
            .collect()
    }
}

/// Occlusion reveal: card `i+1` slides over card `i`
///
/// `covers[i]` is the interval over which card `i+1` slides from 100% to 0
/// while card `i` fades out underneath. Pointer interaction follows the
/// topmost fully revealed card regardless of residual opacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedCards {
    pub cards: Vec<ElementId>,
    pub axis: Axis,
    pub covers: Vec<Interval>,
    /// Optional fade of the last card once the stack is done
    #[serde(default)]
    pub tail: Option<Interval>,
}

impl StackedCards {
    pub fn new(cards: Vec<ElementId>, axis: Axis, covers: Vec<Interval>) -> Self {
        Self {
            cards,
            axis,
            covers,
            tail: None,
        }
    }

    pub fn with_tail(mut self, tail: Interval) -> Self {
        self.tail = Some(tail);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.cards.len() < 2 || self.covers.len() + 1 != self.cards.len() {
            return Err(Error::InvalidTimeline(format!(
                "{} cards need {} cover intervals, got {}",
                self.cards.len(),
                self.cards.len().saturating_sub(1),
                self.covers.len()
            )));
        }
        let mut prev = 0.0;
        for cover in self.covers.iter().chain(self.tail.iter()) {
            if cover.start < prev || !(cover.end > cover.start) || cover.end > 1.0 {
                return Err(Error::InvalidTimeline(format!(
                    "cover interval [{}, {}] overlaps or is out of range",
                    cover.start, cover.end
                )));
            }
            prev = cover.end;
        }
        Ok(())
    }

    pub fn bindings(&self) -> Result<Vec<TrackBinding>> {
        self.validate()?;
        let last = self.cards.len() - 1;
        let mut bindings = Vec::with_capacity(self.cards.len() * 4);

        for (i, card) in self.cards.iter().enumerate() {
            bindings.push(TrackBinding::new(
                card.clone(),
                Track::constant(Property::ZIndex, (i + 1) as f64),
            ));

            let translate = if i == 0 {
                Track::constant(Property::Translate(self.axis, Unit::Percent), 0.0)
            } else {
                let cover = self.covers[i - 1];
                SlideIn::new(self.axis, Unit::Percent, 100.0, cover.start, cover.end).track()?
            };
            bindings.push(TrackBinding::new(card.clone(), translate));

            let fade = if i < last { Some(self.covers[i]) } else { self.tail };
            let opacity = match fade {
                Some(fade) => Track::builder(Property::Opacity, 1.0)
                    .hold(fade.start)
                    .to(fade.end, 0.0)
                    .build()?,
                None => Track::constant(Property::Opacity, 1.0),
            };
            bindings.push(TrackBinding::new(card.clone(), opacity));
        }

        let pointer = ActiveIndex::new(
            self.cards.clone(),
            self.covers.iter().map(|c| c.end).collect(),
        );
        bindings.extend(pointer.bindings(Property::PointerEnabled)?);
        Ok(bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Progress;
    use crate::timeline::{Gates, Length, Timeline};

    fn at(track: &Track, p: f64) -> f64 {
        track.value_at(Progress::new(p))
    }

    #[test]
    fn test_crossfade_endpoints_exact() {
        let fade = Crossfade::new(0.20, 0.24, 0.24, 0.28);
        let out = fade.outgoing().unwrap();
        let inc = fade.incoming().unwrap();
        assert_eq!(at(&out, 0.20), 1.0);
        assert_eq!(at(&out, 0.24), 0.0);
        assert_eq!(at(&inc, 0.24), 0.0);
        assert_eq!(at(&inc, 0.28), 1.0);
        assert!((at(&out, 0.22) - 0.5).abs() < 1e-9);
        assert!((at(&inc, 0.26) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_crossfade_preserves_gap_and_overlap() {
        let gap = Crossfade::new(0.26, 0.32, 0.34, 0.40);
        assert!(gap.overlap() < 0.0);
        let (out, inc) = (gap.outgoing().unwrap(), gap.incoming().unwrap());
        assert_eq!(at(&out, 0.33), 0.0);
        assert_eq!(at(&inc, 0.33), 0.0);

        let overlap = Crossfade::new(0.26, 0.34, 0.28, 0.36);
        assert!(overlap.overlap() > 0.0);
        let (out, inc) = (overlap.outgoing().unwrap(), overlap.incoming().unwrap());
        assert!(at(&out, 0.30) > 0.0);
        assert!(at(&inc, 0.30) > 0.0);
    }

    #[test]
    fn test_slide_in_percent() {
        let slide = SlideIn::new(Axis::X, Unit::Percent, 100.0, 0.2, 0.4);
        let track = slide.track().unwrap();
        assert_eq!(at(&track, 0.0), 100.0);
        assert_eq!(at(&track, 0.2), 100.0);
        assert!((at(&track, 0.3) - 50.0).abs() < 1e-9);
        assert_eq!(at(&track, 0.4), 0.0);
        assert_eq!(at(&track, 1.0), 0.0);
    }

    #[test]
    fn test_active_index_exactly_one() {
        let index = ActiveIndex::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![0.24, 0.48],
        );
        let timeline = index
            .bindings(Property::Foreground)
            .unwrap()
            .into_iter()
            .fold(Timeline::new(), Timeline::with);
        for i in 0..=100 {
            let p = i as f64 / 100.0;
            let frame = timeline.resolve(Progress::new(p), &Gates::new());
            let on: Vec<_> = frame
                .iter()
                .filter(|(_, s)| s.foreground == Some(true))
                .collect();
            assert_eq!(on.len(), 1, "p={}", p);
            assert_eq!(on[0].0.as_str(), ["a", "b", "c"][index.index_at(p)]);
        }
    }

    #[test]
    fn test_active_index_rejects_bad_boundaries() {
        let index = ActiveIndex::new(vec!["a".into(), "b".into()], vec![1.5]);
        assert!(index.bindings(Property::Foreground).is_err());
    }

    fn three_cards() -> Timeline {
        StackedCards::new(
            vec!["card1".into(), "card2".into(), "card3".into()],
            Axis::X,
            vec![Interval::new(0.20, 0.40), Interval::new(0.55, 0.75)],
        )
        .bindings()
        .unwrap()
        .into_iter()
        .fold(Timeline::new(), Timeline::with)
    }

    #[test]
    fn test_stacked_cards_initial_state() {
        let frame = three_cards().resolve(Progress::new(0.0), &Gates::new());
        let card = |id: &str| frame[&ElementId::new(id)];
        assert_eq!(card("card1").opacity, Some(1.0));
        assert_eq!(card("card1").translate_x, Some(Length::percent(0.0)));
        assert_eq!(card("card2").translate_x, Some(Length::percent(100.0)));
        assert_eq!(card("card3").translate_x, Some(Length::percent(100.0)));
        assert!(card("card3").z_index > card("card2").z_index);
        assert!(card("card2").z_index > card("card1").z_index);
    }

    #[test]
    fn test_stacked_cards_cover_completes() {
        let frame = three_cards().resolve(Progress::new(0.40), &Gates::new());
        let card = |id: &str| frame[&ElementId::new(id)];
        assert_eq!(card("card2").translate_x, Some(Length::percent(0.0)));
        assert_eq!(card("card1").opacity, Some(0.0));
        assert_eq!(card("card2").pointer_enabled, Some(true));
    }

    #[test]
    fn test_stacked_cards_single_pointer_target() {
        let timeline = three_cards();
        for i in 0..=200 {
            let p = i as f64 / 200.0;
            let frame = timeline.resolve(Progress::new(p), &Gates::new());
            let enabled = frame
                .values()
                .filter(|s| s.pointer_enabled == Some(true))
                .count();
            assert_eq!(enabled, 1, "p={}", p);
        }
    }

    #[test]
    fn test_stacked_cards_tail_keeps_pointer() {
        let timeline = StackedCards::new(
            vec!["a".into(), "b".into()],
            Axis::Y,
            vec![Interval::new(0.14, 0.26)],
        )
        .with_tail(Interval::new(0.75, 0.82))
        .bindings()
        .unwrap()
        .into_iter()
        .fold(Timeline::new(), Timeline::with);
        let frame = timeline.resolve(Progress::new(0.9), &Gates::new());
        let b = frame[&ElementId::new("b")];
        assert_eq!(b.opacity, Some(0.0));
        assert_eq!(b.pointer_enabled, Some(true));
    }

    #[test]
    fn test_stacked_cards_rejects_overlapping_covers() {
        let cards = StackedCards::new(
            vec!["a".into(), "b".into(), "c".into()],
            Axis::X,
            vec![Interval::new(0.2, 0.5), Interval::new(0.4, 0.6)],
        );
        assert!(cards.bindings().is_err());
    }
}
