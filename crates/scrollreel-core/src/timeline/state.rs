use serde::{Deserialize, Serialize};

use super::track::{Axis, Property, Unit};

/// Translation composed of a percentage of the element's size plus pixels,
/// i.e. `calc(percent% + px)`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Length {
    pub percent: f64,
    pub px: f64,
}

impl Length {
    pub const ZERO: Length = Length {
        percent: 0.0,
        px: 0.0,
    };

    pub fn px(px: f64) -> Self {
        Self { percent: 0.0, px }
    }

    pub fn percent(percent: f64) -> Self {
        Self { percent, px: 0.0 }
    }

    pub fn calc(percent: f64, px: f64) -> Self {
        Self { percent, px }
    }

    pub fn accumulate(&mut self, unit: Unit, value: f64) {
        match unit {
            Unit::Px => self.px += value,
            Unit::Percent => self.percent += value,
        }
    }

    /// Resolve against the element's size along the axis
    pub fn resolve(&self, size: f64) -> f64 {
        self.percent / 100.0 * size + self.px
    }
}

impl std::ops::Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        Length {
            percent: self.percent + rhs.percent,
            px: self.px + rhs.px,
        }
    }
}

/// Resolved output values for one element; unset fields are left untouched
/// by the render adapter
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate_x: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate_y: Option<Length>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<bool>,
}

impl ElementState {
    pub fn with_opacity(opacity: f64) -> Self {
        Self {
            opacity: Some(opacity),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ElementState::default()
    }

    /// Fold one evaluated track value into the state
    ///
    /// Translations on the same axis accumulate; other properties overwrite.
    pub fn set(&mut self, property: Property, value: f64, offset: Length) {
        match property {
            Property::Opacity => self.opacity = Some(value),
            Property::Translate(axis, unit) => {
                let slot = match axis {
                    Axis::X => &mut self.translate_x,
                    Axis::Y => &mut self.translate_y,
                };
                let length = slot.get_or_insert(Length::ZERO);
                *length = *length + offset;
                length.accumulate(unit, value);
            }
            Property::Top => self.top = Some(value),
            Property::Height => self.height = Some(value),
            Property::ZIndex => self.z_index = Some(value.round() as i32),
            Property::PointerEnabled => self.pointer_enabled = Some(value >= 0.5),
            Property::Foreground => self.foreground = Some(value >= 0.5),
        }
    }

    /// Overlay the set fields of `other` onto this state
    pub fn merge(&mut self, other: &ElementState) {
        if other.opacity.is_some() {
            self.opacity = other.opacity;
        }
        if other.translate_x.is_some() {
            self.translate_x = other.translate_x;
        }
        if other.translate_y.is_some() {
            self.translate_y = other.translate_y;
        }
        if other.top.is_some() {
            self.top = other.top;
        }
        if other.height.is_some() {
            self.height = other.height;
        }
        if other.z_index.is_some() {
            self.z_index = other.z_index;
        }
        if other.pointer_enabled.is_some() {
            self.pointer_enabled = other.pointer_enabled;
        }
        if other.foreground.is_some() {
            self.foreground = other.foreground;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translations_accumulate() {
        let mut state = ElementState::default();
        state.set(
            Property::Translate(Axis::Y, Unit::Px),
            -120.0,
            Length::calc(-50.0, -80.0),
        );
        assert_eq!(state.translate_y, Some(Length::calc(-50.0, -200.0)));
        state.set(Property::Translate(Axis::Y, Unit::Percent), 10.0, Length::ZERO);
        assert_eq!(state.translate_y, Some(Length::calc(-40.0, -200.0)));
    }

    #[test]
    fn test_discrete_values() {
        let mut state = ElementState::default();
        state.set(Property::PointerEnabled, 1.0, Length::ZERO);
        state.set(Property::ZIndex, 2.0, Length::ZERO);
        assert_eq!(state.pointer_enabled, Some(true));
        assert_eq!(state.z_index, Some(2));
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut state = ElementState::with_opacity(0.5);
        state.merge(&ElementState {
            top: Some(10.0),
            ..Default::default()
        });
        assert_eq!(state.opacity, Some(0.5));
        assert_eq!(state.top, Some(10.0));
    }

    #[test]
    fn test_length_resolve() {
        assert_eq!(Length::calc(-50.0, -80.0).resolve(200.0), -180.0);
    }
}
