//! Pure easing functions mapping input [0, 1] to output [0, 1]

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Named easing curves
///
/// Every variant is monotonic with `apply(0) == 0` and `apply(1) == 1`.
/// `Step` is the one exception at the start: it stays at 0 until `t` reaches 1.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[serde(try_from = "EasingDef")]
pub enum Easing {
    #[default]
    Linear,
    Step,
    CubicOut,
    QuinticOut,
    ExpoOut,
    QuadInOut,
    CubicInOut,
    /// Ramps 0 -> `level` over `[0, hold_start]`, holds `level` until
    /// `hold_end`, then ramps `level` -> 1 over `[hold_end, 1]`
    ///
    /// Build through [`Easing::plateau_with`] to get the parameters checked.
    Plateau {
        level: f64,
        hold_start: f64,
        hold_end: f64,
    },
}

impl Easing {
    /// Plateau at `level` over the middle third of the interval
    pub fn plateau(level: f64) -> Self {
        Easing::Plateau {
            level,
            hold_start: 1.0 / 3.0,
            hold_end: 2.0 / 3.0,
        }
    }

    /// Plateau with explicit hold window
    ///
    /// Requires finite values with `level` in [0, 1] and
    /// `0 <= hold_start <= hold_end <= 1`.
    pub fn plateau_with(level: f64, hold_start: f64, hold_end: f64) -> Result<Self> {
        let finite = level.is_finite() && hold_start.is_finite() && hold_end.is_finite();
        let ordered = 0.0 <= hold_start && hold_start <= hold_end && hold_end <= 1.0;
        if !finite || !ordered || !(0.0..=1.0).contains(&level) {
            return Err(Error::InvalidTimeline(format!(
                "plateau level {} hold [{}, {}] out of range",
                level, hold_start, hold_end
            )));
        }
        Ok(Easing::Plateau {
            level,
            hold_start,
            hold_end,
        })
    }

    /// Apply the easing function to a progress value
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match *self {
            Easing::Linear => t,
            // jumps only at t == 1, handled above
            Easing::Step => 0.0,
            Easing::CubicOut => cubic_ease_out(t),
            Easing::QuinticOut => quintic_ease_out(t),
            Easing::ExpoOut => exponential_ease_out(t),
            Easing::QuadInOut => quad_ease_in_out(t),
            Easing::CubicInOut => cubic_ease_in_out(t),
            Easing::Plateau {
                level,
                hold_start,
                hold_end,
            } => plateau(t, level, hold_start, hold_end),
        }
    }
}

/// Deserialized form, checked before it becomes an [`Easing`]
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum EasingDef {
    Linear,
    Step,
    CubicOut,
    QuinticOut,
    ExpoOut,
    QuadInOut,
    CubicInOut,
    Plateau {
        level: f64,
        hold_start: f64,
        hold_end: f64,
    },
}

impl TryFrom<EasingDef> for Easing {
    type Error = Error;

    fn try_from(def: EasingDef) -> Result<Self> {
        Ok(match def {
            EasingDef::Linear => Easing::Linear,
            EasingDef::Step => Easing::Step,
            EasingDef::CubicOut => Easing::CubicOut,
            EasingDef::QuinticOut => Easing::QuinticOut,
            EasingDef::ExpoOut => Easing::ExpoOut,
            EasingDef::QuadInOut => Easing::QuadInOut,
            EasingDef::CubicInOut => Easing::CubicInOut,
            EasingDef::Plateau {
                level,
                hold_start,
                hold_end,
            } => Easing::plateau_with(level, hold_start, hold_end)?,
        })
    }
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Cubic ease-out: f(t) = 1 - (1-t)³
#[inline]
fn cubic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Quintic ease-out: f(t) = 1 - (1-t)⁵
#[inline]
fn quintic_ease_out(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv * inv * inv
}

/// Exponential ease-out: f(t) = 1 - 2^(-10t)
#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

#[inline]
fn quad_ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

#[inline]
fn cubic_ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}

/// `t` is in (0, 1); unchecked parameters from a struct literal degrade to linear
fn plateau(t: f64, level: f64, hold_start: f64, hold_end: f64) -> f64 {
    if !(level.is_finite() && hold_start.is_finite() && hold_end.is_finite()) {
        return t;
    }
    let level = level.clamp(0.0, 1.0);
    let hold_start = hold_start.clamp(0.0, 1.0);
    let hold_end = hold_end.max(hold_start).min(1.0);

    if t < hold_start {
        lerp(0.0, level, t / hold_start)
    } else if t < hold_end {
        level
    } else if hold_end >= 1.0 {
        // degenerate trailing ramp, jump to the endpoint at t == 1
        if t >= 1.0 {
            1.0
        } else {
            level
        }
    } else {
        lerp(level, 1.0, (t - hold_end) / (1.0 - hold_end))
    }
}
