//! Converts container/viewport geometry into a clamped progress scalar.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geometry::Rect;
use crate::{Error, Result};

/// Normalized position within a scrollable region, always in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(f64);

impl Progress {
    pub const START: Progress = Progress(0.0);
    pub const END: Progress = Progress(1.0);

    /// Clamp any value into [0, 1]; NaN maps to 0
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Progress(0.0)
        } else {
            Progress(value.clamp(0.0, 1.0))
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for Progress {
    fn from(value: f64) -> Self {
        Progress::new(value)
    }
}

/// Geometric model relating container position to progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressModel {
    /// 0 when the container top enters at the viewport bottom,
    /// 1 when its bottom leaves at the viewport top
    Reveal,
    /// 0 when the container top reaches the viewport top,
    /// 1 when a sticky child releases at the container bottom
    PinAndRelease,
    /// 0 when the container top reaches the viewport top,
    /// 1 when its bottom does
    Traverse,
}

impl ProgressModel {
    /// Scrollable extent over which progress runs from 0 to 1
    fn extent(&self, container: &Rect, viewport_height: f64) -> f64 {
        match self {
            ProgressModel::Reveal => container.height + viewport_height,
            ProgressModel::PinAndRelease => container.height - viewport_height,
            ProgressModel::Traverse => container.height,
        }
    }

    /// Distance scrolled into the extent
    fn traveled(&self, container: &Rect, viewport_height: f64) -> f64 {
        match self {
            ProgressModel::Reveal => viewport_height - container.top,
            ProgressModel::PinAndRelease | ProgressModel::Traverse => -container.top,
        }
    }

    /// Sample progress, reporting degenerate geometry as an error
    pub fn try_sample(&self, container: &Rect, viewport_height: f64) -> Result<Progress> {
        let extent = self.extent(container, viewport_height);
        let traveled = self.traveled(container, viewport_height);
        if !(extent > 0.0) || !extent.is_finite() || !traveled.is_finite() {
            return Err(Error::DegenerateGeometry { extent });
        }
        Ok(Progress::new(traveled / extent))
    }

    /// Sample progress; degenerate geometry falls back to 0 or 1
    ///
    /// The fallback is 1 once the container top has reached the viewport
    /// top, 0 before that.
    pub fn sample(&self, container: &Rect, viewport_height: f64) -> Progress {
        match self.try_sample(container, viewport_height) {
            Ok(progress) => progress,
            Err(e) => {
                trace!(model = ?self, error = %e, "Progress sampled from degenerate geometry");
                if container.top <= 0.0 {
                    Progress::END
                } else {
                    Progress::START
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_model() {
        let model = ProgressModel::Reveal;
        // container just entering at the bottom
        assert_eq!(model.sample(&Rect::new(800.0, 1200.0), 800.0).value(), 0.0);
        // halfway through the total travel
        let p = model.sample(&Rect::new(-200.0, 1200.0), 800.0).value();
        assert!((p - 0.5).abs() < 1e-9);
        // fully past
        assert_eq!(model.sample(&Rect::new(-1300.0, 1200.0), 800.0).value(), 1.0);
    }

    #[test]
    fn test_pin_and_release_model() {
        let model = ProgressModel::PinAndRelease;
        assert_eq!(model.sample(&Rect::new(100.0, 2800.0), 800.0).value(), 0.0);
        let p = model.sample(&Rect::new(-1000.0, 2800.0), 800.0).value();
        assert!((p - 0.5).abs() < 1e-9);
        assert_eq!(model.sample(&Rect::new(-5000.0, 2800.0), 800.0).value(), 1.0);
    }

    #[test]
    fn test_traverse_model() {
        let model = ProgressModel::Traverse;
        let p = model.sample(&Rect::new(-250.0, 1000.0), 800.0).value();
        assert!((p - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_pin_is_defined() {
        let model = ProgressModel::PinAndRelease;
        for top in [-500.0, -1.0, 0.0, 1.0, 500.0] {
            let p = model.sample(&Rect::new(top, 800.0), 800.0).value();
            assert!(p.is_finite());
            assert!(p == 0.0 || p == 1.0);
        }
        assert_eq!(model.sample(&Rect::new(-10.0, 800.0), 800.0).value(), 1.0);
        assert_eq!(model.sample(&Rect::new(10.0, 800.0), 800.0).value(), 0.0);
        assert!(matches!(
            model.try_sample(&Rect::new(0.0, 600.0), 800.0),
            Err(Error::DegenerateGeometry { .. })
        ));
    }

    #[test]
    fn test_non_finite_geometry_is_defined() {
        let model = ProgressModel::Reveal;
        let p = model.sample(&Rect::new(f64::NAN, 1000.0), 800.0).value();
        assert!(p == 0.0 || p == 1.0);
        let p = model.sample(&Rect::new(0.0, f64::INFINITY), 800.0).value();
        assert!(p.is_finite());
    }

    #[test]
    fn test_progress_clamps() {
        assert_eq!(Progress::new(-0.5).value(), 0.0);
        assert_eq!(Progress::new(1.5).value(), 1.0);
        assert_eq!(Progress::new(f64::NAN).value(), 0.0);
    }
}
