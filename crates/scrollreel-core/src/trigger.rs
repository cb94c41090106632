//! Viewport entrance triggers and exclusive panel groups.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{ElementId, Rect, Viewport};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerState {
    #[default]
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Reveal once, then stop observing
    OneShot,
    /// Reveal on every entry, conceal on every exit
    Repeatable,
}

/// Intersection test parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntersectionOptions {
    /// Fraction of the element that must be visible
    pub threshold: f64,
    /// Bottom root margin as a fraction of viewport height; negative shrinks
    #[serde(default)]
    pub root_margin_bottom: f64,
}

impl Default for IntersectionOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin_bottom: 0.0,
        }
    }
}

impl IntersectionOptions {
    pub fn threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    pub fn with_root_margin_bottom(mut self, fraction: f64) -> Self {
        self.root_margin_bottom = fraction;
        self
    }

    /// Compute an intersection entry from geometry
    pub fn entry(&self, element: ElementId, rect: &Rect, viewport: &Viewport) -> IntersectionEntry {
        let root_bottom = viewport.height * (1.0 + self.root_margin_bottom);
        let visible = (rect.bottom().min(root_bottom) - rect.top.max(0.0)).max(0.0);
        let overlaps = rect.top <= root_bottom && rect.bottom() >= 0.0;
        let ratio = if rect.height > 0.0 {
            (visible / rect.height).clamp(0.0, 1.0)
        } else if overlaps {
            1.0
        } else {
            0.0
        };
        let is_intersecting = if self.threshold > 0.0 {
            overlaps && ratio >= self.threshold
        } else {
            overlaps
        };
        IntersectionEntry {
            element,
            is_intersecting,
            ratio,
        }
    }
}

/// One intersection observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionEntry {
    pub element: ElementId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

/// What the caller must do after an observation
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerActions<T> {
    /// Targets to reveal after the given delay
    pub reveal: Vec<(T, Duration)>,
    /// Targets to conceal immediately
    pub conceal: Vec<T>,
    /// Stop delivering observations for this trigger
    pub unobserve: bool,
    /// Epoch the reveals belong to, see [`ViewportTrigger::is_current`]
    pub epoch: u64,
}

impl<T> TriggerActions<T> {
    fn none(epoch: u64) -> Self {
        Self {
            reveal: Vec::new(),
            conceal: Vec::new(),
            unobserve: false,
            epoch,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reveal.is_empty() && self.conceal.is_empty() && !self.unobserve
    }
}

/// Hidden/Visible state machine for one observed region
///
/// Reveals may be staggered; each entry bumps the epoch so a delayed reveal
/// whose trigger was hidden again before it fired can be recognized as stale.
#[derive(Debug, Clone)]
pub struct ViewportTrigger<T> {
    mode: TriggerMode,
    state: TriggerState,
    stagger: Vec<(T, Duration)>,
    observing: bool,
    epoch: u64,
}

impl<T: Clone> ViewportTrigger<T> {
    pub fn new(mode: TriggerMode) -> Self {
        Self {
            mode,
            state: TriggerState::Hidden,
            stagger: Vec::new(),
            observing: true,
            epoch: 0,
        }
    }

    pub fn one_shot() -> Self {
        Self::new(TriggerMode::OneShot)
    }

    pub fn repeatable() -> Self {
        Self::new(TriggerMode::Repeatable)
    }

    /// Add a sub-reveal fired `delay` after entry
    pub fn stagger(mut self, target: T, delay: Duration) -> Self {
        self.stagger.push((target, delay));
        self
    }

    /// Add a sub-reveal fired immediately on entry
    pub fn immediate(self, target: T) -> Self {
        self.stagger(target, Duration::ZERO)
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn mode(&self) -> TriggerMode {
        self.mode
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// A reveal scheduled at `epoch` may still be applied
    pub fn is_current(&self, epoch: u64) -> bool {
        self.state == TriggerState::Visible && self.epoch == epoch
    }

    /// Feed one intersection observation
    pub fn observe(&mut self, is_intersecting: bool) -> TriggerActions<T> {
        if !self.observing {
            return TriggerActions::none(self.epoch);
        }

        match (self.state, is_intersecting) {
            (TriggerState::Hidden, true) => {
                self.state = TriggerState::Visible;
                self.epoch += 1;
                let mut actions = TriggerActions::none(self.epoch);
                actions.reveal = self.stagger.clone();
                if self.mode == TriggerMode::OneShot {
                    self.observing = false;
                    actions.unobserve = true;
                }
                actions
            }
            (TriggerState::Visible, false) => {
                self.state = TriggerState::Hidden;
                let mut actions = TriggerActions::none(self.epoch);
                actions.conceal = self.stagger.iter().map(|(t, _)| t.clone()).collect();
                actions
            }
            _ => TriggerActions::none(self.epoch),
        }
    }
}

/// Which panels a toggle closed and opened
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupChange {
    pub closed: Option<ElementId>,
    pub opened: Option<ElementId>,
}

/// Accordion of panels with at most one open
#[derive(Debug, Clone)]
pub struct ExclusiveGroup {
    panels: Vec<ElementId>,
    open: Option<usize>,
}

impl ExclusiveGroup {
    pub fn new(panels: Vec<ElementId>) -> Self {
        Self { panels, open: None }
    }

    pub fn panels(&self) -> &[ElementId] {
        &self.panels
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    pub fn open_panel(&self) -> Option<&ElementId> {
        self.open.and_then(|i| self.panels.get(i))
    }

    /// Toggle panel `index`; clicking the open panel closes it
    pub fn toggle(&mut self, index: usize) -> Result<GroupChange> {
        let Some(panel) = self.panels.get(index) else {
            return Err(Error::MissingElement(format!(
                "panel {} of {}",
                index,
                self.panels.len()
            )));
        };

        let closed = self.open.and_then(|i| self.panels.get(i)).cloned();
        let change = if self.open == Some(index) {
            self.open = None;
            GroupChange {
                closed,
                opened: None,
            }
        } else {
            self.open = Some(index);
            GroupChange {
                closed,
                opened: Some(panel.clone()),
            }
        };
        debug!(panel = %panel, open = ?self.open, "Panel toggled");
        Ok(change)
    }
}

/// Scroll offset that brings an opened panel fully into view
///
/// `None` when the panel bottom plus `margin` is already on screen.
pub fn reveal_scroll_target(
    panel: &Rect,
    viewport_height: f64,
    scroll_y: f64,
    margin: f64,
) -> Option<f64> {
    let panel_bottom = panel.bottom() + scroll_y + margin;
    let viewport_bottom = scroll_y + viewport_height;
    (panel_bottom > viewport_bottom).then(|| panel_bottom - viewport_height)
}
