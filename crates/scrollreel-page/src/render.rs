//! Render-target adapter: where resolved states end up.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use scrollreel_core::draw_in::ShapeTransition;
use scrollreel_core::timeline::ElementState;
use scrollreel_core::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// Applies engine output to the live page
pub trait RenderTarget {
    /// Apply the set fields of `state`; unset fields are left as they are
    fn apply_state(&mut self, element: &ElementId, state: &ElementState);

    fn set_class(&mut self, element: &ElementId, class: &str, enabled: bool);

    fn set_attribute(&mut self, element: &ElementId, name: &str, value: &str);

    /// Start a vector shape style transition
    fn transition_shape(&mut self, transition: &ShapeTransition);

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// In-memory target keeping the latest output per element
#[derive(Debug, Default, Serialize)]
pub struct RecordingTarget {
    pub states: BTreeMap<ElementId, ElementState>,
    pub classes: BTreeMap<ElementId, BTreeSet<String>>,
    pub attributes: BTreeMap<ElementId, BTreeMap<String, String>>,
    pub shapes: BTreeMap<ElementId, ShapeTransition>,
    pub scrolls: Vec<ScrollRequest>,
    /// Number of `apply_state` calls
    pub applied: usize,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, element: &str) -> ElementState {
        self.states
            .get(&ElementId::new(element))
            .copied()
            .unwrap_or_default()
    }

    pub fn opacity(&self, element: &str) -> Option<f64> {
        self.state(element).opacity
    }

    pub fn has_class(&self, element: &str, class: &str) -> bool {
        self.classes
            .get(&ElementId::new(element))
            .is_some_and(|set| set.contains(class))
    }

    pub fn attribute(&self, element: &str, name: &str) -> Option<&str> {
        self.attributes
            .get(&ElementId::new(element))
            .and_then(|attrs| attrs.get(name))
            .map(String::as_str)
    }

    /// Snapshot of everything recorded so far
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl RenderTarget for RecordingTarget {
    fn apply_state(&mut self, element: &ElementId, state: &ElementState) {
        self.states.entry(element.clone()).or_default().merge(state);
        self.applied += 1;
    }

    fn set_class(&mut self, element: &ElementId, class: &str, enabled: bool) {
        let set = self.classes.entry(element.clone()).or_default();
        if enabled {
            set.insert(class.to_string());
        } else {
            set.remove(class);
        }
    }

    fn set_attribute(&mut self, element: &ElementId, name: &str, value: &str) {
        self.attributes
            .entry(element.clone())
            .or_default()
            .insert(name.to_string(), value.to_string());
    }

    fn transition_shape(&mut self, transition: &ShapeTransition) {
        self.shapes
            .insert(transition.shape.clone(), transition.clone());
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scrolls.push(ScrollRequest { top, behavior });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_merge_per_element() {
        let mut target = RecordingTarget::new();
        let id = ElementId::new("logo");
        target.apply_state(&id, &ElementState::with_opacity(0.5));
        target.apply_state(
            &id,
            &ElementState {
                top: Some(120.0),
                ..Default::default()
            },
        );
        assert_eq!(target.opacity("logo"), Some(0.5));
        assert_eq!(target.state("logo").top, Some(120.0));
        assert_eq!(target.applied, 2);
    }

    #[test]
    fn test_classes_toggle() {
        let mut target = RecordingTarget::new();
        let id = ElementId::new("s4-box-1");
        target.set_class(&id, "open", true);
        assert!(target.has_class("s4-box-1", "open"));
        target.set_class(&id, "open", false);
        assert!(!target.has_class("s4-box-1", "open"));
    }

    #[test]
    fn test_to_json_snapshot() {
        let mut target = RecordingTarget::new();
        target.apply_state(&"tagline".into(), &ElementState::with_opacity(1.0));
        target.set_attribute(&"video-overlay".into(), "aria-hidden", "true");
        target.scroll_to(0.0, ScrollBehavior::Instant);

        let json: serde_json::Value = serde_json::from_str(&target.to_json().unwrap()).unwrap();
        assert_eq!(json["states"]["tagline"]["opacity"], 1.0);
        assert_eq!(json["attributes"]["video-overlay"]["aria-hidden"], "true");
        assert_eq!(json["scrolls"][0]["behavior"], "instant");
    }
}
