use scrollreel_core::media::PlayerId;
use scrollreel_core::trigger::IntersectionEntry;

/// Page events delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Document scrolled
    Scroll,
    /// Viewport resized
    Resize { width: f64, height: f64 },
    /// Page fully loaded (fonts, images)
    Load,
    /// An observed element crossed its intersection threshold
    Intersection(IntersectionEntry),
    /// User clicked an interactive element
    Click(ClickTarget),
    /// Inline player reached the end of its clip
    MediaEnded(PlayerId),
    /// User tapped the overlay to close it
    OverlayDismissed,
}

/// Interactive elements the engine reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum ClickTarget {
    /// Header of panel `index` in an exclusive group
    Panel { group: String, index: usize },
    /// Card of an inline player
    Media(PlayerId),
    /// Element that only ever plays in the overlay, e.g. a screenshot clip
    OverlayVideo { source: String, rotate_hint: bool },
}
