//! Inline video players and the single shared fullscreen overlay.
//!
//! Wide viewports toggle playback inline; at or below the overlay breakpoint
//! every player routes its source into the one overlay instead.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::MediaConfig;
use crate::geometry::ElementId;
use crate::Result;

/// Playback handle supplied by the host
pub trait MediaElement: Send {
    fn set_source(&mut self, source: &str);

    /// Start playback; the host may reject it (autoplay policy, bad source)
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn seek(&mut self, seconds: f64);

    fn current_time(&self) -> f64;

    fn is_paused(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Paused/playing presentation of an inline player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineStyle {
    /// Paused video stays visible, dimmed
    #[default]
    Dim,
    /// Paused video is hidden behind a dimmed poster
    Poster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlinePlayerSpec {
    pub video: ElementId,
    /// Play button shown while paused
    pub affordance: ElementId,
    #[serde(default)]
    pub poster: Option<ElementId>,
    pub source: String,
    /// Landscape clip; the overlay asks phones to rotate
    #[serde(default)]
    pub rotate_hint: bool,
    #[serde(default)]
    pub style: InlineStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSessionState {
    #[default]
    Idle,
    Playing,
    Paused,
    Ended,
}

/// Presentation of the shared overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayState {
    pub active: bool,
    pub show_rotate: bool,
    pub aria_hidden: bool,
    pub source: Option<String>,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self {
            active: false,
            show_rotate: false,
            aria_hidden: true,
            source: None,
        }
    }
}

/// Visual changes for the render adapter
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaUpdate {
    /// Element opacities to apply
    pub visuals: Vec<(ElementId, f64)>,
    /// New overlay presentation, when it changed
    pub overlay: Option<OverlayState>,
}

impl MediaUpdate {
    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty() && self.overlay.is_none()
    }

    pub fn opacity_of(&self, element: &ElementId) -> Option<f64> {
        self.visuals
            .iter()
            .rev()
            .find(|(id, _)| id == element)
            .map(|(_, v)| *v)
    }
}

struct InlinePlayer {
    spec: InlinePlayerSpec,
    element: Box<dyn MediaElement>,
    session: MediaSessionState,
}

pub struct MediaOverlayController {
    config: MediaConfig,
    players: BTreeMap<PlayerId, InlinePlayer>,
    overlay: Box<dyn MediaElement>,
    overlay_state: OverlayState,
    overlay_session: MediaSessionState,
}

impl MediaOverlayController {
    pub fn new(config: MediaConfig, overlay: Box<dyn MediaElement>) -> Self {
        Self {
            config,
            players: BTreeMap::new(),
            overlay,
            overlay_state: OverlayState::default(),
            overlay_session: MediaSessionState::Idle,
        }
    }

    pub fn register(&mut self, id: PlayerId, spec: InlinePlayerSpec, element: Box<dyn MediaElement>) {
        self.players.insert(
            id,
            InlinePlayer {
                spec,
                element,
                session: MediaSessionState::Idle,
            },
        );
    }

    pub fn overlay_state(&self) -> &OverlayState {
        &self.overlay_state
    }

    pub fn overlay_session(&self) -> MediaSessionState {
        self.overlay_session
    }

    pub fn overlay_player(&self) -> &dyn MediaElement {
        self.overlay.as_ref()
    }

    pub fn session(&self, id: &PlayerId) -> Option<MediaSessionState> {
        self.players.get(id).map(|p| p.session)
    }

    pub fn player(&self, id: &PlayerId) -> Option<&dyn MediaElement> {
        self.players.get(id).map(|p| p.element.as_ref())
    }

    pub fn spec(&self, id: &PlayerId) -> Option<&InlinePlayerSpec> {
        self.players.get(id).map(|p| &p.spec)
    }

    /// Initial paused presentation of every registered player
    pub fn initial_visuals(&self) -> MediaUpdate {
        let mut update = MediaUpdate::default();
        for player in self.players.values() {
            update
                .visuals
                .extend(self.visuals_for(&player.spec, false));
        }
        update
    }

    /// Click on a registered player
    pub fn toggle_player(&mut self, id: &PlayerId, viewport_width: f64) -> MediaUpdate {
        let Some(player) = self.players.get(id) else {
            debug!(player = %id, "Toggle for unknown player ignored");
            return MediaUpdate::default();
        };
        let source = player.spec.source.clone();
        let rotate_hint = player.spec.rotate_hint;
        self.toggle(&source, Some(id), rotate_hint, viewport_width)
    }

    /// Route a play request by viewport width
    ///
    /// At or below the overlay breakpoint the source plays in the overlay
    /// (preempting whatever it was showing) and the inline player is left
    /// alone. Above it the inline player toggles; a request with no inline
    /// player does nothing there.
    pub fn toggle(
        &mut self,
        source: &str,
        inline: Option<&PlayerId>,
        rotate_hint: bool,
        viewport_width: f64,
    ) -> MediaUpdate {
        if viewport_width <= self.config.overlay_breakpoint {
            return self.open_overlay(source, rotate_hint);
        }

        match inline {
            Some(id) => self.toggle_inline(id),
            None => MediaUpdate::default(),
        }
    }

    fn open_overlay(&mut self, source: &str, rotate_hint: bool) -> MediaUpdate {
        if self.overlay_state.active {
            debug!(previous = ?self.overlay_state.source, "Overlay session preempted");
        }
        self.overlay.set_source(source);
        self.overlay_state = OverlayState {
            active: true,
            show_rotate: rotate_hint,
            aria_hidden: false,
            source: Some(source.to_string()),
        };
        self.overlay.seek(0.0);
        self.overlay_session = match self.overlay.play() {
            Ok(()) => MediaSessionState::Playing,
            Err(e) => {
                warn!(source, error = %e, "Overlay playback rejected");
                MediaSessionState::Paused
            }
        };
        MediaUpdate {
            visuals: Vec::new(),
            overlay: Some(self.overlay_state.clone()),
        }
    }

    fn toggle_inline(&mut self, id: &PlayerId) -> MediaUpdate {
        let Some(player) = self.players.get_mut(id) else {
            debug!(player = %id, "Toggle for unknown player ignored");
            return MediaUpdate::default();
        };

        let playing = if player.element.is_paused() {
            match player.element.play() {
                Ok(()) => true,
                Err(e) => {
                    warn!(player = %id, error = %e, "Inline playback rejected");
                    false
                }
            }
        } else {
            player.element.pause();
            false
        };
        player.session = if playing {
            MediaSessionState::Playing
        } else {
            MediaSessionState::Paused
        };

        let spec = player.spec.clone();
        MediaUpdate {
            visuals: self.visuals_for(&spec, playing),
            overlay: None,
        }
    }

    /// Playback of an inline player reached its end
    pub fn on_ended(&mut self, id: &PlayerId) -> MediaUpdate {
        let Some(player) = self.players.get_mut(id) else {
            debug!(player = %id, "Ended event for unknown player ignored");
            return MediaUpdate::default();
        };
        player.element.seek(0.0);
        player.session = MediaSessionState::Ended;
        let spec = player.spec.clone();
        MediaUpdate {
            visuals: self.visuals_for(&spec, false),
            overlay: None,
        }
    }

    /// Close the overlay
    pub fn dismiss_overlay(&mut self) -> MediaUpdate {
        self.overlay.pause();
        self.overlay.seek(0.0);
        self.overlay_state = OverlayState {
            source: self.overlay_state.source.take(),
            ..OverlayState::default()
        };
        self.overlay_session = MediaSessionState::Idle;
        MediaUpdate {
            visuals: Vec::new(),
            overlay: Some(self.overlay_state.clone()),
        }
    }

    fn visuals_for(&self, spec: &InlinePlayerSpec, playing: bool) -> Vec<(ElementId, f64)> {
        let dimmed = self.config.dimmed_opacity;
        let affordance = if playing { 0.0 } else { 1.0 };
        match spec.style {
            InlineStyle::Dim => vec![
                (spec.video.clone(), if playing { 1.0 } else { dimmed }),
                (spec.affordance.clone(), affordance),
            ],
            InlineStyle::Poster => {
                let mut visuals = vec![(spec.video.clone(), if playing { 1.0 } else { 0.0 })];
                if let Some(poster) = &spec.poster {
                    visuals.push((poster.clone(), if playing { 0.0 } else { dimmed }));
                }
                visuals.push((spec.affordance.clone(), affordance));
                visuals
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[derive(Default)]
    struct FakeVideo {
        source: String,
        time: f64,
        playing: bool,
        reject_play: bool,
    }

    impl FakeVideo {
        fn rejecting() -> Self {
            Self {
                reject_play: true,
                ..Default::default()
            }
        }
    }

    impl MediaElement for FakeVideo {
        fn set_source(&mut self, source: &str) {
            self.source = source.to_string();
        }

        fn play(&mut self) -> Result<()> {
            if self.reject_play {
                return Err(Error::MediaPlay("not allowed".to_string()));
            }
            self.playing = true;
            Ok(())
        }

        fn pause(&mut self) {
            self.playing = false;
        }

        fn seek(&mut self, seconds: f64) {
            self.time = seconds;
        }

        fn current_time(&self) -> f64 {
            self.time
        }

        fn is_paused(&self) -> bool {
            !self.playing
        }
    }

    fn spec(style: InlineStyle) -> InlinePlayerSpec {
        InlinePlayerSpec {
            video: "video".into(),
            affordance: "play".into(),
            poster: matches!(style, InlineStyle::Poster).then(|| ElementId::new("poster")),
            source: "clip.mp4".to_string(),
            rotate_hint: true,
            style,
        }
    }

    fn controller(style: InlineStyle, element: FakeVideo) -> MediaOverlayController {
        let mut controller =
            MediaOverlayController::new(MediaConfig::default(), Box::new(FakeVideo::default()));
        controller.register("testimonial".into(), spec(style), Box::new(element));
        controller
    }

    #[test]
    fn test_inline_toggle_on_desktop() {
        let mut media = controller(InlineStyle::Dim, FakeVideo::default());
        let id = PlayerId::new("testimonial");

        let update = media.toggle_player(&id, 1280.0);
        assert_eq!(update.opacity_of(&"video".into()), Some(1.0));
        assert_eq!(update.opacity_of(&"play".into()), Some(0.0));
        assert_eq!(media.session(&id), Some(MediaSessionState::Playing));
        assert!(update.overlay.is_none());

        let update = media.toggle_player(&id, 1280.0);
        assert_eq!(update.opacity_of(&"video".into()), Some(0.5));
        assert_eq!(update.opacity_of(&"play".into()), Some(1.0));
        assert_eq!(media.session(&id), Some(MediaSessionState::Paused));
    }

    #[test]
    fn test_poster_style_visuals() {
        let mut media = controller(InlineStyle::Poster, FakeVideo::default());
        let id = PlayerId::new("testimonial");
        let update = media.toggle_player(&id, 1440.0);
        assert_eq!(update.opacity_of(&"poster".into()), Some(0.0));
        let update = media.toggle_player(&id, 1440.0);
        assert_eq!(update.opacity_of(&"video".into()), Some(0.0));
        assert_eq!(update.opacity_of(&"poster".into()), Some(0.5));
    }

    #[test]
    fn test_overlay_at_breakpoint() {
        let mut media = controller(InlineStyle::Dim, FakeVideo::default());
        let id = PlayerId::new("testimonial");

        let update = media.toggle_player(&id, 1024.0);
        let overlay = update.overlay.unwrap();
        assert!(overlay.active);
        assert!(overlay.show_rotate);
        assert!(!overlay.aria_hidden);
        assert_eq!(overlay.source.as_deref(), Some("clip.mp4"));
        assert!(!media.overlay_player().is_paused());
        // inline player untouched
        assert!(media.player(&id).unwrap().is_paused());
        assert_eq!(media.session(&id), Some(MediaSessionState::Idle));
    }

    #[test]
    fn test_overlay_preempted_by_next_source() {
        let mut media = controller(InlineStyle::Dim, FakeVideo::default());
        media.toggle("a.mp4", None, true, 375.0);
        let update = media.toggle("b.mp4", None, false, 375.0);
        let overlay = update.overlay.unwrap();
        assert_eq!(overlay.source.as_deref(), Some("b.mp4"));
        assert!(!overlay.show_rotate);
        assert_eq!(media.overlay_player().current_time(), 0.0);
    }

    #[test]
    fn test_dismiss_overlay() {
        let mut media = controller(InlineStyle::Dim, FakeVideo::default());
        media.toggle("a.mp4", None, true, 375.0);
        let overlay = media.dismiss_overlay().overlay.unwrap();
        assert!(!overlay.active);
        assert!(!overlay.show_rotate);
        assert!(overlay.aria_hidden);
        assert!(media.overlay_player().is_paused());
        assert_eq!(media.overlay_session(), MediaSessionState::Idle);
    }

    #[test]
    fn test_ended_restores_paused_visuals() {
        let mut media = controller(InlineStyle::Dim, FakeVideo::default());
        let id = PlayerId::new("testimonial");
        media.toggle_player(&id, 1280.0);
        let update = media.on_ended(&id);
        assert_eq!(update.opacity_of(&"video".into()), Some(0.5));
        assert_eq!(update.opacity_of(&"play".into()), Some(1.0));
        assert_eq!(media.session(&id), Some(MediaSessionState::Ended));
        assert_eq!(media.player(&id).unwrap().current_time(), 0.0);
    }

    #[test]
    fn test_rejected_play_keeps_paused_visuals() {
        let mut media = controller(InlineStyle::Dim, FakeVideo::rejecting());
        let id = PlayerId::new("testimonial");
        let update = media.toggle_player(&id, 1280.0);
        assert_eq!(update.opacity_of(&"video".into()), Some(0.5));
        assert_eq!(update.opacity_of(&"play".into()), Some(1.0));
        assert_eq!(media.session(&id), Some(MediaSessionState::Paused));
    }

    #[test]
    fn test_unknown_player_is_noop() {
        let mut media = controller(InlineStyle::Dim, FakeVideo::default());
        assert!(media.toggle_player(&"missing".into(), 1280.0).is_empty());
        assert!(media.on_ended(&"missing".into()).is_empty());
    }
}
