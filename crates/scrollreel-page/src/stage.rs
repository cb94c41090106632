//! Page orchestrator: routes page events to sections, triggers, panel
//! groups and media, and drives the frame loop.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::ensure;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use scrollreel_core::draw_in::{DrawIn, VectorAssetLoader};
use scrollreel_core::media::{MediaElement, MediaOverlayController, MediaUpdate, PlayerId};
use scrollreel_core::timeline::ElementState;
use scrollreel_core::trigger::{reveal_scroll_target, ExclusiveGroup, IntersectionEntry, TriggerActions};
use scrollreel_core::{AppConfig, DeviceClass, ElementId, Error, GeometryProvider, Result, Viewport};

use crate::event::{ClickTarget, PageEvent};
use crate::manifest::PageManifest;
use crate::render::{RenderTarget, ScrollBehavior};
use crate::scheduler::{DelayQueue, FrameScheduler};
use crate::section::ScrollSection;
use crate::sections::standard_page;
use crate::triggers::{Effect, Observation, TriggerTable};

/// Shared fullscreen media overlay
const OVERLAY: &str = "video-overlay";
const OPEN: &str = "open";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageStats {
    /// Passes that resolved every section
    pub recomputes: u64,
    /// Frame callbacks received
    pub frames: u64,
}

/// Work postponed to a later frame
#[derive(Debug)]
enum Deferred {
    /// Staggered reveal of trigger `trigger`, valid while its epoch is current
    Reveal {
        trigger: usize,
        epoch: u64,
        effect: Effect,
    },
    /// Bring an opened panel into view once it has expanded
    ScrollPanel(ElementId),
}

pub struct Stage<G, R> {
    config: AppConfig,
    device: DeviceClass,
    geometry: G,
    render: R,
    viewport: Viewport,
    sections: Vec<ScrollSection>,
    triggers: TriggerTable,
    groups: BTreeMap<String, ExclusiveGroup>,
    media: MediaOverlayController,
    draw_ins: BTreeMap<ElementId, DrawIn>,
    manifest: PageManifest,
    frames: FrameScheduler,
    deferred: DelayQueue<Deferred>,
    stats: StageStats,
}

impl<G: GeometryProvider, R: RenderTarget> Stage<G, R> {
    /// Build the page for the current viewport
    ///
    /// The device class is fixed here; later resizes only rebuild layouts.
    pub fn new(
        config: AppConfig,
        manifest: PageManifest,
        geometry: G,
        render: R,
        overlay: Box<dyn MediaElement>,
    ) -> Self {
        let viewport = geometry.viewport();
        let device = config.breakpoints.classify(viewport.width);
        let sections = standard_page(device, &manifest)
            .into_iter()
            .map(ScrollSection::new)
            .collect();
        let triggers = TriggerTable::standard(device, &manifest);
        let groups = manifest
            .panel_groups
            .iter()
            .map(|(name, panels)| (name.clone(), ExclusiveGroup::new(panels.clone())))
            .collect();
        let draw_ins = manifest
            .draw_in
            .iter()
            .map(|d| (d.container.clone(), DrawIn::new(d.container.clone(), d.asset.clone())))
            .collect();
        let media = MediaOverlayController::new(config.media.clone(), overlay);

        let mut stage = Self {
            config,
            device,
            geometry,
            render,
            viewport,
            sections,
            triggers,
            groups,
            media,
            draw_ins,
            manifest,
            frames: FrameScheduler::new(),
            deferred: DelayQueue::new(),
            stats: StageStats::default(),
        };
        for (element, state) in stage.triggers.setup() {
            stage.render.apply_state(element, state);
        }
        stage.rebuild_layouts();
        info!(
            device = ?stage.device,
            width = viewport.width,
            sections = stage.sections.len(),
            triggers = stage.triggers.len(),
            "Stage ready"
        );
        stage
    }

    /// Attach the element playing a manifest player
    pub fn register_player(&mut self, id: PlayerId, element: Box<dyn MediaElement>) -> Result<()> {
        let spec = self
            .manifest
            .players
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::MissingElement(format!("player {}", id)))?;
        self.media.register(id, spec, element);
        let initial = self.media.initial_visuals();
        self.apply_media(initial);
        Ok(())
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn stats(&self) -> StageStats {
        self.stats
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    pub fn media(&self) -> &MediaOverlayController {
        &self.media
    }

    pub fn triggers(&self) -> &TriggerTable {
        &self.triggers
    }

    pub fn section(&self, name: &str) -> Option<&ScrollSection> {
        self.sections.iter().find(|s| s.name() == name)
    }

    pub fn draw_in(&self, container: &ElementId) -> Option<&DrawIn> {
        self.draw_ins.get(container)
    }

    /// Load every draw-in asset; returns how many became ready
    pub async fn load_assets(&mut self, loader: &dyn VectorAssetLoader) -> usize {
        let mut ready = 0;
        for draw_in in self.draw_ins.values_mut() {
            // failures are logged by the draw-in and leave it inert
            if let Ok(initial) = draw_in.load(loader).await {
                for transition in &initial {
                    self.render.transition_shape(transition);
                }
                ready += 1;
            }
        }
        info!(ready, total = self.draw_ins.len(), "Vector assets loaded");
        ready
    }

    pub fn handle_event(&mut self, event: PageEvent, now: Instant) {
        match event {
            PageEvent::Scroll => self.on_scroll(),
            PageEvent::Resize { width, height } => self.on_resize(width, height),
            PageEvent::Load => self.on_load(now),
            PageEvent::Intersection(entry) => self.on_intersection(&entry, now),
            PageEvent::Click(target) => self.on_click(target, now),
            PageEvent::MediaEnded(id) => self.on_media_ended(&id),
            PageEvent::OverlayDismissed => self.on_overlay_dismissed(),
        }
    }

    /// Request a frame; bursts of scrolls share one
    pub fn on_scroll(&mut self) {
        if !self.frames.request() {
            trace!("Frame already pending");
        }
    }

    /// Frame callback: fire due actions, then recompute if requested
    pub fn on_frame(&mut self, now: Instant) -> bool {
        self.stats.frames += 1;
        self.fire_due(now);
        if !self.frames.take() {
            return false;
        }
        self.recompute(now);
        true
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        let class = self.config.breakpoints.classify(width);
        if class != self.device {
            debug!(from = ?self.device, to = ?class, "Device class changed, variants kept until reload");
        }
        self.rebuild_layouts();
        self.frames.request();
    }

    /// Start from the top with fresh layouts and one forced recompute
    pub fn on_load(&mut self, now: Instant) {
        self.render.scroll_to(0.0, ScrollBehavior::Instant);
        self.viewport = self.geometry.viewport();
        self.rebuild_layouts();
        self.frames.take();
        self.recompute(now);
    }

    pub fn on_intersection(&mut self, entry: &IntersectionEntry, now: Instant) {
        let matching: Vec<usize> = self
            .triggers
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                matches!(&e.observation, Observation::Intersection { element, .. } if *element == entry.element)
            })
            .map(|(i, _)| i)
            .collect();
        if matching.is_empty() {
            trace!(element = %entry.element, "Intersection for unobserved element");
        }
        for index in matching {
            self.observe(index, entry.is_intersecting, now);
        }
    }

    pub fn on_click(&mut self, target: ClickTarget, now: Instant) {
        match target {
            ClickTarget::Panel { group, index } => self.toggle_panel(&group, index, now),
            ClickTarget::Media(id) => {
                let update = self.media.toggle_player(&id, self.viewport.width);
                self.apply_media(update);
            }
            ClickTarget::OverlayVideo { source, rotate_hint } => {
                let update = self.media.toggle(&source, None, rotate_hint, self.viewport.width);
                self.apply_media(update);
            }
        }
    }

    pub fn on_media_ended(&mut self, id: &PlayerId) {
        let update = self.media.on_ended(id);
        self.apply_media(update);
    }

    pub fn on_overlay_dismissed(&mut self) {
        let update = self.media.dismiss_overlay();
        self.apply_media(update);
    }

    /// Process page events until shutdown or until the event channel closes
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<PageEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> anyhow::Result<StageStats> {
        let interval_ms = self.config.frames.frame_interval_ms;
        ensure!(interval_ms > 0, "frames.frame_interval_ms must be positive");

        let mut frames = tokio::time::interval(Duration::from_millis(interval_ms));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Skip the first tick (fires immediately)
        frames.tick().await;

        info!(interval_ms, "Stage loop started");
        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Stage received shutdown signal");
                        break;
                    }
                }

                event = events.recv() => {
                    match event {
                        Some(event) => self.handle_event(event, Instant::now()),
                        None => {
                            info!("Page event channel closed");
                            break;
                        }
                    }
                }

                _ = frames.tick() => {
                    self.on_frame(Instant::now());
                }
            }
        }

        info!(
            recomputes = self.stats.recomputes,
            frames = self.stats.frames,
            "Stage stopped"
        );
        Ok(self.stats)
    }

    fn rebuild_layouts(&mut self) {
        for section in &mut self.sections {
            section.rebuild(&self.geometry, self.viewport);
        }
    }

    /// Resolve every section from fresh geometry, then check in-view triggers
    fn recompute(&mut self, now: Instant) {
        self.stats.recomputes += 1;
        for section in &self.sections {
            let Some(frame) = section.frame(&self.geometry) else {
                continue;
            };
            for (element, state) in &frame {
                self.render.apply_state(element, state);
            }
        }

        let vh = self.geometry.viewport().height;
        let in_view: Vec<(usize, bool)> = self
            .triggers
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.trigger.is_observing())
            .filter_map(|(i, e)| match &e.observation {
                Observation::InView(element) => self
                    .geometry
                    .rect(element)
                    .map(|rect| (i, rect.top < vh && rect.bottom() > 0.0)),
                Observation::Intersection { .. } => None,
            })
            .collect();
        for (index, visible) in in_view {
            self.observe(index, visible, now);
        }
    }

    fn observe(&mut self, index: usize, is_intersecting: bool, now: Instant) {
        let Some(entry) = self.triggers.entries_mut().get_mut(index) else {
            return;
        };
        let actions = entry.trigger.observe(is_intersecting);
        if actions.is_empty() {
            return;
        }
        debug!(
            trigger = entry.name,
            element = %entry.observation.element(),
            state = ?entry.trigger.state(),
            "Trigger transition"
        );
        self.dispatch(index, actions, now);
    }

    fn dispatch(&mut self, index: usize, actions: TriggerActions<Effect>, now: Instant) {
        for effect in &actions.conceal {
            self.apply_effect(effect, false);
        }
        for (effect, delay) in actions.reveal {
            if delay.is_zero() {
                self.apply_effect(&effect, true);
            } else {
                self.deferred.schedule(
                    now,
                    delay,
                    Deferred::Reveal {
                        trigger: index,
                        epoch: actions.epoch,
                        effect,
                    },
                );
            }
        }
    }

    fn fire_due(&mut self, now: Instant) {
        for action in self.deferred.drain_due(now) {
            match action {
                Deferred::Reveal {
                    trigger,
                    epoch,
                    effect,
                } => {
                    let current = self
                        .triggers
                        .get(trigger)
                        .is_some_and(|e| e.trigger.is_current(epoch));
                    if current {
                        self.apply_effect(&effect, true);
                    } else {
                        debug!(trigger, epoch, "Stale reveal dropped");
                    }
                }
                Deferred::ScrollPanel(panel) => self.scroll_panel_into_view(&panel),
            }
        }
    }

    fn apply_effect(&mut self, effect: &Effect, reveal: bool) {
        match effect {
            Effect::Class { element, class } => self.render.set_class(element, class, reveal),
            Effect::Gate { section, gate } => {
                let Some(target) = self.sections.iter_mut().find(|s| s.name() == *section) else {
                    debug!(section, gate = gate.name(), "Gate for absent section ignored");
                    return;
                };
                let state = target.state_mut();
                if reveal {
                    state.raise(*gate);
                } else {
                    state.clear(*gate);
                }
                self.frames.request();
            }
            Effect::DrawIn(container) => {
                let Some(draw_in) = self.draw_ins.get(container) else {
                    debug!(container = %container, "No draw-in for container");
                    return;
                };
                let transitions = if reveal { draw_in.trigger() } else { draw_in.reset() };
                for transition in &transitions {
                    self.render.transition_shape(transition);
                }
            }
            Effect::State {
                element,
                revealed,
                concealed,
            } => {
                let state = if reveal { revealed } else { concealed };
                self.render.apply_state(element, state);
            }
        }
    }

    fn toggle_panel(&mut self, group: &str, index: usize, now: Instant) {
        let Some(panels) = self.groups.get_mut(group) else {
            debug!(group, "Click for unknown panel group");
            return;
        };
        let change = match panels.toggle(index) {
            Ok(change) => change,
            Err(e) => {
                warn!(group, index, error = %e, "Panel toggle failed");
                return;
            }
        };
        if let Some(closed) = change.closed {
            self.render.set_class(&closed, OPEN, false);
            self.render.set_attribute(&closed, "aria-expanded", "false");
        }
        if let Some(opened) = change.opened {
            self.render.set_class(&opened, OPEN, true);
            self.render.set_attribute(&opened, "aria-expanded", "true");
            let settle = Duration::from_millis(self.config.panels.settle_delay_ms);
            self.deferred.schedule(now, settle, Deferred::ScrollPanel(opened));
        }
    }

    fn scroll_panel_into_view(&mut self, panel: &ElementId) {
        let Some(rect) = self.geometry.rect(panel) else {
            debug!(panel = %panel, "Opened panel has no geometry");
            return;
        };
        let target = reveal_scroll_target(
            &rect,
            self.geometry.viewport().height,
            self.geometry.scroll_y(),
            self.config.panels.scroll_margin,
        );
        if let Some(top) = target {
            self.render.scroll_to(top, ScrollBehavior::Smooth);
        }
    }

    fn apply_media(&mut self, update: MediaUpdate) {
        for (element, opacity) in &update.visuals {
            self.render
                .apply_state(element, &ElementState::with_opacity(*opacity));
        }
        if let Some(overlay) = update.overlay {
            let id = ElementId::new(OVERLAY);
            self.render.set_class(&id, "active", overlay.active);
            self.render.set_class(&id, "show-rotate", overlay.show_rotate);
            let hidden = if overlay.aria_hidden { "true" } else { "false" };
            self.render.set_attribute(&id, "aria-hidden", hidden);
        }
    }
}
