//! Entrance triggers of the standard page and the effects they fire.

use std::time::Duration;

use scrollreel_core::timeline::{ElementState, Gate, Length};
use scrollreel_core::trigger::{IntersectionOptions, TriggerMode, ViewportTrigger};
use scrollreel_core::{DeviceClass, ElementId};

use crate::manifest::PageManifest;
use crate::sections::{credits, sitemap, storytelling};

/// A reversible change applied when a trigger reveals or conceals
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Add the class on reveal, remove it on conceal
    Class { element: ElementId, class: &'static str },
    /// Raise a section gate on reveal, clear it on conceal
    Gate { section: &'static str, gate: Gate },
    /// Draw the vector asset in on reveal, reset it on conceal
    DrawIn(ElementId),
    /// Apply one of two inline states
    State {
        element: ElementId,
        revealed: ElementState,
        concealed: ElementState,
    },
}

impl Effect {
    pub fn class(element: impl Into<ElementId>, class: &'static str) -> Self {
        Effect::Class {
            element: element.into(),
            class,
        }
    }

    pub fn visible(element: impl Into<ElementId>) -> Self {
        Self::class(element, VISIBLE)
    }
}

/// How a trigger learns whether its region is in view
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// Host-reported intersections of an element
    Intersection {
        element: ElementId,
        options: IntersectionOptions,
    },
    /// Overlap of an element with the viewport, checked on every recompute
    InView(ElementId),
}

impl Observation {
    pub fn element(&self) -> &ElementId {
        match self {
            Observation::Intersection { element, .. } | Observation::InView(element) => element,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TriggerEntry {
    pub name: &'static str,
    pub observation: Observation,
    pub trigger: ViewportTrigger<Effect>,
}

impl TriggerEntry {
    fn observed(
        name: &'static str,
        element: impl Into<ElementId>,
        options: IntersectionOptions,
        trigger: ViewportTrigger<Effect>,
    ) -> Self {
        Self {
            name,
            observation: Observation::Intersection {
                element: element.into(),
                options,
            },
            trigger,
        }
    }

    fn in_view(name: &'static str, element: impl Into<ElementId>, trigger: ViewportTrigger<Effect>) -> Self {
        Self {
            name,
            observation: Observation::InView(element.into()),
            trigger,
        }
    }
}

const VISIBLE: &str = "visible";

fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Desktop repeats entrances, mobile plays them once
fn entrance(device: DeviceClass) -> ViewportTrigger<Effect> {
    if device.is_mobile() {
        ViewportTrigger::new(TriggerMode::OneShot)
    } else {
        ViewportTrigger::new(TriggerMode::Repeatable)
    }
}

/// All triggers of the page plus the inline states they start from
#[derive(Debug, Clone, Default)]
pub struct TriggerTable {
    entries: Vec<TriggerEntry>,
    setup: Vec<(ElementId, ElementState)>,
}

impl TriggerTable {
    pub fn new(entries: Vec<TriggerEntry>, setup: Vec<(ElementId, ElementState)>) -> Self {
        Self { entries, setup }
    }

    /// Triggers of the standard page for a device class
    pub fn standard(device: DeviceClass, manifest: &PageManifest) -> Self {
        let mut entries = Vec::new();
        testimonial(device, &mut entries);
        walkthrough(device, &mut entries);
        staggered_sections(device, &mut entries);
        storytelling_entrance(device, &mut entries);
        sitemap_entrance(device, &mut entries);
        reports(device, manifest, &mut entries);
        results(manifest, &mut entries);
        if device.is_mobile() {
            credits_entrance(&mut entries);
            footer(&mut entries);
        }
        Self {
            entries,
            setup: setup_states(device),
        }
    }

    pub fn entries(&self) -> &[TriggerEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [TriggerEntry] {
        &mut self.entries
    }

    pub fn get(&self, index: usize) -> Option<&TriggerEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// States applied once before the first frame
    pub fn setup(&self) -> &[(ElementId, ElementState)] {
        &self.setup
    }

    /// Elements the host should observe, with their options
    pub fn observed(&self) -> Vec<(ElementId, IntersectionOptions)> {
        self.entries
            .iter()
            .filter(|e| e.trigger.is_observing())
            .filter_map(|e| match &e.observation {
                Observation::Intersection { element, options } => Some((element.clone(), *options)),
                Observation::InView(_) => None,
            })
            .collect()
    }
}

fn setup_states(device: DeviceClass) -> Vec<(ElementId, ElementState)> {
    let mut states = Vec::new();
    if device == DeviceClass::Tablet {
        states.push((ElementId::new(sitemap::CONTENT), ElementState::with_opacity(0.0)));
    }
    if device.is_mobile() {
        let lowered = ElementState {
            translate_y: Some(Length::px(30.0)),
            ..ElementState::with_opacity(0.0)
        };
        states.push((ElementId::new(credits::CREDITS), lowered));
        states.push((ElementId::new(credits::TEAM), lowered));
    }
    states
}

/// S2: testimonial, quote and isometric illustration, revealed in the top
/// three quarters of the viewport
fn testimonial(device: DeviceClass, entries: &mut Vec<TriggerEntry>) {
    let options = IntersectionOptions::threshold(0.1).with_root_margin_bottom(-0.25);
    for (element, class) in [
        ("testimonial-video", VISIBLE),
        ("quote-container", VISIBLE),
        ("isometric", "iso-animate"),
    ] {
        let trigger = entrance(device).immediate(Effect::class(element, class));
        entries.push(TriggerEntry::observed("s2", element, options, trigger));
    }
}

/// S3: article, composition and interface draw-in follow the content
/// block's overlap with the viewport
fn walkthrough(device: DeviceClass, entries: &mut Vec<TriggerEntry>) {
    let content = entrance(device)
        .stagger(Effect::visible("s3-article"), ms(100))
        .stagger(Effect::visible("s3-composition"), ms(400))
        .stagger(Effect::DrawIn(ElementId::new("s3-interface-svg")), ms(400));
    entries.push(TriggerEntry::in_view("s3", "section-3-content", content));

    let options = IntersectionOptions::threshold(0.15);
    for element in ["s3-video-card", "s3-quote-container"] {
        let trigger = entrance(device).immediate(Effect::visible(element));
        entries.push(TriggerEntry::observed("s3", element, options, trigger));
    }
}

/// S4, S5 and S8: whole-section staggered entrances on desktop; phones and
/// tablets reveal S4 and S5 element by element
fn staggered_sections(device: DeviceClass, entries: &mut Vec<TriggerEntry>) {
    if device.is_mobile() {
        let s4 = IntersectionOptions::threshold(0.15);
        for element in ["s4-article-header", "s4-chart", "s4-expandables"] {
            let trigger = ViewportTrigger::one_shot().immediate(Effect::visible(element));
            entries.push(TriggerEntry::observed("s4", element, s4, trigger));
        }
        let s5 = IntersectionOptions::threshold(0.2);
        for element in [
            "s5-article-header",
            "s5-video-card",
            "s5-quote-container",
            "s5-quote-author",
            "s5-right",
        ] {
            let trigger = ViewportTrigger::one_shot().immediate(Effect::visible(element));
            entries.push(TriggerEntry::observed("s5", element, s5, trigger));
        }
    } else {
        let s4 = ViewportTrigger::repeatable()
            .stagger(Effect::visible("s4-article-header"), ms(400))
            .stagger(Effect::visible("s4-chart"), ms(800))
            .stagger(Effect::visible("s4-expandables"), ms(1200));
        entries.push(TriggerEntry::observed(
            "s4",
            "section-4",
            IntersectionOptions::threshold(0.15),
            s4,
        ));
        let s5 = ViewportTrigger::repeatable()
            .stagger(Effect::visible("s5-video-card"), ms(400))
            .stagger(Effect::visible("s5-right"), ms(700));
        entries.push(TriggerEntry::observed(
            "s5",
            "section-5",
            IntersectionOptions::threshold(0.15),
            s5,
        ));
    }

    let s8 = ViewportTrigger::repeatable()
        .stagger(Effect::visible("s8-header"), ms(400))
        .stagger(Effect::visible("s8-article"), ms(800))
        .stagger(Effect::visible("s8-expandables"), ms(1200))
        .stagger(Effect::class("s8-line-chart", "animate"), ms(1600));
    entries.push(TriggerEntry::observed(
        "s8",
        "section-8",
        IntersectionOptions::threshold(0.1),
        s8,
    ));
}

/// S6: the mobile entrance hands the article over to the scroll timeline
/// once its longest stagger has finished
fn storytelling_entrance(device: DeviceClass, entries: &mut Vec<TriggerEntry>) {
    let trigger = if device.is_mobile() {
        ViewportTrigger::one_shot()
            .stagger(Effect::visible("s6-article-header"), ms(400))
            .stagger(Effect::visible("s6-body-states"), ms(600))
            .stagger(Effect::visible("s6-screenshots"), ms(700))
            .stagger(
                Effect::Gate {
                    section: storytelling::NAME,
                    gate: storytelling::ENTRANCE_DONE,
                },
                ms(900),
            )
    } else {
        ViewportTrigger::repeatable()
            .stagger(Effect::visible("s6-text"), ms(400))
            .stagger(Effect::visible("s6-screenshots"), ms(700))
    };
    entries.push(TriggerEntry::observed(
        "s6",
        "section-6",
        IntersectionOptions::threshold(0.1),
        trigger,
    ));
}

/// S7: sitemap and content entrances open the scroll fades; phones only
/// reveal the testimonial block
fn sitemap_entrance(device: DeviceClass, entries: &mut Vec<TriggerEntry>) {
    if device == DeviceClass::Phone {
        let options = IntersectionOptions::threshold(0.15);
        for element in ["s7-video-card", "s7-quote-container", "s7-quote-author"] {
            let trigger = ViewportTrigger::one_shot().immediate(Effect::visible(element));
            entries.push(TriggerEntry::observed("s7", element, options, trigger));
        }
        return;
    }

    let content = ElementId::new(sitemap::CONTENT);
    let trigger = ViewportTrigger::repeatable()
        .stagger(Effect::visible(sitemap::SITEMAP), ms(200))
        .stagger(
            Effect::Gate {
                section: sitemap::NAME,
                gate: sitemap::SITEMAP_VISIBLE,
            },
            ms(200),
        )
        .stagger(Effect::visible(content.clone()), ms(500))
        .stagger(
            Effect::State {
                element: content,
                revealed: ElementState::with_opacity(1.0),
                concealed: ElementState::with_opacity(0.0),
            },
            ms(500),
        )
        .stagger(
            Effect::Gate {
                section: sitemap::NAME,
                gate: sitemap::ENTRANCE_COMPLETE,
            },
            ms(500),
        );
    entries.push(TriggerEntry::in_view("s7", sitemap::CONTAINER, trigger));
}

/// S10: text entrances, the mobile reports page and the line illustration
fn reports(device: DeviceClass, manifest: &PageManifest, entries: &mut Vec<TriggerEntry>) {
    let options = IntersectionOptions::threshold(0.15);
    let mut observed = manifest.reports_entrances.clone();
    // the mobile chart scroll owns the wrapped elements
    if !device.is_mobile() {
        observed.extend(manifest.reports_wrapped.iter().cloned());
    }
    for element in observed {
        let trigger = ViewportTrigger::repeatable().immediate(Effect::visible(element.clone()));
        entries.push(TriggerEntry::observed("s10", element, options, trigger));
    }

    if device.is_mobile() {
        let page = manifest.reports_page.clone();
        let trigger = ViewportTrigger::one_shot().immediate(Effect::class(page.clone(), "s10-visible"));
        entries.push(TriggerEntry::observed(
            "s10",
            page,
            IntersectionOptions::threshold(0.4),
            trigger,
        ));
    }

    let line = "s10-line-illustration";
    entries.push(TriggerEntry::observed(
        "s10",
        line,
        IntersectionOptions::threshold(0.3),
        ViewportTrigger::repeatable().immediate(Effect::class(line, "animate")),
    ));
}

/// S11: text entrances and cards sliding in 300ms apart
fn results(manifest: &PageManifest, entries: &mut Vec<TriggerEntry>) {
    let options = IntersectionOptions::threshold(0.15);
    for element in &manifest.results_entrances {
        let trigger = ViewportTrigger::repeatable().immediate(Effect::visible(element.clone()));
        entries.push(TriggerEntry::observed("s11", element.clone(), options, trigger));
    }
    for (i, card) in manifest.results_cards.iter().enumerate() {
        let trigger = ViewportTrigger::repeatable().stagger(Effect::visible(card.clone()), ms(i as u64 * 300));
        entries.push(TriggerEntry::observed("s11", card.clone(), options, trigger));
    }
}

/// S12 (mobile): credits and team fade in once, then the scroll timeline
/// takes over
fn credits_entrance(entries: &mut Vec<TriggerEntry>) {
    let shown = ElementState {
        translate_y: Some(Length::ZERO),
        ..ElementState::with_opacity(1.0)
    };
    let lowered = ElementState {
        translate_y: Some(Length::px(30.0)),
        ..ElementState::with_opacity(0.0)
    };
    let mut trigger = ViewportTrigger::one_shot();
    for element in [credits::CREDITS, credits::TEAM] {
        trigger = trigger.immediate(Effect::State {
            element: ElementId::new(element),
            revealed: shown,
            concealed: lowered,
        });
    }
    let trigger = trigger.immediate(Effect::Gate {
        section: credits::NAME,
        gate: credits::ENTERED,
    });
    entries.push(TriggerEntry::observed(
        "s12",
        "section-12",
        IntersectionOptions::threshold(0.05),
        trigger,
    ));
}

/// Mobile: the fixed header steps aside while the footer is on screen
fn footer(entries: &mut Vec<TriggerEntry>) {
    let hidden = ElementState {
        pointer_enabled: Some(false),
        ..ElementState::with_opacity(0.0)
    };
    let shown = ElementState {
        pointer_enabled: Some(true),
        ..ElementState::with_opacity(1.0)
    };
    let trigger = ViewportTrigger::repeatable().immediate(Effect::State {
        element: ElementId::new("header"),
        revealed: hidden,
        concealed: shown,
    });
    entries.push(TriggerEntry::observed(
        "footer",
        "site-footer",
        IntersectionOptions::threshold(0.0),
        trigger,
    ));
}
