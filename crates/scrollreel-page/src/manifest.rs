//! Element ids and media sources of the page.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use scrollreel_core::media::{InlinePlayerSpec, InlineStyle, PlayerId};
use scrollreel_core::ElementId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageManifest {
    /// Exclusive panel groups by name
    #[serde(default = "default_panel_groups")]
    pub panel_groups: BTreeMap<String, Vec<ElementId>>,
    #[serde(default = "default_storytelling_bodies")]
    pub storytelling_bodies: Vec<ElementId>,
    #[serde(default = "default_storytelling_shots")]
    pub storytelling_shots: Vec<ElementId>,
    #[serde(default = "default_chart_cards")]
    pub chart_cards: Vec<ElementId>,
    /// Report entrances observed on every device
    #[serde(default = "default_reports_entrances")]
    pub reports_entrances: Vec<ElementId>,
    /// Report entrances that the mobile chart scroll takes over
    #[serde(default = "default_reports_wrapped")]
    pub reports_wrapped: Vec<ElementId>,
    #[serde(default = "default_reports_page")]
    pub reports_page: ElementId,
    #[serde(default = "default_results_entrances")]
    pub results_entrances: Vec<ElementId>,
    #[serde(default = "default_results_cards")]
    pub results_cards: Vec<ElementId>,
    #[serde(default = "default_players")]
    pub players: BTreeMap<PlayerId, InlinePlayerSpec>,
    #[serde(default = "default_draw_in")]
    pub draw_in: Vec<DrawInAsset>,
}

/// Vector illustration drawn in on entrance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawInAsset {
    pub container: ElementId,
    pub asset: String,
}

impl Default for PageManifest {
    fn default() -> Self {
        Self {
            panel_groups: default_panel_groups(),
            storytelling_bodies: default_storytelling_bodies(),
            storytelling_shots: default_storytelling_shots(),
            chart_cards: default_chart_cards(),
            reports_entrances: default_reports_entrances(),
            reports_wrapped: default_reports_wrapped(),
            reports_page: default_reports_page(),
            results_entrances: default_results_entrances(),
            results_cards: default_results_cards(),
            players: default_players(),
            draw_in: default_draw_in(),
        }
    }
}

fn numbered(prefix: &str, count: usize) -> Vec<ElementId> {
    (1..=count)
        .map(|i| ElementId::new(format!("{}-{}", prefix, i)))
        .collect()
}

fn ids(names: &[&str]) -> Vec<ElementId> {
    names.iter().map(|&name| ElementId::new(name)).collect()
}

fn default_panel_groups() -> BTreeMap<String, Vec<ElementId>> {
    BTreeMap::from([
        ("s4".to_string(), numbered("s4-expand-box", 3)),
        ("s8".to_string(), numbered("s8-expand-box", 3)),
    ])
}

fn default_storytelling_bodies() -> Vec<ElementId> {
    numbered("s6-body", 3)
}

fn default_storytelling_shots() -> Vec<ElementId> {
    numbered("s6-shot", 3)
}

fn default_chart_cards() -> Vec<ElementId> {
    numbered("s10-chart", 3)
}

fn default_reports_entrances() -> Vec<ElementId> {
    ids(&["s10-text", "s10-report-image"])
}

fn default_reports_wrapped() -> Vec<ElementId> {
    ids(&["s10-charts", "s10-bottom-area"])
}

fn default_reports_page() -> ElementId {
    ElementId::new("s10-reports-page")
}

fn default_results_entrances() -> Vec<ElementId> {
    ids(&["s11-header", "s11-body"])
}

fn default_results_cards() -> Vec<ElementId> {
    numbered("s11-card", 3)
}

fn player(prefix: &str, source: &str, rotate_hint: bool, style: InlineStyle) -> InlinePlayerSpec {
    InlinePlayerSpec {
        video: ElementId::new(format!("{}-video-player", prefix)),
        affordance: ElementId::new(format!("{}-play-button", prefix)),
        poster: matches!(style, InlineStyle::Poster)
            .then(|| ElementId::new(format!("{}-video-poster", prefix))),
        source: source.to_string(),
        rotate_hint,
        style,
    }
}

fn default_players() -> BTreeMap<PlayerId, InlinePlayerSpec> {
    BTreeMap::from([
        (
            PlayerId::new("testimonial"),
            player("testimonial", "assets/testimonial.mp4", true, InlineStyle::Dim),
        ),
        (
            PlayerId::new("s3"),
            player("s3", "assets/s3-walkthrough.mp4", false, InlineStyle::Dim),
        ),
        (
            PlayerId::new("s5"),
            player("s5", "assets/s5-interview.mp4", false, InlineStyle::Dim),
        ),
        (
            PlayerId::new("s7"),
            player("s7", "assets/s7-sitemap.mp4", false, InlineStyle::Poster),
        ),
        (
            PlayerId::new("s8"),
            player("s8", "assets/s8-metrics.mp4", false, InlineStyle::Poster),
        ),
    ])
}

fn default_draw_in() -> Vec<DrawInAsset> {
    vec![DrawInAsset {
        container: ElementId::new("s3-interface-svg"),
        asset: "assets/oldinterface.svg".to_string(),
    }]
}

impl PageManifest {
    /// Parse a manifest from TOML text; missing keys use the standard page
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse page manifest")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read page manifest {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn panel_group(&self, name: &str) -> Option<&[ElementId]> {
        self.panel_groups.get(name).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let manifest = PageManifest::default();
        assert_eq!(manifest.storytelling_bodies.len(), 3);
        assert_eq!(manifest.storytelling_shots[0].as_str(), "s6-shot-1");
        assert_eq!(manifest.panel_group("s8").map(<[_]>::len), Some(3));
        let s7 = &manifest.players[&PlayerId::new("s7")];
        assert_eq!(s7.style, InlineStyle::Poster);
        assert_eq!(s7.poster.as_ref().map(ElementId::as_str), Some("s7-video-poster"));
        assert!(manifest.players[&PlayerId::new("testimonial")].rotate_hint);
    }

    #[test]
    fn test_partial_manifest_keeps_defaults() {
        let manifest = PageManifest::from_toml_str(
            r#"
            results_cards = ["card-a", "card-b"]

            [panel_groups]
            faq = ["q1", "q2"]
            "#,
        )
        .unwrap();
        assert_eq!(manifest.results_cards.len(), 2);
        assert_eq!(manifest.panel_group("faq").map(<[_]>::len), Some(2));
        assert!(manifest.panel_group("s4").is_none());
        assert_eq!(manifest.chart_cards.len(), 3);
    }

    #[test]
    fn test_toml_roundtrip() {
        let manifest = PageManifest::default();
        let text = toml::to_string(&manifest).unwrap();
        let parsed = PageManifest::from_toml_str(&text).unwrap();
        assert_eq!(parsed.players.len(), 5);
        assert_eq!(parsed.draw_in, manifest.draw_in);
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = PageManifest::load(Path::new("/nonexistent/page.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read page manifest"));
    }
}
