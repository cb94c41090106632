//! Phase tables of the standard page, one module per section.

pub mod charts;
pub mod credits;
pub mod hero;
pub mod how_it_works;
pub mod parallax;
pub mod sitemap;
pub mod storytelling;

use scrollreel_core::{DeviceClass, ElementId, Error, GeometryProvider, Rect, Result};

use crate::manifest::PageManifest;
use crate::section::SectionDefinition;

/// Sections of the standard page for a device class
pub fn standard_page(device: DeviceClass, manifest: &PageManifest) -> Vec<Box<dyn SectionDefinition>> {
    let mut sections: Vec<Box<dyn SectionDefinition>> = Vec::new();
    match device {
        DeviceClass::Desktop => {
            sections.push(Box::new(hero::Hero::new()));
            sections.push(Box::new(storytelling::Storytelling::desktop(manifest)));
            sections.push(Box::new(sitemap::Sitemap::new(device)));
            sections.push(Box::new(how_it_works::HowItWorks::new(device)));
            sections.push(Box::new(credits::Credits::new(device)));
        }
        DeviceClass::Tablet | DeviceClass::Phone => {
            sections.push(Box::new(parallax::CompositionParallax::new()));
            sections.push(Box::new(storytelling::Storytelling::mobile(manifest)));
            sections.push(Box::new(sitemap::Sitemap::new(device)));
            sections.push(Box::new(how_it_works::HowItWorks::new(device)));
            sections.push(Box::new(charts::Charts::new(manifest)));
            sections.push(Box::new(credits::Credits::new(device)));
        }
    }
    sections
}

/// Rect of an element required by a layout
pub(crate) fn measure(geometry: &dyn GeometryProvider, id: &str) -> Result<Rect> {
    geometry
        .rect(&ElementId::new(id))
        .ok_or_else(|| Error::MissingElement(id.to_string()))
}
