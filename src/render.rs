use crate::config::AppConfig;
use crate::eras::{self, ERAS, MODERN_ERA_ENTITIES, ModernEraEntity};
use crate::geodata::OrderedMap;
use anyhow::{Context, Result, anyhow, bail};
use std::fs;
use std::path::PathBuf;
use tracing::info;

const TEMPLATE: &str = include_str!("../assets/map_template.html");

const GEODATA_SLOT: &str = "__GEODATA__";
const ERAS_SLOT: &str = "__ERAS__";
const ERA_NAMES_SLOT: &str = "__ERA_NAMES__";
const ERA_ENTITIES_SLOT: &str = "__ERA_ENTITIES__";

/// Reads the geodata file, splices it into the viewer and writes the page.
pub fn generate_page(config: &AppConfig) -> Result<PathBuf> {
    let geodata_path = &config.output.geodata;
    info!(path = ?geodata_path, "Reading geodata...");
    let geodata = fs::read_to_string(geodata_path)
        .with_context(|| format!("Failed to read geodata file: {:?}", geodata_path))?;

    let html = render_page(&geodata)?;

    let out = &config.output.html;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }
    fs::write(out, &html).with_context(|| format!("Failed to write HTML: {:?}", out))?;

    info!(path = ?out, size_kb = %format!("{:.1}", html.len() as f64 / 1024.0), "HTML written");
    Ok(out.clone())
}

/// Fills the template. The geodata text goes in verbatim and last, so nothing
/// inside it is ever taken for a placeholder.
pub fn render_page(geodata: &str) -> Result<String> {
    check_geodata(geodata)?;

    let eras = serde_json::to_string(&eras::era_years())?;
    let names = OrderedMap(ERAS.iter().map(|e| (e.year.to_string(), e.name)).collect());
    let era_names = serde_json::to_string(&names)?;
    let era_entities = serde_json::to_string(&modern_era_entities())?;

    let mut html = TEMPLATE.to_string();
    for (slot, value) in [
        (ERAS_SLOT, eras.as_str()),
        (ERA_NAMES_SLOT, era_names.as_str()),
        (ERA_ENTITIES_SLOT, era_entities.as_str()),
        (GEODATA_SLOT, geodata),
    ] {
        html = fill(&html, slot, value)?;
    }
    Ok(html)
}

fn fill(html: &str, slot: &str, value: &str) -> Result<String> {
    match html.matches(slot).count() {
        1 => Ok(html.replacen(slot, value, 1)),
        n => Err(anyhow!("template must contain {} exactly once, found {}", slot, n)),
    }
}

fn modern_era_entities() -> OrderedMap<OrderedMap<ModernEraEntity>> {
    OrderedMap(
        MODERN_ERA_ENTITIES
            .iter()
            .map(|(year, entities)| {
                let by_key = entities.iter().map(|e| (e.key.to_string(), *e)).collect();
                (year.to_string(), OrderedMap(by_key))
            })
            .collect(),
    )
}

fn check_geodata(geodata: &str) -> Result<()> {
    let value: serde_json::Value = serde_json::from_str(geodata)
        .context("Geodata is not valid JSON")?;
    let Some(object) = value.as_object() else {
        bail!("Geodata must be a JSON object");
    };
    for key in ["modern", "neighbors", "historical"] {
        if !object.contains_key(key) {
            bail!("Geodata is missing the '{}' section", key);
        }
    }
    Ok(())
}
