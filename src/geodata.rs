use anyhow::{Context, Result};
use serde::ser::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::data;
use crate::eras;
use crate::geometry::{self, Shape};
use crate::historical::{self, ModernBorders, Synthesis, Tolerances};
use crate::types::{Country, HistoricalEntity};

/// String-keyed map serialized in insertion order, so the legend in the
/// viewer lists entities the way they were declared.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct EntityRecord {
    pub geometry: geojson::Geometry,
    pub color: &'static str,
    pub name: &'static str,
    pub subtitle: &'static str,
    pub center: [f64; 2],
}

impl From<&HistoricalEntity> for EntityRecord {
    fn from(entity: &HistoricalEntity) -> Self {
        Self {
            geometry: to_geojson(&entity.geometry),
            color: entity.meta.color,
            name: entity.meta.name,
            subtitle: entity.meta.subtitle,
            center: entity.meta.center,
        }
    }
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct GeodataDocument {
    pub modern: OrderedMap<geojson::Geometry>,
    pub neighbors: OrderedMap<geojson::Geometry>,
    pub historical: OrderedMap<OrderedMap<EntityRecord>>,
}

/// Single polygons go out as `Polygon`, everything else as `MultiPolygon`.
pub fn to_geojson(shape: &Shape) -> geojson::Geometry {
    let value = match shape.0.as_slice() {
        [single] => geojson::Value::from(single),
        _ => geojson::Value::from(shape),
    };
    geojson::Geometry::new(value)
}

impl GeodataDocument {
    pub fn assemble(modern: &[(Country, Shape)], neighbors: &[(Country, Shape)], synthesis: &Synthesis) -> Self {
        let layer = |items: &[(Country, Shape)]| {
            OrderedMap(items.iter().map(|(c, s)| (c.code.clone(), to_geojson(s))).collect())
        };
        let historical = synthesis
            .eras
            .iter()
            .map(|era| {
                let entities = era
                    .entities
                    .iter()
                    .map(|e| (e.meta.key.to_string(), EntityRecord::from(e)))
                    .collect();
                (era.year.to_string(), OrderedMap(entities))
            })
            .collect();

        Self {
            modern: layer(modern),
            neighbors: layer(neighbors),
            historical: OrderedMap(historical),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize geodata document")
    }

    /// Writes the compact JSON and returns its size in bytes.
    pub fn write(&self, path: &Path) -> Result<usize> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
        }
        fs::write(path, &json)
            .with_context(|| format!("Failed to write geodata: {:?}", path))?;
        Ok(json.len())
    }
}

#[derive(Debug, Clone)]
pub struct GeodataReport {
    pub path: PathBuf,
    pub bytes: usize,
    pub modern: usize,
    pub neighbors: usize,
    pub eras: Vec<String>,
    pub coverage_1900: f64,
}

/// Loads, simplifies, clips and synthesizes, then writes the geodata file.
pub fn build_geodata(config: &AppConfig) -> Result<GeodataReport> {
    let dir = &config.input.countries_dir;

    info!("Loading modern borders...");
    let focal = data::load_countries(dir, &eras::focal_countries())?;
    let modern: Vec<(Country, Shape)> = focal
        .iter()
        .map(|(c, s)| (c.clone(), geometry::simplify(s, config.simplify.focal)))
        .collect();
    info!(count = modern.len(), tolerance = config.simplify.focal, "modern borders simplified");

    info!("Loading and processing neighbors...");
    let mut neighbors = Vec::new();
    for neighbor in config.neighbor_list() {
        let country = neighbor.country();
        let shape = data::load_country(dir, &country.name)?;
        let tolerance = config.neighbor_tolerance(&neighbor);
        if let Some(clipped) = geometry::simplify_and_clip(&country.name, &shape, tolerance, Some(&config.clip)) {
            info!(code = %country.code, tolerance, "neighbor done");
            neighbors.push((country, clipped));
        }
    }

    info!("Generating historical polygons...");
    let borders = ModernBorders::from_loaded(&focal)?;
    let synthesis = historical::synthesize(
        &borders,
        Tolerances {
            historical: config.simplify.historical,
            delimitation: config.simplify.delimitation,
        },
    );

    let document = GeodataDocument::assemble(&modern, &neighbors, &synthesis);
    if document.neighbors.is_empty() {
        warn!("no neighbor borders left after clipping");
    }
    let bytes = document.write(&config.output.geodata)?;

    let report = GeodataReport {
        path: config.output.geodata.clone(),
        bytes,
        modern: document.modern.len(),
        neighbors: document.neighbors.len(),
        eras: document.historical.keys().map(str::to_string).collect(),
        coverage_1900: synthesis.coverage_1900,
    };
    info!(
        path = ?report.path,
        size_kb = %format!("{:.1}", bytes as f64 / 1024.0),
        modern = report.modern,
        neighbors = report.neighbors,
        eras = ?report.eras,
        "geodata saved"
    );
    for (year, entities) in &document.historical.0 {
        info!(era = %year, entities = ?entities.keys().collect::<Vec<_>>(), "historical period");
    }
    Ok(report)
}
