use std::collections::HashSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{bail, Context, Result};

use crate::types::{ClipBox, Country};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub simplify: SimplifyConfig,
    pub clip: ClipBox,
    pub neighbors: Vec<NeighborConfig>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    /// Directory holding one `<country>.json` GeoJSON file per country
    pub countries_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub geodata: PathBuf,
    pub html: PathBuf,
}

/// Douglas-Peucker tolerances, in degrees.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimplifyConfig {
    pub focal: f64,
    pub neighbor: f64,
    pub large_neighbor: f64,
    /// 1900 and 1920 entities
    pub historical: f64,
    /// 1924 entities
    pub delimitation: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NeighborConfig {
    pub name: String,
    pub code: String,
    /// Large countries get the coarser tolerance.
    #[serde(default)]
    pub large: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            countries_dir: PathBuf::from("node_modules/world-geojson/countries"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            geodata: PathBuf::from("output/geodata.json"),
            html: PathBuf::from("output/central-asia-map.html"),
        }
    }
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            focal: 0.015,
            neighbor: 0.04,
            large_neighbor: 0.08,
            historical: 0.025,
            delimitation: 0.015,
        }
    }
}

impl Default for ClipBox {
    fn default() -> Self {
        ClipBox::new(44.0, 28.0, 92.0, 57.0)
    }
}

fn default_neighbors() -> Vec<NeighborConfig> {
    [
        ("russia", "RU", true),
        ("china", "CN", true),
        ("iran", "IR", false),
        ("afghanistan", "AF", false),
        ("pakistan", "PK", false),
        ("mongolia", "MN", false),
        ("azerbaijan", "AZ", false),
        ("georgia", "GE", false),
    ]
    .into_iter()
    .map(|(name, code, large)| NeighborConfig {
        name: name.to_string(),
        code: code.to_string(),
        large,
    })
    .collect()
}

impl NeighborConfig {
    pub fn country(&self) -> Country {
        Country::new(&self.name, &self.code)
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise falls back to the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!(path = ?path, "config file not found, using built-in defaults");
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Neighbour list, with the built-in list standing in when none is configured.
    pub fn neighbor_list(&self) -> Vec<NeighborConfig> {
        if self.neighbors.is_empty() {
            default_neighbors()
        } else {
            self.neighbors.clone()
        }
    }

    pub fn neighbor_tolerance(&self, neighbor: &NeighborConfig) -> f64 {
        if neighbor.large {
            self.simplify.large_neighbor
        } else {
            self.simplify.neighbor
        }
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.simplify;
        for (label, tol) in [
            ("focal", s.focal),
            ("neighbor", s.neighbor),
            ("large_neighbor", s.large_neighbor),
            ("historical", s.historical),
            ("delimitation", s.delimitation),
        ] {
            if !tol.is_finite() || tol < 0.0 {
                bail!("simplify.{} must be a finite, non-negative tolerance (got {})", label, tol);
            }
        }

        let c = &self.clip;
        let corners = [c.min_lon, c.min_lat, c.max_lon, c.max_lat];
        if corners.iter().any(|v| !v.is_finite()) || c.min_lon >= c.max_lon || c.min_lat >= c.max_lat {
            bail!("clip box is empty or inverted: {:?}", c);
        }

        let mut seen = HashSet::new();
        for n in &self.neighbor_list() {
            if !seen.insert(n.code.as_str()) {
                bail!("neighbour code '{}' is listed more than once", n.code);
            }
        }
        Ok(())
    }
}
