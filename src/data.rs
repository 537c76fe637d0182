use crate::geometry::{self, Shape};
use crate::types::Country;
use anyhow::{Context, Result, anyhow};
use geo::MultiPolygon;
use geojson::GeoJson;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn country_path(countries_dir: &Path, name: &str) -> PathBuf {
    countries_dir.join(format!("{}.json", name))
}

/// Loads every country in order. The first failure aborts.
pub fn load_countries(countries_dir: &Path, countries: &[Country]) -> Result<Vec<(Country, Shape)>> {
    countries
        .iter()
        .map(|country| {
            let shape = load_country(countries_dir, &country.name)?;
            info!(code = %country.code, polygons = shape.0.len(), "loaded");
            Ok((country.clone(), shape))
        })
        .collect()
}

/// Reads `<countries_dir>/<name>.json` and merges every polygonal part into one
/// repaired shape.
pub fn load_country(countries_dir: &Path, name: &str) -> Result<Shape> {
    let path = country_path(countries_dir, name);
    let file = File::open(&path)
        .with_context(|| format!("Failed to open country file: {:?}", path))?;
    let reader = BufReader::new(file);

    let geojson = GeoJson::from_reader(reader)
        .with_context(|| format!("Failed to parse GeoJSON: {:?}", path))?;

    let parts = polygon_parts(geojson)
        .with_context(|| format!("Invalid geometry in {:?}", path))?;
    if parts.is_empty() {
        return Err(anyhow!("No polygon geometry found in {:?}", path));
    }

    let repaired: Vec<Shape> = parts.iter().map(geometry::repair).collect();
    let merged = geometry::union_all(&repaired);
    if merged.0.is_empty() {
        return Err(anyhow!("Geometry in {:?} is empty after repair", path));
    }
    Ok(merged)
}

/// Flattens a document into its polygonal parts, one entry per feature.
fn polygon_parts(geojson: GeoJson) -> Result<Vec<Shape>> {
    let geometries: Vec<geojson::Geometry> = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features.into_iter().filter_map(|f| f.geometry).collect(),
        GeoJson::Feature(f) => f.geometry.into_iter().collect(),
        GeoJson::Geometry(g) => vec![g],
    };

    let mut parts = Vec::new();
    for geom in geometries {
        let geo_geom: geo::Geometry<f64> = geom.value.try_into()
            .map_err(|e| anyhow!("Failed to convert geojson geometry: {:?}", e))?;
        if let Some(shape) = as_shape(geo_geom) {
            parts.push(shape);
        }
    }
    Ok(parts)
}

fn as_shape(geom: geo::Geometry<f64>) -> Option<Shape> {
    match geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon::new(vec![p])),
        geo::Geometry::GeometryCollection(gc) => {
            let polygons: Vec<_> = gc.0.into_iter()
                .filter_map(as_shape)
                .flat_map(|mp| mp.0)
                .collect();
            (!polygons.is_empty()).then(|| MultiPolygon::new(polygons))
        }
        _ => {
            debug!("skipping non-polygon geometry");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Validation;
    use std::fs;

    fn scratch_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ca-map-data-{}-{}", label, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const TWO_FEATURES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,2],[0,0]]]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Polygon", "coordinates": [[[1,0],[3,0],[3,2],[1,2],[1,0]]]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "Point", "coordinates": [10, 10]}}
        ]
    }"#;

    #[test]
    fn merges_overlapping_features() {
        let dir = scratch_dir("merge");
        fs::write(dir.join("testland.json"), TWO_FEATURES).unwrap();
        let shape = load_country(&dir, "testland").unwrap();
        assert_eq!(shape.0.len(), 1);
        assert!(shape.is_valid());
        assert!((geometry::area(&shape) - 6.0).abs() < 1e-4);
    }

    #[test]
    fn accepts_single_feature_and_repairs_it() {
        let dir = scratch_dir("bowtie");
        let bowtie = r#"{"type": "Feature", "properties": {},
            "geometry": {"type": "Polygon", "coordinates": [[[0,0],[2,2],[2,0],[0,2],[0,0]]]}}"#;
        fs::write(dir.join("bowtie.json"), bowtie).unwrap();
        let shape = load_country(&dir, "bowtie").unwrap();
        assert!(shape.is_valid());
        assert!((geometry::area(&shape) - 2.0).abs() < 1e-4);
        // a repaired shape passes through repair unchanged
        let again = geometry::repair(&shape);
        assert!((geometry::area(&again) - geometry::area(&shape)).abs() < 1e-6);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = scratch_dir("missing");
        let err = load_country(&dir, "atlantis").unwrap_err();
        assert!(format!("{:#}", err).contains("atlantis.json"));
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let dir = scratch_dir("garbage");
        fs::write(dir.join("garbage.json"), "{ not json").unwrap();
        assert!(load_country(&dir, "garbage").is_err());
    }

    #[test]
    fn points_only_is_an_error() {
        let dir = scratch_dir("points");
        fs::write(
            dir.join("dots.json"),
            r#"{"type": "Point", "coordinates": [1, 2]}"#,
        )
        .unwrap();
        assert!(load_country(&dir, "dots").is_err());
    }

    #[test]
    fn load_countries_keeps_order() {
        let dir = scratch_dir("order");
        fs::write(dir.join("a.json"), TWO_FEATURES).unwrap();
        fs::write(dir.join("b.json"), TWO_FEATURES).unwrap();
        let loaded = load_countries(&dir, &[Country::new("b", "BB"), Country::new("a", "AA")]).unwrap();
        let codes: Vec<_> = loaded.iter().map(|(c, _)| c.code.as_str()).collect();
        assert_eq!(codes, ["BB", "AA"]);
    }
}
