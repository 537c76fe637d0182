//! Approximate historical polities carved out of modern borders.
//!
//! The bounding boxes below are hand-picked calibration values, not derived
//! from any source map. Results are only checked for being non-degenerate;
//! the coverage figure is a diagnostic.

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use crate::eras::{ENTITIES_1900, ENTITIES_1920, ENTITIES_1924};
use crate::geometry::{self, bbox, difference, intersection, union_all, Shape};
use crate::types::{Country, EntityMeta, HistoricalEntity};

/// Below this many square degrees a derived region counts as a sliver.
pub const MIN_REGION_AREA: f64 = 0.01;

/// The five focal countries, repaired but not simplified.
#[derive(Debug, Clone)]
pub struct ModernBorders {
    pub kz: Shape,
    pub uz: Shape,
    pub tm: Shape,
    pub kg: Shape,
    pub tj: Shape,
}

impl ModernBorders {
    pub fn from_loaded(loaded: &[(Country, Shape)]) -> Result<Self> {
        let find = |code: &str| {
            loaded
                .iter()
                .find(|(c, _)| c.code == code)
                .map(|(_, s)| s.clone())
                .ok_or_else(|| anyhow!("focal country {} was not loaded", code))
        };
        Ok(Self {
            kz: find("KZ")?,
            uz: find("UZ")?,
            tm: find("TM")?,
            kg: find("KG")?,
            tj: find("TJ")?,
        })
    }

    pub fn union(&self) -> Shape {
        union_all([&self.kz, &self.uz, &self.tm, &self.kg, &self.tj])
    }
}

/// One era's entities in display order.
#[derive(Debug, Clone)]
pub struct HistoricalEra {
    pub year: u16,
    pub entities: Vec<HistoricalEntity>,
}

impl HistoricalEra {
    pub fn union(&self) -> Shape {
        union_all(self.entities.iter().map(|e| &e.geometry))
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.entities.iter().map(|e| e.meta.key).collect()
    }
}

#[derive(Debug, Clone)]
pub struct Synthesis {
    pub eras: Vec<HistoricalEra>,
    /// Share of the modern focal area covered by the 1900 entities, in percent
    pub coverage_1900: f64,
}

/// Tolerances applied to the derived regions before they are emitted.
#[derive(Debug, Clone, Copy)]
pub struct Tolerances {
    pub historical: f64,
    pub delimitation: f64,
}

/// Regions of the Russian imperial period. 1920 reuses them unchanged.
#[derive(Debug, Clone)]
pub struct ImperialRegions {
    pub turkestan: Shape,
    pub bukhara: Shape,
    pub khiva: Shape,
    pub steppe: Shape,
}

impl ImperialRegions {
    fn slots(&self) -> [&Shape; 4] {
        [&self.turkestan, &self.bukhara, &self.khiva, &self.steppe]
    }
}

// Sughd, the Khujand strip of northern Tajikistan that stayed Russian.
fn tj_north_box() -> Shape {
    bbox(68.0, 40.0, 72.0, 41.5)
}

/// Emirate of Bukhara: southern Uzbekistan plus Tajikistan south of the
/// Khujand strip, with one wider retry when the first cut is a sliver.
fn bukhara(m: &ModernBorders) -> Shape {
    let primary = union_all([
        &intersection(&m.uz, &bbox(63.0, 36.5, 70.0, 40.3)),
        &difference(&m.tj, &tj_north_box()),
    ]);
    if geometry::area(&primary) >= MIN_REGION_AREA {
        return primary;
    }

    warn!(area = geometry::area(&primary), "Bukhara emirate very small, retrying with wider boxes");
    let fallback = union_all([
        &intersection(&m.uz, &bbox(62.0, 36.0, 71.0, 40.5)),
        &difference(&m.tj, &bbox(68.0, 40.2, 72.0, 42.0)),
    ]);
    if geometry::area(&fallback) < MIN_REGION_AREA {
        warn!(area = geometry::area(&fallback), "Bukhara emirate still undersized, emitting as-is");
    }
    fallback
}

/// Khanate of Khiva: Karakalpakstan and Khorezm plus a strip of northern
/// Turkmenistan.
fn khiva(m: &ModernBorders) -> Shape {
    union_all([
        &intersection(&m.uz, &bbox(55.5, 40.0, 62.5, 44.5)),
        &intersection(&m.tm, &bbox(56.0, 40.0, 62.0, 42.5)),
    ])
}

fn semirechye(m: &ModernBorders) -> Shape {
    intersection(&m.kz, &bbox(67.0, 40.0, 81.0, 46.0))
}

pub fn imperial_regions(m: &ModernBorders) -> ImperialRegions {
    let bukhara = bukhara(m);
    let khiva = khiva(m);
    let semirechye = semirechye(m);

    let tj_north = intersection(&m.tj, &tj_north_box());
    let tm_rest = difference(&m.tm, &khiva);
    let uz_rest = difference(&difference(&m.uz, &bukhara), &khiva);
    let turkestan = union_all([&m.kg, &tm_rest, &uz_rest, &tj_north, &semirechye]);

    let steppe = difference(&m.kz, &semirechye);

    ImperialRegions { turkestan, bukhara, khiva, steppe }
}

fn era(year: u16, metas: &[EntityMeta; 4], shapes: [&Shape; 4], tolerance: f64) -> HistoricalEra {
    let entities = metas
        .iter()
        .zip(shapes)
        .map(|(meta, shape)| HistoricalEntity {
            meta: *meta,
            geometry: geometry::simplify(shape, tolerance),
        })
        .collect();
    HistoricalEra { year, entities }
}

/// Percentage of `reference` covered by `covered`.
pub fn coverage_percent(covered: &Shape, reference: &Shape) -> f64 {
    let total = geometry::area(reference);
    if total <= 0.0 {
        return 0.0;
    }
    geometry::area(covered) / total * 100.0
}

/// Derives the 1900, 1920 and 1924 eras from the modern borders.
pub fn synthesize(modern: &ModernBorders, tolerances: Tolerances) -> Synthesis {
    info!("1900: Russian Imperial Era");
    let imperial = imperial_regions(modern);
    for (meta, shape) in ENTITIES_1900.iter().zip(imperial.slots()) {
        info!(entity = meta.name, area = %format!("{:.2}", geometry::area(shape)), "derived region");
    }

    let coverage_1900 = coverage_percent(&union_all(imperial.slots()), &modern.union());
    info!(coverage = %format!("{:.1}%", coverage_1900), "1900 coverage of total Central Asia area");

    let era_1900 = era(1900, &ENTITIES_1900, imperial.slots(), tolerances.historical);

    info!("1920: Soviet Takeover");
    let era_1920 = era(1920, &ENTITIES_1920, imperial.slots(), tolerances.historical);

    info!("1924: National Delimitation");
    // The Tajik ASSR sat inside the Uzbek SSR until 1929.
    let uzbek_ssr = union_all([&modern.uz, &modern.tj]);
    let era_1924 = era(
        1924,
        &ENTITIES_1924,
        [&uzbek_ssr, &modern.tm, &modern.kg, &modern.kz],
        tolerances.delimitation,
    );

    Synthesis {
        eras: vec![era_1900, era_1920, era_1924],
        coverage_1900,
    }
}
