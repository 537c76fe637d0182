//! Fixed tables: the timeline eras, the focal countries, and the display
//! metadata of every entity shown on the map.

use serde::Serialize;

use crate::types::{Country, EntityMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Era {
    pub year: u16,
    pub name: &'static str,
}

pub const ERAS: [Era; 6] = [
    Era { year: 1900, name: "Russian Imperial Era" },
    Era { year: 1920, name: "Soviet Takeover" },
    Era { year: 1924, name: "National Delimitation" },
    Era { year: 1936, name: "Full SSR Status" },
    Era { year: 1991, name: "Independence" },
    Era { year: 2024, name: "Modern Era" },
];

pub const FOCAL_COUNTRIES: [(&str, &str); 5] = [
    ("kazakhstan", "KZ"),
    ("uzbekistan", "UZ"),
    ("turkmenistan", "TM"),
    ("kyrgyzstan", "KG"),
    ("tajikistan", "TJ"),
];

pub fn focal_countries() -> Vec<Country> {
    FOCAL_COUNTRIES
        .iter()
        .map(|(name, code)| Country::new(name, code))
        .collect()
}

pub fn era_years() -> Vec<u16> {
    ERAS.iter().map(|e| e.year).collect()
}

const fn meta(
    key: &'static str,
    name: &'static str,
    subtitle: &'static str,
    color: &'static str,
    center: [f64; 2],
) -> EntityMeta {
    EntityMeta { key, name, subtitle, color, center }
}

// Label anchors are shared between 1900 and 1920 since the geometries are.
const TURKESTAN_CENTER: [f64; 2] = [40.5, 66.0];
const BUKHARA_CENTER: [f64; 2] = [38.8, 67.0];
const KHIVA_CENTER: [f64; 2] = [42.0, 59.5];
const STEPPE_CENTER: [f64; 2] = [49.0, 62.0];

/// Turkestan, Bukhara, Khiva, Steppe.
pub const ENTITIES_1900: [EntityMeta; 4] = [
    meta("TURKESTAN", "Russian Turkestan", "Governor-Generalship, est. 1867", "#8B4513", TURKESTAN_CENTER),
    meta("BUKHARA", "Emirate of Bukhara", "Russian Protectorate since 1868", "#DAA520", BUKHARA_CENTER),
    meta("KHIVA", "Khanate of Khiva", "Russian Protectorate since 1873", "#4682B4", KHIVA_CENTER),
    meta("STEPPE", "Kazakh Steppe", "Russian Empire \u{2014} Steppe regions", "#CD853F", STEPPE_CENTER),
];

/// Same slots as [`ENTITIES_1900`].
pub const ENTITIES_1920: [EntityMeta; 4] = [
    meta("TURKESTAN_ASSR", "Turkestan ASSR", "Autonomous SSR within RSFSR, est. 1918", "#C0392B", TURKESTAN_CENTER),
    meta("BUKHARA_PSR", "Bukharan PSR", "People's Soviet Republic, est. 1920", "#E74C3C", BUKHARA_CENTER),
    meta("KHOREZM_PSR", "Khorezm PSR", "People's Soviet Republic, est. 1920", "#F39C12", KHIVA_CENTER),
    meta("KIRGHIZ_ASSR", "Kirghiz ASSR", "Later renamed Kazakh ASSR, est. 1920", "#E67E22", STEPPE_CENTER),
];

/// Uzbek SSR (with Tajik ASSR), Turkmen SSR, Kara-Kirghiz AO, Kazakh ASSR.
pub const ENTITIES_1924: [EntityMeta; 4] = [
    meta("UZ_SSR", "Uzbek SSR", "Est. Oct 27, 1924 \u{00b7} Includes Tajik ASSR", "#81B29A", [40.0, 67.0]),
    meta("TM_SSR", "Turkmen SSR", "Est. Oct 27, 1924", "#F2CC8F", [39.0, 59.5]),
    meta("KARA_KIRGHIZ", "Kara-Kirghiz AO", "Autonomous Oblast within RSFSR", "#3D85C6", [41.5, 74.5]),
    meta("KZ_ASSR", "Kazakh ASSR", "Autonomous SSR within RSFSR", "#E07A5F", [48.0, 67.0]),
];

/// An entity drawn with an unmodified modern border.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModernEraEntity {
    #[serde(skip)]
    pub key: &'static str,
    pub code: &'static str,
    pub color: &'static str,
    pub name: &'static str,
    pub subtitle: &'static str,
    pub center: [f64; 2],
}

const KZ_CENTER: [f64; 2] = [48.0, 67.0];
const UZ_CENTER: [f64; 2] = [41.3, 64.5];
const TM_CENTER: [f64; 2] = [39.0, 59.5];
const KG_CENTER: [f64; 2] = [41.5, 74.5];
const TJ_CENTER: [f64; 2] = [38.8, 70.8];

const fn modern(
    key: &'static str,
    code: &'static str,
    color: &'static str,
    name: &'static str,
    subtitle: &'static str,
    center: [f64; 2],
) -> ModernEraEntity {
    ModernEraEntity { key, code, color, name, subtitle, center }
}

pub const MODERN_ERA_ENTITIES: [(u16, [ModernEraEntity; 5]); 3] = [
    (1936, [
        modern("KZ_SSR", "KZ", "#E07A5F", "Kazakh SSR", "Union Republic since 1936", KZ_CENTER),
        modern("UZ_SSR", "UZ", "#81B29A", "Uzbek SSR", "Union Republic since 1924", UZ_CENTER),
        modern("TM_SSR", "TM", "#F2CC8F", "Turkmen SSR", "Union Republic since 1924", TM_CENTER),
        modern("KG_SSR", "KG", "#3D85C6", "Kirghiz SSR", "Union Republic since 1936", KG_CENTER),
        modern("TJ_SSR", "TJ", "#9B72CF", "Tajik SSR", "Union Republic since 1929", TJ_CENTER),
    ]),
    (1991, [
        modern("KZ", "KZ", "#E07A5F", "Republic of Kazakhstan", "Independence: Dec 16, 1991", KZ_CENTER),
        modern("UZ", "UZ", "#81B29A", "Republic of Uzbekistan", "Independence: Sep 1, 1991", UZ_CENTER),
        modern("TM", "TM", "#F2CC8F", "Republic of Turkmenistan", "Independence: Oct 27, 1991", TM_CENTER),
        modern("KG", "KG", "#3D85C6", "Republic of Kyrgyzstan", "Independence: Aug 31, 1991", KG_CENTER),
        modern("TJ", "TJ", "#9B72CF", "Republic of Tajikistan", "Independence: Sep 9, 1991", TJ_CENTER),
    ]),
    (2024, [
        modern("KZ", "KZ", "#E07A5F", "Kazakhstan", "", KZ_CENTER),
        modern("UZ", "UZ", "#81B29A", "Uzbekistan", "", UZ_CENTER),
        modern("TM", "TM", "#F2CC8F", "Turkmenistan", "", TM_CENTER),
        modern("KG", "KG", "#3D85C6", "Kyrgyzstan", "", KG_CENTER),
        modern("TJ", "TJ", "#9B72CF", "Tajikistan", "", TJ_CENTER),
    ]),
];
