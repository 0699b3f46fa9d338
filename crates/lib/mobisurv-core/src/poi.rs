use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use log::warn;

use crate::direction::Direction;

const DEFAULT_ALIASES: [(&str, &str); 26] = [
    ("Emek Shara industrial area", "Emek-Sara-Industrial-Area"),
    ("BGU", "Ben-Gurion-University"),
    ("Soroka Hospital", "Soroka-Medical-Center"),
    ("Yes Planet", "Yes-Planet"),
    ("Grand Kenyon", "Grand-Kenyon"),
    ("Omer industrial area", "Omer-Industrial-Area"),
    ("K collage", "Kaye-College"),
    ("HaNegev Mall", "HaNegev-Mall"),
    ("BIG", "BIG"),
    ("Assuta Hospital", "Assuta-Hospital"),
    ("Gev Yam", "Gav-Yam-High-Tech-Park"),
    ("Ramat Hovav Industry", "Ramat-Hovav-Industrial-Zone"),
    ("Sami Shimon collage", "SCE"),
    ("K", "Kaye-College"),
    ("Kaye", "Kaye-College"),
    ("Ben Gurion", "Ben-Gurion-University"),
    ("Ben_Gurion", "Ben-Gurion-University"),
    ("Emek Sara", "Emek-Sara-Industrial-Area"),
    ("Gav Yam", "Gav-Yam-High-Tech-Park"),
    ("Gev-Yam", "Gav-Yam-High-Tech-Park"),
    ("HaNegev", "HaNegev-Mall"),
    ("Soroka", "Soroka-Medical-Center"),
    ("Assuta", "Assuta-Hospital"),
    ("Omer", "Omer-Industrial-Area"),
    ("Ramat Hovav", "Ramat-Hovav-Industrial-Zone"),
    ("Sami Shimon", "SCE"),
];

/// Ordered alias table from raw survey labels to canonical, hyphen-separated POI names.
///
/// The order matters: case-insensitive lookups walk the table from the top and the first
/// alias or canonical name that matches wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoiNameTable {
    aliases: IndexMap<String, String>,
}

impl Default for PoiNameTable {
    fn default() -> Self {
        let aliases = DEFAULT_ALIASES
            .iter()
            .map(|(raw, canonical)| (raw.to_string(), canonical.to_string()))
            .collect();
        Self { aliases }
    }
}

impl PoiNameTable {
    pub fn empty() -> Self {
        Self {
            aliases: IndexMap::new(),
        }
    }

    /// Default table extended (or overridden) by the given aliases.
    pub fn with_aliases(extra: &IndexMap<String, String>) -> Self {
        let mut table = Self::default();
        for (raw, canonical) in extra {
            table.insert(raw, canonical);
        }
        table
    }

    pub fn insert(&mut self, raw: &str, canonical: &str) {
        self.aliases.insert(raw.to_string(), canonical.to_string());
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn canonical_names(&self) -> IndexSet<&str> {
        self.aliases.values().map(String::as_str).collect()
    }

    pub fn aliases_of(&self, canonical: &str) -> Vec<&str> {
        self.aliases
            .iter()
            .filter(|(_, value)| value.as_str() == canonical)
            .map(|(raw, _)| raw.as_str())
            .collect()
    }

    /// True when the label is an alias or a canonical name, ignoring case.
    pub fn is_known(&self, name: &str) -> bool {
        let name = name.trim();
        self.aliases.iter().any(|(raw, canonical)| {
            raw.eq_ignore_ascii_case(name) || canonical.eq_ignore_ascii_case(name)
        })
    }

    /// Maps a raw label to its canonical name. Unknown labels are hyphenated and reported.
    pub fn standardize(&self, name: &str) -> Option<String> {
        let clean_name = name.trim();
        if clean_name.is_empty() {
            return None;
        }

        for variant in name_variants(clean_name) {
            if let Some(canonical) = self.lookup(&variant) {
                return Some(canonical.to_string());
            }
        }

        warn!("No standard mapping found for POI name: {}", name);
        Some(hyphenate(clean_name))
    }

    /// Canonical name of a known label, without the fallback and the warning of `standardize`.
    /// Used when most labels are expected to be places other than POIs.
    pub fn canonical_of(&self, name: &str) -> Option<&str> {
        let clean_name = name.trim();
        if clean_name.is_empty() {
            return None;
        }
        name_variants(clean_name)
            .iter()
            .find_map(|variant| self.lookup(variant))
    }

    /// Names from `names` that are neither canonical names nor aliases. Each one is reported.
    pub fn invalid_names<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        let invalid: Vec<&str> = names
            .into_iter()
            .filter(|name| !self.is_known(name))
            .unique()
            .collect();
        for name in invalid.iter() {
            warn!("Invalid POI name: {}", name);
        }
        invalid
    }

    fn lookup(&self, variant: &str) -> Option<&str> {
        if let Some(canonical) = self.aliases.get(variant) {
            return Some(canonical);
        }
        let variant = variant.to_lowercase();
        self.aliases
            .iter()
            .find(|(raw, canonical)| {
                raw.to_lowercase() == variant || canonical.to_lowercase() == variant
            })
            .map(|(_, canonical)| canonical.as_str())
    }

    /// Reads the POI and direction back from an output file name such as
    /// `Ben_Gurion_University_inbound_trips.csv`.
    pub fn extract_from_filename(&self, file_name: &str) -> Option<(String, Direction)> {
        let base_name = file_name.replace(".csv", "").replace("_trips", "");
        let parts: Vec<&str> = base_name.split('_').collect();
        if parts.len() < 2 {
            return None;
        }

        let direction = match parts.last() {
            Some(&"inbound") => Direction::Inbound,
            Some(&"outbound") => Direction::Outbound,
            _ => return None,
        };

        let raw_poi_name = parts[..parts.len() - 1].join(" ");
        let poi_name = self.standardize(&raw_poi_name)?;
        Some((poi_name, direction))
    }
}

fn name_variants(clean_name: &str) -> Vec<String> {
    vec![
        clean_name.to_string(),
        clean_name.replace(' ', "-"),
        clean_name.replace('_', "-"),
        clean_name
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
        clean_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string(),
    ]
}

fn hyphenate(name: &str) -> String {
    name.replace([' ', '_'], "-")
}

/// File stem used for per-POI outputs. Anything other than letters, digits and underscores
/// becomes an underscore, so the stem never leaves the output directory.
pub fn file_stem(poi_name: &str) -> String {
    poi_name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
