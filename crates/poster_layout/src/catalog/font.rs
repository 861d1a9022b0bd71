use rand::Rng;

const DEFAULT_FAMILIES: [&str; 5] = [
    "Arial, sans-serif",
    "Arial Black, sans-serif",
    "Arial Narrow, sans-serif",
    "Arial Rounded MT Bold, sans-serif",
    "Arial Unicode MS, sans-serif",
];

/// Family returned when the catalog is empty.
pub const FALLBACK_FAMILY: &str = "Arial, sans-serif";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontCatalog {
    families: Vec<String>,
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_FAMILIES.iter().map(|family| family.to_string()).collect())
    }
}

impl FontCatalog {
    pub fn new(families: Vec<String>) -> Self {
        Self { families }
    }

    /// Built-in list unless `families` names at least one entry.
    pub fn from_families(families: &[String]) -> Self {
        if families.is_empty() {
            Self::default()
        } else {
            Self::new(families.to_vec())
        }
    }

    pub fn families(&self) -> &[String] {
        &self.families
    }

    pub fn random_font<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        if self.families.is_empty() {
            return FALLBACK_FAMILY;
        }

        &self.families[rng.gen_range(0..self.families.len())]
    }
}
