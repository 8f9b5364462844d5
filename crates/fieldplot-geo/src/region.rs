//! Province to region lookup table.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use fieldplot_core::error::{FieldplotError, Result};
use fieldplot_core::ports::RegionResolver;

/// Maps province names to region names.
///
/// Keys are matched ignoring case and surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    regions: HashMap<String, String>,
}

impl RegionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, P, R>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: Into<String>,
    {
        let mut table = Self::new();
        for (province, region) in pairs {
            table.insert(province.as_ref(), region);
        }
        table
    }

    /// Parse a JSON object of `"province": "region"` entries
    pub fn from_json_str(content: &str) -> Result<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(content)
            .map_err(|e| FieldplotError::RegionTable { reason: e.to_string() })?;
        Ok(Self::from_pairs(entries))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn insert(&mut self, province: &str, region: impl Into<String>) {
        self.regions.insert(normalize(province), region.into());
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl RegionResolver for RegionTable {
    fn region_for(&self, province: &str) -> Option<String> {
        self.regions.get(&normalize(province)).cloned()
    }
}

fn normalize(province: &str) -> String {
    province.trim().to_lowercase()
}
