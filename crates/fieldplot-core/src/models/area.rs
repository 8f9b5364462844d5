use serde::{Deserialize, Serialize};

/// Administrative location of a closed area
///
/// Both fields are `None` when the area is not closed or its centroid lies
/// outside every boundary feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaLocation {
    pub province: Option<String>,
    pub region: Option<String>,
}

impl AreaLocation {
    pub fn new(province: Option<String>, region: Option<String>) -> Self {
        Self { province, region }
    }

    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_known(&self) -> bool {
        self.province.is_some()
    }
}
