use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One administrative region as returned by the reference API.
///
/// The API carries extra fields (e.g. `province_id`) which are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Region {
    pub id: String,
    pub name: String,
}

impl Region {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Nesting level of a region, ordered from the root down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RegionLevel {
    Province,
    City,
    District,
    Village,
}

impl RegionLevel {
    pub const ALL: [RegionLevel; 4] = [
        RegionLevel::Province,
        RegionLevel::City,
        RegionLevel::District,
        RegionLevel::Village,
    ];

    pub fn index(self) -> usize {
        match self {
            RegionLevel::Province => 0,
            RegionLevel::City => 1,
            RegionLevel::District => 2,
            RegionLevel::Village => 3,
        }
    }

    pub fn parent(self) -> Option<RegionLevel> {
        match self {
            RegionLevel::Province => None,
            RegionLevel::City => Some(RegionLevel::Province),
            RegionLevel::District => Some(RegionLevel::City),
            RegionLevel::Village => Some(RegionLevel::District),
        }
    }

    #[cfg(test)]
    pub fn child(self) -> Option<RegionLevel> {
        match self {
            RegionLevel::Province => Some(RegionLevel::City),
            RegionLevel::City => Some(RegionLevel::District),
            RegionLevel::District => Some(RegionLevel::Village),
            RegionLevel::Village => None,
        }
    }

    /// Every level strictly below this one, nearest first
    pub fn descendants(self) -> impl Iterator<Item = RegionLevel> {
        Self::ALL.into_iter().skip(self.index() + 1)
    }

    /// Indonesian label used on the form
    pub fn label(self) -> &'static str {
        match self {
            RegionLevel::Province => "Provinsi",
            RegionLevel::City => "Kota / Kabupaten",
            RegionLevel::District => "Kecamatan",
            RegionLevel::Village => "Kelurahan / Desa",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RegionLevel::Province => "province",
            RegionLevel::City => "city",
            RegionLevel::District => "district",
            RegionLevel::Village => "village",
        }
    }
}

impl std::fmt::Display for RegionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
