use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct InvalidCategory(pub String);

impl fmt::Display for InvalidCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for InvalidCategory {}

/// Business category a report is filed under. Wire spellings are fixed by the
/// remote sheet columns, including the space in "Agro TS".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Usahawan,
    Agromakanan,
    #[serde(rename = "Agro TS")]
    AgroTs,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::Usahawan, Self::Agromakanan, Self::AgroTs];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Usahawan => "Usahawan",
            Self::Agromakanan => "Agromakanan",
            Self::AgroTs => "Agro TS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = InvalidCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "usahawan" => Ok(Self::Usahawan),
            "agromakanan" => Ok(Self::Agromakanan),
            "agro ts" | "agro-ts" | "agrots" => Ok(Self::AgroTs),
            _ => Err(InvalidCategory(format!(
                "Unknown category '{s}', expected one of: Usahawan, Agromakanan, Agro TS"
            ))),
        }
    }
}
