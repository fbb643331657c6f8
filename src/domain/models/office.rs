use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Salon locations. Each office keeps its own closures and reservations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Office {
    Sofia,
    Lom,
}

impl Office {
    pub const ALL: [Office; 2] = [Office::Sofia, Office::Lom];

    /// Storage and URL key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Office::Sofia => "sofia",
            Office::Lom => "lom",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Office::Sofia => "София",
            Office::Lom => "Лом",
        }
    }
}

impl fmt::Display for Office {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOffice(pub String);

impl fmt::Display for UnknownOffice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown office '{}'", self.0)
    }
}

impl FromStr for Office {
    type Err = UnknownOffice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Office::ALL
            .into_iter()
            .find(|office| {
                office.as_str().eq_ignore_ascii_case(trimmed) || office.display_name() == trimmed
            })
            .ok_or_else(|| UnknownOffice(s.to_string()))
    }
}
