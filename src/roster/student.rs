use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a class roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    name: String,
    #[serde(default = "default_weighting", deserialize_with = "deserialize_weighting")]
    weighting: u32,
}

fn default_weighting() -> u32 {
    1
}

/// Stored weightings of zero are read back as 1
fn deserialize_weighting<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(u32::deserialize(deserializer)?.max(1))
}

impl Student {
    /// Create a student; a weighting of zero is raised to 1
    pub fn new(name: impl Into<String>, weighting: u32) -> Self {
        Self {
            name: name.into(),
            weighting: weighting.max(1),
        }
    }

    /// Parse one roster line.
    ///
    /// A trailing run of digits is the weighting and is stripped from the
    /// display name, so `"Name7"` becomes `Name` with weighting 7. Lines
    /// without a suffix get weighting 1. Returns `None` for blank lines.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim_start_matches('\u{feff}').trim();
        if trimmed.is_empty() {
            return None;
        }

        let stem = trimmed.trim_end_matches(|c: char| c.is_ascii_digit());
        if stem.len() == trimmed.len() || stem.trim().is_empty() {
            // No suffix, or the whole line is a number
            return Some(Self::new(trimmed, 1));
        }

        let digits = &trimmed[stem.len()..];
        // Only overflow can fail here
        let weighting = digits.parse::<u32>().unwrap_or(u32::MAX);
        Some(Self::new(stem.trim_end(), weighting))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weighting(&self) -> u32 {
        self.weighting
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
