//! Station name canonicalization.
//!
//! Schedule sources spell some stations more than one way. Every station
//! name is trimmed and passed through a many-to-one alias table once per
//! load; names the table does not know pass through unchanged.

use std::collections::HashMap;

use crate::identifiers::StationIdentifier;

/// Aliases known to appear in published timetables
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[("電鉄ターミナルビル前", "デンテツターミナルビル前")];

#[derive(Clone, Debug)]
pub struct StationNormalizer {
    aliases: HashMap<String, StationIdentifier>,
}

impl StationNormalizer {
    pub fn new<I, A, C>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: AsRef<str>,
        C: AsRef<str>,
    {
        Self {
            aliases: aliases
                .into_iter()
                .map(|(alias, canonical)| {
                    (
                        alias.as_ref().trim().to_owned(),
                        StationIdentifier::new(canonical.as_ref().trim()),
                    )
                })
                .collect(),
        }
    }

    /// An empty alias table; only trims
    pub fn identity() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    pub fn normalize(&self, raw: Option<&str>) -> StationIdentifier {
        let trimmed = raw.map(str::trim).unwrap_or("");
        match self.aliases.get(trimmed) {
            Some(canonical) => canonical.clone(),
            None => StationIdentifier::new(trimmed),
        }
    }

    pub fn normalize_str(&self, raw: &str) -> StationIdentifier {
        self.normalize(Some(raw))
    }
}

impl Default for StationNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_ALIASES.iter().copied())
    }
}
