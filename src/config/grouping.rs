//! Semantic parameter groups ("address", "money", ...) keyed by name patterns.

use crate::errors::ConfigFault;
use glob::{MatchOptions, Pattern};
use std::collections::BTreeMap;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Built-in groups used when the config file has no `[grouping]` table.
pub const DEFAULT_GROUPS: &[(&str, &[&str])] = &[
    (
        "address",
        &[
            "street*", "address*", "city", "state", "province", "zip*", "postal*", "country",
        ],
    ),
    (
        "contact",
        &["email*", "phone*", "mobile*", "fax"],
    ),
    (
        "coordinate",
        &["x", "y", "z", "lat", "latitude", "lng", "lon", "longitude"],
    ),
    (
        "money",
        &["amount", "currency", "*price", "price*", "tax*", "discount*"],
    ),
    (
        "personal",
        &[
            "firstName", "lastName", "middleName", "dateOfBirth", "birth*", "ssn", "gender",
        ],
    ),
    ("range", &["start*", "end*", "min*", "max*"]),
    ("stock", &["quantity", "*stock", "stock*", "warehouse*"]),
];

#[derive(Debug, Clone)]
pub struct GroupingDictionary {
    groups: BTreeMap<String, Vec<Pattern>>,
}

impl GroupingDictionary {
    pub fn from_patterns(groups: &BTreeMap<String, Vec<String>>) -> Result<Self, ConfigFault> {
        let mut compiled = BTreeMap::new();

        for (group, patterns) in groups {
            let field = format!("grouping.{group}");
            if patterns.is_empty() {
                return Err(ConfigFault::invalid(field, "group has no patterns"));
            }

            let patterns = patterns
                .iter()
                .map(|raw| {
                    Pattern::new(raw).map_err(|e| {
                        ConfigFault::invalid(&field, format!("invalid pattern '{raw}': {e}"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            compiled.insert(group.clone(), patterns);
        }

        Ok(Self { groups: compiled })
    }

    /// The first group, in name order, with a pattern matching `param`.
    pub fn group_of(&self, param: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|(_, patterns)| {
                patterns
                    .iter()
                    .any(|pattern| pattern.matches_with(param, MATCH_OPTIONS))
            })
            .map(|(group, _)| group.as_str())
    }

    /// Partitions parameter names by group, dropping ungrouped names.
    pub fn classify<'a>(
        &self,
        params: impl IntoIterator<Item = &'a str>,
    ) -> BTreeMap<&str, Vec<&'a str>> {
        let mut groups: BTreeMap<&str, Vec<&'a str>> = BTreeMap::new();
        for param in params {
            if let Some(group) = self.group_of(param) {
                groups.entry(group).or_default().push(param);
            }
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for GroupingDictionary {
    fn default() -> Self {
        let groups = DEFAULT_GROUPS
            .iter()
            .map(|(group, patterns)| {
                let compiled = patterns
                    .iter()
                    .filter_map(|raw| Pattern::new(raw).ok())
                    .collect();
                (group.to_string(), compiled)
            })
            .collect();

        Self { groups }
    }
}

pub fn default_group_patterns() -> BTreeMap<String, Vec<String>> {
    DEFAULT_GROUPS
        .iter()
        .map(|(group, patterns)| {
            (
                group.to_string(),
                patterns.iter().map(|p| p.to_string()).collect(),
            )
        })
        .collect()
}
