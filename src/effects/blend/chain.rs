//! The `key=value` override language for the transformed branch of a blend.
//!
//! Keys starting with a shift-family prefix (`rgbashift_rh=4`) are collected
//! into one filter per family (`rgbashift=rh=4:...`). Every other key becomes
//! its own filter, `key=value`, or bare `key` when the value repeats the key.

use std::fmt;

/// A prefix family whose keys are merged into one filter
#[derive(Debug, Clone, Copy)]
pub struct ShiftFamily {
    pub prefix: &'static str,
    pub filter: &'static str,
    pub axes: &'static [&'static str],
}

pub const SHIFT_FAMILIES: &[ShiftFamily] = &[
    ShiftFamily {
        prefix: "rgbashift_",
        filter: "rgbashift",
        axes: &["rh", "rv", "gh", "gv", "bh", "bv", "ah", "av"],
    },
    ShiftFamily {
        prefix: "chromashift_",
        filter: "chromashift",
        axes: &["cbh", "cbv", "crh", "crv"],
    },
];

/// An override the chain language cannot express
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOverride {
    pub key: String,
    pub value: String,
}

impl fmt::Display for InvalidOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftGroup {
    pub filter: &'static str,
    /// Axis offsets in first-seen order
    pub axes: Vec<(&'static str, i64)>,
}

impl ShiftGroup {
    fn set(&mut self, axis: &'static str, value: i64) {
        match self.axes.iter_mut().find(|(name, _)| *name == axis) {
            Some(slot) => slot.1 = value,
            None => self.axes.push((axis, value)),
        }
    }

    pub fn render(&self) -> String {
        let params: Vec<String> = self
            .axes
            .iter()
            .map(|(axis, value)| format!("{}={}", axis, value))
            .collect();
        format!("{}={}", self.filter, params.join(":"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainFilter {
    pub name: String,
    pub value: String,
}

impl ChainFilter {
    pub fn render(&self) -> String {
        if self.value.is_empty() || self.value == self.name {
            self.name.clone()
        } else {
            format!("{}={}", self.name, self.value)
        }
    }
}

/// Filters applied to the transformed branch, grouped shifts first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterChain {
    pub shifts: Vec<ShiftGroup>,
    pub filters: Vec<ChainFilter>,
}

impl FilterChain {
    /// Parse `(key, value)` overrides in input order
    ///
    /// A repeated key keeps its first position and takes the later value.
    pub fn parse(overrides: &[(String, String)]) -> Result<Self, InvalidOverride> {
        let mut groups: Vec<Option<ShiftGroup>> = vec![None; SHIFT_FAMILIES.len()];
        let mut filters: Vec<ChainFilter> = Vec::new();

        for (key, value) in overrides {
            let invalid = || InvalidOverride {
                key: key.clone(),
                value: value.clone(),
            };

            if key.is_empty() {
                return Err(invalid());
            }

            let family = SHIFT_FAMILIES
                .iter()
                .position(|family| key.starts_with(family.prefix));

            match family {
                Some(slot) => {
                    let family = &SHIFT_FAMILIES[slot];
                    let axis = family
                        .axes
                        .iter()
                        .find(|axis| **axis == &key[family.prefix.len()..])
                        .copied()
                        .ok_or_else(invalid)?;
                    let offset: i64 = value.parse().map_err(|_| invalid())?;

                    groups[slot]
                        .get_or_insert_with(|| ShiftGroup {
                            filter: family.filter,
                            axes: Vec::new(),
                        })
                        .set(axis, offset);
                }
                None => match filters.iter_mut().find(|filter| filter.name == *key) {
                    Some(filter) => filter.value = value.clone(),
                    None => filters.push(ChainFilter {
                        name: key.clone(),
                        value: value.clone(),
                    }),
                },
            }
        }

        Ok(Self {
            shifts: groups.into_iter().flatten().collect(),
            filters,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty() && self.filters.is_empty()
    }

    pub fn to_filters(&self) -> Vec<String> {
        self.shifts
            .iter()
            .map(ShiftGroup::render)
            .chain(self.filters.iter().map(ChainFilter::render))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_shift_keys_are_grouped_first() {
        let chain = FilterChain::parse(&overrides(&[
            ("boxblur", "20:1"),
            ("rgbashift_rh", "60"),
            ("hue", "s=0.5"),
            ("rgbashift_rv", "-60"),
            ("vignette", "vignette"),
        ]))
        .unwrap();

        assert_eq!(
            chain.to_filters(),
            vec!["rgbashift=rh=60:rv=-60", "boxblur=20:1", "hue=s=0.5", "vignette"]
        );
    }

    #[test]
    fn test_families_in_declaration_order() {
        let chain = FilterChain::parse(&overrides(&[
            ("chromashift_cbh", "4"),
            ("rgbashift_gh", "2"),
        ]))
        .unwrap();
        assert_eq!(chain.to_filters(), vec!["rgbashift=gh=2", "chromashift=cbh=4"]);
    }

    #[test]
    fn test_duplicates_overwrite_in_place() {
        let chain = FilterChain::parse(&overrides(&[
            ("rgbashift_rh", "1"),
            ("rgbashift_bv", "2"),
            ("rgbashift_rh", "3"),
            ("negate", ""),
            ("hflip", "hflip"),
            ("negate", "negate"),
        ]))
        .unwrap();
        assert_eq!(chain.to_filters(), vec!["rgbashift=rh=3:bv=2", "negate", "hflip"]);
    }

    #[test]
    fn test_invalid_overrides() {
        let unknown_axis = FilterChain::parse(&overrides(&[("rgbashift_zz", "1")]));
        assert_eq!(
            unknown_axis,
            Err(InvalidOverride { key: "rgbashift_zz".into(), value: "1".into() })
        );

        assert!(FilterChain::parse(&overrides(&[("chromashift_crv", "1.5")])).is_err());
        assert!(FilterChain::parse(&overrides(&[("", "5")])).is_err());
    }

    #[test]
    fn test_empty_chain() {
        let chain = FilterChain::parse(&[]).unwrap();
        assert!(chain.is_empty());
        assert!(chain.to_filters().is_empty());
    }
}
