use tracing::{debug, warn};

use crate::{
    config::OverlapPolicy,
    error::ParseError,
    timeline::types::{EffectItem, EffectSpec},
};

/// Turns raw effect items into validated specs sorted by start time
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectParser {
    overlaps: OverlapPolicy,
}

impl EffectParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overlap_policy(overlaps: OverlapPolicy) -> Self {
        Self { overlaps }
    }

    /// Parse, stably sort by `start`, then apply the overlap policy
    ///
    /// Only the times are validated here. Kind parameters are checked by the
    /// resolver once the whole list has parsed.
    pub fn parse(&self, items: &[EffectItem]) -> Result<Vec<EffectSpec>, ParseError> {
        let mut specs = items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_item(index, item))
            .collect::<Result<Vec<_>, _>>()?;

        // sort_by is stable, so equal starts keep input order
        specs.sort_by(|a, b| a.start.total_cmp(&b.start));

        match self.overlaps {
            OverlapPolicy::Reject => reject_overlaps(&specs)?,
            OverlapPolicy::Truncate => specs = truncate_overlaps(specs),
        }

        debug!("Parsed {} effect specs", specs.len());
        Ok(specs)
    }
}

fn parse_item(index: usize, item: &EffectItem) -> Result<EffectSpec, ParseError> {
    let mut tokens = item.tokens().into_iter();

    let (start, end, kind) = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(start), Some(end), Some(kind)) => (start, end, kind),
        _ => {
            return Err(ParseError::Malformed {
                index,
                reason: "expected START END KIND [PARAMS...]".to_string(),
            })
        }
    };

    let start = parse_time(index, "start", &start)?;
    let end = parse_time(index, "end", &end)?;

    if start < 0.0 {
        return Err(ParseError::InvalidTime {
            index,
            reason: format!("start {} is negative", start),
        });
    }

    if end <= start {
        return Err(ParseError::InvalidTime {
            index,
            reason: format!("end {} must be greater than start {}", end, start),
        });
    }

    Ok(EffectSpec {
        index,
        start,
        end,
        kind: kind.to_lowercase(),
        raw_params: tokens.collect(),
    })
}

fn parse_time(index: usize, field: &str, token: &str) -> Result<f64, ParseError> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseError::InvalidTime {
            index,
            reason: format!("{} '{}' is not a finite number", field, token),
        }),
    }
}

fn reject_overlaps(specs: &[EffectSpec]) -> Result<(), ParseError> {
    for pair in specs.windows(2) {
        if pair[1].start < pair[0].end {
            return Err(ParseError::Overlap {
                index: pair[1].index,
                previous: pair[0].index,
            });
        }
    }
    Ok(())
}

// Sorted input keeps every earlier spec ending at or before the last kept
// spec's start, so only the most recent spec can overlap the next one.
fn truncate_overlaps(specs: Vec<EffectSpec>) -> Vec<EffectSpec> {
    let mut kept: Vec<EffectSpec> = Vec::with_capacity(specs.len());

    for spec in specs {
        if let Some(last) = kept.last_mut() {
            if last.end > spec.start {
                debug!(
                    "Truncating effect {} ({}) from {} to {}",
                    last.index, last.kind, last.end, spec.start
                );
                last.end = spec.start;
                if last.end <= last.start {
                    warn!(
                        "Dropping effect {} ({}): fully replaced by effect {}",
                        last.index, last.kind, spec.index
                    );
                    kept.pop();
                }
            }
        }
        kept.push(spec);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(lines: &[&str]) -> Vec<EffectItem> {
        lines.iter().map(|l| EffectItem::from(*l)).collect()
    }

    #[test]
    fn test_non_numeric_start_is_rejected() {
        let input = vec![EffectItem::from(vec!["x", "2", "fade", "in", "1"])];
        let err = EffectParser::new().parse(&input).unwrap_err();
        assert_eq!(err.index(), 0);
        assert!(matches!(err, ParseError::InvalidTime { .. }));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let err = EffectParser::new().parse(&items(&["0 1 fade in 1", "5 5 sobel"])).unwrap_err();
        assert_eq!(err.index(), 1);
    }

    #[test]
    fn test_short_item_is_malformed() {
        let err = EffectParser::new().parse(&items(&["0 1"])).unwrap_err();
        assert!(matches!(err, ParseError::Malformed { index: 0, .. }));
    }

    #[test]
    fn test_non_finite_and_negative_times() {
        assert!(EffectParser::new().parse(&items(&["nan 1 sobel"])).is_err());
        assert!(EffectParser::new().parse(&items(&["0 inf sobel"])).is_err());
        assert!(EffectParser::new().parse(&items(&["-1 1 sobel"])).is_err());
    }

    #[test]
    fn test_sort_is_stable_and_kind_lowercased() {
        let parser = EffectParser::with_overlap_policy(OverlapPolicy::Truncate);
        let specs = parser
            .parse(&items(&["4 6 EQ 0 1 1 1", "0 2 Sobel", "0 1 boxblur"]))
            .unwrap();

        // "0 2 sobel" is clipped to zero length by "0 1 boxblur" and dropped
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].kind, "boxblur");
        assert_eq!(specs[1].kind, "eq");
        assert_eq!(specs[1].raw_params, vec!["0", "1", "1", "1"]);
    }

    #[test]
    fn test_equal_starts_keep_input_order() {
        // Truncation clips each earlier spec to nothing, so only the last of
        // the tied items survives if the sort kept their input order
        let parser = EffectParser::with_overlap_policy(OverlapPolicy::Truncate);
        let specs = parser
            .parse(&items(&["3 4 eq 0 1 1 1", "0 1 sobel", "0 1 gblur", "0 1 boxblur"]))
            .unwrap();

        let kept: Vec<(usize, &str)> = specs.iter().map(|s| (s.index, s.kind.as_str())).collect();
        assert_eq!(kept, vec![(3, "boxblur"), (0, "eq")]);
    }

    #[test]
    fn test_overlap_rejected_by_default() {
        let err = EffectParser::new()
            .parse(&items(&["0 5 sobel", "4 6 gblur"]))
            .unwrap_err();
        assert_eq!(err, ParseError::Overlap { index: 1, previous: 0 });
    }

    #[test]
    fn test_adjacent_windows_do_not_overlap() {
        let specs = EffectParser::new()
            .parse(&items(&["2 4 gblur", "0 2 sobel"]))
            .unwrap();
        assert_eq!(specs[0].index, 1);
        assert_eq!(specs[1].index, 0);
    }

    #[test]
    fn test_truncate_policy_later_start_wins() {
        let parser = EffectParser::with_overlap_policy(OverlapPolicy::Truncate);
        let specs = parser.parse(&items(&["0 5 sobel", "4 6 gblur"])).unwrap();
        assert_eq!(specs[0].end, 4.0);
        assert_eq!(specs[1].start, 4.0);
        assert_eq!(specs[1].end, 6.0);
    }
}
