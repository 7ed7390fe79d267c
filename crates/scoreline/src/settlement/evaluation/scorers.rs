use std::collections::HashMap;

use super::super::domain::Side;
use super::{DataQualityFlag, ScorerSource};

/// Outcome of comparing predicted goalscorers with the actual ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScorerMatch {
    /// Multiset intersection of all predicted names against all actual names.
    pub correct_count: u32,
    /// Home lists and away lists are each multiset-equal.
    pub exact: bool,
}

pub(crate) fn match_scorers(
    predicted_home: &[String],
    predicted_away: &[String],
    actual_home: &[String],
    actual_away: &[String],
) -> ScorerMatch {
    let mut pool = tally(actual_home.iter().chain(actual_away));
    let mut correct_count = 0;
    for name in predicted_home.iter().chain(predicted_away) {
        if let Some(remaining) = pool.get_mut(name.as_str()) {
            if *remaining > 0 {
                *remaining -= 1;
                correct_count += 1;
            }
        }
    }

    let exact = tally(predicted_home.iter()) == tally(actual_home.iter())
        && tally(predicted_away.iter()) == tally(actual_away.iter());

    ScorerMatch {
        correct_count,
        exact,
    }
}

fn tally<'a>(names: impl Iterator<Item = &'a String>) -> HashMap<&'a str, u32> {
    let mut counts = HashMap::new();
    for name in names {
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Drops scorers listed beyond the declared score, recording a flag when it does.
pub(crate) fn declared_scorers<'a>(
    source: ScorerSource,
    side: Side,
    declared: u16,
    scorers: &'a [String],
    flags: &mut Vec<DataQualityFlag>,
) -> &'a [String] {
    let limit = usize::from(declared);
    if scorers.len() <= limit {
        return scorers;
    }

    tracing::warn!(
        source = source.label(),
        side = side.label(),
        declared,
        listed = scorers.len(),
        "ignoring scorers beyond the declared score"
    );
    flags.push(DataQualityFlag::ScorersTruncated {
        source,
        side,
        declared,
        listed: scorers.len(),
    });
    &scorers[..limit]
}
