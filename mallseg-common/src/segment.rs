//! Segment identifiers, classifier revisions and marketing actions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Integer label of a customer segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub u8);

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for SegmentId {
    fn from(index: usize) -> Self {
        // Cluster counts are single digits, see Revision::clusters
        SegmentId(index as u8)
    }
}

/// Which segment computation the service runs with
///
/// Each revision fixes its cluster count, income weighting, remap step and
/// action table. Only the income weight may be overridden from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Revision {
    /// Hand-written threshold table
    #[default]
    Rules,
    /// Five clusters, scaled income weighted by 1.5
    Kmeans5,
    /// Six clusters with the low-spender remap of cluster 4
    Kmeans6,
}

impl Revision {
    pub const ALL: [Revision; 3] = [Revision::Rules, Revision::Kmeans5, Revision::Kmeans6];

    pub fn as_str(&self) -> &'static str {
        match self {
            Revision::Rules => "rules",
            Revision::Kmeans5 => "kmeans5",
            Revision::Kmeans6 => "kmeans6",
        }
    }

    /// Cluster count for clustering revisions, `None` for the rule table
    pub fn clusters(&self) -> Option<usize> {
        match self {
            Revision::Rules => None,
            Revision::Kmeans5 => Some(5),
            Revision::Kmeans6 => Some(6),
        }
    }

    /// Multiplier applied to the scaled income feature before clustering
    pub fn default_income_weight(&self) -> f64 {
        match self {
            Revision::Kmeans5 => 1.5,
            Revision::Rules | Revision::Kmeans6 => 1.0,
        }
    }

    pub fn remaps(&self) -> bool {
        matches!(self, Revision::Kmeans6)
    }

    /// Suggested marketing action for a segment
    ///
    /// The rule table is total and falls back to a generic message. The
    /// clustering tables only know their own cluster ids.
    pub fn action(&self, segment: SegmentId) -> Option<&'static str> {
        match self {
            Revision::Rules => Some(rule_action(segment)),
            Revision::Kmeans5 => KMEANS5_ACTIONS.get(segment.0 as usize).copied(),
            Revision::Kmeans6 => KMEANS6_ACTIONS.get(segment.0 as usize).copied(),
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Revision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Revision::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unknown revision '{}' (expected rules, kmeans5 or kmeans6)",
                    s
                ))
            })
    }
}

pub const FALLBACK_ACTION: &str =
    "Spending behavior doesn't fit predefined actions, needs further analysis.";

fn rule_action(segment: SegmentId) -> &'static str {
    match segment.0 {
        1 => "Average income, average spender. Cautious with spending. Suggest limited-time discounts.",
        2 => "High-income, high-spender. Suggest VIP offers or exclusive deals to increase spending.",
        3 => "Higher income, low spender. Target with improved store services or offers.",
        4 => "Low-income, low-spender. Suggest budget-friendly deals and value-for-money products.",
        5 => "Low-income, high-spender. Suggest customer loyalty programs.",
        _ => FALLBACK_ACTION,
    }
}

// Cluster ids are canonical (see classifier::fitted::ARCHETYPES): 0 low
// income/low spending, 1 low/high, 2 average, 3 high/low, 4 high/high, and
// any further cluster after those.
const KMEANS5_ACTIONS: [&str; 5] = [
    "Low-income, low-spender. Suggest budget-friendly deals and value-for-money products.",
    "Low-income, high-spender. Suggest customer loyalty programs.",
    "Average income, average spender. Suggest limited-time discounts.",
    "High-income, low-spender. Target with improved store services or offers.",
    "High-income, high-spender. Suggest VIP offers or exclusive deals.",
];

// Segment 4 only keeps spending scores of 60 and above; the rest of it is
// folded into 3. Segment 5 is the extra cluster and stays terse.
const KMEANS6_ACTIONS: [&str; 6] = [
    "Low-income, low-spender. Suggest budget-friendly deals.",
    "Low-income, high-spender. Suggest customer loyalty programs.",
    "Average income, average spender. Suggest limited-time discounts.",
    "High-income, spending score below 60. Suggest seasonal promotions and targeted offers.",
    "High-income, spending score 60 or above. Suggest VIP offers or exclusive deals.",
    "Investigate further.",
];
