//! Threshold-table classifier

use crate::classifier::SegmentClassifier;
use crate::segment::{Revision, SegmentId};

/// Static rule table over income and spending score
///
/// Rules are evaluated in order and the first match wins, so boundary values
/// such as income = 40 resolve to the earliest rule that includes them.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleClassifier;

impl RuleClassifier {
    pub fn new() -> Self {
        Self
    }
}

/// Pure rule chain, also used directly by tests and tooling
pub fn rule_segment(income: f64, spending_score: f64) -> SegmentId {
    let id = if (40.0..=80.0).contains(&income) && (40.0..=60.0).contains(&spending_score) {
        1
    } else if income > 80.0 && spending_score > 60.0 {
        2
    } else if income > 80.0 && spending_score <= 60.0 {
        3
    } else if income <= 40.0 && spending_score <= 40.0 {
        4
    } else if income <= 40.0 && spending_score > 60.0 {
        5
    } else {
        0
    };
    SegmentId(id)
}

impl SegmentClassifier for RuleClassifier {
    fn revision(&self) -> Revision {
        Revision::Rules
    }

    fn classify(&self, income: f64, spending_score: f64) -> SegmentId {
        rule_segment(income, spending_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_examples() {
        assert_eq!(rule_segment(60.0, 50.0), SegmentId(1));
        assert_eq!(rule_segment(100.0, 80.0), SegmentId(2));
        assert_eq!(rule_segment(100.0, 30.0), SegmentId(3));
        assert_eq!(rule_segment(20.0, 20.0), SegmentId(4));
        assert_eq!(rule_segment(20.0, 80.0), SegmentId(5));
        assert_eq!(rule_segment(90.0, 65.0), SegmentId(2));
    }

    #[test]
    fn test_boundaries_resolve_to_first_matching_rule() {
        // income = 40 and score = 40 satisfies rules 1 and 4; rule 1 wins
        assert_eq!(rule_segment(40.0, 40.0), SegmentId(1));
        assert_eq!(rule_segment(80.0, 60.0), SegmentId(1));
        // Just past rule 1's ranges
        assert_eq!(rule_segment(39.0, 40.0), SegmentId(4));
        assert_eq!(rule_segment(81.0, 60.0), SegmentId(3));
        assert_eq!(rule_segment(81.0, 61.0), SegmentId(2));
    }

    #[test]
    fn test_gaps_fall_back_to_zero() {
        // Average income with high or low spending matches nothing
        assert_eq!(rule_segment(60.0, 80.0), SegmentId(0));
        assert_eq!(rule_segment(60.0, 20.0), SegmentId(0));
        // Low income with mid spending
        assert_eq!(rule_segment(20.0, 50.0), SegmentId(0));
        // Out of slider range simply falls through the chain
        assert_eq!(rule_segment(-10.0, 500.0), SegmentId(5));
        assert_eq!(rule_segment(f64::NAN, 50.0), SegmentId(0));
    }

    #[test]
    fn test_every_input_lands_in_known_range() {
        let classifier = RuleClassifier::new();
        for income in (0..=150).step_by(5) {
            for score in (0..=100).step_by(5) {
                let id = classifier.classify(income as f64, score as f64);
                assert!(id.0 <= 5, "({}, {}) -> {}", income, score, id);
                assert!(classifier.action(id).is_some());
            }
        }
    }
}
