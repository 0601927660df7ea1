//! Per-category reaction statistics.

use std::collections::BTreeSet;

use crate::domain::{ReactionRecord, ReactionSummary};

/// Mean and sample standard deviation of reactions for one `event_type`.
///
/// Records with an absent reaction are ignored. With no matching values both
/// statistics are `None`; with one value only the mean is defined.
pub fn summarize(records: &[ReactionRecord], category: &str) -> ReactionSummary {
    let values: Vec<f64> = records
        .iter()
        .filter(|r| r.event_type == category)
        .filter_map(|r| r.reaction)
        .collect();

    let count = values.len();
    let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
    let stddev = match mean {
        Some(m) if count >= 2 => {
            let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (count as f64 - 1.0);
            Some(variance.sqrt())
        }
        _ => None,
    };

    ReactionSummary {
        category: category.to_string(),
        count,
        mean,
        stddev,
    }
}

/// Summaries for every category present, sorted by category name.
pub fn summarize_all(records: &[ReactionRecord]) -> Vec<ReactionSummary> {
    let categories: BTreeSet<&str> = records.iter().map(|r| r.event_type.as_str()).collect();
    categories
        .into_iter()
        .map(|c| summarize(records, c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(id: &str, kind: &str, reaction: Option<f64>) -> ReactionRecord {
        ReactionRecord {
            event_id: id.to_string(),
            event_type: kind.to_string(),
            event_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            reaction,
        }
    }

    #[test]
    fn empty_category_is_undefined() {
        let records = vec![rec("1", "FOMC", Some(5.0))];
        let s = summarize(&records, "CPI");
        assert_eq!(s.count, 0);
        assert!(s.mean.is_none());
        assert!(s.stddev.is_none());
    }

    #[test]
    fn single_value_has_mean_only() {
        let records = vec![rec("1", "CPI", Some(-4.0))];
        let s = summarize(&records, "CPI");
        assert_eq!(s.count, 1);
        assert_eq!(s.mean, Some(-4.0));
        assert!(s.stddev.is_none());
    }

    #[test]
    fn sample_stddev_divides_by_n_minus_one() {
        let records = vec![
            rec("1", "CPI", Some(10.0)),
            rec("2", "CPI", Some(20.0)),
            rec("3", "CPI", Some(30.0)),
            rec("4", "NFP", Some(1000.0)),
            rec("5", "CPI", None),
        ];
        let s = summarize(&records, "CPI");
        assert_eq!(s.count, 3);
        assert!((s.mean.unwrap() - 20.0).abs() < 1e-12);
        assert!((s.stddev.unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn summarize_all_covers_each_category_once() {
        let records = vec![
            rec("1", "NFP", Some(3.0)),
            rec("2", "CPI", Some(1.0)),
            rec("3", "NFP", Some(5.0)),
        ];
        let all = summarize_all(&records);
        let names: Vec<_> = all.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["CPI", "NFP"]);
        assert_eq!(all[1].count, 2);
        assert_eq!(all[1].mean, Some(4.0));
    }
}
