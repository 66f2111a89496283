//! Rating aggregation.
//!
//! A single pass over rating rows accumulates per-group sums for each
//! attribute; means are taken once all rows have been seen. Groups are keyed
//! either by tea or by provider, and only groups that received at least one
//! rating appear in the output.

use std::collections::BTreeMap;

use super::{Attribute, RatingWithTea, TeaId};

/// How ratings are grouped before averaging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryGrouping {
    #[default]
    Tea,
    Provider,
}

/// Identity of one summary group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SummaryKey {
    Tea(TeaId),
    Provider(String),
}

/// Unweighted mean of each attribute, rounded to two decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttributeAverages {
    pub umami: f64,
    pub astringency: f64,
    pub floral: f64,
    pub vegetal: f64,
    pub nutty: f64,
    pub roasted: f64,
    pub body: f64,
    pub rating: f64,
}

impl AttributeAverages {
    fn set(&mut self, attribute: Attribute, value: f64) {
        let slot = match attribute {
            Attribute::Umami => &mut self.umami,
            Attribute::Astringency => &mut self.astringency,
            Attribute::Floral => &mut self.floral,
            Attribute::Vegetal => &mut self.vegetal,
            Attribute::Nutty => &mut self.nutty,
            Attribute::Roasted => &mut self.roasted,
            Attribute::Body => &mut self.body,
            Attribute::Rating => &mut self.rating,
        };
        *slot = value;
    }
}

/// Aggregate for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSummary {
    pub key: SummaryKey,
    /// Tea name or provider, depending on the grouping.
    pub label: String,
    pub ratings_count: u64,
    pub averages: AttributeAverages,
}

#[derive(Debug, Default)]
struct Accumulator {
    label: String,
    count: u64,
    sums: BTreeMap<Attribute, f64>,
}

impl Accumulator {
    fn add(&mut self, entry: &RatingWithTea) {
        self.count += 1;
        for attribute in Attribute::ALL {
            *self.sums.entry(attribute).or_default() += entry.rating.profile.get(attribute);
        }
    }

    fn finish(self, key: SummaryKey) -> RatingSummary {
        let mut averages = AttributeAverages::default();
        #[expect(clippy::cast_precision_loss, reason = "rating counts stay far below 2^52")]
        let count = self.count as f64;
        for (attribute, sum) in self.sums {
            averages.set(attribute, round_to_hundredths(sum / count));
        }
        RatingSummary {
            key,
            label: self.label,
            ratings_count: self.count,
            averages,
        }
    }
}

/// Round half away from zero to two decimal places.
fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn key_for(entry: &RatingWithTea, grouping: SummaryGrouping) -> (SummaryKey, &str) {
    match grouping {
        SummaryGrouping::Tea => (SummaryKey::Tea(entry.rating.tea_id), &entry.tea_name),
        SummaryGrouping::Provider => (
            SummaryKey::Provider(entry.provider.clone()),
            &entry.provider,
        ),
    }
}

/// Average every attribute per group.
///
/// Output is ordered by group key: ascending tea id, or provider name.
///
/// # Examples
/// ```
/// use teahouse::domain::{summarise, SummaryGrouping};
///
/// assert!(summarise(&[], SummaryGrouping::Tea).is_empty());
/// ```
#[must_use]
pub fn summarise(entries: &[RatingWithTea], grouping: SummaryGrouping) -> Vec<RatingSummary> {
    let mut groups: BTreeMap<SummaryKey, Accumulator> = BTreeMap::new();
    for entry in entries {
        let (key, label) = key_for(entry, grouping);
        let accumulator = groups.entry(key).or_insert_with(|| Accumulator {
            label: label.to_owned(),
            ..Accumulator::default()
        });
        accumulator.add(entry);
    }
    groups
        .into_iter()
        .map(|(key, accumulator)| accumulator.finish(key))
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{FlavourProfile, RatingId, ScoreError, TeaRating, UserId};
    use rstest::rstest;

    fn entry(id: i64, tea: i64, provider: &str, umami: f64, overall: f64) -> RatingWithTea {
        let profile = FlavourProfile::try_build(|attribute| {
            Ok::<_, ScoreError>(match attribute {
                Attribute::Umami => umami,
                Attribute::Rating => overall,
                _ => 1.0,
            })
        })
        .expect("scores in range");
        RatingWithTea {
            rating: TeaRating {
                id: RatingId::new(id),
                user_id: UserId::new(1),
                tea_id: TeaId::new(tea),
                profile,
            },
            tea_name: format!("tea-{tea}"),
            provider: provider.to_owned(),
        }
    }

    #[rstest]
    fn averages_each_attribute_per_tea() {
        let entries = [entry(1, 7, "Itsi", 2.0, 4.0), entry(2, 7, "Itsi", 8.0, 6.0)];

        let summaries = summarise(&entries, SummaryGrouping::Tea);

        let [summary] = summaries.as_slice() else {
            panic!("expected one summary, got {summaries:?}");
        };
        assert_eq!(summary.key, SummaryKey::Tea(TeaId::new(7)));
        assert_eq!(summary.label, "tea-7");
        assert_eq!(summary.ratings_count, 2);
        assert_eq!(summary.averages.umami, 5.0);
        assert_eq!(summary.averages.rating, 5.0);
        assert_eq!(summary.averages.body, 1.0);
    }

    #[rstest]
    fn teas_without_ratings_are_absent() {
        let entries = [entry(1, 2, "Itsi", 3.0, 3.0)];
        let keys: Vec<_> = summarise(&entries, SummaryGrouping::Tea)
            .into_iter()
            .map(|summary| summary.key)
            .collect();
        assert_eq!(keys, vec![SummaryKey::Tea(TeaId::new(2))]);
    }

    #[rstest]
    fn means_round_to_two_decimal_places() {
        let entries = [
            entry(1, 1, "Itsi", 1.0, 1.0),
            entry(2, 1, "Itsi", 1.0, 1.0),
            entry(3, 1, "Itsi", 2.0, 1.0),
        ];
        let summaries = summarise(&entries, SummaryGrouping::Tea);
        assert_eq!(summaries.first().map(|s| s.averages.umami), Some(1.33));
    }

    #[rstest]
    fn provider_grouping_merges_teas_and_orders_by_name() {
        let entries = [
            entry(1, 1, "Tanzeela", 2.0, 2.0),
            entry(2, 3, "Clovis", 9.0, 9.0),
            entry(3, 2, "Tanzeela", 4.0, 6.0),
        ];

        let summaries = summarise(&entries, SummaryGrouping::Provider);

        let labels: Vec<_> = summaries.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Clovis", "Tanzeela"]);
        let tanzeela = summaries.get(1).expect("tanzeela summary");
        assert_eq!(tanzeela.ratings_count, 2);
        assert_eq!(tanzeela.averages.umami, 3.0);
        assert_eq!(tanzeela.averages.rating, 4.0);
    }

    #[rstest]
    fn tea_grouping_orders_by_identifier() {
        let entries = [entry(1, 10, "A", 1.0, 1.0), entry(2, 2, "B", 1.0, 1.0)];
        let keys: Vec<_> = summarise(&entries, SummaryGrouping::Tea)
            .into_iter()
            .map(|summary| summary.key)
            .collect();
        assert_eq!(
            keys,
            vec![SummaryKey::Tea(TeaId::new(2)), SummaryKey::Tea(TeaId::new(10))]
        );
    }
}
