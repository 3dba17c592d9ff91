//! Groups tally rows into one normalized five-option distribution per question.

use super::domain::{RawTally, ResponseTally, TallyRejection};
use super::rating::{RatingOption, RatingPolarity};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

/// Response counts for a single question. Every option is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestionDistribution {
    counts: [u64; RatingOption::COUNT],
}

impl QuestionDistribution {
    pub fn from_counts(pairs: impl IntoIterator<Item = (RatingOption, u64)>) -> Self {
        let mut distribution = Self::default();
        for (option, count) in pairs {
            distribution.set(option, count);
        }
        distribution
    }

    pub fn count(&self, option: RatingOption) -> u64 {
        self.counts[option.index()]
    }

    /// Sum of every option, saturating at `u64::MAX`. Percentages use
    /// [`Self::exact_total`] instead.
    pub fn total(&self) -> u64 {
        saturate(self.exact_total())
    }

    /// Answers with positive polarity, saturating at `u64::MAX`.
    pub fn positive(&self) -> u64 {
        saturate(self.exact_positive())
    }

    /// Answers with negative polarity, saturating at `u64::MAX`.
    pub fn negative(&self) -> u64 {
        saturate(self.exact_negative())
    }

    pub(crate) fn exact_total(&self) -> u128 {
        self.sum_where(|_| true)
    }

    pub(crate) fn exact_positive(&self) -> u128 {
        self.sum_where(|polarity| polarity == RatingPolarity::Positive)
    }

    pub(crate) fn exact_negative(&self) -> u128 {
        self.sum_where(|polarity| polarity == RatingPolarity::Negative)
    }

    // Five u64 counts cannot overflow a u128.
    fn sum_where(&self, keep: impl Fn(RatingPolarity) -> bool) -> u128 {
        self.iter()
            .filter(|(option, _)| keep(option.polarity()))
            .map(|(_, count)| u128::from(count))
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RatingOption, u64)> + '_ {
        RatingOption::ordered()
            .into_iter()
            .map(move |option| (option, self.count(option)))
    }

    fn set(&mut self, option: RatingOption, count: u64) {
        self.counts[option.index()] = count;
    }
}

fn saturate(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

impl Serialize for QuestionDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(RatingOption::COUNT))?;
        for option in RatingOption::display_order() {
            map.serialize_entry(&option, &self.count(option))?;
        }
        map.end()
    }
}

/// Question label to distribution, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedReport {
    questions: Vec<(String, QuestionDistribution)>,
    index: HashMap<String, usize>,
}

impl AggregatedReport {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, question: &str) -> Option<&QuestionDistribution> {
        self.index
            .get(question)
            .map(|position| &self.questions[*position].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QuestionDistribution)> {
        self.questions
            .iter()
            .map(|(question, distribution)| (question.as_str(), distribution))
    }

    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|(question, _)| question.as_str())
    }

    fn record(&mut self, tally: ResponseTally) {
        let position = match self.index.get(&tally.question) {
            Some(position) => *position,
            None => {
                let position = self.questions.len();
                self.index.insert(tally.question.clone(), position);
                self.questions
                    .push((tally.question, QuestionDistribution::default()));
                position
            }
        };

        // Rows are unique per question and option; a repeat overwrites.
        self.questions[position].1.set(tally.option, tally.count);
    }
}

impl FromIterator<ResponseTally> for AggregatedReport {
    fn from_iter<I: IntoIterator<Item = ResponseTally>>(iter: I) -> Self {
        let mut report = Self::default();
        for tally in iter {
            report.record(tally);
        }
        report
    }
}

impl Serialize for AggregatedReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.questions.len()))?;
        for (question, distribution) in &self.questions {
            map.serialize_entry(question, distribution)?;
        }
        map.end()
    }
}

/// Result of aggregating store rows: the report plus every row that was dropped.
#[derive(Debug, Clone, Default)]
pub struct AggregationOutcome {
    pub report: AggregatedReport,
    pub rejected: Vec<TallyRejection>,
}

/// Builds an [`AggregatedReport`] from raw store rows.
///
/// Rows with an unrecognised option label or a negative count are skipped and
/// logged; one bad row never voids the rest of the report.
pub fn aggregate<I>(rows: I) -> AggregationOutcome
where
    I: IntoIterator<Item = RawTally>,
{
    let mut outcome = AggregationOutcome::default();

    for row in rows {
        match ResponseTally::try_from(row) {
            Ok(tally) => outcome.report.record(tally),
            Err(rejection) => {
                warn!(%rejection, "skipping malformed tally row");
                outcome.rejected.push(rejection);
            }
        }
    }

    outcome
}
