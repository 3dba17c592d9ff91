//! Pure satisfaction metrics over an [`AggregatedReport`]. Every function is
//! total: empty reports and zero-response questions produce zeros.

use super::super::aggregation::{AggregatedReport, QuestionDistribution};
use super::super::rating::RatingOption;
use serde::Serialize;

/// Positive share at or above which a question is a strong point.
pub const SATISFACTION_THRESHOLD: f64 = 70.0;
/// Negative share at or above which a question is an improvement point.
pub const DISSATISFACTION_THRESHOLD: f64 = 30.0;
/// Lower bound of the medium satisfaction band.
pub const MODERATE_SATISFACTION_FLOOR: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionMetric {
    pub question: String,
    pub positive_pct: f64,
    pub negative_pct: f64,
    pub total_responses: u64,
}

/// A question that crossed the strong-point or improvement-point threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightItem {
    pub question: String,
    pub percent: f64,
    pub matching_responses: u64,
    pub total_responses: u64,
}

pub fn total_for(distribution: &QuestionDistribution) -> u64 {
    distribution.total()
}

fn percent_of(part: u128, total: u128) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 * 100.0) / total as f64
}

pub fn positive_percent(distribution: &QuestionDistribution) -> f64 {
    percent_of(distribution.exact_positive(), distribution.exact_total())
}

pub fn negative_percent(distribution: &QuestionDistribution) -> f64 {
    percent_of(distribution.exact_negative(), distribution.exact_total())
}

/// Share of one option rounded to a whole percent, as the tables display it.
pub fn option_share(distribution: &QuestionDistribution, option: RatingOption) -> u32 {
    percent_of(u128::from(distribution.count(option)), distribution.exact_total()).round() as u32
}

/// Response-weighted satisfaction across every question: questions with more
/// answers carry proportionally more weight.
pub fn overall_satisfaction(report: &AggregatedReport) -> f64 {
    let (positive, total) = report
        .iter()
        .fold((0u128, 0u128), |(positive, total), (_, distribution)| {
            (
                positive.saturating_add(distribution.exact_positive()),
                total.saturating_add(distribution.exact_total()),
            )
        });
    percent_of(positive, total)
}

pub fn satisfaction_metrics(report: &AggregatedReport) -> Vec<SatisfactionMetric> {
    report
        .iter()
        .map(|(question, distribution)| SatisfactionMetric {
            question: question.to_string(),
            positive_pct: positive_percent(distribution),
            negative_pct: negative_percent(distribution),
            total_responses: distribution.total(),
        })
        .collect()
}

fn ranked<F, C>(report: &AggregatedReport, threshold: f64, percent: F, matching: C) -> Vec<InsightItem>
where
    F: Fn(&QuestionDistribution) -> f64,
    C: Fn(&QuestionDistribution) -> u64,
{
    let mut items: Vec<InsightItem> = report
        .iter()
        .filter_map(|(question, distribution)| {
            let pct = percent(distribution);
            (pct >= threshold).then(|| InsightItem {
                question: question.to_string(),
                percent: pct,
                matching_responses: matching(distribution),
                total_responses: distribution.total(),
            })
        })
        .collect();

    // `sort_by` is stable, so equal percentages keep report order.
    items.sort_by(|a, b| b.percent.total_cmp(&a.percent));
    items
}

/// Questions at or above [`SATISFACTION_THRESHOLD`], best first.
pub fn strong_points(report: &AggregatedReport) -> Vec<InsightItem> {
    ranked(
        report,
        SATISFACTION_THRESHOLD,
        positive_percent,
        QuestionDistribution::positive,
    )
}

/// Questions at or above [`DISSATISFACTION_THRESHOLD`], worst first.
pub fn improvement_points(report: &AggregatedReport) -> Vec<InsightItem> {
    ranked(
        report,
        DISSATISFACTION_THRESHOLD,
        negative_percent,
        QuestionDistribution::negative,
    )
}

/// Approximate number of respondents: all answers divided by question count.
///
/// This assumes every respondent answered every question. When respondents
/// skip questions unevenly the figure over- or under-counts; it is an
/// estimate, not a headcount.
pub fn estimated_respondent_count(report: &AggregatedReport) -> u64 {
    if report.is_empty() {
        return 0;
    }
    let answers = report
        .iter()
        .fold(0u128, |sum, (_, distribution)| {
            sum.saturating_add(distribution.exact_total())
        });
    // Float-to-int `as` saturates.
    (answers as f64 / report.len() as f64).round() as u64
}
