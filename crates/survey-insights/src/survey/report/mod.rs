mod insights;
pub mod metrics;
mod summary;
pub mod views;

pub use summary::{series_color, SurveyReport, SERIES_PALETTE};

use super::aggregation::AggregatedReport;
use insights::compose_summary;
use views::ExecutiveSummary;

/// Executive summary for a bare aggregated report.
pub fn executive_summary(report: &AggregatedReport) -> ExecutiveSummary {
    compose_summary(report)
}
