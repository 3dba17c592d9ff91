use super::super::aggregation::{AggregatedReport, AggregationOutcome, QuestionDistribution};
use super::super::domain::TallyRejection;
use super::super::filter::ResolvedPeriod;
use super::super::rating::RatingOption;
use super::insights::{
    compose_summary, generate_narrative, question_assessment, summary_from_parts,
};
use super::metrics::{
    improvement_points, negative_percent, option_share, overall_satisfaction, positive_percent,
    strong_points, DISSATISFACTION_THRESHOLD, SATISFACTION_THRESHOLD,
};
use super::views::{
    ChartDataset, ExecutiveNarrative, ExecutiveSummary, NarrativeTier, OptionShareView,
    QuestionDetailView, QuestionRow, ReportCharts, ReportScope, SurveyReportView,
};

/// Colours for series that are not tied to a rating option, cycled by index.
pub const SERIES_PALETTE: [&str; 8] = [
    "#3366CC", "#DC3912", "#FF9900", "#109618", "#990099", "#0099C6", "#DD4477", "#66AA00",
];

pub fn series_color(index: usize) -> &'static str {
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}

/// An aggregated report pinned to the period and scope it was fetched for.
#[derive(Debug, Clone)]
pub struct SurveyReport {
    pub period: ResolvedPeriod,
    pub scope: ReportScope,
    pub aggregated: AggregatedReport,
    pub skipped_rows: Vec<TallyRejection>,
}

impl SurveyReport {
    pub fn new(period: ResolvedPeriod, scope: ReportScope, outcome: AggregationOutcome) -> Self {
        Self {
            period,
            scope,
            aggregated: outcome.report,
            skipped_rows: outcome.rejected,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.aggregated.is_empty()
    }

    pub fn summary(&self) -> ExecutiveSummary {
        compose_summary(&self.aggregated)
    }

    pub fn narrative(&self) -> ExecutiveNarrative {
        generate_narrative(&self.summary(), &self.scope)
    }

    pub fn table(&self) -> Vec<QuestionRow> {
        self.aggregated
            .iter()
            .enumerate()
            .map(|(position, (question, distribution))| {
                let satisfaction_pct = positive_percent(distribution);
                QuestionRow {
                    code: format!("Q{}", position + 1),
                    question: question.to_string(),
                    options: option_shares(distribution),
                    total: distribution.total(),
                    satisfaction_pct,
                    tier: NarrativeTier::from_percent(satisfaction_pct),
                }
            })
            .collect()
    }

    pub fn question_detail(&self, question: &str) -> Option<QuestionDetailView> {
        let distribution = self.aggregated.get(question)?;
        let satisfaction_pct = positive_percent(distribution);
        let dissatisfaction_pct = negative_percent(distribution);
        let tier = NarrativeTier::from_percent(satisfaction_pct);

        Some(QuestionDetailView {
            question: question.to_string(),
            options: option_shares(distribution),
            total: distribution.total(),
            satisfaction_pct,
            dissatisfaction_pct,
            tier,
            critical_improvement: dissatisfaction_pct >= DISSATISFACTION_THRESHOLD,
            strength: satisfaction_pct >= SATISFACTION_THRESHOLD,
            assessment: question_assessment(tier),
        })
    }

    pub fn charts(&self) -> ReportCharts {
        let question_labels: Vec<String> =
            self.aggregated.questions().map(str::to_string).collect();

        let option_series = RatingOption::display_order()
            .into_iter()
            .map(|option| ChartDataset {
                label: option.label().to_string(),
                data: self
                    .aggregated
                    .iter()
                    .map(|(_, distribution)| distribution.count(option) as f64)
                    .collect(),
                colors: vec![option.color()],
            })
            .collect();

        let question_satisfaction = ChartDataset {
            label: "Satisfaction %".to_string(),
            data: self
                .aggregated
                .iter()
                .map(|(_, distribution)| positive_percent(distribution))
                .collect(),
            colors: (0..question_labels.len()).map(series_color).collect(),
        };

        let overall = overall_satisfaction(&self.aggregated);
        let satisfaction_split = ChartDataset {
            label: "Satisfied vs dissatisfied".to_string(),
            data: vec![overall, 100.0 - overall],
            colors: vec![
                RatingOption::VeryGood.color(),
                RatingOption::VeryBad.color(),
            ],
        };

        ReportCharts {
            question_labels,
            option_series,
            question_satisfaction,
            satisfaction_split,
        }
    }

    pub fn view(&self) -> SurveyReportView {
        let strong_points = strong_points(&self.aggregated);
        let improvement_points = improvement_points(&self.aggregated);
        let summary = summary_from_parts(&self.aggregated, &strong_points, &improvement_points);
        let narrative = generate_narrative(&summary, &self.scope);

        SurveyReportView {
            period: self.period,
            period_label: self.period.description(),
            scope: self.scope.clone(),
            scope_label: self.scope.description(),
            summary,
            narrative,
            table: self.table(),
            strong_points,
            improvement_points,
            charts: self.charts(),
            skipped_rows: self.skipped_rows.clone(),
        }
    }
}

fn option_shares(distribution: &QuestionDistribution) -> Vec<OptionShareView> {
    RatingOption::display_order()
        .into_iter()
        .map(|option| OptionShareView {
            option,
            label: option.label(),
            count: distribution.count(option),
            share_pct: option_share(distribution, option),
        })
        .collect()
}
