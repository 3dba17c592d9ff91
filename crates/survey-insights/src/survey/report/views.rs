use super::super::domain::{SectionId, SectorId, TallyRejection};
use super::super::filter::ResolvedPeriod;
use super::super::rating::RatingOption;
use super::metrics::{InsightItem, MODERATE_SATISFACTION_FLOOR, SATISFACTION_THRESHOLD};
use serde::Serialize;

/// Coarse satisfaction band used for the narrative and for colour-coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeTier {
    High,
    Medium,
    Low,
}

impl NarrativeTier {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= SATISFACTION_THRESHOLD {
            Self::High
        } else if percent >= MODERATE_SATISFACTION_FLOOR {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High satisfaction",
            Self::Medium => "Medium satisfaction",
            Self::Low => "Low satisfaction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub overall_satisfaction: f64,
    pub strong_point_count: usize,
    pub improvement_point_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_improvement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_strength: Option<String>,
    pub narrative_tier: NarrativeTier,
    pub estimated_respondents: u64,
}

/// Human-readable rendering of an [`ExecutiveSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutiveNarrative {
    pub overview: String,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub conclusion: String,
}

/// Which sector and section a report covers, with display names when known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportScope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_id: Option<SectorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
}

impl ReportScope {
    pub fn description(&self) -> String {
        let sector = self
            .sector_name
            .clone()
            .or_else(|| self.sector_id.as_ref().map(|id| id.0.clone()))
            .unwrap_or_else(|| "all sectors".to_string());

        let section = self
            .section_name
            .clone()
            .or_else(|| self.section_id.as_ref().map(|id| id.0.clone()));

        match section {
            Some(section) => format!("{sector} (section: {section})"),
            None => sector,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionShareView {
    pub option: RatingOption,
    pub label: &'static str,
    pub count: u64,
    pub share_pct: u32,
}

/// One line of the tabular view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionRow {
    pub code: String,
    pub question: String,
    pub options: Vec<OptionShareView>,
    pub total: u64,
    pub satisfaction_pct: f64,
    pub tier: NarrativeTier,
}

impl QuestionRow {
    pub fn count(&self, option: RatingOption) -> u64 {
        self.options
            .iter()
            .find(|share| share.option == option)
            .map(|share| share.count)
            .unwrap_or(0)
    }
}

/// Drill-down for a single question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionDetailView {
    pub question: String,
    pub options: Vec<OptionShareView>,
    pub total: u64,
    pub satisfaction_pct: f64,
    pub dissatisfaction_pct: f64,
    pub tier: NarrativeTier,
    pub critical_improvement: bool,
    pub strength: bool,
    pub assessment: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub colors: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCharts {
    pub question_labels: Vec<String>,
    /// One stacked-bar series per rating option, across every question.
    pub option_series: Vec<ChartDataset>,
    /// Positive share per question, one colour per bar.
    pub question_satisfaction: ChartDataset,
    /// Overall satisfied / dissatisfied split for the doughnut.
    pub satisfaction_split: ChartDataset,
}

/// Everything the dashboard needs to render a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyReportView {
    pub period: ResolvedPeriod,
    pub period_label: String,
    pub scope: ReportScope,
    pub scope_label: String,
    pub summary: ExecutiveSummary,
    pub narrative: ExecutiveNarrative,
    pub table: Vec<QuestionRow>,
    pub strong_points: Vec<InsightItem>,
    pub improvement_points: Vec<InsightItem>,
    pub charts: ReportCharts,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_rows: Vec<TallyRejection>,
}
