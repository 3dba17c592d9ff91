use super::super::aggregation::AggregatedReport;
use super::metrics::{
    estimated_respondent_count, improvement_points, overall_satisfaction, strong_points,
    InsightItem,
};
use super::views::{ExecutiveNarrative, ExecutiveSummary, NarrativeTier, ReportScope};

pub(crate) fn compose_summary(report: &AggregatedReport) -> ExecutiveSummary {
    let strengths = strong_points(report);
    let improvements = improvement_points(report);
    summary_from_parts(report, &strengths, &improvements)
}

pub(crate) fn summary_from_parts(
    report: &AggregatedReport,
    strengths: &[InsightItem],
    improvements: &[InsightItem],
) -> ExecutiveSummary {
    let overall = overall_satisfaction(report);

    ExecutiveSummary {
        overall_satisfaction: overall,
        strong_point_count: strengths.len(),
        improvement_point_count: improvements.len(),
        top_improvement: improvements.first().map(|item| item.question.clone()),
        top_strength: strengths.first().map(|item| item.question.clone()),
        narrative_tier: NarrativeTier::from_percent(overall),
        estimated_respondents: estimated_respondent_count(report),
    }
}

pub(crate) fn generate_narrative(
    summary: &ExecutiveSummary,
    scope: &ReportScope,
) -> ExecutiveNarrative {
    let overview = format!(
        "Based on answers from about {} respondent{} in {}, overall satisfaction is {:.1}%.",
        summary.estimated_respondents,
        if summary.estimated_respondents == 1 { "" } else { "s" },
        scope.description(),
        summary.overall_satisfaction
    );

    let key_findings = vec![
        format!(
            "{} strong point{} identified.",
            summary.strong_point_count,
            if summary.strong_point_count == 1 { "" } else { "s" }
        ),
        format!(
            "{} priority improvement point{} identified.",
            summary.improvement_point_count,
            if summary.improvement_point_count == 1 { "" } else { "s" }
        ),
        match summary.narrative_tier {
            NarrativeTier::High => {
                "Overall satisfaction is high, reflecting a good perception of the service."
            }
            NarrativeTier::Medium => {
                "Overall satisfaction is moderate, with room for improvement."
            }
            NarrativeTier::Low => "Overall satisfaction is low and needs immediate attention.",
        }
        .to_string(),
    ];

    let mut recommendations = Vec::new();
    if let Some(question) = &summary.top_improvement {
        recommendations.push(format!("Prioritize improvements in: {question}"));
    }
    if let Some(question) = &summary.top_strength {
        recommendations.push(format!("Keep the good practices in: {question}"));
    }
    recommendations.push(
        match summary.narrative_tier {
            NarrativeTier::High => {
                "Continue the current strategies and look for opportunities to excel."
            }
            NarrativeTier::Medium => {
                "Implement targeted improvements on the points flagged as critical."
            }
            NarrativeTier::Low => {
                "Build a comprehensive action plan to raise overall satisfaction."
            }
        }
        .to_string(),
    );

    let conclusion = match summary.narrative_tier {
        NarrativeTier::High => {
            "Results show a good level of overall satisfaction. Keep current practices and focus on the few critical points identified."
        }
        NarrativeTier::Medium => {
            "Results show a moderate level of satisfaction. Specific areas need attention to improve the overall perception of the service."
        }
        NarrativeTier::Low => {
            "Results reveal a low level of satisfaction. Significant changes across several areas are needed to improve the perception of the service."
        }
    }
    .to_string();

    ExecutiveNarrative {
        overview,
        key_findings,
        recommendations,
        conclusion,
    }
}

pub(crate) const fn question_assessment(tier: NarrativeTier) -> &'static str {
    match tier {
        NarrativeTier::High => "High satisfaction on this aspect. It is a strength to preserve.",
        NarrativeTier::Medium => "Moderate satisfaction on this aspect. There is room to improve.",
        NarrativeTier::Low => "Low satisfaction on this aspect. It needs priority attention.",
    }
}
