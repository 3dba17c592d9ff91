use crate::infra::{parse_date, parse_period, InMemorySurveyStore};
use chrono::{Duration, NaiveDate};
use clap::Args;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use survey_insights::error::AppError;
use survey_insights::survey::export::write_table_csv;
use survey_insights::survey::report::views::{QuestionDetailView, SurveyReportView};
use survey_insights::survey::{
    local_today, AnswerImporter, AnswerRecord, FilterSpec, PeriodMode, Question, QuestionId,
    RatingOption, ResponseSubmission, Section, SectionId, SectionSelection, Sector, SectorId,
    SurveyDataset, SurveyReportService,
};

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// CSV of answers (sector_id, question, option, submitted_on, ...)
    #[arg(long)]
    pub(crate) data: PathBuf,
    /// Limit the report to one sector id
    #[arg(long)]
    pub(crate) sector: Option<String>,
    /// Limit the report to one section id ("all" for every section)
    #[arg(long)]
    pub(crate) section: Option<String>,
    /// all-time, last-week, last-month or custom
    #[arg(long, default_value = "all-time", value_parser = parse_period)]
    pub(crate) period: PeriodMode,
    /// Start of a custom period (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// End of a custom period (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) end: Option<NaiveDate>,
    /// Reference date for relative periods (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print a drill-down for one question
    #[arg(long)]
    pub(crate) question: Option<String>,
    /// Also write the question table as CSV
    #[arg(long)]
    pub(crate) csv_out: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for the sample data (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the response submission part of the demo
    #[arg(long)]
    pub(crate) skip_submission: bool,
}

pub(crate) async fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        data,
        sector,
        section,
        period,
        start,
        end,
        today,
        question,
        csv_out,
    } = args;

    let today = today.unwrap_or_else(local_today);
    let filter = FilterSpec::new(
        sector.map(SectorId),
        SectionSelection::from(section),
        period,
        start,
        end,
    )?;

    let dataset = AnswerImporter::from_path(&data)?;
    let service = SurveyReportService::new(Arc::new(InMemorySurveyStore::from_dataset(dataset)));
    let report = service.build_report(&filter, today).await?;

    let detail = question
        .as_deref()
        .and_then(|question| report.question_detail(question));
    render_report(&report.view(), detail.as_ref());

    if let Some(path) = csv_out {
        let file = File::create(&path)?;
        write_table_csv(&report.table(), file)?;
        println!("\nTable written to {}", path.display());
    }

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        skip_submission,
    } = args;
    let today = today.unwrap_or_else(local_today);

    let store = Arc::new(InMemorySurveyStore::from_dataset(sample_dataset(today)));
    let service = SurveyReportService::new(store.clone());

    println!("Survey insights demo ({} sample answers)", store.answer_count());
    let report = service
        .build_report(&FilterSpec::all_time(None), today)
        .await?;
    render_report(&report.view(), None);

    let filter = FilterSpec::all_time(Some(SectorId("front-desk".to_string())))
        .with_period(PeriodMode::LastMonth)?;
    let report = service.build_report(&filter, today).await?;
    let detail = report.question_detail("Waiting time");
    println!();
    render_report(&report.view(), detail.as_ref());

    if skip_submission {
        return Ok(());
    }

    println!("\nSubmitting one more response");
    let submission = ResponseSubmission {
        sector_id: SectorId("front-desk".to_string()),
        section_id: Some(SectionId("reception".to_string())),
        ratings: BTreeMap::from([
            (QuestionId("front-desk-q1".to_string()), 5),
            (QuestionId("front-desk-q2".to_string()), 4),
            (QuestionId("front-desk-q3".to_string()), 2),
        ]),
    };
    match service.submit(submission, today).await {
        Ok(receipt) => println!(
            "- Recorded {} answers for {} on {}",
            receipt.recorded, receipt.sector_id, receipt.submitted_on
        ),
        Err(err) => println!("- Submission rejected: {err}"),
    }
    println!("- Store now holds {} answers", store.answer_count());

    Ok(())
}

pub(crate) fn render_report(view: &SurveyReportView, detail: Option<&QuestionDetailView>) {
    println!("Satisfaction report: {}", view.scope_label);
    println!("Period: {}", view.period_label);

    let summary = &view.summary;
    println!(
        "Overall satisfaction {:.1}% ({}) | ~{} respondents",
        summary.overall_satisfaction,
        summary.narrative_tier.label(),
        summary.estimated_respondents
    );

    if view.table.is_empty() {
        println!("\nNo responses match this filter.");
    } else {
        println!("\nQuestions");
        for row in &view.table {
            let shares: Vec<String> = row
                .options
                .iter()
                .map(|share| format!("{} {} ({}%)", share.label, share.count, share.share_pct))
                .collect();
            println!(
                "- {} {}: {:.1}% satisfied of {} | {}",
                row.code,
                row.question,
                row.satisfaction_pct,
                row.total,
                shares.join(", ")
            );
        }
    }

    if view.strong_points.is_empty() {
        println!("\nStrong points: none");
    } else {
        println!("\nStrong points");
        for item in &view.strong_points {
            println!(
                "- {}: {:.1}% positive ({} of {})",
                item.question, item.percent, item.matching_responses, item.total_responses
            );
        }
    }

    if view.improvement_points.is_empty() {
        println!("\nImprovement points: none");
    } else {
        println!("\nImprovement points");
        for item in &view.improvement_points {
            println!(
                "- {}: {:.1}% negative ({} of {})",
                item.question, item.percent, item.matching_responses, item.total_responses
            );
        }
    }

    let narrative = &view.narrative;
    println!("\nExecutive summary");
    println!("{}", narrative.overview);
    for finding in &narrative.key_findings {
        println!("  * {finding}");
    }
    for recommendation in &narrative.recommendations {
        println!("  > {recommendation}");
    }
    println!("{}", narrative.conclusion);

    if let Some(detail) = detail {
        println!("\nDetail: {}", detail.question);
        println!(
            "- {:.1}% satisfied, {:.1}% dissatisfied of {} ({})",
            detail.satisfaction_pct,
            detail.dissatisfaction_pct,
            detail.total,
            detail.tier.label()
        );
        if detail.critical_improvement {
            println!("- Flagged as a critical improvement area");
        }
        if detail.strength {
            println!("- Flagged as a strength");
        }
        println!("- {}", detail.assessment);
    }

    if !view.skipped_rows.is_empty() {
        println!("\nSkipped {} malformed tally rows:", view.skipped_rows.len());
        for rejection in &view.skipped_rows {
            println!("  - {rejection}");
        }
    }
}

/// Two sectors with a deliberate spread: courtesy scores high, waiting time low.
pub(crate) fn sample_dataset(today: NaiveDate) -> SurveyDataset {
    let front_desk = SectorId("front-desk".to_string());
    let lab = SectorId("laboratory".to_string());

    let sectors = vec![
        Sector {
            id: front_desk.clone(),
            name: "Front desk".to_string(),
        },
        Sector {
            id: lab.clone(),
            name: "Laboratory".to_string(),
        },
    ];
    let sections = vec![
        Section {
            id: SectionId("reception".to_string()),
            name: "Reception".to_string(),
            sector_id: front_desk.clone(),
        },
        Section {
            id: SectionId("billing".to_string()),
            name: "Billing".to_string(),
            sector_id: front_desk.clone(),
        },
        Section {
            id: SectionId("sampling".to_string()),
            name: "Sampling".to_string(),
            sector_id: lab.clone(),
        },
    ];

    let catalog = [
        (&front_desk, vec!["Courtesy", "Clarity of information", "Waiting time"]),
        (&lab, vec!["Courtesy", "Cleanliness"]),
    ];
    let questions: Vec<Question> = catalog
        .iter()
        .flat_map(|(sector, labels)| {
            labels.iter().enumerate().map(move |(index, label)| Question {
                id: QuestionId(format!("{}-q{}", sector.0, index + 1)),
                label: label.to_string(),
                sector_id: (*sector).clone(),
            })
        })
        .collect();

    let mut answers = Vec::new();
    for respondent in 0..40u32 {
        let submitted_on = today - Duration::days(i64::from(respondent % 60));
        let (sector, section) = if respondent % 4 == 3 {
            (&lab, "sampling")
        } else if respondent % 2 == 0 {
            (&front_desk, "reception")
        } else {
            (&front_desk, "billing")
        };

        for question in questions.iter().filter(|q| &q.sector_id == sector) {
            answers.push(AnswerRecord {
                sector_id: sector.clone(),
                section_id: Some(SectionId(section.to_string())),
                question: question.label.clone(),
                option: sample_rating(&question.label, respondent),
                submitted_on,
            });
        }
    }

    SurveyDataset {
        answers,
        sectors,
        sections,
        questions,
    }
}

fn sample_rating(question: &str, respondent: u32) -> RatingOption {
    let pattern: [RatingOption; 5] = match question {
        "Waiting time" => [
            RatingOption::VeryBad,
            RatingOption::Bad,
            RatingOption::Neutral,
            RatingOption::Bad,
            RatingOption::Good,
        ],
        "Clarity of information" => [
            RatingOption::Good,
            RatingOption::Neutral,
            RatingOption::VeryGood,
            RatingOption::Bad,
            RatingOption::Good,
        ],
        _ => [
            RatingOption::VeryGood,
            RatingOption::Good,
            RatingOption::VeryGood,
            RatingOption::Neutral,
            RatingOption::Good,
        ],
    };
    pattern[respondent as usize % pattern.len()]
}
