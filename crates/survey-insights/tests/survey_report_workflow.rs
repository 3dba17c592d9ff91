use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use survey_insights::survey::export::table_csv;
use survey_insights::survey::report::views::NarrativeTier;
use survey_insights::survey::{
    AnswerImporter, DataFetchError, FilterSpec, PeriodMode, Question, RawTally, Section,
    SectionId, SectionSelection, Sector, SectorId, SurveyDataStore, SurveyDataset,
    SurveyReportService, TallyQuery,
};

const ANSWERS: &str = "sector_id,sector_name,section_id,section_name,question,option,submitted_on\n\
north,North Station,intake,Intake Desk,Courtesy,5,2024-02-20\n\
north,North Station,intake,Intake Desk,Wait time,1,2024-02-20\n\
north,North Station,intake,Intake Desk,Courtesy,4,2024-03-10\n\
north,North Station,intake,Intake Desk,Wait time,2,2024-03-10\n\
north,North Station,records,Records,Courtesy,Very good,2024-03-12\n\
north,North Station,records,Records,Wait time,Neutral,2024-03-12\n\
south,South Clinic,triage,Triage,Courtesy,Muy malo,2024-03-14\n";

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Tallies imported answers on demand, the way a SQL `GROUP BY` would.
struct DatasetStore {
    dataset: SurveyDataset,
}

#[async_trait]
impl SurveyDataStore for DatasetStore {
    async fn fetch_tallies(&self, query: &TallyQuery) -> Result<Vec<RawTally>, DataFetchError> {
        let mut counts: BTreeMap<(String, String), i64> = BTreeMap::new();
        for answer in &self.dataset.answers {
            let in_sector = query.sector_id.as_ref().map_or(true, |id| id == &answer.sector_id);
            let in_section = query
                .section_id
                .as_ref()
                .map_or(true, |id| Some(id) == answer.section_id.as_ref());
            let after_start = query.start_date.map_or(true, |start| answer.submitted_on >= start);
            let before_end = query.end_date.map_or(true, |end| answer.submitted_on <= end);
            if in_sector && in_section && after_start && before_end {
                *counts
                    .entry((answer.question.clone(), answer.option.label().to_string()))
                    .or_default() += 1;
            }
        }
        Ok(counts
            .into_iter()
            .map(|((question, option), count)| RawTally::new(question, option, count))
            .collect())
    }

    async fn list_sectors(&self) -> Result<Vec<Sector>, DataFetchError> {
        Ok(self.dataset.sectors.clone())
    }

    async fn list_sections(
        &self,
        _sector_id: Option<&SectorId>,
    ) -> Result<Vec<Section>, DataFetchError> {
        Ok(self.dataset.sections.clone())
    }

    async fn list_questions(&self, sector_id: &SectorId) -> Result<Vec<Question>, DataFetchError> {
        Ok(self
            .dataset
            .questions
            .iter()
            .filter(|question| &question.sector_id == sector_id)
            .cloned()
            .collect())
    }
}

fn service() -> SurveyReportService<DatasetStore> {
    let dataset = AnswerImporter::from_reader(ANSWERS.as_bytes()).expect("csv imports");
    SurveyReportService::new(Arc::new(DatasetStore { dataset }))
}

#[tokio::test]
async fn imported_answers_produce_an_all_time_report() {
    let report = service()
        .build_report(&FilterSpec::all_time(None), date(2024, 3, 31))
        .await
        .expect("report builds");
    let view = report.view();

    assert_eq!(view.scope_label, "all sectors");
    let courtesy = view
        .table
        .iter()
        .find(|row| row.question == "Courtesy")
        .expect("courtesy row");
    assert_eq!(courtesy.total, 4);
    assert_eq!(courtesy.satisfaction_pct, 75.0);
    assert!(view.skipped_rows.is_empty());
}

#[tokio::test]
async fn last_month_and_section_filters_narrow_the_report() {
    let filter = FilterSpec::all_time(Some(SectorId("north".to_string())))
        .with_section(SectionSelection::Section(SectionId("intake".to_string())))
        .with_period(PeriodMode::LastMonth)
        .expect("preset period");

    let report = service()
        .build_report(&filter, date(2024, 3, 31))
        .await
        .expect("report builds");
    let view = report.view();

    // 2024-03-31 rolls back to 2024-03-02, which excludes the February answers.
    assert_eq!(view.summary.estimated_respondents, 1);
    assert_eq!(view.summary.overall_satisfaction, 50.0);
    assert_eq!(view.summary.narrative_tier, NarrativeTier::Medium);
    assert_eq!(view.scope_label, "North Station (section: Intake Desk)");
    assert_eq!(view.improvement_points[0].question, "Wait time");
}

#[tokio::test]
async fn custom_range_with_no_answers_yields_an_empty_report() {
    let filter = FilterSpec::all_time(None)
        .with_custom_range(date(2023, 1, 1), date(2023, 1, 31))
        .expect("ordered range");

    let report = service()
        .build_report(&filter, date(2024, 3, 31))
        .await
        .expect("report builds");
    let view = report.view();

    assert!(report.is_empty());
    assert_eq!(view.summary.overall_satisfaction, 0.0);
    assert_eq!(view.summary.narrative_tier, NarrativeTier::Low);
    assert_eq!(view.period_label, "From 2023-01-01 to 2023-01-31");
    assert!(view.table.is_empty());
}

#[tokio::test]
async fn table_exports_to_csv() {
    let report = service()
        .build_report(
            &FilterSpec::all_time(Some(SectorId("south".to_string()))),
            date(2024, 3, 31),
        )
        .await
        .expect("report builds");

    let csv = table_csv(&report.table()).expect("csv renders");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "Q1,Courtesy,0,0,0,0,1,1,0.0");
}
