//! Turns a sector/section/period selection into concrete data-store parameters.

use super::domain::{SectionId, SectorId};
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Period presets offered by the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodMode {
    #[default]
    AllTime,
    LastWeek,
    LastMonth,
    Custom,
}

impl PeriodMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AllTime => "All time",
            Self::LastWeek => "Last week",
            Self::LastMonth => "Last month",
            Self::Custom => "Custom range",
        }
    }
}

/// Either every section of the sector or a single one.
///
/// On the wire this is a plain string: `"all"` (or absent) for every section,
/// otherwise the section id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum SectionSelection {
    #[default]
    All,
    Section(SectionId),
}

impl SectionSelection {
    pub fn section_id(&self) -> Option<&SectionId> {
        match self {
            Self::All => None,
            Self::Section(id) => Some(id),
        }
    }
}

impl From<Option<String>> for SectionSelection {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(raw) if !is_all_sections(&raw) => Self::Section(SectionId(raw.trim().to_string())),
            _ => Self::All,
        }
    }
}

impl From<SectionSelection> for String {
    fn from(value: SectionSelection) -> Self {
        match value {
            SectionSelection::All => "all".to_string(),
            SectionSelection::Section(id) => id.0,
        }
    }
}

fn is_all_sections(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("todos")
}

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Range a freshly opened custom selector starts with: one month back to today.
    pub fn default_custom(today: NaiveDate) -> Self {
        Self {
            start: one_month_earlier(today),
            end: today,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("a custom period needs both a start and an end date")]
    MissingCustomDates,
    #[error("custom period starts on {start} which is after its end {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// Validated report filter. Custom periods always carry an ordered date pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FilterSpecPayload", into = "FilterSpecPayload")]
pub struct FilterSpec {
    sector_id: Option<SectorId>,
    section: SectionSelection,
    period: PeriodMode,
    custom_range: Option<DateRange>,
}

impl FilterSpec {
    pub fn new(
        sector_id: Option<SectorId>,
        section: SectionSelection,
        period: PeriodMode,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, FilterError> {
        let custom_range = match period {
            PeriodMode::Custom => {
                let (Some(start), Some(end)) = (start_date, end_date) else {
                    return Err(FilterError::MissingCustomDates);
                };
                if start > end {
                    return Err(FilterError::InvertedRange { start, end });
                }
                Some(DateRange { start, end })
            }
            _ => None,
        };

        Ok(Self {
            sector_id,
            section,
            period,
            custom_range,
        })
    }

    /// Every section of the sector, no date bounds.
    pub fn all_time(sector_id: Option<SectorId>) -> Self {
        Self {
            sector_id,
            section: SectionSelection::All,
            period: PeriodMode::AllTime,
            custom_range: None,
        }
    }

    pub fn with_section(mut self, section: SectionSelection) -> Self {
        self.section = section;
        self
    }

    pub fn with_period(self, period: PeriodMode) -> Result<Self, FilterError> {
        let range = self.custom_range;
        Self::new(
            self.sector_id,
            self.section,
            period,
            range.map(|r| r.start),
            range.map(|r| r.end),
        )
    }

    pub fn with_custom_range(self, start: NaiveDate, end: NaiveDate) -> Result<Self, FilterError> {
        Self::new(
            self.sector_id,
            self.section,
            PeriodMode::Custom,
            Some(start),
            Some(end),
        )
    }

    pub fn sector_id(&self) -> Option<&SectorId> {
        self.sector_id.as_ref()
    }

    pub fn section(&self) -> &SectionSelection {
        &self.section
    }

    pub fn period(&self) -> PeriodMode {
        self.period
    }

    pub fn custom_range(&self) -> Option<DateRange> {
        self.custom_range
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FilterSpecPayload {
    #[serde(default)]
    sector_id: Option<SectorId>,
    #[serde(default, alias = "section")]
    section_id: SectionSelection,
    #[serde(default)]
    period: PeriodMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end_date: Option<NaiveDate>,
}

impl From<FilterSpec> for FilterSpecPayload {
    fn from(spec: FilterSpec) -> Self {
        Self {
            sector_id: spec.sector_id,
            section_id: spec.section,
            period: spec.period,
            start_date: spec.custom_range.map(|range| range.start),
            end_date: spec.custom_range.map(|range| range.end),
        }
    }
}

impl TryFrom<FilterSpecPayload> for FilterSpec {
    type Error = FilterError;

    fn try_from(payload: FilterSpecPayload) -> Result<Self, Self::Error> {
        Self::new(
            payload.sector_id,
            payload.section_id,
            payload.period,
            payload.start_date,
            payload.end_date,
        )
    }
}

/// A period preset after it has been pinned to calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedPeriod {
    pub mode: PeriodMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,
}

impl ResolvedPeriod {
    pub fn description(&self) -> String {
        match (self.mode, self.range) {
            (PeriodMode::Custom, Some(range)) => format!("From {} to {}", range.start, range.end),
            (mode, _) => mode.label().to_string(),
        }
    }
}

/// Parameters for the data store's tally query. Absent values mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyQuery {
    pub sector_id: Option<SectorId>,
    pub section_id: Option<SectionId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TallyQuery {
    pub fn date_range(&self) -> Option<DateRange> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(DateRange { start, end }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFilter {
    pub period: ResolvedPeriod,
    pub query: TallyQuery,
}

/// Today's date on the local clock, used when a caller does not pin one.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Pins period presets to dates relative to a fixed "today".
#[derive(Debug, Clone, Copy)]
pub struct FilterResolver {
    today: NaiveDate,
}

impl FilterResolver {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Custom ranges are passed through untouched; an inverted pair simply
    /// matches nothing in the store.
    pub fn resolve_period(&self, mode: PeriodMode, custom: Option<DateRange>) -> ResolvedPeriod {
        let range = match mode {
            PeriodMode::AllTime => None,
            PeriodMode::LastWeek => Some(DateRange {
                start: self
                    .today
                    .checked_sub_signed(Duration::days(7))
                    .unwrap_or(NaiveDate::MIN),
                end: self.today,
            }),
            PeriodMode::LastMonth => Some(DateRange {
                start: one_month_earlier(self.today),
                end: self.today,
            }),
            PeriodMode::Custom => custom,
        };

        ResolvedPeriod { mode, range }
    }

    pub fn resolve(&self, spec: &FilterSpec) -> ResolvedFilter {
        let period = self.resolve_period(spec.period, spec.custom_range);
        let query = TallyQuery {
            sector_id: spec.sector_id.clone(),
            section_id: spec.section.section_id().cloned(),
            start_date: period.range.map(|range| range.start),
            end_date: period.range.map(|range| range.end),
        };

        ResolvedFilter { period, query }
    }
}

/// Steps the month field back by one and lets the day overflow into the next
/// month, so 2024-03-31 becomes 2024-03-02 rather than being clamped to the
/// end of February.
pub fn one_month_earlier(date: NaiveDate) -> NaiveDate {
    let (year, month) = match date.month() {
        1 => (date.year() - 1, 12),
        month => (date.year(), month - 1),
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_signed(Duration::days(i64::from(date.day()) - 1)))
        .unwrap_or(date)
}
