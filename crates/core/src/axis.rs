//! Timeline date axis.
//!
//! A [`DateAxis`] is a contiguous run of calendar units (days or months)
//! against which ticket bars are positioned. Which axis is built depends on
//! the [`ViewConfig`]:
//!
//! - master: a fixed project range, one unit per month
//! - monthly: every day of one calendar month
//! - auto: every month touched by a ticket date, or the current month

use std::fmt;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::models::Ticket;

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

/// Last day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Whole calendar months from the month of `from` to the month of `to`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 - from.year() as i64) * 12 + to.month() as i64 - from.month() as i64
}

/// A validated calendar month, e.g. `2025-04`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// Create a month selector.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidMonth` if `month` is not 1..=12 or the year is
    /// outside the supported calendar.
    pub fn new(year: i32, month: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or(CoreError::InvalidMonth { year, month })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self(first_of_month(date))
    }

    /// Parse a `YYYY-MM` selector.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ValidationError` for text that is not `YYYY-MM`,
    /// and `CoreError::InvalidMonth` for an out-of-range month.
    pub fn parse(value: &str) -> CoreResult<Self> {
        let invalid = || CoreError::ValidationError {
            message: format!("invalid month '{}'. Expected YYYY-MM", value),
        };

        let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        last_of_month(self.0)
    }

    /// Number of days in the month.
    pub fn days(&self) -> i64 {
        (self.last_day() - self.first_day()).num_days() + 1
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fixed project lifetime shown by the master view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// Default master view start: 2025-04-01.
pub const DEFAULT_PROJECT_START: (i32, u32, u32) = (2025, 4, 1);

/// Default master view end: 2026-03-31.
pub const DEFAULT_PROJECT_END: (i32, u32, u32) = (2026, 3, 31);

impl ProjectRange {
    /// Create a project range.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidRange` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl Default for ProjectRange {
    fn default() -> Self {
        let (sy, sm, sd) = DEFAULT_PROJECT_START;
        let (ey, em, ed) = DEFAULT_PROJECT_END;
        let start = NaiveDate::from_ymd_opt(sy, sm, sd).unwrap_or(NaiveDate::MIN);
        let end = NaiveDate::from_ymd_opt(ey, em, ed).unwrap_or(start);
        Self { start, end }
    }
}

/// Which timeline to lay out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ViewMode {
    /// The configured project range, by month.
    Master,
    /// A single month, by day.
    Monthly { month: YearMonth },
    /// The months spanned by the tickets themselves.
    #[default]
    Auto,
}

impl ViewMode {
    /// Returns the mode name
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Master => "master",
            ViewMode::Monthly { .. } => "monthly",
            ViewMode::Auto => "auto",
        }
    }

    /// Unit size of the axis this mode produces.
    pub fn granularity(&self) -> Granularity {
        match self {
            ViewMode::Monthly { .. } => Granularity::Day,
            ViewMode::Master | ViewMode::Auto => Granularity::Month,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Monthly { month } => write!(f, "monthly ({})", month),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// View selection plus the project range used by the master view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ViewConfig {
    #[serde(flatten)]
    pub mode: ViewMode,
    pub project_range: ProjectRange,
}

impl ViewConfig {
    pub fn master() -> Self {
        Self {
            mode: ViewMode::Master,
            ..Self::default()
        }
    }

    pub fn monthly(month: YearMonth) -> Self {
        Self {
            mode: ViewMode::Monthly { month },
            ..Self::default()
        }
    }

    pub fn auto() -> Self {
        Self::default()
    }

    /// Replace the master view project range.
    pub fn with_project_range(mut self, range: ProjectRange) -> Self {
        self.project_range = range;
        self
    }

    /// The month window of a monthly view.
    pub fn month_window(&self) -> Option<YearMonth> {
        match self.mode {
            ViewMode::Monthly { month } => Some(month),
            _ => None,
        }
    }
}

/// Size of one axis unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Month,
}

/// An ordered, contiguous sequence of calendar units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateAxis {
    start: NaiveDate,
    end: NaiveDate,
    granularity: Granularity,
    /// First day of every unit, in order.
    units: Vec<NaiveDate>,
}

impl DateAxis {
    /// Compute the axis for a view.
    ///
    /// `tickets` only matter for the auto view. `today` supplies the current
    /// month whenever a fallback axis is needed.
    pub fn compute(view: &ViewConfig, tickets: &[Ticket], today: NaiveDate) -> Self {
        let axis = match view.mode {
            ViewMode::Master => {
                let range = view.project_range;
                Self::months(
                    first_of_month(range.start()),
                    last_of_month(range.end()),
                    today,
                )
            }
            ViewMode::Monthly { month } => Self::days(month),
            ViewMode::Auto => {
                let mut dates = tickets
                    .iter()
                    .flat_map(|t| [t.start_date, t.due_date])
                    .flatten();

                match dates.next() {
                    None => Self::current_month(today),
                    Some(first) => {
                        let (min, max) = dates.fold((first, first), |(lo, hi), d| {
                            (lo.min(d), hi.max(d))
                        });
                        Self::months(first_of_month(min), last_of_month(max), today)
                    }
                }
            }
        };

        debug!(
            "Computed {} axis {}..{} with {} units",
            view.mode,
            axis.start,
            axis.end,
            axis.units.len()
        );
        axis
    }

    /// Daily axis covering one month.
    fn days(month: YearMonth) -> Self {
        let start = month.first_day();
        let end = month.last_day();
        let units = start.iter_days().take_while(|d| *d <= end).collect();
        Self {
            start,
            end,
            granularity: Granularity::Day,
            units,
        }
    }

    /// Monthly axis from `start` to `end`, collapsing to the current month when
    /// the bounds are inverted.
    fn months(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        if start > end {
            return Self::current_month(today);
        }

        let mut units = Vec::new();
        let mut cursor = start;
        while cursor <= end {
            units.push(cursor);
            match cursor.checked_add_months(Months::new(1)) {
                Some(next) => cursor = next,
                None => break,
            }
        }

        Self {
            start,
            end,
            granularity: Granularity::Month,
            units,
        }
    }

    /// Single monthly unit for the month containing `today`.
    fn current_month(today: NaiveDate) -> Self {
        let start = first_of_month(today);
        Self {
            start,
            end: last_of_month(today),
            granularity: Granularity::Month,
            units: vec![start],
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// First day of every unit.
    pub fn units(&self) -> &[NaiveDate] {
        &self.units
    }

    /// Number of units; never zero.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the axis has no units; a computed axis never does.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Unit offset of `date` from the axis start, possibly negative or past
    /// the last unit.
    pub fn unit_index(&self, date: NaiveDate) -> i64 {
        match self.granularity {
            Granularity::Day => (date - self.start).num_days(),
            Granularity::Month => months_between(self.start, date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 6, 15)
    }

    #[test]
    fn test_first_and_last_of_month() {
        assert_eq!(first_of_month(date(2025, 2, 17)), date(2025, 2, 1));
        assert_eq!(last_of_month(date(2025, 2, 17)), date(2025, 2, 28));
        assert_eq!(last_of_month(date(2024, 2, 1)), date(2024, 2, 29));
        assert_eq!(last_of_month(date(2025, 12, 5)), date(2025, 12, 31));
    }

    #[test]
    fn test_months_between_crosses_years() {
        assert_eq!(months_between(date(2025, 4, 1), date(2026, 3, 31)), 11);
        assert_eq!(months_between(date(2025, 4, 1), date(2025, 1, 1)), -3);
        assert_eq!(months_between(date(2025, 4, 30), date(2025, 4, 1)), 0);
    }

    #[test]
    fn test_year_month_parse() {
        let month = YearMonth::parse("2025-04").unwrap();
        assert_eq!(month.year(), 2025);
        assert_eq!(month.month(), 4);
        assert_eq!(month.days(), 30);
        assert_eq!(month.to_string(), "2025-04");
    }

    #[test]
    fn test_year_month_parse_rejects_garbage() {
        assert!(matches!(
            YearMonth::parse("April"),
            Err(CoreError::ValidationError { .. })
        ));
        assert!(matches!(
            YearMonth::parse("2025-13"),
            Err(CoreError::InvalidMonth { month: 13, .. })
        ));
        assert!(matches!(
            YearMonth::new(2025, 0),
            Err(CoreError::InvalidMonth { month: 0, .. })
        ));
    }

    #[test]
    fn test_project_range_rejects_inverted() {
        assert!(ProjectRange::new(date(2026, 1, 1), date(2025, 1, 1)).is_err());
        assert!(ProjectRange::new(date(2025, 1, 1), date(2025, 1, 1)).is_ok());
    }

    #[test]
    fn test_master_axis_has_twelve_months_by_default() {
        let axis = DateAxis::compute(&ViewConfig::master(), &[], today());

        assert_eq!(axis.granularity(), Granularity::Month);
        assert_eq!(axis.len(), 12);
        assert_eq!(axis.start(), date(2025, 4, 1));
        assert_eq!(axis.end(), date(2026, 3, 31));
        assert_eq!(axis.units()[11], date(2026, 3, 1));
    }

    #[test]
    fn test_master_axis_ignores_tickets() {
        let tickets =
            vec![Ticket::new(1, "late").with_dates(Some(date(2030, 1, 1)), Some(date(2030, 2, 1)))];
        let axis = DateAxis::compute(&ViewConfig::master(), &tickets, today());
        assert_eq!(axis.len(), 12);
    }

    #[test]
    fn test_master_axis_uses_configured_range() {
        let range = ProjectRange::new(date(2025, 1, 15), date(2025, 3, 2)).unwrap();
        let view = ViewConfig::master().with_project_range(range);
        let axis = DateAxis::compute(&view, &[], today());

        assert_eq!(axis.start(), date(2025, 1, 1));
        assert_eq!(axis.end(), date(2025, 3, 31));
        assert_eq!(axis.len(), 3);
    }

    #[test]
    fn test_monthly_axis_has_one_unit_per_day() {
        let view = ViewConfig::monthly(YearMonth::new(2025, 4).unwrap());
        let axis = DateAxis::compute(&view, &[], today());

        assert_eq!(axis.granularity(), Granularity::Day);
        assert_eq!(axis.start(), date(2025, 4, 1));
        assert_eq!(axis.end(), date(2025, 4, 30));
        assert_eq!(
            axis.len() as i64,
            (axis.end() - axis.start()).num_days() + 1
        );
    }

    #[test]
    fn test_monthly_axis_leap_february() {
        let view = ViewConfig::monthly(YearMonth::new(2024, 2).unwrap());
        let axis = DateAxis::compute(&view, &[], today());
        assert_eq!(axis.len(), 29);
    }

    #[test]
    fn test_auto_axis_rounds_outward_to_months() {
        let tickets = vec![
            Ticket::new(1, "a").with_dates(Some(date(2025, 3, 20)), Some(date(2025, 4, 2))),
            Ticket::new(2, "b").with_dates(None, Some(date(2025, 7, 9))),
        ];
        let axis = DateAxis::compute(&ViewConfig::auto(), &tickets, today());

        assert_eq!(axis.start(), date(2025, 3, 1));
        assert_eq!(axis.end(), date(2025, 7, 31));
        assert_eq!(axis.granularity(), Granularity::Month);
        assert_eq!(
            axis.len() as i64,
            months_between(axis.start(), axis.end()) + 1
        );
    }

    #[test]
    fn test_auto_axis_single_start_date() {
        let tickets = vec![Ticket::new(1, "a").with_dates(Some(date(2025, 9, 9)), None)];
        let axis = DateAxis::compute(&ViewConfig::auto(), &tickets, today());

        assert_eq!(axis.start(), date(2025, 9, 1));
        assert_eq!(axis.end(), date(2025, 9, 30));
        assert_eq!(axis.len(), 1);
    }

    #[test]
    fn test_auto_axis_without_dates_is_current_month() {
        let tickets = vec![Ticket::new(1, "undated")];
        let axis = DateAxis::compute(&ViewConfig::auto(), &tickets, today());

        assert_eq!(axis.start(), date(2025, 6, 1));
        assert_eq!(axis.end(), date(2025, 6, 30));
        assert_eq!(axis.len(), 1);
    }

    #[test]
    fn test_empty_ticket_set_is_current_month() {
        let axis = DateAxis::compute(&ViewConfig::auto(), &[], today());
        assert_eq!(axis.start(), date(2025, 6, 1));
        assert!(!axis.is_empty());
    }

    #[test]
    fn test_inverted_bounds_collapse_to_current_month() {
        let axis = DateAxis::months(date(2025, 9, 1), date(2025, 2, 28), today());
        assert_eq!(axis.len(), 1);
        assert_eq!(axis.start(), date(2025, 6, 1));
    }

    #[test]
    fn test_axis_start_never_after_end() {
        let views = [
            ViewConfig::master(),
            ViewConfig::monthly(YearMonth::new(2025, 2).unwrap()),
            ViewConfig::auto(),
        ];
        let tickets =
            vec![Ticket::new(1, "a").with_dates(Some(date(2024, 11, 3)), Some(date(2025, 1, 3)))];
        for view in &views {
            let axis = DateAxis::compute(view, &tickets, today());
            assert!(axis.start() <= axis.end());
            assert!(axis.len() > 0);
        }
    }

    #[test]
    fn test_unit_index() {
        let daily = DateAxis::compute(
            &ViewConfig::monthly(YearMonth::new(2025, 4).unwrap()),
            &[],
            today(),
        );
        assert_eq!(daily.unit_index(date(2025, 4, 1)), 0);
        assert_eq!(daily.unit_index(date(2025, 4, 30)), 29);
        assert_eq!(daily.unit_index(date(2025, 3, 31)), -1);

        let monthly = DateAxis::compute(&ViewConfig::master(), &[], today());
        assert_eq!(monthly.unit_index(date(2025, 4, 30)), 0);
        assert_eq!(monthly.unit_index(date(2026, 3, 1)), 11);
    }

    #[test]
    fn test_view_mode_serializes_with_tag() {
        let view = ViewMode::Monthly {
            month: YearMonth::new(2025, 4).unwrap(),
        };
        let value = serde_json::to_value(view).unwrap();
        assert_eq!(value["mode"], "monthly");
        assert_eq!(value["month"], "2025-04");
    }
}
