use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::models::WeeklyMetric;
use crate::utils::dates::{
    format_day_month, format_day_month_year, full_month_name, month_bounds, week_end_of,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodMode {
    Week,
    Month,
    Custom,
}

impl PeriodMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Custom => "custom",
        }
    }
}

/// A resolved reporting interval. Bounds are inclusive; `label` is the
/// display string the rendering layer titles charts with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSelection {
    pub mode: PeriodMode,
    pub start_date: Date,
    pub end_date: Date,
    pub label: String,
}

/// User-provided anchors, all optional. Week and Month read `anchor`; Custom
/// reads the two explicit bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodInputs {
    pub anchor: Option<Date>,
    pub custom_start: Option<Date>,
    pub custom_end: Option<Date>,
}

/// Span of `week_start` values present in the loaded data, used to default
/// missing anchors to the most recent period and custom bounds to the full
/// span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailableRange {
    pub min_week_start: Date,
    pub max_week_start: Date,
}

#[must_use]
pub fn available_range(metrics: &[WeeklyMetric]) -> Option<AvailableRange> {
    let min_week_start = metrics.iter().map(|metric| metric.week_start).min()?;
    let max_week_start = metrics.iter().map(|metric| metric.week_start).max()?;
    Some(AvailableRange {
        min_week_start,
        max_week_start,
    })
}

/// Resolves a period selection from a mode and its anchors.
///
/// Week mode keeps the anchor exactly as given (no snapping to Monday) and
/// spans seven days. Custom mode does not enforce `start <= end`: an inverted
/// range is legal and simply filters to nothing downstream.
pub fn resolve_period(
    mode: PeriodMode,
    inputs: PeriodInputs,
    available: Option<&AvailableRange>,
) -> Result<PeriodSelection> {
    match mode {
        PeriodMode::Week => {
            let start_date = resolve_anchor(inputs.anchor, available)?;
            let end_date = week_end_of(start_date);
            Ok(PeriodSelection {
                mode,
                start_date,
                end_date,
                label: format!(
                    "Week of {} – {}",
                    format_day_month(start_date),
                    format_day_month_year(end_date)
                ),
            })
        }
        PeriodMode::Month => {
            let anchor = resolve_anchor(inputs.anchor, available)?;
            let (start_date, end_date) = month_bounds(anchor)?;
            Ok(PeriodSelection {
                mode,
                start_date,
                end_date,
                label: format!(
                    "{} {}",
                    full_month_name(start_date.month()),
                    start_date.year()
                ),
            })
        }
        PeriodMode::Custom => {
            let start_date = match (inputs.custom_start, available) {
                (Some(date), _) => date,
                (None, Some(range)) => range.min_week_start,
                (None, None) => bail!("no start date given and the store has no weekly metrics"),
            };
            let end_date = match (inputs.custom_end, available) {
                (Some(date), _) => date,
                (None, Some(range)) => range.max_week_start,
                (None, None) => bail!("no end date given and the store has no weekly metrics"),
            };
            Ok(PeriodSelection {
                mode,
                start_date,
                end_date,
                label: format!(
                    "{} – {}",
                    format_day_month_year(start_date),
                    format_day_month_year(end_date)
                ),
            })
        }
    }
}

fn resolve_anchor(anchor: Option<Date>, available: Option<&AvailableRange>) -> Result<Date> {
    match (anchor, available) {
        (Some(date), _) => Ok(date),
        (None, Some(range)) => Ok(range.max_week_start),
        (None, None) => bail!("no anchor date given and the store has no weekly metrics"),
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, Month};

    use super::{AvailableRange, PeriodInputs, PeriodMode, resolve_period};

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).expect("test date should be valid")
    }

    fn sample_range() -> AvailableRange {
        AvailableRange {
            min_week_start: date(2024, Month::January, 1),
            max_week_start: date(2024, Month::March, 4),
        }
    }

    #[test]
    fn week_mode_keeps_anchor_unsnapped() {
        // 2024-02-07 is a Wednesday; the selection starts there regardless.
        let selection = resolve_period(
            PeriodMode::Week,
            PeriodInputs {
                anchor: Some(date(2024, Month::February, 7)),
                ..PeriodInputs::default()
            },
            Some(&sample_range()),
        )
        .expect("week period should resolve");

        assert_eq!(selection.start_date, date(2024, Month::February, 7));
        assert_eq!(selection.end_date, date(2024, Month::February, 13));
        assert_eq!(selection.label, "Week of 07 Feb – 13 Feb 2024");
    }

    #[test]
    fn week_mode_defaults_to_most_recent_week_start() {
        let selection = resolve_period(
            PeriodMode::Week,
            PeriodInputs::default(),
            Some(&sample_range()),
        )
        .expect("defaulted week period should resolve");

        assert_eq!(selection.start_date, date(2024, Month::March, 4));
        assert_eq!(selection.end_date, date(2024, Month::March, 10));
    }

    #[test]
    fn month_mode_resolves_leap_february() {
        let selection = resolve_period(
            PeriodMode::Month,
            PeriodInputs {
                anchor: Some(date(2024, Month::February, 15)),
                ..PeriodInputs::default()
            },
            Some(&sample_range()),
        )
        .expect("month period should resolve");

        assert_eq!(selection.start_date, date(2024, Month::February, 1));
        assert_eq!(selection.end_date, date(2024, Month::February, 29));
        assert_eq!(selection.label, "February 2024");
    }

    #[test]
    fn custom_mode_defaults_to_full_available_span() {
        let selection = resolve_period(
            PeriodMode::Custom,
            PeriodInputs::default(),
            Some(&sample_range()),
        )
        .expect("custom period should resolve");

        assert_eq!(selection.start_date, date(2024, Month::January, 1));
        assert_eq!(selection.end_date, date(2024, Month::March, 4));
        assert_eq!(selection.label, "01 Jan 2024 – 04 Mar 2024");
    }

    #[test]
    fn custom_mode_allows_inverted_bounds() {
        let selection = resolve_period(
            PeriodMode::Custom,
            PeriodInputs {
                custom_start: Some(date(2024, Month::March, 10)),
                custom_end: Some(date(2024, Month::March, 1)),
                ..PeriodInputs::default()
            },
            Some(&sample_range()),
        )
        .expect("inverted custom period must still resolve");

        assert!(selection.start_date > selection.end_date);
    }

    #[test]
    fn missing_anchor_on_empty_store_is_an_error() {
        let error = resolve_period(PeriodMode::Month, PeriodInputs::default(), None)
            .expect_err("empty store with no anchor must fail");
        assert!(error.to_string().contains("no anchor date"));
    }

    #[test]
    fn explicit_anchors_resolve_without_available_range() {
        let selection = resolve_period(
            PeriodMode::Week,
            PeriodInputs {
                anchor: Some(date(2024, Month::June, 3)),
                ..PeriodInputs::default()
            },
            None,
        )
        .expect("explicit anchor needs no available range");

        assert_eq!(selection.end_date, date(2024, Month::June, 9));
    }
}
