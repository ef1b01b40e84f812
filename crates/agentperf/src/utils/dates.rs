use anyhow::{Result, bail};
use time::{Date, Duration, Month};

pub const DAYS_PER_WEEK_OFFSET: i64 = 6;

const SHORT_MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const FULL_MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Parses the external store's viewing date format, `DD/MM/YYYY`.
pub fn parse_viewing_date(raw: &str) -> Result<Date> {
    let candidate = raw.trim();
    let mut parts = candidate.splitn(3, '/');
    let (Some(day_raw), Some(month_raw), Some(year_raw)) =
        (parts.next(), parts.next(), parts.next())
    else {
        bail!("viewing date must be DD/MM/YYYY: {candidate}");
    };

    let Ok(day) = day_raw.parse::<u8>() else {
        bail!("viewing date has a non-numeric day component: {candidate}");
    };
    let Ok(month_number) = month_raw.parse::<u8>() else {
        bail!("viewing date has a non-numeric month component: {candidate}");
    };
    let Ok(year) = year_raw.parse::<i32>() else {
        bail!("viewing date has a non-numeric year component: {candidate}");
    };

    let Ok(month) = Month::try_from(month_number) else {
        bail!("viewing date has an out-of-range month: {candidate}");
    };
    match Date::from_calendar_date(year, month, day) {
        Ok(date) => Ok(date),
        Err(_) => bail!("viewing date is not a valid calendar date: {candidate}"),
    }
}

/// Parses user-facing anchor dates, `YYYY-MM-DD`.
pub fn parse_iso_date(raw: &str) -> Result<Date> {
    let candidate = raw.trim();
    let mut parts = candidate.splitn(3, '-');
    let (Some(year_raw), Some(month_raw), Some(day_raw)) =
        (parts.next(), parts.next(), parts.next())
    else {
        bail!("date must be YYYY-MM-DD: {candidate}");
    };

    let (Ok(year), Ok(month_number), Ok(day)) = (
        year_raw.parse::<i32>(),
        month_raw.parse::<u8>(),
        day_raw.parse::<u8>(),
    ) else {
        bail!("date must be numeric YYYY-MM-DD: {candidate}");
    };

    let Ok(month) = Month::try_from(month_number) else {
        bail!("date has an out-of-range month: {candidate}");
    };
    match Date::from_calendar_date(year, month, day) {
        Ok(date) => Ok(date),
        Err(_) => bail!("date is not a valid calendar date: {candidate}"),
    }
}

/// Monday of the calendar week containing `date`.
#[must_use]
pub fn week_start_of(date: Date) -> Date {
    let days_from_monday = i64::from(date.weekday().number_days_from_monday());
    date.checked_sub(Duration::days(days_from_monday))
        .unwrap_or(date)
}

#[must_use]
pub fn week_end_of(week_start: Date) -> Date {
    week_start
        .checked_add(Duration::days(DAYS_PER_WEEK_OFFSET))
        .unwrap_or(week_start)
}

/// First and last day of the month containing `anchor`.
pub fn month_bounds(anchor: Date) -> Result<(Date, Date)> {
    let year = anchor.year();
    let month = anchor.month();
    let last_day = month.length(year);
    let (Ok(first), Ok(last)) = (
        Date::from_calendar_date(year, month, 1),
        Date::from_calendar_date(year, month, last_day),
    ) else {
        bail!("month bounds are out of range for anchor {anchor}");
    };
    Ok((first, last))
}

#[must_use]
pub fn short_month_name(month: Month) -> &'static str {
    SHORT_MONTH_NAMES[usize::from(u8::from(month)) - 1]
}

#[must_use]
pub fn full_month_name(month: Month) -> &'static str {
    FULL_MONTH_NAMES[usize::from(u8::from(month)) - 1]
}

#[must_use]
pub fn format_day_month(date: Date) -> String {
    format!("{:02} {}", date.day(), short_month_name(date.month()))
}

#[must_use]
pub fn format_day_month_year(date: Date) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        short_month_name(date.month()),
        date.year()
    )
}
