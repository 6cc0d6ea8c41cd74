//! Date helpers and the `--period` filter grammar:
//! `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, or `A:B` where A and B are any of those.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};
use regex::Regex;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Inclusive date range covered by one period token.
fn period_bounds(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Ok(d) = NaiveDate::parse_from_str(p, "%Y-%m-%d") {
        return Ok((d, d));
    }

    let month_re = Regex::new(r"^(\d{4})-(\d{2})$").expect("static regex");
    if let Some(caps) = month_re.captures(p) {
        let year: i32 = caps[1].parse().map_err(|_| AppError::InvalidPeriod(p.to_string()))?;
        let month: u32 = caps[2].parse().map_err(|_| AppError::InvalidPeriod(p.to_string()))?;
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::InvalidPeriod(p.to_string()))?;
        return Ok((first, last_day_of_month(year, month)));
    }

    let year_re = Regex::new(r"^\d{4}$").expect("static regex");
    if year_re.is_match(p) {
        let year: i32 = p.parse().map_err(|_| AppError::InvalidPeriod(p.to_string()))?;
        let first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::InvalidPeriod(p.to_string()))?;
        let last = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| AppError::InvalidPeriod(p.to_string()))?;
        return Ok((first, last));
    }

    Err(AppError::InvalidPeriod(p.to_string()))
}

/// Resolve a `--period` argument to an inclusive (start, end) date range.
pub fn parse_period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Some((a, b)) = p.split_once(':') {
        let (start, _) = period_bounds(a)?;
        let (_, end) = period_bounds(b)?;
        if start > end {
            return Err(AppError::InvalidPeriod(p.to_string()));
        }
        Ok((start, end))
    } else {
        period_bounds(p)
    }
}

fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .expect("valid month arithmetic")
}

pub fn weekday_short(d: &NaiveDate) -> &'static str {
    match d.weekday() {
        chrono::Weekday::Mon => "Mon",
        chrono::Weekday::Tue => "Tue",
        chrono::Weekday::Wed => "Wed",
        chrono::Weekday::Thu => "Thu",
        chrono::Weekday::Fri => "Fri",
        chrono::Weekday::Sat => "Sat",
        chrono::Weekday::Sun => "Sun",
    }
}
