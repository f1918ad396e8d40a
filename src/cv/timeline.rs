//! Loose date parsing for CV sort keys.
//!
//! CV data files write dates the way people write them on a CV: `2019`,
//! `2020-06`, `06/2020`, `June 2020`, `2020-06-15`. The ongoing token
//! (`Now` by default) means "still active" and sorts as tomorrow, so
//! current positions come first in descending order.

use chrono::{Days, Local, NaiveDate};

const FULL_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];

/// "Today" plus the ongoing token, fixed for one resolution.
#[derive(Debug, Clone)]
pub struct Timeline {
    today: NaiveDate,
    ongoing: String,
}

impl Timeline {
    pub fn new(ongoing: &str) -> Self {
        Self::at(Local::now().date_naive(), ongoing)
    }

    pub fn at(today: NaiveDate, ongoing: &str) -> Self {
        Self {
            today,
            ongoing: ongoing.trim().to_string(),
        }
    }

    /// Sort key for a CV date. `None` sorts before every real date.
    pub fn as_date(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if value.eq_ignore_ascii_case(&self.ongoing) {
            return self.today.checked_add_days(Days::new(1));
        }
        let parsed = parse_loose(value);
        if parsed.is_none() {
            tracing::debug!(value, "unrecognised CV date, sorting it last");
        }
        parsed
    }
}

fn parse_loose(value: &str) -> Option<NaiveDate> {
    if let Some(date) = FULL_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    {
        return Some(date);
    }
    // YYYY-MM / YYYY/MM
    for sep in ['-', '/'] {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{value}{sep}01"), &format!("%Y{sep}%m{sep}%d")) {
            return Some(date);
        }
    }
    // MM/YYYY
    if let Ok(date) = NaiveDate::parse_from_str(&format!("01/{value}"), "%d/%m/%Y") {
        return Some(date);
    }
    // Month YYYY
    if let Ok(date) = NaiveDate::parse_from_str(&format!("1 {value}"), "%d %B %Y") {
        return Some(date);
    }
    // YYYY
    if value.len() == 4 && value.chars().all(|c| c.is_ascii_digit()) {
        return value
            .parse()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }
    None
}
