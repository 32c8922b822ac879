//! Date helpers for the profile store's legacy `DD/MM/YYYY` strings and for
//! age display.

use crate::domain::model::AgeBreakdown;
use crate::utils::error::{AdminError, Result};
use chrono::{Datelike, Local, Months, NaiveDate};

pub const LEGACY_FORMAT: &str = "%d/%m/%Y";
pub const ISO_FORMAT: &str = "%Y-%m-%d";

fn split_exact<'a>(input: &'a str, separator: char, expected: &str) -> Result<[&'a str; 3]> {
    let parts: Vec<&str> = input.split(separator).collect();
    match parts.as_slice() {
        [a, b, c] if !a.is_empty() && !b.is_empty() && !c.is_empty() => Ok([*a, *b, *c]),
        _ => Err(AdminError::MalformedDate {
            input: input.to_string(),
            expected: expected.to_string(),
        }),
    }
}

/// `DD/MM/YYYY` to `YYYY-MM-DD` by rearranging the components.
///
/// No calendar check is made; `"31/02/2020"` becomes `"2020-02-31"`.
pub fn to_iso_date(legacy: &str) -> Result<String> {
    let [day, month, year] = split_exact(legacy, '/', "DD/MM/YYYY")?;
    Ok(format!("{}-{}-{}", year, month, day))
}

/// `YYYY-MM-DD` to `DD/MM/YYYY`.
pub fn to_legacy_date(iso: &str) -> Result<String> {
    let [year, month, day] = split_exact(iso, '-', "YYYY-MM-DD")?;
    Ok(format!("{}/{}/{}", day, month, year))
}

pub fn parse_legacy_date(legacy: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(legacy.trim(), LEGACY_FORMAT).map_err(|e| AdminError::InvalidDate {
        date: legacy.to_string(),
        reason: e.to_string(),
    })
}

pub fn parse_iso_date(iso: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(iso.trim(), ISO_FORMAT).map_err(|e| AdminError::InvalidDate {
        date: iso.to_string(),
        reason: e.to_string(),
    })
}

/// Elapsed whole years, then months, then days between `birth` and `today`.
///
/// Month arithmetic clamps to the last day of shorter months, so a 31st
/// birthday anchors on the 30th (or 28th/29th) where needed. Birthdates after
/// `today` are rejected.
pub fn age_from_birthdate(birth: NaiveDate, today: NaiveDate) -> Result<AgeBreakdown> {
    if birth > today {
        return Err(AdminError::InvalidDate {
            date: birth.format(ISO_FORMAT).to_string(),
            reason: format!("birthdate is after {}", today.format(ISO_FORMAT)),
        });
    }

    let shifted = |months: u32| {
        birth
            .checked_add_months(Months::new(months))
            .ok_or_else(|| AdminError::InvalidDate {
                date: birth.format(ISO_FORMAT).to_string(),
                reason: "date arithmetic out of range".to_string(),
            })
    };

    let mut years = (today.year() - birth.year()) as u32;
    if shifted(years * 12)? > today {
        years -= 1;
    }

    let year_anchor = shifted(years * 12)?;
    let mut months = (month_index(today) - month_index(year_anchor)) as u32;
    if shifted(years * 12 + months)? > today {
        months -= 1;
    }

    let anchor = shifted(years * 12 + months)?;
    let days = (today - anchor).num_days() as u32;

    Ok(AgeBreakdown {
        years,
        months,
        days,
    })
}

/// Age relative to the local calendar date.
pub fn age_today(birth: NaiveDate) -> Result<AgeBreakdown> {
    age_from_birthdate(birth, Local::now().date_naive())
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}
