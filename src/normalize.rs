//! Cleaning of raw listings into fixed-schema rows.
//!
//! Normalization never fails. Anything that cannot be cleaned becomes unknown.

use crate::models::{Listing, RawListing};
use chrono::{Datelike, Local};
use once_cell::sync::Lazy;
use regex::Regex;

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").expect("static regex"));

/// Normalize a batch, taking the age reference from today's calendar year.
pub fn normalize(raw: Vec<RawListing>) -> Vec<Listing> {
    normalize_for_year(raw, Local::now().year())
}

/// Normalize a batch against an explicit reference year. Order is preserved.
pub fn normalize_for_year(raw: Vec<RawListing>, current_year: i32) -> Vec<Listing> {
    raw.into_iter()
        .map(|r| normalize_one(r, current_year))
        .collect()
}

fn normalize_one(raw: RawListing, current_year: i32) -> Listing {
    let year = scrub(raw.year.as_deref());
    let age = age_from_year(year.as_deref(), current_year);
    Listing {
        full_name: raw.full_name,
        brand: raw.brand,
        model: raw.model,
        year,
        age,
        mileage_km: scrub(raw.mileage.as_deref()),
        fuel: raw.fuel,
        transmission: raw.transmission,
        price: scrub(raw.price.as_deref()),
    }
}

/// Strip every character that is not an ASCII digit.
///
/// # Arguments
///
/// * `value` - The raw field text, or `None` when it is already unknown
///
/// # Returns
///
/// The digits of `value` in order, or `None` when the input is unknown or
/// holds no digit at all. Digit-only input comes back unchanged.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(scrub(Some("45 000 DT")).as_deref(), Some("45000"));
/// assert_eq!(scrub(Some("Neuf")), None);
/// assert_eq!(scrub(None), None);
/// ```
pub fn scrub(value: Option<&str>) -> Option<String> {
    let digits = NON_DIGITS.replace_all(value?, "");
    (!digits.is_empty()).then(|| digits.into_owned())
}

fn age_from_year(year: Option<&str>, current_year: i32) -> Option<i32> {
    let year: i32 = year?.parse().ok()?;
    current_year.checked_sub(year)
}
