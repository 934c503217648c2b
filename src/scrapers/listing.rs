//! Field extraction from a single listing block.
//!
//! A block looks roughly like this:
//!
//! ```html
//! <div class="box-product listing-item effect-item h-100">
//!   <h3 class="lib-car">Toyota Corolla</h3>
//!   <div class="price">45 000 DT</div>
//!   <div class="options">
//!     <div><span>2015</span></div>
//!     <div><span>80 000 Km</span></div>
//!     <div><span>Diesel</span></div>
//!     <div><span>Automatique</span></div>
//!   </div>
//! </div>
//! ```
//!
//! Title, price and per-option labels are soft: if one is missing, only that
//! field becomes unknown. The options container and its four slots are hard:
//! without them the block is skipped.

use crate::models::RawListing;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::debug;

static LISTING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.box-product.listing-item.effect-item.h-100").expect("static selector")
});
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3.lib-car").expect("static selector"));
static PRICE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.price").expect("static selector"));
static OPTIONS_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.options").expect("static selector"));
static SLOT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div").expect("static selector"));
static LABEL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span").expect("static selector"));

const CURRENCY_TOKEN: &str = "DT";
const MILEAGE_UNIT_TOKEN: &str = " Km";

/// Positions of each field among the option sections, in markup order.
///
/// This is the only place that knows the site's option ordering.
#[derive(Debug, Clone, Copy)]
pub struct OptionSlots {
    pub year: usize,
    pub mileage: usize,
    pub fuel: usize,
    pub transmission: usize,
}

impl OptionSlots {
    /// Number of sections a block must have for every slot to resolve.
    pub const fn required(&self) -> usize {
        let mut max = self.year;
        if self.mileage > max {
            max = self.mileage;
        }
        if self.fuel > max {
            max = self.fuel;
        }
        if self.transmission > max {
            max = self.transmission;
        }
        max + 1
    }
}

pub const OPTION_SLOTS: OptionSlots = OptionSlots {
    year: 0,
    mileage: 1,
    fuel: 2,
    transmission: 3,
};

/// Why a listing block produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("no options container")]
    MissingOptions,

    #[error("options container has {found} sections, need {required}")]
    TooFewOptions { found: usize, required: usize },
}

/// All listing blocks in a parsed results page, in document order.
pub fn listing_blocks(document: &Html) -> Vec<ElementRef<'_>> {
    document.select(&LISTING_SELECTOR).collect()
}

/// Pull a [`RawListing`] out of one listing block.
///
/// Title, price and each option label fall back to unknown on their own.
/// The options container and its [`OPTION_SLOTS`] sections are required.
///
/// # Arguments
///
/// * `block` - One element matched by the listing-block selector
///
/// # Returns
///
/// The raw record, or the [`SkipReason`] explaining why the block has none.
///
/// # Examples
///
/// ```ignore
/// let document = Html::parse_document(&page_html);
/// for block in listing_blocks(&document) {
///     match extract_listing(block) {
///         Ok(listing) => println!("{}", listing.brand),
///         Err(reason) => println!("skipped: {reason}"),
///     }
/// }
/// ```
pub fn extract_listing(block: ElementRef<'_>) -> Result<RawListing, SkipReason> {
    let full_name = first_text(block, &TITLE_SELECTOR);
    let mut listing = RawListing::with_name(full_name);

    listing.price = first_text(block, &PRICE_SELECTOR).map(|p| clean_price(&p));

    let options = block
        .select(&OPTIONS_SELECTOR)
        .next()
        .ok_or(SkipReason::MissingOptions)?;

    let slots: Vec<ElementRef<'_>> = options.select(&SLOT_SELECTOR).collect();
    let required = OPTION_SLOTS.required();
    if slots.len() < required {
        return Err(SkipReason::TooFewOptions {
            found: slots.len(),
            required,
        });
    }

    let label = |i: usize| first_text(slots[i], &LABEL_SELECTOR);
    listing.year = label(OPTION_SLOTS.year);
    listing.mileage = label(OPTION_SLOTS.mileage).map(|m| clean_mileage(&m));
    listing.fuel = label(OPTION_SLOTS.fuel);
    listing.transmission = label(OPTION_SLOTS.transmission);

    Ok(listing)
}

/// Extract every block of a results page, returning the number of blocks seen
/// alongside the records that survived.
pub fn extract_page(html: &str) -> (usize, Vec<RawListing>) {
    let document = Html::parse_document(html);
    let blocks = listing_blocks(&document);
    let found = blocks.len();

    let mut listings = Vec::with_capacity(found);
    for (index, block) in blocks.into_iter().enumerate() {
        match extract_listing(block) {
            Ok(listing) => listings.push(listing),
            Err(reason) => debug!(index, %reason, "Skipping listing block"),
        }
    }
    (found, listings)
}

/// Trimmed text of the first descendant matching `selector`.
///
/// An empty result counts as absent.
fn first_text(el: ElementRef<'_>, selector: &Selector) -> Option<String> {
    el.select(selector)
        .next()
        .map(|node| node.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn clean_price(text: &str) -> String {
    strip_whitespace(text).replace(CURRENCY_TOKEN, "")
}

fn clean_mileage(text: &str) -> String {
    strip_whitespace(&text.replace(MILEAGE_UNIT_TOKEN, ""))
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN;

    fn block(inner: &str) -> String {
        format!(
            r#"<html><body><div class="box-product listing-item effect-item h-100">{inner}</div></body></html>"#
        )
    }

    fn extract_one(html: &str) -> Result<RawListing, SkipReason> {
        let document = Html::parse_document(html);
        let blocks = listing_blocks(&document);
        assert_eq!(blocks.len(), 1);
        extract_listing(blocks[0])
    }

    const FULL_OPTIONS: &str = r#"<div class="options">
        <div><span>2015</span></div>
        <div><span>80 000 Km</span></div>
        <div><span>Diesel</span></div>
        <div><span>Automatique</span></div>
    </div>"#;

    #[test]
    fn test_extract_full_block() {
        let html = block(&format!(
            r#"<h3 class="lib-car"> Toyota Corolla </h3><div class="price">45 000 DT</div>{FULL_OPTIONS}"#
        ));
        let listing = extract_one(&html).unwrap();
        assert_eq!(listing.full_name.as_deref(), Some("Toyota Corolla"));
        assert_eq!(listing.brand, "Toyota");
        assert_eq!(listing.model.as_deref(), Some("Corolla"));
        assert_eq!(listing.price.as_deref(), Some("45000"));
        assert_eq!(listing.year.as_deref(), Some("2015"));
        assert_eq!(listing.mileage.as_deref(), Some("80000"));
        assert_eq!(listing.fuel.as_deref(), Some("Diesel"));
        assert_eq!(listing.transmission.as_deref(), Some("Automatique"));
    }

    #[test]
    fn test_missing_options_container_skips() {
        let html = block(r#"<h3 class="lib-car">Toyota Corolla</h3><div class="price">45 000 DT</div>"#);
        assert_eq!(extract_one(&html), Err(SkipReason::MissingOptions));
    }

    #[test]
    fn test_too_few_option_sections_skips() {
        let html = block(
            r#"<h3 class="lib-car">Kia Picanto</h3>
            <div class="options"><div><span>2019</span></div><div><span>12 000 Km</span></div><div><span>Essence</span></div></div>"#,
        );
        assert_eq!(
            extract_one(&html),
            Err(SkipReason::TooFewOptions {
                found: 3,
                required: 4
            })
        );
    }

    #[test]
    fn test_empty_options_container_skips() {
        let html = block(r#"<h3 class="lib-car">Kia Picanto</h3><div class="options"></div>"#);
        assert!(matches!(
            extract_one(&html),
            Err(SkipReason::TooFewOptions { found: 0, .. })
        ));
    }

    #[test]
    fn test_missing_title_and_price_are_soft() {
        let html = block(FULL_OPTIONS);
        let listing = extract_one(&html).unwrap();
        assert_eq!(listing.full_name, None);
        assert_eq!(listing.brand, UNKNOWN);
        assert_eq!(listing.model, None);
        assert_eq!(listing.price, None);
        assert_eq!(listing.year.as_deref(), Some("2015"));
    }

    #[test]
    fn test_missing_label_only_affects_its_field() {
        let html = block(
            r#"<h3 class="lib-car">Peugeot 208</h3>
            <div class="options">
                <div><span>2020</span></div>
                <div></div>
                <div><span>Essence</span></div>
                <div><em>Manuelle</em></div>
            </div>"#,
        );
        let listing = extract_one(&html).unwrap();
        assert_eq!(listing.year.as_deref(), Some("2020"));
        assert_eq!(listing.mileage, None);
        assert_eq!(listing.fuel.as_deref(), Some("Essence"));
        assert_eq!(listing.transmission, None);
    }

    #[test]
    fn test_extra_sections_are_ignored() {
        let html = block(
            r#"<h3 class="lib-car">Renault Clio</h3>
            <div class="options">
                <div><span>2018</span></div>
                <div><span>95 500 Km</span></div>
                <div><span>Diesel</span></div>
                <div><span>Manuelle</span></div>
                <div><span>5 portes</span></div>
            </div>"#,
        );
        let listing = extract_one(&html).unwrap();
        assert_eq!(listing.mileage.as_deref(), Some("95500"));
        assert_eq!(listing.transmission.as_deref(), Some("Manuelle"));
    }

    #[test]
    fn test_price_with_narrow_no_break_space() {
        let html = block(&format!(
            "<h3 class=\"lib-car\">Seat Ibiza</h3><div class=\"price\">38\u{202f}500 DT</div>{FULL_OPTIONS}"
        ));
        assert_eq!(extract_one(&html).unwrap().price.as_deref(), Some("38500"));
    }

    #[test]
    fn test_extract_page_counts_all_blocks() {
        let good = format!(
            r#"<div class="box-product listing-item effect-item h-100"><h3 class="lib-car">Toyota Yaris</h3>{FULL_OPTIONS}</div>"#
        );
        let bad = r#"<div class="box-product listing-item effect-item h-100"><h3 class="lib-car">Fiat Tipo</h3></div>"#;
        let other = r#"<div class="box-product"><h3 class="lib-car">Not a listing</h3></div>"#;
        let html = format!("<html><body>{bad}{good}{other}</body></html>");

        let (found, listings) = extract_page(&html);
        assert_eq!(found, 2);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].brand, "Toyota");
    }

    #[test]
    fn test_extract_page_without_blocks() {
        let (found, listings) = extract_page("<html><body><p>Aucun résultat</p></body></html>");
        assert_eq!(found, 0);
        assert!(listings.is_empty());
    }

    #[test]
    fn test_option_slots_required() {
        assert_eq!(OPTION_SLOTS.required(), 4);
    }
}
