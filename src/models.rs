//! Data models for scraped and normalized car listings.
//!
//! - [`RawListing`]: free-text fields as pulled from one listing block
//! - [`Listing`]: the cleaned, fixed-schema row written to the outputs
//!
//! Fields that could not be determined are `None` in memory and are rendered
//! as [`UNKNOWN`] whenever a record is serialized.

use serde::{Serialize, Serializer};

/// Marker written in place of any value that could not be determined.
pub const UNKNOWN: &str = "N/A";

/// Output column names, in the order they appear in every persisted table.
///
/// [`Listing`]'s field order and serde renames must stay in step with this list.
pub const COLUMNS: [&str; 9] = [
    "Nom Total",
    "Marque",
    "Modele",
    "Annee",
    "Age (Years)",
    "Kilometrage (Km)",
    "Carburant",
    "Boite",
    "Prix (DT)",
];

/// One listing as scraped, before any numeric cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawListing {
    /// Full display name, e.g. `"Toyota Corolla"`.
    pub full_name: Option<String>,
    /// First whitespace-delimited token of the full name.
    ///
    /// Always present: when the name itself is unknown, the brand is the marker.
    pub brand: String,
    /// Everything after the brand.
    pub model: Option<String>,
    pub fuel: Option<String>,
    pub transmission: Option<String>,
    /// Price text with whitespace and currency token removed.
    pub price: Option<String>,
    /// Mileage text with the unit token and whitespace removed.
    pub mileage: Option<String>,
    pub year: Option<String>,
}

impl RawListing {
    /// Build a record from a full name, deriving brand and model from it.
    pub fn with_name(full_name: Option<String>) -> Self {
        let (brand, model) = split_name(full_name.as_deref());
        Self {
            full_name,
            brand,
            model,
            fuel: None,
            transmission: None,
            price: None,
            mileage: None,
            year: None,
        }
    }
}

/// Split a display name on its first whitespace boundary into brand and model.
///
/// ```ignore
/// assert_eq!(split_name(Some("Toyota Corolla Cross")), ("Toyota".into(), Some("Corolla Cross".into())));
/// assert_eq!(split_name(Some("Dacia")), ("Dacia".into(), None));
/// ```
pub fn split_name(full_name: Option<&str>) -> (String, Option<String>) {
    let Some(name) = full_name.map(str::trim).filter(|n| !n.is_empty()) else {
        return (UNKNOWN.to_string(), None);
    };
    match name.split_once(char::is_whitespace) {
        Some((brand, rest)) => {
            let rest = rest.trim();
            let model = (!rest.is_empty()).then(|| rest.to_string());
            (brand.to_string(), model)
        }
        None => (name.to_string(), None),
    }
}

/// A cleaned listing row.
///
/// The CSV writer renders it with [`Listing::to_row`]. The JSON export goes
/// through serde, whose renames produce the same [`COLUMNS`] keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    #[serde(rename = "Nom Total", serialize_with = "or_unknown")]
    pub full_name: Option<String>,
    #[serde(rename = "Marque")]
    pub brand: String,
    #[serde(rename = "Modele", serialize_with = "or_unknown")]
    pub model: Option<String>,
    /// Digits only.
    #[serde(rename = "Annee", serialize_with = "or_unknown")]
    pub year: Option<String>,
    /// Current calendar year minus [`Listing::year`].
    ///
    /// Not restricted to digits: a model year ahead of the reference year
    /// gives a negative age (e.g. `-4`), which is written out unclamped.
    #[serde(rename = "Age (Years)", serialize_with = "or_unknown")]
    pub age: Option<i32>,
    /// Digits only, in kilometers.
    #[serde(rename = "Kilometrage (Km)", serialize_with = "or_unknown")]
    pub mileage_km: Option<String>,
    #[serde(rename = "Carburant", serialize_with = "or_unknown")]
    pub fuel: Option<String>,
    #[serde(rename = "Boite", serialize_with = "or_unknown")]
    pub transmission: Option<String>,
    /// Digits only, in dinars.
    #[serde(rename = "Prix (DT)", serialize_with = "or_unknown")]
    pub price: Option<String>,
}

impl Listing {
    /// Render the row as strings in [`COLUMNS`] order.
    pub fn to_row(&self) -> [String; 9] {
        fn cell<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map_or_else(|| UNKNOWN.to_string(), T::to_string)
        }
        [
            cell(&self.full_name),
            self.brand.clone(),
            cell(&self.model),
            cell(&self.year),
            cell(&self.age),
            cell(&self.mileage_km),
            cell(&self.fuel),
            cell(&self.transmission),
            cell(&self.price),
        ]
    }
}

fn or_unknown<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: ToString,
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_str(&v.to_string()),
        None => serializer.serialize_str(UNKNOWN),
    }
}
