//! CSV table output.
//!
//! The file opens with a UTF-8 byte-order mark so spreadsheet tools pick the
//! right encoding for accented fuel and transmission labels.

use crate::models::{COLUMNS, Listing};
use crate::outputs::{SinkError, write_atomic};
use ::csv::WriterBuilder;
use std::path::Path;
use tracing::{info, instrument};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Render listings as a BOM-prefixed CSV document with the fixed header.
///
/// Rows come from [`Listing::to_row`], so cell order always follows [`COLUMNS`]
/// and unknown values are written as `N/A`.
pub fn render(listings: &[Listing]) -> Result<Vec<u8>, SinkError> {
    let mut buf = UTF8_BOM.to_vec();
    {
        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(&mut buf);
        wtr.write_record(COLUMNS)?;
        for listing in listings {
            wtr.write_record(listing.to_row())?;
        }
        wtr.flush()?;
    }
    Ok(buf)
}

/// Write listings to `path`, replacing any previous file in one step.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = listings.len()))]
pub async fn write_listings(listings: &[Listing], path: &Path) -> Result<(), SinkError> {
    let bytes = render(listings)?;
    write_atomic(path, &bytes).await?;
    info!("Data saved to CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN;

    fn corolla() -> Listing {
        Listing {
            full_name: Some("Toyota Corolla".to_string()),
            brand: "Toyota".to_string(),
            model: Some("Corolla".to_string()),
            year: Some("2015".to_string()),
            age: Some(11),
            mileage_km: Some("80000".to_string()),
            fuel: Some("Diesel".to_string()),
            transmission: Some("Automatique".to_string()),
            price: Some("45000".to_string()),
        }
    }

    fn unknown() -> Listing {
        Listing {
            full_name: None,
            brand: UNKNOWN.to_string(),
            model: None,
            year: None,
            age: None,
            mileage_km: None,
            fuel: None,
            transmission: None,
            price: None,
        }
    }

    fn lines(bytes: &[u8]) -> Vec<String> {
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_render_starts_with_bom_and_header() {
        let bytes = render(&[corolla()]).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let lines = lines(&bytes);
        assert_eq!(
            lines[0],
            "Nom Total,Marque,Modele,Annee,Age (Years),Kilometrage (Km),Carburant,Boite,Prix (DT)"
        );
        assert_eq!(
            lines[1],
            "Toyota Corolla,Toyota,Corolla,2015,11,80000,Diesel,Automatique,45000"
        );
    }

    #[test]
    fn test_render_rows_follow_column_order() {
        let bytes = render(&[unknown(), corolla()]).unwrap();
        let mut rdr = ::csv::ReaderBuilder::new().from_reader(&bytes[UTF8_BOM.len()..]);

        let header: Vec<String> = rdr.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(header, COLUMNS);

        let rows: Vec<Vec<String>> = rdr
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        assert_eq!(rows[0], vec![UNKNOWN.to_string(); 9]);
        assert_eq!(
            rows[1],
            [
                "Toyota Corolla",
                "Toyota",
                "Corolla",
                "2015",
                "11",
                "80000",
                "Diesel",
                "Automatique",
                "45000"
            ]
        );
    }

    #[test]
    fn test_render_quotes_commas() {
        let mut l = corolla();
        l.model = Some("Corolla, Hybride".to_string());
        let lines = lines(&render(&[l]).unwrap());
        assert!(lines[1].contains("\"Corolla, Hybride\""));
    }

    #[tokio::test]
    async fn test_write_listings_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("car_listings.csv");
        write_listings(&[corolla()], &path).await.unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(lines(&bytes).len(), 2);
    }
}
