use crate::domain::filter::HalfBathPolicy;
use crate::domain::listing::Listing;
use crate::errors::ServerError;
use rust_xlsxwriter::{Format, Workbook};

/// Column order is fixed; downstream outreach sheets rely on it.
pub const EXPORT_HEADERS: [&str; 10] = [
    "Address",
    "City",
    "State",
    "Zip",
    "URL",
    "Price",
    "Beds",
    "Baths",
    "Distance (mi)",
    "Agent Email",
];

/// One row per listing; unknown price, distance and email stay blank.
/// An empty slice gives a header-only sheet.
pub fn export_listings_xlsx(
    listings: &[Listing],
    half_baths: HalfBathPolicy,
) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    // Headers
    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    // Rows
    for (i, listing) in listings.iter().enumerate() {
        let r = (i + 1) as u32;
        let address = &listing.address;

        worksheet
            .write_string(r, 0, address.street_line())
            .map_err(|e| ServerError::XlsxError(format!("Failed to write address: {}", e)))?;

        worksheet
            .write_string(r, 1, &address.city)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write city: {}", e)))?;

        worksheet
            .write_string(r, 2, &address.region)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write state: {}", e)))?;

        worksheet
            .write_string(r, 3, &address.postal_code)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write postal code: {}", e)))?;

        worksheet
            .write_string(r, 4, &listing.identity)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write url: {}", e)))?;

        if let Some(price) = listing.list_price {
            worksheet
                .write_number(r, 5, price as f64)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write price: {}", e)))?;
        }

        worksheet
            .write_number(r, 6, f64::from(listing.beds))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write bedrooms: {}", e)))?;

        worksheet
            .write_number(r, 7, listing.total_baths(half_baths))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write bathrooms: {}", e)))?;

        if let Some(distance) = listing.distance_miles {
            worksheet
                .write_number(r, 8, (distance * 10.0).round() / 10.0)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write distance: {}", e)))?;
        }

        if let Some(email) = &listing.agent.email {
            worksheet
                .write_string(r, 9, email)
                .map_err(|e| ServerError::XlsxError(format!("Failed to write agent email: {}", e)))?;
        }
    }

    for (col, width) in [(0u16, 32), (4, 48), (9, 28)] {
        worksheet
            .set_column_width(col, width)
            .map_err(|e| ServerError::XlsxError(format!("Failed to size columns: {}", e)))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalize::normalize;
    use crate::tests::utils::{text, xlsx_rows};
    use calamine::Data;
    use serde_json::json;

    fn header_row() -> Vec<Data> {
        EXPORT_HEADERS.iter().map(|h| text(h)).collect()
    }

    #[test]
    fn header_covers_required_columns() {
        for required in ["Address", "URL", "Price", "Beds", "Baths", "Distance (mi)", "Agent Email"] {
            assert!(EXPORT_HEADERS.contains(&required), "missing {required}");
        }
        assert_eq!(EXPORT_HEADERS[0], "Address");
        assert_eq!(EXPORT_HEADERS[9], "Agent Email");
    }

    #[test]
    fn empty_selection_is_header_only() {
        let buffer = export_listings_xlsx(&[], HalfBathPolicy::WholeUnit).unwrap();
        let rows = xlsx_rows(buffer);

        assert_eq!(rows, vec![header_row()]);
    }

    #[test]
    fn exports_listings_with_missing_fields() {
        let mut located = normalize(
            json!({
                "property_url": "https://example.com/1",
                "street": "2400 N Lincoln Ave",
                "city": "Chicago",
                "state": "IL",
                "zip_code": "60614",
                "list_price": 2150,
                "beds": 2,
                "full_baths": 1,
                "half_baths": 1,
                "agent_email": "pat@example.com"
            })
            .as_object()
            .unwrap(),
        );
        located.distance_miles = Some(3.04);

        let bare = normalize(json!({}).as_object().unwrap());
        let bare_identity = bare.identity.clone();

        let buffer = export_listings_xlsx(&[located, bare], HalfBathPolicy::HalfUnit).unwrap();
        let rows = xlsx_rows(buffer);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], header_row());
        assert_eq!(
            rows[1],
            vec![
                text("2400 N Lincoln Ave"),
                text("Chicago"),
                text("IL"),
                text("60614"),
                text("https://example.com/1"),
                Data::Float(2150.0),
                Data::Float(2.0),
                Data::Float(1.5),
                Data::Float(3.0),
                text("pat@example.com"),
            ]
        );

        // unknown price, distance and email are blank, never zero
        let bare_row = &rows[2];
        assert_eq!(bare_row[4], text(&bare_identity));
        assert_eq!(bare_row[5], Data::Empty);
        assert_eq!(bare_row[6], Data::Float(0.0));
        assert_eq!(bare_row[7], Data::Float(0.0));
        assert_eq!(bare_row[8], Data::Empty);
        assert_eq!(bare_row[9], Data::Empty);
    }
}
