//! Booking receipts

use std::path::{Path, PathBuf};

use crate::db::booking::{DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::flow::BookingDraft;
use crate::{Error, Result};

/// File name of the receipt; each booking overwrites the previous one
pub const RECEIPT_FILE: &str = "receipt.txt";

/// Produces a receipt document for a booking
pub trait ReceiptWriter: Send + Sync {
    /// Write the receipt and return where it was written
    ///
    /// # Errors
    ///
    /// Returns error if the receipt cannot be written
    fn write(&self, draft: &BookingDraft) -> Result<PathBuf>;
}

/// Render the fixed-format receipt text
#[must_use]
pub fn render(draft: &BookingDraft) -> String {
    format!(
        "HOTEL BOOKING RECEIPT\n\
         --------------------------\n\
         Name: {}\n\
         Hotel: {}\n\
         Address: {}\n\
         Check-in: {}\n\
         Check-out: {}\n\
         Price: ₹{}\n\
         Rating: {:?}\n\
         Booking Date: {}\n\
         --------------------------\n\
         Thank you for booking!\n",
        draft.user_name,
        draft.hotel_name,
        draft.hotel_address,
        draft.check_in.format(DATE_FORMAT),
        draft.check_out.format(DATE_FORMAT),
        draft.price,
        draft.rating,
        draft.booking_timestamp.format(TIMESTAMP_FORMAT),
    )
}

/// Writes `receipt.txt` into a fixed directory
pub struct FileReceiptWriter {
    dir: PathBuf,
}

impl FileReceiptWriter {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(RECEIPT_FILE)
    }
}

impl ReceiptWriter for FileReceiptWriter {
    fn write(&self, draft: &BookingDraft) -> Result<PathBuf> {
        let path = self.path();
        write_text(&path, &render(draft))?;

        tracing::info!(path = %path.display(), booking_id = %draft.id, "receipt written");
        Ok(path)
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)
        .map_err(|e| Error::Receipt(format!("failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::pricing::Price;

    fn draft() -> BookingDraft {
        BookingDraft {
            id: Uuid::new_v4(),
            user_name: "Asha Rao".to_string(),
            hotel_name: "Taj".to_string(),
            hotel_address: "MG Road".to_string(),
            check_in: NaiveDate::from_ymd_opt(2026, 12, 20).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 12, 22).unwrap(),
            price: Price::new("980".parse().unwrap()),
            rating: 4.5,
            booking_timestamp: NaiveDate::from_ymd_opt(2026, 10, 16)
                .unwrap()
                .and_hms_opt(9, 5, 7)
                .unwrap(),
        }
    }

    #[test]
    fn test_render_matches_template() {
        let expected = "\
HOTEL BOOKING RECEIPT
--------------------------
Name: Asha Rao
Hotel: Taj
Address: MG Road
Check-in: 2026-12-20
Check-out: 2026-12-22
Price: ₹980.00
Rating: 4.5
Booking Date: 2026-10-16 09:05:07
--------------------------
Thank you for booking!
";
        assert_eq!(render(&draft()), expected);
    }

    #[test]
    fn test_whole_ratings_keep_one_decimal() {
        let mut whole = draft();
        whole.rating = 4.0;
        assert!(render(&whole).contains("\nRating: 4.0\n"));

        whole.rating = 0.0;
        assert!(render(&whole).contains("\nRating: 0.0\n"));
    }

    #[test]
    fn test_write_overwrites_previous_receipt() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileReceiptWriter::new(dir.path());

        let mut first = draft();
        first.hotel_name = "Oberoi".to_string();
        writer.write(&first).unwrap();

        let path = writer.write(&draft()).unwrap();
        assert_eq!(path, dir.path().join(RECEIPT_FILE));

        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("Hotel: Taj\n"));
        assert!(!text.contains("Oberoi"));
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let writer = FileReceiptWriter::new("/nonexistent/receipts");
        assert!(matches!(writer.write(&draft()), Err(Error::Receipt(_))));
    }
}
