//! Booking repository

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::DbPool;
use crate::flow::BookingDraft;
use crate::pricing::Price;
use crate::{Error, Result};

/// Date format used for check-in/check-out columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format used for the booking date column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SELECT_COLUMNS: &str = "SELECT id, user_name, hotel_name, hotel_address, check_in, \
     check_out, price, rating, booked_at FROM bookings";

/// Booking row as stored, before parsing
struct BookingRow {
    id: String,
    user_name: String,
    hotel_name: String,
    hotel_address: String,
    check_in: String,
    check_out: String,
    price: String,
    rating: f64,
    booked_at: String,
}

impl BookingRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_name: row.get(1)?,
            hotel_name: row.get(2)?,
            hotel_address: row.get(3)?,
            check_in: row.get(4)?,
            check_out: row.get(5)?,
            price: row.get(6)?,
            rating: row.get(7)?,
            booked_at: row.get(8)?,
        })
    }

    fn into_draft(self) -> Result<BookingDraft> {
        let corrupt = |field: &str, e: &dyn std::fmt::Display| {
            Error::Database(format!("booking {}: invalid {field}: {e}", self.id))
        };

        let id = Uuid::parse_str(&self.id).map_err(|e| corrupt("id", &e))?;
        let check_in =
            NaiveDate::parse_from_str(&self.check_in, DATE_FORMAT).map_err(|e| corrupt("check_in", &e))?;
        let check_out = NaiveDate::parse_from_str(&self.check_out, DATE_FORMAT)
            .map_err(|e| corrupt("check_out", &e))?;
        let price = self
            .price
            .parse::<Decimal>()
            .map(Price::new)
            .map_err(|e| corrupt("price", &e))?;
        let booking_timestamp = NaiveDateTime::parse_from_str(&self.booked_at, TIMESTAMP_FORMAT)
            .map_err(|e| corrupt("booked_at", &e))?;

        Ok(BookingDraft {
            id,
            user_name: self.user_name,
            hotel_name: self.hotel_name,
            hotel_address: self.hotel_address,
            check_in,
            check_out,
            price,
            rating: self.rating,
            booking_timestamp,
        })
    }
}

/// Booking repository
#[derive(Clone)]
pub struct BookingRepo {
    pool: DbPool,
}

impl BookingRepo {
    /// Create a new booking repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a booking
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn insert(&self, draft: &BookingDraft) -> Result<()> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        conn.execute(
            "INSERT INTO bookings (id, user_name, hotel_name, hotel_address, check_in, check_out, \
             price, rating, booked_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                draft.id.to_string(),
                draft.user_name,
                draft.hotel_name,
                draft.hotel_address,
                draft.check_in.format(DATE_FORMAT).to_string(),
                draft.check_out.format(DATE_FORMAT).to_string(),
                draft.price.to_string(),
                draft.rating,
                draft.booking_timestamp.format(TIMESTAMP_FORMAT).to_string(),
            ],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    /// List all bookings, oldest first
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails or a row is corrupt
    pub fn list_all(&self) -> Result<Vec<BookingDraft>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY seq ASC"))
            .map_err(|e| Error::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], BookingRow::from_row)
            .map_err(|e| Error::Database(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(BookingRow::into_draft).collect()
    }

    /// Find a booking by ID
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails or the row is corrupt
    pub fn find(&self, id: Uuid) -> Result<Option<BookingDraft>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let result = conn.query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            [id.to_string()],
            BookingRow::from_row,
        );

        match result {
            Ok(row) => row.into_draft().map(Some),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Number of stored bookings
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn count(&self) -> Result<usize> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory;

    fn draft(user: &str, hotel: &str) -> BookingDraft {
        BookingDraft {
            id: Uuid::new_v4(),
            user_name: user.to_string(),
            hotel_name: hotel.to_string(),
            hotel_address: "MG Road".to_string(),
            check_in: NaiveDate::from_ymd_opt(2026, 12, 20).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2026, 12, 22).unwrap(),
            price: Price::new("980.00".parse().unwrap()),
            rating: 4.5,
            booking_timestamp: NaiveDate::from_ymd_opt(2026, 10, 16)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_insert_and_find() {
        let repo = BookingRepo::new(init_memory().unwrap());
        let booking = draft("Asha", "Taj");

        repo.insert(&booking).unwrap();

        let found = repo.find(booking.id).unwrap().unwrap();
        assert_eq!(found, booking);
        assert!(repo.find(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_find_propagates_database_errors() {
        let pool = init_memory().unwrap();
        pool.get()
            .unwrap()
            .execute("DROP TABLE bookings", [])
            .unwrap();

        let repo = BookingRepo::new(pool);
        assert!(matches!(repo.find(Uuid::new_v4()), Err(Error::Sqlite(_))));
    }

    #[test]
    fn test_list_all_in_insertion_order() {
        let repo = BookingRepo::new(init_memory().unwrap());
        repo.insert(&draft("Asha", "Taj")).unwrap();
        repo.insert(&draft("Ravi", "Oberoi")).unwrap();
        repo.insert(&draft("Meera", "Leela")).unwrap();

        let hotels: Vec<String> = repo
            .list_all()
            .unwrap()
            .into_iter()
            .map(|b| b.hotel_name)
            .collect();

        assert_eq!(hotels, vec!["Taj", "Oberoi", "Leela"]);
        assert_eq!(repo.count().unwrap(), 3);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let repo = BookingRepo::new(init_memory().unwrap());
        let booking = draft("Asha", "Taj");

        repo.insert(&booking).unwrap();
        assert!(repo.insert(&booking).is_err());
    }
}
