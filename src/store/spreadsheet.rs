//! Spreadsheet export of the booking ledger

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::Result;
use crate::db::booking::{DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::flow::BookingDraft;

/// Column headers, in sheet order
pub const HEADERS: [&str; 8] = [
    "Name",
    "Hotel",
    "Address",
    "Check-in",
    "Check-out",
    "Price",
    "Rating",
    "Booking Date",
];

/// Build the bookings workbook in memory
///
/// # Errors
///
/// Returns error if a cell cannot be written
pub fn bookings_workbook(bookings: &[BookingDraft]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in (0u16..).zip(HEADERS) {
        worksheet.write_string_with_format(0, col, header, &bold)?;
    }

    for (row, booking) in (1u32..).zip(bookings) {
        worksheet.write_string(row, 0, &booking.user_name)?;
        worksheet.write_string(row, 1, &booking.hotel_name)?;
        worksheet.write_string(row, 2, &booking.hotel_address)?;
        worksheet.write_string(row, 3, booking.check_in.format(DATE_FORMAT).to_string())?;
        worksheet.write_string(row, 4, booking.check_out.format(DATE_FORMAT).to_string())?;
        worksheet.write_number(row, 5, booking.price.to_f64())?;
        worksheet.write_number(row, 6, booking.rating)?;
        worksheet.write_string(
            row,
            7,
            booking.booking_timestamp.format(TIMESTAMP_FORMAT).to_string(),
        )?;
    }

    Ok(workbook)
}

/// Rewrite the spreadsheet at `path` with every booking
///
/// # Errors
///
/// Returns error if the workbook cannot be built or saved
pub fn write_bookings(path: &Path, bookings: &[BookingDraft]) -> Result<()> {
    let mut workbook = bookings_workbook(bookings)?;
    workbook.save(path)?;

    tracing::debug!(path = %path.display(), rows = bookings.len(), "spreadsheet written");
    Ok(())
}
