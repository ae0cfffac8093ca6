use crate::schema::bed_bookings;
use chrono::NaiveDateTime;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = bed_bookings)]
pub struct BedBooking {
    pub patient_name: String,
    pub bed_number: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = bed_bookings)]
pub struct NewBedBooking {
    pub hospital_id: i32,
    pub patient_name: String,
    pub age: i32,
    pub gender: String,
    pub phone: String,
    pub bed_number: i32,
    pub reason: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

pub const BED_STATUS_PENDING: &str = "pending";
pub const BED_STATUS_APPROVED: &str = "approved";
pub const BED_STATUS_OCCUPIED: &str = "Occupied";
pub const BED_STATUS_AVAILABLE: &str = "Available";
pub const BED_STATUS_RESERVED: &str = "Reserved";
pub const BED_STATUS_MAINTENANCE: &str = "Maintenance";

/// Statuses counted against `max_beds` when a new booking arrives.
pub const BED_STATUSES_COUNTED: [&str; 2] = [BED_STATUS_PENDING, BED_STATUS_APPROVED];

