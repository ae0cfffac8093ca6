pub mod bed_bookings;
pub mod hospitals;
pub mod opd_queue;
