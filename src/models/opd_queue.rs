use crate::schema::opd_queue;
use chrono::NaiveDateTime;

/// Columns shown in the staff queue listing.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = opd_queue)]
pub struct QueueEntry {
    pub patient_name: String,
    pub queue_number: i32,
    pub status: String,
}

#[derive(Insertable)]
#[diesel(table_name = opd_queue)]
pub struct NewQueueEntry {
    pub hospital_id: i32,
    pub patient_name: String,
    pub age: i32,
    pub gender: String,
    pub phone: String,
    pub symptoms: String,
    pub queue_number: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
}

pub const QUEUE_STATUS_WAITING: &str = "waiting";
pub const QUEUE_STATUS_COMPLETED: &str = "Completed";
