use crate::schema::hospitals;
use chrono::NaiveDateTime;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = hospitals)]
pub struct Hospital {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub max_queue_size: i32,
    pub max_beds: i32,
    pub next_queue_number: i32,
}

#[derive(Insertable)]
#[diesel(table_name = hospitals)]
pub struct NewHospital {
    pub name: String,
    pub email: String,
    pub password: String,
    pub max_queue_size: i32,
    pub max_beds: i32,
    pub next_queue_number: i32,
    pub created_at: NaiveDateTime,
}

/// Total shown by the hospital dashboard, independent of `max_beds`.
pub const DISPLAY_TOTAL_BEDS: i64 = 50;
