mod requests;
mod responses;
mod utils;

use crate::{
    auth::AuthHospital,
    database::{get_db_conn, lookup},
    models::bed_bookings::{
        BedBooking, NewBedBooking, BED_STATUSES_COUNTED, BED_STATUS_AVAILABLE, BED_STATUS_PENDING,
    },
    protocol::{ApiError, ApiResult, MessageResponse},
    utils::{format_date, format_display_number, parse_display_number},
    DbPool,
};
use actix_web::{get, post, put, web};
use anyhow::Context;
use chrono::Utc;
use diesel::prelude::*;

use self::{
    requests::*,
    responses::*,
    utils::{lowest_free_bed, parse_bed_status},
};

const LATEST_LIMIT: i64 = 10;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(book).service(latest).service(modify);
}

crate::api_funcs! {
    post(book, "/book", pool: web::Data<DbPool>, info: web::Json<BookRequest>),
    get(latest, "/latest", pool: web::Data<DbPool>, hospital: AuthHospital),
    put(modify, "/modify", pool: web::Data<DbPool>, hospital: AuthHospital, info: web::Json<ModifyRequest>),
}

async fn book_impl(pool: web::Data<DbPool>, info: web::Json<BookRequest>) -> ApiResult<BookResponse> {
    use crate::schema::bed_bookings;

    let info = info.into_inner();
    let hospital_name = info.hospital.clone();

    let mut conn = get_db_conn(&pool)?;
    let bed_number = web::block(move || {
        conn.immediate_transaction::<_, ApiError, _>(|conn| {
            let hospital = lookup::get_hospital_by_name(conn, &info.hospital)?;

            let res = bed_bookings::table
                .filter(bed_bookings::hospital_id.eq(hospital.id))
                .filter(bed_bookings::status.eq_any(BED_STATUSES_COUNTED))
                .count()
                .get_result::<i64>(conn)
                .context("DB error")?;
            if res >= i64::from(hospital.max_beds) {
                return Err(ApiError::capacity_exceeded("No beds available"));
            }

            // occupied/reserved/maintenance beds are not counted above but
            // still keep their number
            let held = bed_bookings::table
                .filter(bed_bookings::hospital_id.eq(hospital.id))
                .filter(bed_bookings::status.ne(BED_STATUS_AVAILABLE))
                .select(bed_bookings::bed_number)
                .load::<i32>(conn)
                .context("DB error")?;
            let bed_number = lowest_free_bed(&held, hospital.max_beds)
                .ok_or_else(|| ApiError::capacity_exceeded("No beds available"))?;

            let data = NewBedBooking {
                hospital_id: hospital.id,
                patient_name: info.name,
                age: info.age,
                gender: info.gender,
                phone: info.phone_no,
                bed_number,
                reason: info.reason,
                status: BED_STATUS_PENDING.to_string(),
                created_at: Utc::now().naive_utc(),
            };
            diesel::insert_into(bed_bookings::table)
                .values(&data)
                .execute(conn)
                .context("DB error")?;

            Ok(bed_number)
        })
    })
    .await??;

    log::info!("bed {} booked at {}", bed_number, hospital_name);

    Ok(BookResponse {
        message: "Successfully booked a bed".to_string(),
        bed_no: format_display_number(bed_number),
    })
}

async fn latest_impl(pool: web::Data<DbPool>, hospital: AuthHospital) -> ApiResult<Vec<BedItem>> {
    use crate::schema::bed_bookings;

    let mut conn = get_db_conn(&pool)?;
    let hospital_id = hospital.0;
    let bookings = web::block(move || {
        bed_bookings::table
            .filter(bed_bookings::hospital_id.eq(hospital_id))
            .order((bed_bookings::created_at.desc(), bed_bookings::id.desc()))
            .limit(LATEST_LIMIT)
            .select(BedBooking::as_select())
            .get_results::<BedBooking>(&mut conn)
    })
    .await?
    .context("DB error")?;

    let bookings = bookings
        .into_iter()
        .map(|data| BedItem {
            bed_no: format_display_number(data.bed_number),
            name: data.patient_name,
            admission_date: format_date(&data.created_at),
            status: data.status,
        })
        .collect();

    Ok(bookings)
}

/// Only the newest booking for a bed number can still hold it, so that is
/// the one updated.
async fn modify_impl(
    pool: web::Data<DbPool>,
    hospital: AuthHospital,
    info: web::Json<ModifyRequest>,
) -> ApiResult<MessageResponse> {
    use crate::schema::bed_bookings;

    let info = info.into_inner();
    let status =
        parse_bed_status(&info.status).ok_or_else(|| ApiError::validation("Invalid status"))?;
    let bed_number = parse_display_number(&info.bed_no)
        .ok_or_else(|| ApiError::validation("Invalid bed number"))?;

    let mut conn = get_db_conn(&pool)?;
    let hospital_id = hospital.0;
    web::block(move || {
        conn.immediate_transaction::<_, ApiError, _>(|conn| {
            let booking_id = bed_bookings::table
                .filter(bed_bookings::hospital_id.eq(hospital_id))
                .filter(bed_bookings::bed_number.eq(bed_number))
                .order((bed_bookings::created_at.desc(), bed_bookings::id.desc()))
                .select(bed_bookings::id)
                .first::<i32>(conn)
                .optional()
                .context("DB error")?;

            if let Some(booking_id) = booking_id {
                diesel::update(bed_bookings::table.filter(bed_bookings::id.eq(booking_id)))
                    .set(bed_bookings::status.eq(status))
                    .execute(conn)
                    .context("DB error")?;
            } else {
                log::debug!("no booking holds bed {}", bed_number);
            }

            Ok(())
        })
    })
    .await??;

    Ok(MessageResponse::ok())
}
