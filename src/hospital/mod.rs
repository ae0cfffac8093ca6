mod requests;
mod responses;

use crate::{
    auth::{hash_password, AuthHospital, TokenKeys},
    config::Config,
    database::{get_db_conn, lookup},
    limiter::RateLimiter,
    models::{
        hospitals::{Hospital, NewHospital, DISPLAY_TOTAL_BEDS},
        opd_queue::QUEUE_STATUS_WAITING,
    },
    opd::utils::average_wait_time_str,
    protocol::{ApiError, ApiResult},
    DbPool,
};
use actix_web::{get, post, web, HttpRequest};
use anyhow::Context;
use chrono::Utc;
use diesel::prelude::*;

use self::{requests::*, responses::*};

/// Registered at the application root: the listing lives at `/hospital` itself.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list).service(create).service(info);
}

crate::api_funcs! {
    get(list, "/hospital", pool: web::Data<DbPool>),
    post(create, "/hospital/create", req: HttpRequest, pool: web::Data<DbPool>, config: web::Data<Config>,
        keys: web::Data<TokenKeys>, limiter: web::Data<RateLimiter>),
    get(info, "/hospital/info", pool: web::Data<DbPool>, hospital: AuthHospital),
}

async fn list_impl(pool: web::Data<DbPool>) -> ApiResult<ListResponse> {
    use crate::schema::hospitals;

    let mut conn = get_db_conn(&pool)?;
    let rows = web::block(move || {
        hospitals::table
            .select((hospitals::id, hospitals::name))
            .order(hospitals::name.asc())
            .load::<(i32, String)>(&mut conn)
    })
    .await?
    .context("DB error")?;

    Ok(ListResponse {
        hospitals: rows
            .into_iter()
            .map(|(id, name)| HospitalItem { id, name })
            .collect(),
    })
}

async fn create_impl(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    keys: web::Data<TokenKeys>,
    limiter: web::Data<RateLimiter>,
) -> ApiResult<CreateResponse> {
    use crate::schema::hospitals;

    let client = req
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    limiter.check(&client)?;

    // parsed after the limiter so malformed attempts still count
    let query = web::Query::<CreateQuery>::from_query(req.query_string())
        .map_err(|e| ApiError::validation(format!("Invalid query string: {}", e)))?
        .into_inner();
    let name = query.name.trim().to_string();
    let email = query.email.trim().to_lowercase();
    if name.is_empty() || query.password.is_empty() {
        return Err(ApiError::validation("Name and password are required"));
    }
    if !email.contains('@') {
        return Err(ApiError::validation("Invalid email"));
    }

    let data = NewHospital {
        name,
        email,
        password: hash_password(&query.password),
        max_queue_size: config.default_max_queue_size,
        max_beds: config.default_max_beds,
        next_queue_number: 1,
        created_at: Utc::now().naive_utc(),
    };

    let mut conn = get_db_conn(&pool)?;
    let hospital = web::block(move || {
        conn.immediate_transaction::<_, ApiError, _>(|conn| {
            lookup::assert_email_unused(conn, &data.email)?;

            diesel::insert_into(hospitals::table)
                .values(&data)
                .execute(conn)
                .context("DB error")?;

            let hospital = hospitals::table
                .filter(hospitals::email.eq(&data.email))
                .select(Hospital::as_select())
                .get_result::<Hospital>(conn)
                .context("DB error")?;
            Ok(hospital)
        })
    })
    .await??;

    log::info!("registered hospital {} ({})", hospital.name, hospital.id);

    let token = keys.issue(hospital.id)?;
    Ok(CreateResponse {
        message: "Admin created, go and login".to_string(),
        token,
    })
}

async fn info_impl(pool: web::Data<DbPool>, hospital: AuthHospital) -> ApiResult<InfoResponse> {
    use crate::schema::{bed_bookings, opd_queue};

    let mut conn = get_db_conn(&pool)?;
    let hospital_id = hospital.0;
    let (hospital, waiting, bookings) = web::block(move || {
        let hospital = lookup::get_hospital(&mut conn, hospital_id)?;

        let waiting = opd_queue::table
            .filter(opd_queue::hospital_id.eq(hospital_id))
            .filter(opd_queue::status.eq(QUEUE_STATUS_WAITING))
            .count()
            .get_result::<i64>(&mut conn)
            .context("DB error")?;

        let bookings = bed_bookings::table
            .filter(bed_bookings::hospital_id.eq(hospital_id))
            .count()
            .get_result::<i64>(&mut conn)
            .context("DB error")?;

        Ok::<_, ApiError>((hospital, waiting, bookings))
    })
    .await??;

    Ok(InfoResponse {
        name: hospital.name,
        email: hospital.email,
        max_queue_size: hospital.max_queue_size,
        max_beds: hospital.max_beds,
        current_stats: CurrentStats {
            patients_in_queue: waiting,
            available_beds: DISPLAY_TOTAL_BEDS - bookings,
            total_beds: DISPLAY_TOTAL_BEDS,
            average_wait_time: average_wait_time_str(waiting),
        },
    })
}
