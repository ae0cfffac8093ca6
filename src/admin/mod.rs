mod requests;
mod responses;

use crate::{
    auth::{hash_password, TokenKeys},
    database::{get_db_conn, lookup},
    protocol::{ApiError, ApiResult},
    DbPool,
};
use actix_web::{post, web};

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login);
}

crate::api_funcs! {
    post(login, "/login", pool: web::Data<DbPool>, keys: web::Data<TokenKeys>, info: web::Json<LoginRequest>),
}

async fn login_impl(
    pool: web::Data<DbPool>,
    keys: web::Data<TokenKeys>,
    info: web::Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let info = info.into_inner();

    let mut conn = get_db_conn(&pool)?;
    let email = info.email.trim().to_lowercase();
    let hospital =
        web::block(move || lookup::get_hospital_by_email(&mut conn, &email)).await??;

    let hospital = match hospital {
        Some(hospital) if hospital.password == hash_password(&info.password) => hospital,
        _ => {
            log::warn!("failed login for {}", info.email);
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    let token = keys.issue(hospital.id)?;
    Ok(LoginResponse {
        token,
        hospital: hospital.name,
    })
}
