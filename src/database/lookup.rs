use anyhow::Context;
use diesel::prelude::*;

use crate::{
    models::hospitals::Hospital,
    protocol::{ApiError, ApiResult},
};

pub fn get_hospital(conn: &mut SqliteConnection, hospital_id: i32) -> ApiResult<Hospital> {
    use crate::schema::hospitals;

    hospitals::table
        .filter(hospitals::id.eq(hospital_id))
        .select(Hospital::as_select())
        .get_result::<Hospital>(conn)
        .optional()
        .context("DB error")?
        .ok_or_else(|| ApiError::not_found("Hospital not found"))
}

pub fn get_hospital_by_name(conn: &mut SqliteConnection, name: &str) -> ApiResult<Hospital> {
    use crate::schema::hospitals;

    hospitals::table
        .filter(hospitals::name.eq(name))
        .order(hospitals::id.asc())
        .select(Hospital::as_select())
        .first::<Hospital>(conn)
        .optional()
        .context("DB error")?
        .ok_or_else(|| ApiError::not_found("Hospital not found"))
}

pub fn get_hospital_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> ApiResult<Option<Hospital>> {
    use crate::schema::hospitals;

    let hospital = hospitals::table
        .filter(hospitals::email.eq(email))
        .select(Hospital::as_select())
        .get_result::<Hospital>(conn)
        .optional()
        .context("DB error")?;
    Ok(hospital)
}

pub fn assert_email_unused(conn: &mut SqliteConnection, email: &str) -> ApiResult<()> {
    use crate::schema::hospitals;

    let res = hospitals::table
        .filter(hospitals::email.eq(email))
        .count()
        .get_result::<i64>(conn)
        .context("DB error")?;
    if res > 0 {
        return Err(ApiError::conflict("Hospital already exists"));
    }

    Ok(())
}
