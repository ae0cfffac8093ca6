mod requests;
mod responses;
pub mod utils;

use crate::{
    auth::AuthHospital,
    database::{get_db_conn, lookup},
    models::opd_queue::{NewQueueEntry, QueueEntry, QUEUE_STATUS_COMPLETED, QUEUE_STATUS_WAITING},
    protocol::{ApiError, ApiResult, MessageResponse},
    utils::{format_display_number, parse_display_number},
    DbPool,
};
use actix_web::{get, post, put, web};
use anyhow::Context;
use chrono::Utc;
use diesel::prelude::*;

use self::{
    requests::*,
    responses::*,
    utils::{wait_time_str, QueueAction},
};

const LATEST_LIMIT: i64 = 10;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(join).service(latest).service(modify);
}

crate::api_funcs! {
    post(join, "/join", pool: web::Data<DbPool>, info: web::Json<JoinRequest>),
    get(latest, "/latest", pool: web::Data<DbPool>, hospital: AuthHospital),
    put(modify, "/modify", pool: web::Data<DbPool>, hospital: AuthHospital, info: web::Json<ModifyRequest>),
}

/// Capacity check, number assignment and insert share one write-locking
/// transaction, so concurrent joins serialize on the database.
async fn join_impl(
    pool: web::Data<DbPool>,
    info: web::Json<JoinRequest>,
) -> ApiResult<JoinResponse> {
    use crate::schema::{hospitals, opd_queue};

    let info = info.into_inner();
    let hospital_name = info.hospital.clone();

    let mut conn = get_db_conn(&pool)?;
    let queue_number = web::block(move || {
        conn.immediate_transaction::<_, ApiError, _>(|conn| {
            let hospital = lookup::get_hospital_by_name(conn, &info.hospital)?;

            let res = opd_queue::table
                .filter(opd_queue::hospital_id.eq(hospital.id))
                .count()
                .get_result::<i64>(conn)
                .context("DB error")?;
            if res >= i64::from(hospital.max_queue_size) {
                return Err(ApiError::capacity_exceeded("Queue is full"));
            }

            let queue_number = hospital.next_queue_number;
            diesel::update(hospitals::table.filter(hospitals::id.eq(hospital.id)))
                .set(hospitals::next_queue_number.eq(queue_number + 1))
                .execute(conn)
                .context("DB error")?;

            let data = NewQueueEntry {
                hospital_id: hospital.id,
                patient_name: info.name,
                age: info.age,
                gender: info.gender,
                phone: info.phone_no,
                symptoms: info.symptoms,
                queue_number,
                status: QUEUE_STATUS_WAITING.to_string(),
                created_at: Utc::now().naive_utc(),
            };
            diesel::insert_into(opd_queue::table)
                .values(&data)
                .execute(conn)
                .context("DB error")?;

            Ok(queue_number)
        })
    })
    .await??;

    log::info!("queue {} assigned at {}", queue_number, hospital_name);

    Ok(JoinResponse {
        message: "Successfully registered in queue".to_string(),
        queue_no: format_display_number(queue_number),
    })
}

async fn latest_impl(pool: web::Data<DbPool>, hospital: AuthHospital) -> ApiResult<Vec<QueueItem>> {
    use crate::schema::opd_queue;

    let mut conn = get_db_conn(&pool)?;
    let hospital_id = hospital.0;
    let entries = web::block(move || {
        opd_queue::table
            .filter(opd_queue::hospital_id.eq(hospital_id))
            .order((opd_queue::created_at.desc(), opd_queue::id.desc()))
            .limit(LATEST_LIMIT)
            .select(QueueEntry::as_select())
            .get_results::<QueueEntry>(&mut conn)
    })
    .await?
    .context("DB error")?;

    let entries = entries
        .into_iter()
        .map(|data| QueueItem {
            queue_no: format_display_number(data.queue_number),
            name: data.patient_name,
            wait_time: wait_time_str(data.queue_number),
            status: data.status,
        })
        .collect();

    Ok(entries)
}

async fn modify_impl(
    pool: web::Data<DbPool>,
    hospital: AuthHospital,
    info: web::Json<ModifyRequest>,
) -> ApiResult<MessageResponse> {
    use crate::schema::opd_queue;

    let info = info.into_inner();
    let action =
        QueueAction::parse(&info.status).ok_or_else(|| ApiError::validation("Invalid status"))?;
    let queue_number = parse_display_number(&info.queue_no)
        .ok_or_else(|| ApiError::validation("Invalid queue number"))?;

    let mut conn = get_db_conn(&pool)?;
    let hospital_id = hospital.0;
    let affected = web::block(move || {
        let target = opd_queue::table
            .filter(opd_queue::hospital_id.eq(hospital_id))
            .filter(opd_queue::queue_number.eq(queue_number));
        match action {
            QueueAction::Delete => diesel::delete(target).execute(&mut conn),
            QueueAction::Complete => diesel::update(target)
                .set(opd_queue::status.eq(QUEUE_STATUS_COMPLETED))
                .execute(&mut conn),
        }
    })
    .await?
    .context("DB error")?;

    log::debug!(
        "{:?} on queue {} touched {} entries",
        action,
        queue_number,
        affected
    );

    Ok(MessageResponse::ok())
}

#[cfg(test)]
mod tests {
    use crate::{init_test_app, test_utils::TestState};
    use actix_web::{http::StatusCode, test};
    use futures::future::join_all;
    use serde_json::{json, Value};

    fn patient(hospital: &str, name: &str) -> Value {
        json!({
            "name": name,
            "age": 30,
            "gender": "female",
            "phoneNo": "9876543210",
            "symptoms": "fever",
            "hospital": hospital,
        })
    }

    #[actix_web::test]
    async fn third_join_to_a_two_place_queue_is_rejected() {
        let state = TestState::new();
        state.seed_hospital("City Hospital", 2, 10);
        let app = init_test_app!(state);

        for name in ["Asha", "Bilal"] {
            let req = test::TestRequest::post()
                .uri("/opd/join")
                .set_json(patient("City Hospital", name))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], "Successfully registered in queue");
        }

        let req = test::TestRequest::post()
            .uri("/opd/join")
            .set_json(patient("City Hospital", "Chen"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Queue is full" }));
    }

    #[actix_web::test]
    async fn concurrent_joins_stop_at_capacity() {
        let state = TestState::on_disk();
        state.seed_hospital("City Hospital", 5, 10);
        let app = init_test_app!(state);

        let responses = join_all((0..20).map(|i| {
            let req = test::TestRequest::post()
                .uri("/opd/join")
                .set_json(patient("City Hospital", &format!("Patient {}", i)))
                .to_request();
            test::call_service(&app, req)
        }))
        .await;

        let mut numbers = Vec::new();
        for resp in responses {
            if resp.status() == StatusCode::OK {
                let body: Value = test::read_body_json(resp).await;
                numbers.push(body["queueNo"].as_str().unwrap().to_string());
            } else {
                assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            }
        }
        numbers.sort();
        assert_eq!(numbers, vec!["A001", "A002", "A003", "A004", "A005"]);
    }

    #[actix_web::test]
    async fn join_to_unknown_hospital_is_not_found() {
        let state = TestState::new();
        let app = init_test_app!(state);

        let req = test::TestRequest::post()
            .uri("/opd/join")
            .set_json(patient("Nowhere General", "Asha"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Hospital not found");
    }

    #[actix_web::test]
    async fn malformed_join_body_is_a_client_error() {
        let state = TestState::new();
        state.seed_hospital("City Hospital", 2, 10);
        let app = init_test_app!(state);

        let req = test::TestRequest::post()
            .uri("/opd/join")
            .set_json(json!({ "name": "Asha", "hospital": "City Hospital" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[actix_web::test]
    async fn latest_lists_ten_newest_first() {
        let state = TestState::new();
        let hospital = state.seed_hospital("City Hospital", 20, 10);
        let app = init_test_app!(state);

        for i in 1..=12 {
            let req = test::TestRequest::post()
                .uri("/opd/join")
                .set_json(patient("City Hospital", &format!("Patient {}", i)))
                .to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }

        let req = test::TestRequest::get()
            .uri("/opd/latest")
            .insert_header(state.bearer(hospital.id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 10);
        assert_eq!(items[0]["queueNo"], "A012");
        assert_eq!(items[0]["name"], "Patient 12");
        assert_eq!(items[0]["waitTime"], "180mins");
        assert_eq!(items[0]["status"], "waiting");
        assert_eq!(items[9]["queueNo"], "A003");
    }

    #[actix_web::test]
    async fn latest_requires_a_token() {
        let state = TestState::new();
        let app = init_test_app!(state);

        let req = test::TestRequest::get().uri("/opd/latest").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "No token provided");

        let req = test::TestRequest::get()
            .uri("/opd/latest")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn delete_removes_only_the_matching_entry() {
        let state = TestState::new();
        let city = state.seed_hospital("City Hospital", 10, 10);
        let other = state.seed_hospital("Other Hospital", 10, 10);
        let app = init_test_app!(state);

        for hospital in ["City Hospital", "City Hospital", "Other Hospital"] {
            let req = test::TestRequest::post()
                .uri("/opd/join")
                .set_json(patient(hospital, "Asha"))
                .to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }

        let req = test::TestRequest::put()
            .uri("/opd/modify")
            .insert_header(state.bearer(city.id))
            .set_json(json!({ "queueNo": "A001", "status": "delete" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "success");

        let req = test::TestRequest::get()
            .uri("/opd/latest")
            .insert_header(state.bearer(city.id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let numbers: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["queueNo"].as_str().unwrap())
            .collect();
        assert_eq!(numbers, vec!["A002"]);

        let req = test::TestRequest::get()
            .uri("/opd/latest")
            .insert_header(state.bearer(other.id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        // unknown number: still a success, nothing changes
        let req = test::TestRequest::put()
            .uri("/opd/modify")
            .insert_header(state.bearer(city.id))
            .set_json(json!({ "queueNo": "A099", "status": "delete" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn queue_numbers_are_not_reused_after_delete() {
        let state = TestState::new();
        let city = state.seed_hospital("City Hospital", 10, 10);
        let app = init_test_app!(state);

        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/opd/join")
                .set_json(patient("City Hospital", "Asha"))
                .to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }

        let req = test::TestRequest::put()
            .uri("/opd/modify")
            .insert_header(state.bearer(city.id))
            .set_json(json!({ "queueNo": "A002", "status": "delete" }))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::post()
            .uri("/opd/join")
            .set_json(patient("City Hospital", "Bilal"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["queueNo"], "A003");
    }

    #[actix_web::test]
    async fn completed_updates_status_and_other_values_are_rejected() {
        let state = TestState::new();
        let city = state.seed_hospital("City Hospital", 10, 10);
        let app = init_test_app!(state);

        let req = test::TestRequest::post()
            .uri("/opd/join")
            .set_json(patient("City Hospital", "Asha"))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::put()
            .uri("/opd/modify")
            .insert_header(state.bearer(city.id))
            .set_json(json!({ "queueNo": "A001", "status": "Completed" }))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_success());

        let req = test::TestRequest::put()
            .uri("/opd/modify")
            .insert_header(state.bearer(city.id))
            .set_json(json!({ "queueNo": "A001", "status": "in-progress" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid status");

        let req = test::TestRequest::get()
            .uri("/opd/latest")
            .insert_header(state.bearer(city.id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["status"], "Completed");
    }
}
