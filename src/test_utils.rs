use std::time::Duration;

use actix_web::{http::header, web};
use chrono::Utc;
use diesel::prelude::*;

use crate::{
    auth::{hash_password, TokenKeys},
    config::Config,
    database::{build_pool, memory_pool},
    limiter::RateLimiter,
    models::hospitals::{Hospital, NewHospital},
    DbPool,
};

pub const TEST_PASSWORD: &str = "secret-password";

pub struct TestState {
    pub pool: web::Data<DbPool>,
    pub config: web::Data<Config>,
    pub keys: web::Data<TokenKeys>,
    pub limiter: web::Data<RateLimiter>,
    _db_dir: Option<tempfile::TempDir>,
}

impl TestState {
    pub fn new() -> Self {
        Self::with_limit(100)
    }

    pub fn with_limit(max_requests: u32) -> Self {
        Self::build(memory_pool(), None, max_requests)
    }

    /// Backed by a database file, so the pool hands out several connections
    /// and requests run side by side.
    pub fn on_disk() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quickcare.db");
        let pool = build_pool(path.to_str().unwrap()).unwrap();
        Self::build(pool, Some(dir), 100)
    }

    fn build(pool: DbPool, db_dir: Option<tempfile::TempDir>, max_requests: u32) -> Self {
        let config = Config {
            jwt_secret: "test-secret".to_string(),
            database_url: ":memory:".to_string(),
            ..Config::default()
        };
        Self {
            pool: web::Data::new(pool),
            keys: web::Data::new(TokenKeys::new(&config.jwt_secret, config.token_ttl_hours)),
            limiter: web::Data::new(RateLimiter::new(
                max_requests,
                Duration::from_secs(24 * 60 * 60),
            )),
            config: web::Data::new(config),
            _db_dir: db_dir,
        }
    }

    pub fn seed_hospital(&self, name: &str, max_queue_size: i32, max_beds: i32) -> Hospital {
        use crate::schema::hospitals;

        let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
        let mut conn = self.pool.get().unwrap();
        diesel::insert_into(hospitals::table)
            .values(NewHospital {
                name: name.to_string(),
                email: email.clone(),
                password: hash_password(TEST_PASSWORD),
                max_queue_size,
                max_beds,
                next_queue_number: 1,
                created_at: Utc::now().naive_utc(),
            })
            .execute(&mut conn)
            .unwrap();
        hospitals::table
            .filter(hospitals::email.eq(email))
            .select(Hospital::as_select())
            .get_result::<Hospital>(&mut conn)
            .unwrap()
    }

    pub fn bearer(&self, hospital_id: i32) -> (header::HeaderName, String) {
        let token = self.keys.issue(hospital_id).unwrap();
        (header::AUTHORIZATION, format!("Bearer {}", token))
    }
}

/// Builds the full application around a [`TestState`].
#[macro_export]
macro_rules! init_test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.pool.clone())
                .app_data($state.config.clone())
                .app_data($state.keys.clone())
                .app_data($state.limiter.clone())
                .configure($crate::app_config),
        )
        .await
    };
}
