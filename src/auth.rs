use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use anyhow::{anyhow, Context};
use blake2::{Blake2b512, Digest};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::protocol::{ApiError, ApiResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "hospitalId")]
    pub hospital_id: i32,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies the staff tokens handed out on login/registration.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, hospital_id: i32) -> ApiResult<String> {
        self.issue_at(hospital_id, Utc::now())
    }

    pub fn issue_at(&self, hospital_id: i32, now: DateTime<Utc>) -> ApiResult<String> {
        let claims = Claims {
            hospital_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .context("Failed to sign token")?;
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> ApiResult<i32> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| ApiError::unauthorized("Invalid token"))?;
        Ok(data.claims.hospital_id)
    }
}

pub fn hash_password(password: &str) -> String {
    format!("{:x}", Blake2b512::digest(password.as_bytes()))
}

/// The hospital a request is acting for, taken from its bearer token.
/// Handlers that take this argument are closed to anonymous callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthHospital(pub i32);

impl FromRequest for AuthHospital {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(get_hospital_id_from_request(req).map(AuthHospital))
    }
}

fn get_hospital_id_from_request(req: &HttpRequest) -> ApiResult<i32> {
    let keys = req
        .app_data::<web::Data<TokenKeys>>()
        .ok_or_else(|| anyhow!("Token keys are not registered"))?;

    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("No token provided"))?;
    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

    keys.verify(token)
}
