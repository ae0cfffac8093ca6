use serde::Deserialize;

/// Registration arrives as query parameters.
#[derive(Deserialize)]
pub struct CreateQuery {
    pub name: String,
    pub email: String,
    pub password: String,
}
