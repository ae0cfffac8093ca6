use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub name: String,
    #[serde(deserialize_with = "crate::utils::deserialize_age")]
    pub age: i32,
    pub gender: String,
    #[serde(deserialize_with = "crate::utils::deserialize_text")]
    pub phone_no: String,
    #[serde(default)]
    pub reason: String,
    pub hospital: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyRequest {
    #[serde(deserialize_with = "crate::utils::deserialize_text")]
    pub bed_no: String,
    pub status: String,
}
