use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub name: String,
    #[serde(deserialize_with = "crate::utils::deserialize_age")]
    pub age: i32,
    pub gender: String,
    #[serde(deserialize_with = "crate::utils::deserialize_text")]
    pub phone_no: String,
    #[serde(default)]
    pub symptoms: String,
    pub hospital: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyRequest {
    #[serde(deserialize_with = "crate::utils::deserialize_text")]
    pub queue_no: String,
    pub status: String,
}
