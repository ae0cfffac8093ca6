use serde::Serialize;

#[derive(Serialize)]
pub struct CreateResponse {
    pub message: String,
    pub token: String,
}

#[derive(Serialize)]
pub struct HospitalItem {
    pub id: i32,
    pub name: String,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub hospitals: Vec<HospitalItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStats {
    pub patients_in_queue: i64,
    pub available_beds: i64,
    pub total_beds: i64,
    pub average_wait_time: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: String,
    pub email: String,
    pub max_queue_size: i32,
    pub max_beds: i32,
    pub current_stats: CurrentStats,
}
