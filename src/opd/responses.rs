use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub message: String,
    pub queue_no: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub queue_no: String,
    pub name: String,
    pub wait_time: String,
    pub status: String,
}
