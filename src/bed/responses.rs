use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub message: String,
    pub bed_no: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BedItem {
    pub bed_no: String,
    pub name: String,
    pub admission_date: String,
    pub status: String,
}
