use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer};

/// Generates actix handlers that delegate to `<name>_impl` and render its
/// `Ok` value as a JSON body. Errors go through `ApiError`'s response.
#[macro_export]
macro_rules! api_funcs {
    ( $( $method:ident ( $func_name:ident, $url:literal $( , $arg:ident : $ty:ty )* $(,)? ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[$method($url)]
                async fn $func_name(
                    $( $arg: $ty ),*
                ) -> Result<actix_web::HttpResponse, $crate::protocol::ApiError> {
                    let response = [<$func_name _impl>]( $( $arg ),* ).await?;
                    Ok(actix_web::HttpResponse::Ok().json(response))
                }
            }
        )+
    };
}

const DISPLAY_PREFIX: char = 'A';
const MAX_AGE: i32 = 150;

/// `7` -> `"A007"`, the form staff see on the dashboard.
pub fn format_display_number(number: i32) -> String {
    format!("{}{:03}", DISPLAY_PREFIX, number)
}

/// Accepts both the display form (`"A007"`) and a bare number (`"7"`).
pub fn parse_display_number(s: &str) -> Option<i32> {
    let s = s.trim();
    let digits = s
        .strip_prefix(DISPLAY_PREFIX)
        .or_else(|| s.strip_prefix(DISPLAY_PREFIX.to_ascii_lowercase()))
        .unwrap_or(s);
    digits.parse::<i32>().ok().filter(|n| *n > 0)
}

pub fn format_date(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d").to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

/// Browser forms send ages as either numbers or numeric strings.
pub fn deserialize_age<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let age = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| de::Error::custom(format!("invalid age: {}", n)))?,
        NumberOrString::Text(s) => s
            .trim()
            .parse::<i32>()
            .map_err(|_| de::Error::custom(format!("invalid age: {:?}", s)))?,
    };
    if !(0..=MAX_AGE).contains(&age) {
        return Err(de::Error::custom(format!(
            "age must be between 0 and {}",
            MAX_AGE
        )));
    }
    Ok(age)
}

/// Phone numbers and display numbers may arrive as JSON numbers.
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n.to_string()),
        NumberOrString::Text(s) => Ok(s.trim().to_string()),
    }
}
