use serde::Deserialize;

/// POST /bookings body. `booking_date` is parsed separately so a bad date
/// gets its own error code.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateBookingRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub service_id: i64,
    pub booking_date: String,
    pub booking_time: String,
}

/// GET /bookings query. Read from raw pairs so a repeated key cannot fail the request.
#[derive(Debug, Default)]
pub struct ListParams {
    pub limit: Option<String>,
}

pub const DEFAULT_LIMIT: i64 = 50;

impl ListParams {
    /// Keeps the first `limit` value and ignores the rest.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let limit = pairs
            .into_iter()
            .find(|(key, _)| key == "limit")
            .map(|(_, value)| value);
        Self { limit }
    }

    /// Falls back to 50 when absent or not an integer.
    pub fn limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIMIT)
    }
}
