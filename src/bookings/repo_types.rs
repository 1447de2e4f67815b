use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

pub const STATUS_PENDING: &str = "pending";

time::serde::format_description!(calendar_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub service_id: i64,
    #[serde(with = "calendar_date")]
    pub booking_date: Date,
    pub booking_time: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Insert payload; status and timestamp are filled in by the use case.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub customer_name: String,
    pub customer_phone: String,
    pub service_id: i64,
    pub booking_date: Date,
    pub booking_time: String,
    pub status: String,
    pub created_at: OffsetDateTime,
}

impl NewBooking {
    pub fn into_booking(self, id: i64) -> Booking {
        Booking {
            id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            service_id: self.service_id,
            booking_date: self.booking_date,
            booking_time: self.booking_time,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn serializes_date_and_timestamp_as_strings() {
        let booking = Booking {
            id: 3,
            customer_name: "Ana".into(),
            customer_phone: "555".into(),
            service_id: 2,
            booking_date: date!(2025 - 03 - 07),
            booking_time: "10:30".into(),
            status: STATUS_PENDING.into(),
            created_at: datetime!(2025-03-01 09:15:00 UTC),
        };
        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["booking_date"], "2025-03-07");
        assert_eq!(json["created_at"], "2025-03-01T09:15:00Z");
        assert_eq!(json["status"], "pending");
    }
}
