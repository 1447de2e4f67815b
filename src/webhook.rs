use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;

use crate::activity::OUTBOUND_TIMEOUT;
use crate::bookings::repo_types::Booking;

pub const BOOKING_CREATED: &str = "booking_created";

/// Tells downstream automation about new bookings.
#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn booking_created(&self, booking: &Booking) -> anyhow::Result<()>;
}

#[derive(Debug, Serialize)]
struct BookingEvent<'a> {
    event: &'static str,
    #[serde(flatten)]
    booking: &'a Booking,
}

#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .build()
            .context("build webhook client")?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl BookingNotifier for WebhookNotifier {
    async fn booking_created(&self, booking: &Booking) -> anyhow::Result<()> {
        let Some(url) = self.url.as_deref() else {
            return Ok(());
        };
        let body = BookingEvent {
            event: BOOKING_CREATED,
            booking,
        };
        self.client
            .post(url)
            .json(&body)
            .send()
            .await
            .context("post booking webhook")?
            .error_for_status()
            .context("booking webhook rejected")?;
        Ok(())
    }
}

pub mod fake {
    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<Booking>>,
        pub fail: bool,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl BookingNotifier for RecordingNotifier {
        async fn booking_created(&self, booking: &Booking) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("webhook unavailable");
            }
            self.sent.lock().await.push(booking.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::repo_types::STATUS_PENDING;
    use time::macros::{date, datetime};

    fn booking() -> Booking {
        Booking {
            id: 11,
            customer_name: "Ana".into(),
            customer_phone: "555-0100".into(),
            service_id: 4,
            booking_date: date!(2025 - 06 - 01),
            booking_time: "14:00".into(),
            status: STATUS_PENDING.into(),
            created_at: datetime!(2025-05-30 08:00:00 UTC),
        }
    }

    #[test]
    fn event_payload_is_flat() {
        let b = booking();
        let json = serde_json::to_value(BookingEvent {
            event: BOOKING_CREATED,
            booking: &b,
        })
        .unwrap();
        assert_eq!(json["event"], "booking_created");
        assert_eq!(json["id"], 11);
        assert_eq!(json["customer_phone"], "555-0100");
        assert_eq!(json["service_id"], 4);
        assert_eq!(json["booking_date"], "2025-06-01");
        assert_eq!(json["booking_time"], "14:00");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["created_at"], "2025-05-30T08:00:00Z");
    }

    #[tokio::test]
    async fn unconfigured_webhook_is_a_noop() {
        let notifier = WebhookNotifier::new(None).unwrap();
        notifier.booking_created(&booking()).await.expect("no-op");
    }
}
