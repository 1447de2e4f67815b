use std::sync::Arc;

use serde::Serialize;
use time::{Date, OffsetDateTime};
use tracing::{info, instrument, warn};

use super::repo::BookingStore;
use super::repo_types::{Booking, NewBooking, STATUS_PENDING};
use crate::activity::ActivityLogger;
use crate::webhook::BookingNotifier;

const DASHBOARD_LATEST: i64 = 10;

/// Customer-supplied booking fields.
#[derive(Debug, Clone)]
pub struct BookingInput {
    pub customer_name: String,
    pub customer_phone: String,
    pub service_id: i64,
    pub booking_date: Date,
    pub booking_time: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_today: i64,
    pub latest: Vec<Booking>,
}

pub struct BookingService {
    bookings: Arc<dyn BookingStore>,
    notifier: Arc<dyn BookingNotifier>,
    activity: Arc<dyn ActivityLogger>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        notifier: Arc<dyn BookingNotifier>,
        activity: Arc<dyn ActivityLogger>,
    ) -> Self {
        Self {
            bookings,
            notifier,
            activity,
        }
    }

    /// Persists a pending booking, then notifies and logs best-effort.
    /// Only the insert failure is returned to the caller.
    #[instrument(skip(self, input), fields(service_id = input.service_id))]
    pub async fn create(&self, input: BookingInput) -> anyhow::Result<i64> {
        let now = OffsetDateTime::now_utc();
        let new = NewBooking {
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
            service_id: input.service_id,
            booking_date: input.booking_date,
            booking_time: input.booking_time,
            status: STATUS_PENDING.to_string(),
            created_at: now,
        };
        let id = self.bookings.create(&new).await?;
        let booking = new.into_booking(id);

        if let Err(e) = self.notifier.booking_created(&booking).await {
            warn!(error = %e, booking_id = id, "booking webhook failed");
        }
        if let Err(e) = self
            .activity
            .record("booking_created", &booking.customer_name, now)
            .await
        {
            warn!(error = %e, booking_id = id, "activity log failed");
        }

        info!(booking_id = id, "booking created");
        Ok(id)
    }

    pub async fn list_latest(&self, limit: i64) -> anyhow::Result<Vec<Booking>> {
        self.bookings.list_latest(limit).await
    }

    /// Count for the UTC day of `today` plus the ten newest bookings overall.
    pub async fn dashboard(&self, today: OffsetDateTime) -> anyhow::Result<DashboardStats> {
        let total_today = self.bookings.count_on_date(today).await?;
        let latest = self.bookings.list_latest(DASHBOARD_LATEST).await?;
        Ok(DashboardStats {
            total_today,
            latest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::fake::RecordingActivityLogger;
    use crate::bookings::repo::memory::MemoryBookingStore;
    use crate::webhook::fake::RecordingNotifier;
    use async_trait::async_trait;
    use time::macros::{date, datetime};

    fn input(name: &str) -> BookingInput {
        BookingInput {
            customer_name: name.into(),
            customer_phone: "555".into(),
            service_id: 1,
            booking_date: date!(2025 - 07 - 01),
            booking_time: "09:00".into(),
        }
    }

    fn stored(name: &str, created_at: OffsetDateTime) -> NewBooking {
        NewBooking {
            customer_name: name.into(),
            customer_phone: "555".into(),
            service_id: 1,
            booking_date: date!(2025 - 07 - 01),
            booking_time: "09:00".into(),
            status: STATUS_PENDING.into(),
            created_at,
        }
    }

    #[tokio::test]
    async fn created_booking_is_pending_and_listed_first() {
        let notifier = Arc::new(RecordingNotifier::default());
        let activity = Arc::new(RecordingActivityLogger::default());
        let svc = BookingService::new(
            Arc::new(MemoryBookingStore::default()),
            notifier.clone(),
            activity.clone(),
        );

        let first = svc.create(input("Ana")).await.unwrap();
        let second = svc.create(input("Bo")).await.unwrap();

        let list = svc.list_latest(50).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, second);
        assert_eq!(list[1].id, first);
        assert!(list.iter().all(|b| b.status == "pending"));

        let sent = notifier.sent.lock().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].id, first);
        assert_eq!(
            activity.events.lock().await[1],
            ("booking_created".to_string(), "Bo".to_string())
        );
    }

    #[tokio::test]
    async fn side_effect_failures_are_swallowed() {
        let svc = BookingService::new(
            Arc::new(MemoryBookingStore::default()),
            Arc::new(RecordingNotifier::failing()),
            Arc::new(RecordingActivityLogger::failing()),
        );
        let id = svc.create(input("Ana")).await.expect("create still succeeds");
        assert_eq!(svc.list_latest(1).await.unwrap()[0].id, id);
    }

    struct BrokenStore;

    #[async_trait]
    impl BookingStore for BrokenStore {
        async fn create(&self, _b: &NewBooking) -> anyhow::Result<i64> {
            anyhow::bail!("db down")
        }
        async fn list_latest(&self, _limit: i64) -> anyhow::Result<Vec<Booking>> {
            Ok(Vec::new())
        }
        async fn count_on_date(&self, _day: OffsetDateTime) -> anyhow::Result<i64> {
            anyhow::bail!("db down")
        }
    }

    #[tokio::test]
    async fn store_failures_propagate_without_side_effects() {
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = BookingService::new(
            Arc::new(BrokenStore),
            notifier.clone(),
            Arc::new(RecordingActivityLogger::default()),
        );
        assert!(svc.create(input("Ana")).await.is_err());
        assert!(notifier.sent.lock().await.is_empty());
        assert!(svc.dashboard(OffsetDateTime::now_utc()).await.is_err());
    }

    #[tokio::test]
    async fn dashboard_counts_only_the_utc_day() {
        let store = Arc::new(MemoryBookingStore::default());
        for at in [
            datetime!(2025-04-09 23:59:59 UTC),
            datetime!(2025-04-10 00:00:00 UTC),
            datetime!(2025-04-10 12:00:00 UTC),
            datetime!(2025-04-10 23:59:59 UTC),
            datetime!(2025-04-11 00:00:00 UTC),
        ] {
            store.create(&stored("x", at)).await.unwrap();
        }
        let svc = BookingService::new(
            store,
            Arc::new(RecordingNotifier::default()),
            Arc::new(RecordingActivityLogger::default()),
        );

        let stats = svc.dashboard(datetime!(2025-04-10 08:30:00 UTC)).await.unwrap();
        assert_eq!(stats.total_today, 3);
        assert_eq!(stats.latest.len(), 5);
        assert_eq!(stats.latest[0].created_at, datetime!(2025-04-11 00:00:00 UTC));
    }

    #[tokio::test]
    async fn dashboard_latest_is_capped_at_ten() {
        let store = Arc::new(MemoryBookingStore::default());
        let base = datetime!(2025-04-10 00:00:00 UTC);
        for i in 0..12 {
            store
                .create(&stored("x", base + time::Duration::minutes(i)))
                .await
                .unwrap();
        }
        let svc = BookingService::new(
            store,
            Arc::new(RecordingNotifier::default()),
            Arc::new(RecordingActivityLogger::default()),
        );
        let stats = svc.dashboard(base).await.unwrap();
        assert_eq!(stats.total_today, 12);
        assert_eq!(stats.latest.len(), 10);
        assert_eq!(stats.latest[0].id, 12);
    }
}
