use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime, UtcOffset};

use super::repo_types::{Booking, NewBooking};

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn create(&self, booking: &NewBooking) -> anyhow::Result<i64>;
    /// Up to `limit` bookings, newest first.
    async fn list_latest(&self, limit: i64) -> anyhow::Result<Vec<Booking>>;
    /// Bookings created during the UTC calendar day containing `day`.
    async fn count_on_date(&self, day: OffsetDateTime) -> anyhow::Result<i64>;
}

/// `[midnight, next midnight)` in UTC around `reference`.
pub fn day_window(reference: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
    let start = reference
        .to_offset(UtcOffset::UTC)
        .date()
        .midnight()
        .assume_utc();
    (start, start + Duration::days(1))
}

#[derive(Clone)]
pub struct PgBookingStore {
    db: PgPool,
}

impl PgBookingStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn create(&self, b: &NewBooking) -> anyhow::Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO bookings
                (customer_name, customer_phone, service_id, booking_date, booking_time, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&b.customer_name)
        .bind(&b.customer_phone)
        .bind(b.service_id)
        .bind(b.booking_date)
        .bind(&b.booking_time)
        .bind(&b.status)
        .bind(b.created_at)
        .fetch_one(&self.db)
        .await
        .context("insert booking")?;
        Ok(id)
    }

    async fn list_latest(&self, limit: i64) -> anyhow::Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, customer_name, customer_phone, service_id, booking_date,
                   booking_time, status, created_at
            FROM bookings
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .context("list latest bookings")?;
        Ok(rows)
    }

    async fn count_on_date(&self, day: OffsetDateTime) -> anyhow::Result<i64> {
        let (start, end) = day_window(day);
        let count = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM bookings WHERE created_at >= $1 AND created_at < $2"#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.db)
        .await
        .context("count bookings on date")?;
        Ok(count)
    }
}

pub mod memory {
    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryBookingStore {
        rows: Mutex<Vec<Booking>>,
    }

    #[async_trait]
    impl BookingStore for MemoryBookingStore {
        async fn create(&self, booking: &NewBooking) -> anyhow::Result<i64> {
            let mut rows = self.rows.lock().await;
            let id = rows.len() as i64 + 1;
            rows.push(booking.clone().into_booking(id));
            Ok(id)
        }

        async fn list_latest(&self, limit: i64) -> anyhow::Result<Vec<Booking>> {
            // same answer Postgres gives for LIMIT -n
            if limit < 0 {
                anyhow::bail!("LIMIT must not be negative");
            }
            let rows = self.rows.lock().await;
            let mut out = rows.clone();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            out.truncate(limit as usize);
            Ok(out)
        }

        async fn count_on_date(&self, day: OffsetDateTime) -> anyhow::Result<i64> {
            let (start, end) = day_window(day);
            let rows = self.rows.lock().await;
            Ok(rows
                .iter()
                .filter(|b| b.created_at >= start && b.created_at < end)
                .count() as i64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn window_covers_the_utc_day() {
        let (start, end) = day_window(datetime!(2025-04-10 17:45:12 UTC));
        assert_eq!(start, datetime!(2025-04-10 00:00:00 UTC));
        assert_eq!(end, datetime!(2025-04-11 00:00:00 UTC));
    }

    #[test]
    fn window_uses_utc_date_for_offset_references() {
        // 01:30 at +03:00 is still the previous day in UTC
        let reference = datetime!(2025-04-10 01:30:00).assume_offset(offset!(+3));
        let (start, _) = day_window(reference);
        assert_eq!(start, datetime!(2025-04-09 00:00:00 UTC));
    }

    #[tokio::test]
    async fn memory_store_rejects_negative_limit() {
        let store = memory::MemoryBookingStore::default();
        assert!(store.list_latest(-5).await.is_err());
        assert!(store.list_latest(0).await.unwrap().is_empty());
    }
}
