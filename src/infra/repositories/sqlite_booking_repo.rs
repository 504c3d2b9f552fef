use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Authoritative overlap check. The slot list shown to the client is
        // advisory; this count plus the unique (event_id, start_time) index
        // is what actually prevents double booking.
        let row = sqlx::query("SELECT COUNT(*) as count FROM bookings WHERE event_id = ? AND start_time < ? AND end_time > ?")
            .bind(&booking.event_id).bind(booking.end_time).bind(booking.start_time)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        if row.get::<i64, _>("count") > 0 {
            return Err(AppError::Conflict("Slot overlaps an existing booking".to_string()));
        }

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, event_id, customer_name, customer_surname, customer_phone, customer_email, start_time, end_time, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.event_id)
            .bind(&booking.customer_name).bind(&booking.customer_surname)
            .bind(&booking.customer_phone).bind(&booking.customer_email)
            .bind(booking.start_time).bind(booking.end_time).bind(booking.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY start_time ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE event_id = ? ORDER BY start_time ASC").bind(event_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_range(&self, event_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE event_id = ? AND start_time < ? AND end_time > ?").bind(event_id).bind(end).bind(start).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let row = sqlx::query("SELECT COUNT(*) as count FROM bookings WHERE event_id = ? AND start_time < ? AND end_time > ? AND id != ?")
            .bind(&booking.event_id).bind(booking.end_time).bind(booking.start_time).bind(&booking.id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        if row.get::<i64, _>("count") > 0 {
            return Err(AppError::Conflict("Target slot overlaps an existing booking".to_string()));
        }

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET customer_name=?, customer_surname=?, customer_phone=?, customer_email=?, start_time=?, end_time=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&booking.customer_name).bind(&booking.customer_surname)
            .bind(&booking.customer_phone).bind(&booking.customer_email)
            .bind(booking.start_time).bind(booking.end_time)
            .bind(&booking.id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Booking not found".into())); }
        Ok(())
    }
    async fn count_future_for_event(&self, event_id: &str, after: DateTime<Utc>) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM bookings WHERE event_id = ? AND start_time > ?")
            .bind(event_id).bind(after)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }
}
