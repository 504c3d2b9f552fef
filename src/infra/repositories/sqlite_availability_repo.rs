use crate::domain::{models::availability::Availability, ports::AvailabilityRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

pub struct SqliteAvailabilityRepo {
    pool: SqlitePool,
}

impl SqliteAvailabilityRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for SqliteAvailabilityRepo {
    async fn create(&self, availability: &Availability) -> Result<Availability, AppError> {
        sqlx::query_as::<_, Availability>(
            "INSERT INTO availabilities (id, title, rules_json, created_at) VALUES (?, ?, ?, ?) RETURNING *"
        )
            .bind(&availability.id)
            .bind(&availability.title)
            .bind(&availability.rules_json)
            .bind(availability.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Availability>, AppError> {
        sqlx::query_as::<_, Availability>("SELECT * FROM availabilities WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Availability>, AppError> {
        sqlx::query_as::<_, Availability>("SELECT * FROM availabilities ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, availability: &Availability) -> Result<Availability, AppError> {
        sqlx::query_as::<_, Availability>(
            "UPDATE availabilities SET title=?, rules_json=? WHERE id=? RETURNING *"
        )
            .bind(&availability.title)
            .bind(&availability.rules_json)
            .bind(&availability.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM availabilities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Availability not found".into()));
        }
        Ok(())
    }

    async fn count_events_using(&self, id: &str) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM events WHERE availability_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count"))
    }
}
