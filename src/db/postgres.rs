use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::info;

use super::{Store, StoreError};
use crate::models::{CatalogTable, NamedRow, NewSchedule, Schedule, ScheduleView};

const MAX_CONNECTIONS: u32 = 5;

const LIST_SCHEDULES: &str = r#"
    SELECT
        s.id,
        s.day_of_week,
        s.timeslot,

        t.id AS teacher_id,
        t.full_name AS teacher_name,

        g.id AS group_id,
        g.group_name AS group_name,

        sub.id AS subject_id,
        sub.subject_name AS subject_name,

        c.id AS classroom_id,
        c.room_name AS classroom_name

    FROM schedules s
    JOIN teachers t ON s.teacher_id = t.id
    JOIN groups g ON s.group_id = g.id
    JOIN subjects sub ON s.subject_id = sub.id
    JOIN classrooms c ON s.classroom_id = c.id
    ORDER BY s.id
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens the pool and verifies it answers before handing it out.
    pub async fn connect(options: PgConnectOptions) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.ping().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            StoreError::ForeignKey(db_err.message().to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_named(&self, table: CatalogTable) -> Result<Vec<NamedRow>, StoreError> {
        let sql = format!(
            "SELECT id, {} AS name FROM {}",
            table.name_column(),
            table.table()
        );
        let rows = sqlx::query_as::<_, NamedRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_named(&self, table: CatalogTable, name: &str) -> Result<i32, StoreError> {
        let sql = format!(
            "INSERT INTO {}({}) VALUES($1) RETURNING id",
            table.table(),
            table.name_column()
        );
        sqlx::query_scalar::<_, i32>(&sql)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn update_named(
        &self,
        table: CatalogTable,
        id: i32,
        name: &str,
    ) -> Result<u64, StoreError> {
        let sql = format!(
            "UPDATE {} SET {}=$1 WHERE id=$2",
            table.table(),
            table.name_column()
        );
        let result = sqlx::query(&sql)
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected())
    }

    async fn delete_named(&self, table: CatalogTable, id: i32) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id=$1", table.table());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected())
    }

    async fn list_schedules(&self) -> Result<Vec<ScheduleView>, StoreError> {
        let rows = sqlx::query_as::<_, ScheduleView>(LIST_SCHEDULES)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_schedule(&self, schedule: &NewSchedule) -> Result<i32, StoreError> {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO schedules(day_of_week, timeslot, teacher_id, group_id, subject_id, classroom_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&schedule.day_of_week)
        .bind(schedule.timeslot)
        .bind(schedule.teacher_id)
        .bind(schedule.group_id)
        .bind(schedule.subject_id)
        .bind(schedule.classroom_id)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn update_schedule(&self, schedule: &Schedule) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE schedules
            SET day_of_week = $1,
                timeslot = $2,
                teacher_id = $3,
                group_id = $4,
                subject_id = $5,
                classroom_id = $6
            WHERE id = $7
            "#,
        )
        .bind(&schedule.day_of_week)
        .bind(schedule.timeslot)
        .bind(schedule.teacher_id)
        .bind(schedule.group_id)
        .bind(schedule.subject_id)
        .bind(schedule.classroom_id)
        .bind(schedule.id)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(result.rows_affected())
    }

    async fn delete_schedule(&self, id: i32) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected())
    }
}
