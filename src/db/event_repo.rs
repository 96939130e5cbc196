// src/db/event_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::ScheduleStore,
    models::event::{
        Attendance, CreateEventPayload, Event, EventFilters, MySchedule, NewSchedule,
        RecordAttendancePayload, Schedule, ScheduleConflict, ScheduleDetail, UpdateEventPayload,
        UpdateSchedulePayload,
    },
    models::ministry::Ministry,
};

// Quantas escalas futuras a tela "minhas escalas" mostra
const MY_SCHEDULES_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  EVENTOS
    // =========================================================================

    pub async fn list_events(
        &self,
        church_id: Uuid,
        filters: &EventFilters,
    ) -> Result<Vec<Event>, AppError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM events WHERE church_id = ");
        query.push_bind(church_id);

        if let Some(event_type) = &filters.event_type {
            query.push(" AND event_type = ").push_bind(event_type.clone());
        }
        if let Some(status) = &filters.status {
            query.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(from) = filters.from {
            query.push(" AND event_date >= ").push_bind(from);
        }
        if let Some(to) = filters.to {
            query.push(" AND event_date <= ").push_bind(to);
        }
        query.push(" ORDER BY event_date ASC");

        let events = query.build_query_as::<Event>().fetch_all(&self.pool).await?;
        Ok(events)
    }

    pub async fn create_event(
        &self,
        church_id: Uuid,
        created_by: Uuid,
        input: CreateEventPayload,
    ) -> Result<Event, AppError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (church_id, title, description, event_date, event_type, status, created_by)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'SCHEDULED'), $7)
            RETURNING *
            "#,
        )
        .bind(church_id)
        .bind(input.title)
        .bind(input.description)
        .bind(input.event_date)
        .bind(input.event_type)
        .bind(input.status)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(event)
    }

    pub async fn update_event(
        &self,
        church_id: Uuid,
        event_id: Uuid,
        input: UpdateEventPayload,
    ) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                event_date = COALESCE($5, event_date),
                event_type = COALESCE($6, event_type),
                status = COALESCE($7, status),
                updated_at = NOW()
            WHERE id = $1 AND church_id = $2
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(church_id)
        .bind(input.title)
        .bind(input.description)
        .bind(input.event_date)
        .bind(input.event_type)
        .bind(input.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn delete_event(&self, church_id: Uuid, event_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND church_id = $2")
            .bind(event_id)
            .bind(church_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  ESCALAS (a igreja vem sempre pelo evento)
    // =========================================================================

    pub async fn list_event_schedules(
        &self,
        church_id: Uuid,
        event_id: Uuid,
    ) -> Result<Vec<ScheduleDetail>, AppError> {
        let schedules = sqlx::query_as::<_, ScheduleDetail>(
            r#"
            SELECT s.*,
                   p.name AS profile_name, p.phone AS profile_phone,
                   m.name AS ministry_name, m.color AS ministry_color
            FROM schedules s
            JOIN events e ON e.id = s.event_id
            JOIN profiles p ON p.id = s.user_id
            JOIN ministries m ON m.id = s.ministry_id
            WHERE s.event_id = $1 AND e.church_id = $2
            ORDER BY m.name ASC, p.name ASC
            "#,
        )
        .bind(event_id)
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(schedules)
    }

    pub async fn update_schedule(
        &self,
        church_id: Uuid,
        schedule_id: Uuid,
        input: UpdateSchedulePayload,
    ) -> Result<Schedule, AppError> {
        sqlx::query_as::<_, Schedule>(
            r#"
            UPDATE schedules s SET
                role = COALESCE($3, s.role),
                confirmed = COALESCE($4, s.confirmed),
                notes = COALESCE($5, s.notes),
                updated_at = NOW()
            FROM events e
            WHERE s.id = $1 AND e.id = s.event_id AND e.church_id = $2
            RETURNING s.*
            "#,
        )
        .bind(schedule_id)
        .bind(church_id)
        .bind(input.role)
        .bind(input.confirmed)
        .bind(input.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    /// Só a própria pessoa escalada confirma.
    pub async fn confirm_schedule(
        &self,
        church_id: Uuid,
        schedule_id: Uuid,
        user_id: Uuid,
    ) -> Result<Schedule, AppError> {
        sqlx::query_as::<_, Schedule>(
            r#"
            UPDATE schedules s SET confirmed = TRUE, updated_at = NOW()
            FROM events e
            WHERE s.id = $1 AND s.user_id = $2 AND e.id = s.event_id AND e.church_id = $3
            RETURNING s.*
            "#,
        )
        .bind(schedule_id)
        .bind(user_id)
        .bind(church_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn delete_schedule(&self, church_id: Uuid, schedule_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM schedules s
            USING events e
            WHERE s.id = $1 AND e.id = s.event_id AND e.church_id = $2
            "#,
        )
        .bind(schedule_id)
        .bind(church_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    pub async fn list_my_schedules(
        &self,
        church_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<MySchedule>, AppError> {
        let schedules = sqlx::query_as::<_, MySchedule>(
            r#"
            SELECT s.*,
                   e.title AS event_title, e.event_date, e.event_type, e.status AS event_status,
                   m.name AS ministry_name
            FROM schedules s
            JOIN events e ON e.id = s.event_id
            JOIN ministries m ON m.id = s.ministry_id
            WHERE s.user_id = $1 AND e.church_id = $2 AND e.event_date >= NOW()
            ORDER BY e.event_date ASC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(church_id)
        .bind(MY_SCHEDULES_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        Ok(schedules)
    }

    // =========================================================================
    //  PRESENÇA
    // =========================================================================

    pub async fn list_attendance(
        &self,
        church_id: Uuid,
        event_id: Uuid,
    ) -> Result<Vec<Attendance>, AppError> {
        let records = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT a.*
            FROM attendance a
            JOIN events e ON e.id = a.event_id
            WHERE a.event_id = $1 AND e.church_id = $2
            ORDER BY a.recorded_at DESC
            "#,
        )
        .bind(event_id)
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Uma linha por (evento, pessoa): registrar de novo sobrescreve.
    pub async fn record_attendance(
        &self,
        church_id: Uuid,
        event_id: Uuid,
        recorded_by: Uuid,
        input: RecordAttendancePayload,
    ) -> Result<Attendance, AppError> {
        sqlx::query_as::<_, Attendance>(
            r#"
            INSERT INTO attendance (event_id, user_id, status, notes, recorded_by)
            SELECT e.id, $3, $4, $5, $6
            FROM events e
            WHERE e.id = $1 AND e.church_id = $2
              AND EXISTS (SELECT 1 FROM profiles p WHERE p.id = $3 AND p.church_id = $2)
            ON CONFLICT (event_id, user_id) DO UPDATE SET
                status = EXCLUDED.status,
                notes = EXCLUDED.notes,
                recorded_by = EXCLUDED.recorded_by,
                recorded_at = NOW()
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(church_id)
        .bind(input.user_id)
        .bind(input.status)
        .bind(input.notes)
        .bind(recorded_by)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn delete_attendance(&self, church_id: Uuid, attendance_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM attendance a
            USING events e
            WHERE a.id = $1 AND e.id = a.event_id AND e.church_id = $2
            "#,
        )
        .bind(attendance_id)
        .bind(church_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleStore for EventRepository {
    async fn find_event(&self, church_id: Uuid, event_id: Uuid) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE id = $1 AND church_id = $2",
        )
        .bind(event_id)
        .bind(church_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    async fn find_ministry(
        &self,
        church_id: Uuid,
        ministry_id: Uuid,
    ) -> Result<Option<Ministry>, AppError> {
        let ministry = sqlx::query_as::<_, Ministry>(
            "SELECT * FROM ministries WHERE id = $1 AND church_id = $2",
        )
        .bind(ministry_id)
        .bind(church_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ministry)
    }

    async fn find_conflicts(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        event_date: DateTime<Utc>,
        exclude_event_id: Option<Uuid>,
    ) -> Result<Vec<ScheduleConflict>, AppError> {
        // Igualdade exata de horário, não sobreposição de intervalos
        let conflicts = sqlx::query_as::<_, ScheduleConflict>(
            r#"
            SELECT e.id AS conflict_event_id,
                   e.title AS conflict_event_title,
                   e.event_date AS conflict_event_date,
                   s.role AS conflict_role
            FROM schedules s
            JOIN events e ON e.id = s.event_id
            WHERE s.user_id = $1
              AND e.event_date = $2
              AND ($3::uuid IS NULL OR e.id <> $3)
              AND e.church_id = $4
            ORDER BY s.created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(event_date)
        .bind(exclude_event_id)
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(conflicts)
    }

    async fn create_schedule(&self, schedule: NewSchedule) -> Result<Schedule, AppError> {
        let schedule = sqlx::query_as::<_, Schedule>(
            r#"
            INSERT INTO schedules (event_id, ministry_id, user_id, role, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(schedule.event_id)
        .bind(schedule.ministry_id)
        .bind(schedule.user_id)
        .bind(schedule.role)
        .bind(schedule.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(schedule)
    }
}
