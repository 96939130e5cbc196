// src/db/worship_repo.rs

use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::worship::{
        distinct_song_ids, CreateSongPayload, CreateWorshipSetPayload, SetSong, Song, SongFilters,
        UpdateSongPayload, UpdateWorshipSetPayload, WorshipSet, WorshipSetFilters,
    },
};

#[derive(Clone)]
pub struct WorshipRepository {
    pool: PgPool,
}

impl WorshipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  MÚSICAS
    // =========================================================================

    pub async fn list_songs(&self, church_id: Uuid, filters: &SongFilters) -> Result<Vec<Song>, AppError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM songs WHERE church_id = ");
        query.push_bind(church_id);

        if let Some(search) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            query
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR artist ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(artist) = filters.artist.as_deref().filter(|s| !s.is_empty()) {
            query.push(" AND artist = ").push_bind(artist.to_string());
        }
        if let Some(key) = filters.key.as_deref().filter(|s| !s.is_empty()) {
            query.push(" AND original_key = ").push_bind(key.to_string());
        }

        query.push(" ORDER BY title ASC");

        let songs = query.build_query_as::<Song>().fetch_all(&self.pool).await?;
        Ok(songs)
    }

    pub async fn find_song(&self, church_id: Uuid, song_id: Uuid) -> Result<Song, AppError> {
        sqlx::query_as::<_, Song>("SELECT * FROM songs WHERE id = $1 AND church_id = $2")
            .bind(song_id)
            .bind(church_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn create_song(&self, church_id: Uuid, input: CreateSongPayload) -> Result<Song, AppError> {
        let song = sqlx::query_as::<_, Song>(
            r#"
            INSERT INTO songs (church_id, title, artist, original_key, bpm, lyrics, chords, duration_minutes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(church_id)
        .bind(input.title)
        .bind(input.artist)
        .bind(input.original_key)
        .bind(input.bpm)
        .bind(input.lyrics)
        .bind(input.chords)
        .bind(input.duration_minutes)
        .fetch_one(&self.pool)
        .await?;
        Ok(song)
    }

    pub async fn update_song(
        &self,
        church_id: Uuid,
        song_id: Uuid,
        input: UpdateSongPayload,
    ) -> Result<Song, AppError> {
        sqlx::query_as::<_, Song>(
            r#"
            UPDATE songs SET
                title = COALESCE($3, title),
                artist = COALESCE($4, artist),
                original_key = COALESCE($5, original_key),
                bpm = COALESCE($6, bpm),
                lyrics = COALESCE($7, lyrics),
                chords = COALESCE($8, chords),
                duration_minutes = COALESCE($9, duration_minutes),
                updated_at = NOW()
            WHERE id = $1 AND church_id = $2
            RETURNING *
            "#,
        )
        .bind(song_id)
        .bind(church_id)
        .bind(input.title)
        .bind(input.artist)
        .bind(input.original_key)
        .bind(input.bpm)
        .bind(input.lyrics)
        .bind(input.chords)
        .bind(input.duration_minutes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn delete_song(&self, church_id: Uuid, song_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1 AND church_id = $2")
            .bind(song_id)
            .bind(church_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  REPERTÓRIOS
    // =========================================================================

    // Toda música do repertório e o evento (se houver) precisam ser da igreja
    async fn ensure_set_references(
        &self,
        church_id: Uuid,
        event_id: Option<Uuid>,
        songs: Option<&[SetSong]>,
    ) -> Result<(), AppError> {
        if let Some(event_id) = event_id {
            let found: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM events WHERE id = $1 AND church_id = $2)",
            )
            .bind(event_id)
            .bind(church_id)
            .fetch_one(&self.pool)
            .await?;
            if !found {
                return Err(AppError::NotFound);
            }
        }

        if let Some(songs) = songs {
            let ids = distinct_song_ids(songs);
            if ids.is_empty() {
                return Ok(());
            }
            let known: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM songs WHERE church_id = $1 AND id = ANY($2)",
            )
            .bind(church_id)
            .bind(&ids)
            .fetch_one(&self.pool)
            .await?;
            if known != ids.len() as i64 {
                return Err(AppError::BadRequest(
                    "O repertório contém músicas que não são desta igreja.".into(),
                ));
            }
        }
        Ok(())
    }

    pub async fn list_worship_sets(
        &self,
        church_id: Uuid,
        filters: &WorshipSetFilters,
    ) -> Result<Vec<WorshipSet>, AppError> {
        let sets = sqlx::query_as::<_, WorshipSet>(
            r#"
            SELECT * FROM worship_sets
            WHERE church_id = $1 AND ($2::uuid IS NULL OR event_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(church_id)
        .bind(filters.event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sets)
    }

    pub async fn create_worship_set(
        &self,
        church_id: Uuid,
        created_by: Uuid,
        input: CreateWorshipSetPayload,
    ) -> Result<WorshipSet, AppError> {
        self.ensure_set_references(church_id, input.event_id, Some(input.songs_order.as_slice()))
            .await?;

        let set = sqlx::query_as::<_, WorshipSet>(
            r#"
            INSERT INTO worship_sets (church_id, event_id, title, songs_order, total_duration, notes, status, created_by)
            VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6, COALESCE($7, 'DRAFT'), $8)
            RETURNING *
            "#,
        )
        .bind(church_id)
        .bind(input.event_id)
        .bind(input.title)
        .bind(Json(input.songs_order))
        .bind(input.total_duration)
        .bind(input.notes)
        .bind(input.status)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(set)
    }

    pub async fn update_worship_set(
        &self,
        church_id: Uuid,
        set_id: Uuid,
        input: UpdateWorshipSetPayload,
    ) -> Result<WorshipSet, AppError> {
        self.ensure_set_references(church_id, input.event_id, input.songs_order.as_deref())
            .await?;

        sqlx::query_as::<_, WorshipSet>(
            r#"
            UPDATE worship_sets SET
                title = COALESCE($3, title),
                event_id = COALESCE($4, event_id),
                songs_order = COALESCE($5, songs_order),
                total_duration = COALESCE($6, total_duration),
                notes = COALESCE($7, notes),
                status = COALESCE($8, status),
                updated_at = NOW()
            WHERE id = $1 AND church_id = $2
            RETURNING *
            "#,
        )
        .bind(set_id)
        .bind(church_id)
        .bind(input.title)
        .bind(input.event_id)
        .bind(input.songs_order.map(Json))
        .bind(input.total_duration)
        .bind(input.notes)
        .bind(input.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn delete_worship_set(&self, church_id: Uuid, set_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM worship_sets WHERE id = $1 AND church_id = $2")
            .bind(set_id)
            .bind(church_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
