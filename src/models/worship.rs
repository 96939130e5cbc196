// src/models/worship.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// --- Músicas ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: Uuid,
    pub church_id: Uuid,

    #[schema(example = "Grande é o Senhor")]
    pub title: String,

    #[schema(example = "Adhemar de Campos")]
    pub artist: Option<String>,

    #[schema(example = "G")]
    pub original_key: Option<String>,

    #[schema(example = 72)]
    pub bpm: Option<i32>,

    pub lyrics: Option<String>,
    pub chords: Option<String>,
    pub duration_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSongPayload {
    #[validate(length(min = 1, message = "O título da música é obrigatório."))]
    pub title: String,
    pub artist: Option<String>,
    pub original_key: Option<String>,
    #[validate(range(min = 1, max = 400, message = "BPM fora do intervalo."))]
    pub bpm: Option<i32>,
    pub lyrics: Option<String>,
    pub chords: Option<String>,
    #[validate(range(min = 0, message = "A duração não pode ser negativa."))]
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSongPayload {
    #[validate(length(min = 1, message = "O título da música é obrigatório."))]
    pub title: Option<String>,
    pub artist: Option<String>,
    pub original_key: Option<String>,
    #[validate(range(min = 1, max = 400, message = "BPM fora do intervalo."))]
    pub bpm: Option<i32>,
    pub lyrics: Option<String>,
    pub chords: Option<String>,
    #[validate(range(min = 0, message = "A duração não pode ser negativa."))]
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SongFilters {
    /// Busca no título ou no artista
    pub search: Option<String>,
    pub artist: Option<String>,
    /// Tom original
    pub key: Option<String>,
}

// --- Repertórios ---

/// Uma música dentro do repertório, com o tom e as notas daquele culto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetSong {
    pub song_id: Uuid,
    #[schema(example = "A")]
    pub key: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorshipSet {
    pub id: Uuid,
    pub church_id: Uuid,
    pub event_id: Option<Uuid>,

    #[schema(example = "Culto de Domingo - Manhã")]
    pub title: String,

    #[schema(value_type = Vec<SetSong>)]
    pub songs_order: Json<Vec<SetSong>>,

    /// Minutos
    pub total_duration: i32,
    pub notes: Option<String>,

    #[schema(example = "DRAFT")]
    pub status: String,

    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorshipSetPayload {
    #[validate(length(min = 1, message = "O título do repertório é obrigatório."))]
    pub title: String,
    pub event_id: Option<Uuid>,
    #[serde(default)]
    pub songs_order: Vec<SetSong>,
    #[validate(range(min = 0, message = "A duração não pode ser negativa."))]
    pub total_duration: Option<i32>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorshipSetPayload {
    #[validate(length(min = 1, message = "O título do repertório é obrigatório."))]
    pub title: Option<String>,
    pub event_id: Option<Uuid>,
    pub songs_order: Option<Vec<SetSong>>,
    #[validate(range(min = 0, message = "A duração não pode ser negativa."))]
    pub total_duration: Option<i32>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct WorshipSetFilters {
    pub event_id: Option<Uuid>,
}

/// Ids de música distintos do repertório, na ordem em que aparecem.
pub fn distinct_song_ids(songs: &[SetSong]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = Vec::with_capacity(songs.len());
    for song in songs {
        if !ids.contains(&song.song_id) {
            ids.push(song.song_id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_songs_use_camel_case_on_the_wire() {
        let id = Uuid::new_v4();
        let parsed: Vec<SetSong> =
            serde_json::from_value(json!([{ "songId": id, "key": "D" }])).unwrap();

        assert_eq!(parsed[0].song_id, id);
        assert_eq!(parsed[0].key.as_deref(), Some("D"));
        assert!(parsed[0].notes.is_none());
    }

    #[test]
    fn repeated_songs_are_counted_once() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let order: Vec<SetSong> = [a, b, a]
            .into_iter()
            .map(|song_id| SetSong { song_id, key: None, notes: None })
            .collect();

        assert_eq!(distinct_song_ids(&order), vec![a, b]);
    }
}
