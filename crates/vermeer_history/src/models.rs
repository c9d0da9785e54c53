//! Diesel models for the generation_history table.

use crate::schema::generation_history;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use std::str::FromStr;
use vermeer_core::{GenerationFlags, HistoryItem, Modality, NewHistoryItem};
use vermeer_error::{HistoryError, HistoryErrorKind, HistoryResult};

/// Database row for generation_history.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable)]
#[diesel(table_name = generation_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HistoryRow {
    pub id: i64,
    pub task_id: String,
    pub modality: String,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub thumbnail_url: String,
    pub result_url: Option<String>,
    pub local_path: Option<String>,
    pub model_name: String,
    pub sampler: Option<String>,
    pub steps: Option<i32>,
    pub cfg_scale: Option<f32>,
    pub seed: Option<i64>,
    pub image_count: i32,
    pub high_res_fix: bool,
    pub face_restore: bool,
    pub nsfw: bool,
    /// Unix epoch milliseconds
    pub created_at: i64,
}

/// Insertable row for a new generation.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = generation_history)]
pub struct NewHistoryRow {
    pub task_id: String,
    pub modality: String,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub thumbnail_url: String,
    pub result_url: Option<String>,
    pub model_name: String,
    pub sampler: Option<String>,
    pub steps: Option<i32>,
    pub cfg_scale: Option<f32>,
    pub seed: Option<i64>,
    pub image_count: i32,
    pub high_res_fix: bool,
    pub face_restore: bool,
    pub nsfw: bool,
    pub created_at: i64,
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn corrupt(id: i64, what: impl std::fmt::Display) -> HistoryError {
    HistoryError::new(HistoryErrorKind::Serialization(format!(
        "row {}: {}",
        id, what
    )))
}

impl From<NewHistoryItem> for NewHistoryRow {
    fn from(item: NewHistoryItem) -> Self {
        Self {
            task_id: item.task_id,
            modality: item.modality.to_string(),
            prompt: item.prompt,
            negative_prompt: item.negative_prompt,
            thumbnail_url: item.thumbnail_url,
            result_url: item.result_url,
            model_name: item.model_name,
            sampler: item.sampler,
            steps: item.steps.map(to_i32),
            cfg_scale: item.cfg_scale,
            seed: item.seed,
            image_count: to_i32(item.image_count),
            high_res_fix: item.flags.high_res_fix,
            face_restore: item.flags.face_restore,
            nsfw: item.flags.nsfw,
            created_at: item.created_at.timestamp_millis(),
        }
    }
}

impl TryFrom<HistoryRow> for HistoryItem {
    type Error = HistoryError;

    fn try_from(row: HistoryRow) -> HistoryResult<Self> {
        let modality = Modality::from_str(&row.modality)
            .map_err(|_| corrupt(row.id, format!("unknown modality '{}'", row.modality)))?;

        let steps = row
            .steps
            .map(u32::try_from)
            .transpose()
            .map_err(|_| corrupt(row.id, "negative step count"))?;

        let image_count =
            u32::try_from(row.image_count).map_err(|_| corrupt(row.id, "negative image count"))?;

        let created_at: DateTime<Utc> = DateTime::from_timestamp_millis(row.created_at)
            .ok_or_else(|| corrupt(row.id, format!("timestamp {} out of range", row.created_at)))?;

        Ok(HistoryItem {
            id: row.id,
            task_id: row.task_id,
            modality,
            prompt: row.prompt,
            negative_prompt: row.negative_prompt,
            thumbnail_url: row.thumbnail_url,
            result_url: row.result_url,
            local_path: row.local_path,
            model_name: row.model_name,
            sampler: row.sampler,
            steps,
            cfg_scale: row.cfg_scale,
            seed: row.seed,
            image_count,
            flags: GenerationFlags {
                high_res_fix: row.high_res_fix,
                face_restore: row.face_restore,
                nsfw: row.nsfw,
            },
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> HistoryRow {
        HistoryRow {
            id: 7,
            task_id: "task_abc123".to_string(),
            modality: "IMAGE_TO_VIDEO".to_string(),
            prompt: "waves".to_string(),
            negative_prompt: None,
            thumbnail_url: "https://x/1.png".to_string(),
            result_url: Some("https://x/1.mp4".to_string()),
            local_path: None,
            model_name: "stableVideoDiffusion".to_string(),
            sampler: Some("Euler a".to_string()),
            steps: Some(25),
            cfg_scale: Some(7.0),
            seed: Some(-1),
            image_count: 1,
            high_res_fix: false,
            face_restore: true,
            nsfw: false,
            created_at: 1_700_000_000_123,
        }
    }

    #[test]
    fn test_row_to_item() {
        let item = HistoryItem::try_from(row()).unwrap();
        assert_eq!(item.modality, Modality::ImageToVideo);
        assert_eq!(item.steps, Some(25));
        assert!(item.flags.face_restore);
        assert_eq!(item.created_at.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn test_unknown_modality_is_corrupt() {
        let mut bad = row();
        bad.modality = "HOLOGRAM".to_string();
        let err = HistoryItem::try_from(bad).unwrap_err();
        assert!(matches!(err.kind, HistoryErrorKind::Serialization(_)));
    }

    #[test]
    fn test_negative_count_is_corrupt() {
        let mut bad = row();
        bad.image_count = -2;
        assert!(HistoryItem::try_from(bad).is_err());
    }

    #[test]
    fn test_new_item_flags_and_millis() {
        let mut item = NewHistoryItem::new("t1", Modality::Upscale, "sharpen");
        item.flags.nsfw = true;
        item.steps = Some(40);
        let millis = item.created_at.timestamp_millis();

        let row = NewHistoryRow::from(item);
        assert_eq!(row.modality, "UPSCALE");
        assert!(row.nsfw);
        assert_eq!(row.steps, Some(40));
        assert_eq!(row.created_at, millis);
    }
}
