//! Video store operations over SQLite

use super::SqliteStore;
use crate::db::models::{NewVideo, Video, VideoTagUpdate};
use crate::db::traits::VideoStore;
use crate::{Error, Result};
use chrono::NaiveDate;

type VideoRow = (i64, i64, String, String, NaiveDate, String, String, String);

fn row_to_video(row: VideoRow) -> Video {
    let (id, player_id, title, locator, recorded_on, shot_type, ball_speed, bat_connect) = row;
    Video {
        id,
        player_id,
        title,
        locator,
        recorded_on,
        shot_type,
        ball_speed,
        bat_connect,
    }
}

impl VideoStore for SqliteStore {
    async fn create_video(&self, new: NewVideo) -> Result<Video> {
        let player: Option<i64> = sqlx::query_scalar("SELECT id FROM players WHERE id = ?")
            .bind(new.player_id)
            .fetch_optional(&self.pool)
            .await?;
        if player.is_none() {
            return Err(Error::NotFound(format!("player {}", new.player_id)));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO videos (player_id, title, locator, recorded_on, shot_type, ball_speed, bat_connect)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.player_id)
        .bind(&new.title)
        .bind(&new.locator)
        .bind(new.recorded_on)
        .bind(&new.shot_type)
        .bind(&new.ball_speed)
        .bind(&new.bat_connect)
        .execute(&self.pool)
        .await?;

        Ok(Video {
            id: result.last_insert_rowid(),
            player_id: new.player_id,
            title: new.title,
            locator: new.locator,
            recorded_on: new.recorded_on,
            shot_type: new.shot_type,
            ball_speed: new.ball_speed,
            bat_connect: new.bat_connect,
        })
    }

    async fn load_video(&self, id: i64) -> Result<Video> {
        let row: Option<VideoRow> = sqlx::query_as(
            r#"
            SELECT id, player_id, title, locator, recorded_on, shot_type, ball_speed, bat_connect
            FROM videos
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_video)
            .ok_or_else(|| Error::NotFound(format!("video {}", id)))
    }

    async fn list_videos(&self) -> Result<Vec<Video>> {
        let rows: Vec<VideoRow> = sqlx::query_as(
            r#"
            SELECT id, player_id, title, locator, recorded_on, shot_type, ball_speed, bat_connect
            FROM videos
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_video).collect())
    }

    async fn videos_for_player(&self, player_id: i64) -> Result<Vec<Video>> {
        // Insertion order; filtering layers above must not reorder.
        let rows: Vec<VideoRow> = sqlx::query_as(
            r#"
            SELECT id, player_id, title, locator, recorded_on, shot_type, ball_speed, bat_connect
            FROM videos
            WHERE player_id = ?
            ORDER BY id
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_video).collect())
    }

    async fn update_video_tags(&self, id: i64, update: VideoTagUpdate) -> Result<Video> {
        let result = sqlx::query(
            r#"
            UPDATE videos SET
                shot_type = COALESCE(?, shot_type),
                ball_speed = COALESCE(?, ball_speed),
                bat_connect = COALESCE(?, bat_connect)
            WHERE id = ?
            "#,
        )
        .bind(&update.shot_type)
        .bind(&update.ball_speed)
        .bind(&update.bat_connect)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("video {}", id)));
        }
        self.load_video(id).await
    }
}
