//! Assessment store operations over SQLite
//!
//! `create_assessment` is the invariant operation **[REQ-CS-020]**: the
//! demote-then-insert step runs inside a transaction so concurrent
//! creators cannot leave two assessments marked current.

use super::SqliteStore;
use crate::db::models::{Assessment, NewAssessment};
use crate::db::traits::AssessmentStore;
use crate::db::validate;
use crate::{Error, Result};
use chrono::NaiveDate;
use tracing::warn;

type AssessmentRow = (i64, i64, NaiveDate, NaiveDate, String, bool);

fn row_to_assessment(row: AssessmentRow) -> Assessment {
    let (id, player_id, week_start, week_end, notes, is_current) = row;
    Assessment {
        id,
        player_id,
        week_start,
        week_end,
        notes,
        is_current,
    }
}

impl AssessmentStore for SqliteStore {
    async fn create_assessment(&self, new: NewAssessment) -> Result<Assessment> {
        validate::week_range(new.week_start, new.week_end)?;

        let mut tx = self.pool.begin().await?;

        let player: Option<i64> = sqlx::query_scalar("SELECT id FROM players WHERE id = ?")
            .bind(new.player_id)
            .fetch_optional(&mut *tx)
            .await?;
        if player.is_none() {
            return Err(Error::NotFound(format!("player {}", new.player_id)));
        }

        if new.make_current {
            // Clear every current flag for the player. There should be at
            // most one, but a latent violation is repaired rather than
            // rejected.
            let current: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM assessments WHERE player_id = ? AND is_current = 1",
            )
            .bind(new.player_id)
            .fetch_one(&mut *tx)
            .await?;
            if current > 1 {
                warn!(
                    player_id = new.player_id,
                    demoted = current,
                    "repaired multiple current assessments"
                );
            }

            sqlx::query("UPDATE assessments SET is_current = 0 WHERE player_id = ? AND is_current = 1")
                .bind(new.player_id)
                .execute(&mut *tx)
                .await?;
        }

        let result = sqlx::query(
            r#"
            INSERT INTO assessments (player_id, week_start, week_end, notes, is_current)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.player_id)
        .bind(new.week_start)
        .bind(new.week_end)
        .bind(&new.notes)
        .bind(new.make_current)
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        tx.commit().await?;

        Ok(Assessment {
            id,
            player_id: new.player_id,
            week_start: new.week_start,
            week_end: new.week_end,
            notes: new.notes,
            is_current: new.make_current,
        })
    }

    async fn load_assessment(&self, id: i64) -> Result<Assessment> {
        let row: Option<AssessmentRow> = sqlx::query_as(
            r#"
            SELECT id, player_id, week_start, week_end, notes, is_current
            FROM assessments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_assessment)
            .ok_or_else(|| Error::NotFound(format!("assessment {}", id)))
    }

    async fn list_assessments(&self) -> Result<Vec<Assessment>> {
        let rows: Vec<AssessmentRow> = sqlx::query_as(
            r#"
            SELECT id, player_id, week_start, week_end, notes, is_current
            FROM assessments
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_assessment).collect())
    }

    async fn assessments_for_player(&self, player_id: i64) -> Result<Vec<Assessment>> {
        // Display order: newest first, ties broken newest id first.
        let rows: Vec<AssessmentRow> = sqlx::query_as(
            r#"
            SELECT id, player_id, week_start, week_end, notes, is_current
            FROM assessments
            WHERE player_id = ?
            ORDER BY week_start DESC, id DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_assessment).collect())
    }

    async fn current_assessment(&self, player_id: i64) -> Result<Option<Assessment>> {
        let row: Option<AssessmentRow> = sqlx::query_as(
            r#"
            SELECT id, player_id, week_start, week_end, notes, is_current
            FROM assessments
            WHERE player_id = ? AND is_current = 1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_assessment))
    }
}
