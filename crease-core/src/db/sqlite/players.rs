//! Player store operations over SQLite

use super::SqliteStore;
use crate::db::models::{NewPlayer, Player, PlayerUpdate};
use crate::db::traits::PlayerStore;
use crate::{Error, Result};

type PlayerRow = (
    i64,
    String,
    String,
    Option<i64>,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn row_to_player(row: PlayerRow) -> Player {
    let (id, name, batch, age, dominant_hand, photo, status) = row;
    Player {
        id,
        name,
        batch,
        age,
        dominant_hand,
        photo,
        status,
    }
}

impl PlayerStore for SqliteStore {
    async fn create_player(&self, new: NewPlayer) -> Result<Player> {
        let result = sqlx::query(
            r#"
            INSERT INTO players (name, batch, age, dominant_hand, photo, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.batch)
        .bind(new.age)
        .bind(&new.dominant_hand)
        .bind(&new.photo)
        .bind(&new.status)
        .execute(&self.pool)
        .await?;

        Ok(Player {
            id: result.last_insert_rowid(),
            name: new.name,
            batch: new.batch,
            age: new.age,
            dominant_hand: new.dominant_hand,
            photo: new.photo,
            status: new.status,
        })
    }

    async fn load_player(&self, id: i64) -> Result<Player> {
        let row: Option<PlayerRow> = sqlx::query_as(
            r#"
            SELECT id, name, batch, age, dominant_hand, photo, status
            FROM players
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_player)
            .ok_or_else(|| Error::NotFound(format!("player {}", id)))
    }

    async fn list_players(&self) -> Result<Vec<Player>> {
        let rows: Vec<PlayerRow> = sqlx::query_as(
            r#"
            SELECT id, name, batch, age, dominant_hand, photo, status
            FROM players
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_player).collect())
    }

    async fn update_player(&self, id: i64, update: PlayerUpdate) -> Result<Player> {
        let result = sqlx::query(
            r#"
            UPDATE players SET
                name = COALESCE(?, name),
                batch = COALESCE(?, batch),
                age = COALESCE(?, age),
                dominant_hand = COALESCE(?, dominant_hand),
                photo = COALESCE(?, photo),
                status = COALESCE(?, status)
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.batch)
        .bind(update.age)
        .bind(&update.dominant_hand)
        .bind(&update.photo)
        .bind(&update.status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("player {}", id)));
        }
        self.load_player(id).await
    }

    async fn delete_player(&self, id: i64) -> Result<()> {
        // Cascades through ON DELETE CASCADE to the player's assessments
        // (and their metrics/problem areas) and videos.
        let result = sqlx::query("DELETE FROM players WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("player {}", id)));
        }
        Ok(())
    }
}
