//! Schema creation
//!
//! Tables are created in code with `CREATE TABLE IF NOT EXISTS`, so
//! opening a database is idempotent. Identities are `INTEGER PRIMARY KEY
//! AUTOINCREMENT` (monotonic, never reused); ownership edges carry
//! `ON DELETE CASCADE` so an administrative player delete takes the
//! player's assessments, metrics, problem areas and videos with it.

use crate::Result;
use sqlx::SqlitePool;

pub async fn create_all_tables(pool: &SqlitePool) -> Result<()> {
    create_players_table(pool).await?;
    create_assessments_table(pool).await?;
    create_metrics_table(pool).await?;
    create_problem_areas_table(pool).await?;
    create_videos_table(pool).await?;
    Ok(())
}

async fn create_players_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS players (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            batch TEXT NOT NULL,
            age INTEGER,
            dominant_hand TEXT,
            photo TEXT,
            status TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_assessments_table(pool: &SqlitePool) -> Result<()> {
    // Dates are ISO-8601 TEXT, so the week-range CHECK compares correctly.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assessments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
            week_start TEXT NOT NULL,
            week_end TEXT NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            is_current INTEGER NOT NULL DEFAULT 0,
            CHECK (week_end >= week_start)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_metrics_table(pool: &SqlitePool) -> Result<()> {
    // metric_type is an open vocabulary; no CHECK constrains it.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS metrics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            assessment_id INTEGER NOT NULL REFERENCES assessments(id) ON DELETE CASCADE,
            metric_type TEXT NOT NULL,
            rating REAL NOT NULL CHECK (rating >= 0),
            value_label TEXT,
            notes TEXT,
            media TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_problem_areas_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS problem_areas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            assessment_id INTEGER NOT NULL REFERENCES assessments(id) ON DELETE CASCADE,
            area_type TEXT NOT NULL,
            rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
            notes TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_videos_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS videos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            locator TEXT NOT NULL,
            recorded_on TEXT NOT NULL,
            shot_type TEXT NOT NULL,
            ball_speed TEXT NOT NULL,
            bat_connect TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
