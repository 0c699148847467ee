//! Metric store operations over SQLite

use super::SqliteStore;
use crate::db::models::{Metric, MetricUpdate, NewMetric};
use crate::db::traits::MetricStore;
use crate::db::validate;
use crate::{Error, Result};

type MetricRow = (
    i64,
    i64,
    String,
    f64,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn row_to_metric(row: MetricRow) -> Metric {
    let (id, assessment_id, metric_type, rating, value_label, notes, media) = row;
    Metric {
        id,
        assessment_id,
        metric_type,
        rating,
        value_label,
        notes,
        media,
    }
}

impl MetricStore for SqliteStore {
    async fn create_metric(&self, new: NewMetric) -> Result<Metric> {
        validate::metric_rating(new.rating)?;

        let assessment: Option<i64> = sqlx::query_scalar("SELECT id FROM assessments WHERE id = ?")
            .bind(new.assessment_id)
            .fetch_optional(&self.pool)
            .await?;
        if assessment.is_none() {
            return Err(Error::NotFound(format!(
                "assessment {}",
                new.assessment_id
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO metrics (assessment_id, metric_type, rating, value_label, notes, media)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.assessment_id)
        .bind(&new.metric_type)
        .bind(new.rating)
        .bind(&new.value_label)
        .bind(&new.notes)
        .bind(&new.media)
        .execute(&self.pool)
        .await?;

        Ok(Metric {
            id: result.last_insert_rowid(),
            assessment_id: new.assessment_id,
            metric_type: new.metric_type,
            rating: new.rating,
            value_label: new.value_label,
            notes: new.notes,
            media: new.media,
        })
    }

    async fn load_metric(&self, id: i64) -> Result<Metric> {
        let row: Option<MetricRow> = sqlx::query_as(
            r#"
            SELECT id, assessment_id, metric_type, rating, value_label, notes, media
            FROM metrics
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_metric)
            .ok_or_else(|| Error::NotFound(format!("metric {}", id)))
    }

    async fn list_metrics(&self) -> Result<Vec<Metric>> {
        let rows: Vec<MetricRow> = sqlx::query_as(
            r#"
            SELECT id, assessment_id, metric_type, rating, value_label, notes, media
            FROM metrics
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_metric).collect())
    }

    async fn metrics_for_assessment(&self, assessment_id: i64) -> Result<Vec<Metric>> {
        let rows: Vec<MetricRow> = sqlx::query_as(
            r#"
            SELECT id, assessment_id, metric_type, rating, value_label, notes, media
            FROM metrics
            WHERE assessment_id = ?
            ORDER BY id
            "#,
        )
        .bind(assessment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_metric).collect())
    }

    async fn update_metric(&self, id: i64, update: MetricUpdate) -> Result<Metric> {
        if let Some(rating) = update.rating {
            validate::metric_rating(rating)?;
        }

        let result = sqlx::query(
            r#"
            UPDATE metrics SET
                rating = COALESCE(?, rating),
                value_label = COALESCE(?, value_label),
                notes = COALESCE(?, notes),
                media = COALESCE(?, media)
            WHERE id = ?
            "#,
        )
        .bind(update.rating)
        .bind(&update.value_label)
        .bind(&update.notes)
        .bind(&update.media)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("metric {}", id)));
        }
        self.load_metric(id).await
    }
}
