//! Problem-area store operations over SQLite
//!
//! `area_type` is stored as its canonical database string; an
//! unrecognized value in the table is surfaced as `Error::Internal`
//! rather than silently dropped.

use super::SqliteStore;
use crate::db::models::{AreaType, NewProblemArea, ProblemArea, ProblemAreaUpdate};
use crate::db::traits::ProblemAreaStore;
use crate::db::validate;
use crate::{Error, Result};

type ProblemAreaRow = (i64, i64, String, i64, Option<String>);

fn row_to_problem_area(row: ProblemAreaRow) -> Result<ProblemArea> {
    let (id, assessment_id, area_type, rating, notes) = row;
    let area_type = AreaType::from_str(&area_type)
        .ok_or_else(|| Error::Internal(format!("unknown area type in database: {}", area_type)))?;
    Ok(ProblemArea {
        id,
        assessment_id,
        area_type,
        rating,
        notes,
    })
}

impl ProblemAreaStore for SqliteStore {
    async fn create_problem_area(&self, new: NewProblemArea) -> Result<ProblemArea> {
        validate::star_rating(new.rating)?;

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
            INSERT INTO problem_areas (assessment_id, area_type, rating, notes)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(new.assessment_id)
        .bind(new.area_type.to_db_string())
        .bind(new.rating)
        .bind(&new.notes)
        .execute(&self.pool)
        .await?;

        Ok(ProblemArea {
            id: result.last_insert_rowid(),
            assessment_id: new.assessment_id,
            area_type: new.area_type,
            rating: new.rating,
            notes: new.notes,
        })
    }

    async fn load_problem_area(&self, id: i64) -> Result<ProblemArea> {
        let row: Option<ProblemAreaRow> = sqlx::query_as(
            r#"
            SELECT id, assessment_id, area_type, rating, notes
            FROM problem_areas
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row_to_problem_area(row),
            None => Err(Error::NotFound(format!("problem area {}", id))),
        }
    }

    async fn list_problem_areas(&self) -> Result<Vec<ProblemArea>> {
        let rows: Vec<ProblemAreaRow> = sqlx::query_as(
            r#"
            SELECT id, assessment_id, area_type, rating, notes
            FROM problem_areas
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_problem_area).collect()
    }

    async fn problem_areas_for_assessment(&self, assessment_id: i64) -> Result<Vec<ProblemArea>> {
        let rows: Vec<ProblemAreaRow> = sqlx::query_as(
            r#"
            SELECT id, assessment_id, area_type, rating, notes
            FROM problem_areas
            WHERE assessment_id = ?
            ORDER BY id
            "#,
        )
        .bind(assessment_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_problem_area).collect()
    }

    async fn update_problem_area(&self, id: i64, update: ProblemAreaUpdate) -> Result<ProblemArea> {
        if let Some(rating) = update.rating {
            validate::star_rating(rating)?;
        }

        let result = sqlx::query(
            r#"
            UPDATE problem_areas SET
                rating = COALESCE(?, rating),
                notes = COALESCE(?, notes)
            WHERE id = ?
            "#,
        )
        .bind(update.rating)
        .bind(&update.notes)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("problem area {}", id)));
        }
        self.load_problem_area(id).await
    }
}
