//! Entity store: models, persistence contract, and backends

pub mod memory;
pub mod models;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryStore;
pub use models::*;
pub use sqlite::SqliteStore;
pub use traits::*;

/// Range checks shared by both backends. Shape validation beyond these is
/// the routing collaborator's job; the core only defends what it can judge
/// without context.
pub(crate) mod validate {
    use crate::{Error, Result};
    use chrono::NaiveDate;

    pub fn week_range(week_start: NaiveDate, week_end: NaiveDate) -> Result<()> {
        if week_end < week_start {
            return Err(Error::InvalidInput(format!(
                "week_end {} before week_start {}",
                week_end, week_start
            )));
        }
        Ok(())
    }

    pub fn metric_rating(rating: f64) -> Result<()> {
        if !rating.is_finite() || rating < 0.0 {
            return Err(Error::InvalidInput(format!(
                "metric rating must be finite and non-negative, got {}",
                rating
            )));
        }
        Ok(())
    }

    pub fn star_rating(rating: i64) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(Error::InvalidInput(format!(
                "star rating must be 1-5, got {}",
                rating
            )));
        }
        Ok(())
    }
}
