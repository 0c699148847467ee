//! Async store trait definitions for the persistence contract
//!
//! Each trait covers one entity kind, so backends (in-memory and SQLite)
//! are interchangeable via static dispatch: consumers bound as
//! `S: AssessmentStore + MetricStore` work against either.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so the
//! futures are guaranteed `Send` for use under `tokio::spawn`.

use crate::db::models::{
    Assessment, Metric, MetricUpdate, NewAssessment, NewMetric, NewPlayer, NewProblemArea,
    NewVideo, Player, PlayerUpdate, ProblemArea, ProblemAreaUpdate, Video, VideoTagUpdate,
};
use crate::Result;
use std::future::Future;

/// Store for player roster entries.
pub trait PlayerStore: Send + Sync {
    /// Allocates a fresh identity; never reuses one.
    fn create_player(&self, new: NewPlayer) -> impl Future<Output = Result<Player>> + Send;

    /// Fails with `Error::NotFound` when the id does not exist.
    fn load_player(&self, id: i64) -> impl Future<Output = Result<Player>> + Send;

    /// All players in id (insertion) order.
    fn list_players(&self) -> impl Future<Output = Result<Vec<Player>>> + Send;

    /// Merges the supplied fields into the record; `None` fields are
    /// left untouched.
    fn update_player(
        &self,
        id: i64,
        update: PlayerUpdate,
    ) -> impl Future<Output = Result<Player>> + Send;

    /// Administrative hard delete. Cascades to the player's assessments
    /// (with their metrics and problem areas) and videos.
    fn delete_player(&self, id: i64) -> impl Future<Output = Result<()>> + Send;
}

/// Store for performance assessments.
///
/// Implementations must enforce the current-assessment invariant
/// **[REQ-CS-020]**: after `create_assessment` returns, at most one
/// assessment of the player carries `is_current = true`, regardless of
/// prior state. The demote-then-insert step is atomic per backend (a
/// transaction in SQLite, the single write lock in memory).
pub trait AssessmentStore: Send + Sync {
    /// Inserts a new assessment. When `new.make_current` is true, every
    /// previously current assessment of the player is demoted first; a
    /// latent zero-or-many violation is repaired, not rejected.
    fn create_assessment(
        &self,
        new: NewAssessment,
    ) -> impl Future<Output = Result<Assessment>> + Send;

    fn load_assessment(&self, id: i64) -> impl Future<Output = Result<Assessment>> + Send;

    /// All assessments in id order.
    fn list_assessments(&self) -> impl Future<Output = Result<Vec<Assessment>>> + Send;

    /// A player's assessments, newest-first by week_start (ties broken
    /// newest id first) — the display order.
    fn assessments_for_player(
        &self,
        player_id: i64,
    ) -> impl Future<Output = Result<Vec<Assessment>>> + Send;

    /// The player's single current assessment, if any.
    fn current_assessment(
        &self,
        player_id: i64,
    ) -> impl Future<Output = Result<Option<Assessment>>> + Send;
}

/// Store for performance metrics (rated skills and shots).
pub trait MetricStore: Send + Sync {
    fn create_metric(&self, new: NewMetric) -> impl Future<Output = Result<Metric>> + Send;

    fn load_metric(&self, id: i64) -> impl Future<Output = Result<Metric>> + Send;

    fn list_metrics(&self) -> impl Future<Output = Result<Vec<Metric>>> + Send;

    /// An assessment's metrics in id order.
    fn metrics_for_assessment(
        &self,
        assessment_id: i64,
    ) -> impl Future<Output = Result<Vec<Metric>>> + Send;

    fn update_metric(
        &self,
        id: i64,
        update: MetricUpdate,
    ) -> impl Future<Output = Result<Metric>> + Send;
}

/// Store for flagged problem areas.
pub trait ProblemAreaStore: Send + Sync {
    fn create_problem_area(
        &self,
        new: NewProblemArea,
    ) -> impl Future<Output = Result<ProblemArea>> + Send;

    fn load_problem_area(&self, id: i64) -> impl Future<Output = Result<ProblemArea>> + Send;

    fn list_problem_areas(&self) -> impl Future<Output = Result<Vec<ProblemArea>>> + Send;

    fn problem_areas_for_assessment(
        &self,
        assessment_id: i64,
    ) -> impl Future<Output = Result<Vec<ProblemArea>>> + Send;

    fn update_problem_area(
        &self,
        id: i64,
        update: ProblemAreaUpdate,
    ) -> impl Future<Output = Result<ProblemArea>> + Send;
}

/// Store for uploaded video records.
pub trait VideoStore: Send + Sync {
    fn create_video(&self, new: NewVideo) -> impl Future<Output = Result<Video>> + Send;

    fn load_video(&self, id: i64) -> impl Future<Output = Result<Video>> + Send;

    fn list_videos(&self) -> impl Future<Output = Result<Vec<Video>>> + Send;

    /// A player's videos in insertion order. Filtering built on top of
    /// this listing must not reorder it.
    fn videos_for_player(&self, player_id: i64) -> impl Future<Output = Result<Vec<Video>>> + Send;

    /// Tag correction; videos are otherwise immutable after upload.
    fn update_video_tags(
        &self,
        id: i64,
        update: VideoTagUpdate,
    ) -> impl Future<Output = Result<Video>> + Send;
}
