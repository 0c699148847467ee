//! In-memory store backend
//!
//! The default backend: arena-style `BTreeMap<i64, E>` tables behind a
//! single `tokio::sync::RwLock`, with atomic per-entity-kind identity
//! counters. Because ids are allocated monotonically, BTreeMap iteration
//! order is insertion order, which pins the listing orders the contract
//! documents. This backend never produces `Error::Database`.

use crate::db::models::{
    Assessment, Metric, MetricUpdate, NewAssessment, NewMetric, NewPlayer, NewProblemArea,
    NewVideo, Player, PlayerUpdate, ProblemArea, ProblemAreaUpdate, Video, VideoTagUpdate,
};
use crate::db::traits::{AssessmentStore, MetricStore, PlayerStore, ProblemAreaStore, VideoStore};
use crate::db::validate;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use tracing::warn;

#[derive(Default)]
struct Tables {
    players: BTreeMap<i64, Player>,
    assessments: BTreeMap<i64, Assessment>,
    metrics: BTreeMap<i64, Metric>,
    problem_areas: BTreeMap<i64, ProblemArea>,
    videos: BTreeMap<i64, Video>,
}

/// In-memory implementation of the five store traits.
pub struct MemoryStore {
    tables: RwLock<Tables>,
    next_player_id: AtomicI64,
    next_assessment_id: AtomicI64,
    next_metric_id: AtomicI64,
    next_problem_area_id: AtomicI64,
    next_video_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            next_player_id: AtomicI64::new(1),
            next_assessment_id: AtomicI64::new(1),
            next_metric_id: AtomicI64::new(1),
            next_problem_area_id: AtomicI64::new(1),
            next_video_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStore for MemoryStore {
    async fn create_player(&self, new: NewPlayer) -> Result<Player> {
        let id = self.next_player_id.fetch_add(1, Ordering::Relaxed);
        let player = Player {
            id,
            name: new.name,
            batch: new.batch,
            age: new.age,
            dominant_hand: new.dominant_hand,
            photo: new.photo,
            status: new.status,
        };
        let mut tables = self.tables.write().await;
        tables.players.insert(id, player.clone());
        Ok(player)
    }

    async fn load_player(&self, id: i64) -> Result<Player> {
        let tables = self.tables.read().await;
        tables
            .players
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("player {}", id)))
    }

    async fn list_players(&self) -> Result<Vec<Player>> {
        let tables = self.tables.read().await;
        Ok(tables.players.values().cloned().collect())
    }

    async fn update_player(&self, id: i64, update: PlayerUpdate) -> Result<Player> {
        let mut tables = self.tables.write().await;
        let player = tables
            .players
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("player {}", id)))?;
        if let Some(name) = update.name {
            player.name = name;
        }
        if let Some(batch) = update.batch {
            player.batch = batch;
        }
        if let Some(age) = update.age {
            player.age = Some(age);
        }
        if let Some(hand) = update.dominant_hand {
            player.dominant_hand = Some(hand);
        }
        if let Some(photo) = update.photo {
            player.photo = Some(photo);
        }
        if let Some(status) = update.status {
            player.status = Some(status);
        }
        Ok(player.clone())
    }

    async fn delete_player(&self, id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.players.remove(&id).is_none() {
            return Err(Error::NotFound(format!("player {}", id)));
        }

        // Cascade: assessments (with their metrics and problem areas) and
        // videos owned by the player go with it.
        let assessment_ids: Vec<i64> = tables
            .assessments
            .values()
            .filter(|a| a.player_id == id)
            .map(|a| a.id)
            .collect();
        tables.assessments.retain(|_, a| a.player_id != id);
        tables
            .metrics
            .retain(|_, m| !assessment_ids.contains(&m.assessment_id));
        tables
            .problem_areas
            .retain(|_, p| !assessment_ids.contains(&p.assessment_id));
        tables.videos.retain(|_, v| v.player_id != id);
        Ok(())
    }
}

impl AssessmentStore for MemoryStore {
    async fn create_assessment(&self, new: NewAssessment) -> Result<Assessment> {
        validate::week_range(new.week_start, new.week_end)?;

        // Demote-then-insert runs entirely under the write lock, so two
        // concurrent creators cannot both end up current.
        let mut tables = self.tables.write().await;
        if !tables.players.contains_key(&new.player_id) {
            return Err(Error::NotFound(format!("player {}", new.player_id)));
        }

        if new.make_current {
            let mut demoted = 0;
            for assessment in tables.assessments.values_mut() {
                if assessment.player_id == new.player_id && assessment.is_current {
                    assessment.is_current = false;
                    demoted += 1;
                }
            }
            if demoted > 1 {
                warn!(
                    player_id = new.player_id,
                    demoted, "repaired multiple current assessments"
                );
            }
        }

        let id = self.next_assessment_id.fetch_add(1, Ordering::Relaxed);
        let assessment = Assessment {
            id,
            player_id: new.player_id,
            week_start: new.week_start,
            week_end: new.week_end,
            notes: new.notes,
            is_current: new.make_current,
        };
        tables.assessments.insert(id, assessment.clone());
        Ok(assessment)
    }

    async fn load_assessment(&self, id: i64) -> Result<Assessment> {
        let tables = self.tables.read().await;
        tables
            .assessments
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("assessment {}", id)))
    }

    async fn list_assessments(&self) -> Result<Vec<Assessment>> {
        let tables = self.tables.read().await;
        Ok(tables.assessments.values().cloned().collect())
    }

    async fn assessments_for_player(&self, player_id: i64) -> Result<Vec<Assessment>> {
        let tables = self.tables.read().await;
        let mut assessments: Vec<Assessment> = tables
            .assessments
            .values()
            .filter(|a| a.player_id == player_id)
            .cloned()
            .collect();
        assessments.sort_by(|a, b| {
            b.week_start
                .cmp(&a.week_start)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(assessments)
    }

    async fn current_assessment(&self, player_id: i64) -> Result<Option<Assessment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assessments
            .values()
            .find(|a| a.player_id == player_id && a.is_current)
            .cloned())
    }
}

impl MetricStore for MemoryStore {
    async fn create_metric(&self, new: NewMetric) -> Result<Metric> {
        validate::metric_rating(new.rating)?;
        let mut tables = self.tables.write().await;
        if !tables.assessments.contains_key(&new.assessment_id) {
            return Err(Error::NotFound(format!(
                "assessment {}",
                new.assessment_id
            )));
        }
        let id = self.next_metric_id.fetch_add(1, Ordering::Relaxed);
        let metric = Metric {
            id,
            assessment_id: new.assessment_id,
            metric_type: new.metric_type,
            rating: new.rating,
            value_label: new.value_label,
            notes: new.notes,
            media: new.media,
        };
        tables.metrics.insert(id, metric.clone());
        Ok(metric)
    }

    async fn load_metric(&self, id: i64) -> Result<Metric> {
        let tables = self.tables.read().await;
        tables
            .metrics
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("metric {}", id)))
    }

    async fn list_metrics(&self) -> Result<Vec<Metric>> {
        let tables = self.tables.read().await;
        Ok(tables.metrics.values().cloned().collect())
    }

    async fn metrics_for_assessment(&self, assessment_id: i64) -> Result<Vec<Metric>> {
        let tables = self.tables.read().await;
        Ok(tables
            .metrics
            .values()
            .filter(|m| m.assessment_id == assessment_id)
            .cloned()
            .collect())
    }

    async fn update_metric(&self, id: i64, update: MetricUpdate) -> Result<Metric> {
        if let Some(rating) = update.rating {
            validate::metric_rating(rating)?;
        }
        let mut tables = self.tables.write().await;
        let metric = tables
            .metrics
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("metric {}", id)))?;
        if let Some(rating) = update.rating {
            metric.rating = rating;
        }
        if let Some(label) = update.value_label {
            metric.value_label = Some(label);
        }
        if let Some(notes) = update.notes {
            metric.notes = Some(notes);
        }
        if let Some(media) = update.media {
            metric.media = Some(media);
        }
        Ok(metric.clone())
    }
}

impl ProblemAreaStore for MemoryStore {
    async fn create_problem_area(&self, new: NewProblemArea) -> Result<ProblemArea> {
        validate::star_rating(new.rating)?;
        let mut tables = self.tables.write().await;
        if !tables.assessments.contains_key(&new.assessment_id) {
            return Err(Error::NotFound(format!(
                "assessment {}",
                new.assessment_id
            )));
        }
        let id = self.next_problem_area_id.fetch_add(1, Ordering::Relaxed);
        let area = ProblemArea {
            id,
            assessment_id: new.assessment_id,
            area_type: new.area_type,
            rating: new.rating,
            notes: new.notes,
        };
        tables.problem_areas.insert(id, area.clone());
        Ok(area)
    }

    async fn load_problem_area(&self, id: i64) -> Result<ProblemArea> {
        let tables = self.tables.read().await;
        tables
            .problem_areas
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("problem area {}", id)))
    }

    async fn list_problem_areas(&self) -> Result<Vec<ProblemArea>> {
        let tables = self.tables.read().await;
        Ok(tables.problem_areas.values().cloned().collect())
    }

    async fn problem_areas_for_assessment(&self, assessment_id: i64) -> Result<Vec<ProblemArea>> {
        let tables = self.tables.read().await;
        Ok(tables
            .problem_areas
            .values()
            .filter(|p| p.assessment_id == assessment_id)
            .cloned()
            .collect())
    }

    async fn update_problem_area(&self, id: i64, update: ProblemAreaUpdate) -> Result<ProblemArea> {
        if let Some(rating) = update.rating {
            validate::star_rating(rating)?;
        }
        let mut tables = self.tables.write().await;
        let area = tables
            .problem_areas
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("problem area {}", id)))?;
        if let Some(rating) = update.rating {
            area.rating = rating;
        }
        if let Some(notes) = update.notes {
            area.notes = Some(notes);
        }
        Ok(area.clone())
    }
}

impl VideoStore for MemoryStore {
    async fn create_video(&self, new: NewVideo) -> Result<Video> {
        let mut tables = self.tables.write().await;
        if !tables.players.contains_key(&new.player_id) {
            return Err(Error::NotFound(format!("player {}", new.player_id)));
        }
        let id = self.next_video_id.fetch_add(1, Ordering::Relaxed);
        let video = Video {
            id,
            player_id: new.player_id,
            title: new.title,
            locator: new.locator,
            recorded_on: new.recorded_on,
            shot_type: new.shot_type,
            ball_speed: new.ball_speed,
            bat_connect: new.bat_connect,
        };
        tables.videos.insert(id, video.clone());
        Ok(video)
    }

    async fn load_video(&self, id: i64) -> Result<Video> {
        let tables = self.tables.read().await;
        tables
            .videos
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("video {}", id)))
    }

    async fn list_videos(&self) -> Result<Vec<Video>> {
        let tables = self.tables.read().await;
        Ok(tables.videos.values().cloned().collect())
    }

    async fn videos_for_player(&self, player_id: i64) -> Result<Vec<Video>> {
        let tables = self.tables.read().await;
        Ok(tables
            .videos
            .values()
            .filter(|v| v.player_id == player_id)
            .cloned()
            .collect())
    }

    async fn update_video_tags(&self, id: i64, update: VideoTagUpdate) -> Result<Video> {
        let mut tables = self.tables.write().await;
        let video = tables
            .videos
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("video {}", id)))?;
        if let Some(shot_type) = update.shot_type {
            video.shot_type = shot_type;
        }
        if let Some(ball_speed) = update.ball_speed {
            video.ball_speed = ball_speed;
        }
        if let Some(bat_connect) = update.bat_connect {
            video.bat_connect = bat_connect;
        }
        Ok(video.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_player(name: &str) -> NewPlayer {
        NewPlayer {
            name: name.to_string(),
            batch: "U-15 Morning".to_string(),
            age: Some(14),
            dominant_hand: Some("Right".to_string()),
            photo: None,
            status: None,
        }
    }

    fn week(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[tokio::test]
    async fn test_player_ids_are_monotonic() {
        let store = MemoryStore::new();
        let a = store.create_player(new_player("Arun")).await.unwrap();
        let b = store.create_player(new_player("Bilal")).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_load_missing_player_is_not_found() {
        let store = MemoryStore::new();
        let err = store.load_player(42).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields() {
        let store = MemoryStore::new();
        let player = store.create_player(new_player("Arun")).await.unwrap();
        let updated = store
            .update_player(
                player.id,
                PlayerUpdate {
                    batch: Some("U-17 Evening".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Arun");
        assert_eq!(updated.batch, "U-17 Evening");
        assert_eq!(updated.age, Some(14));
    }

    #[tokio::test]
    async fn test_create_assessment_rejects_inverted_week() {
        let store = MemoryStore::new();
        let player = store.create_player(new_player("Arun")).await.unwrap();
        let err = store
            .create_assessment(NewAssessment {
                player_id: player.id,
                week_start: week(8),
                week_end: week(1),
                notes: String::new(),
                make_current: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_create_assessment_rejects_dangling_player() {
        let store = MemoryStore::new();
        let err = store
            .create_assessment(NewAssessment {
                player_id: 99,
                week_start: week(1),
                week_end: week(7),
                notes: String::new(),
                make_current: true,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_assessments_for_player_newest_first() {
        let store = MemoryStore::new();
        let player = store.create_player(new_player("Arun")).await.unwrap();
        for day in [1, 15, 8] {
            store
                .create_assessment(NewAssessment {
                    player_id: player.id,
                    week_start: week(day),
                    week_end: week(day + 6),
                    notes: String::new(),
                    make_current: false,
                })
                .await
                .unwrap();
        }
        let listed = store.assessments_for_player(player.id).await.unwrap();
        let starts: Vec<NaiveDate> = listed.iter().map(|a| a.week_start).collect();
        assert_eq!(starts, vec![week(15), week(8), week(1)]);
    }

    #[tokio::test]
    async fn test_week_start_tie_breaks_newest_id_first() {
        let store = MemoryStore::new();
        let player = store.create_player(new_player("Arun")).await.unwrap();
        let a1 = store
            .create_assessment(NewAssessment {
                player_id: player.id,
                week_start: week(1),
                week_end: week(7),
                notes: String::new(),
                make_current: false,
            })
            .await
            .unwrap();
        let a2 = store
            .create_assessment(NewAssessment {
                player_id: player.id,
                week_start: week(1),
                week_end: week(7),
                notes: String::new(),
                make_current: false,
            })
            .await
            .unwrap();
        let listed = store.assessments_for_player(player.id).await.unwrap();
        assert_eq!(listed[0].id, a2.id);
        assert_eq!(listed[1].id, a1.id);
    }

    #[tokio::test]
    async fn test_metric_rating_must_be_finite() {
        let store = MemoryStore::new();
        let player = store.create_player(new_player("Arun")).await.unwrap();
        let assessment = store
            .create_assessment(NewAssessment {
                player_id: player.id,
                week_start: week(1),
                week_end: week(7),
                notes: String::new(),
                make_current: true,
            })
            .await
            .unwrap();
        let err = store
            .create_metric(NewMetric {
                assessment_id: assessment.id,
                metric_type: "bat_connect".to_string(),
                rating: f64::NAN,
                value_label: None,
                notes: None,
                media: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_problem_area_rating_bounds() {
        let store = MemoryStore::new();
        let player = store.create_player(new_player("Arun")).await.unwrap();
        let assessment = store
            .create_assessment(NewAssessment {
                player_id: player.id,
                week_start: week(1),
                week_end: week(7),
                notes: String::new(),
                make_current: true,
            })
            .await
            .unwrap();
        for bad in [0, 6] {
            let err = store
                .create_problem_area(NewProblemArea {
                    assessment_id: assessment.id,
                    area_type: crate::db::models::AreaType::Footwork,
                    rating: bad,
                    notes: None,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_delete_player_cascades() {
        let store = MemoryStore::new();
        let player = store.create_player(new_player("Arun")).await.unwrap();
        let assessment = store
            .create_assessment(NewAssessment {
                player_id: player.id,
                week_start: week(1),
                week_end: week(7),
                notes: String::new(),
                make_current: true,
            })
            .await
            .unwrap();
        store
            .create_metric(NewMetric {
                assessment_id: assessment.id,
                metric_type: "footwork".to_string(),
                rating: 3.0,
                value_label: None,
                notes: None,
                media: None,
            })
            .await
            .unwrap();
        store
            .create_video(NewVideo {
                player_id: player.id,
                title: "Nets session".to_string(),
                locator: "media/nets.mp4".to_string(),
                recorded_on: week(2),
                shot_type: "Cover Drive".to_string(),
                ball_speed: "Fast".to_string(),
                bat_connect: "Middle".to_string(),
            })
            .await
            .unwrap();

        store.delete_player(player.id).await.unwrap();
        assert!(store.list_assessments().await.unwrap().is_empty());
        assert!(store.list_metrics().await.unwrap().is_empty());
        assert!(store.list_videos().await.unwrap().is_empty());
    }
}
