//! Weekly performance aggregation
//!
//! Derives the per-metric-type, per-week score series used to render
//! trend charts. The engine is a pure read over the store: assessments
//! give the temporal axis (ascending by week start), each week's score
//! for a metric type is the arithmetic mean of that week's ratings
//! rounded to one decimal place, and weeks with no ratings for a type
//! yield NO data point **[REQ-AG-030]**. The engine never fabricates a
//! neighboring or default value; any gap-filling for chart continuity is
//! the caller's explicit choice of [`GapPolicy`].

use crate::db::traits::{AssessmentStore, MetricStore};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One real data point of the weekly series: the score a metric type
/// earned in the week starting at `week_start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyScore {
    pub week_start: NaiveDate,
    pub metric_type: String,
    pub score: f64,
}

/// A point on a single metric type's chart line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub week_start: NaiveDate,
    pub score: f64,
}

/// Build the weekly series for a player.
///
/// Assessments are ordered ascending by week start, ties broken by id
/// (identity order), so the axis is stable across calls. Output is
/// deterministic: within a week, rows appear in lexicographic
/// metric-type order.
pub async fn weekly_series<S>(store: &S, player_id: i64) -> Result<Vec<WeeklyScore>>
where
    S: AssessmentStore + MetricStore,
{
    let mut assessments = store.assessments_for_player(player_id).await?;
    assessments.sort_by(|a, b| a.week_start.cmp(&b.week_start).then_with(|| a.id.cmp(&b.id)));

    let mut rows = Vec::new();
    for assessment in &assessments {
        let metrics = store.metrics_for_assessment(assessment.id).await?;

        // Open vocabulary: group by whatever types this week's metrics
        // carry. BTreeMap keeps the per-week row order deterministic.
        let mut ratings_by_type: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for metric in metrics {
            ratings_by_type
                .entry(metric.metric_type)
                .or_default()
                .push(metric.rating);
        }

        for (metric_type, ratings) in ratings_by_type {
            rows.push(WeeklyScore {
                week_start: assessment.week_start,
                metric_type,
                score: mean_rounded(&ratings),
            });
        }
    }
    Ok(rows)
}

/// Pivot series rows into one chart line per metric type.
pub fn series_by_metric(rows: &[WeeklyScore]) -> BTreeMap<String, Vec<SeriesPoint>> {
    let mut lines: BTreeMap<String, Vec<SeriesPoint>> = BTreeMap::new();
    for row in rows {
        lines
            .entry(row.metric_type.clone())
            .or_default()
            .push(SeriesPoint {
                week_start: row.week_start,
                score: row.score,
            });
    }
    lines
}

/// Gap handling for chart continuity. The engine emits only real data
/// points; rendering a continuous line across assessed weeks with no
/// rating for a type requires the caller to opt into a policy here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapPolicy {
    /// Emit only real points; the chart shows a broken line.
    AsRecorded,
    /// Carry the last known score forward across later weeks of the
    /// axis. Weeks before the first real point stay empty.
    CarryForward,
}

/// Apply `policy` to one metric type's line over the week axis `weeks`
/// (typically every assessed week, ascending).
pub fn fill_gaps(line: &[SeriesPoint], weeks: &[NaiveDate], policy: GapPolicy) -> Vec<SeriesPoint> {
    match policy {
        GapPolicy::AsRecorded => line.to_vec(),
        GapPolicy::CarryForward => {
            let mut filled = Vec::with_capacity(weeks.len());
            let mut last_known: Option<f64> = None;
            for &week_start in weeks {
                if let Some(point) = line.iter().find(|p| p.week_start == week_start) {
                    last_known = Some(point.score);
                }
                if let Some(score) = last_known {
                    filled.push(SeriesPoint { week_start, score });
                }
            }
            filled
        }
    }
}

fn mean_rounded(ratings: &[f64]) -> f64 {
    let sum: f64 = ratings.iter().sum();
    let mean = sum / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{NewAssessment, NewMetric, NewPlayer};
    use crate::db::traits::PlayerStore;
    use crate::db::MemoryStore;

    fn week(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    async fn seeded_store() -> (MemoryStore, i64) {
        let store = MemoryStore::new();
        let player = store
            .create_player(NewPlayer {
                name: "Arun".to_string(),
                batch: "U-15 Morning".to_string(),
                age: Some(14),
                dominant_hand: Some("Right".to_string()),
                photo: None,
                status: None,
            })
            .await
            .unwrap();
        (store, player.id)
    }

    async fn add_week(store: &MemoryStore, player_id: i64, day: u32) -> i64 {
        store
            .create_assessment(NewAssessment {
                player_id,
                week_start: week(day),
                week_end: week(day + 6),
                notes: String::new(),
                make_current: true,
            })
            .await
            .unwrap()
            .id
    }

    async fn add_rating(store: &MemoryStore, assessment_id: i64, metric_type: &str, rating: f64) {
        store
            .create_metric(NewMetric {
                assessment_id,
                metric_type: metric_type.to_string(),
                rating,
                value_label: None,
                notes: None,
                media: None,
            })
            .await
            .unwrap();
    }

    #[test]
    fn test_mean_rounds_to_one_decimal() {
        assert_eq!(mean_rounded(&[3.0, 5.0]), 4.0);
        assert_eq!(mean_rounded(&[4.0]), 4.0);
        assert_eq!(mean_rounded(&[1.0, 2.0, 2.0]), 1.7);
        assert_eq!(mean_rounded(&[3.0, 4.0]), 3.5);
    }

    #[tokio::test]
    async fn test_weekly_series_worked_example() {
        let (store, player_id) = seeded_store().await;
        let a1 = add_week(&store, player_id, 1).await;
        let a2 = add_week(&store, player_id, 8).await;
        add_rating(&store, a1, "bat_connect", 3.0).await;
        add_rating(&store, a1, "bat_connect", 5.0).await;
        add_rating(&store, a2, "bat_connect", 4.0).await;

        let rows = weekly_series(&store, player_id).await.unwrap();
        assert_eq!(
            rows,
            vec![
                WeeklyScore {
                    week_start: week(1),
                    metric_type: "bat_connect".to_string(),
                    score: 4.0,
                },
                WeeklyScore {
                    week_start: week(8),
                    metric_type: "bat_connect".to_string(),
                    score: 4.0,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_week_yields_no_point() {
        let (store, player_id) = seeded_store().await;
        let a1 = add_week(&store, player_id, 1).await;
        let a2 = add_week(&store, player_id, 8).await;
        add_rating(&store, a1, "footwork", 3.0).await;
        add_rating(&store, a1, "bat_connect", 4.0).await;
        // Week 2 has no footwork rating.
        add_rating(&store, a2, "bat_connect", 5.0).await;

        let rows = weekly_series(&store, player_id).await.unwrap();
        let footwork: Vec<&WeeklyScore> =
            rows.iter().filter(|r| r.metric_type == "footwork").collect();
        assert_eq!(footwork.len(), 1);
        assert_eq!(footwork[0].week_start, week(1));
    }

    #[tokio::test]
    async fn test_series_is_deterministic() {
        let (store, player_id) = seeded_store().await;
        let a1 = add_week(&store, player_id, 1).await;
        add_rating(&store, a1, "footwork", 3.0).await;
        add_rating(&store, a1, "Cover Drive", 4.0).await;
        add_rating(&store, a1, "bat_connect", 2.0).await;

        let first = weekly_series(&store, player_id).await.unwrap();
        let second = weekly_series(&store, player_id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_open_vocabulary_is_tolerated() {
        let (store, player_id) = seeded_store().await;
        let a1 = add_week(&store, player_id, 1).await;
        add_rating(&store, a1, "Reverse Sweep", 88.0).await;

        let rows = weekly_series(&store, player_id).await.unwrap();
        assert_eq!(rows[0].metric_type, "Reverse Sweep");
        assert_eq!(rows[0].score, 88.0);
    }

    #[test]
    fn test_series_by_metric_pivots_per_type() {
        let rows = vec![
            WeeklyScore {
                week_start: week(1),
                metric_type: "bat_connect".to_string(),
                score: 4.0,
            },
            WeeklyScore {
                week_start: week(1),
                metric_type: "footwork".to_string(),
                score: 3.0,
            },
            WeeklyScore {
                week_start: week(8),
                metric_type: "bat_connect".to_string(),
                score: 4.5,
            },
        ];
        let lines = series_by_metric(&rows);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines["bat_connect"].len(), 2);
        assert_eq!(lines["footwork"].len(), 1);
    }

    #[test]
    fn test_carry_forward_fills_later_weeks_only() {
        let weeks = [week(1), week(8), week(15)];
        let line = [SeriesPoint {
            week_start: week(8),
            score: 3.5,
        }];
        let filled = fill_gaps(&line, &weeks, GapPolicy::CarryForward);
        assert_eq!(
            filled,
            vec![
                SeriesPoint {
                    week_start: week(8),
                    score: 3.5,
                },
                SeriesPoint {
                    week_start: week(15),
                    score: 3.5,
                },
            ]
        );
    }

    #[test]
    fn test_as_recorded_leaves_gaps() {
        let weeks = [week(1), week(8)];
        let line = [SeriesPoint {
            week_start: week(1),
            score: 2.0,
        }];
        let filled = fill_gaps(&line, &weeks, GapPolicy::AsRecorded);
        assert_eq!(filled, line.to_vec());
    }
}
