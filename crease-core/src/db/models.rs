//! Database models
//!
//! Record types for the five entity kinds plus the create/update input
//! structs consumed by the store traits. Identities are `i64` values
//! allocated monotonically per entity kind; children reference parents by
//! id, never the reverse **[REQ-NF-010]**.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Roster entry for a coached player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    /// Batch/cohort label, e.g. "U-15 Morning"
    pub batch: String,
    pub age: Option<i64>,
    pub dominant_hand: Option<String>,
    /// Locator of the profile photo in media storage
    pub photo: Option<String>,
    pub status: Option<String>,
}

/// Fields for creating a player (identity is allocated by the store)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub batch: String,
    pub age: Option<i64>,
    pub dominant_hand: Option<String>,
    pub photo: Option<String>,
    pub status: Option<String>,
}

/// Partial player update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub batch: Option<String>,
    pub age: Option<i64>,
    pub dominant_hand: Option<String>,
    pub photo: Option<String>,
    pub status: Option<String>,
}

/// One coaching session's performance assessment
///
/// At most one assessment per player carries `is_current = true` at any
/// time **[REQ-CS-020]**. The flag is managed exclusively by
/// `create_assessment`; there is no public assessment update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: i64,
    pub player_id: i64,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub notes: String,
    pub is_current: bool,
}

/// Fields for creating an assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssessment {
    pub player_id: i64,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub notes: String,
    /// When true, every previously current assessment of the player is
    /// demoted before this one is inserted as current
    pub make_current: bool,
}

/// A single rated skill or shot within an assessment
///
/// `metric_type` is an open vocabulary: general skills ("bat_connect",
/// "footwork") and named batting shots ("Cover Drive") alike. Callers may
/// introduce new types at any time; nothing in the core enumerates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: i64,
    pub assessment_id: i64,
    pub metric_type: String,
    /// Rating on the metric family's own scale (1-5 stars or 0-100)
    pub rating: f64,
    /// Optional human-readable rendering of the rating, e.g. "82 km/h"
    pub value_label: Option<String>,
    pub notes: Option<String>,
    /// Optional media locator for a supporting clip
    pub media: Option<String>,
}

/// Fields for creating a metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMetric {
    pub assessment_id: i64,
    pub metric_type: String,
    pub rating: f64,
    pub value_label: Option<String>,
    pub notes: Option<String>,
    pub media: Option<String>,
}

/// Partial metric update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricUpdate {
    pub rating: Option<f64>,
    pub value_label: Option<String>,
    pub notes: Option<String>,
    pub media: Option<String>,
}

/// Coaching focus areas with a fixed vocabulary
///
/// Unlike metric types this set is closed: problem areas drive a fixed
/// set of coaching drills, so new variants are a code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaType {
    Footwork,
    Balance,
    BatSwing,
    Timing,
    ShotSelection,
    Temperament,
}

impl AreaType {
    /// Parse an area type from its database string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "footwork" => Some(AreaType::Footwork),
            "balance" => Some(AreaType::Balance),
            "bat_swing" | "batswing" => Some(AreaType::BatSwing),
            "timing" => Some(AreaType::Timing),
            "shot_selection" | "shotselection" => Some(AreaType::ShotSelection),
            "temperament" => Some(AreaType::Temperament),
            _ => None,
        }
    }

    /// Canonical database string (lowercase, underscored)
    pub fn to_db_string(&self) -> &'static str {
        match self {
            AreaType::Footwork => "footwork",
            AreaType::Balance => "balance",
            AreaType::BatSwing => "bat_swing",
            AreaType::Timing => "timing",
            AreaType::ShotSelection => "shot_selection",
            AreaType::Temperament => "temperament",
        }
    }

    /// Human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            AreaType::Footwork => "Footwork",
            AreaType::Balance => "Balance",
            AreaType::BatSwing => "Bat Swing",
            AreaType::Timing => "Timing",
            AreaType::ShotSelection => "Shot Selection",
            AreaType::Temperament => "Temperament",
        }
    }

    /// All area type variants, for UI dropdowns and validation
    pub fn all_variants() -> &'static [AreaType] {
        &[
            AreaType::Footwork,
            AreaType::Balance,
            AreaType::BatSwing,
            AreaType::Timing,
            AreaType::ShotSelection,
            AreaType::Temperament,
        ]
    }
}

impl std::fmt::Display for AreaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A flagged problem area within an assessment, with its own star rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemArea {
    pub id: i64,
    pub assessment_id: i64,
    pub area_type: AreaType,
    /// 1-5 stars
    pub rating: i64,
    pub notes: Option<String>,
}

/// Fields for creating a problem area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProblemArea {
    pub assessment_id: i64,
    pub area_type: AreaType,
    pub rating: i64,
    pub notes: Option<String>,
}

/// Partial problem-area update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemAreaUpdate {
    pub rating: Option<i64>,
    pub notes: Option<String>,
}

/// An uploaded practice or match clip
///
/// The store holds only the durable locator returned by media storage,
/// never the bytes **[REQ-CS-080]**. Videos are immutable after upload
/// except for tag correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    pub player_id: i64,
    pub title: String,
    /// Durable URL or path from the media-storage collaborator
    pub locator: String,
    pub recorded_on: NaiveDate,
    /// Shot tag, open vocabulary ("Cover Drive", "Pull Shot", ...)
    pub shot_type: String,
    /// Delivery speed tag ("Slow", "Medium", "Fast")
    pub ball_speed: String,
    /// Bat-contact quality tag ("Middle", "Edge", "Missed")
    pub bat_connect: String,
}

/// Fields for creating a video record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVideo {
    pub player_id: i64,
    pub title: String,
    pub locator: String,
    pub recorded_on: NaiveDate,
    pub shot_type: String,
    pub ball_speed: String,
    pub bat_connect: String,
}

/// Tag correction for an existing video; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoTagUpdate {
    pub shot_type: Option<String>,
    pub ball_speed: Option<String>,
    pub bat_connect: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_type_round_trip() {
        for area in AreaType::all_variants() {
            let db_string = area.to_db_string();
            let parsed = AreaType::from_str(db_string).unwrap();
            assert_eq!(*area, parsed, "Round-trip failed for {:?}", area);
        }
    }

    #[test]
    fn test_area_type_parse_aliases() {
        assert_eq!(AreaType::from_str("batswing"), Some(AreaType::BatSwing));
        assert_eq!(
            AreaType::from_str("shotselection"),
            Some(AreaType::ShotSelection)
        );
        assert_eq!(AreaType::from_str("FOOTWORK"), Some(AreaType::Footwork));
    }

    #[test]
    fn test_area_type_parse_invalid() {
        assert_eq!(AreaType::from_str("cover_drive"), None);
        assert_eq!(AreaType::from_str(""), None);
    }

    #[test]
    fn test_area_type_display() {
        assert_eq!(format!("{}", AreaType::BatSwing), "Bat Swing");
        assert_eq!(format!("{}", AreaType::ShotSelection), "Shot Selection");
    }
}
