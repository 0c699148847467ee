//! Video filtering
//!
//! Predicate-based narrowing of a player's videos by shot type, ball
//! speed and bat-contact quality. Pure and stateless: filtering never
//! reorders the store's listing, and exact (case-sensitive) tag equality
//! is the only match mode.

use crate::db::models::Video;
use crate::db::traits::VideoStore;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Sentinel criterion value meaning "no restriction"; UI dropdowns send
/// it for unselected filters.
pub const FILTER_ALL: &str = "All";

/// Filter criteria for a player's video gallery. Absent (or `"All"`)
/// criteria match every video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoFilter {
    pub shot_type: Option<String>,
    pub ball_speed: Option<String>,
    pub bat_connect: Option<String>,
}

impl VideoFilter {
    /// True when no criterion restricts anything; filtering with an
    /// empty filter equals the unfiltered listing.
    pub fn is_empty(&self) -> bool {
        effective(&self.shot_type).is_none()
            && effective(&self.ball_speed).is_none()
            && effective(&self.bat_connect).is_none()
    }

    /// Whether a video passes every present criterion.
    pub fn matches(&self, video: &Video) -> bool {
        if let Some(shot_type) = effective(&self.shot_type) {
            if video.shot_type != shot_type {
                return false;
            }
        }
        if let Some(ball_speed) = effective(&self.ball_speed) {
            if video.ball_speed != ball_speed {
                return false;
            }
        }
        if let Some(bat_connect) = effective(&self.bat_connect) {
            if video.bat_connect != bat_connect {
                return false;
            }
        }
        true
    }
}

/// A criterion set to the `"All"` sentinel is treated as absent.
fn effective(criterion: &Option<String>) -> Option<&str> {
    match criterion.as_deref() {
        None | Some(FILTER_ALL) => None,
        Some(value) => Some(value),
    }
}

/// Narrow a player's videos to those matching `filter`, preserving the
/// store's listing order.
pub async fn filter_videos<S: VideoStore>(
    store: &S,
    player_id: i64,
    filter: &VideoFilter,
) -> Result<Vec<Video>> {
    let videos = store.videos_for_player(player_id).await?;
    Ok(videos.into_iter().filter(|v| filter.matches(v)).collect())
}
