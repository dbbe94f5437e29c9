//! DTOs for link statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Link;

/// Full record for a short link, including its live click count.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub id: i64,
    pub short_code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub click_count: i64,
}

impl From<Link> for StatsResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            short_code: link.code,
            long_url: link.long_url,
            created_at: link.created_at,
            click_count: link.click_count,
        }
    }
}
