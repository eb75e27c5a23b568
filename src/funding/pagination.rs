use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::types::timestamp::Timestamp;

/// How an exchange pages through its funding history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaginationScheme {
    /// Moving `startTime` to a fixed `endTime`, advanced past the last event seen.
    TimeCursor { limit: u32 },
    /// Fixed-size pages by numeric offset, up to a ceiling.
    Offset { page_size: u32, max_offset: u32 },
    /// Fixed-size pages by page number, starting at 1.
    PageNumber { page_size: u32, max_pages: u32 },
    /// Consecutive fixed-span time windows covering the whole range.
    TimeWindow {
        #[serde(with = "duration_ms")]
        span: Duration,
        limit: u32,
    },
}

impl PaginationScheme {
    /// Same scheme with a different page size, never below one.
    pub fn with_page_size(self, size: u32) -> Self {
        let size = size.max(1);
        match self {
            PaginationScheme::TimeCursor { .. } => PaginationScheme::TimeCursor { limit: size },
            PaginationScheme::Offset { max_offset, .. } => PaginationScheme::Offset {
                page_size: size,
                max_offset,
            },
            PaginationScheme::PageNumber { max_pages, .. } => PaginationScheme::PageNumber {
                page_size: size,
                max_pages,
            },
            PaginationScheme::TimeWindow { span, .. } => PaginationScheme::TimeWindow {
                span,
                limit: size,
            },
        }
    }
}

/// Which slice of history a collection covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionWindow {
    /// Long lookback, no filtering; used to discover cycle boundaries.
    FullHistory { lookback: Duration },
    /// Only events inside `[now - span, now]` are kept.
    Windowed { span: Duration },
}

impl CollectionWindow {
    pub fn bounds(&self, now: Timestamp) -> (Timestamp, Timestamp) {
        match self {
            CollectionWindow::FullHistory { lookback } => (now - *lookback, now),
            CollectionWindow::Windowed { span } => (now - *span, now),
        }
    }

    pub fn filters_events(&self) -> bool {
        matches!(self, CollectionWindow::Windowed { .. })
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
