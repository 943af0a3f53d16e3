//! API-level constants

/// Rolling dedup window for counted views
pub const VIEW_DEDUP_WINDOW_MINUTES: i64 = 60;

/// Sessions at or below this duration are discarded as noise
pub const SESSION_MIN_DURATION_SECONDS: f64 = 1.0;

/// Review text bounds (applied to the trimmed text)
pub const REVIEW_TEXT_MIN_CHARS: usize = 10;
pub const REVIEW_TEXT_MAX_CHARS: usize = 1000;

/// Star rating bounds
pub const RATING_MIN: i16 = 1;
pub const RATING_MAX: i16 = 5;

/// Pagination defaults and caps
pub const DEFAULT_PAGE_LIMIT: u64 = 20;
pub const MAX_PAGE_LIMIT: u64 = 100;
