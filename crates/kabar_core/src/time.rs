use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Western Indonesian Time, the publication zone of every supported source.
pub const WIB_OFFSET_SECS: i32 = 7 * 3600;

pub fn wib() -> FixedOffset {
    FixedOffset::east_opt(WIB_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

pub fn now_wib() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&wib())
}
