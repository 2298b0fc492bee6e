//! Usage: Human-readable local timestamps pushed to the web content.

use chrono::{DateTime, Local, TimeZone};

const CONTENT_TIMESTAMP_FORMAT: &str = "%Y. %-m. %-d. %p %-I:%M:%S";

pub(crate) fn format_local<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(CONTENT_TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn now_local_string() -> String {
    format_local(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn format_local_uses_twelve_hour_clock_without_padding() {
        let kst = FixedOffset::east_opt(9 * 3600).expect("offset");
        let at = kst
            .with_ymd_and_hms(2024, 3, 7, 14, 5, 9)
            .single()
            .expect("valid time");
        assert_eq!(format_local(&at), "2024. 3. 7. PM 2:05:09");
    }

    #[test]
    fn format_local_morning_is_am() {
        let utc = FixedOffset::east_opt(0).expect("offset");
        let at = utc
            .with_ymd_and_hms(2025, 12, 31, 0, 30, 0)
            .single()
            .expect("valid time");
        assert_eq!(format_local(&at), "2025. 12. 31. AM 12:30:00");
    }
}
