//! Helpers for turning raw workshop listing values into catalog updates.

use std::fmt::Display;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

use crate::catalog::IdRanges;

const WORKSHOP_DATE_FORMAT: &str = "%d %b, %Y @ %I:%M%p";

/// Parses workshop dates like "12 Mar, 2019 @ 6:11am". Dates from the
/// current year are shown without one ("24 May @ 11:27pm"); `current_year`
/// fills that in. Anything unparseable is `None`, which callers turn into
/// [`crate::catalog::Field::Keep`].
pub fn parse_workshop_datetime(text: &str, current_year: i32) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let full = if text.contains(", 20") {
        text.to_string()
    } else {
        let at = text.find('@')?;
        let (date, time) = text.split_at(at);
        format!("{}, {} {}", date.trim_end(), current_year, time)
    };
    match NaiveDateTime::parse_from_str(&full, WORKSHOP_DATE_FORMAT) {
        Ok(naive) => Some(Utc.from_utc_datetime(&naive)),
        Err(e) => {
            debug!("Failed to convert workshop datetime {:?}: {}", text, e);
            None
        }
    }
}

/// Workshop page of a mod; empty for IDs without a public listing.
pub fn workshop_url(id: u64, ranges: &IdRanges) -> String {
    if ranges.is_synthetic(id) {
        String::new()
    } else {
        format!("https://steamcommunity.com/sharedfiles/filedetails/?id={}", id)
    }
}

pub fn author_workshop_url(author: &str, is_profile: bool) -> String {
    if is_profile {
        format!(
            "https://steamcommunity.com/profiles/{}/myworkshopfiles/?appid=255710",
            author
        )
    } else {
        format!(
            "https://steamcommunity.com/id/{}/myworkshopfiles/?appid=255710",
            author
        )
    }
}

/// Runs `fetch` up to `retries + 1` times and returns the last error when
/// every attempt fails.
pub fn download_with_retries<E, F>(url: &str, path: &Path, retries: u32, mut fetch: F) -> Result<(), E>
where
    E: Display,
    F: FnMut(&str, &Path) -> Result<(), E>,
{
    let mut failed_attempts = 0;
    loop {
        match fetch(url, path) {
            Ok(()) => return Ok(()),
            Err(e) => {
                failed_attempts += 1;
                if failed_attempts > retries {
                    debug!("Download of {:?} failed, giving up: {}", url, e);
                    return Err(e);
                }
                debug!("Download of {:?} failed, retrying: {}", url, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_dates_with_and_without_year() {
        let full = parse_workshop_datetime("12 Mar, 2019 @ 6:11am", 2024).unwrap();
        assert_eq!((full.year(), full.month(), full.day()), (2019, 3, 12));
        assert_eq!((full.hour(), full.minute()), (6, 11));

        let short = parse_workshop_datetime("24 May @ 11:27pm", 2024).unwrap();
        assert_eq!((short.year(), short.month(), short.day()), (2024, 5, 24));
        assert_eq!(short.hour(), 23);
    }

    #[test]
    fn garbled_dates_are_none() {
        assert_eq!(parse_workshop_datetime("", 2024), None);
        assert_eq!(parse_workshop_datetime("yesterday", 2024), None);
        assert_eq!(parse_workshop_datetime("31 Foo, 2019 @ 6:11am", 2024), None);
    }

    #[test]
    fn synthetic_ids_have_no_workshop_page() {
        let ranges = IdRanges::default();
        assert_eq!(workshop_url(500, &ranges), "");
        assert!(workshop_url(2_000_000, &ranges).ends_with("?id=2000000"));
        assert!(author_workshop_url("someone", false).contains("/id/someone/"));
    }

    #[test]
    fn retries_until_success_or_exhaustion() {
        let path = Path::new("catalog.xml");
        let mut calls = 0;
        let ok = download_with_retries("https://example.com/catalog", path, 3, |_, _| {
            calls += 1;
            if calls < 3 {
                Err("timeout")
            } else {
                Ok(())
            }
        });
        assert!(ok.is_ok());
        assert_eq!(calls, 3);

        let mut attempts = 0;
        let failed = download_with_retries("https://example.com/catalog", path, 2, |_, _| {
            attempts += 1;
            Err(format!("attempt {}", attempts))
        });
        assert_eq!(failed, Err("attempt 3".to_string()));
    }
}
