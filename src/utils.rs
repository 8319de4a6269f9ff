//! Small string and naming helpers

use chrono::{DateTime, Utc};

/// Keep at most `max_chars` characters of `text`, cutting on a char boundary.
///
/// # Examples
///
/// ```
/// use uid_metadata::utils::truncate_chars;
///
/// assert_eq!(truncate_chars("héllo", 2), "hé");
/// assert_eq!(truncate_chars("hi", 10), "hi");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

/// `<prefix>_<YYYYmmdd_HHMMSS>.xlsx`
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use uid_metadata::utils::timestamped_filename;
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
/// assert_eq!(timestamped_filename("user_metadata", at), "user_metadata_20240309_140500.xlsx");
/// ```
pub fn timestamped_filename(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}.xlsx", prefix, at.format("%Y%m%d_%H%M%S"))
}
