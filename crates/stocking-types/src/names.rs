//! Prize id extraction from uploaded filenames.
//!
//! Bulk prize uploads are matched to slots by filename: the first run of
//! ASCII digits anywhere in the name is the prize id. Names without digits,
//! or whose first digit run falls outside `1..=TOTAL_PRIZES`, are dropped
//! silently. Later digit runs are never consulted.

use crate::key::PrizeId;

/// Extract the prize id from an uploaded filename.
///
/// # Examples
///
/// ```
/// use stocking_types::prize_id_from_filename;
///
/// assert_eq!(prize_id_from_filename("7.png").map(|id| id.get()), Some(7));
/// assert_eq!(prize_id_from_filename("gift-12-final.jpg").map(|id| id.get()), Some(12));
/// assert!(prize_id_from_filename("99.png").is_none());
/// assert!(prize_id_from_filename("cover.png").is_none());
/// ```
pub fn prize_id_from_filename(name: &str) -> Option<PrizeId> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let digits: &str = {
        let rest = &name[start..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    let id = digits.parse::<u32>().ok()?;
    PrizeId::new(id).ok()
}
