//! Output filename allocation
//!
//! Turns an assigned keyword into a filesystem-safe base name and
//! disambiguates repeated keywords with a numeric suffix. The counter map is
//! owned by one job execution; nothing persists across jobs.

use std::collections::HashMap;

/// Replace characters outside `[A-Za-z0-9_-]` with `_`
///
/// A keyword with no allowed character at all (including the empty keyword)
/// falls back to `"image"`. The decision looks at the original keyword, so
/// an underscore-only keyword like `"___"` is kept as-is.
pub fn sanitize_keyword(keyword: &str) -> String {
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';

    if !keyword.chars().any(allowed) {
        return "image".to_string();
    }

    keyword
        .chars()
        .map(|c| if allowed(c) { c } else { '_' })
        .collect()
}

/// Per-job allocator of unique output file names
pub struct NameAllocator {
    counts: HashMap<String, u32>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    /// Allocate the next name for `keyword`, keeping the source extension
    ///
    /// The first use of a sanitized keyword gets no suffix; later uses get
    /// `_2`, `_3`, and so on. Every allocation consumes a slot, so names stay
    /// unique even when an earlier item with the same keyword later failed.
    pub fn allocate(&mut self, keyword: &str, extension: &str) -> String {
        let base = sanitize_keyword(keyword);
        let count = self.counts.entry(base.clone()).or_insert(0);
        *count += 1;

        if *count > 1 {
            format!("{}_{}{}", base, count, extension)
        } else {
            format!("{}{}", base, extension)
        }
    }
}

impl Default for NameAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_allowed_characters() {
        assert_eq!(sanitize_keyword("sunset"), "sunset");
        assert_eq!(sanitize_keyword("golden-hour_2"), "golden-hour_2");
    }

    #[test]
    fn sanitize_replaces_disallowed_characters() {
        assert_eq!(sanitize_keyword("city lights"), "city_lights");
        assert_eq!(sanitize_keyword("café"), "caf_");
    }

    #[test]
    fn sanitize_falls_back_for_fully_disallowed_keywords() {
        assert_eq!(sanitize_keyword(""), "image");
        assert_eq!(sanitize_keyword("!!!"), "image");
        assert_eq!(sanitize_keyword("   "), "image");
    }

    #[test]
    fn sanitize_keeps_underscore_only_keywords() {
        assert_eq!(sanitize_keyword("___"), "___");
        assert_eq!(sanitize_keyword("_"), "_");
    }

    #[test]
    fn first_use_is_bare_then_suffixed_from_two() {
        let mut allocator = NameAllocator::new();
        assert_eq!(allocator.allocate("sunset", ".jpg"), "sunset.jpg");
        assert_eq!(allocator.allocate("sunset", ".jpg"), "sunset_2.jpg");
        assert_eq!(allocator.allocate("sunset", ".jpg"), "sunset_3.jpg");
    }

    #[test]
    fn distinct_keywords_do_not_collide() {
        let mut allocator = NameAllocator::new();
        assert_eq!(allocator.allocate("sunset", ".jpg"), "sunset.jpg");
        assert_eq!(allocator.allocate("beach", ".png"), "beach.png");
        assert_eq!(allocator.allocate("sunset", ".jpeg"), "sunset_2.jpeg");
    }

    #[test]
    fn keywords_sharing_a_sanitized_form_share_a_counter() {
        let mut allocator = NameAllocator::new();
        assert_eq!(allocator.allocate("city lights", ".jpg"), "city_lights.jpg");
        assert_eq!(
            allocator.allocate("city?lights", ".jpg"),
            "city_lights_2.jpg"
        );
    }
}
