//! Ordering rules for the generated registry.
//!
//! Items are ordered by category with a Chinese-locale collator, which keeps
//! mixed-script category strings in the natural order readers expect; ties
//! fall back to an ordinal comparison of the id.

use icu_collator::{Collator, CollatorOptions};
use icu_locid::locale;
use std::cmp::Ordering;
use tracing::warn;

/// Locale-aware comparison for category strings.
pub struct CategoryOrder {
    collator: Option<Collator>,
}

impl CategoryOrder {
    /// Build the collator; falls back to ordinal comparison if the locale
    /// data cannot be loaded.
    pub fn new() -> Self {
        match Collator::try_new(&locale!("zh").into(), CollatorOptions::new()) {
            Ok(collator) => Self {
                collator: Some(collator),
            },
            Err(err) => {
                warn!(error = %err, "collator unavailable; ordering categories ordinally");
                Self::ordinal()
            }
        }
    }

    /// Plain code-point ordering.
    pub fn ordinal() -> Self {
        Self { collator: None }
    }

    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(left, right),
            None => left.cmp(right),
        }
    }
}

impl Default for CategoryOrder {
    fn default() -> Self {
        Self::new()
    }
}
