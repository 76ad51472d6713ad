//! Client-side projections over fetched collections

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Sentinel accepted wherever a categorical filter is parsed
pub const ALL: &str = "all";

/// Predicate over a single record
pub trait RecordFilter<R> {
    fn matches(&self, record: &R) -> bool;
}

/// Case-insensitive substring search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    needle: String,
}

impl SearchTerm {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let needle = raw.to_lowercase();
        Self { raw, needle }
    }

    /// The text as typed
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// True when any field contains the term. An empty term matches
    /// everything.
    pub fn matches_any<I>(&self, fields: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        if self.needle.is_empty() {
            return true;
        }
        fields
            .into_iter()
            .any(|field| field.as_ref().to_lowercase().contains(&self.needle))
    }
}

/// Exact-match filter with an "all" sentinel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category<T> {
    All,
    Only(T),
}

impl<T> Default for Category<T> {
    fn default() -> Self {
        Category::All
    }
}

impl<T: PartialEq> Category<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Category::All => true,
            Category::Only(wanted) => wanted == value,
        }
    }
}

impl<T> From<Option<T>> for Category<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Category::Only(value),
            None => Category::All,
        }
    }
}

impl<T> FromStr for Category<T>
where
    T: FromStr<Err = Error>,
{
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            Ok(Category::All)
        } else {
            s.parse().map(Category::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Category<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::All => f.write_str(ALL),
            Category::Only(value) => value.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;

    #[test]
    fn search_is_case_insensitive_substring() {
        let term = SearchTerm::new("PakSun");
        assert!(term.matches_any(["Vientaine-Paksun"]));
        assert!(!term.matches_any(["Luang Prabang Express", "LA-1234"]));
        assert!(term.matches_any(["nope", "paksun express"]));
    }

    #[test]
    fn empty_search_matches_everything() {
        let term = SearchTerm::new("");
        assert!(term.matches_any(std::iter::empty::<&str>()));
        assert!(term.matches_any([""]));
    }

    #[test]
    fn category_all_admits_everything() {
        let all: Category<BookingStatus> = "all".parse().unwrap();
        assert!(BookingStatus::ALL.iter().all(|s| all.admits(s)));

        let only: Category<BookingStatus> = "booked".parse().unwrap();
        assert!(only.admits(&BookingStatus::Booked));
        assert!(!only.admits(&BookingStatus::Expired));
        assert_eq!(only.to_string(), "booked");
    }

    #[test]
    fn category_rejects_unknown_values() {
        assert!("refunded".parse::<Category<BookingStatus>>().is_err());
    }
}
