//! Typed records returned by the admin API

/// Declares a closed set of wire strings with `as_str`, `Display` and
/// case-insensitive `FromStr`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        crate::error::Error::validation(format!(
                            "unknown {} '{}'",
                            stringify!($name),
                            s
                        ))
                    })
            }
        }
    };
}

mod booking;
mod bus;
mod schedule;
mod ticket;
mod user;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

pub use booking::*;
pub use bus::*;
pub use schedule::*;
pub use ticket::*;
pub use user::*;

/// Anything carrying a server-assigned identifier
pub trait Identified {
    fn id(&self) -> &str;
}

/// A reference the backend may send either as a bare id or populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Populated(T),
    Id(String),
}

impl<T: Identified> Ref<T> {
    pub fn id(&self) -> &str {
        match self {
            Ref::Populated(inner) => inner.id(),
            Ref::Id(id) => id,
        }
    }

    pub fn populated(&self) -> Option<&T> {
        match self {
            Ref::Populated(inner) => Some(inner),
            Ref::Id(_) => None,
        }
    }
}

/// Last six characters of an identifier, as shown in tables
pub fn id_suffix(id: &str) -> &str {
    match id.char_indices().rev().nth(5) {
        Some((idx, _)) => &id[idx..],
        None => id,
    }
}

/// Calendar date of an ISO timestamp or date string.
///
/// Unparseable input is returned unchanged.
pub fn date_part(value: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return ts.date_naive().format("%Y-%m-%d").to_string();
    }
    match value.get(..10) {
        Some(prefix) if NaiveDate::parse_from_str(prefix, "%Y-%m-%d").is_ok() => prefix.to_string(),
        _ => value.to_string(),
    }
}

/// Accepts `"12"`, `12` or `null` and yields a string
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
        Raw::Null(()) => String::new(),
    })
}

/// Treats an explicit `null` like a missing field
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn default_true() -> bool {
    true
}

/// `null` or missing reads as `true`
pub(crate) fn null_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_suffix_takes_last_six_chars() {
        assert_eq!(id_suffix("665f1c2ab93e4d0012a7c9e1"), "a7c9e1");
        assert_eq!(id_suffix("abc"), "abc");
        assert_eq!(id_suffix("123456"), "123456");
    }

    #[test]
    fn date_part_handles_timestamps_and_dates() {
        assert_eq!(date_part("2025-12-02T08:30:00.000Z"), "2025-12-02");
        assert_eq!(date_part("2025-12-02"), "2025-12-02");
        assert_eq!(date_part("2025-12-02T08:30"), "2025-12-02");
        assert_eq!(date_part("tomorrow"), "tomorrow");
    }

    #[test]
    fn wire_enums_parse_case_insensitively() {
        assert_eq!("Booked".parse::<BookingStatus>().unwrap(), BookingStatus::Booked);
        assert_eq!(" refunded ".parse::<PaymentStatus>().unwrap(), PaymentStatus::Refunded);
        assert!("shipped".parse::<BookingStatus>().is_err());
    }
}
