//! Closed status and type enums shared by the booking verticals.
//!
//! Every enum serializes as its PascalCase variant name and accepts either a
//! case-insensitive name (underscores ignored, so `in_progress` works) or its
//! numeric code on input.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::Serialize;
use sqlx::Type;
use utoipa::ToSchema;

/// Generates code/name conversions, `Display`, `FromStr`, `TryFrom<i64>` and a
/// name-or-code `Deserialize` impl for a unit-only enum.
macro_rules! wire_enum {
    ($name:ident, $label:literal { $($variant:ident = $code:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(self) -> i64 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<i64> for $name {
            type Error = String;

            fn try_from(code: i64) -> std::result::Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", $label, code)),
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let trimmed = s.trim();
                if let Ok(code) = trimmed.parse::<i64>() {
                    return $name::try_from(code).map_err(|_| format!("Invalid {}: {}", $label, s));
                }
                let normalized = trimmed.replace('_', "");
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(&normalized))
                    .ok_or_else(|| format!("Invalid {}: {}", $label, s))
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                deserializer.deserialize_any($crate::shared::status::WireVisitor::<$name>::new())
            }
        }
    };
}

pub(crate) use wire_enum;

/// Visitor accepting either a string name or an integer code
pub struct WireVisitor<T>(PhantomData<T>);

impl<T> WireVisitor<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<'de, T> Visitor<'de> for WireVisitor<T>
where
    T: FromStr<Err = String> + TryFrom<i64, Error = String>,
{
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a variant name or numeric code")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        T::from_str(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
        T::try_from(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
        let code = i64::try_from(v).map_err(E::custom)?;
        T::try_from(code).map_err(E::custom)
    }
}

/// Lifecycle of tickets, vehicle bookings and hotel bookings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Type, ToSchema)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

wire_enum!(BookingStatus, "status" {
    Pending = 0,
    Confirmed = 1,
    InProgress = 2,
    Completed = 3,
    Cancelled = 4,
});

impl BookingStatus {
    /// Whether moving to this status records a completion timestamp
    pub fn stamps_completion(self) -> bool {
        self == BookingStatus::Completed
    }
}
