//! Macro for implementing Display and FromStr for status-like enums
//!
//! Status labels travel through logs, config files and calendar payloads, so
//! every label enum shares one canonical lower-snake representation.
//!
//! # Example
//!
//! ```rust
//! use fieldplan_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Priority {
//!     Urgent,
//!     Normal,
//!     Low,
//! }
//!
//! impl_domain_status_conversions!(Priority {
//!     Urgent => "urgent",
//!     Normal => "normal",
//!     Low => "low",
//! });
//!
//! assert_eq!(Priority::Urgent.to_string(), "urgent");
//! assert_eq!("LOW".parse::<Priority>(), Ok(Priority::Low));
//! ```

/// Implements Display and FromStr traits for label enums
///
/// - `Display` writes the mapped label.
/// - `FromStr` accepts the label case-insensitively and also tolerates `-` or
///   spaces in place of `_` (`"in progress"`, `"In-Progress"`).
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
                match normalized.as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
