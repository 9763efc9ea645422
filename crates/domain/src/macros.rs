//! Macro for implementing Display and FromStr for wire-level enums
//!
//! Data types, KMS variants and error kinds all travel as lowercase strings
//! in configuration files and service payloads. This macro keeps the string
//! mapping in one place.
//!
//! # Example
//!
//! ```rust
//! use secretcache_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Mode {
//!     Memory,
//!     File,
//! }
//!
//! impl_domain_enum_conversions!(Mode {
//!     Memory => "memory",
//!     File => "file",
//! });
//! ```

/// Implements Display and FromStr traits for simple enums
///
/// - Display writes the mapped lowercase string
/// - FromStr parses case-insensitively and reports the enum name on failure
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => ::std::result::Result::Ok(Self::$variant),)+
                    _ => ::std::result::Result::Err(::std::format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
