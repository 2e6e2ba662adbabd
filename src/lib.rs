//! Generation, validation, and timestamp decoding of UUID version 7
//!
//! ```rust
//! let uuid = uuidv7_codec::generate()?;
//! println!("{}", uuid); // e.g., "0195acfc-48db-7a33-b997-f86dffc91039"
//!
//! let text = uuid.to_string();
//! assert!(uuidv7_codec::is_uuid_v7(&text));
//! assert_eq!(uuidv7_codec::decode(&text)?, uuid.unix_ts_ms());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! See [RFC 9562](https://www.rfc-editor.org/rfc/rfc9562).
//!
//! # Field and bit layout
//!
//! This implementation produces identifiers with the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |        rand_a         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                        rand_b                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            rand_b                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in
//!   milliseconds, big-endian.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 2-bit `var` field is set at `10`.
//! - The 12-bit `rand_a` and 62-bit `rand_b` fields are filled with a
//!   cryptographically strong random number.
//!
//! The textual form is `tttttttt-tttt-7rrr-vrrr-rrrrrrrrrrrr`, where `v` is one
//! of `8`, `9`, `a`, or `b`. Identifiers sort by creation time to the
//! millisecond; identifiers created within the same millisecond are in random
//! order.
//!
//! # Clock and random number source
//!
//! [`generate()`] reads the system clock and the operating system's entropy
//! source. [`V7Generator`] accepts any [`ClockSource`] and [`RandomSource`]
//! instead, which makes its output reproducible under fixed inputs.
//!
//! # Crate features
//!
//! - `serde` enables serialization of [`UuidV7`] as a string in human-readable
//!   formats and as 16 bytes otherwise.
//! - `uuid` enables conversions to and from [`uuid::Uuid`](https://docs.rs/uuid).

#![cfg_attr(docsrs, feature(doc_cfg))]

mod id;
pub use id::{is_uuid_v7, ParseError, UuidV7};

pub mod generator;
pub use generator::{ClockSource, GenerateError, RandomSource, SystemClock, V7Generator};

mod entry;
pub use entry::generate;

use chrono::{DateTime, Utc};

/// Extracts the creation timestamp, in milliseconds since the Unix epoch, from the 8-4-4-4-12
/// string representation of a UUIDv7.
///
/// The input is validated in full before the timestamp is read.
///
/// # Errors
///
/// Returns [`ParseError`] if `uuid` is not a well-formed UUIDv7.
///
/// # Examples
///
/// ```rust
/// use uuidv7_codec::decode;
///
/// assert_eq!(decode("0195acfc-48db-7a33-b997-f86dffc91039"), Ok(1_742_363_969_755));
/// assert!(decode("zzzzzzzz-zzzz-7zzz-bzzz-zzzzzzzzzzzz").is_err());
/// ```
pub fn decode(uuid: &str) -> Result<u64, ParseError> {
    parse_checked(uuid).map(|value| value.unix_ts_ms())
}

/// Extracts the creation timestamp from the string representation of a UUIDv7 as a UTC calendar
/// date and time.
///
/// # Errors
///
/// Returns [`ParseError`] if `uuid` is not a well-formed UUIDv7.
///
/// # Examples
///
/// ```rust
/// use uuidv7_codec::timestamp_as_datetime;
///
/// let dt = timestamp_as_datetime("0195acfc-48db-7a33-b997-f86dffc91039")?;
/// assert_eq!(dt.to_rfc3339(), "2025-03-19T05:59:29.755+00:00");
/// # Ok::<(), uuidv7_codec::ParseError>(())
/// ```
pub fn timestamp_as_datetime(uuid: &str) -> Result<DateTime<Utc>, ParseError> {
    parse_checked(uuid).map(|value| value.datetime())
}

fn parse_checked(uuid: &str) -> Result<UuidV7, ParseError> {
    uuid.parse().map_err(|err| {
        tracing::trace!(input = uuid, error = %err, "rejected malformed UUIDv7");
        err
    })
}
