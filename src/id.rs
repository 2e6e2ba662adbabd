use std::{fmt, str};

use chrono::{DateTime, Utc};

/// Represents a validated UUID version 7.
///
/// A value of this type can only be obtained from the generator or from one of the checked
/// conversions (`parse()`, [`TryFrom`] for strings, byte arrays, and `u128`), so holding one
/// implies that the version and variant bits are set correctly.
///
/// The ordering of values equals the ordering of their 16-byte big-endian representations and of
/// their lowercase canonical strings.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct UuidV7([u8; 16]);

impl UuidV7 {
    /// Returns a reference to the underlying big-endian byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates a UUIDv7 from its field values, setting the version and variant bits.
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` exceeds 48 bits, `rand_a` exceeds 12 bits, or `rand_b` exceeds 62
    /// bits.
    pub const fn from_fields_v7(unix_ts_ms: u64, rand_a: u16, rand_b: u64) -> Self {
        if unix_ts_ms >= 1 << 48 || rand_a >= 1 << 12 || rand_b >= 1 << 62 {
            panic!("invalid field value");
        }

        Self([
            (unix_ts_ms >> 40) as u8,
            (unix_ts_ms >> 32) as u8,
            (unix_ts_ms >> 24) as u8,
            (unix_ts_ms >> 16) as u8,
            (unix_ts_ms >> 8) as u8,
            unix_ts_ms as u8,
            0x70 | (rand_a >> 8) as u8,
            rand_a as u8,
            0x80 | (rand_b >> 56) as u8,
            (rand_b >> 48) as u8,
            (rand_b >> 40) as u8,
            (rand_b >> 32) as u8,
            (rand_b >> 24) as u8,
            (rand_b >> 16) as u8,
            (rand_b >> 8) as u8,
            rand_b as u8,
        ])
    }

    /// Returns the 48-bit `unix_ts_ms` field, i.e. the creation time in milliseconds since the
    /// Unix epoch.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidv7_codec::UuidV7;
    ///
    /// let x = "0195acfc-48db-7a33-b997-f86dffc91039".parse::<UuidV7>()?;
    /// assert_eq!(x.unix_ts_ms(), 0x0195_acfc_48db);
    /// # Ok::<(), uuidv7_codec::ParseError>(())
    /// ```
    pub const fn unix_ts_ms(&self) -> u64 {
        let b = &self.0;
        u64::from_be_bytes([0, 0, b[0], b[1], b[2], b[3], b[4], b[5]])
    }

    /// Returns the embedded timestamp as a UTC calendar date and time.
    pub fn datetime(&self) -> DateTime<Utc> {
        // 48-bit millisecond values stay far below the upper bound of `DateTime<Utc>`
        DateTime::<Utc>::from_timestamp_millis(self.unix_ts_ms() as i64)
            .expect("48-bit timestamp out of the range of DateTime")
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string type that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidv7_codec::UuidV7;
    ///
    /// let x = "0195ACFC-48DB-7A33-B997-F86DFFC91039".parse::<UuidV7>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "0195acfc-48db-7a33-b997-f86dffc91039");
    /// assert_eq!(format!("{}", y), "0195acfc-48db-7a33-b997-f86dffc91039");
    /// # Ok::<(), uuidv7_codec::ParseError>(())
    /// ```
    pub fn encode(&self) -> fstr::FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut buffer = [0u8; 36];
        let mut cursor = 0;
        for (i, e) in self.0.iter().enumerate() {
            buffer[cursor] = DIGITS[(e >> 4) as usize];
            buffer[cursor + 1] = DIGITS[(e & 15) as usize];
            cursor += 2;
            if i == 3 || i == 5 || i == 7 || i == 9 {
                buffer[cursor] = b'-';
                cursor += 1;
            }
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: ok because buffer consists of ASCII code points
        unsafe { fstr::FStr::from_inner_unchecked(buffer) }
    }
}

/// Tests whether `candidate` is a UUIDv7 in the 8-4-4-4-12 hexadecimal string representation.
///
/// The whole string must match; surrounding whitespace, braces, or a valid UUID embedded in a
/// longer string are rejected. Hexadecimal digits are case-insensitive.
///
/// # Examples
///
/// ```rust
/// use uuidv7_codec::is_uuid_v7;
///
/// assert!(is_uuid_v7("0195acfc-48db-7a33-b997-f86dffc91039"));
/// assert!(!is_uuid_v7("0195acfc-48db-4a33-b997-f86dffc91039")); // version 4
/// assert!(!is_uuid_v7(" 0195acfc-48db-7a33-b997-f86dffc91039"));
/// ```
pub fn is_uuid_v7(candidate: &str) -> bool {
    parse_canonical(candidate.as_bytes()).is_ok()
}

/// Parses the 8-4-4-4-12 representation into bytes, checking the version and variant bits.
fn parse_canonical(src: &[u8]) -> Result<[u8; 16], ParseError> {
    if src.len() != 36 {
        return Err(ParseError::InvalidLength { len: src.len() });
    }

    let mut dst = [0u8; 16];
    let mut nibble = 0;
    for (index, &c) in src.iter().enumerate() {
        if matches!(index, 8 | 13 | 18 | 23) {
            if c != b'-' {
                return Err(ParseError::InvalidHyphen { index });
            }
            continue;
        }

        // non-ASCII bytes map to Latin-1 code points, none of which is a hex digit
        let digit = (c as char)
            .to_digit(16)
            .ok_or(ParseError::InvalidDigit { index })? as u8;
        dst[nibble >> 1] |= if nibble & 1 == 0 { digit << 4 } else { digit };
        nibble += 1;
    }

    check_version_and_variant(&dst)?;
    Ok(dst)
}

fn check_version_and_variant(bytes: &[u8; 16]) -> Result<(), ParseError> {
    if bytes[6] >> 4 != 0b0111 {
        Err(ParseError::InvalidVersion)
    } else if bytes[8] >> 6 != 0b10 {
        Err(ParseError::InvalidVariant)
    } else {
        Ok(())
    }
}

impl fmt::Display for UuidV7 {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for UuidV7 {
    type Err = ParseError;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        parse_canonical(src.as_bytes()).map(Self)
    }
}

impl TryFrom<&str> for UuidV7 {
    type Error = ParseError;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl TryFrom<String> for UuidV7 {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl From<UuidV7> for String {
    fn from(src: UuidV7) -> Self {
        src.to_string()
    }
}

impl From<UuidV7> for [u8; 16] {
    fn from(src: UuidV7) -> Self {
        src.0
    }
}

impl TryFrom<[u8; 16]> for UuidV7 {
    type Error = ParseError;

    /// Creates an object from the 16-byte big-endian representation.
    fn try_from(src: [u8; 16]) -> Result<Self, Self::Error> {
        check_version_and_variant(&src).map(|()| Self(src))
    }
}

impl From<UuidV7> for u128 {
    fn from(src: UuidV7) -> Self {
        Self::from_be_bytes(src.0)
    }
}

impl TryFrom<u128> for UuidV7 {
    type Error = ParseError;

    fn try_from(src: u128) -> Result<Self, Self::Error> {
        Self::try_from(src.to_be_bytes())
    }
}

impl AsRef<[u8]> for UuidV7 {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Error parsing an invalid representation of UUIDv7.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, thiserror::Error)]
pub enum ParseError {
    /// The string is not 36 bytes long.
    #[error("invalid length: expected 36 bytes, found {len}")]
    InvalidLength {
        /// Length of the input in bytes.
        len: usize,
    },

    /// A hyphen is missing at one of the group separator positions.
    #[error("expected '-' at index {index}")]
    InvalidHyphen {
        /// Zero-based byte index of the offending character.
        index: usize,
    },

    /// A digit position holds something other than a hexadecimal digit.
    #[error("invalid hexadecimal digit at index {index}")]
    InvalidDigit {
        /// Zero-based byte index of the offending character.
        index: usize,
    },

    /// The version nibble is not `7`.
    #[error("invalid version: expected 7")]
    InvalidVersion,

    /// The variant bits are not `10`.
    #[error("invalid variant: expected one of 8, 9, a, b")]
    InvalidVariant,
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::{ParseError, UuidV7};

    impl From<UuidV7> for uuid::Uuid {
        fn from(src: UuidV7) -> Self {
            uuid::Uuid::from_bytes(src.0)
        }
    }

    impl TryFrom<uuid::Uuid> for UuidV7 {
        type Error = ParseError;

        fn try_from(src: uuid::Uuid) -> Result<Self, Self::Error> {
            Self::try_from(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, UuidV7};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for UuidV7 {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for UuidV7 {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = UuidV7;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUIDv7 representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            let bytes = <[u8; 16]>::try_from(value).map_err(de::Error::custom)?;
            Self::Value::try_from(bytes).map_err(de::Error::custom)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::UuidV7;
        use serde_test::{assert_de_tokens_error, assert_tokens, Configure, Token};

        /// Serializes and deserializes prepared cases correctly
        #[test]
        fn serializes_and_deserializes_prepared_cases_correctly() {
            let cases = [
                (
                    "0195acfc-48db-7a33-b997-f86dffc91039",
                    &[
                        1, 149, 172, 252, 72, 219, 122, 51, 185, 151, 248, 109, 255, 201, 16, 57,
                    ],
                ),
                (
                    "0180ae59-078c-7b80-b113-2fe14a615fb3",
                    &[
                        1, 128, 174, 89, 7, 140, 123, 128, 177, 19, 47, 225, 74, 97, 95, 179,
                    ],
                ),
                (
                    "0180ae59-0791-7e79-8804-02ce2b5bc8d2",
                    &[
                        1, 128, 174, 89, 7, 145, 126, 121, 136, 4, 2, 206, 43, 91, 200, 210,
                    ],
                ),
            ];

            for (text, bytes) in cases {
                let e = text.parse::<UuidV7>().unwrap();
                assert_tokens(&e.readable(), &[Token::String(text)]);
                assert_tokens(&e.compact(), &[Token::Bytes(bytes)]);
            }
        }

        /// Rejects representations of non-v7 UUIDs
        #[test]
        fn rejects_representations_of_non_v7_uuids() {
            assert_de_tokens_error::<serde_test::Readable<UuidV7>>(
                &[Token::Str("2ca4b2ce-6c13-40d4-bccf-37d222820f6f")],
                "invalid version: expected 7",
            );
            assert_de_tokens_error::<serde_test::Compact<UuidV7>>(
                &[Token::Bytes(&[0u8; 16])],
                "invalid version: expected 7",
            );
        }
    }
}
