//! UUIDv7 generator and related types.

use std::time;

use crate::UuidV7;

pub mod with_rand08;

/// A source of the current time, expressed in milliseconds since the Unix epoch.
pub trait ClockSource {
    /// Returns the current Unix timestamp in milliseconds.
    fn unix_ts_ms(&mut self) -> Result<u64, GenerateError>;
}

/// A source of cryptographically secure random bytes.
///
/// Implementations must report an unavailable entropy source as an error instead of falling back
/// to a weaker generator.
pub trait RandomSource {
    /// Fills `dest` entirely with random data.
    fn fill_random(&mut self, dest: &mut [u8]) -> Result<(), GenerateError>;
}

/// The system real-time clock.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn unix_ts_ms(&mut self) -> Result<u64, GenerateError> {
        let elapsed = time::SystemTime::now().duration_since(time::UNIX_EPOCH)?;
        Ok(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Represents a UUIDv7 generator over an injected clock and random number source.
///
/// The generator keeps no state between calls besides its two sources, so UUIDs generated within
/// the same millisecond share the timestamp prefix but are not ordered relative to each other.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use uuidv7_codec::{SystemClock, V7Generator};
///
/// let mut g = V7Generator::with_rand08(SystemClock, OsRng);
/// println!("{}", g.generate()?);
/// # Ok::<(), uuidv7_codec::GenerateError>(())
/// ```
///
/// Fixed sources make the output fully deterministic:
///
/// ```rust
/// use uuidv7_codec::{ClockSource, GenerateError, RandomSource, V7Generator};
///
/// struct FixedClock(u64);
///
/// impl ClockSource for FixedClock {
///     fn unix_ts_ms(&mut self) -> Result<u64, GenerateError> {
///         Ok(self.0)
///     }
/// }
///
/// struct ZeroRandom;
///
/// impl RandomSource for ZeroRandom {
///     fn fill_random(&mut self, dest: &mut [u8]) -> Result<(), GenerateError> {
///         dest.fill(0);
///         Ok(())
///     }
/// }
///
/// let mut g = V7Generator::new(FixedClock(0x0195_acfc_48db), ZeroRandom);
/// assert_eq!(g.generate()?.to_string(), "0195acfc-48db-7000-8000-000000000000");
/// # Ok::<(), GenerateError>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct V7Generator<C, R> {
    /// The clock used by the generator.
    clock: C,

    /// The random number source used by the generator.
    rng: R,
}

impl<C: ClockSource, R: RandomSource> V7Generator<C, R> {
    /// Creates a generator instance.
    pub const fn new(clock: C, rng: R) -> Self {
        Self { clock, rng }
    }

    /// Generates a new UUIDv7 object from the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock or the random number source fails, or if the clock reports a
    /// timestamp that does not fit in 48 bits.
    pub fn generate(&mut self) -> Result<UuidV7, GenerateError> {
        let unix_ts_ms = self.clock.unix_ts_ms().map_err(|err| {
            tracing::error!(error = %err, "clock source failed");
            err
        })?;
        if unix_ts_ms >= 1 << 48 {
            tracing::debug!(unix_ts_ms, "timestamp does not fit in 48 bits");
            return Err(GenerateError::TimestampOutOfRange(unix_ts_ms));
        }

        let mut random = [0u8; 10];
        self.rng.fill_random(&mut random).map_err(|err| {
            tracing::error!(error = %err, "random source failed");
            err
        })?;
        Ok(Self::generate_core(unix_ts_ms, random))
    }

    /// Builds a UUIDv7 object from the `unix_ts_ms` and 80 random bits passed.
    ///
    /// The first two bytes of `random` supply the 12-bit `rand_a` field and the remaining eight
    /// bytes supply the 62-bit `rand_b` field; the excess high-order bits are discarded.
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` does not fit in 48 bits.
    pub fn generate_core(unix_ts_ms: u64, random: [u8; 10]) -> UuidV7 {
        assert!(
            unix_ts_ms < 1 << 48,
            "`unix_ts_ms` must be a 48-bit integer"
        );

        let [a0, a1, b @ ..] = random;
        UuidV7::from_fields_v7(
            unix_ts_ms,
            u16::from_be_bytes([a0, a1]) & 0x0fff,
            u64::from_be_bytes(b) & 0x3fff_ffff_ffff_ffff,
        )
    }
}

/// Supports operations as an infinite iterator that produces a new UUIDv7 object, or the error
/// that prevented one, for each call of `next()`.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use uuidv7_codec::{SystemClock, V7Generator};
///
/// V7Generator::with_rand08(SystemClock, OsRng)
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{}] {}", i, e.unwrap()));
/// ```
impl<C: ClockSource, R: RandomSource> Iterator for V7Generator<C, R> {
    type Item = Result<UuidV7, GenerateError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<C: ClockSource, R: RandomSource> std::iter::FusedIterator for V7Generator<C, R> {}

/// Error generating a UUIDv7.
///
/// All variants are fatal to the generation in progress; the generator never substitutes weaker
/// inputs.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The random number source could not supply random bytes.
    #[error("random number source unavailable: {0}")]
    Entropy(#[from] rand::Error),

    /// The system clock reports a time before the Unix epoch.
    #[error("system clock unavailable: {0}")]
    Clock(#[from] time::SystemTimeError),

    /// The clock reports a timestamp that does not fit in 48 bits.
    #[error("timestamp {0} ms does not fit in 48 bits")]
    TimestampOutOfRange(u64),
}
