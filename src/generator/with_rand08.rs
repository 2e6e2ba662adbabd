//! Integration with `rand` (v0.8) crate.

use super::{ClockSource, GenerateError, RandomSource, V7Generator};
use rand::{CryptoRng, RngCore};

/// An adapter that implements [`RandomSource`] for cryptographically secure [`RngCore`] types.
///
/// Failures are taken from [`RngCore::try_fill_bytes`], so an [`rand::rngs::OsRng`] that cannot
/// reach the operating system's entropy source surfaces as [`GenerateError::Entropy`].
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore + CryptoRng> RandomSource for Adapter<T> {
    fn fill_random(&mut self, dest: &mut [u8]) -> Result<(), GenerateError> {
        Ok(self.0.try_fill_bytes(dest)?)
    }
}

impl<C: ClockSource, T: RngCore + CryptoRng> V7Generator<C, Adapter<T>> {
    /// Creates a generator object with a specified clock and a random number generator that
    /// implements [`RngCore`] and [`CryptoRng`] from `rand` (v0.8) crate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidv7_codec::{SystemClock, V7Generator};
    ///
    /// let mut g = V7Generator::with_rand08(SystemClock, rand::thread_rng());
    /// println!("{}", g.generate()?);
    /// # Ok::<(), uuidv7_codec::GenerateError>(())
    /// ```
    pub const fn with_rand08(clock: C, rng: T) -> Self {
        Self::new(clock, Adapter(rng))
    }
}
