//! Default generator and entry point function.

use rand::rngs::OsRng;

use crate::{GenerateError, SystemClock, UuidV7, V7Generator};

/// Generates a UUIDv7 object from the system clock and the operating system's entropy source.
///
/// Each call builds its own generator, so this function takes no locks and may be called from any
/// number of threads at once. UUIDs generated within the same millisecond are not ordered
/// relative to each other beyond their shared timestamp prefix.
///
/// # Errors
///
/// Returns an error if the entropy source is unavailable or the system clock reads earlier than
/// the Unix epoch. No weaker fallback is attempted.
///
/// # Examples
///
/// ```rust
/// let uuid = uuidv7_codec::generate()?;
/// println!("{}", uuid); // e.g., "0195acfc-48db-7a33-b997-f86dffc91039"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
///
/// let uuid_string: String = uuidv7_codec::generate()?.into();
/// assert!(uuidv7_codec::is_uuid_v7(&uuid_string));
/// # Ok::<(), uuidv7_codec::GenerateError>(())
/// ```
pub fn generate() -> Result<UuidV7, GenerateError> {
    V7Generator::with_rand08(SystemClock, OsRng).generate()
}

#[cfg(test)]
mod tests {
    use super::generate;
    use crate::{decode, is_uuid_v7};

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| generate().unwrap().into()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-7[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
                assert!(is_uuid_v7(e));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Sets version and variant characters
    #[test]
    fn sets_version_and_variant_characters() {
        SAMPLES.with(|samples| {
            for e in samples {
                assert_eq!(e.as_bytes()[14], b'7');
                assert!(matches!(e.as_bytes()[19], b'8' | b'9' | b'a' | b'b'));
            }
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        use std::time;
        for _ in 0..10_000 {
            let ts_now = (time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis()) as i64;
            let timestamp = generate().unwrap().unix_ts_ms() as i64;
            assert!((ts_now - timestamp).abs() < 16);
        }
    }

    /// Orders timestamps of identifiers generated at least a millisecond apart
    #[test]
    fn orders_timestamps_of_identifiers_generated_at_least_a_millisecond_apart() {
        use std::{thread, time};
        for _ in 0..8 {
            let a = generate().unwrap();
            thread::sleep(time::Duration::from_millis(2));
            let b = generate().unwrap();
            assert!(decode(&a.to_string()).unwrap() < decode(&b.to_string()).unwrap());
            assert!(a < b);
            assert!(a.to_string() < b.to_string());
        }
    }

    /// Sets constant bits and random bits properly
    #[test]
    fn sets_constant_bits_and_random_bits_properly() {
        // count '1' of each bit
        let bins = SAMPLES.with(|samples| {
            let mut bins = [0u32; 128];
            for e in samples {
                let mut it = bins.iter_mut().rev();
                for c in e.chars().rev() {
                    if let Some(mut num) = c.to_digit(16) {
                        for _ in 0..4 {
                            *it.next().unwrap() += num & 1;
                            num >>= 1;
                        }
                    }
                }
            }
            bins
        });

        // test if constant bits are all set to 1 or 0
        let n = N_SAMPLES as u32;
        assert_eq!(bins[48], 0, "version bit 48");
        assert_eq!(bins[49], n, "version bit 49");
        assert_eq!(bins[50], n, "version bit 50");
        assert_eq!(bins[51], n, "version bit 51");
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        // test if random bits are set to 1 at ~50% probability
        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for i in (52..64).chain(66..128) {
            let p = bins[i] as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {i}: {p}");
        }
    }

    /// Generates no collisions under multithreading
    #[test]
    fn generates_no_collisions_under_multithreading() -> Result<(), Box<dyn std::error::Error>> {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..10_000 {
                        tx.send(generate().unwrap()).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert(e);
        }

        assert_eq!(s.len(), 4 * 10_000);
        Ok(())
    }
}
