//! Short code generation and validation utilities.
//!
//! Codes are 6 characters drawn uniformly from `[a-zA-Z0-9]`, giving 62^6
//! (about 56.8 billion) possible values. Uniqueness is not guaranteed here; it is
//! enforced by the link store.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Length of every generated short code.
pub const CODE_LENGTH: usize = 6;

/// Symbols a short code is drawn from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Largest multiple of the alphabet size that fits in a byte. Bytes at or above it
/// are discarded so every symbol is equally likely.
const REJECTION_BOUND: u8 = (256 / ALPHABET.len() * ALPHABET.len()) as u8;

/// Mixed into the fallback seed so back-to-back calls never share one.
static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Source of candidate short codes.
///
/// The service depends on this trait rather than on [`generate_code`] directly so
/// tests can script collisions.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Production generator backed by the OS random source.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code()
    }
}

/// Generates a random short code.
///
/// Uses `getrandom` for entropy. If the OS source fails, falls back to a
/// `StdRng` seeded from the clock; callers cannot observe the difference.
///
/// # Examples
///
/// ```
/// use snaplink::utils::code_generator::{generate_code, is_valid_code};
///
/// let code = generate_code();
/// assert_eq!(code.len(), 6);
/// assert!(is_valid_code(&code));
/// ```
pub fn generate_code() -> String {
    match generate_from_os() {
        Ok(code) => code,
        Err(e) => {
            tracing::warn!(error = %e, "OS random source unavailable, using time-seeded fallback");
            generate_from_fallback()
        }
    }
}

/// Returns true if `code` has the shape of a generated short code.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| ALPHABET.contains(&b))
}

fn generate_from_os() -> Result<String, getrandom::Error> {
    let mut code = String::with_capacity(CODE_LENGTH);
    let mut buffer = [0u8; 16];

    while code.len() < CODE_LENGTH {
        getrandom::fill(&mut buffer)?;

        for &byte in buffer.iter().filter(|&&b| b < REJECTION_BOUND) {
            code.push(symbol(byte as usize));
            if code.len() == CODE_LENGTH {
                break;
            }
        }
    }

    Ok(code)
}

fn generate_from_fallback() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let counter = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    let seed = nanos ^ counter.rotate_left(32) ^ (std::process::id() as u64);

    let mut rng = StdRng::seed_from_u64(seed);

    (0..CODE_LENGTH)
        .map(|_| symbol(rng.random_range(0..ALPHABET.len())))
        .collect()
}

fn symbol(n: usize) -> char {
    ALPHABET[n % ALPHABET.len()] as char
}
