//! Random short code generation.
//!
//! Codes are fixed-length strings whose characters are drawn independently and
//! uniformly from a configured alphabet. The generator makes no uniqueness promise;
//! collisions are detected on insert by [`crate::application::services::ShortenService`].

use crate::error::AppError;
use rand::Rng;
use serde_json::json;

/// The default alphabet: ASCII digits, lowercase and uppercase letters.
pub const DEFAULT_ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Minimum number of distinct symbols an alphabet must provide.
pub const MIN_ALPHABET_SIZE: usize = 62;

/// Default length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Bounds for the configured code length.
pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 32;

/// Generates random short codes of a fixed length from a fixed alphabet.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    alphabet: Vec<char>,
    length: usize,
}

impl CodeGenerator {
    /// Creates a generator after validating the alphabet and length.
    ///
    /// # Rules
    ///
    /// - Alphabet: at least 62 symbols, all distinct, no whitespace
    /// - Length: 4-32 characters
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] describing the configuration problem.
    pub fn new(alphabet: &str, length: usize) -> Result<Self, AppError> {
        let symbols: Vec<char> = alphabet.chars().collect();

        if symbols.len() < MIN_ALPHABET_SIZE {
            return Err(AppError::internal(
                "Short code alphabet is too small",
                json!({ "required": MIN_ALPHABET_SIZE, "provided": symbols.len() }),
            ));
        }

        if symbols.iter().any(|c| c.is_whitespace()) {
            return Err(AppError::internal(
                "Short code alphabet must not contain whitespace",
                json!({}),
            ));
        }

        let mut sorted = symbols.clone();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(AppError::internal(
                "Short code alphabet must not repeat symbols",
                json!({}),
            ));
        }

        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
            return Err(AppError::internal(
                "Short code length out of range",
                json!({ "min": MIN_CODE_LENGTH, "max": MAX_CODE_LENGTH, "provided": length }),
            ));
        }

        Ok(Self {
            alphabet: symbols,
            length,
        })
    }

    /// Length of every generated code.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Generates a new random code.
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())])
            .collect()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET.chars().collect(),
            length: DEFAULT_CODE_LENGTH,
        }
    }
}
