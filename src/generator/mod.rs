//! Random password generator.
//!
//! Passwords are drawn uniformly from the union of the selected character
//! classes using the thread-local CSPRNG.  A candidate that misses one of
//! the requested classes is thrown away and drawn again, so the output
//! distribution over valid passwords stays uniform.

use rand::Rng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NUMBERS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{}|;:,./<>?~";

/// Characters that are easily confused with one another.
const SIMILAR: &str = "il1Lo0O";

/// Symbols that are awkward to type or quote in shells and config files.
const AMBIGUOUS: &str = "`{}[]()|\\/'\"~,;:.<>";

/// Upper bound on re-draws before giving up.
const MAX_ATTEMPTS: usize = 10_000;

/// Options controlling password generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub length: usize,
    pub lowercase: bool,
    pub uppercase: bool,
    pub numbers: bool,
    pub symbols: bool,
    pub exclude_similar: bool,
    pub exclude_ambiguous: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: 16,
            lowercase: true,
            uppercase: true,
            numbers: true,
            symbols: true,
            exclude_similar: true,
            exclude_ambiguous: false,
        }
    }
}

impl GeneratorOptions {
    /// The character pool of every requested class, after exclusions.
    fn classes(&self) -> Vec<Vec<char>> {
        let requested = [
            (self.lowercase, LOWERCASE, self.exclude_similar, SIMILAR),
            (self.uppercase, UPPERCASE, self.exclude_similar, SIMILAR),
            (self.numbers, NUMBERS, self.exclude_similar, SIMILAR),
            (self.symbols, SYMBOLS, self.exclude_ambiguous, AMBIGUOUS),
        ];

        requested
            .into_iter()
            .filter(|(enabled, ..)| *enabled)
            .map(|(_, set, exclude, excluded)| {
                set.chars()
                    .filter(|c| !(exclude && excluded.contains(*c)))
                    .collect::<Vec<char>>()
            })
            .collect()
    }
}

/// Generate a password satisfying `options`.
///
/// The result contains at least one character from each requested class.
pub fn generate_password(options: &GeneratorOptions) -> Result<Zeroizing<String>> {
    if options.length == 0 {
        return Err(VaultError::Generator(
            "password length must be at least 1".into(),
        ));
    }

    let classes = options.classes();
    if classes.is_empty() {
        return Err(VaultError::Generator(
            "at least one character class must be enabled".into(),
        ));
    }
    if options.length < classes.len() {
        return Err(VaultError::Generator(format!(
            "length {} is too short to include all {} selected character classes",
            options.length,
            classes.len()
        )));
    }

    let pool: Vec<char> = classes.iter().flatten().copied().collect();
    let mut rng = rand::rng();

    for _ in 0..MAX_ATTEMPTS {
        let candidate: Zeroizing<String> = Zeroizing::new(
            (0..options.length)
                .map(|_| pool[rng.random_range(0..pool.len())])
                .collect(),
        );

        let complete = classes
            .iter()
            .all(|class| candidate.chars().any(|c| class.contains(&c)));
        if complete {
            return Ok(candidate);
        }
    }

    Err(VaultError::Generator(
        "could not satisfy character class requirements".into(),
    ))
}
