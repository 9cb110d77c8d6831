//! Word sources for enemy labels.
//!
//! Meteors draw names sequentially from a shared [`WordBank`] that is
//! shuffled once per session. Every other enemy gets a random lowercase word
//! of a length fixed by its type.

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;

use crate::constants::METEOR_WORD_MAX;
use crate::error::{GameError, GameResult};

/// Built-in meteor name list, used when the configured word list is missing.
const DEFAULT_WORD_LIST: &str = include_str!("../assets/meteor_names.txt");

/// Shared pool of meteor names with a cursor that wraps around.
#[derive(Resource, Debug, Clone)]
pub struct WordBank {
    words: Vec<String>,
    cursor: usize,
}

impl WordBank {
    /// Bank that hands out `words` in the given order. Entries are sanitised to
    /// ASCII letters and truncated; entries left empty are dropped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| sanitize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words, cursor: 0 }
    }

    /// Same as [`WordBank::from_words`] followed by a single shuffle.
    pub fn shuffled<I, S, R>(words: I, rng: &mut R) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let mut bank = Self::from_words(words);
        bank.words.shuffle(rng);
        bank
    }

    /// Parse a whitespace-separated list.
    pub fn parse_list<R: Rng + ?Sized>(contents: &str, rng: &mut R) -> Self {
        Self::shuffled(contents.split_whitespace(), rng)
    }

    pub fn load<R: Rng + ?Sized>(path: impl AsRef<Path>, rng: &mut R) -> GameResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse_list(&contents, rng))
    }

    /// Load `path`, falling back to the built-in list when it is unreadable or empty.
    pub fn load_or_default<R: Rng + ?Sized>(path: impl AsRef<Path>, rng: &mut R) -> Self {
        match Self::load(path.as_ref(), rng) {
            Ok(bank) if !bank.is_empty() => bank,
            Ok(_) => {
                warn!(
                    "Word list {} has no usable words; using built-in list",
                    path.as_ref().display()
                );
                Self::parse_list(DEFAULT_WORD_LIST, rng)
            }
            Err(err) => {
                info!("{err}; using built-in word list");
                Self::parse_list(DEFAULT_WORD_LIST, rng)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Next name in sequence, wrapping to the start once exhausted.
    ///
    /// An empty bank falls back to a random word so callers never get "".
    pub fn next_word<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        if self.words.is_empty() {
            return random_word(rng, 4..=8);
        }
        if self.cursor >= self.words.len() {
            self.cursor = 0;
        }
        let word = self.words[self.cursor].clone();
        self.cursor += 1;
        word
    }
}

impl Default for WordBank {
    fn default() -> Self {
        Self::from_words(DEFAULT_WORD_LIST.split_whitespace())
    }
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .take(METEOR_WORD_MAX)
        .collect()
}

pub fn random_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    rng.gen_range(b'a'..=b'z') as char
}

/// Random lowercase word with a length drawn from `len`.
pub fn random_word<R: Rng + ?Sized>(rng: &mut R, len: std::ops::RangeInclusive<usize>) -> String {
    let len = rng.gen_range(len);
    (0..len).map(|_| random_letter(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn bank_wraps_around() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut bank = WordBank::from_words(["ceres", "vesta"]);
        assert_eq!(bank.next_word(&mut rng), "ceres");
        assert_eq!(bank.next_word(&mut rng), "vesta");
        assert_eq!(bank.next_word(&mut rng), "ceres");
    }

    #[test]
    fn names_are_sanitised_and_truncated() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut bank = WordBank::from_words(["Hale-Bopp", "Shoemaker-Levy-Nine", "42"]);
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.next_word(&mut rng), "halebopp");
        let long = bank.next_word(&mut rng);
        assert_eq!(long.len(), METEOR_WORD_MAX);
        assert!(long.starts_with("shoemakerlevy"));
    }

    #[test]
    fn shuffle_keeps_every_word() {
        let mut rng = StdRng::seed_from_u64(7);
        let words = ["alpha", "beta", "gamma", "delta", "epsilon"];
        let mut bank = WordBank::shuffled(words, &mut rng);
        let mut drawn: Vec<String> = (0..words.len()).map(|_| bank.next_word(&mut rng)).collect();
        drawn.sort();
        let mut expected: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        expected.sort();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn empty_bank_still_yields_a_word() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut bank = WordBank::from_words(Vec::<String>::new());
        let word = bank.next_word(&mut rng);
        assert!((4..=8).contains(&word.len()));
    }

    #[test]
    fn built_in_list_is_usable() {
        assert!(!WordBank::default().is_empty());
    }

    #[test]
    fn random_word_respects_length() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let word = random_word(&mut rng, 15..=20);
            assert!((15..=20).contains(&word.len()));
            assert!(word.chars().all(|c| c.is_ascii_lowercase()));
        }
    }
}
