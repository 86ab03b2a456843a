//! Word sources for new games.
//!
//! The service never reaches for a global word list; it is handed a
//! [`WordSource`]. Production uses a randomly sampled [`WordList`], tests
//! use a seeded list or a [`FixedWord`].

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{
    path::Path,
    sync::{Mutex, PoisonError},
};
use thiserror::Error;

use crate::game::letters::to_upper;

/// Built-in vocabulary, including words with umlauts.
pub const DEFAULT_WORDS: &[&str] = &[
    "AUTO", "KATZE", "HUND", "BAUM", "HAUS", "COMPUTER", "PROGRAMM", "JAVA", "SPRING", "BOOT",
    "DATABASE", "ENTWICKLER", "HANGMAN", "ALPHABET", "BUCHSTABE", "SPIEL", "SIEG", "NIEDERLAGE",
    "WORT", "SCHULE", "STUDIUM", "PROJEKT", "LÖSUNG", "FEHLER", "VERSUCH", "MÜNCHEN", "KÖLN",
    "ZÜRICH", "GRÜN", "SCHÖN", "ÜBUNG", "TÜR",
];

/// Word list errors
#[derive(Debug, Error)]
pub enum WordListError {
    /// No usable words
    #[error("Word list is empty")]
    Empty,

    /// A word contains something other than letters
    #[error("Invalid word {word:?} on line {line}")]
    InvalidWord { word: String, line: usize },

    /// Word file could not be read
    #[error("Failed to read word file: {0}")]
    Io(#[from] std::io::Error),
}

/// Supplies secret words for new games
pub trait WordSource: Send + Sync {
    /// Pick the secret word for the next game (uppercase letters only).
    fn pick_word(&self) -> String;
}

/// Uniformly sampled word list
#[derive(Debug)]
pub struct WordList {
    words: Vec<String>,
    /// Seeded generator for reproducible picks. `None` uses the thread RNG.
    rng: Option<Mutex<StdRng>>,
}

impl WordList {
    /// Build a list from arbitrary words, uppercasing them.
    ///
    /// # Errors
    ///
    /// Fails if there are no words or any word contains a non-letter.
    pub fn new<I, S>(words: I) -> Result<Self, WordListError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Vec::new();
        for (i, word) in words.into_iter().enumerate() {
            list.push(normalize(word.as_ref(), i + 1)?);
        }

        if list.is_empty() {
            return Err(WordListError::Empty);
        }

        Ok(Self {
            words: list,
            rng: None,
        })
    }

    /// Load a list from a file with one word per line.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, has no words, or has an invalid word.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WordListError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse word list file contents.
    ///
    /// # Errors
    ///
    /// Same as [`WordList::from_file`], minus I/O.
    pub fn parse(contents: &str) -> Result<Self, WordListError> {
        let mut words = Vec::new();
        for (i, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            words.push(normalize(line, i + 1)?);
        }

        if words.is_empty() {
            return Err(WordListError::Empty);
        }

        Ok(Self { words, rng: None })
    }

    /// Make picks reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Some(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS.iter().map(|w| (*w).to_string()).collect(),
            rng: None,
        }
    }
}

impl WordSource for WordList {
    fn pick_word(&self) -> String {
        let index = match &self.rng {
            Some(rng) => rng
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .random_range(0..self.words.len()),
            None => rand::rng().random_range(0..self.words.len()),
        };
        self.words[index].clone()
    }
}

/// Always returns the same word
#[derive(Clone, Debug)]
pub struct FixedWord(String);

impl FixedWord {
    /// # Errors
    ///
    /// Fails if `word` is empty or contains a non-letter.
    pub fn new(word: &str) -> Result<Self, WordListError> {
        if word.is_empty() {
            return Err(WordListError::Empty);
        }
        normalize(word, 1).map(Self)
    }
}

impl WordSource for FixedWord {
    fn pick_word(&self) -> String {
        self.0.clone()
    }
}

fn normalize(word: &str, line: usize) -> Result<String, WordListError> {
    if word.is_empty() || !word.chars().all(char::is_alphabetic) {
        return Err(WordListError::InvalidWord {
            word: word.to_string(),
            line,
        });
    }
    Ok(word.chars().map(to_upper).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary_is_valid() {
        let list = WordList::default();
        assert_eq!(list.len(), DEFAULT_WORDS.len());
        assert!(WordList::new(DEFAULT_WORDS).is_ok());
    }

    #[test]
    fn test_pick_word_comes_from_list() {
        let list = WordList::new(["katze", "hund"]).unwrap();
        for _ in 0..20 {
            let word = list.pick_word();
            assert!(word == "KATZE" || word == "HUND");
        }
    }

    #[test]
    fn test_seeded_lists_agree() {
        let a = WordList::default().with_seed(42);
        let b = WordList::default().with_seed(42);
        let picks_a: Vec<String> = (0..10).map(|_| a.pick_word()).collect();
        let picks_b: Vec<String> = (0..10).map(|_| b.pick_word()).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let list = WordList::parse("# animals\n\nkatze\n  hund  \n").unwrap();
        assert_eq!(list.words(), ["KATZE", "HUND"]);
    }

    #[test]
    fn test_parse_rejects_bad_word() {
        let err = WordList::parse("katze\nice cream\n").unwrap_err();
        assert!(matches!(err, WordListError::InvalidWord { line: 2, .. }));
    }

    #[test]
    fn test_empty_list_rejected() {
        assert!(matches!(
            WordList::new(Vec::<String>::new()),
            Err(WordListError::Empty)
        ));
        assert!(matches!(WordList::parse("# nothing\n"), Err(WordListError::Empty)));
    }

    #[test]
    fn test_fixed_word() {
        let source = FixedWord::new("cat").unwrap();
        assert_eq!(source.pick_word(), "CAT");
        assert!(FixedWord::new("").is_err());
        assert!(FixedWord::new("c4t").is_err());
    }
}
