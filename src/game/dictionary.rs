//! Dictionary loading for secret words and bot reasoning
//!
//! Word lists are plain text, one word per line. The first readable source
//! that yields at least one acceptable word wins:
//! 1. the word list configured in the match options
//! 2. `words.txt` in the OS data directory
//! 3. `/tmp/hanging/words.txt`
//!
//! With no usable source the built-in list is used. Words are lower-case,
//! alphabetic, length-filtered, deduplicated and sorted, so every bot
//! decision over the list is deterministic.

use crate::config::MatchOptions;
use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Most words kept from a single source.
pub const MAX_WORDS: usize = 50_000;

const SHARED_WORD_LIST: &str = "/tmp/hanging/words.txt";

static BUILT_IN_WORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut words = vec![
        "apple", "apron", "badge", "baker", "beach", "blaze", "board", "bonus", "brave", "brick",
        "bring", "cable", "candy", "chair", "chase", "clear", "cloud", "coast", "crate", "dance",
        "dream", "eager", "earth", "fable", "flame", "float", "focus", "frame", "friend", "frost",
        "globe", "grace", "grape", "green", "happy", "house", "jolly", "laugh", "light", "lucky",
        "magic", "maple", "melon", "metal", "music", "north", "ocean", "party", "pearl", "piano",
        "pilot", "planet", "plaza", "point", "power", "pride", "prize", "queen", "quick", "radio",
        "raven", "river", "robot", "royal", "score", "shape", "shine", "shore", "smile", "spark",
        "spice", "spoon", "sport", "sprout", "stack", "stone", "story", "storm", "sugar", "sunny",
        "swing", "table", "tiger", "toast", "track", "travel", "vivid", "voice", "water", "whale",
        "wheat", "zebra",
    ];
    words.sort_unstable();
    words
});

/// Where the loaded words came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionarySource {
    File(PathBuf),
    BuiltIn,
}

/// An ordered, immutable word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    words: Vec<String>,
    source: DictionarySource,
}

impl Dictionary {
    /// Load from the first usable source for these options.
    pub fn load(options: &MatchOptions) -> Self {
        let (min, max) = (options.min_word_length, options.max_word_length);

        for path in Self::candidate_paths(options) {
            if !path.exists() {
                continue;
            }
            match read_words(&path, min, max) {
                Ok(words) if !words.is_empty() => {
                    info!(path = %path.display(), count = words.len(), "loaded word list");
                    return Self {
                        words,
                        source: DictionarySource::File(path),
                    };
                }
                Ok(_) => debug!(path = %path.display(), "word list has no usable words"),
                Err(e) => warn!(path = %path.display(), error = %e, "failed to read word list"),
            }
        }

        Self::built_in(min, max)
    }

    /// Sources tried by [`Dictionary::load`], in priority order.
    pub fn candidate_paths(options: &MatchOptions) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(path) = &options.word_list_path {
            paths.push(path.clone());
        }
        if let Ok(dir) = crate::storage::data_dir() {
            paths.push(dir.join("words.txt"));
        }
        paths.push(PathBuf::from(SHARED_WORD_LIST));
        paths
    }

    /// The built-in list restricted to `[min, max]` letters.
    pub fn built_in(min: usize, max: usize) -> Self {
        let words = BUILT_IN_WORDS
            .iter()
            .filter(|w| (min..=max).contains(&w.len()))
            .map(|w| w.to_string())
            .collect();
        Self {
            words,
            source: DictionarySource::BuiltIn,
        }
    }

    /// Build from arbitrary words with the same filtering as file sources.
    pub fn from_words<I, S>(words: I, min: usize, max: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept = BTreeSet::new();
        for word in words {
            if let Some(word) = accept(word.as_ref(), min, max) {
                kept.insert(word);
            }
        }
        Self {
            words: kept.into_iter().collect(),
            source: DictionarySource::BuiltIn,
        }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn source(&self) -> &DictionarySource {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Membership test (words are kept sorted).
    pub fn contains(&self, word: &str) -> bool {
        self.words
            .binary_search_by(|w| w.as_str().cmp(word))
            .is_ok()
    }
}

/// Read and filter a word list file.
pub fn read_words(path: &Path, min: usize, max: usize) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    read_words_from(BufReader::new(file), min, max)
}

/// Read and filter words from any buffered reader. Invalid UTF-8 is replaced,
/// which makes the affected lines fail the alphabetic check.
pub fn read_words_from<R: BufRead>(reader: R, min: usize, max: usize) -> io::Result<Vec<String>> {
    let mut words = BTreeSet::new();
    for line in reader.split(b'\n') {
        let line = line?;
        let text = String::from_utf8_lossy(&line);
        if let Some(word) = accept(&text, min, max) {
            words.insert(word);
            if words.len() >= MAX_WORDS {
                break;
            }
        }
    }
    Ok(words.into_iter().collect())
}

fn accept(raw: &str, min: usize, max: usize) -> Option<String> {
    let word = raw.trim().to_lowercase();
    if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if !(min..=max).contains(&word.len()) {
        return None;
    }
    Some(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reader_filters_and_sorts() {
        let input = "Zebra\napple\n  melon \nx\nsnow-man\nnaïve\napple\ntoolongwordhere\n";
        let words = read_words_from(Cursor::new(input), 3, 8).unwrap();
        assert_eq!(words, vec!["apple", "melon", "zebra"]);
    }

    #[test]
    fn test_reader_tolerates_invalid_utf8() {
        let mut bytes = b"cat\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"dog\n");
        let words = read_words_from(Cursor::new(bytes), 3, 8).unwrap();
        assert_eq!(words, vec!["cat", "dog"]);
    }

    #[test]
    fn test_built_in_respects_length() {
        let dict = Dictionary::built_in(6, 6);
        assert!(!dict.is_empty());
        assert!(dict.words().iter().all(|w| w.len() == 6));
        assert!(dict.contains("planet"));
        assert!(!dict.contains("apple"));
    }

    #[test]
    fn test_built_in_is_sorted() {
        let dict = Dictionary::built_in(3, 8);
        let mut sorted = dict.words().to_vec();
        sorted.sort();
        assert_eq!(dict.words(), sorted.as_slice());
        assert_eq!(dict.source(), &DictionarySource::BuiltIn);
    }

    #[test]
    fn test_load_prefers_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "crate\ncargo\nrustc\n").unwrap();

        let options = MatchOptions {
            word_list_path: Some(path.clone()),
            ..Default::default()
        };
        let dict = Dictionary::load(&options);
        assert_eq!(dict.source(), &DictionarySource::File(path));
        assert_eq!(dict.words(), &["cargo", "crate", "rustc"]);
    }

    #[test]
    fn test_load_skips_file_without_usable_words() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "a\nb\n12345\n").unwrap();

        let options = MatchOptions {
            word_list_path: Some(path.clone()),
            ..Default::default()
        };
        let dict = Dictionary::load(&options);
        assert_ne!(dict.source(), &DictionarySource::File(path));
        assert!(!dict.is_empty());
    }

    /// Four-letter word for `n` in base 26, "aaaa" upward.
    fn nth_word(n: usize) -> String {
        let mut letters = [b'a'; 4];
        let mut rest = n;
        for slot in letters.iter_mut().rev() {
            *slot = b'a' + (rest % 26) as u8;
            rest /= 26;
        }
        String::from_utf8(letters.to_vec()).unwrap()
    }

    #[test]
    fn test_file_capped_at_max_words() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        let mut text = String::new();
        for n in 0..MAX_WORDS + 5_000 {
            // every word twice, so duplicates must not count toward the cap
            let word = nth_word(n);
            text.push_str(&word);
            text.push('\n');
            text.push_str(&word.to_uppercase());
            text.push('\n');
        }
        std::fs::write(&path, text).unwrap();

        let words = read_words(&path, 3, 8).unwrap();
        assert_eq!(words.len(), MAX_WORDS);
        assert!(words.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(words.first().map(String::as_str), Some("aaaa"));
        assert_eq!(words.last(), Some(&nth_word(MAX_WORDS - 1)));
    }

    #[test]
    fn test_from_words_dedupes() {
        let dict = Dictionary::from_words(["Bread", "bread", "jam"], 3, 8);
        assert_eq!(dict.words(), &["bread", "jam"]);
        assert!(dict.contains("jam"));
        assert!(!dict.contains("butter"));
    }

    #[test]
    fn test_candidate_paths_order() {
        let options = MatchOptions {
            word_list_path: Some(PathBuf::from("/custom/words.txt")),
            ..Default::default()
        };
        let paths = Dictionary::candidate_paths(&options);
        assert_eq!(paths.first(), Some(&PathBuf::from("/custom/words.txt")));
        assert_eq!(paths.last(), Some(&PathBuf::from(SHARED_WORD_LIST)));
    }
}
