//! Game logic: letter racks, seeds, validation, the wheel, guesses, scoring and standings

pub mod dictionary;
pub mod player;
pub mod resolver;
pub mod round;
pub mod scoring;
pub mod seed;
pub mod standings;
pub mod validation;
pub mod wheel;

use once_cell::sync::Lazy;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;

/// Rack pool weights, roughly English frequency.
/// Vowels and common consonants dominate; Q and Z show up about once a match.
const LETTER_WEIGHTS: [(char, u32); 26] = [
    ('e', 12),
    ('a', 9),
    ('i', 9),
    ('o', 8),
    ('n', 6),
    ('r', 6),
    ('t', 6),
    ('l', 4),
    ('s', 4),
    ('u', 4),
    ('d', 4),
    ('g', 3),
    ('b', 2),
    ('c', 2),
    ('m', 2),
    ('p', 2),
    ('f', 2),
    ('h', 2),
    ('v', 2),
    ('w', 2),
    ('y', 2),
    ('k', 1),
    ('j', 1),
    ('x', 1),
    ('q', 1),
    ('z', 1),
];

static LETTER_DIST: Lazy<WeightedIndex<u32>> = Lazy::new(|| {
    WeightedIndex::new(LETTER_WEIGHTS.iter().map(|(_, w)| *w)).expect("valid weights")
});

/// A rack of letters for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterRack {
    letters: Vec<char>,
}

impl LetterRack {
    /// Generate the rack for `round` of the match seeded with `match_seed`.
    /// Same inputs, same rack.
    pub fn for_round(match_seed: u64, round: u32, size: usize) -> Self {
        let mut rng = seed::rng_for(seed::derive_rack_seed(match_seed, round));
        Self::generate_with_rng(&mut rng, size)
    }

    /// Generate a rack using a specific RNG.
    pub fn generate_with_rng<R: Rng>(rng: &mut R, size: usize) -> Self {
        let letters = (0..size)
            .map(|_| LETTER_WEIGHTS[LETTER_DIST.sample(rng)].0)
            .collect();
        Self { letters }
    }

    pub fn from_letters(letters: Vec<char>) -> Self {
        Self { letters }
    }

    /// Get the letters in the rack.
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Whether `word` can be spelled from the rack, respecting multiplicity.
    pub fn can_spell(&self, word: &str) -> bool {
        missing_letters(word, &self.letters).is_empty()
    }

    /// Display the rack as spaced upper-case letters.
    pub fn spoken(&self) -> String {
        self.letters
            .iter()
            .map(|c| c.to_ascii_uppercase().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Letters of `word` the rack cannot cover (respecting multiplicity).
/// Deduplicated, in word order.
pub fn missing_letters(word: &str, rack: &[char]) -> Vec<char> {
    let mut available: Vec<char> = rack.to_vec();
    let mut missing: Vec<char> = Vec::new();

    for c in word.chars() {
        if let Some(pos) = available.iter().position(|&r| r == c) {
            available.swap_remove(pos);
        } else if !missing.contains(&c) {
            missing.push(c);
        }
    }

    missing
}
