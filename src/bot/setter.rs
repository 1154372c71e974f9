//! Word choice for a bot setter
//!
//! Rack-spellable dictionary words are ranked by letter score, then length,
//! then alphabetically, and split into four quartile buckets. The bot takes
//! the hardest word of the bucket matching its difficulty.

use crate::config::BotDifficulty;
use crate::game::dictionary::Dictionary;
use crate::game::LetterRack;

/// Tile values: common letters are cheap, rare ones dear.
pub fn letter_score(letter: char) -> u32 {
    match letter.to_ascii_lowercase() {
        'e' | 'a' | 'i' | 'o' | 'n' | 'r' | 't' | 'l' | 's' | 'u' => 1,
        'd' | 'g' => 2,
        'b' | 'c' | 'm' | 'p' => 3,
        'f' | 'h' | 'v' | 'w' | 'y' => 4,
        'k' => 5,
        'j' | 'x' => 8,
        'q' | 'z' => 10,
        _ => 0,
    }
}

pub fn word_score(word: &str) -> u32 {
    word.chars().map(letter_score).sum()
}

/// Dictionary words the rack can spell, in dictionary order.
pub fn words_for_rack<'a>(dictionary: &'a Dictionary, rack: &LetterRack) -> Vec<&'a str> {
    dictionary
        .words()
        .iter()
        .map(String::as_str)
        .filter(|w| rack.can_spell(w))
        .collect()
}

/// Easiest first: by score, then length, then alphabetically.
pub fn rank_words<'a>(words: &[&'a str]) -> Vec<&'a str> {
    let mut ranked = words.to_vec();
    ranked.sort_by(|a, b| {
        (word_score(a), a.len(), *a).cmp(&(word_score(b), b.len(), *b))
    });
    ranked
}

/// Split a ranked list into easy/medium/hard/extreme quartiles.
///
/// Boundaries are `0, ceil(n/4), ceil(n/2), ceil(3n/4), n`. An empty bucket
/// borrows from the nearest non-empty one, looking left before right.
pub fn build_buckets<'a>(ranked: &[&'a str]) -> [Vec<&'a str>; 4] {
    let n = ranked.len();
    if n == 0 {
        return Default::default();
    }

    let bounds = [0, n.div_ceil(4), n.div_ceil(2), (3 * n).div_ceil(4), n];
    let original: [Vec<&'a str>; 4] =
        std::array::from_fn(|i| ranked[bounds[i]..bounds[i + 1]].to_vec());

    std::array::from_fn(|idx| {
        if !original[idx].is_empty() {
            return original[idx].clone();
        }
        for distance in 1..4 {
            if let Some(left) = idx.checked_sub(distance) {
                if !original[left].is_empty() {
                    return original[left].clone();
                }
            }
            let right = idx + distance;
            if right < 4 && !original[right].is_empty() {
                return original[right].clone();
            }
        }
        Vec::new()
    })
}

/// Hardest word of the bucket for `difficulty`. `None` without candidates.
pub fn select_by_difficulty<'a>(
    candidates: &[&'a str],
    difficulty: BotDifficulty,
) -> Option<&'a str> {
    let ranked = rank_words(candidates);
    let buckets = build_buckets(&ranked);
    buckets[difficulty.bucket_index()].last().copied()
}

/// The word a bot setter submits. Without usable dictionary words it falls
/// back to the first `min_len` rack letters.
pub fn choose_word(
    dictionary: &Dictionary,
    rack: &LetterRack,
    difficulty: BotDifficulty,
    min_len: usize,
    max_len: usize,
) -> String {
    let candidates = words_for_rack(dictionary, rack);
    match select_by_difficulty(&candidates, difficulty) {
        Some(word) => word.to_string(),
        None => {
            let usable = &rack.letters()[..max_len.min(rack.len())];
            usable.iter().take(min_len).collect()
        }
    }
}
