use std::collections::HashMap;

use crate::ranking::Ranking;
use crate::vocabulary::Vocabulary;

/// Turkish infinitive suffixes and the short (verbal noun) form they fold to
const SUFFIX_RULES: &[(&str, &str)] = &[("mek", "me"), ("mak", "ma")];

/// Fold an infinitive (`çalışmak`) to its short form (`çalışma`) when the
/// short form is itself a vocabulary word; otherwise return the word as is.
///
/// Idempotent: the short forms never end in a recognised suffix.
pub fn normalize(word: &str, vocabulary: &Vocabulary) -> String {
    for (long, short) in SUFFIX_RULES {
        if let Some(stem) = word.strip_suffix(long) {
            let candidate = format!("{}{}", stem, short);
            if vocabulary.contains(&candidate) {
                return candidate;
            }
        }
    }
    word.to_string()
}

/// `normalized form → best rank` over the hidden word and every ranked word,
/// so both members of a suffix pair resolve to the same position.
pub fn normalized_ranks(ranking: &Ranking, vocabulary: &Vocabulary) -> HashMap<String, usize> {
    let mut ranks = HashMap::with_capacity(ranking.total_words());

    let words = std::iter::once(ranking.hidden_word())
        .chain(ranking.entries().iter().map(|e| e.word.as_str()));

    for (idx, word) in words.enumerate() {
        // Ascending rank order: first insert wins
        ranks.entry(normalize(word, vocabulary)).or_insert(idx + 1);
    }
    ranks
}
