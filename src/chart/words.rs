use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// Common English words left out of the title cloud.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "but", "by", "can", "did", "do", "down", "each", "few", "for", "from", "had", "has",
    "have", "he", "her", "here", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just",
    "me", "more", "most", "my", "no", "nor", "not", "of", "off", "on", "once", "only", "or",
    "other", "our", "out", "over", "own", "s", "same", "she", "so", "some", "such", "t", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "those", "to", "too",
    "under", "up", "very", "was", "we", "were", "what", "when", "where", "who", "why", "will",
    "with", "you", "your",
];

fn word_regex() -> &'static Regex {
    static WORD_RE: OnceLock<Regex> = OnceLock::new();
    WORD_RE.get_or_init(|| Regex::new(r"\w[\w']*").expect("word pattern is valid"))
}

fn is_stopword(lower: &str) -> bool {
    STOPWORDS.contains(&lower)
}

/// A counted word, spelled the way it appears most often.
#[derive(Debug, Clone, PartialEq)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Default)]
struct Tally {
    total: usize,
    first_seen: usize,
    /// spelling → (occurrences, first position)
    spellings: HashMap<String, (usize, usize)>,
}

impl Tally {
    fn add(&mut self, spelling: &str, position: usize) {
        if self.total == 0 {
            self.first_seen = position;
        }
        self.total += 1;
        self.spellings
            .entry(spelling.to_string())
            .or_insert((0, position))
            .0 += 1;
    }

    fn merge(&mut self, other: Tally) {
        self.total += other.total;
        self.first_seen = self.first_seen.min(other.first_seen);
        for (spelling, (n, pos)) in other.spellings {
            let entry = self.spellings.entry(spelling).or_insert((0, pos));
            entry.0 += n;
            entry.1 = entry.1.min(pos);
        }
    }

    /// Most frequent spelling, earliest one on ties.
    fn spelling(&self) -> String {
        self.spellings
            .iter()
            .min_by(|(_, (na, pa)), (_, (nb, pb))| nb.cmp(na).then(pa.cmp(pb)))
            .map(|(s, _)| s.clone())
            .unwrap_or_default()
    }
}

/// Count the words of `text` for a word cloud.
///
/// Words are runs of word characters (inner apostrophes allowed). A trailing
/// `'s` is dropped, stopwords and bare numbers are skipped, spellings that
/// differ only in case are merged and `words` folds into `word` when both
/// occur. Result is ordered by count, then by first appearance.
pub fn count_words(text: &str) -> Vec<WordCount> {
    let mut tallies: HashMap<String, Tally> = HashMap::new();

    for (position, m) in word_regex().find_iter(text).enumerate() {
        let mut word = m.as_str();
        if word.to_lowercase().ends_with("'s") {
            word = &word[..word.len() - 2];
        }
        if word.is_empty() || word.chars().all(|c| c.is_numeric()) {
            continue;
        }
        let key = word.to_lowercase();
        if is_stopword(&key) {
            continue;
        }
        tallies.entry(key).or_default().add(word, position);
    }

    // Fold plurals into their singular form.
    let plurals: Vec<String> = tallies
        .keys()
        .filter(|k| k.len() > 1 && k.ends_with('s') && !k.ends_with("ss"))
        .filter(|k| tallies.contains_key(&k[..k.len() - 1]))
        .cloned()
        .collect();
    for plural in plurals {
        if let Some(tally) = tallies.remove(&plural) {
            if let Some(singular) = tallies.get_mut(&plural[..plural.len() - 1]) {
                singular.merge(tally);
            }
        }
    }

    let mut counted: Vec<(usize, WordCount)> = tallies
        .into_values()
        .map(|t| {
            (
                t.first_seen,
                WordCount {
                    word: t.spelling(),
                    count: t.total,
                },
            )
        })
        .collect();
    counted.sort_by(|(pa, a), (pb, b)| b.count.cmp(&a.count).then(pa.cmp(pb)));
    counted.into_iter().map(|(_, wc)| wc).collect()
}
