//! Word-frequency helpers built on the pipeline API.

use crate::collectors::{counting, grouping_by};
use crate::error::Result;
use crate::pipeline::{Pipeline, from_map};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[[:punct:]\s]+").expect("valid separator regex"));

/// Lower-cased words of `line`, split on whitespace and punctuation. Empty tokens
/// are dropped.
pub fn split_words(line: &str) -> Vec<String> {
    SEPARATORS
        .split(line)
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Count occurrences of each word at least `min_len` characters long.
pub fn word_frequencies(lines: Pipeline<String>, min_len: usize) -> Result<HashMap<String, u64>> {
    lines
        .flat_map(|line: &String| split_words(line))
        .filter(move |w: &String| w.chars().count() >= min_len)
        .collect(grouping_by(|w: &String| w.clone(), counting()))
}

/// Words seen at least `min_count` times, most frequent first; ties by word.
pub fn most_frequent(counts: HashMap<String, u64>, min_count: u64) -> Result<Vec<(String, u64)>> {
    from_map(counts)
        .filter(move |(_, n): &(String, u64)| *n >= min_count)
        .sorted_by(|a: &(String, u64), b: &(String, u64)| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::from_vec;

    #[test]
    fn splits_on_punctuation() {
        assert_eq!(split_words("Hello, world!  It's"), vec!["hello", "world", "it", "s"]);
        assert!(split_words(" ;; ").is_empty());
    }

    #[test]
    fn most_frequent_orders_by_count_then_word() {
        let lines = from_vec(vec!["b a c b".to_string(), "a b d".to_string()]);
        let counts = word_frequencies(lines, 1).unwrap();
        let ranked = most_frequent(counts, 1).unwrap();
        assert_eq!(
            ranked,
            vec![
                ("b".to_string(), 3),
                ("a".to_string(), 2),
                ("c".to_string(), 1),
                ("d".to_string(), 1),
            ]
        );
    }
}
