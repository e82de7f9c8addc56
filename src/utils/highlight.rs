// file: src/utils/highlight.rs
// description: job description keyword extraction and whole-word highlighting
// reference: https://docs.rs/regex

use regex::{Captures, RegexBuilder};
use std::collections::BTreeSet;

/// Distinct lowercase words of the job description, stripped of surrounding
/// punctuation.
pub fn job_keywords(job_description: &str) -> Vec<String> {
    let words: BTreeSet<String> = job_description
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();

    words.into_iter().collect()
}

/// Wrap every case-insensitive whole-word occurrence of `keywords` in `text`
/// with `mark`. Returns the text unchanged when there are no keywords.
pub fn highlight_with<F>(text: &str, keywords: &[String], mark: F) -> String
where
    F: Fn(&str) -> String,
{
    if keywords.is_empty() {
        return text.to_string();
    }

    // longest first so "rust-lang" wins over "rust" in the alternation
    let mut sorted: Vec<&String> = keywords.iter().collect();
    sorted.sort_by_key(|k| std::cmp::Reverse(k.len()));

    let alternation = sorted
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");

    match RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern
            .replace_all(text, |caps: &Captures| mark(&caps[0]))
            .into_owned(),
        Err(_) => text.to_string(),
    }
}
