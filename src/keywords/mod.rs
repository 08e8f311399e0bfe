//! Keyword extraction over the cleaned document text.
//!
//! Ranking runs on the whole document, independent of chunking, so keywords
//! stay stable however the text was windowed. The default adapter is a local
//! RAKE ranker: candidate phrases are maximal stopword-free word runs, scored
//! by word co-occurrence. Keywords are garnish on the response; a ranking
//! failure must never sink the document.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Maximum number of keywords returned to callers.
const MAX_KEYWORDS: usize = 10;

/// Errors raised by phrase ranking backends.
#[derive(Debug, Error)]
pub enum KeywordError {
    /// Backend was unable to rank phrases for the supplied text.
    #[error("Failed to rank phrases: {0}")]
    RankingFailed(String),
}

/// Interface implemented by phrase ranking backends.
#[async_trait]
pub trait PhraseRanker: Send + Sync {
    /// Rank candidate phrases for the supplied text, most relevant first.
    async fn rank_phrases(&self, text: &str) -> Result<Vec<String>, KeywordError>;
}

/// Invoke the ranker on the full cleaned text and trim the result to the
/// keyword cap. Empty input returns no keywords without invoking the ranker;
/// a ranker failure degrades to no keywords with a warning.
pub async fn top_keywords(ranker: &dyn PhraseRanker, text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    match ranker.rank_phrases(text).await {
        Ok(phrases) => phrases
            .into_iter()
            .map(|phrase| phrase.trim().to_string())
            .filter(|phrase| !phrase.is_empty())
            .take(MAX_KEYWORDS)
            .collect(),
        Err(error) => {
            tracing::warn!(error = %error, "Keyword ranking failed; returning no keywords");
            Vec::new()
        }
    }
}

/// Build the phrase ranker used by the pipeline.
pub fn get_phrase_ranker() -> Box<dyn PhraseRanker + Send + Sync> {
    Box::new(RakeRanker::new())
}

static PHRASE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.,?!]").expect("phrase boundary pattern"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "arent", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "cannot", "cant", "could", "couldnt", "did",
        "didnt", "do", "does", "doesnt", "doing", "dont", "down", "during", "each", "few", "for",
        "from", "further", "had", "hadnt", "has", "hasnt", "have", "havent", "having", "he",
        "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if", "in",
        "into", "is", "isnt", "it", "its", "itself", "just", "lets", "me", "more", "most",
        "mustnt", "my", "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or",
        "other", "ought", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
        "should", "shouldnt", "so", "some", "such", "than", "that", "thats", "the", "their",
        "theirs", "them", "themselves", "then", "there", "theres", "these", "they", "theyre",
        "theyve", "this", "those", "through", "to", "too", "under", "until", "up", "very",
        "was", "wasnt", "we", "were", "werent", "weve", "what", "whats", "when", "where",
        "which", "while", "who", "whom", "why", "will", "with", "wont", "would", "wouldnt",
        "you", "your", "yours", "yourself", "yourselves", "youre", "youve",
    ]
    .into_iter()
    .collect()
});

/// Deterministic RAKE-style phrase ranker, entirely local.
pub struct RakeRanker;

impl RakeRanker {
    /// Construct a new ranker instance.
    pub const fn new() -> Self {
        Self
    }

    fn candidate_phrases(text: &str) -> Vec<Vec<String>> {
        let mut phrases = Vec::new();
        for segment in PHRASE_BOUNDARY.split(text) {
            let mut current: Vec<String> = Vec::new();
            for word in segment.split_whitespace() {
                let normalized = word.to_lowercase();
                // Stopwords and number-only tokens end the current run.
                let is_boundary = STOP_WORDS.contains(normalized.as_str())
                    || !normalized.chars().any(char::is_alphabetic);
                if is_boundary {
                    if !current.is_empty() {
                        phrases.push(std::mem::take(&mut current));
                    }
                } else {
                    current.push(normalized);
                }
            }
            if !current.is_empty() {
                phrases.push(current);
            }
        }
        phrases
    }

    fn score_words(phrases: &[Vec<String>]) -> HashMap<String, f64> {
        let mut frequency: HashMap<&str, f64> = HashMap::new();
        let mut degree: HashMap<&str, f64> = HashMap::new();

        for phrase in phrases {
            let co_occurrences = (phrase.len() - 1) as f64;
            for word in phrase {
                *frequency.entry(word.as_str()).or_default() += 1.0;
                *degree.entry(word.as_str()).or_default() += co_occurrences;
            }
        }

        frequency
            .iter()
            .map(|(word, freq)| {
                // Degree counts the word itself plus every co-occurring word.
                let total_degree = degree[word] + freq;
                ((*word).to_string(), total_degree / freq)
            })
            .collect()
    }
}

impl Default for RakeRanker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PhraseRanker for RakeRanker {
    async fn rank_phrases(&self, text: &str) -> Result<Vec<String>, KeywordError> {
        let phrases = Self::candidate_phrases(text);
        if phrases.is_empty() {
            return Ok(Vec::new());
        }

        let word_scores = Self::score_words(&phrases);

        let mut seen = HashSet::new();
        let mut ranked: Vec<(String, f64)> = Vec::new();
        for phrase in &phrases {
            let joined = phrase.join(" ");
            if !seen.insert(joined.clone()) {
                continue;
            }
            let score = phrase.iter().map(|word| word_scores[word.as_str()]).sum();
            ranked.push((joined, score));
        }

        // Stable sort keeps first-seen order among equal scores.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        tracing::debug!(candidates = ranked.len(), "Ranked candidate phrases");
        Ok(ranked.into_iter().map(|(phrase, _)| phrase).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingRanker;

    #[async_trait]
    impl PhraseRanker for FailingRanker {
        async fn rank_phrases(&self, _text: &str) -> Result<Vec<String>, KeywordError> {
            Err(KeywordError::RankingFailed("backend offline".into()))
        }
    }

    #[tokio::test]
    async fn multi_word_phrase_outranks_its_parts() {
        let ranker = RakeRanker::new();
        let text = "deep learning is the future. learning about search. \
                    the future is deep learning.";
        let phrases = ranker.rank_phrases(text).await.expect("ranking");

        assert_eq!(phrases.first().map(String::as_str), Some("deep learning"));
        let solo = phrases
            .iter()
            .position(|phrase| phrase == "learning")
            .expect("constituent word is its own candidate");
        assert!(solo > 0);
    }

    #[tokio::test]
    async fn stopwords_never_become_keywords() {
        let ranker = RakeRanker::new();
        let phrases = ranker
            .rank_phrases("the cat sat on the mat")
            .await
            .expect("ranking");

        assert!(phrases.iter().all(|phrase| phrase != "the" && phrase != "on"));
        assert!(phrases.contains(&"cat sat".to_string()));
        assert!(phrases.contains(&"mat".to_string()));
    }

    #[tokio::test]
    async fn repeated_phrases_are_deduplicated() {
        let ranker = RakeRanker::new();
        let phrases = ranker
            .rank_phrases("machine learning. machine learning. machine learning.")
            .await
            .expect("ranking");

        assert_eq!(phrases, vec!["machine learning".to_string()]);
    }

    #[tokio::test]
    async fn top_keywords_caps_the_list_at_ten() {
        let ranker = RakeRanker::new();
        let text = "alpha. bravo. charlie. delta. echo. foxtrot. golf. hotel. india. juliet. \
                    kilo. lima. mike.";
        let keywords = top_keywords(&ranker, text).await;

        assert_eq!(keywords.len(), 10);
    }

    #[tokio::test]
    async fn empty_text_returns_no_keywords() {
        let ranker = RakeRanker::new();
        assert!(top_keywords(&ranker, "   ").await.is_empty());
    }

    #[tokio::test]
    async fn ranker_failure_degrades_to_empty_list() {
        let keywords = top_keywords(&FailingRanker, "perfectly fine text").await;
        assert!(keywords.is_empty());
    }

    #[tokio::test]
    async fn numeric_tokens_break_phrases() {
        let ranker = RakeRanker::new();
        let phrases = ranker
            .rank_phrases("release 2024 roadmap")
            .await
            .expect("ranking");

        assert!(phrases.contains(&"release".to_string()));
        assert!(phrases.contains(&"roadmap".to_string()));
        assert!(!phrases.iter().any(|phrase| phrase.contains("2024")));
    }
}
