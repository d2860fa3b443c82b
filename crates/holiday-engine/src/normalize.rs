//! Label normalization used to decide when two events are "the same".
//!
//! Sameness is a text heuristic, so it sits behind the [`LabelNormalizer`] trait.
//! The default [`QualifierNormalizer`] strips trailing region qualifiers such as
//! `(GB)`, `(UK/US)` or `(AU-NSW, VIC)` and case-folds what remains; the
//! [`NormalizationConfig`] knobs make it stricter or looser.
//!
//! Repeated tokens inside a parenthesised group are always collapsed, so a
//! provider's `(observed, observed)` reads `(observed)`.

use serde::{Deserialize, Serialize};

pub trait LabelNormalizer {
    /// Human-readable label with region qualifiers removed.
    fn display_label(&self, label: &str) -> String;

    /// Merge key. Labels with equal keys on the same date are merged.
    fn canonical_key(&self, label: &str) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Remove trailing parenthesised region qualifiers.
    pub strip_qualifiers: bool,
    /// Words treated as qualifiers in addition to region-code-like tokens.
    pub extra_qualifiers: Vec<String>,
    /// Treat `Saint`, `St` and `St.` as the same word.
    pub fold_saints: bool,
    /// Replace all punctuation with spaces before comparing.
    pub strip_punctuation: bool,
    /// Words ignored when comparing, e.g. `day`.
    pub drop_words: Vec<String>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        NormalizationConfig {
            strip_qualifiers: true,
            extra_qualifiers: vec!["National".to_string()],
            fold_saints: false,
            strip_punctuation: false,
            drop_words: Vec::new(),
        }
    }
}

impl NormalizationConfig {
    /// Loose matching: folds saints, ignores punctuation and filler words, so
    /// `St. George's Day` and `Saint Georges` share a key.
    pub fn aggressive() -> Self {
        NormalizationConfig {
            fold_saints: true,
            strip_punctuation: true,
            drop_words: ["day", "the", "holiday", "hol"]
                .into_iter()
                .map(String::from)
                .collect(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QualifierNormalizer {
    config: NormalizationConfig,
}

impl QualifierNormalizer {
    pub fn new(config: NormalizationConfig) -> Self {
        QualifierNormalizer { config }
    }

    pub fn config(&self) -> &NormalizationConfig {
        &self.config
    }

    fn is_qualifier(&self, inner: &str) -> bool {
        let mut tokens = inner
            .split([',', '/', '&'])
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .peekable();
        if tokens.peek().is_none() {
            return false;
        }
        tokens.all(|token| {
            is_region_like(token)
                || self
                    .config
                    .extra_qualifiers
                    .iter()
                    .any(|extra| extra.eq_ignore_ascii_case(token))
        })
    }
}

impl From<NormalizationConfig> for QualifierNormalizer {
    fn from(config: NormalizationConfig) -> Self {
        QualifierNormalizer::new(config)
    }
}

impl LabelNormalizer for QualifierNormalizer {
    fn display_label(&self, label: &str) -> String {
        let original = collapse_repeated_tokens(&collapse_whitespace(label));
        if !self.config.strip_qualifiers {
            return original;
        }

        let mut text = original.as_str();
        while let Some(stripped) = text.strip_suffix(')') {
            let Some(open) = stripped.rfind('(') else {
                break;
            };
            if !self.is_qualifier(&stripped[open + 1..]) {
                break;
            }
            text = stripped[..open].trim_end();
        }

        if text.is_empty() {
            original
        } else {
            text.to_string()
        }
    }

    fn canonical_key(&self, label: &str) -> String {
        let display = self.display_label(label);
        let mut folded = display.to_lowercase().replace('&', " and ");
        folded.retain(|c| c != '\'' && c != '\u{2019}');
        if self.config.strip_punctuation {
            folded = folded
                .chars()
                .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
                .collect();
        }

        let words: Vec<&str> = folded
            .split_whitespace()
            .map(|word| {
                if self.config.fold_saints && matches!(word.trim_end_matches('.'), "saint" | "st") {
                    "st"
                } else {
                    word
                }
            })
            .filter(|word| {
                !self
                    .config
                    .drop_words
                    .iter()
                    .any(|drop| drop.eq_ignore_ascii_case(word))
            })
            .collect();

        if words.is_empty() {
            // Never collapse a label to an empty key; that would merge unrelated events.
            folded.split_whitespace().collect::<Vec<_>>().join(" ")
        } else {
            words.join(" ")
        }
    }
}

/// `GB`, `UK`, `NSW`, `AU-NSW`, `GB-SCT`.
fn is_region_like(token: &str) -> bool {
    let (head, tail) = match token.split_once('-') {
        Some((h, t)) => (h, Some(t)),
        None => (token, None),
    };
    let head_ok = (2..=3).contains(&head.len()) && head.bytes().all(|b| b.is_ascii_uppercase());
    let tail_ok = tail.is_none_or(|t| {
        (1..=3).contains(&t.len()) && t.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    });
    head_ok && tail_ok
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `X (observed, observed,)` → `X (observed)`. Tokens compare case-insensitively;
/// the first spelling wins.
fn collapse_repeated_tokens(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        let Some(len) = rest[open..].find(')') else {
            break;
        };
        let inner = &rest[open + 1..open + len];
        let mut kept: Vec<&str> = Vec::new();
        for token in inner.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if !kept.iter().any(|k| k.eq_ignore_ascii_case(token)) {
                kept.push(token);
            }
        }
        out.push_str(&rest[..=open]);
        out.push_str(&kept.join(", "));
        out.push(')');
        rest = &rest[open + len + 1..];
    }
    out.push_str(rest);
    out
}
