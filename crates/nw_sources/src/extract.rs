//! Best-effort main-text extraction from article pages.
//!
//! Paragraphs are grouped by their parent element. A paragraph only counts if
//! it carries enough stop words of the expected language, which filters out
//! captions, bylines and link lists. The parent with the most qualifying text
//! wins and its paragraphs become the article body.

use nw_core::{Error, Language, Result};
use scraper::{ElementRef, Html, Selector};

/// Minimum stop words for a paragraph to count as prose.
const MIN_STOP_WORDS: usize = 2;

/// Elements whose paragraphs are never part of the body.
const BOILERPLATE_TAGS: [&str; 8] = [
    "nav", "header", "footer", "aside", "script", "style", "form", "noscript",
];

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "are", "as", "at", "be", "been",
    "but", "by", "can", "could", "for", "from", "had", "has", "have", "he", "her", "his",
    "if", "in", "into", "is", "it", "its", "more", "not", "of", "on", "one", "or", "our",
    "said", "she", "so", "than", "that", "the", "their", "them", "there", "they", "this",
    "to", "up", "was", "we", "were", "what", "when", "which", "while", "who", "will",
    "with", "would", "you",
];

const SPANISH_STOP_WORDS: &[&str] = &[
    "a", "al", "algo", "como", "con", "cuando", "de", "del", "desde", "donde", "el", "ella",
    "en", "entre", "era", "es", "esta", "este", "esto", "fue", "ha", "hay", "la", "las",
    "le", "les", "lo", "los", "más", "mas", "muy", "no", "o", "para", "pero", "por",
    "porque", "que", "qué", "se", "ser", "si", "sin", "sobre", "son", "su", "sus", "también",
    "tiene", "un", "una", "uno", "y", "ya",
];

fn stop_words(language: Language) -> &'static [&'static str] {
    match language {
        Language::English => ENGLISH_STOP_WORDS,
        Language::Spanish => SPANISH_STOP_WORDS,
    }
}

pub fn stop_word_count(text: &str, language: Language) -> usize {
    let words = stop_words(language);
    text.split(|c: char| !c.is_alphabetic())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .filter(|token| words.contains(&token.as_str()))
        .count()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn in_boilerplate(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| BOILERPLATE_TAGS.contains(&ancestor.value().name()))
}

struct Candidate<K> {
    node: K,
    parent: Option<K>,
    score: usize,
    paragraphs: usize,
}

fn credit<K: Copy + PartialEq>(
    candidates: &mut Vec<Candidate<K>>,
    node: K,
    parent: Option<K>,
    score: usize,
) {
    match candidates.iter_mut().find(|candidate| candidate.node == node) {
        Some(candidate) => {
            candidate.score += score;
            candidate.paragraphs += 1;
        }
        None => candidates.push(Candidate {
            node,
            parent,
            score,
            paragraphs: 1,
        }),
    }
}

/// Picks the highest scoring node. A winner holding a single paragraph gives
/// way to its parent when the parent gathered more than one.
fn best_node<K: Copy + PartialEq>(candidates: &[Candidate<K>]) -> Option<K> {
    let mut best: Option<&Candidate<K>> = None;
    for candidate in candidates {
        if best.map_or(true, |current| candidate.score > current.score) {
            best = Some(candidate);
        }
    }
    let best = best?;

    if best.paragraphs == 1 {
        let wider = best.parent.and_then(|parent| {
            candidates
                .iter()
                .find(|candidate| candidate.node == parent && candidate.paragraphs > 1)
        });
        if let Some(wider) = wider {
            return Some(wider.node);
        }
    }
    Some(best.node)
}

/// Extracts the main body text of `html`. An empty string means the page had
/// no recognizable prose.
///
/// Every qualifying paragraph credits its parent with its length and its
/// grandparent with half of it, so bodies that wrap each paragraph in its own
/// element still add up under the common container. The body is every
/// qualifying paragraph under the winning node, in document order.
pub fn extract_main_text(html: &str, language: Language) -> Result<String> {
    if html.trim().is_empty() {
        return Err(Error::Extraction("empty document".to_string()));
    }

    let document = Html::parse_document(html);
    let paragraph_selector = Selector::parse("p")
        .map_err(|e| Error::Extraction(format!("Invalid selector: {}", e)))?;

    let mut qualifying = Vec::new();
    let mut candidates = Vec::new();
    for paragraph in document.select(&paragraph_selector) {
        if in_boilerplate(&paragraph) {
            continue;
        }
        let text = normalize_whitespace(&paragraph.text().collect::<String>());
        if stop_word_count(&text, language) < MIN_STOP_WORDS {
            continue;
        }
        let Some(parent) = paragraph.parent() else {
            continue;
        };

        let grandparent = parent.parent();
        credit(
            &mut candidates,
            parent.id(),
            grandparent.map(|node| node.id()),
            text.len(),
        );
        if let Some(grandparent) = grandparent {
            credit(
                &mut candidates,
                grandparent.id(),
                grandparent.parent().map(|node| node.id()),
                text.len() / 2,
            );
        }
        qualifying.push((paragraph, text));
    }

    let Some(winner) = best_node(&candidates) else {
        return Ok(String::new());
    };

    Ok(qualifying
        .into_iter()
        .filter(|(paragraph, _)| paragraph.ancestors().any(|node| node.id() == winner))
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join("\n\n"))
}
