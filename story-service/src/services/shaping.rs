//! Response shaping helpers applied to stories read from the store.

use crate::models::Summary;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Distinct non-empty cover images in order of first appearance.
pub fn cover_images<'a, I>(images: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut seen = HashSet::new();
    images
        .into_iter()
        .flatten()
        .filter(|image| !image.is_empty() && seen.insert(*image))
        .map(str::to_string)
        .collect()
}

/// Split prose into sentences on Unicode sentence boundaries (UAX #29).
pub fn split_sentences(text: &str) -> Vec<String> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(str::to_string)
        .collect()
}

/// The summary as the sentence list served to clients.
pub fn summary_sentences(summary: Option<Summary>) -> Vec<String> {
    match summary {
        None => Vec::new(),
        Some(Summary::Text(text)) => split_sentences(&text),
        Some(Summary::Sentences(sentences)) => sentences
            .into_iter()
            .map(|sentence| sentence.trim().to_string())
            .filter(|sentence| !sentence.is_empty())
            .collect(),
    }
}
