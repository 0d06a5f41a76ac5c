//! Free-text query to category suggestion.
//!
//! Callers treat every failure as "no category filter"; a classifier is never
//! allowed to block browsing.

use thiserror::Error;

use crate::catalog::Category;

/// The pseudo-category some catalogs use for "everything".
const ALL_CATEGORY: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category_id: Option<String>,
    pub explanation: String,
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("empty query")]
    EmptyQuery,
    #[error("no categories to choose from")]
    NoCategories,
}

pub trait CategoryClassifier {
    fn classify(&self, query: &str, categories: &[Category])
    -> Result<Classification, ClassifyError>;
}

/// Offline classifier: scores categories by query words found in their
/// name or id.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl CategoryClassifier for KeywordClassifier {
    fn classify(
        &self,
        query: &str,
        categories: &[Category],
    ) -> Result<Classification, ClassifyError> {
        let query_words = words(query);
        if query_words.is_empty() {
            return Err(ClassifyError::EmptyQuery);
        }

        let usable: Vec<&Category> = categories
            .iter()
            .filter(|c| c.id != ALL_CATEGORY)
            .collect();
        if usable.is_empty() {
            return Err(ClassifyError::NoCategories);
        }

        let mut best: Option<(&Category, usize)> = None;
        for category in usable {
            let mut vocabulary = words(&category.name);
            vocabulary.extend(words(&category.id));
            let score = query_words
                .iter()
                .filter(|w| {
                    vocabulary
                        .iter()
                        .any(|v| v.starts_with(w.as_str()) || w.starts_with(v.as_str()))
                })
                .count();
            // Strictly greater: ties keep the earlier category.
            if score > 0 && best.is_none_or(|(_, s)| score > s) {
                best = Some((category, score));
            }
        }

        Ok(match best {
            Some((category, _)) => Classification {
                category_id: Some(category.id.clone()),
                explanation: format!("Showing {} for \"{}\"", category.name, query.trim()),
            },
            None => Classification {
                category_id: None,
                explanation: format!("No category matched; showing all results for \"{}\"", query.trim()),
            },
        })
    }
}
