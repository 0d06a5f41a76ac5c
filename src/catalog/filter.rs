use super::model::Publication;

/// Fuzzy/subsequence match: return the character positions in `title`
/// that match `query`, or `None` if not matched.
pub fn fuzzy_match_positions(title: &str, query: &str) -> Option<Vec<usize>> {
    if query.is_empty() {
        return Some(Vec::new());
    }

    let mut positions: Vec<usize> = Vec::new();
    let mut title_iter = title.chars().enumerate();

    for qc in query.chars().flat_map(char::to_lowercase) {
        loop {
            match title_iter.next() {
                Some((ti, tc)) if tc.to_lowercase().eq(std::iter::once(qc)) => {
                    positions.push(ti);
                    break;
                }
                Some(_) => continue,
                None => return None,
            }
        }
    }

    Some(positions)
}

/// Search text plus an optional category restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub query: String,
    pub category_id: Option<String>,
}

impl CatalogFilter {
    pub fn matches(&self, publication: &Publication) -> bool {
        if let Some(category) = self.category_id.as_deref() {
            if publication.category_id != category {
                return false;
            }
        }
        let query = self.query.trim();
        query.is_empty() || fuzzy_match_positions(&publication.title, query).is_some()
    }

    /// Indices of `publications` that pass the filter, in catalog order.
    pub fn visible_indices(&self, publications: &[Publication]) -> Vec<usize> {
        publications
            .iter()
            .enumerate()
            .filter(|(_, p)| self.matches(p))
            .map(|(i, _)| i)
            .collect()
    }
}
