use rayon::prelude::*;

use crate::row::{Row, Value};

/// Trimmed, lowercased form of a search query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

fn title_matches(title: Option<&Value>, needle: &str) -> bool {
    match title {
        Some(Value::Text(s)) => s.to_lowercase().contains(needle),
        Some(Value::Number(n)) => n.to_string().contains(needle),
        _ => false,
    }
}

/// Indices of the source rows whose title contains `query`, in source order.
pub fn filter(source: &[Row], query: &str) -> Vec<usize> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return (0..source.len()).collect();
    }
    // Indexed collect keeps the source order.
    source
        .par_iter()
        .enumerate()
        .filter(|(_, row)| title_matches(row.title.as_ref(), &needle))
        .map(|(idx, _)| idx)
        .collect()
}
