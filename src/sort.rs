use std::cmp::Ordering;
use std::fmt;

use crate::row::{Column, Row, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn flip(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            SortOrder::Ascending => '▲',
            SortOrder::Descending => '▼',
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("ascending"),
            SortOrder::Descending => f.write_str("descending"),
        }
    }
}

#[derive(Debug, PartialEq)]
enum SortKey<'a> {
    Number(f64),
    Text(&'a str),
    Missing,
}

fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    // f64::from_str accepts "inf" and "NaN"; those stay text.
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn sort_key(value: Option<&Value>) -> SortKey<'_> {
    match value {
        Some(Value::Number(n)) => n.as_f64().map_or(SortKey::Missing, SortKey::Number),
        Some(Value::Text(s)) => {
            parse_number(s).map_or(SortKey::Text(s.as_str()), SortKey::Number)
        }
        Some(Value::Malformed(_)) | None => SortKey::Missing,
    }
}

/// Dictionary order: case-insensitive first, then lowercase before uppercase.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Type aware comparison of two field values.
///
/// Numbers (including numeric strings) compare numerically and come before text,
/// text compares in dictionary order. Missing values sort last whatever the order.
pub fn compare(a: Option<&Value>, b: Option<&Value>, order: SortOrder) -> Ordering {
    let (a, b) = (sort_key(a), sort_key(b));
    let natural = match (&a, &b) {
        (SortKey::Missing, SortKey::Missing) => return Ordering::Equal,
        (SortKey::Missing, _) => return Ordering::Greater,
        (_, SortKey::Missing) => return Ordering::Less,
        (SortKey::Number(x), SortKey::Number(y)) => x.total_cmp(y),
        (SortKey::Text(x), SortKey::Text(y)) => compare_text(x, y),
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
    };
    match order {
        SortOrder::Ascending => natural,
        SortOrder::Descending => natural.reverse(),
    }
}

/// Reorders `view` (indices into `source`) by `column`. Stable.
pub fn sort(source: &[Row], view: &[usize], column: Column, order: SortOrder) -> Vec<usize> {
    let mut rows = view.to_vec();
    rows.sort_by(|&a, &b| compare(source[a].get(column), source[b].get(column), order));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text(s: &str) -> Option<Value> {
        Some(Value::Text(s.to_string()))
    }

    fn cmp(a: Option<Value>, b: Option<Value>, order: SortOrder) -> Ordering {
        compare(a.as_ref(), b.as_ref(), order)
    }

    fn film(title: &str, year: Option<Value>, box_office: Option<Value>) -> Row {
        Row {
            title: text(title),
            release_year: year,
            box_office,
            ..Row::default()
        }
    }

    fn source() -> Vec<Row> {
        vec![
            film("Dune", Some(Value::Number(2021.into())), text("$407.6 million")),
            film("Duel", text("1971"), text("450000")),
            film("Avatar", text(" 2009 "), Some(Value::Number(2923.into()))),
            film("alien", text("Unknown"), None),
            film("Jaws", None, text("476.5")),
        ]
    }

    fn titles(source: &[Row], view: &[usize]) -> Vec<String> {
        view.iter().map(|&i| source[i].cells()[0].clone()).collect()
    }

    #[test]
    fn numeric_strings_compare_as_numbers() {
        assert_eq!(
            cmp(text("9"), text("10"), SortOrder::Ascending),
            Ordering::Less
        );
        assert_eq!(
            cmp(text("2021"), Some(Value::Number(1971.into())), SortOrder::Ascending),
            Ordering::Greater
        );
    }

    #[test]
    fn text_compares_in_dictionary_order() {
        assert_eq!(
            cmp(text("Zorro"), text("alien"), SortOrder::Ascending),
            Ordering::Greater
        );
        assert_eq!(
            cmp(text("inf"), text("NaN"), SortOrder::Ascending),
            Ordering::Less
        );
        // Case only breaks ties, lowercase first.
        assert_eq!(
            cmp(text("jaws"), text("Jaws"), SortOrder::Ascending),
            Ordering::Less
        );
        assert_eq!(
            cmp(text("Jaws"), text("Jaws"), SortOrder::Ascending),
            Ordering::Equal
        );
    }

    #[test]
    fn mixed_case_titles_interleave() {
        let source: Vec<Row> = ["Zorro", "alien", "Avatar", "jaws"]
            .iter()
            .map(|t| film(t, None, None))
            .collect();
        let view: Vec<usize> = (0..source.len()).collect();

        let ascending = sort(&source, &view, Column::Title, SortOrder::Ascending);
        assert_eq!(
            titles(&source, &ascending),
            vec!["alien", "Avatar", "jaws", "Zorro"]
        );
        let descending = sort(&source, &view, Column::Title, SortOrder::Descending);
        assert_eq!(
            titles(&source, &descending),
            vec!["Zorro", "jaws", "Avatar", "alien"]
        );
    }

    #[test]
    fn missing_values_sort_last_in_both_orders() {
        for order in [SortOrder::Ascending, SortOrder::Descending] {
            assert_eq!(cmp(None, text("a"), order), Ordering::Greater);
            assert_eq!(cmp(text("a"), None, order), Ordering::Less);
            assert_eq!(
                cmp(
                    Some(Value::Malformed(serde_json::Value::Null)),
                    text("1"),
                    order
                ),
                Ordering::Greater
            );
        }
    }

    #[test]
    fn sorts_release_year_numerically() {
        let source = source();
        let view: Vec<usize> = (0..source.len()).collect();

        let ascending = sort(&source, &view, Column::ReleaseYear, SortOrder::Ascending);
        assert_eq!(
            titles(&source, &ascending),
            vec!["Duel", "Avatar", "Dune", "alien", "Jaws"]
        );

        let descending = sort(&source, &view, Column::ReleaseYear, SortOrder::Descending);
        assert_eq!(
            titles(&source, &descending),
            vec!["alien", "Dune", "Avatar", "Duel", "Jaws"]
        );
    }

    #[test]
    fn sorts_title_lexically() {
        let source = source();
        let view: Vec<usize> = (0..source.len()).collect();
        let sorted = sort(&source, &view, Column::Title, SortOrder::Ascending);
        assert_eq!(
            titles(&source, &sorted),
            vec!["alien", "Avatar", "Duel", "Dune", "Jaws"]
        );
    }

    #[test]
    fn sort_only_reorders_the_given_view() {
        let source = source();
        let sorted = sort(&source, &[4, 1], Column::Title, SortOrder::Ascending);
        assert_eq!(sorted, vec![1, 4]);
        assert!(sort(&source, &[], Column::Title, SortOrder::Ascending).is_empty());
    }

    proptest! {
        #[test]
        fn numeric_column_is_ordered_by_value(
            years in prop::collection::vec(1900i64..2030, 0..30),
            descending in any::<bool>(),
        ) {
            let source: Vec<Row> = years
                .iter()
                .map(|y| film("x", Some(Value::Text(y.to_string())), None))
                .collect();
            let view: Vec<usize> = (0..source.len()).collect();
            let order = if descending { SortOrder::Descending } else { SortOrder::Ascending };
            let sorted = sort(&source, &view, Column::ReleaseYear, order);

            let values: Vec<i64> = sorted.iter().map(|&i| years[i]).collect();
            for w in values.windows(2) {
                if descending {
                    prop_assert!(w[0] >= w[1]);
                } else {
                    prop_assert!(w[0] <= w[1]);
                }
            }
            let mut permutation = sorted.clone();
            permutation.sort_unstable();
            prop_assert_eq!(permutation, view);
        }
    }
}
