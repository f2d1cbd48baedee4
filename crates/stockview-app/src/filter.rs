// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{DisplayRow, Product};

/// Builds the grouped listing for one view of the catalog.
///
/// Products keep their catalog order. A category header is emitted whenever a
/// surviving product's category differs from the previous survivor's, so only
/// adjacent runs share a header.
pub fn evaluate<'a>(
    catalog: &'a [Product],
    filter_text: &str,
    in_stock_only: bool,
) -> Vec<DisplayRow<'a>> {
    let needle = filter_text.to_lowercase();
    let mut rows = Vec::new();
    let mut last_category: Option<&str> = None;

    for product in catalog {
        if !name_contains(product, &needle) || (in_stock_only && !product.stocked) {
            continue;
        }
        if last_category != Some(product.category.as_str()) {
            rows.push(DisplayRow::CategoryHeader(&product.category));
            last_category = Some(product.category.as_str());
        }
        rows.push(DisplayRow::ProductEntry(product));
    }

    rows
}

pub fn matches_filter(product: &Product, filter_text: &str, in_stock_only: bool) -> bool {
    name_contains(product, &filter_text.to_lowercase()) && (!in_stock_only || product.stocked)
}

// `needle` is already lowercased.
fn name_contains(product: &Product, needle: &str) -> bool {
    needle.is_empty() || product.name.to_lowercase().contains(needle)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowSummary {
    pub headers: usize,
    pub products: usize,
    pub out_of_stock: usize,
}

impl RowSummary {
    pub fn of(rows: &[DisplayRow<'_>]) -> Self {
        rows.iter().fold(Self::default(), |mut summary, row| {
            match row {
                DisplayRow::CategoryHeader(_) => summary.headers += 1,
                DisplayRow::ProductEntry(product) => {
                    summary.products += 1;
                    if !product.stocked {
                        summary.out_of_stock += 1;
                    }
                }
            }
            summary
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{RowSummary, evaluate, matches_filter};
    use crate::{Catalog, DisplayRow, Product};

    fn names(rows: &[DisplayRow<'_>]) -> Vec<String> {
        rows.iter()
            .map(|row| match row {
                DisplayRow::CategoryHeader(category) => format!("#{category}"),
                DisplayRow::ProductEntry(product) => product.name.clone(),
            })
            .collect()
    }

    #[test]
    fn empty_filter_returns_every_product_grouped() {
        let catalog = Catalog::builtin();
        let rows = evaluate(catalog.products(), "", false);
        assert_eq!(
            names(&rows),
            vec![
                "#Fruits",
                "Apple",
                "Dragonfruit",
                "Passionfruit",
                "#Vegetables",
                "Spinach",
                "Pumpkin",
                "Peas",
            ]
        );
    }

    #[test]
    fn header_precedes_first_product_of_each_adjacent_run() {
        let catalog = vec![
            Product::new("Fruits", "Apple", "$1", true),
            Product::new("Fruits", "Dragonfruit", "$1", true),
            Product::new("Vegetables", "Spinach", "$2", true),
        ];
        let rows = evaluate(&catalog, "", false);
        assert_eq!(
            rows,
            vec![
                DisplayRow::CategoryHeader("Fruits"),
                DisplayRow::ProductEntry(&catalog[0]),
                DisplayRow::ProductEntry(&catalog[1]),
                DisplayRow::CategoryHeader("Vegetables"),
                DisplayRow::ProductEntry(&catalog[2]),
            ]
        );
    }

    #[test]
    fn repeated_category_after_gap_gets_a_new_header() {
        let catalog = vec![
            Product::new("A", "x", "$1", true),
            Product::new("B", "y", "$1", true),
            Product::new("A", "z", "$1", true),
        ];
        let rows = evaluate(&catalog, "", false);
        assert_eq!(names(&rows), vec!["#A", "x", "#B", "y", "#A", "z"]);
    }

    #[test]
    fn filtering_out_the_middle_run_joins_the_outer_runs() {
        let catalog = vec![
            Product::new("A", "apple", "$1", true),
            Product::new("B", "bean", "$1", true),
            Product::new("A", "apricot", "$1", true),
        ];
        let rows = evaluate(&catalog, "ap", false);
        // "A" becomes adjacent once "bean" drops out, so one header covers both.
        assert_eq!(names(&rows), vec!["#A", "apple", "apricot"]);
    }

    #[test]
    fn text_match_ignores_case() {
        let catalog = Catalog::builtin();
        let upper = evaluate(catalog.products(), "APPLE", false);
        let lower = evaluate(catalog.products(), "apple", false);
        assert_eq!(upper, lower);
        assert_eq!(names(&lower), vec!["#Fruits", "Apple"]);
    }

    #[test]
    fn text_match_only_looks_at_names() {
        let catalog = Catalog::builtin();
        assert!(evaluate(catalog.products(), "fruits", false).is_empty());
        assert!(evaluate(catalog.products(), "$1", false).is_empty());
    }

    #[test]
    fn stock_filter_drops_unstocked_products() {
        let catalog = Catalog::builtin();
        let rows = evaluate(catalog.products(), "", true);
        assert!(
            rows.iter()
                .filter_map(|row| row.product())
                .all(|product| product.stocked)
        );
        assert_eq!(
            names(&rows),
            vec!["#Fruits", "Apple", "Dragonfruit", "#Vegetables", "Spinach", "Peas"]
        );
    }

    #[test]
    fn combined_filter_keeps_open_header() {
        let catalog = Catalog::builtin();
        let rows = evaluate(catalog.products(), "p", true);
        assert_eq!(
            names(&rows),
            vec!["#Fruits", "Apple", "#Vegetables", "Spinach", "Peas"]
        );
    }

    #[test]
    fn no_matches_yields_empty_rows() {
        let catalog = Catalog::builtin();
        assert!(evaluate(catalog.products(), "zzz", false).is_empty());
        assert!(evaluate(&[], "", false).is_empty());
    }

    #[test]
    fn evaluation_is_repeatable_and_leaves_catalog_alone() {
        let catalog = Catalog::builtin();
        let before = catalog.clone();
        let first = evaluate(catalog.products(), "a", true);
        let second = evaluate(catalog.products(), "a", true);
        assert_eq!(first, second);
        assert_eq!(catalog, before);
    }

    #[test]
    fn matches_filter_agrees_with_evaluate() {
        let catalog = Catalog::builtin();
        for (text, stock) in [("", false), ("P", true), ("fruit", false), ("zzz", true)] {
            let expected = catalog
                .products()
                .iter()
                .filter(|product| matches_filter(product, text, stock))
                .collect::<Vec<_>>();
            let actual = evaluate(catalog.products(), text, stock)
                .into_iter()
                .filter_map(|row| row.product())
                .collect::<Vec<_>>();
            assert_eq!(actual, expected, "filter {text:?} stock={stock}");
        }
    }

    #[test]
    fn summary_counts_rows() {
        let catalog = Catalog::builtin();
        let rows = evaluate(catalog.products(), "", false);
        assert_eq!(
            RowSummary::of(&rows),
            RowSummary {
                headers: 2,
                products: 6,
                out_of_stock: 2,
            }
        );
        assert_eq!(RowSummary::of(&[]), RowSummary::default());
    }
}
