// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use stockview_app::{AppCommand, AppEvent, AppState, Catalog, DisplayRow, RowSummary, evaluate};
use stockview_testkit::{catalog_of, grocery_catalog, sample_catalog, temp_catalog_file};

fn labels(rows: &[DisplayRow<'_>]) -> Vec<String> {
    rows.iter()
        .map(|row| match row {
            DisplayRow::CategoryHeader(category) => format!("[{category}]"),
            DisplayRow::ProductEntry(product) => product.name.clone(),
        })
        .collect()
}

#[test]
fn split_category_runs_keep_separate_headers() -> Result<()> {
    let catalog = grocery_catalog()?;
    let rows = evaluate(catalog.products(), "", false);
    let headers = rows
        .iter()
        .filter_map(|row| match row {
            DisplayRow::CategoryHeader(category) => Some(*category),
            DisplayRow::ProductEntry(_) => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(headers, vec!["Bakery", "Dairy", "Pantry", "Bakery", "Frozen"]);
    Ok(())
}

#[test]
fn header_reappears_when_filter_keeps_both_runs() -> Result<()> {
    let catalog = grocery_catalog()?;
    // Cheddar also contains "r" but is out of stock.
    let rows = evaluate(catalog.products(), "r", true);
    assert_eq!(
        labels(&rows),
        vec![
            "[Bakery]",
            "Sourdough",
            "[Dairy]",
            "Greek Yogurt",
            "[Pantry]",
            "Basmati Rice",
            "Peanut Butter",
            "[Bakery]",
            "Rye Loaf",
        ]
    );
    Ok(())
}

#[test]
fn every_header_is_followed_by_a_product_of_its_category() -> Result<()> {
    let catalog = grocery_catalog()?;
    for text in ["", "a", "E", "pea", "zzz"] {
        for stock in [false, true] {
            let rows = evaluate(catalog.products(), text, stock);
            for (index, row) in rows.iter().enumerate() {
                if let DisplayRow::CategoryHeader(category) = row {
                    let next = rows.get(index + 1).and_then(|row| row.product());
                    assert_eq!(
                        next.map(|product| product.category.as_str()),
                        Some(*category),
                        "filter {text:?} stock={stock}"
                    );
                }
            }
        }
    }
    Ok(())
}

#[test]
fn session_dispatch_drives_reevaluation() {
    let catalog = sample_catalog();
    let mut state = AppState::default();
    let mut rows = evaluate(catalog.products(), "", false);
    assert_eq!(RowSummary::of(&rows).products, 6);

    for command in [
        AppCommand::PushFilterChar('P'),
        AppCommand::ToggleInStockOnly,
    ] {
        let events = state.dispatch(command);
        if events
            .iter()
            .any(|event| matches!(event, AppEvent::ViewChanged(_)))
        {
            rows = evaluate(
                catalog.products(),
                state.view.filter_text(),
                state.view.in_stock_only(),
            );
        }
    }

    assert_eq!(
        labels(&rows),
        vec!["[Fruits]", "Apple", "[Vegetables]", "Spinach", "Peas"]
    );
}

#[test]
fn loaded_catalog_filters_like_builtin() -> Result<()> {
    let source = catalog_of(&[
        ("Tools", "Hammer", "$12", true),
        ("Tools", "Wrench", "$9", false),
        ("Garden", "Hose", "$20", true),
    ])?;
    let (_temp, path) = temp_catalog_file(source.products())?;
    let catalog = Catalog::load(&path)?;

    // "Wrench" matches "H" case-insensitively.
    let rows = evaluate(catalog.products(), "H", false);
    assert_eq!(
        labels(&rows),
        vec!["[Tools]", "Hammer", "Wrench", "[Garden]", "Hose"]
    );
    assert_eq!(
        RowSummary::of(&rows).out_of_stock,
        1,
        "the unstocked wrench stays visible without the stock filter"
    );

    let rows = evaluate(catalog.products(), "H", true);
    assert_eq!(labels(&rows), vec!["[Tools]", "Hammer", "[Garden]", "Hose"]);
    Ok(())
}

#[test]
fn loading_a_missing_catalog_names_the_path() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("nope.json");
    let error = Catalog::load(&path).expect_err("missing file should fail");
    assert!(error.to_string().contains("nope.json"));
    Ok(())
}
