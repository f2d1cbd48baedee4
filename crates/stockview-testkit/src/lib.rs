// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use stockview_app::{Catalog, Product};

/// `(category, name, price, stocked)`
pub type ProductSpec<'a> = (&'a str, &'a str, &'a str, bool);

const GROCERY_PRODUCTS: [ProductSpec<'static>; 10] = [
    ("Bakery", "Sourdough", "$6", true),
    ("Bakery", "Baguette", "$3", false),
    ("Dairy", "Whole Milk", "$4", true),
    ("Dairy", "Greek Yogurt", "$5", true),
    ("Dairy", "Cheddar", "$7", false),
    ("Pantry", "Basmati Rice", "$9", true),
    ("Pantry", "Peanut Butter", "$5", true),
    ("Bakery", "Rye Loaf", "$5", true),
    ("Frozen", "Peas", "$2", false),
    ("Frozen", "Waffles", "$4", true),
];

pub fn sample_catalog() -> Catalog {
    Catalog::builtin()
}

/// A larger catalog where `Bakery` appears in two separate runs.
pub fn grocery_catalog() -> Result<Catalog> {
    catalog_of(&GROCERY_PRODUCTS)
}

pub fn products_of(specs: &[ProductSpec<'_>]) -> Vec<Product> {
    specs
        .iter()
        .map(|(category, name, price, stocked)| Product::new(*category, *name, *price, *stocked))
        .collect()
}

pub fn catalog_of(specs: &[ProductSpec<'_>]) -> Result<Catalog> {
    Ok(Catalog::new(products_of(specs))?)
}

pub fn catalog_json(products: &[Product]) -> Result<String> {
    serde_json::to_string_pretty(products).context("encode catalog fixture")
}

pub fn write_catalog_file(dir: &Path, products: &[Product]) -> Result<PathBuf> {
    let path = dir.join("catalog.json");
    std::fs::write(&path, catalog_json(products)?)
        .with_context(|| format!("write catalog fixture {}", path.display()))?;
    Ok(path)
}

/// Temp dir plus a catalog file inside it; keep the dir alive while the path is used.
pub fn temp_catalog_file(products: &[Product]) -> Result<(tempfile::TempDir, PathBuf)> {
    let temp = tempfile::tempdir().context("create temp dir for catalog fixture")?;
    let path = write_catalog_file(temp.path(), products)?;
    Ok((temp, path))
}
