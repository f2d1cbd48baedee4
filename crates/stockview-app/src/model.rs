// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub category: String,
    pub name: String,
    pub price: String,
    pub stocked: bool,
}

impl Product {
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        price: impl Into<String>,
        stocked: bool,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            price: price.into(),
            stocked,
        }
    }
}

/// One line of the grouped listing.
///
/// Rows borrow from the catalog they were evaluated against, so a fresh
/// sequence is cheap to build after every view change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRow<'a> {
    CategoryHeader(&'a str),
    ProductEntry(&'a Product),
}

impl<'a> DisplayRow<'a> {
    pub const fn product(self) -> Option<&'a Product> {
        match self {
            Self::CategoryHeader(_) => None,
            Self::ProductEntry(product) => Some(product),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    BlankName { index: usize },
    BlankCategory { index: usize, name: String },
    DuplicateName { index: usize, name: String },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName { index } => write!(f, "product #{index} has a blank name"),
            Self::BlankCategory { index, name } => {
                write!(f, "product #{index} ({name:?}) has a blank category")
            }
            Self::DuplicateName { index, name } => write!(
                f,
                "product #{index} reuses the name {name:?}; product names must be unique"
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

const BUILTIN_PRODUCTS: [(&str, &str, &str, bool); 6] = [
    ("Fruits", "Apple", "$1", true),
    ("Fruits", "Dragonfruit", "$1", true),
    ("Fruits", "Passionfruit", "$2", false),
    ("Vegetables", "Spinach", "$2", true),
    ("Vegetables", "Pumpkin", "$4", false),
    ("Vegetables", "Peas", "$1", true),
];

/// Ordered, immutable product list for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> std::result::Result<Self, CatalogError> {
        validate_products(&products)?;
        Ok(Self { products })
    }

    pub fn builtin() -> Self {
        Self {
            products: BUILTIN_PRODUCTS
                .iter()
                .map(|(category, name, price, stocked)| {
                    Product::new(*category, *name, *price, *stocked)
                })
                .collect(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let products: Vec<Product> =
            serde_json::from_str(raw).context("decode catalog JSON array")?;
        Ok(Self::new(products)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read catalog file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("load catalog {}", path.display()))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|product| product.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }
}

fn validate_products(products: &[Product]) -> std::result::Result<(), CatalogError> {
    let mut names = HashSet::with_capacity(products.len());
    for (index, product) in products.iter().enumerate() {
        if product.name.trim().is_empty() {
            return Err(CatalogError::BlankName { index });
        }
        if product.category.trim().is_empty() {
            return Err(CatalogError::BlankCategory {
                index,
                name: product.name.clone(),
            });
        }
        if !names.insert(product.name.as_str()) {
            return Err(CatalogError::DuplicateName {
                index,
                name: product.name.clone(),
            });
        }
    }
    Ok(())
}
