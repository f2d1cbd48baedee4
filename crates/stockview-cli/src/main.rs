// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;

use anyhow::{Context, Result};
use config::{CatalogSource, Config};
use std::env;
use std::path::PathBuf;
use stockview_app::{AppState, Catalog, ViewState, evaluate};

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `stockview --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    logging::init(&config)?;

    let source = config.catalog_source(options.catalog_path.as_deref());
    let catalog = load_catalog(&source)?;
    tracing::info!(
        source = ?source,
        products = catalog.len(),
        categories = catalog.categories().len(),
        "catalog loaded"
    );
    if catalog.is_empty() {
        tracing::warn!(source = ?source, "catalog has no products; the listing will be empty");
    }
    if options.check_only {
        return Ok(());
    }

    let view = initial_view(&config, &options);
    if options.print_rows {
        let rows = evaluate(catalog.products(), view.filter_text(), view.in_stock_only());
        print!("{}", stockview_tui::render_rows_text(&rows));
        return Ok(());
    }

    let mut state = AppState::with_view(view);
    let result = stockview_tui::run_app(&mut state, &catalog);
    tracing::info!(ok = result.is_ok(), "session ended");
    result
}

fn load_catalog(source: &CatalogSource) -> Result<Catalog> {
    match source {
        CatalogSource::Builtin => Ok(Catalog::builtin()),
        CatalogSource::File(path) => Catalog::load(path).with_context(|| {
            format!(
                "catalog {} is unusable -- pass --catalog, set [catalog].path, or unset STOCKVIEW_CATALOG_PATH",
                path.display()
            )
        }),
    }
}

// Command-line values win over the config's [ui] defaults.
fn initial_view(config: &Config, options: &CliOptions) -> ViewState {
    let filter_text = options
        .filter_text
        .clone()
        .unwrap_or_else(|| config.filter_text().to_owned());
    let in_stock_only = options
        .in_stock_only
        .unwrap_or_else(|| config.in_stock_only());
    ViewState::new(filter_text, in_stock_only)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    catalog_path: Option<PathBuf>,
    filter_text: Option<String>,
    in_stock_only: Option<bool>,
    print_rows: bool,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        catalog_path: None,
        filter_text: None,
        in_stock_only: None,
        print_rows: false,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--catalog" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--catalog requires a JSON file path"))?;
                options.catalog_path = Some(PathBuf::from(value.as_ref()));
            }
            "--filter" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("--filter requires search text (use \"\" for none)")
                })?;
                options.filter_text = Some(value.as_ref().to_owned());
            }
            "--in-stock-only" => {
                options.in_stock_only = Some(true);
            }
            "--no-in-stock-only" => {
                options.in_stock_only = Some(false);
            }
            "--print" => {
                options.print_rows = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("stockview");
    println!("  --config <path>          Use a specific config path");
    println!("  --catalog <path>         Load products from a JSON catalog");
    println!("  --filter <text>          Start with this search text");
    println!("  --in-stock-only          Start with the in-stock filter on");
    println!("  --no-in-stock-only       Start with the in-stock filter off");
    println!("  --print                  Print the filtered listing and exit");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config + catalog and exit");
    println!("  --help                   Show this help");
}
