//! qfilter: compile a query string against a filter configuration.
//!
//! Usage:
//! ```bash
//! qfilter --config users.toml 'firstName[sw]=ma&$page=1&$limit=10'
//! qfilter --config users.toml --lang ar --count 'age[gt]=abc'
//! ```
//!
//! Prints the SQL on success. On validation failure prints the error list as
//! JSON and exits with status 1.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use query_filter::QueryParams;

mod config;

use config::FileConfig;

/// Compile untrusted query-string filters into SQL
#[derive(Parser, Debug)]
#[command(name = "qfilter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML filter configuration
    #[arg(short, long)]
    config: PathBuf,

    /// Message language tag ("ar" for Arabic, anything else English)
    #[arg(short, long, default_value = "en")]
    lang: String,

    /// Also print the count query
    #[arg(long)]
    count: bool,

    /// Raw query string, with or without the leading '?'
    query: String,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filters = FileConfig::load(&cli.config)?.into_filters()?;
    query_filter::log_debug!(
        "loaded {} rule(s) from {}",
        filters.rules().len(),
        cli.config.display()
    );

    if cli.count && !filters.has_count() {
        query_filter::log_warn!("--count ignored: configuration has no count_sql");
    }

    let params = QueryParams::parse(&cli.query);

    let result = if cli.count {
        filters
            .validate_and_construct_with_count(&params, &cli.lang)
            .map(|out| match out.count {
                Some(count) => format!("{}\n{count}", out.select),
                None => out.select,
            })
    } else {
        filters.validate_and_construct(&params, &cli.lang)
    };

    match result {
        Ok(sql) => {
            println!("{sql}");
            Ok(ExitCode::SUCCESS)
        },
        Err(errs) => {
            println!("{}", errs.to_json_string());
            Ok(ExitCode::FAILURE)
        },
    }
}
