use crate::{config::Config, gateways};
use anyhow::Result;
use clap::Parser;
use reqmap_application::prelude::*;
use reqmap_core::{resolver::RateLimitedResolver, usecases::ResolveOptions};
use reqmap_db_json::JsonGeocodeCache;
use reqmap_gateways::{csv_source::CsvRequestSource, html_map::HtmlMap};
use std::path::PathBuf;
use time::{format_description::FormatItem, macros::format_description, Date};

const DATE_FORMAT: &[FormatItem] = format_description!("[year]-[month]-[day]");

fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s, DATE_FORMAT)
}

/// Draws geocoded service requests on an interactive map.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// First day (inclusive), YYYY-MM-DD
    #[arg(short, long, value_parser = parse_date)]
    pub from: Date,
    /// Last day (inclusive), YYYY-MM-DD
    #[arg(short, long, value_parser = parse_date)]
    pub to: Date,
    /// Only requests of these categories
    #[arg(short, long, num_args = 1..)]
    pub cat: Vec<String>,
    /// CSV file with the service requests
    #[arg(short, long)]
    pub source: Option<PathBuf>,
    /// Configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output file, derived from the configured pattern by default
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: Args) -> Result<()> {
    let Args {
        from,
        to,
        cat,
        source,
        config,
        output,
    } = args;
    let cfg = Config::try_load_from_file_or_default(config)?;

    let source = CsvRequestSource::new(
        source.unwrap_or(cfg.source.file),
        cfg.source.columns,
    );
    let resolver = RateLimitedResolver::new(
        gateways::geocoding_gateway(&cfg.geocoding)?,
        cfg.geocoding.min_delay,
        cfg.region,
    )
    .with_max_retries(cfg.geocoding.max_retries);
    let cache = JsonGeocodeCache::new(cfg.cache.file);
    let output = match output {
        Some(output) => output,
        None => cfg.output.file_name(from, to)?,
    };
    let renderer = HtmlMap::new(&output)
        .with_title(format!("Service requests {from} - {to}"))
        .with_zoom(cfg.output.zoom);

    let request = MapRequest {
        date_from: from,
        date_to: to,
        categories: cat,
    };
    let options = ResolveOptions {
        locality: cfg.geocoding.address_suffix,
        persist_every: cfg.cache.persist_every,
        read_only: false,
    };
    let report = generate_map(&source, &resolver, &cache, &renderer, &request, &options)?;
    if !report.cache_loaded {
        log::warn!(
            "The unreadable geocode cache {} has been left untouched",
            cache.path().display()
        );
    } else if !report.resolve.persisted {
        log::warn!(
            "The geocode cache could not be saved to {}",
            cache.path().display()
        );
    }
    println!(
        "Map saved to {} with {} points",
        output.display(),
        report.render.rendered
    );
    Ok(())
}
