use clap::Parser;
use std::process;

mod cli;
mod config;
mod gateways;

fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = cli::Args::parse();
    if let Err(err) = cli::run(args) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}
