use std::path::Path;

use chrono::Local;
use clap::Parser;
use courses_scrap::{info_time, process, request::Session, write, Result, CSV_PATH};

/// Scrape Courses user profiles over an ID range into a CSV.
#[derive(Parser, Debug)]
#[command(about, version)]
struct Args {
    /// Courses session cookie
    #[arg(long)]
    cookie: String,

    /// Inclusive lower ID bound
    #[arg(long)]
    lower: u64,

    /// Inclusive upper ID bound
    #[arg(long)]
    upper: u64,

    /// Worker pool size
    #[arg(long, default_value_t = 10)]
    threads: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (lower, upper) = process::normalize_bounds(args.lower, args.upper);

    let session = Session::new(&args.cookie)?;
    let start_time = Local::now();

    let profiles = process::scrape_profiles(&session, lower, upper, args.threads).await?;

    info_time!("Saving {} records to {}", profiles.len(), CSV_PATH);
    write::write_records(Path::new(CSV_PATH), &profiles)?;
    info_time!(start_time, "Full program time:");

    Ok(())
}
