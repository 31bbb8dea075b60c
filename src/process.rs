use chrono::Local;
use futures::StreamExt;

use crate::parse::parse_profile;
use crate::profile::ProfileRecord;
use crate::request::Session;
use crate::{info_time, warn_time, Result, PROGRESS_CHUNK};

/// Fetches and parses every ID in `lower..=upper` over a pool of at most
/// `threads` in-flight tasks, collecting records as tasks complete.
/// Output order is completion order, so it varies across runs; only the set
/// of records is stable for a fixed server state.
///
/// A progress line is printed after every [`PROGRESS_CHUNK`] collected
/// records. The percentage is collected-over-range-size, a coarse signal
/// that never reaches 100% on ranges with many empty IDs.
pub async fn scrape_profiles(
    session: &Session,
    lower: u64,
    upper: u64,
    threads: usize,
) -> Result<Vec<ProfileRecord>> {
    info_time!("Scraping ids {} to {} on {} workers", lower, upper, threads);
    let total = (upper - lower + 1) as f64;

    let mut results = futures::stream::iter(lower..=upper)
        .map(|id| {
            // Session clones share one client.
            let session = session.clone();
            tokio::spawn(async move { scrape_one(session, id).await })
        })
        .buffer_unordered(threads.max(1));

    let mut profiles = Vec::new();
    while let Some(joined) = results.next().await {
        let Some(record) = joined? else { continue };
        profiles.push(record);
        if profiles.len() % PROGRESS_CHUNK == 0 {
            info_time!(
                "{:.2}% of profiles scraped ({} records, ids {} to {})",
                100.0 * profiles.len() as f64 / total,
                profiles.len(),
                lower,
                upper
            );
        }
    }

    info_time!("Scraping completed, {} profiles found", profiles.len());
    Ok(profiles)
}

/// One unit of work. Every per-ID failure is absorbed here: a fetch or parse
/// error becomes a warning and the ID contributes nothing to the output.
async fn scrape_one(session: Session, id: u64) -> Option<ProfileRecord> {
    let url = session.profile_url(id);
    let html = match session.fetch_profile_page(id).await {
        Ok(body) => body?,
        Err(e) => {
            warn_time!("skipping id {}: {}", id, e);
            return None;
        }
    };
    match parse_profile(html, id, url).await {
        Ok(record) => record,
        Err(e) => {
            warn_time!("skipping id {}: {}", id, e);
            None
        }
    }
}

/// Swaps the bounds when they arrive reversed.
pub fn normalize_bounds(lower: u64, upper: u64) -> (u64, u64) {
    if lower > upper {
        (upper, lower)
    } else {
        (lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_bounds;

    #[test]
    fn reversed_bounds_are_swapped() {
        assert_eq!(normalize_bounds(500, 3), (3, 500));
    }

    #[test]
    fn ordered_and_equal_bounds_pass_through() {
        assert_eq!(normalize_bounds(3, 500), (3, 500));
        assert_eq!(normalize_bounds(42, 42), (42, 42));
    }
}
