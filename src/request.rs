use std::time::Duration;

use chrono::Local;
use reqwest::{
    header::{HeaderMap, HeaderValue, COOKIE},
    Client, StatusCode,
};

use crate::{warn_time, Result, BACKOFF_FACTOR, BASE_URL, MAX_ATTEMPTS, SESSION_COOKIE};

/// The process-wide session: a client with the session cookie pinned to every
/// outgoing request, plus the host to scrape.
/// `Client` is internally reference counted so cloning is cheap.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    base_url: String,
}

impl Session {
    /// Builds a session that sends the platform cookie with every request,
    /// plain or encrypted transport alike. Construction failure is fatal.
    pub fn new(cookie: &str) -> Result<Self> {
        Self::with_base_url(cookie, BASE_URL)
    }

    /// Same as [`Session::new`] but aimed at a different host.
    pub fn with_base_url(cookie: &str, base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{SESSION_COOKIE}={cookie}"))?,
        );
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Canonical profile URL for an ID. The fetch and the output row both use it.
    pub fn profile_url(&self, id: u64) -> String {
        format!("{}/user/profile.php?id={id}&showallcourses=1", self.base_url)
    }

    /// Requests a profile page, retrying transient failures with exponential
    /// backoff. Only GET is ever issued, so every retry is idempotent.
    ///
    /// Returns `Ok(Some(html))` on a 200 and `Ok(None)` on any other final
    /// status. A retryable status that survives all attempts also ends as
    /// `Ok(None)` - at this layer "gone" and "still failing" look the same.
    /// Transport errors that never recover are the only `Err`.
    pub async fn fetch_profile_page(&self, id: u64) -> Result<Option<String>> {
        let url = self.profile_url(id);
        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            match self.client.get(&url).send().await {
                Ok(res) if res.status() == StatusCode::OK => {
                    return Ok(Some(res.text().await?));
                }
                Ok(res) if !is_retryable(res.status()) => return Ok(None),
                Ok(res) => {
                    last_err = None;
                    if attempt < MAX_ATTEMPTS {
                        warn_time!("id {}: status {}, retrying", id, res.status());
                        tokio::time::sleep(backoff_delay(attempt)).await;
                    }
                }
                Err(e) => {
                    last_err = Some(e);
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(backoff_delay(attempt)).await;
                    }
                }
            }
        }

        match last_err {
            Some(e) => Err(e.into()),
            None => Ok(None),
        }
    }
}

/// Statuses worth retrying; everything else is treated as "no profile".
fn is_retryable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Wait before attempt `attempt + 1`: `BACKOFF_FACTOR * 2^(attempt - 1)` seconds.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(BACKOFF_FACTOR * 2u64.pow(attempt - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_url_encodes_the_id() {
        let session = Session::with_base_url("c", "http://127.0.0.1:3000/").unwrap();
        assert_eq!(
            session.profile_url(1312),
            "http://127.0.0.1:3000/user/profile.php?id=1312&showallcourses=1"
        );
    }

    #[test]
    fn backoff_schedule_grows_by_factor_four() {
        let secs: Vec<u64> = (1..MAX_ATTEMPTS)
            .map(|a| backoff_delay(a).as_secs())
            .collect();
        assert_eq!(secs, vec![4, 8, 16, 32]);
    }

    #[test]
    fn only_transient_server_statuses_are_retryable() {
        for code in [429, 500, 502, 503, 504] {
            assert!(is_retryable(StatusCode::from_u16(code).unwrap()));
        }
        for code in [200, 301, 400, 401, 403, 404, 501] {
            assert!(!is_retryable(StatusCode::from_u16(code).unwrap()));
        }
    }
}
