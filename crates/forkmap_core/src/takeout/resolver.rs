//! Resolves shared place URLs into coordinates.
//!
//! # Responsibility
//! - Fetch a place page over HTTP (redirects followed, body read as text).
//! - Extract the coordinates embedded in the page's server-rendered state.
//! - Cache outcomes per URL for the lifetime chosen by the caller.
//!
//! # Invariants
//! - "No coordinates in the page" is `Ok(None)`, never an error.
//! - A matched pair is returned as captured, without range checks.
//! - No retries; timeouts only when configured.

use crate::config::ImportConfig;
use crate::geo::Coordinates;
use crate::logging::sanitize_for_log;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const LOG_URL_MAX_CHARS: usize = 80;
const LOG_NUMBER_MAX_CHARS: usize = 32;

static APP_STATE_COORDS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"APP_INITIALIZATION_STATE=\[\[\[-?\d+\.\d+,(-?[\d.]+),(-?[\d.]+)")
        .expect("valid app state regex")
});

/// Failure to fetch a place page at all.
#[derive(Debug)]
pub enum ResolveError {
    /// Connection, DNS, TLS or redirect failure.
    Transport(Box<ureq::Transport>),
    /// The response body could not be read as text.
    Body(std::io::Error),
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "place fetch failed: {err}"),
            Self::Body(err) => write!(f, "place page unreadable: {err}"),
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err.as_ref()),
            Self::Body(err) => Some(err),
        }
    }
}

/// Turns a place-sharing URL into coordinates.
///
/// Implementations must be `Sync`: the import service may call them from
/// several worker threads at once.
pub trait PlaceResolver: Sync {
    fn resolve_place(&self, url: &str) -> Result<Option<Coordinates>, ResolveError>;
}

impl<F> PlaceResolver for F
where
    F: Fn(&str) -> Result<Option<Coordinates>, ResolveError> + Sync,
{
    fn resolve_place(&self, url: &str) -> Result<Option<Coordinates>, ResolveError> {
        self(url)
    }
}

/// `PlaceResolver` backed by a blocking `ureq` agent.
pub struct HttpPlaceResolver {
    agent: ureq::Agent,
}

impl HttpPlaceResolver {
    pub fn new(config: &ImportConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = config.fetch_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = config.user_agent.as_deref() {
            builder = builder.user_agent(user_agent);
        }
        Self {
            agent: builder.build(),
        }
    }

    fn fetch_text(&self, url: &str) -> Result<String, ResolveError> {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            // Error pages are still scanned; they simply won't match.
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                return Err(ResolveError::Transport(Box::new(transport)));
            }
        };
        response.into_string().map_err(ResolveError::Body)
    }
}

impl PlaceResolver for HttpPlaceResolver {
    fn resolve_place(&self, url: &str) -> Result<Option<Coordinates>, ResolveError> {
        let started_at = Instant::now();
        let log_url = sanitize_for_log(url, LOG_URL_MAX_CHARS);

        let body = match self.fetch_text(url) {
            Ok(body) => body,
            Err(err) => {
                warn!(
                    "event=place_resolve module=takeout status=error duration_ms={} url={log_url} error={err}",
                    started_at.elapsed().as_millis()
                );
                return Err(err);
            }
        };

        let coordinates = extract_coordinates(&body);
        debug!(
            "event=place_resolve module=takeout status={} duration_ms={} body_bytes={} url={log_url}",
            if coordinates.is_some() { "ok" } else { "miss" },
            started_at.elapsed().as_millis(),
            body.len()
        );
        Ok(coordinates)
    }
}

/// Finds the first embedded app-state coordinate pair in a place page.
///
/// The first captured number is returned as latitude, the second as
/// longitude, in page order. Captures that are not numbers (`1.2.3`) count
/// as no match.
pub fn extract_coordinates(body: &str) -> Option<Coordinates> {
    let caps = APP_STATE_COORDS_RE.captures(body)?;
    let (first, second) = (caps.get(1)?.as_str(), caps.get(2)?.as_str());
    match (first.parse::<f64>(), second.parse::<f64>()) {
        (Ok(latitude), Ok(longitude)) => Some(Coordinates::new(latitude, longitude)),
        _ => {
            debug!(
                "event=place_extract module=takeout status=unparsable first={} second={}",
                sanitize_for_log(first, LOG_NUMBER_MAX_CHARS),
                sanitize_for_log(second, LOG_NUMBER_MAX_CHARS)
            );
            None
        }
    }
}

/// Per-URL memo of resolution outcomes.
///
/// Owned by the caller; pass the same cache to several imports to avoid
/// refetching shared URLs. Fetch errors are not cached.
#[derive(Debug, Default)]
pub struct PlaceCache {
    entries: HashMap<String, Option<Coordinates>>,
}

impl PlaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Some(outcome)` when the URL was resolved before.
    pub fn get(&self, url: &str) -> Option<Option<Coordinates>> {
        self.entries.get(url).copied()
    }

    pub fn insert(&mut self, url: impl Into<String>, outcome: Option<Coordinates>) {
        self.entries.insert(url.into(), outcome);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
