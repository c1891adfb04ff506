//! Takeout import use-case.
//!
//! # Responsibility
//! - Turn a Takeout CSV into restaurants linked to a list named after the
//!   file.
//! - Reuse existing restaurants within the dedup threshold instead of
//!   creating duplicates.
//!
//! # Invariants
//! - Existing restaurants are loaded once per file and the snapshot is not
//!   extended with restaurants created during the same run.
//! - Dedup and all writes run sequentially in file order; only URL
//!   resolution is spread over the worker pool.
//! - Unresolvable candidates are dropped; repository failures abort the
//!   run without rolling back earlier writes.

use crate::config::ImportConfig;
use crate::geo::{is_same_place, Coordinates};
use crate::logging::sanitize_for_log;
use crate::model::list::{ListId, NewList};
use crate::model::restaurant::{NewRestaurant, Restaurant, RestaurantId};
use crate::model::RESTAURANT_NAME_MAX_CHARS;
use crate::repo::list_repo::ListRepository;
use crate::repo::restaurant_repo::RestaurantRepository;
use crate::repo::RepoError;
use crate::takeout::parser::{parse_takeout_csv, TakeoutCandidate};
use crate::takeout::resolver::{PlaceCache, PlaceResolver, ResolveError};
use crate::takeout::TakeoutFile;
use log::{debug, error, info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

const LOG_TEXT_MAX_CHARS: usize = 40;

/// Import failure. Nothing written before the failure is rolled back.
#[derive(Debug)]
pub enum ImportError {
    /// The Takeout file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file name does not yield a usable list name.
    InvalidListName(String),
    /// Store failure while reading or writing restaurants/lists.
    Repo(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::InvalidListName(file_name) => {
                write!(f, "cannot derive a list name from file `{file_name}`")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidListName(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// What one file import did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub list_id: ListId,
    pub list_name: String,
    /// Whether the list was created by this run rather than reused.
    pub list_created: bool,
    /// Data rows parsed from the CSV.
    pub candidates: usize,
    /// Candidates whose URL resolved to coordinates.
    pub resolved: usize,
    /// Resolved candidates matched to an existing restaurant.
    pub reused: usize,
    /// Resolved candidates that produced a new restaurant.
    pub created: usize,
}

/// Orchestrates parsing, resolution, dedup and list linking.
pub struct ImportService<R, L, P> {
    restaurants: R,
    lists: L,
    resolver: P,
    config: ImportConfig,
}

impl<R, L, P> ImportService<R, L, P>
where
    R: RestaurantRepository,
    L: ListRepository,
    P: PlaceResolver,
{
    pub fn new(restaurants: R, lists: L, resolver: P, config: ImportConfig) -> Self {
        Self {
            restaurants,
            lists,
            resolver,
            config,
        }
    }

    /// Imports one file and returns the name of the list it filled.
    pub fn import_from_takeout(&self, file: &TakeoutFile) -> Result<String, ImportError> {
        let mut cache = PlaceCache::new();
        Ok(self.import_takeout(file, &mut cache)?.list_name)
    }

    /// Imports several files in order, sharing one resolution cache.
    ///
    /// Stops at the first failing file; earlier files stay imported.
    pub fn import_files(&self, files: &[TakeoutFile]) -> Result<Vec<String>, ImportError> {
        let mut cache = PlaceCache::new();
        files
            .iter()
            .map(|file| Ok(self.import_takeout(file, &mut cache)?.list_name))
            .collect()
    }

    /// Reads and imports files from disk, sharing one resolution cache.
    pub fn import_paths<Q: AsRef<Path>>(
        &self,
        paths: &[Q],
    ) -> Result<Vec<ImportSummary>, ImportError> {
        let mut cache = PlaceCache::new();
        let mut summaries = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let file = TakeoutFile::read(path).map_err(|source| ImportError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            summaries.push(self.import_takeout(&file, &mut cache)?);
        }
        Ok(summaries)
    }

    /// Imports one file using (and filling) the caller's cache.
    pub fn import_takeout(
        &self,
        file: &TakeoutFile,
        cache: &mut PlaceCache,
    ) -> Result<ImportSummary, ImportError> {
        let started_at = Instant::now();
        let file_label = sanitize_for_log(&file.name, LOG_TEXT_MAX_CHARS);
        info!("event=takeout_import module=import status=start file={file_label}");

        match self.run_import(file, cache) {
            Ok(summary) => {
                info!(
                    "event=takeout_import module=import status=ok file={file_label} duration_ms={} candidates={} resolved={} reused={} created={} list_created={}",
                    started_at.elapsed().as_millis(),
                    summary.candidates,
                    summary.resolved,
                    summary.reused,
                    summary.created,
                    summary.list_created
                );
                Ok(summary)
            }
            Err(err) => {
                error!(
                    "event=takeout_import module=import status=error file={file_label} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    fn run_import(
        &self,
        file: &TakeoutFile,
        cache: &mut PlaceCache,
    ) -> Result<ImportSummary, ImportError> {
        let list_name = file.list_name(self.config.list_name_max_chars);
        if list_name.trim().is_empty() {
            return Err(ImportError::InvalidListName(file.name.clone()));
        }

        let candidates = parse_takeout_csv(&file.content);
        let resolved = self.resolve_candidates(&candidates, cache);
        if resolved.len() < candidates.len() {
            warn!(
                "event=takeout_resolve module=import status=skip dropped={} total={}",
                candidates.len() - resolved.len(),
                candidates.len()
            );
        }

        let snapshot = self.restaurants.get_all()?;
        let mut restaurant_ids: Vec<RestaurantId> = Vec::with_capacity(resolved.len());
        let mut reused = 0;
        let mut created = 0;
        for (candidate, coordinates) in &resolved {
            match find_same_place(&snapshot, *coordinates, self.config.dedup_threshold_meters) {
                Some(existing) => {
                    reused += 1;
                    restaurant_ids.push(existing.id);
                }
                None => {
                    let name: String = candidate
                        .title
                        .chars()
                        .take(RESTAURANT_NAME_MAX_CHARS)
                        .collect();
                    let restaurant = self
                        .restaurants
                        .create(&NewRestaurant::new(name, *coordinates))?;
                    created += 1;
                    restaurant_ids.push(restaurant.id);
                }
            }
        }

        let (list, list_created) = match self.lists.get_by_name(&list_name)? {
            Some(list) => (list, false),
            None => (self.lists.create(&NewList::named(list_name.as_str()))?, true),
        };
        for restaurant_id in &restaurant_ids {
            self.lists.add_restaurant(*restaurant_id, list.id)?;
        }

        Ok(ImportSummary {
            list_id: list.id,
            list_name: list.name,
            list_created,
            candidates: candidates.len(),
            resolved: resolved.len(),
            reused,
            created,
        })
    }

    /// Resolves every candidate URL not already cached, then returns the
    /// candidates with coordinates in file order.
    fn resolve_candidates<'a>(
        &self,
        candidates: &'a [TakeoutCandidate],
        cache: &mut PlaceCache,
    ) -> Vec<(&'a TakeoutCandidate, Coordinates)> {
        let mut seen = HashSet::new();
        let pending: Vec<&str> = candidates
            .iter()
            .map(|candidate| candidate.url.as_str())
            .filter(|url| !url.is_empty() && cache.get(url).is_none() && seen.insert(*url))
            .collect();

        for (url, outcome) in pending.iter().zip(self.fetch_all(&pending)) {
            match outcome {
                Ok(coordinates) => cache.insert(*url, coordinates),
                Err(err) => warn!(
                    "event=takeout_resolve module=import status=error url={} error={err}",
                    sanitize_for_log(url, LOG_TEXT_MAX_CHARS)
                ),
            }
        }

        candidates
            .iter()
            .filter_map(|candidate| {
                let coordinates = cache.get(&candidate.url).flatten();
                if coordinates.is_none() {
                    debug!(
                        "event=takeout_candidate module=import status=skip title={}",
                        sanitize_for_log(&candidate.title, LOG_TEXT_MAX_CHARS)
                    );
                }
                coordinates.map(|coordinates| (candidate, coordinates))
            })
            .collect()
    }

    /// Resolves `urls` on a bounded pool, keeping input order.
    fn fetch_all(&self, urls: &[&str]) -> Vec<Result<Option<Coordinates>, ResolveError>> {
        let resolver = &self.resolver;
        let workers = self.config.resolve_workers.min(urls.len());
        if workers <= 1 {
            return urls.iter().map(|url| resolver.resolve_place(url)).collect();
        }

        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(|| {
                urls.par_iter()
                    .map(|url| resolver.resolve_place(url))
                    .collect()
            }),
            Err(err) => {
                warn!(
                    "event=resolve_pool module=import status=error workers={workers} error={err}"
                );
                urls.iter().map(|url| resolver.resolve_place(url)).collect()
            }
        }
    }
}

/// First restaurant in `snapshot` within `threshold_meters` of `coordinates`.
fn find_same_place(
    snapshot: &[Restaurant],
    coordinates: Coordinates,
    threshold_meters: f64,
) -> Option<&Restaurant> {
    snapshot
        .iter()
        .find(|existing| is_same_place(existing.coordinates, coordinates, threshold_meters))
}
