use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::app_config::Config;
use crate::document::{Episode, Show};
use crate::errors::{AppError, FetchError};
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::file_utils::FileManager;
use crate::link_lister;
use crate::transcript_parser;

// @module: Application controller for transcript retrieval and parsing

/// An episode page to parse: the listed title and its absolute URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeTarget {
    pub name: String,
    pub url: Url,
}

/// Main application controller
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Page source, HTTP in production
    fetcher: Arc<dyn PageFetcher>,
}

impl Controller {
    // @method: Create a new controller fetching over HTTP
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let fetcher = Arc::new(HttpFetcher::new(&config.fetch));
        Self::with_fetcher(config, fetcher)
    }

    // @method: Create a controller around any page source
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn PageFetcher>) -> Result<Self, AppError> {
        config
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self { config, fetcher })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch one transcript page and build its episode
    pub async fn parse_episode(&self, name: &str, url: &str) -> Result<Episode, AppError> {
        let url = parse_url(url)?;
        self.fetch_episode(name, &url).await
    }

    /// Fetch the index page and return its episode links resolved to absolute URLs
    pub async fn list_links(&self, index_url: &str) -> Result<Vec<EpisodeTarget>, AppError> {
        let index = parse_url(index_url)?;
        let page = self.fetcher.fetch(&index).await?;
        let links = link_lister::list_links_in(&page)?;

        info!("Found {} episode link(s) on {}", links.len(), index);

        links
            .into_iter()
            .map(|link| {
                let url = index.join(&link.href).map_err(|e| AppError::InvalidUrl {
                    url: link.href.clone(),
                    message: e.to_string(),
                })?;
                Ok(EpisodeTarget { name: link.title, url })
            })
            .collect()
    }

    /// Parse every episode linked from the index page, in link order
    pub async fn parse_all(&self, index_url: &str) -> Result<Show, AppError> {
        self.parse_all_with_progress(index_url, &ProgressBar::hidden()).await
    }

    /// Run `parse_all` while advancing a progress bar once per episode
    pub async fn parse_all_with_progress(
        &self,
        index_url: &str,
        progress: &ProgressBar,
    ) -> Result<Show, AppError> {
        let start_time = Instant::now();

        // link errors always abort, whatever the skip policy
        let targets = self.list_links(index_url).await?;
        if targets.is_empty() {
            warn!("No episode links found on {}", index_url);
        }

        progress.set_length(targets.len() as u64);
        progress.set_message("Parsing episodes");

        let delay = Duration::from_millis(self.config.fetch.request_delay_ms);
        let concurrency = self.config.fetch.concurrent_requests.max(1);

        // buffered() yields in input order, so the show keeps link order
        let mut results = stream::iter(targets)
            .map(move |target| async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let result = self.fetch_episode(&target.name, &target.url).await;
                progress.inc(1);
                (target, result)
            })
            .buffered(concurrency);

        let mut show = Show::new();
        let mut skipped = 0usize;

        while let Some((target, result)) = results.next().await {
            match result {
                Ok(episode) => show.add_episode(episode),
                Err(e) if self.config.skip_failed_episodes => {
                    warn!("Skipping episode '{}' ({}): {}", target.name, target.url, e);
                    skipped += 1;
                }
                Err(e) => {
                    error!("Episode '{}' failed, aborting run: {}", target.name, e);
                    progress.abandon_with_message("Aborted");
                    return Err(e);
                }
            }
        }

        progress.finish_with_message("Done");
        info!(
            "Parsed {} episode(s), skipped {}, in {}",
            show.len(),
            skipped,
            format_duration(start_time.elapsed())
        );

        Ok(show)
    }

    /// Parse a saved page, or every saved page under a directory
    ///
    /// A single file takes `name` when given and its file stem otherwise;
    /// pages found in a directory are always named after their stems.
    pub fn parse_local(&self, name: Option<&str>, path: &Path) -> Result<Show, AppError> {
        let mut show = Show::new();

        if FileManager::dir_exists(path) {
            let pages = FileManager::find_page_files(path)?;
            info!("Found {} saved page(s) in {:?}", pages.len(), path);

            for page in pages {
                let episode_name = FileManager::episode_name_from_path(&page);
                match read_local_episode(&episode_name, &page) {
                    Ok(episode) => show.add_episode(episode),
                    Err(e) if self.config.skip_failed_episodes => {
                        warn!("Skipping saved page {:?}: {}", page, e);
                    }
                    Err(e) => return Err(e),
                }
            }
            return Ok(show);
        }

        if !FileManager::file_exists(path) {
            return Err(FetchError::File {
                path: path.display().to_string(),
                message: "no such file or directory".to_string(),
            }
            .into());
        }

        let episode_name = name
            .map(str::to_string)
            .unwrap_or_else(|| FileManager::episode_name_from_path(path));
        show.add_episode(read_local_episode(&episode_name, path)?);
        Ok(show)
    }

    async fn fetch_episode(&self, name: &str, url: &Url) -> Result<Episode, AppError> {
        let page = self.fetcher.fetch(url).await?;
        let episode = transcript_parser::parse_episode_markup(name, &page)?;

        info!(
            "Parsed '{}': {} scene(s) from {}",
            episode.name,
            episode.scenes().len(),
            url
        );
        Ok(episode)
    }
}

/// Progress bar for a run over the index, styled like the rest of the CLI
pub fn episode_progress_bar() -> ProgressBar {
    let progress_bar = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} episodes ({percent}%) {msg} {eta}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));
    progress_bar
}

fn read_local_episode(name: &str, path: &Path) -> Result<Episode, AppError> {
    let page = FileManager::read_to_string(path).map_err(|e| FetchError::File {
        path: path.display().to_string(),
        message: format!("{:#}", e),
    })?;

    debug!("Read {} bytes from {:?}", page.len(), path);
    Ok(transcript_parser::parse_episode_markup(name, &page)?)
}

fn parse_url(url: &str) -> Result<Url, AppError> {
    Url::parse(url).map_err(|e| AppError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Format a duration as `1h 2m 3s`, `2m 3s` or `3.4s`
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
