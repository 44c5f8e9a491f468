use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use log::debug;
use reqwest::blocking::Client;

use crate::{config::FeedConfig, errors::ItineraryError, types::Itinerary};

/// Public Santa route feed.
pub const DEFAULT_FEED_URL: &str = "https://firebasestorage.googleapis.com/v0/b/santa-tracker-firebase.appspot.com/o/route%2Fsanta_en.json?alt=media&2018b";

/// A place an itinerary can be loaded from.
pub trait Feed: Send + 'static {
    fn fetch(&self) -> Result<Itinerary, ItineraryError>;

    /// Human readable origin, used in log lines.
    fn describe(&self) -> String;
}

impl Feed for Box<dyn Feed> {
    fn fetch(&self) -> Result<Itinerary, ItineraryError> {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Builds the feed named by the configuration; a local file wins over the URL.
pub fn open(config: &FeedConfig) -> Result<Box<dyn Feed>, ItineraryError> {
    if let Some(path) = &config.file {
        return Ok(Box::new(FileFeed::new(path)));
    }

    let feed = match config.timeout_secs {
        Some(secs) => HttpFeed::with_timeout(&config.url, Duration::from_secs(secs))?,
        None => HttpFeed::new(&config.url)?,
    };
    Ok(Box::new(feed))
}

/// Loads the itinerary with a single HTTP GET.
pub struct HttpFeed {
    url: String,
    client: Client,
}

impl HttpFeed {
    pub fn new(url: &str) -> Result<Self, ItineraryError> {
        Self::build(url, None)
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, ItineraryError> {
        Self::build(url, Some(timeout))
    }

    fn build(url: &str, timeout: Option<Duration>) -> Result<Self, ItineraryError> {
        let mut builder = Client::builder();
        if is_loopback(url) {
            builder = builder.no_proxy();
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ItineraryError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Feed for HttpFeed {
    fn fetch(&self) -> Result<Itinerary, ItineraryError> {
        let request_error = |e: reqwest::Error| ItineraryError::Request {
            url: self.url.clone(),
            message: e.to_string(),
        };

        let response = self.client.get(&self.url).send().map_err(request_error)?;
        if !response.status().is_success() {
            return Err(ItineraryError::Status {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().map_err(request_error)?;
        debug!("Fetched {} bytes from {}", body.len(), self.url);

        Itinerary::from_json(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

fn is_loopback(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(|host| host == "localhost" || host == "127.0.0.1"))
        .unwrap_or(false)
}

/// Loads the itinerary from a JSON file on disk.
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Feed for FileFeed {
    fn fetch(&self) -> Result<Itinerary, ItineraryError> {
        let body = fs::read_to_string(&self.path).map_err(|e| ItineraryError::Read {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        Itinerary::from_json(&body)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
