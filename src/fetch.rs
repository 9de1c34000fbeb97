// src/fetch.rs
// Page sources: where the results HTML comes from.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::consts::{PAGE_TIMEOUT_SECS, USER_AGENT};
use crate::error::FetchError;

pub trait PageSource {
    fn fetch(&self) -> Result<String, FetchError>;

    /// Short label for log lines.
    fn describe(&self) -> String;
}

impl<T: PageSource + ?Sized> PageSource for Box<T> {
    fn fetch(&self) -> Result<String, FetchError> { (**self).fetch() }
    fn describe(&self) -> String { (**self).describe() }
}

/// Fetch over HTTP. Plain GET, or a urlencoded POST when form fields are set.
pub struct HttpPage {
    url: String,
    form: Vec<(String, String)>,
    client: Client,
}

impl HttpPage {
    pub fn new(url: impl Into<String>, form: Vec<(String, String)>) -> Result<Self, FetchError> {
        let url = url.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(PAGE_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| FetchError::Http { url: url.clone(), source })?;
        Ok(Self { url, form, client })
    }
}

impl PageSource for HttpPage {
    fn fetch(&self) -> Result<String, FetchError> {
        let req = if self.form.is_empty() {
            self.client.get(&self.url)
        } else {
            self.client.post(&self.url).form(&self.form)
        };

        let http = |source| FetchError::Http { url: self.url.clone(), source };
        let resp = req.send().map_err(http)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: self.url.clone(), status: status.as_u16() });
        }
        let body = resp.text().map_err(http)?;
        logd!("Fetch: {} -> {} bytes", self.url, body.len());
        Ok(body)
    }

    fn describe(&self) -> String {
        if self.form.is_empty() {
            format!("GET {}", self.url)
        } else {
            format!("POST {} ({} field(s))", self.url, self.form.len())
        }
    }
}

/// A saved results page on disk, re-read on every fetch.
pub struct FilePage {
    path: PathBuf,
}

impl FilePage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for FilePage {
    fn fetch(&self) -> Result<String, FetchError> {
        fs::read_to_string(&self.path).map_err(|source| FetchError::Io { path: self.path.clone(), source })
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
