//! Label submission through the printer's built-in web interface.

use image::DynamicImage;
use log::{debug, info};
use reqwest::blocking::Client;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

/// Address of the printer when nothing else is configured.
pub const DEFAULT_URL: &str = "http://192.168.3.160";

/// Environment variable holding the printer address.
pub const URL_ENV: &str = "ZEBRA_URL";

const PREVIEW_TAG: &str = "<IMG SRC=\"";

/// Label text to submit, given inline or as a file to read.
#[derive(Debug, Clone)]
pub enum LabelSource {
    Zpl(String),
    File(PathBuf),
}

impl LabelSource {
    /// Exactly one of `zpl` and `file_path` must be present.
    pub fn from_parts(zpl: Option<String>, file_path: Option<PathBuf>) -> Result<Self, Error> {
        match (zpl, file_path) {
            (Some(zpl), None) => Ok(Self::Zpl(zpl)),
            (None, Some(path)) => Ok(Self::File(path)),
            (Some(_), Some(_)) => Err(Error::InvalidInput(
                "provide zpl or file_path, not both".to_string(),
            )),
            (None, None) => Err(Error::InvalidInput(
                "either zpl or file_path is required".to_string(),
            )),
        }
    }

    pub fn read(self) -> Result<String, Error> {
        match self {
            Self::Zpl(zpl) => Ok(zpl),
            Self::File(path) => {
                debug!("reading label from {:?}", path);
                Ok(std::fs::read_to_string(path)?)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Print,
    Preview,
}

impl Action {
    fn form_field(&self) -> (&'static str, &'static str) {
        match self {
            Self::Print => ("print", "Print Label"),
            Self::Preview => ("prev", "Preview Label"),
        }
    }
}

/// Config
///
#[derive(Debug, Clone)]
pub struct Config {
    url: String,
    timeout: Duration,
}

impl Config {
    /// Initialize configuration for the printer at `url`, e.g.
    /// `http://192.168.3.160`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use zebra_label::Config;
    ///
    /// let config = Config::new("http://10.0.0.7").timeout(Duration::from_secs(5));
    /// assert_eq!(config.url(), "http://10.0.0.7");
    /// ```
    ///
    pub fn new(url: impl Into<String>) -> Config {
        let url: String = url.into();
        Config {
            url: url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Read the address from `ZEBRA_URL`, falling back to [`DEFAULT_URL`].
    pub fn from_env() -> Config {
        match std::env::var(URL_ENV) {
            Ok(url) if !url.is_empty() => Self::new(url),
            _ => Self::new(DEFAULT_URL),
        }
    }

    pub fn timeout(self, timeout: Duration) -> Self {
        Config { timeout, ..self }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Zebra printer reached through its built-in web interface.
pub struct Printer {
    client: Client,
    config: Config,
}

impl Printer {
    pub fn new(config: Config) -> Result<Self, Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        info!("Using printer at {}", config.url);
        Ok(Printer { client, config })
    }

    /// Print a label.
    pub fn print_label(&self, source: LabelSource) -> Result<(), Error> {
        let zpl = source.read()?;
        self.submit(&zpl, Action::Print)?;
        Ok(())
    }

    /// Render a label with the printer's own engine and fetch the preview.
    pub fn render_label(&self, source: LabelSource) -> Result<DynamicImage, Error> {
        let zpl = source.read()?;
        let page = self.submit(&zpl, Action::Preview)?;
        let path = preview_path(&page).ok_or(Error::MissingPreview)?;
        debug!("preview image at {}", path);

        let bytes = self
            .client
            .get(format!("{}/{}", self.config.url, path.trim_start_matches('/')))
            .send()?
            .error_for_status()?
            .bytes()?;
        Ok(image::load_from_memory(&bytes)?)
    }

    fn submit(&self, zpl: &str, action: Action) -> Result<String, Error> {
        let (key, value) = action.form_field();
        let form = [
            ("data", zpl),
            ("dev", "R"),
            ("oname", "TEST"),
            ("otype", "ZPL"),
            (key, value),
        ];
        debug!("{:?} request with {} bytes of zpl", action, zpl.len());

        let page = self
            .client
            .post(format!("{}/zpl", self.config.url))
            .form(&form)
            .send()?
            .error_for_status()?
            .text()?;
        Ok(page)
    }
}

/// Extract the image path from the printer's preview page.
fn preview_path(page: &str) -> Option<&str> {
    let (_, rest) = page.split_once(PREVIEW_TAG)?;
    let (path, _) = rest.split_once('"')?;
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}
