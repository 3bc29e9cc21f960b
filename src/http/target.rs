use reqwest::Url;

use crate::error::ValidationError;

pub const DEFAULT_TARGET_URL: &str = "http://localhost";
pub const ADD_WIDGET_PATH: &str = "rpc/add_widget";

/// Joins `path` onto `base` as `{base}/{path}`, keeping any path prefix the
/// base already carries (unlike [`Url::join`], which replaces the last segment).
///
/// # Errors
///
/// Returns an error if the combined string is not a valid URL.
pub fn join_endpoint(base: &str, path: &str) -> Result<Url, url::ParseError> {
    let base = base.trim().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Url::parse(&format!("{}/{}", base, path))
}

/// The service under load. Immutable after startup and handed to every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTarget {
    base_url: Url,
    add_widget_url: Url,
}

impl EndpointTarget {
    /// # Errors
    ///
    /// Returns an error when `base_url` is not an absolute http(s) URL.
    pub fn parse(base_url: &str) -> Result<Self, ValidationError> {
        let parsed = Url::parse(base_url.trim()).map_err(|err| ValidationError::InvalidUrl {
            url: base_url.to_owned(),
            source: err,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::UnsupportedScheme {
                url: base_url.to_owned(),
            });
        }
        let add_widget_url = join_endpoint(parsed.as_str(), ADD_WIDGET_PATH).map_err(|err| {
            ValidationError::InvalidUrl {
                url: base_url.to_owned(),
                source: err,
            }
        })?;
        Ok(Self {
            base_url: parsed,
            add_widget_url,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub const fn add_widget_url(&self) -> &Url {
        &self.add_widget_url
    }
}
