//! Tile source driven by a URL template.
//!
//! # URL Pattern
//!
//! Any XYZ tile server can be addressed with a template such as
//! `https://tile.example.com/{z}/{x}/{y}.png?apikey={key}`:
//!
//! - `{z}` zoom level, `{x}` column (west to east), `{y}` row (north to south)
//! - `{key}` is replaced by the configured API key; a template that uses it
//!   without a key configured fails every fetch

use crate::coord::MAX_ZOOM;
use crate::provider::types::check_indices;
use crate::provider::{HttpClient, ProviderError, TileSource};

const ZOOM_PLACEHOLDER: &str = "{z}";
const X_PLACEHOLDER: &str = "{x}";
const Y_PLACEHOLDER: &str = "{y}";
const KEY_PLACEHOLDER: &str = "{key}";

/// Fetches tiles from an XYZ tile server described by a URL template.
///
/// # Example
///
/// ```ignore
/// use tilemosaic::provider::{ReqwestClient, UrlTemplateProvider};
///
/// let client = ReqwestClient::new()?;
/// let provider = UrlTemplateProvider::new(client, "https://tile.openstreetmap.org/{z}/{x}/{y}.png")?;
/// ```
pub struct UrlTemplateProvider<C: HttpClient> {
    http_client: C,
    template: String,
    api_key: Option<String>,
    name: String,
    min_zoom: u8,
    max_zoom: u8,
}

impl<C: HttpClient> UrlTemplateProvider<C> {
    /// Creates a provider for `template`.
    ///
    /// # Errors
    ///
    /// `ProviderSpecific` if the template lacks `{z}`, `{x}` or `{y}`.
    pub fn new(http_client: C, template: impl Into<String>) -> Result<Self, ProviderError> {
        let template = template.into();
        for placeholder in [ZOOM_PLACEHOLDER, X_PLACEHOLDER, Y_PLACEHOLDER] {
            if !template.contains(placeholder) {
                return Err(ProviderError::ProviderSpecific(format!(
                    "URL template '{}' is missing the {} placeholder",
                    template, placeholder
                )));
            }
        }

        let name = host_of(&template).unwrap_or("url-template").to_string();
        Ok(Self {
            http_client,
            template,
            api_key: None,
            name,
            min_zoom: 0,
            max_zoom: MAX_ZOOM,
        })
    }

    /// Sets the API key substituted for `{key}`. Blank keys are ignored.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        self.api_key = if api_key.trim().is_empty() {
            None
        } else {
            Some(api_key)
        };
        self
    }

    /// Restricts the zoom levels this source will serve.
    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom.min(MAX_ZOOM);
        self
    }

    /// Overrides the name used in logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether the template needs an API key.
    pub fn requires_key(&self) -> bool {
        self.template.contains(KEY_PLACEHOLDER)
    }

    /// Builds the tile URL for the given indices.
    pub fn build_url(&self, x: u32, y: u32, zoom: u8) -> Result<String, ProviderError> {
        let url = self
            .template
            .replace(ZOOM_PLACEHOLDER, &zoom.to_string())
            .replace(X_PLACEHOLDER, &x.to_string())
            .replace(Y_PLACEHOLDER, &y.to_string());

        if !self.requires_key() {
            return Ok(url);
        }

        match &self.api_key {
            Some(key) => Ok(url.replace(KEY_PLACEHOLDER, key)),
            None => Err(ProviderError::ProviderSpecific(format!(
                "{} requires an API key but none is configured",
                self.name
            ))),
        }
    }
}

impl<C: HttpClient> TileSource for UrlTemplateProvider<C> {
    fn fetch_tile(&self, x: u32, y: u32, zoom: u8) -> Result<Vec<u8>, ProviderError> {
        if !self.supports_zoom(zoom) {
            return Err(ProviderError::UnsupportedZoom(zoom));
        }
        check_indices(x, y, zoom)?;

        let url = self.build_url(x, y, zoom)?;
        let body = self.http_client.get(&url)?;
        if body.is_empty() {
            return Err(ProviderError::InvalidResponse(format!(
                "empty body from {}",
                url
            )));
        }
        Ok(body)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }
}

fn host_of(template: &str) -> Option<&str> {
    let rest = template.split_once("://")?.1;
    rest.split(['/', '?', ':']).next().filter(|h| !h.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::http::tests::MockHttpClient;

    const OSM: &str = "https://tile.example.org/{z}/{x}/{y}.png";
    const KEYED: &str = "https://maps.example.com/{z}/{x}/{y}.png?apikey={key}";

    #[test]
    fn test_build_url() {
        let provider = UrlTemplateProvider::new(MockHttpClient::returning(Ok(vec![])), OSM).unwrap();
        assert_eq!(
            provider.build_url(19295, 24640, 16).unwrap(),
            "https://tile.example.org/16/19295/24640.png"
        );
        assert_eq!(provider.name(), "tile.example.org");
    }

    #[test]
    fn test_build_url_with_key() {
        let provider = UrlTemplateProvider::new(MockHttpClient::returning(Ok(vec![])), KEYED)
            .unwrap()
            .with_api_key("secret");
        assert_eq!(
            provider.build_url(1, 2, 3).unwrap(),
            "https://maps.example.com/3/1/2.png?apikey=secret"
        );
    }

    #[test]
    fn test_missing_key_is_provider_error() {
        let provider = UrlTemplateProvider::new(MockHttpClient::returning(Ok(vec![1])), KEYED)
            .unwrap()
            .with_api_key("   ");
        assert!(provider.requires_key());
        assert!(matches!(
            provider.fetch_tile(0, 0, 1),
            Err(ProviderError::ProviderSpecific(_))
        ));
    }

    #[test]
    fn test_template_without_placeholders_rejected() {
        let result = UrlTemplateProvider::new(
            MockHttpClient::returning(Ok(vec![])),
            "https://tile.example.org/{z}/{x}.png",
        );
        assert!(matches!(result, Err(ProviderError::ProviderSpecific(msg)) if msg.contains("{y}")));
    }

    #[test]
    fn test_fetch_tile_requests_built_url() {
        let provider =
            UrlTemplateProvider::new(MockHttpClient::returning(Ok(vec![9, 9])), OSM).unwrap();

        assert_eq!(provider.fetch_tile(5, 6, 4).unwrap(), vec![9, 9]);
        assert_eq!(
            provider.http_client.requested_urls(),
            vec!["https://tile.example.org/4/5/6.png"]
        );
    }

    #[test]
    fn test_fetch_tile_rejects_unsupported_zoom() {
        let provider = UrlTemplateProvider::new(MockHttpClient::returning(Ok(vec![1])), OSM)
            .unwrap()
            .with_zoom_range(3, 12);

        assert_eq!(
            provider.fetch_tile(0, 0, 13),
            Err(ProviderError::UnsupportedZoom(13))
        );
        assert!(provider.http_client.requested_urls().is_empty());
    }

    #[test]
    fn test_fetch_tile_rejects_out_of_grid_indices() {
        let provider = UrlTemplateProvider::new(MockHttpClient::returning(Ok(vec![1])), OSM).unwrap();
        assert!(matches!(
            provider.fetch_tile(16, 0, 4),
            Err(ProviderError::UnsupportedCoordinates { .. })
        ));
    }

    #[test]
    fn test_empty_body_is_invalid_response() {
        let provider = UrlTemplateProvider::new(MockHttpClient::returning(Ok(vec![])), OSM).unwrap();
        assert!(matches!(
            provider.fetch_tile(0, 0, 0),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_http_error_propagates() {
        let provider = UrlTemplateProvider::new(
            MockHttpClient::returning(Err(ProviderError::HttpError("HTTP 404".into()))),
            OSM,
        )
        .unwrap();
        assert_eq!(
            provider.fetch_tile(0, 0, 0),
            Err(ProviderError::HttpError("HTTP 404".into()))
        );
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("http://localhost:8080/{z}/{x}/{y}"), Some("localhost"));
        assert_eq!(host_of("{z}/{x}/{y}"), None);
    }
}
