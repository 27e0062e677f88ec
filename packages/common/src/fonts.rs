//! Google Fonts store
//!
//! Caches the fetched font list for the lifetime of the session; refetching
//! requires an explicit `force`.

use crate::result::CommonResult;
use crate::transport::Transport;
use serde::{Deserialize, Serialize};

/// One font family entry from the fonts service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontFamily {
    pub family: String,
    #[serde(default)]
    pub variants: Vec<String>,
    #[serde(default)]
    pub subsets: Vec<String>,
    #[serde(default)]
    pub category: String,
}

/// Session-scoped store for the Google Fonts list
#[derive(Debug, Default)]
pub struct FontsStore {
    fonts: Vec<FontFamily>,
    fetched: bool,
}

impl FontsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the font list through the transport.
    ///
    /// Returns the cached list when it was already fetched, unless `force`
    /// is set.
    pub async fn fetch<T: Transport>(
        &mut self,
        transport: &T,
        force: bool,
    ) -> CommonResult<&[FontFamily]> {
        if self.fetched && !force {
            return Ok(&self.fonts);
        }

        self.fonts = transport.fetch_google_fonts().await?;
        self.fetched = true;

        Ok(&self.fonts)
    }

    /// Look up a font by family name
    pub fn font_data(&self, family: &str) -> Option<&FontFamily> {
        self.fonts.iter().find(|font| font.family == family)
    }

    pub fn fonts(&self) -> &[FontFamily] {
        &self.fonts
    }

    pub fn is_fetched(&self) -> bool {
        self.fetched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    fn roboto() -> FontFamily {
        FontFamily {
            family: "Roboto".to_string(),
            variants: vec!["regular".to_string(), "700".to_string()],
            subsets: vec!["latin".to_string()],
            category: "sans-serif".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_caches_font_list() {
        let transport = MockTransport::with_fonts(vec![roboto()]);
        let mut store = FontsStore::new();

        let fonts = store.fetch(&transport, false).await.unwrap();
        assert_eq!(fonts.len(), 1);
        assert_eq!(transport.font_fetch_count(), 1);

        // Second fetch without force reuses the cache
        store.fetch(&transport, false).await.unwrap();
        assert_eq!(transport.font_fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_force_refetches() {
        let transport = MockTransport::with_fonts(vec![roboto()]);
        let mut store = FontsStore::new();

        store.fetch(&transport, false).await.unwrap();
        store.fetch(&transport, true).await.unwrap();

        assert_eq!(transport.font_fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_font_data_lookup() {
        let transport = MockTransport::with_fonts(vec![roboto()]);
        let mut store = FontsStore::new();
        store.fetch(&transport, false).await.unwrap();

        assert!(store.font_data("Roboto").is_some());
        assert!(store.font_data("Comic Sans").is_none());
    }
}
