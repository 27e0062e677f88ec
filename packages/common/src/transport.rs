//! # Collaborator Interfaces
//!
//! Trait abstractions over the backend transport and the generated-asset
//! cache. The core never performs network calls itself; it hands fully
//! formed payloads to a [`Transport`] and surfaces rejected futures to the
//! caller without retrying.
//!
//! Recording mocks are provided for tests, mirroring the real interfaces.

use crate::fonts::FontFamily;
use crate::result::CommonResult;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Backend transport abstraction
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Persist the full breakpoint list. Each call ships the complete
    /// current list, making the operation last-write-wins server-side.
    async fn persist_breakpoints(&self, payload: Value) -> CommonResult<()>;

    /// Generic element-scoped server call
    async fn request(&self, payload: Value) -> CommonResult<Value>;

    /// Fetch the Google Fonts list
    async fn fetch_google_fonts(&self) -> CommonResult<Vec<FontFamily>>;
}

/// Generated-stylesheet cache collaborator, invoked after breakpoint
/// structural changes so stale per-breakpoint CSS isn't served
#[allow(async_fn_in_trait)]
pub trait CacheRegenerator {
    async fn regenerate_cache(&self) -> CommonResult<()>;
}

/// Recording transport for tests
#[derive(Debug, Default)]
pub struct MockTransport {
    pub persisted: Mutex<Vec<Value>>,
    pub requests: Mutex<Vec<Value>>,
    pub fonts: Vec<FontFamily>,
    pub font_fetches: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fonts(fonts: Vec<FontFamily>) -> Self {
        Self {
            fonts,
            ..Self::default()
        }
    }

    pub fn persist_count(&self) -> usize {
        self.persisted.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn last_persisted(&self) -> Option<Value> {
        self.persisted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    pub fn font_fetch_count(&self) -> usize {
        self.font_fetches.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    async fn persist_breakpoints(&self, payload: Value) -> CommonResult<()> {
        self.persisted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(payload);
        Ok(())
    }

    async fn request(&self, payload: Value) -> CommonResult<Value> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(payload);
        Ok(Value::Null)
    }

    async fn fetch_google_fonts(&self) -> CommonResult<Vec<FontFamily>> {
        self.font_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.fonts.clone())
    }
}

/// Recording cache regenerator for tests
#[derive(Debug, Default)]
pub struct MockCacheRegenerator {
    pub regenerations: AtomicUsize,
}

impl MockCacheRegenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.regenerations.load(Ordering::SeqCst)
    }
}

impl CacheRegenerator for MockCacheRegenerator {
    async fn regenerate_cache(&self) -> CommonResult<()> {
        self.regenerations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
