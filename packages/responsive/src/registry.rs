//! # Breakpoint Registry
//!
//! Ordered set of named viewport breakpoints plus the preview UI state
//! that depends on them (active device, scaling, preview width).
//!
//! Structural changes follow a fixed two-step effect sequence: persist the
//! full breakpoint list through the transport, then ask the cache
//! collaborator to regenerate generated stylesheets so stale
//! per-breakpoint CSS isn't served. Width updates that change nothing
//! short-circuit and issue neither call.
//!
//! In-memory state is always ahead of backend-persisted state: persists
//! are awaited sequentially inside the triggering action and each one
//! ships the complete list, so overlapping edits resolve last-write-wins
//! server-side.

use crate::devices::{default_devices, ResponsiveDevice};
use crate::errors::ResponsiveResult;
use pagecraft_common::{CacheRegenerator, Transport, UidGenerator};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Preview widths below this make no sense for any device
const MIN_PREVIEW_WIDTH: u32 = 240;

/// Registry of responsive devices for one editing session
#[derive(Debug)]
pub struct BreakpointRegistry<T: Transport, C: CacheRegenerator> {
    transport: T,
    cache: C,
    devices: Vec<ResponsiveDevice>,
    active_device_id: String,
    auto_scale: bool,
    scale: u32,
    iframe_width: Option<u32>,
    uid_gen: UidGenerator,
}

impl<T: Transport, C: CacheRegenerator> BreakpointRegistry<T, C> {
    /// Create a registry from the backend-supplied device list; an empty
    /// list falls back to the stock set
    pub fn new(
        transport: T,
        cache: C,
        devices: Vec<ResponsiveDevice>,
        session_key: &str,
    ) -> Self {
        let devices = if devices.is_empty() {
            default_devices()
        } else {
            devices
        };

        Self {
            transport,
            cache,
            devices,
            active_device_id: "default".to_string(),
            auto_scale: true,
            scale: 100,
            iframe_width: None,
            uid_gen: UidGenerator::new(session_key),
        }
    }

    pub fn devices(&self) -> &[ResponsiveDevice] {
        &self.devices
    }

    pub fn active_device_id(&self) -> &str {
        &self.active_device_id
    }

    /// The active device, falling back to the first registered device for
    /// an unknown id
    pub fn active_device_info(&self) -> Option<&ResponsiveDevice> {
        self.devices
            .iter()
            .find(|device| device.id == self.active_device_id)
            .or_else(|| self.devices.first())
    }

    // ---------------------------------------------------------------
    // UI state

    pub fn set_active_device(&mut self, id: impl Into<String>) {
        self.active_device_id = id.into();
    }

    /// Enable or disable automatic preview scaling; enabling re-pins the
    /// scale to 100%
    pub fn set_auto_scale(&mut self, enabled: bool) {
        self.auto_scale = enabled;

        if enabled {
            self.scale = 100;
        }
    }

    pub fn auto_scale_active(&self) -> bool {
        self.auto_scale
    }

    pub fn set_custom_scale(&mut self, percent: u32) {
        self.scale = percent;
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Set the preview width, clamped to a sane floor. With
    /// `change_device` the active device switches to the narrowest device
    /// at least as wide as the requested width.
    pub fn set_custom_iframe_width(&mut self, new_width: u32, change_device: bool) {
        let actual_width = new_width.max(MIN_PREVIEW_WIDTH);

        if change_device {
            let mut active = "default".to_string();
            for device in self.ordered_devices() {
                if device.width.is_some_and(|width| width >= actual_width) {
                    active = device.id.clone();
                }
            }

            if active != self.active_device_id {
                self.set_active_device(active);
            }
        }

        self.iframe_width = Some(actual_width);
    }

    pub fn iframe_width(&self) -> Option<u32> {
        self.iframe_width
    }

    // ---------------------------------------------------------------
    // Derived views

    /// Desktop-first ordering: width descending, width-less (unbounded
    /// desktop) devices first
    pub fn ordered_devices(&self) -> Vec<&ResponsiveDevice> {
        let mut devices: Vec<&ResponsiveDevice> = self.devices.iter().collect();
        devices.sort_by(|a, b| match (a.width, b.width) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => y.cmp(&x),
        });
        devices
    }

    /// Device id → desktop-first width, in cascade order
    pub fn devices_as_id_width(&self) -> Vec<(String, Option<u32>)> {
        self.ordered_devices()
            .into_iter()
            .map(|device| (device.id.clone(), device.width))
            .collect()
    }

    /// Complementary mobile-first minimum widths derived from the
    /// desktop-first breakpoints: ascending by width, the lowest device
    /// pinned to 0, each subsequent device's minimum set to the previous
    /// device's width + 1
    pub fn mobile_first_map(&self) -> HashMap<String, u32> {
        let mut sorted: Vec<&ResponsiveDevice> = self.devices.iter().collect();
        sorted.sort_by(|a, b| match (a.width, b.width) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => x.cmp(&y),
        });

        let mut map = HashMap::new();
        let mut last_width: Option<u32> = None;

        for device in sorted {
            let min_width = match last_width {
                None => 0,
                Some(width) => width + 1,
            };
            map.insert(device.id.clone(), min_width);

            if let Some(width) = device.width {
                last_width = Some(width);
            }
        }

        map
    }

    pub fn built_in_devices(&self) -> Vec<&ResponsiveDevice> {
        self.devices.iter().filter(|device| device.built_in).collect()
    }

    // ---------------------------------------------------------------
    // Structural changes

    /// Change a breakpoint's width. Persists the list and regenerates the
    /// cache only when the width actually changed; returns whether it did.
    pub async fn update_breakpoint(&mut self, id: &str, new_width: u32) -> ResponsiveResult<bool> {
        let Some(device) = self.devices.iter_mut().find(|device| device.id == id) else {
            return Ok(false);
        };

        if device.width == Some(new_width) {
            return Ok(false);
        }

        device.width = Some(new_width);
        debug!(id = %id, width = new_width, "updated breakpoint");

        self.save_devices().await?;
        self.cache.regenerate_cache().await?;

        Ok(true)
    }

    /// Append a custom breakpoint with a generated id. Not persisted —
    /// the caller decides when to save.
    pub fn add_custom_breakpoint(
        &mut self,
        width: Option<u32>,
        icon: Option<String>,
    ) -> ResponsiveDevice {
        let device = ResponsiveDevice {
            id: self.uid_gen.new_uid(),
            width,
            icon: icon.unwrap_or_else(|| "desktop".to_string()),
            is_custom: true,
            ..ResponsiveDevice::default()
        };

        self.devices.push(device.clone());
        device
    }

    /// Delete a breakpoint by id, then persist and regenerate. Built-in
    /// devices are refused; returns whether a device was removed.
    pub async fn delete_breakpoint(&mut self, id: &str) -> ResponsiveResult<bool> {
        let Some(position) = self.devices.iter().position(|device| device.id == id) else {
            return Ok(false);
        };

        if self.devices[position].built_in {
            warn!(id = %id, "refusing to delete built-in breakpoint");
            return Ok(false);
        }

        self.devices.remove(position);
        debug!(id = %id, "deleted breakpoint");

        self.save_devices().await?;
        self.cache.regenerate_cache().await?;

        Ok(true)
    }

    /// Persist the full current breakpoint list through the transport
    pub async fn save_devices(&self) -> ResponsiveResult<()> {
        let payload = serde_json::to_value(&self.devices)?;
        self.transport.persist_breakpoints(payload).await?;
        Ok(())
    }
}
