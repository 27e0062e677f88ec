//! Responsive device model
//!
//! A device is a named viewport-width breakpoint. Widths are desktop-first
//! maxima; the complementary mobile-first minima are derived by the
//! registry. The `default` device carries no width — it is the unbounded
//! desktop view.

use serde::{Deserialize, Serialize};

/// One viewport breakpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsiveDevice {
    /// Stable key: built-in name, or a generated UID for custom devices
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub built_in: bool,
}

impl ResponsiveDevice {
    fn built_in(id: &str, width: Option<u32>, icon: &str, is_default: bool) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            width,
            height: None,
            icon: icon.to_string(),
            is_custom: false,
            is_default,
            built_in: true,
        }
    }
}

/// The stock device set used when the backend supplies none
pub fn default_devices() -> Vec<ResponsiveDevice> {
    vec![
        ResponsiveDevice::built_in("default", None, "desktop", true),
        ResponsiveDevice::built_in("laptop", Some(992), "laptop", false),
        ResponsiveDevice::built_in("tablet", Some(768), "tablet", false),
        ResponsiveDevice::built_in("mobile", Some(575), "mobile", false),
    ]
}
