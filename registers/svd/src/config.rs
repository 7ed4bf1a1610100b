// Licensed under the Apache-2.0 license

//! Configuration for the two conversion directions.
//!
//! [`DeviceConfig`] names the device built from a header, since a header
//! carries no device-level information of its own. [`HeaderConfig`] controls
//! the header emitted from an SVD document.

/// Device name used when none is given.
pub const DEFAULT_DEVICE_NAME: &str = "Device Name";

/// Device description used when none is given.
pub const DEFAULT_DEVICE_DESCRIPTION: &str = "Device Description";

/// Include guard used when none is given.
pub const DEFAULT_INCLUDE_GUARD: &str = "MACFILE_H__";

/// Device-level metadata for a header conversion.
///
/// # Example
///
/// ```
/// use registers_svd::config::DeviceConfig;
///
/// let config = DeviceConfig::with_defaults().name("BCM7xxx");
/// assert_eq!(config.name, "BCM7xxx");
/// assert_eq!(config.description, "Device Description");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceConfig {
    pub name: String,
    pub description: String,
}

impl DeviceConfig {
    pub fn with_defaults() -> Self {
        Self {
            name: DEFAULT_DEVICE_NAME.to_string(),
            description: DEFAULT_DEVICE_DESCRIPTION.to_string(),
        }
    }

    /// Set the device name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the device description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Settings for header emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderConfig {
    /// Macro guarding against repeated inclusion.
    pub include_guard: String,
}

impl HeaderConfig {
    pub fn with_defaults() -> Self {
        Self {
            include_guard: DEFAULT_INCLUDE_GUARD.to_string(),
        }
    }

    pub fn include_guard(mut self, guard: &str) -> Self {
        self.include_guard = guard.to_string();
        self
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}
