// Licensed under the Apache-2.0 license

use anyhow::{Context, Result};
use log::info;
use registers_svd::{generate_header, parse_svd, HeaderConfig};
use std::path::Path;

use crate::io::write_output;

/// Convert an SVD file to a register header.
pub fn convert(svd: &Path, output: Option<&Path>, include_guard: &str) -> Result<()> {
    info!("Reading SVD: {}", svd.display());
    let content = std::fs::read_to_string(svd)
        .with_context(|| format!("Failed to read {}", svd.display()))?;
    let device =
        parse_svd(&content).with_context(|| format!("Failed to parse {}", svd.display()))?;
    info!(
        "Device {}: {} peripherals, {} registers",
        device.name,
        device.peripherals.len(),
        device.register_count()
    );

    let config = HeaderConfig::with_defaults().include_guard(include_guard);
    write_output(output, &generate_header(&device, &config))
}
