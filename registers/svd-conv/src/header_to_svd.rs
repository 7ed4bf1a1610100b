// Licensed under the Apache-2.0 license

use anyhow::{Context, Result};
use log::info;
use registers_svd::{generate_svd, read_header, Device, DeviceConfig};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::io::write_output;

/// Convert a header file, or stdin, to SVD.
pub fn convert(
    header: Option<&Path>,
    output: Option<&Path>,
    device_name: &str,
    device_description: &str,
) -> Result<()> {
    let config = DeviceConfig::with_defaults()
        .name(device_name)
        .description(device_description);

    let device = match header {
        Some(path) => {
            info!("Reading header: {}", path.display());
            let file =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            read_header(BufReader::new(file), &config)
                .with_context(|| format!("Failed to read {}", path.display()))?
        }
        None => {
            info!("Reading header from stdin");
            read_header(std::io::stdin().lock(), &config).context("Failed to read stdin")?
        }
    };
    log_device(&device);

    let svd = generate_svd(&device).context("Failed to generate SVD")?;
    write_output(output, &svd)
}

fn log_device(device: &Device) {
    info!(
        "Device {}: {} peripherals, {} registers",
        device.name,
        device.peripherals.len(),
        device.register_count()
    );
}
