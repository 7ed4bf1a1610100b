// Licensed under the Apache-2.0 license

//! Header to device tree conversion.
//!
//! The conversion runs in three steps, each consuming the previous one's
//! output:
//!
//! ```text
//! header lines ──parse──▶ ParsedHeader ──group──▶ PeripheralGroups ──build──▶ Device
//! ```
//!
//! - `classify`: pure per-line verdicts (define kind, comment naming hints)
//! - `parse`: the single pass that fills the intermediate tables
//! - `group`: places register macros in peripherals
//! - `build`: assembles the tree and attaches fields to registers

pub mod build;
pub mod classify;
pub mod fqn;
pub mod group;
pub mod parse;

use std::io::BufRead;

pub use build::build_device_tree;
pub use group::{group_registers_by_peripheral, GroupedRegister, PeripheralGroups};
pub use parse::{FieldProperties, ParsedHeader, PendingField, RegisterCandidate};

use crate::config::DeviceConfig;
use crate::error::Result;
use crate::svd::generate_svd;
use crate::types::Device;

impl ParsedHeader {
    /// Group the parsed registers and build the device tree.
    pub fn into_device(self, config: &DeviceConfig) -> Device {
        let groups = group_registers_by_peripheral(&self.registers, &self.fqns);
        build_device_tree(config, &groups, &self.fields, &self.field_descriptions)
    }
}

/// Build a device tree from header text.
pub fn header_to_device(header: &str, config: &DeviceConfig) -> Device {
    ParsedHeader::parse(header.lines()).into_device(config)
}

/// Build a device tree from a header reader.
pub fn read_header<R: BufRead>(reader: R, config: &DeviceConfig) -> Result<Device> {
    Ok(ParsedHeader::from_reader(reader)?.into_device(config))
}

/// Convert header text straight to SVD XML.
pub fn header_to_svd(header: &str, config: &DeviceConfig) -> Result<String> {
    generate_svd(&header_to_device(header, config))
}
