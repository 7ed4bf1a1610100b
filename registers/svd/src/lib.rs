// Licensed under the Apache-2.0 license

//! Register header to CMSIS-SVD converter.
//!
//! This crate rebuilds a peripheral/register/field tree from a flat C header
//! of `#define` macros and serializes it as CMSIS-SVD XML. The reverse
//! direction reads an SVD document back into the same tree and emits a
//! header in the same macro style.
//!
//! ## Usage
//!
//! ```
//! use registers_svd::{header_to_device, generate_svd, DeviceConfig};
//!
//! let header = "\
//! /* UART :: UART_CTRL :: Control register */
//! #define UART_CTRL 0x1000
//! /* UART :: UART_CTRL :: ENABLE :: Enable bit [0:0] */
//! #define UART_CTRL_ENABLE_SHIFT 0
//! #define UART_CTRL_ENABLE_BITS 1
//! ";
//! let device = header_to_device(header, &DeviceConfig::with_defaults());
//! assert_eq!(device.peripherals["UART"].base_address, 0x1000);
//!
//! let svd = generate_svd(&device).unwrap();
//! assert!(svd.contains("<baseAddress>0x00001000</baseAddress>"));
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: The device tree ([`Device`], [`Peripheral`], [`Register`], [`Field`])
//! - [`config`]: Device naming and header emission settings
//! - [`header`]: Header parsing, peripheral grouping and tree building
//! - [`svd`]: SVD serialization and parsing
//! - [`output`]: Header emission from a device tree
//! - [`util`]: Integer parsing and hex formatting

pub mod config;
pub mod error;
pub mod header;
pub mod output;
pub mod svd;
pub mod types;
pub mod util;

// Re-export main public API
pub use config::{DeviceConfig, HeaderConfig};
pub use error::{Error, Result};
pub use header::{header_to_device, header_to_svd, read_header};
pub use output::generate_header;
pub use svd::{generate_svd, parse_svd};
pub use types::{Device, Field, Peripheral, Register, REGISTER_SIZE};
