// Licensed under the Apache-2.0 license

//! CMSIS-SVD serialization and parsing.
//!
//! Only the subset of the format that the device tree can represent is
//! written and read: device, peripheral, register and field names,
//! descriptions, addresses and bit positions.

mod generate;
mod parse;

pub use generate::generate_svd;
pub use parse::parse_svd;

/// CMSIS-SVD schema version written to the root element.
pub const SCHEMA_VERSION: &str = "1.3";
/// Namespace URI bound to the `xs` prefix on the root element.
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
/// Schema file named by `xs:noNamespaceSchemaLocation`.
pub const SCHEMA_LOCATION: &str = "CMSIS-SVD.xsd";
