// Licensed under the Apache-2.0 license

//! Single pass over the header lines.
//!
//! This module contains [`ParsedHeader`], the intermediate tables filled from
//! the classified lines. The only state carried from one line to the next is
//! an optional [`PendingField`]: the description from the last field comment,
//! waiting for the field macros it documents.

use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;

use log::debug;

use super::classify::{classify_line, qualify, CommentHint, Define, FieldProperty};
use super::fqn::FqnTable;
use crate::error::Result;

/// A register macro before it is placed in a peripheral.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterCandidate {
    /// Absolute address.
    pub address: u64,
    /// Cleaned trailing comment of the define, if there was one.
    pub description: Option<String>,
}

/// Bit position of a field, accumulated from its `_SHIFT` and `_BITS` macros.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldProperties {
    pub bit_offset: Option<u32>,
    pub bit_width: Option<u32>,
}

impl FieldProperties {
    /// `(bit_offset, bit_width)` once both are known.
    pub fn complete(&self) -> Option<(u32, u32)> {
        Some((self.bit_offset?, self.bit_width?))
    }
}

/// A field description waiting for the field macros that follow it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingField {
    /// Consumed by the first field macro whose prefix starts with any of
    /// these. One per qualified name of the commented register.
    pub prefixes: Vec<String>,
    pub description: String,
}

impl PendingField {
    pub fn matches(&self, field_prefix: &str) -> bool {
        self.prefixes.iter().any(|p| field_prefix.starts_with(p.as_str()))
    }
}

/// Tables collected from one header.
#[derive(Clone, Debug, Default)]
pub struct ParsedHeader {
    /// Register macro name to address and description.
    pub registers: BTreeMap<String, RegisterCandidate>,
    /// Field prefix to bit position.
    pub fields: BTreeMap<String, FieldProperties>,
    /// Field prefix to description.
    pub field_descriptions: HashMap<String, String>,
    /// Register names recovered from comments.
    pub fqns: FqnTable,
}

impl ParsedHeader {
    /// Parse header lines in order.
    pub fn parse<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut parsed = ParsedHeader::default();
        let mut pending = None;
        for line in lines {
            pending = parsed.process_line(line, pending);
        }
        parsed.log_summary();
        parsed
    }

    /// Parse a header from a reader. Fails only if the reader does.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut parsed = ParsedHeader::default();
        let mut pending = None;
        for line in reader.lines() {
            pending = parsed.process_line(&line?, pending);
        }
        parsed.log_summary();
        Ok(parsed)
    }

    /// Process one line and return the pending field context for the next.
    pub fn process_line(
        &mut self,
        line: &str,
        pending: Option<PendingField>,
    ) -> Option<PendingField> {
        let classified = classify_line(line);
        let mut pending = if classified.resets_context {
            None
        } else {
            pending
        };

        match classified.define {
            Some(Define::FieldProperty {
                prefix,
                property,
                value,
            }) => {
                self.add_field_property(prefix, property, value);
                if pending.as_ref().is_some_and(|p| p.matches(prefix)) {
                    if let Some(p) = pending.take() {
                        self.field_descriptions
                            .entry(prefix.to_string())
                            .or_insert(p.description);
                    }
                }
            }
            Some(Define::Register {
                name,
                address,
                description,
            }) => {
                self.registers.insert(
                    name.to_string(),
                    RegisterCandidate {
                        address,
                        description,
                    },
                );
            }
            Some(Define::Constant) | None => {}
        }

        match classified.comment {
            Some(CommentHint::Field {
                peripheral,
                register,
                field,
                description,
                ..
            }) => {
                let mut prefixes = Vec::new();
                for (fqn, register_name) in qualify(&peripheral, &register) {
                    self.fqns.record(&fqn, &peripheral, &register_name, None);
                    prefixes.push(match &field {
                        Some(field) => format!("{fqn}_{field}"),
                        None => fqn,
                    });
                }
                pending = Some(PendingField {
                    prefixes,
                    description,
                });
            }
            Some(CommentHint::Register {
                peripheral,
                register,
                description,
            }) => {
                for (fqn, register_name) in qualify(&peripheral, &register) {
                    self.fqns
                        .record(&fqn, &peripheral, &register_name, description.as_deref());
                }
            }
            None => {}
        }

        pending
    }

    fn add_field_property(&mut self, prefix: &str, property: FieldProperty, value: u64) {
        let Ok(value) = u32::try_from(value) else {
            return;
        };
        match property {
            FieldProperty::Shift => {
                self.fields.entry(prefix.to_string()).or_default().bit_offset = Some(value)
            }
            FieldProperty::Bits => {
                self.fields.entry(prefix.to_string()).or_default().bit_width = Some(value)
            }
            // Both follow from offset and width.
            FieldProperty::Align | FieldProperty::Mask => {}
        }
    }

    fn log_summary(&self) {
        debug!(
            "Parsed {} register macros, {} field prefixes, {} qualified names",
            self.registers.len(),
            self.fields.len(),
            self.fqns.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_context_is_consumed_once() {
        let parsed = ParsedHeader::parse([
            "/* UART :: CTRL :: Enable bit [0:0] */",
            "#define UART_CTRL_ENABLE_SHIFT 0",
            "#define UART_CTRL_ENABLE_BITS 1",
            "#define UART_CTRL_MODE_SHIFT 1",
            "#define UART_CTRL_MODE_BITS 2",
        ]);
        assert_eq!(
            parsed.field_descriptions.get("UART_CTRL_ENABLE").map(String::as_str),
            Some("Enable bit")
        );
        assert!(!parsed.field_descriptions.contains_key("UART_CTRL_MODE"));
    }

    #[test]
    fn test_pending_context_reset_by_other_lines() {
        let parsed = ParsedHeader::parse([
            "/* UART :: CTRL :: Enable bit [0:0] */",
            "",
            "/* unrelated comment */",
            "#define UART_CTRL_ENABLE_SHIFT 0",
            "/* UART :: CTRL :: Mode [2:1] */",
            "#if 0",
            "#define UART_CTRL_MODE_SHIFT 1",
        ]);
        assert_eq!(
            parsed.field_descriptions.get("UART_CTRL_ENABLE").map(String::as_str),
            Some("Enable bit")
        );
        assert!(!parsed.field_descriptions.contains_key("UART_CTRL_MODE"));
    }

    #[test]
    fn test_pending_context_requires_prefix_match() {
        let parsed = ParsedHeader::parse([
            "/* UART :: STAT :: Busy [0:0] */",
            "#define UART_CTRL_ENABLE_SHIFT 0",
            "#define UART_STAT_BUSY_SHIFT 0",
        ]);
        assert!(!parsed.field_descriptions.contains_key("UART_CTRL_ENABLE"));
        assert_eq!(
            parsed.field_descriptions.get("UART_STAT_BUSY").map(String::as_str),
            Some("Busy")
        );
    }

    #[test]
    fn test_process_line_threads_context() {
        let mut parsed = ParsedHeader::default();
        let pending = parsed.process_line("/* UART :: CTRL :: Enable [0:0] */", None);
        assert_eq!(
            pending,
            Some(PendingField {
                prefixes: vec!["UART_CTRL".to_string()],
                description: "Enable".to_string(),
            })
        );
        let pending = parsed.process_line("#define UART_CTRL_EN_MASK 0x1", pending);
        assert_eq!(pending, None);
        assert_eq!(
            parsed.field_descriptions.get("UART_CTRL_EN").map(String::as_str),
            Some("Enable")
        );
    }

    #[test]
    fn test_field_properties_accumulate() {
        let parsed = ParsedHeader::parse([
            "#define UART_CTRL_MODE_MASK 0x00000006",
            "#define UART_CTRL_MODE_ALIGN 0",
            "#define UART_CTRL_MODE_BITS 2",
            "#define UART_CTRL_MODE_SHIFT 1",
            "#define UART_CTRL_HALF_SHIFT 7",
        ]);
        assert_eq!(parsed.fields["UART_CTRL_MODE"].complete(), Some((1, 2)));
        assert_eq!(parsed.fields["UART_CTRL_HALF"].complete(), None);
        assert!(parsed.registers.is_empty());
    }

    #[test]
    fn test_register_candidates() {
        let parsed = ParsedHeader::parse([
            "#define UART_CTRL 0x00001000 /* Control Register */",
            "#define UART_DATA 0x00001004",
            "#define UART_FIFO_DEPTH 16",
            "#define UART_INTR_MASK 0x00001008 /* Interrupt Mask Register */",
        ]);
        assert_eq!(parsed.registers.len(), 3);
        assert_eq!(
            parsed.registers["UART_CTRL"],
            RegisterCandidate {
                address: 0x1000,
                description: Some("Control".to_string()),
            }
        );
        assert_eq!(parsed.registers["UART_DATA"].description, None);
        assert_eq!(parsed.registers["UART_INTR_MASK"].address, 0x1008);
    }

    #[test]
    fn test_comments_record_fqns() {
        let parsed = ParsedHeader::parse([
            "/* UART :: CTRL */",
            "/* UART :: UART_STAT :: Status register */",
            "/* SPI :: CFG :: Clock polarity [0:0] */",
            "/* UART :: CTRL :: Control again */",
        ]);
        let fqns: Vec<_> = parsed.fqns.entries().iter().map(|e| e.fqn.as_str()).collect();
        assert_eq!(fqns, ["UART_CTRL", "UART_UART_STAT", "UART_STAT", "SPI_CFG"]);
        let literal = parsed.fqns.get("UART_UART_STAT").unwrap();
        assert_eq!(literal.register, "UART_STAT");
        let stat = parsed.fqns.get("UART_STAT").unwrap();
        assert_eq!(stat.register, "STAT");
        assert_eq!(stat.description.as_deref(), Some("Status register"));
        assert_eq!(
            parsed.fqns.get("UART_CTRL").unwrap().description.as_deref(),
            Some("Control again")
        );
    }

    #[test]
    fn test_from_reader() {
        let input = "#define UART_CTRL 0x1000\n#define UART_CTRL_EN_SHIFT 0\r\n";
        let parsed = ParsedHeader::from_reader(input.as_bytes()).unwrap();
        assert_eq!(parsed.registers["UART_CTRL"].address, 0x1000);
        assert_eq!(parsed.fields["UART_CTRL_EN"].bit_offset, Some(0));
    }

    #[test]
    fn test_repeated_peripheral_prefix_keeps_both_names() {
        let parsed = ParsedHeader::parse([
            "#define INTR_INTR_STATUS 0x00700000",
            "/* INTR :: INTR_STATUS :: L1_UART_INTR [31:31] */",
            "#define INTR_INTR_STATUS_L1_UART_INTR_MASK  0x80000000",
            "#define INTR_INTR_STATUS_L1_UART_INTR_BITS  1",
            "#define INTR_INTR_STATUS_L1_UART_INTR_SHIFT 31",
            "/* INTR :: INTR_CTRL :: ENABLE :: Enable [0:0] */",
            "#define INTR_CTRL_ENABLE_SHIFT 0",
        ]);
        let literal = parsed.fqns.get("INTR_INTR_STATUS").unwrap();
        assert_eq!(
            (literal.peripheral.as_str(), literal.register.as_str()),
            ("INTR", "INTR_STATUS")
        );
        assert_eq!(parsed.fqns.get("INTR_STATUS").unwrap().register, "STATUS");
        assert_eq!(
            parsed
                .field_descriptions
                .get("INTR_INTR_STATUS_L1_UART_INTR")
                .map(String::as_str),
            Some("L1_UART_INTR")
        );
        // The shorter spelling consumes the description too.
        assert_eq!(
            parsed.field_descriptions.get("INTR_CTRL_ENABLE").map(String::as_str),
            Some("Enable")
        );
    }
}
