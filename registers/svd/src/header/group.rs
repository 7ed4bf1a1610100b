// Licensed under the Apache-2.0 license

//! Assigns register macros to peripherals.
//!
//! A macro whose name was recorded from a comment is placed directly. Any
//! other macro takes the peripheral of the longest recorded name it starts
//! with. Checking longest names first keeps a short name (a bare peripheral
//! prefix, say) from claiming registers that a more specific name covers.

use std::collections::BTreeMap;

use log::{debug, warn};

use super::fqn::{FqnEntry, FqnTable};
use super::parse::RegisterCandidate;

/// A register macro placed in a peripheral.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupedRegister {
    /// Register name within the peripheral.
    pub name: String,
    /// Absolute address.
    pub address: u64,
    pub description: String,
    /// The macro the register came from.
    pub macro_name: String,
}

/// Registers grouped by peripheral name.
#[derive(Clone, Debug, Default)]
pub struct PeripheralGroups {
    pub peripherals: BTreeMap<String, Vec<GroupedRegister>>,
    /// Macros that could not be attributed to any peripheral.
    pub unattributed: Vec<String>,
}

impl PeripheralGroups {
    /// Macro names of every grouped register.
    pub fn macro_names(&self) -> impl Iterator<Item = &str> {
        self.peripherals
            .values()
            .flatten()
            .map(|r| r.macro_name.as_str())
    }
}

/// Group register macros by peripheral.
///
/// Unattributable macros are logged and left out; they never fail the run.
pub fn group_registers_by_peripheral(
    registers: &BTreeMap<String, RegisterCandidate>,
    fqns: &FqnTable,
) -> PeripheralGroups {
    let mut groups = PeripheralGroups::default();
    let by_length = fqns.by_length_desc();

    for (macro_name, candidate) in registers {
        let Some((peripheral, register, comment_description)) =
            resolve(macro_name, fqns, &by_length)
        else {
            warn!("Could not determine peripheral for register {macro_name}");
            groups.unattributed.push(macro_name.clone());
            continue;
        };

        let description = candidate
            .description
            .clone()
            .or(comment_description)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| match candidate.description {
                // An empty define comment falls back to the register name.
                Some(_) => register.clone(),
                None => macro_name.clone(),
            });

        groups
            .peripherals
            .entry(peripheral)
            .or_default()
            .push(GroupedRegister {
                name: register,
                address: candidate.address,
                description,
                macro_name: macro_name.clone(),
            });
    }

    groups
}

/// Returns `(peripheral, register, comment description)` for a macro.
fn resolve(
    macro_name: &str,
    fqns: &FqnTable,
    by_length: &[&FqnEntry],
) -> Option<(String, String, Option<String>)> {
    if let Some(entry) = fqns.get(macro_name) {
        return Some((
            entry.peripheral.clone(),
            entry.register.clone(),
            entry.description.clone(),
        ));
    }

    let entry = by_length
        .iter()
        .find(|entry| macro_name.starts_with(entry.fqn.as_str()))?;
    let register = macro_name
        .strip_prefix(entry.peripheral.as_str())
        .and_then(|rest| rest.strip_prefix('_'))
        .filter(|rest| !rest.is_empty())?;
    debug!(
        "Register {macro_name} matched {} by prefix, placing it in {}",
        entry.fqn, entry.peripheral
    );
    Some((entry.peripheral.clone(), register.to_string(), None))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(address: u64, description: Option<&str>) -> RegisterCandidate {
        RegisterCandidate {
            address,
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn test_direct_match() {
        let mut fqns = FqnTable::new();
        fqns.record("UART_CTRL", "UART", "CTRL", Some("Control register"));
        let registers = BTreeMap::from([("UART_CTRL".to_string(), candidate(0x1000, None))]);
        let groups = group_registers_by_peripheral(&registers, &fqns);
        assert_eq!(
            groups.peripherals["UART"],
            vec![GroupedRegister {
                name: "CTRL".to_string(),
                address: 0x1000,
                description: "Control register".to_string(),
                macro_name: "UART_CTRL".to_string(),
            }]
        );
        assert!(groups.unattributed.is_empty());
    }

    #[test]
    fn test_define_comment_takes_precedence() {
        let mut fqns = FqnTable::new();
        fqns.record("UART_CTRL", "UART", "CTRL", Some("From comment"));
        let registers =
            BTreeMap::from([("UART_CTRL".to_string(), candidate(0x1000, Some("From define")))]);
        let groups = group_registers_by_peripheral(&registers, &fqns);
        assert_eq!(groups.peripherals["UART"][0].description, "From define");
    }

    #[test]
    fn test_description_fallbacks() {
        let mut fqns = FqnTable::new();
        fqns.record("UART_CTRL", "UART", "CTRL", None);
        fqns.record("UART_STAT", "UART", "STAT", None);
        let registers = BTreeMap::from([
            ("UART_CTRL".to_string(), candidate(0x1000, None)),
            ("UART_STAT".to_string(), candidate(0x1004, Some(""))),
        ]);
        let groups = group_registers_by_peripheral(&registers, &fqns);
        let uart = &groups.peripherals["UART"];
        assert_eq!(uart[0].description, "UART_CTRL");
        assert_eq!(uart[1].description, "STAT");
    }

    #[test]
    fn test_fallback_uses_longest_prefix() {
        let mut fqns = FqnTable::new();
        fqns.record("FOO_BAR", "FOO", "BAR", None);
        fqns.record("FOO_BAR_BAZ", "FOOX", "BAZ", None);
        let registers = BTreeMap::from([
            ("FOO_BAR_REV".to_string(), candidate(0x10, None)),
            ("FOO_BAR_BAZ_HI".to_string(), candidate(0x20, None)),
        ]);
        let groups = group_registers_by_peripheral(&registers, &fqns);
        assert_eq!(groups.peripherals["FOO"][0].macro_name, "FOO_BAR_REV");
        assert_eq!(groups.peripherals["FOO"][0].name, "BAR_REV");
        // FOOX is not a prefix of the macro, so no register name can be derived.
        assert_eq!(groups.unattributed, ["FOO_BAR_BAZ_HI"]);
    }

    #[test]
    fn test_fallback_register_name_strips_peripheral() {
        let mut fqns = FqnTable::new();
        fqns.record("FOO_BAR", "FOO", "BAR", None);
        let registers = BTreeMap::from([("FOO_BAR_BAZ".to_string(), candidate(0x8, None))]);
        let groups = group_registers_by_peripheral(&registers, &fqns);
        let reg = &groups.peripherals["FOO"][0];
        assert_eq!(reg.name, "BAR_BAZ");
        assert_eq!(reg.description, "FOO_BAR_BAZ");
    }

    #[test]
    fn test_unattributable_register_is_dropped() {
        let mut fqns = FqnTable::new();
        fqns.record("UART_CTRL", "UART", "CTRL", None);
        let registers = BTreeMap::from([
            ("UART_CTRL".to_string(), candidate(0x1000, None)),
            ("GPIO_DATA".to_string(), candidate(0x2000, None)),
        ]);
        let groups = group_registers_by_peripheral(&registers, &fqns);
        assert_eq!(groups.peripherals.len(), 1);
        assert_eq!(groups.unattributed, ["GPIO_DATA"]);
        assert_eq!(groups.macro_names().collect::<Vec<_>>(), ["UART_CTRL"]);
    }
}
