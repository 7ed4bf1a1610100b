// Licensed under the Apache-2.0 license

//! Builds the [`Device`] tree from grouped registers and field tables.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use super::group::PeripheralGroups;
use super::parse::FieldProperties;
use crate::config::DeviceConfig;
use crate::types::{Device, Field, Peripheral, Register};

/// Assemble the device tree.
///
/// Each peripheral's base address is the lowest address among its registers
/// and register offsets are relative to it. Every complete field prefix is
/// attached to the register with the longest macro name `M` such that the
/// prefix starts with `M_`, so with both `FOO_BAR` and `FOO_BAR_EXT`
/// present, `FOO_BAR_EXT_X` goes to `FOO_BAR_EXT` only.
pub fn build_device_tree(
    config: &DeviceConfig,
    groups: &PeripheralGroups,
    fields: &BTreeMap<String, FieldProperties>,
    field_descriptions: &HashMap<String, String>,
) -> Device {
    let mut device = Device::new(&config.name, &config.description);
    let fields_by_owner = assign_fields(groups, fields);

    for (periph_name, regs) in &groups.peripherals {
        let Some(base_address) = regs.iter().map(|r| r.address).min() else {
            continue;
        };
        let mut peripheral = Peripheral::new(
            periph_name,
            base_address,
            &format!("{periph_name} Peripheral"),
        );

        let mut sorted_regs: Vec<_> = regs.iter().collect();
        sorted_regs.sort_by_key(|r| r.address);

        for reg_info in sorted_regs {
            let mut register = Register::new(
                &reg_info.name,
                &reg_info.description,
                reg_info.address - base_address,
            );

            for &(prefix, (bit_offset, bit_width)) in fields_by_owner
                .get(reg_info.macro_name.as_str())
                .into_iter()
                .flatten()
            {
                let field_name = &prefix[reg_info.macro_name.len() + 1..];
                let description = field_descriptions
                    .get(prefix)
                    .map(String::as_str)
                    .unwrap_or(field_name);
                let field = Field::new(field_name, description, bit_offset, bit_width);
                if !field.fits_in(register.size) {
                    warn!(
                        "Dropping field {prefix}: offset {bit_offset} width {bit_width} does not fit a {}-bit register",
                        register.size
                    );
                    continue;
                }
                register.add_field(field);
            }

            peripheral.add_register(register);
        }

        device.add_peripheral(peripheral);
    }

    debug!(
        "Built {} peripherals with {} registers",
        device.peripherals.len(),
        device.register_count()
    );
    device
}

/// Map each register macro to its complete fields, keyed by field prefix.
fn assign_fields<'a>(
    groups: &'a PeripheralGroups,
    fields: &'a BTreeMap<String, FieldProperties>,
) -> HashMap<&'a str, Vec<(&'a str, (u32, u32))>> {
    let mut macros: Vec<&str> = groups.macro_names().collect();
    macros.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut owners: HashMap<&str, Vec<(&str, (u32, u32))>> = HashMap::new();
    for (prefix, props) in fields {
        let Some(position) = props.complete() else {
            continue;
        };
        if let Some(owner) = field_owner(prefix, &macros) {
            owners
                .entry(owner)
                .or_default()
                .push((prefix.as_str(), position));
        }
    }
    owners
}

/// The longest register macro that `prefix` extends with an underscore.
///
/// `macros` must be sorted by descending length.
pub fn field_owner<'a>(prefix: &str, macros: &[&'a str]) -> Option<&'a str> {
    macros.iter().copied().find(|m| {
        prefix
            .strip_prefix(m)
            .is_some_and(|rest| rest.len() > 1 && rest.starts_with('_'))
    })
}
