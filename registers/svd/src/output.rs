// Licensed under the Apache-2.0 license

//! Header emission from a device tree.
//!
//! ## Generated Header Structure
//!
//! ```text
//! #ifndef MACFILE_H__
//! #define MACFILE_H__
//! #define UART_CTRL   0x00001000 /* Control register */
//! #define UART_DATA   0x00001004 /* Data register */
//!
//!
//! #define UART_CTRL_EN_MASK    0x00000001
//! #define UART_CTRL_EN_ALIGN   0
//! #define UART_CTRL_EN_BITS    1
//! #define UART_CTRL_EN_SHIFT   0
//!
//!
//! #endif /* #ifndef MACFILE_H__ */
//!
//! /* End of File */
//! ```
//!
//! The closing comment is the last byte of the file, with no newline after
//! it. Register defines come first, one block per peripheral in base address
//! order. Field defines follow, four per field, for registers that have
//! fields. Names in each section are padded to a common column.

use std::fmt::Write;

use crate::config::HeaderConfig;
use crate::types::{Device, Field, Peripheral, Register};

/// Generate a C header of `#define` macros for every register and field.
pub fn generate_header(device: &Device, config: &HeaderConfig) -> String {
    let guard = &config.include_guard;
    let peripherals = device.peripherals_by_address();
    let mut output = String::new();

    writeln!(output, "#ifndef {guard}").unwrap();
    writeln!(output, "#define {guard}").unwrap();

    generate_register_defines(&peripherals, &mut output);
    writeln!(output).unwrap();
    generate_field_defines(&peripherals, &mut output);

    writeln!(output, "#endif /* #ifndef {guard} */").unwrap();
    writeln!(output).unwrap();
    write!(output, "/* End of File */").unwrap();
    output
}

fn register_macro(peripheral: &Peripheral, register: &Register) -> String {
    format!("{}_{}", peripheral.name, register.name)
}

fn generate_register_defines(peripherals: &[&Peripheral], output: &mut String) {
    let width = peripherals
        .iter()
        .flat_map(|p| p.registers.values().map(move |r| register_macro(p, r).len()))
        .max()
        .unwrap_or(0)
        + 2;

    for peripheral in peripherals {
        let registers = peripheral.registers_by_offset();
        for register in &registers {
            let address = peripheral
                .base_address
                .wrapping_add(register.address_offset);
            writeln!(
                output,
                "#define {:<width$} 0x{address:08x} /* {} */",
                register_macro(peripheral, register),
                register.description
            )
            .unwrap();
        }
        if !registers.is_empty() {
            writeln!(output).unwrap();
        }
    }
}

fn generate_field_defines(peripherals: &[&Peripheral], output: &mut String) {
    // `_SHIFT` and `_ALIGN` are the longest suffixes.
    let width = peripherals
        .iter()
        .flat_map(|p| {
            p.registers.values().flat_map(move |r| {
                r.fields()
                    .iter()
                    .map(move |f| register_macro(p, r).len() + f.name.len() + "__SHIFT".len())
            })
        })
        .max()
        .unwrap_or(0)
        + 2;

    for peripheral in peripherals {
        for register in peripheral.registers_by_offset() {
            if register.fields().is_empty() {
                continue;
            }
            let reg_macro = register_macro(peripheral, register);
            for field in register.fields() {
                generate_field(&reg_macro, field, width, output);
                writeln!(output).unwrap();
            }
            writeln!(output).unwrap();
        }
    }
}

fn generate_field(reg_macro: &str, field: &Field, width: usize, output: &mut String) {
    let prefix = format!("{reg_macro}_{}", field.name);
    let defines = [
        ("MASK", format!("0x{:08x}", field.mask())),
        ("ALIGN", "0".to_string()),
        ("BITS", field.bit_width.to_string()),
        ("SHIFT", field.bit_offset.to_string()),
    ];
    for (suffix, value) in defines {
        writeln!(output, "#define {:<width$} {value}", format!("{prefix}_{suffix}")).unwrap();
    }
}
