// Licensed under the Apache-2.0 license

//! Device tree shared by both conversion directions.
//!
//! ```text
//! Device
//! └── peripherals: BTreeMap<String, Peripheral>
//!     └── registers: BTreeMap<String, Register>
//!         └── fields: Vec<Field>   # unique by name, ordered by bit offset
//! ```
//!
//! Every level owns the level below it exclusively. Peripherals and registers
//! are keyed by name, so a second insertion under the same name replaces the
//! first one.

use std::collections::BTreeMap;

/// Width of every register produced from a header, in bits.
pub const REGISTER_SIZE: u32 = 32;

//=============================================================================
// Field
//=============================================================================

/// A bit field within a register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub description: String,
    /// Least significant bit of the field.
    pub bit_offset: u32,
    /// Number of bits, at least 1.
    pub bit_width: u32,
}

impl Field {
    pub fn new(name: &str, description: &str, bit_offset: u32, bit_width: u32) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            bit_offset,
            bit_width,
        }
    }

    /// Bit mask of the field in register position.
    pub fn mask(&self) -> u64 {
        let ones = if self.bit_width >= 64 {
            u64::MAX
        } else {
            (1u64 << self.bit_width) - 1
        };
        ones.checked_shl(self.bit_offset).unwrap_or(0)
    }

    /// Returns true if the field lies within a register of `size` bits.
    pub fn fits_in(&self, size: u32) -> bool {
        self.bit_width >= 1
            && self
                .bit_offset
                .checked_add(self.bit_width)
                .is_some_and(|end| end <= size)
    }
}

//=============================================================================
// Register
//=============================================================================

/// A register placed at an offset from its peripheral's base address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Register {
    pub name: String,
    pub description: String,
    /// Byte offset from the peripheral base address.
    pub address_offset: u64,
    /// Width in bits.
    pub size: u32,
    fields: Vec<Field>,
}

impl Register {
    pub fn new(name: &str, description: &str, address_offset: u64) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            address_offset,
            size: REGISTER_SIZE,
            fields: Vec::new(),
        }
    }

    /// Add a field, replacing any existing field with the same name.
    pub fn add_field(&mut self, field: Field) {
        self.fields.retain(|f| f.name != field.name);
        let index = self
            .fields
            .partition_point(|f| (f.bit_offset, &f.name) <= (field.bit_offset, &field.name));
        self.fields.insert(index, field);
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields ordered by ascending bit offset, ties broken by name.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

//=============================================================================
// Peripheral
//=============================================================================

/// A peripheral: a named block of registers at a base address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Peripheral {
    pub name: String,
    /// Absolute address of the lowest register.
    pub base_address: u64,
    pub description: String,
    pub registers: BTreeMap<String, Register>,
}

impl Peripheral {
    pub fn new(name: &str, base_address: u64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            base_address,
            description: description.to_string(),
            registers: BTreeMap::new(),
        }
    }

    pub fn add_register(&mut self, register: Register) {
        self.registers.insert(register.name.clone(), register);
    }

    /// Registers ordered by ascending offset, ties broken by name.
    pub fn registers_by_offset(&self) -> Vec<&Register> {
        let mut sorted: Vec<&Register> = self.registers.values().collect();
        sorted.sort_by_key(|r| r.address_offset);
        sorted
    }
}

//=============================================================================
// Device
//=============================================================================

/// Root of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub description: String,
    pub peripherals: BTreeMap<String, Peripheral>,
}

impl Device {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            peripherals: BTreeMap::new(),
        }
    }

    pub fn add_peripheral(&mut self, peripheral: Peripheral) {
        self.peripherals.insert(peripheral.name.clone(), peripheral);
    }

    /// Look up a register by peripheral and register name.
    pub fn register(&self, peripheral: &str, register: &str) -> Option<&Register> {
        self.peripherals.get(peripheral)?.registers.get(register)
    }

    pub fn register_count(&self) -> usize {
        self.peripherals.values().map(|p| p.registers.len()).sum()
    }

    /// Peripherals ordered by ascending base address, ties broken by name.
    pub fn peripherals_by_address(&self) -> Vec<&Peripheral> {
        let mut sorted: Vec<&Peripheral> = self.peripherals.values().collect();
        sorted.sort_by_key(|p| p.base_address);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_mask() {
        assert_eq!(Field::new("EN", "", 0, 1).mask(), 0x1);
        assert_eq!(Field::new("MODE", "", 4, 3).mask(), 0x70);
        assert_eq!(Field::new("ALL", "", 0, 32).mask(), 0xffff_ffff);
    }

    #[test]
    fn test_field_fits_in() {
        assert!(Field::new("TOP", "", 31, 1).fits_in(32));
        assert!(!Field::new("OVER", "", 31, 2).fits_in(32));
        assert!(!Field::new("EMPTY", "", 0, 0).fits_in(32));
    }

    #[test]
    fn test_add_field_replaces_by_name() {
        let mut reg = Register::new("CTRL", "Control", 0);
        reg.add_field(Field::new("EN", "first", 0, 1));
        reg.add_field(Field::new("MODE", "mode", 1, 2));
        reg.add_field(Field::new("EN", "second", 3, 1));
        assert_eq!(reg.fields().len(), 2);
        assert_eq!(reg.field("EN").unwrap().description, "second");
        let names: Vec<_> = reg.fields().iter().map(|f| &f.name).collect();
        assert_eq!(names, ["MODE", "EN"]);
    }

    #[test]
    fn test_device_lookup() {
        let mut periph = Peripheral::new("UART", 0x1000, "UART Peripheral");
        periph.add_register(Register::new("CTRL", "Control", 0));
        periph.add_register(Register::new("STAT", "Status", 4));
        let mut device = Device::new("dev", "desc");
        device.add_peripheral(periph);
        assert_eq!(device.register_count(), 2);
        assert_eq!(device.register("UART", "STAT").unwrap().address_offset, 4);
        assert!(device.register("UART", "DATA").is_none());
        assert!(device.register("SPI", "CTRL").is_none());
    }
}
