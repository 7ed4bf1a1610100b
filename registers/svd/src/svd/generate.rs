// Licensed under the Apache-2.0 license

use xmltree::{Element, EmitterConfig, XMLNode};

use super::{SCHEMA_LOCATION, SCHEMA_VERSION, XS_NAMESPACE};
use crate::error::Result;
use crate::types::{Device, Field, Peripheral, Register};
use crate::util::{base_address_hex, offset_hex};

/// Serialize a device tree as a CMSIS-SVD document.
///
/// Peripherals and registers are written in name order, fields in bit
/// offset order. A register without fields has no `<fields>` element.
pub fn generate_svd(device: &Device) -> Result<String> {
    let mut root = Element::new("device");
    root.attributes
        .insert("schemaVersion".to_string(), SCHEMA_VERSION.to_string());
    root.attributes
        .insert("xmlns:xs".to_string(), XS_NAMESPACE.to_string());
    root.attributes.insert(
        "xs:noNamespaceSchemaLocation".to_string(),
        SCHEMA_LOCATION.to_string(),
    );

    add_elem_with_text(&mut root, "name", &device.name);
    add_elem_with_text(&mut root, "version", "1.0");
    add_elem_with_text(&mut root, "description", &device.description);
    add_elem_with_text(&mut root, "addressUnitBits", "8");
    add_elem_with_text(&mut root, "width", "32");

    let mut peripherals = Element::new("peripherals");
    for peripheral in device.peripherals.values() {
        add_child(&mut peripherals, peripheral_element(peripheral));
    }
    add_child(&mut root, peripherals);

    let config = EmitterConfig::new()
        .perform_indent(true)
        .indent_string("  ");
    let mut out = Vec::new();
    root.write_with_config(&mut out, config)?;
    let mut svd = String::from_utf8(out)?;
    svd.push('\n');
    Ok(svd)
}

fn peripheral_element(peripheral: &Peripheral) -> Element {
    let mut elem = Element::new("peripheral");
    add_elem_with_text(&mut elem, "name", &peripheral.name);
    add_elem_with_text(&mut elem, "description", &peripheral.description);
    add_elem_with_text(
        &mut elem,
        "baseAddress",
        &base_address_hex(peripheral.base_address),
    );

    let mut registers = Element::new("registers");
    for register in peripheral.registers.values() {
        add_child(&mut registers, register_element(register));
    }
    add_child(&mut elem, registers);
    elem
}

fn register_element(register: &Register) -> Element {
    let mut elem = Element::new("register");
    add_elem_with_text(&mut elem, "name", &register.name);
    add_elem_with_text(&mut elem, "description", &register.description);
    add_elem_with_text(
        &mut elem,
        "addressOffset",
        &offset_hex(register.address_offset),
    );
    add_elem_with_text(&mut elem, "size", &register.size.to_string());
    add_elem_with_text(&mut elem, "access", "read-write");

    if !register.fields().is_empty() {
        let mut fields = Element::new("fields");
        for field in register.fields() {
            add_child(&mut fields, field_element(field));
        }
        add_child(&mut elem, fields);
    }
    elem
}

fn field_element(field: &Field) -> Element {
    let mut elem = Element::new("field");
    add_elem_with_text(&mut elem, "name", &field.name);
    add_elem_with_text(&mut elem, "description", &field.description);
    add_elem_with_text(&mut elem, "bitOffset", &field.bit_offset.to_string());
    add_elem_with_text(&mut elem, "bitWidth", &field.bit_width.to_string());
    elem
}

fn add_child(parent: &mut Element, child: Element) {
    parent.children.push(XMLNode::Element(child));
}

fn add_elem_with_text(parent: &mut Element, name: &str, text: &str) {
    let mut elem = Element::new(name);
    elem.children.push(XMLNode::Text(text.to_string()));
    add_child(parent, elem);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uart_device() -> Device {
        let mut ctrl = Register::new("CTRL", "Control register", 0);
        ctrl.add_field(Field::new("MODE", "Mode select", 1, 2));
        ctrl.add_field(Field::new("ENABLE", "Enable bit", 0, 1));
        let mut uart = Peripheral::new("UART", 0x1000, "UART Peripheral");
        uart.add_register(ctrl);
        uart.add_register(Register::new("DATA", "Data & status", 0x1c));
        let mut device = Device::new("Device Name", "Device Description");
        device.add_peripheral(uart);
        device
    }

    #[test]
    fn test_document_header() {
        let svd = generate_svd(&uart_device()).unwrap();
        assert!(svd.starts_with("<?xml version=\"1.0\""));
        assert!(svd.contains(
            "<device schemaVersion=\"1.3\" \
             xmlns:xs=\"http://www.w3.org/2001/XMLSchema-instance\" \
             xs:noNamespaceSchemaLocation=\"CMSIS-SVD.xsd\">"
        ));
        assert!(svd.contains("<version>1.0</version>"));
        assert!(svd.contains("<addressUnitBits>8</addressUnitBits>"));
        assert!(svd.contains("<width>32</width>"));
    }

    #[test]
    fn test_number_formats() {
        let svd = generate_svd(&uart_device()).unwrap();
        assert!(svd.contains("<baseAddress>0x00001000</baseAddress>"));
        assert!(svd.contains("<addressOffset>0x0</addressOffset>"));
        assert!(svd.contains("<addressOffset>0x1C</addressOffset>"));
        assert!(svd.contains("<size>32</size>"));
        assert!(svd.contains("<access>read-write</access>"));
    }

    #[test]
    fn test_fields_sorted_and_omitted_when_empty() {
        let svd = generate_svd(&uart_device()).unwrap();
        let enable = svd.find("<name>ENABLE</name>").unwrap();
        let mode = svd.find("<name>MODE</name>").unwrap();
        assert!(enable < mode);
        assert_eq!(svd.matches("<fields>").count(), 1);
        assert!(svd.contains("<bitOffset>1</bitOffset>"));
        assert!(svd.contains("<bitWidth>2</bitWidth>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let svd = generate_svd(&uart_device()).unwrap();
        assert!(svd.contains("<description>Data &amp; status</description>"));
    }

    #[test]
    fn test_two_space_indent() {
        let svd = generate_svd(&uart_device()).unwrap();
        assert!(svd.contains("\n  <name>Device Name</name>"));
        assert!(svd.contains("\n    <peripheral>"));
    }
}
