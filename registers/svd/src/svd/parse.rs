// Licensed under the Apache-2.0 license

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use xmltree::{Element, XMLNode};

use crate::error::{Error, Result};
use crate::types::{Device, Field, Peripheral, Register, REGISTER_SIZE};
use crate::util::parse_int;

static BIT_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\s*(\d+)\s*:\s*(\d+)\s*\]$").unwrap());

/// Read a CMSIS-SVD document into a device tree.
///
/// The device needs a `<name>`, each peripheral a `<name>` and a
/// `<baseAddress>`, each register a `<name>` and an `<addressOffset>`.
/// A field's position may be given as `<bitOffset>`/`<bitWidth>`,
/// `<lsb>`/`<msb>` or `<bitRange>`.
pub fn parse_svd(svd: &str) -> Result<Device> {
    let root = Element::parse(svd.as_bytes())?;
    let name = required_text(&root, "device", "name")?;
    let description = child_text(&root, "description").unwrap_or_default();
    let mut device = Device::new(&name, &description);

    if let Some(peripherals) = root.get_child("peripherals") {
        for elem in child_elements(peripherals, "peripheral") {
            device.add_peripheral(parse_peripheral(elem)?);
        }
    }

    debug!(
        "Read {} peripherals with {} registers from SVD device {}",
        device.peripherals.len(),
        device.register_count(),
        device.name
    );
    Ok(device)
}

fn parse_peripheral(elem: &Element) -> Result<Peripheral> {
    let name = required_text(elem, "peripheral", "name")?;
    let context = format!("peripheral {name}");
    let base_address = required_int(elem, &context, "baseAddress")?;
    let description =
        child_text(elem, "description").unwrap_or_else(|| format!("{name} Peripheral"));

    let mut peripheral = Peripheral::new(&name, base_address, &description);
    if let Some(registers) = elem.get_child("registers") {
        for reg_elem in child_elements(registers, "register") {
            peripheral.add_register(parse_register(reg_elem, &name)?);
        }
    }
    Ok(peripheral)
}

fn parse_register(elem: &Element, peripheral: &str) -> Result<Register> {
    let name = required_text(elem, &format!("register in {peripheral}"), "name")?;
    let context = format!("register {peripheral}_{name}");
    let address_offset = required_int(elem, &context, "addressOffset")?;
    let description = child_text(elem, "description").unwrap_or_else(|| name.clone());

    let mut register = Register::new(&name, &description, address_offset);
    if let Some(size) = optional_u32(elem, &context, "size")? {
        register.size = size;
    }
    if let Some(fields) = elem.get_child("fields") {
        for field_elem in child_elements(fields, "field") {
            register.add_field(parse_field(field_elem, &context)?);
        }
    }
    Ok(register)
}

fn parse_field(elem: &Element, register: &str) -> Result<Field> {
    let name = required_text(elem, &format!("field in {register}"), "name")?;
    let context = format!("field {name} in {register}");
    let (bit_offset, bit_width) = field_position(elem, &context)?;
    let description = child_text(elem, "description").unwrap_or_else(|| name.clone());
    Ok(Field::new(&name, &description, bit_offset, bit_width))
}

/// `(bit_offset, bit_width)` from whichever position style the field uses.
fn field_position(elem: &Element, context: &str) -> Result<(u32, u32)> {
    if let (Some(offset), Some(width)) = (
        optional_u32(elem, context, "bitOffset")?,
        optional_u32(elem, context, "bitWidth")?,
    ) {
        return Ok((offset, width));
    }
    if let (Some(lsb), Some(msb)) = (
        optional_u32(elem, context, "lsb")?,
        optional_u32(elem, context, "msb")?,
    ) {
        return bit_span(msb, lsb).ok_or_else(|| Error::InvalidBitRange {
            parent: context.to_string(),
            value: format!("[{msb}:{lsb}]"),
        });
    }
    if let Some(range) = child_text(elem, "bitRange") {
        return parse_bit_range(&range).ok_or(Error::InvalidBitRange {
            parent: context.to_string(),
            value: range,
        });
    }
    Err(Error::MissingElement {
        parent: context.to_string(),
        element: "bitOffset",
    })
}

fn bit_span(msb: u32, lsb: u32) -> Option<(u32, u32)> {
    let width = msb.checked_sub(lsb)?.checked_add(1)?;
    Some((lsb, width))
}

/// Parses a `[msb:lsb]` bit range into `(bit_offset, bit_width)`.
fn parse_bit_range(range: &str) -> Option<(u32, u32)> {
    let caps = BIT_RANGE_RE.captures(range.trim())?;
    let msb = caps[1].parse().ok()?;
    let lsb = caps[2].parse().ok()?;
    bit_span(msb, lsb)
}

fn child_elements<'a>(parent: &'a Element, name: &'a str) -> impl Iterator<Item = &'a Element> {
    parent
        .children
        .iter()
        .filter_map(XMLNode::as_element)
        .filter(move |e| e.name == name)
}

fn child_text(elem: &Element, name: &str) -> Option<String> {
    let text = elem.get_child(name)?.get_text()?;
    Some(text.trim().to_string())
}

fn required_text(elem: &Element, context: &str, name: &'static str) -> Result<String> {
    child_text(elem, name)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::MissingElement {
            parent: context.to_string(),
            element: name,
        })
}

fn required_int(elem: &Element, context: &str, name: &'static str) -> Result<u64> {
    let text = required_text(elem, context, name)?;
    parse_int(&text).ok_or_else(|| Error::InvalidInteger {
        parent: context.to_string(),
        element: name,
        value: text,
    })
}

fn optional_u32(elem: &Element, context: &str, name: &'static str) -> Result<Option<u32>> {
    let Some(text) = child_text(elem, name) else {
        return Ok(None);
    };
    parse_int(&text)
        .and_then(|v| u32::try_from(v).ok())
        .map(Some)
        .ok_or_else(|| Error::InvalidInteger {
            parent: context.to_string(),
            element: name,
            value: text,
        })
}
