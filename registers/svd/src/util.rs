// Licensed under the Apache-2.0 license

//! Integer parsing and hex formatting helpers.

/// Parses a `0x`-prefixed hex or a plain decimal integer.
///
/// # Examples
/// ```
/// use registers_svd::util::parse_int;
/// assert_eq!(parse_int("0x1F"), Some(31));
/// assert_eq!(parse_int("42"), Some(42));
/// assert_eq!(parse_int("forty"), None);
/// ```
pub fn parse_int(text: &str) -> Option<u64> {
    let text = text.trim();
    match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

/// Formats a peripheral base address: `0x` and eight uppercase digits.
///
/// # Examples
/// ```
/// use registers_svd::util::base_address_hex;
/// assert_eq!(base_address_hex(0x1000), "0x00001000");
/// assert_eq!(base_address_hex(0xfe00_b000), "0xFE00B000");
/// ```
pub fn base_address_hex(address: u64) -> String {
    format!("0x{address:08X}")
}

/// Formats a register offset: `0x` and uppercase digits without padding.
///
/// # Examples
/// ```
/// use registers_svd::util::offset_hex;
/// assert_eq!(offset_hex(0), "0x0");
/// assert_eq!(offset_hex(0x1c), "0x1C");
/// ```
pub fn offset_hex(offset: u64) -> String {
    format!("0x{offset:X}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("0"), Some(0));
        assert_eq!(parse_int("0x0"), Some(0));
        assert_eq!(parse_int("0XdeadBEEF"), Some(0xdead_beef));
        assert_eq!(parse_int(" 17 "), Some(17));
        assert_eq!(parse_int("0x"), None);
        assert_eq!(parse_int("-1"), None);
        assert_eq!(parse_int("0x1_0000_0000_0000_0000"), None);
    }

    #[test]
    fn test_hex_formats() {
        assert_eq!(base_address_hex(0), "0x00000000");
        assert_eq!(base_address_hex(0x1_0000_0000), "0x100000000");
        assert_eq!(offset_hex(0xabc), "0xABC");
    }
}
