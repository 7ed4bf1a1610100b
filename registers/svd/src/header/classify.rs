// Licensed under the Apache-2.0 license

//! Pure per-line classification.
//!
//! Everything here is a function of the line text alone, so the same line
//! always gets the same verdict. The cross-line state (the pending field
//! description) lives in [`super::parse`].
//!
//! A define is one of:
//!
//! ```text
//! #define UART_CTRL              0x00001000 /* Control Register */   -> Register
//! #define UART_CTRL_ENABLE_MASK  0x00000001                          -> FieldProperty(Mask)
//! #define UART_CTRL_ENABLE_SHIFT 0                                   -> FieldProperty(Shift)
//! #define UART_FIFO_DEPTH        16                                  -> Constant
//! ```

use regex::Regex;
use std::sync::LazyLock;

static DEFINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#define\s+([a-zA-Z0-9_]+)\s+((?:0x[0-9a-fA-F]+)|[0-9]+)\s*(?:/\*\s*(.*?)\s*\*/)?")
        .unwrap()
});

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/\*\s*(.*?)\s*\*/").unwrap());

static BIT_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*\[(\d+):(\d+)\]$").unwrap());

static IDENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").unwrap());

static FIELD_REG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_ ]+$").unwrap());

/// The property a field macro carries, taken from its name suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldProperty {
    /// `_SHIFT`: bit offset
    Shift,
    /// `_BITS`: bit width
    Bits,
    /// `_ALIGN`: parsed, not retained
    Align,
    /// `_MASK`: parsed, not retained
    Mask,
}

impl FieldProperty {
    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "SHIFT" => Some(FieldProperty::Shift),
            "BITS" => Some(FieldProperty::Bits),
            "ALIGN" => Some(FieldProperty::Align),
            "MASK" => Some(FieldProperty::Mask),
            _ => None,
        }
    }
}

/// Verdict for a `#define` line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Define<'a> {
    /// A bit-field property; `prefix` is the macro name without its suffix.
    FieldProperty {
        prefix: &'a str,
        property: FieldProperty,
        value: u64,
    },
    /// An address-valued register definition.
    Register {
        name: &'a str,
        address: u64,
        /// Trailing comment with "Register" removed, if there was one.
        description: Option<String>,
    },
    /// A decimal define that is not a field property.
    Constant,
}

/// Naming hint carried by a structured comment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommentHint {
    /// `/* PERIPH :: REG :: [FIELD ::] DESCRIPTION [MSB:LSB] */`
    Field {
        peripheral: String,
        register: String,
        field: Option<String>,
        description: String,
        msb: u32,
        lsb: u32,
    },
    /// `/* PERIPH :: NAME [:: DESCRIPTION] */`
    Register {
        peripheral: String,
        register: String,
        description: Option<String>,
    },
}

/// A whole line's classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    /// Present when the line is a well-formed define.
    pub define: Option<Define<'a>>,
    /// Present when the line carries a structured comment.
    pub comment: Option<CommentHint>,
    /// True for lines that end a field-description context: anything that is
    /// not a define, a comment or blank.
    pub resets_context: bool,
}

/// Classify one line. The line is trimmed first.
pub fn classify_line(line: &str) -> ClassifiedLine<'_> {
    let line = line.trim();
    let resets_context = !(line.is_empty() || line.starts_with("#define") || line.starts_with("/*"));
    ClassifiedLine {
        define: classify_define(line),
        comment: parse_comment(line),
        resets_context,
    }
}

/// Decides whether a macro is a field property.
///
/// `_BITS`, `_SHIFT` and `_ALIGN` always are. `_MASK` macros are emitted both
/// for fields and for whole registers; the register ones are documented with
/// the word "Register", so a `_MASK` whose comment contains that literal word
/// is not a field property.
pub fn is_field_property(name: &str, comment: Option<&str>) -> bool {
    if name.ends_with("_BITS") || name.ends_with("_SHIFT") || name.ends_with("_ALIGN") {
        return true;
    }
    name.ends_with("_MASK") && !comment.is_some_and(|c| c.contains("Register"))
}

/// Classify a define line, or return `None` if it is not a well-formed define.
pub fn classify_define(line: &str) -> Option<Define<'_>> {
    let caps = DEFINE_RE.captures(line)?;
    let name = caps.get(1)?.as_str();
    let value_str = caps.get(2)?.as_str();
    let comment = caps.get(3).map(|m| m.as_str());

    if is_field_property(name, comment) {
        let (prefix, suffix) = name.rsplit_once('_')?;
        let property = FieldProperty::from_suffix(suffix)?;
        let value = parse_define_value(value_str)?;
        return Some(Define::FieldProperty {
            prefix,
            property,
            value,
        });
    }

    match value_str.strip_prefix("0x") {
        Some(hex) => Some(Define::Register {
            name,
            address: u64::from_str_radix(hex, 16).ok()?,
            description: comment.map(|c| c.replace("Register", "").trim().to_string()),
        }),
        None => Some(Define::Constant),
    }
}

fn parse_define_value(value: &str) -> Option<u64> {
    match value.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// Extract a naming hint from the first structured `/* ... */` comment on
/// the line. Plain comments before it are skipped.
///
/// Segments are separated by `::`. A final segment ending in `[MSB:LSB]`
/// makes it a field comment; otherwise two segments (or three, the third
/// being a description) make a register comment.
pub fn parse_comment(line: &str) -> Option<CommentHint> {
    COMMENT_RE
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .find_map(|body| parse_comment_body(body.as_str()))
}

fn parse_comment_body(body: &str) -> Option<CommentHint> {
    let segments: Vec<&str> = body.split("::").map(str::trim).collect();
    if segments.len() < 2 || !IDENT_RE.is_match(segments[0]) {
        return None;
    }
    let peripheral = segments[0].to_string();

    if segments.len() >= 3 {
        let last = segments[segments.len() - 1];
        if let Some(caps) = BIT_RANGE_RE.captures(last) {
            if !FIELD_REG_RE.is_match(segments[1]) {
                return None;
            }
            let msb = caps[2].parse().ok()?;
            let lsb = caps[3].parse().ok()?;
            let mut text: Vec<&str> = segments[2..segments.len() - 1].to_vec();
            text.push(caps.get(1)?.as_str());

            let (field, description) = if text.len() == 2 && IDENT_RE.is_match(text[0]) {
                (Some(text[0].to_string()), text[1].to_string())
            } else {
                (None, text.join(" :: "))
            };
            return Some(CommentHint::Field {
                peripheral,
                register: segments[1].replace(' ', "_"),
                field,
                description,
                msb,
                lsb,
            });
        }
    }

    let register = segments[1];
    if register.is_empty() || register.contains(':') {
        return None;
    }
    let description = match segments.len() {
        2 => None,
        3 if !segments[2].is_empty() => Some(segments[2].to_string()),
        _ => return None,
    };
    Some(CommentHint::Register {
        peripheral,
        register: register.replace(' ', "_"),
        description,
    })
}

/// Fully-qualified names for a register named in a comment.
///
/// Returns `(fqn, register_name)` pairs, the literal `PERIPH_REG` name
/// first. When REG already repeats the peripheral prefix
/// (`UART :: UART_CTRL`), a second pair names the same register without it
/// (`UART_CTRL`, `CTRL`), so headers that spell the macro either way resolve.
pub fn qualify(peripheral: &str, register: &str) -> Vec<(String, String)> {
    let mut names = vec![(format!("{peripheral}_{register}"), register.to_string())];
    if let Some(rest) = register.strip_prefix(peripheral) {
        if rest.len() > 1 && rest.starts_with('_') {
            names.push((register.to_string(), rest[1..].to_string()));
        }
    }
    names
}
