//! Conversion of registry elements into resolved entries.
//!
//! Members, parameters and function pointer typedefs are stored in `vk.xml`
//! as C declarations with markup; these helpers rebuild the qualified type
//! string and the declared name the generator expects.

use std::sync::LazyLock;

use regex::Regex;

use super::errors::RegistryError;
use super::xml::Element;
use crate::core::{Aggregate, Command, FuncPointer, Member};

static RE_FUNCPTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^typedef (.+) \(VKAPI_PTR \*$").unwrap());

static RE_DIMENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\s*(\w+)\s*\]").unwrap());

/// Base value of extension enumerants computed from `offset`.
const EXTENSION_ENUM_BASE: i64 = 1_000_000_000;

/// Range reserved for each extension number.
const EXTENSION_ENUM_BLOCK: i64 = 1000;

/// Check an element's `api` attribute against the selected API.
pub fn api_matches(element: &Element, api: &str) -> bool {
    element
        .attr("api")
        .map_or(true, |apis| apis.split(',').any(|a| a.trim() == api))
}

/// Collapse runs of whitespace into single spaces.
fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a `<member>`, `<param>` or `<proto>` element.
pub fn parse_member(element: &Element) -> Member {
    let type_name = element.find_text("type").unwrap_or_default();
    let ty = format!(
        "{}{}{}",
        element.leading_text().trim_start(),
        type_name.trim(),
        element.tail_of("type").trim_end()
    );
    let ty = normalize_ws(&ty);

    let name = element.find_text("name").unwrap_or_default();
    let mut suffix = element.tail_of("name").to_string();
    if let Some(len) = element.find("enum") {
        suffix.push_str(&len.text_content());
        suffix.push_str(element.tail_of("enum"));
    }
    let suffix = suffix.trim();

    let mut member = if let Some(width) = suffix.strip_prefix(':') {
        let member = Member::new(ty, name.trim());
        match width.trim().parse() {
            Ok(width) => member.with_bit_width(width),
            Err(_) => member,
        }
    } else {
        let dims: String = RE_DIMENSION
            .captures_iter(suffix)
            .map(|cap| format!("[{}]", &cap[1]))
            .collect();
        Member::new(ty, format!("{}{}", name.trim(), dims))
    };

    if let Some(values) = element.attr("values") {
        member = member.with_values(values);
    }

    member
}

/// Parse a `<type category="struct|union">` body.
pub fn parse_aggregate(element: &Element, name: &str, api: &str) -> Aggregate {
    let mut aggregate = Aggregate::new(name);
    for member in element.find_all("member") {
        if api_matches(member, api) {
            aggregate.members.push(parse_member(member));
        }
    }
    aggregate
}

/// Parse a `<command>` element, renaming it when resolved through an alias.
pub fn parse_command(element: &Element, name: &str, api: &str) -> Result<Command, RegistryError> {
    let proto = element.find("proto").ok_or(RegistryError::MissingAttribute {
        element: "command",
        attribute: "proto",
    })?;

    let mut command = Command::new(name, parse_member(proto).ty);
    for param in element.find_all("param") {
        if api_matches(param, api) {
            command.params.push(parse_member(param));
        }
    }
    Ok(command)
}

/// Parse a single C parameter declaration such as `const char* pName`.
fn split_c_param(param: &str) -> Option<Member> {
    let param = normalize_ws(param);
    if param.is_empty() || param == "void" {
        return None;
    }

    let split = param
        .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .map(|i| i + 1)?;
    let (ty, name) = param.split_at(split);
    Some(Member::new(ty.trim(), name))
}

/// Parse a `<type category="funcpointer">` typedef.
pub fn parse_funcpointer(element: &Element, name: &str, api: &str) -> Result<FuncPointer, RegistryError> {
    if let Some(proto) = element.find("proto") {
        let params = element
            .find_all("param")
            .filter(|p| api_matches(p, api))
            .map(parse_member)
            .collect();
        return Ok(FuncPointer {
            name: name.to_string(),
            return_type: parse_member(proto).ty,
            params,
        });
    }

    let lead = element.leading_text().trim();
    let return_type = RE_FUNCPTR
        .captures(lead)
        .map(|cap| normalize_ws(&cap[1]))
        .ok_or_else(|| RegistryError::MalformedType {
            name: name.to_string(),
        })?;

    let params_text = element.text_after("name");
    let params_text = params_text.trim();
    let params_text = params_text.strip_prefix(")(").unwrap_or(params_text);
    let params_text = params_text.strip_suffix(");").unwrap_or(params_text);

    let params = params_text.split(',').filter_map(split_c_param).collect();

    Ok(FuncPointer {
        name: name.to_string(),
        return_type,
        params,
    })
}

/// Names of all `<type>` elements referenced inside an element.
pub fn referenced_types(element: &Element) -> Vec<String> {
    let mut names = Vec::new();
    collect_types(element, &mut names);
    names
}

fn collect_types(element: &Element, names: &mut Vec<String>) {
    for child in element.elements() {
        if child.name == "type" {
            names.push(child.text_content().trim().to_string());
        } else if child.name != "comment" {
            collect_types(child, names);
        }
    }
}

/// Parse an integer literal as written in the registry.
///
/// Accepts decimal and hexadecimal forms with an optional leading minus sign
/// and C integer suffixes. Expressions such as `(~0U)` yield `None`.
pub fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim()),
        None => (false, text),
    };
    let digits = digits.trim_end_matches(['U', 'u', 'L', 'l']);

    let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()? as i64
    } else {
        digits.parse::<i64>().ok()?
    };

    Some(if negative { -value } else { value })
}

/// Resolve an `<enum>` element to its source text and numeric value.
///
/// `extnumber` is the number of the enclosing extension, used when the
/// element carries an `offset` without its own `extnumber`.
pub fn resolve_enum(element: &Element, extnumber: Option<i64>) -> Result<(String, Option<i64>), RegistryError> {
    let name = element.attr("name").unwrap_or_default();
    let invalid = |value: &str| RegistryError::InvalidEnumValue {
        name: name.to_string(),
        value: value.to_string(),
    };

    if let Some(value) = element.attr("value") {
        return Ok((value.to_string(), parse_int(value)));
    }

    if let Some(bitpos) = element.attr("bitpos") {
        let bit: u32 = bitpos.trim().parse().map_err(|_| invalid(bitpos))?;
        let value = 1u64.checked_shl(bit).ok_or_else(|| invalid(bitpos))?;
        return Ok((format!("0x{:08x}", value), Some(value as i64)));
    }

    if let Some(offset) = element.attr("offset") {
        let offset: i64 = offset.trim().parse().map_err(|_| invalid(offset))?;
        let extnumber = match element.attr("extnumber") {
            Some(n) => n.trim().parse().map_err(|_| invalid(n))?,
            None => extnumber.ok_or(RegistryError::MissingAttribute {
                element: "enum",
                attribute: "extnumber",
            })?,
        };
        let mut value = EXTENSION_ENUM_BASE + (extnumber - 1) * EXTENSION_ENUM_BLOCK + offset;
        if element.attr("dir") == Some("-") {
            value = -value;
        }
        return Ok((value.to_string(), Some(value)));
    }

    if let Some(alias) = element.attr("alias") {
        return Ok((alias.to_string(), None));
    }

    Err(RegistryError::MissingAttribute {
        element: "enum",
        attribute: "value",
    })
}
