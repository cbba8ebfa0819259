//! C to D type syntax translation.
//!
//! Registry types are C declarations (`const char* const*`, `float m[3][4]`).
//! D spells pointer-to-const with a parenthesized `const(...)` and writes
//! fixed arrays on the type, innermost dimension first.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static RE_DOUBLE_CONST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^const\s+(.+)\*\s*const\*\s*$").unwrap());

static RE_SINGLE_CONST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^const\s+(.+)\*\s*$").unwrap());

static RE_STRUCT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bstruct\s+").unwrap());

static RE_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\[]+)((?:\[[^\]]+\])+)$").unwrap());

static RE_DIMENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").unwrap());

/// Identifiers that are keywords in D, with their replacements.
const RESERVED_WORDS: &[(&str, &str)] = &[
    ("module", "_module"),
    ("version", "_version"),
    ("function", "_function"),
    ("scope", "_scope"),
];

/// Rename an identifier that collides with a D keyword.
pub fn rename_reserved(name: &str) -> &str {
    RESERVED_WORDS
        .iter()
        .find(|(word, _)| *word == name)
        .map_or(name, |(_, replacement)| replacement)
}

/// Translate const qualifiers of a C type.
pub fn convert_const(ty: &str) -> String {
    if let Some(cap) = RE_DOUBLE_CONST.captures(ty) {
        return format!("const({}*)*", cap[1].trim());
    }
    if let Some(cap) = RE_SINGLE_CONST.captures(ty) {
        return format!("const({})*", cap[1].trim());
    }
    ty.to_string()
}

/// Move C array dimensions from a declared name onto a translated type.
///
/// `m[3][4]` with type `float` becomes `float[4][3]` and `m`.
pub fn convert_array(ty: &str, name: &str) -> (String, String) {
    let Some(cap) = RE_ARRAY.captures(name) else {
        return (ty.to_string(), name.to_string());
    };

    let dims: Vec<&str> = RE_DIMENSION
        .captures_iter(&cap[2])
        .filter_map(|d| d.get(1).map(|m| m.as_str().trim()))
        .collect();

    let mut out = ty.to_string();
    for dim in dims.iter().rev() {
        out.push('[');
        out.push_str(dim);
        out.push(']');
    }
    (out, cap[1].trim().to_string())
}

/// Translate a member or parameter declaration to `(d_type, bare_name)`.
///
/// A leading `struct` keyword registers the pointed-to struct in `opaque`
/// so the block can forward-declare it.
pub fn translate(ty: &str, name: &str, opaque: Option<&mut BTreeSet<String>>) -> (String, String) {
    let ty = ty.trim();

    if let (Some(rest), Some(opaque)) = (ty.strip_prefix("struct "), opaque) {
        let bare = rest.trim_end_matches(|c: char| c == '*' || c.is_whitespace());
        opaque.insert(bare.to_string());
    }

    let ty = RE_STRUCT_KEYWORD.replace_all(ty, "");
    let ty = convert_const(&ty);
    let (ty, name) = convert_array(&ty, name);
    let name = rename_reserved(&name).to_string();

    (ty, name)
}
