//! `${name}` substitution

use std::collections::HashMap;

/// Nesting limit for variable evaluation. Deeper references are left
/// unresolved, which stops self-referencing values from recursing forever.
pub const MAX_VARIABLE_DEPTH: usize = 32;

/// Upper bound, in bytes, on the replacement text produced by one
/// evaluation. References past the bound are left unresolved.
pub const MAX_VARIABLE_EXPANSION: usize = 1 << 20;

/// Replace `${name}` references in `value` using `lookup`.
///
/// Every occurrence of a resolved reference is replaced; `lookup` runs once
/// per distinct name and replacement text is not scanned again. References
/// that `lookup` cannot resolve stay in the text. Scanning stops at the
/// first reference without a closing brace or with an empty name.
pub fn substitute(value: &str, mut lookup: impl FnMut(&str) -> Option<String>) -> String {
    let mut resolved: HashMap<String, Option<String>> = HashMap::new();
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        let name = &after[..end];
        if name.is_empty() {
            break;
        }

        out.push_str(&rest[..start]);
        let replacement = resolved
            .entry(name.to_string())
            .or_insert_with(|| lookup(name));
        match replacement {
            Some(text) => {
                out.push_str(text);
                rest = &after[end + 1..];
            }
            None => {
                // keep the `$` and rescan, so `${a${b}}` still resolves `b`
                out.push('$');
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);

    out
}
