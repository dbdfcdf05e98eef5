//! Field identifier → row attribute name.

use crate::error_handling::ValueError;

/// Replaces every character that is not alphanumeric or `_` with `_`.
///
/// Surrounding whitespace is replaced too, not stripped: `" foo "` becomes
/// `"_foo_"` and `cs(User-Agent)` becomes `cs_User_Agent_`.
///
/// # Errors
///
/// Returns [`ValueError::EmptyFieldName`] for an empty identifier.
pub fn sanitize_name(raw: &str) -> Result<String, ValueError> {
    if raw.is_empty() {
        return Err(ValueError::EmptyFieldName);
    }
    Ok(raw
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect())
}

/// Row attribute name of a `#Fields` identifier.
///
/// Header-derived identifiers drop their closing parenthesis first, so
/// `cs(User-Agent)` is exposed as `cs_User_Agent`.
pub fn field_name(identifier: &str) -> Result<String, ValueError> {
    let trimmed = match identifier.strip_suffix(')') {
        Some(head) if head.contains('(') => head,
        _ => identifier,
    };
    sanitize_name(trimmed)
}
