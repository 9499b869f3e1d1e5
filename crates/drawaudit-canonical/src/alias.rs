const ELLIPSIS: char = '…';

/// Renders an identity the way result documents publish it.
///
/// Hyphens are removed and the rest lowercased. Twelve or more remaining
/// characters collapse to the first 8, an ellipsis, and the last 4.
///
/// ```rust
/// use drawaudit_canonical::display_alias;
///
/// assert_eq!(
///     display_alias("3F2504E0-4F89-11D3-9A0C-0305E82C3301"),
///     "3f2504e0…3301"
/// );
/// assert_eq!(display_alias("Short-Id"), "shortid");
/// ```
pub fn display_alias(identity: &str) -> String {
    let stripped: Vec<char> = identity
        .chars()
        .filter(|c| *c != '-')
        .collect::<String>()
        .to_lowercase()
        .chars()
        .collect();
    if stripped.len() < 12 {
        return stripped.into_iter().collect();
    }
    let head: String = stripped[..8].iter().collect();
    let tail: String = stripped[stripped.len() - 4..].iter().collect();
    format!("{head}{ELLIPSIS}{tail}")
}

/// Abbreviates long hex strings to `first4…last4` for reports.
pub fn short_hex(hex: &str) -> String {
    let hex = hex.to_lowercase();
    let chars: Vec<char> = hex.chars().collect();
    if chars.len() <= 16 {
        return hex;
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}{ELLIPSIS}{tail}")
}
