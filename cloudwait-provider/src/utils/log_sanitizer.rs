//! 日志脱敏
//!
//! Response bodies (whole XML documents, Nova faults) and credentials are
//! shortened or masked before they reach a log line.

/// Byte budget for a body in a log line.
const TRUNCATE_LIMIT: usize = 256;
/// Leading characters of a secret left visible.
const VISIBLE_PREFIX: usize = 4;

/// Cuts `s` to [`TRUNCATE_LIMIT`] bytes on a char boundary and appends the
/// original length; short input comes back as is.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let cut = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= TRUNCATE_LIMIT)
        .last()
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}

/// `AKIAEXAMPLE` -> `AKIA****`. Secrets no longer than the prefix are fully hidden.
pub fn mask_secret(secret: &str) -> String {
    match secret.char_indices().nth(VISIBLE_PREFIX) {
        Some((end, _)) => format!("{}****", &secret[..end]),
        None => "****".to_string(),
    }
}
