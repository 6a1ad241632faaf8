// file: src/script/mask.rs
// version: 1.0.0
// guid: e4b19c03-7d58-4f2a-b6e1-08c5a9d3f246

//! Credential masking for logged command text

/// Fixed-length marker substituted for SAS-bearing URLs in logged output
pub const REDACTION_MARKER: &str = "****************";

/// Query components of a SAS URL, in the order they are issued
const SAS_QUERY_KEYS: [&str; 6] = ["sv=", "st=", "se=", "sr=", "sp=", "sig="];

/// Replace every whitespace-delimited SAS URL token in `text` with the
/// redaction marker. Only logged copies go through here; the executed
/// command string is never masked.
pub fn mask_credentials(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut token = String::new();
    for ch in text.chars() {
        if ch.is_whitespace() {
            push_masked(&mut out, &token);
            token.clear();
            out.push(ch);
        } else {
            token.push(ch);
        }
    }
    push_masked(&mut out, &token);
    out
}

fn push_masked(out: &mut String, token: &str) {
    // Tokens often arrive shell-quoted; the quotes stay, the URL goes.
    let trimmed = token.trim_matches('"');
    if is_sas_url(trimmed) {
        let quotes = token.len() - trimmed.len();
        if quotes > 0 {
            out.push('"');
            out.push_str(REDACTION_MARKER);
            out.push('"');
        } else {
            out.push_str(REDACTION_MARKER);
        }
    } else {
        out.push_str(token);
    }
}

/// An HTTPS URL whose query string carries sv=, st=, se=, sr=, sp= and sig=
/// in that order
fn is_sas_url(token: &str) -> bool {
    let rest = match token.strip_prefix("https://") {
        Some(rest) => rest,
        None => return false,
    };
    let query = match rest.find('?') {
        Some(idx) => &rest[idx + 1..],
        None => return false,
    };
    let mut pos = 0;
    for key in SAS_QUERY_KEYS {
        match query[pos..].find(key) {
            Some(idx) => pos += idx + key.len(),
            None => return false,
        }
    }
    true
}
