//! Per-class input sanitizers.
//!
//! Every function here is pure, never fails and is idempotent: feeding a
//! sanitized value back in returns it unchanged.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Protocol prefixes that must never survive into a text payload.
static DANGEROUS_PROTOCOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)javascript:|data:").expect("valid protocol regex"));

/// An explicit `scheme://` prefix.
static SCHEME_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://").expect("valid scheme regex"));

/// Sanitize free-form text.
///
/// Removes angle brackets and every case-insensitive `javascript:` / `data:`
/// occurrence, then trims. Removal repeats until nothing matches so that
/// stripping one occurrence cannot splice a new one together
/// (`javajavascript:script:`).
#[must_use]
pub fn text(input: &str) -> String {
    let mut cleaned: String = input.chars().filter(|c| !matches!(c, '<' | '>')).collect();

    loop {
        let next = DANGEROUS_PROTOCOL.replace_all(&cleaned, "");
        if next.len() == cleaned.len() {
            break;
        }
        cleaned = next.into_owned();
    }

    cleaned.trim().to_string()
}

/// Sanitize a URL.
///
/// Inputs without a `scheme://` prefix are treated as `https://`. A value
/// that parses comes back in canonical form; otherwise characters outside
/// `[a-zA-Z0-9:/?._-]` are stripped and the parse is tried once more before
/// settling for the stripped string.
#[must_use]
pub fn url(input: &str) -> String {
    let trimmed = input.trim();
    if let Some(canonical) = canonical_url(trimmed) {
        return canonical;
    }

    let stripped: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '/' | '?' | '.' | '_' | '-'))
        .collect();

    canonical_url(&stripped).unwrap_or(stripped)
}

/// Sanitize an email address: lowercase, trim, keep `[a-z0-9@._-]`.
#[must_use]
pub fn email(input: &str) -> String {
    input
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '-'))
        .collect()
}

/// Sanitize a phone number: keep digits, `+`, whitespace, `()`, `-` and `.`.
#[must_use]
pub fn phone(input: &str) -> String {
    input
        .chars()
        .filter(|c| {
            c.is_ascii_digit() || c.is_whitespace() || matches!(c, '+' | '(' | ')' | '-' | '.')
        })
        .collect()
}

/// Sanitize comma-separated WiFi and contact input.
///
/// `;` and `"` are field delimiters in the `WIFI:` and vCard payloads, so
/// they are removed outright.
#[must_use]
pub fn structured(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, ';' | '"'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse `value` as an absolute URL, assuming `https://` when no scheme is
/// given, and return its canonical serialization.
pub(crate) fn canonical_url(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }

    let candidate = if SCHEME_PREFIX.is_match(value) {
        value.to_string()
    } else {
        format!("https://{value}")
    };

    match Url::parse(&candidate) {
        Ok(parsed) => Some(parsed.to_string()),
        Err(e) => {
            tracing::debug!(error = %e, "URL did not parse during sanitization");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_strips_markup_and_protocols() {
        assert_eq!(text("  <b>hello</b>  "), "bhello/b");
        assert_eq!(text("JavaScript:alert(1)"), "alert(1)");
        assert_eq!(text("see data:text/html"), "see text/html");
    }

    #[test]
    fn test_text_removal_cannot_splice_protocols() {
        assert_eq!(text("javajavascript:script:alert(1)"), "alert(1)");
        assert_eq!(text("dadata:ta:x"), "x");
    }

    #[test]
    fn test_text_idempotent() {
        let samples = [
            "",
            "   ",
            "plain text",
            "<script>javascript:alert('x')</script>",
            "javajavascript:script:",
            " data:DATA:data: ",
            "<<>>",
            "unicode ✓ <ok> ",
            "ddata:ata:",
        ];
        for sample in samples {
            let once = text(sample);
            assert_eq!(text(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_url_canonicalizes() {
        assert_eq!(url("example.com"), "https://example.com/");
        assert_eq!(url("HTTP://Example.COM/path"), "http://example.com/path");
        assert_eq!(url("  https://example.com/a?b=c  "), "https://example.com/a?b=c");
    }

    #[test]
    fn test_url_falls_back_to_stripping() {
        assert_eq!(url("exa mple.com"), "https://example.com/");
        assert_eq!(url(""), "");
    }

    #[test]
    fn test_url_idempotent() {
        for sample in ["example.com", "exa mple.com", "http://[bad", "ftp://files.example.org/x", "%%%"] {
            let once = url(sample);
            assert_eq!(url(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_email_normalizes() {
        assert_eq!(email("  Jane.Doe+tag@Example.COM "), "jane.doetag@example.com");
        assert_eq!(email("a b@c.d"), "ab@c.d");
    }

    #[test]
    fn test_phone_keeps_dial_characters() {
        assert_eq!(phone("+1 (555) 123-4567 ext. 9"), "+1 (555) 123-4567 . 9");
        assert_eq!(phone("call 555.1234!"), " 555.1234");
    }

    #[test]
    fn test_structured_strips_delimiters() {
        assert_eq!(structured(" My;Net,\"pass\",WPA2 "), "MyNet,pass,WPA2");
        let once = structured(" ;\"a;b\" ");
        assert_eq!(structured(&once), once);
    }
}
