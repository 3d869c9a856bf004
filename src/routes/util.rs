//! Shared form/query parsing and small HTML helpers for route handlers.

/// Decoded `key=value&...` pairs from an HTMX POST body or query string.
#[derive(Debug, Default)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Parse a URL-encoded form body.
    pub fn from_body(body: &str) -> Self {
        if body.is_empty() {
            return Self::default();
        }
        Self(
            body.split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| {
                    let (key, val) = pair.split_once('=').unwrap_or((pair, ""));
                    (percent_decode(key), percent_decode(val))
                })
                .collect(),
        )
    }

    /// Parse a query string, with or without its leading `?`.
    pub fn from_query(query: &str) -> Self {
        Self::from_body(query.strip_prefix('?').unwrap_or(query))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// A non-empty value for `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn number<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    /// Checkbox-style flag: `true`, `1`, `on` and `yes` are set.
    pub fn flag(&self, key: &str) -> bool {
        matches!(
            self.get(key).map(|v| v.to_ascii_lowercase()).as_deref(),
            Some("true" | "1" | "on" | "yes")
        )
    }
}

/// Percent-decode a URL-encoded value. `+` decodes to a space; malformed
/// escapes are kept verbatim.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => match bytes.get(i + 1..i + 3).and_then(decode_hex_pair) {
                Some(b) => {
                    out.push(b);
                    i += 3;
                }
                None => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn decode_hex_pair(pair: &[u8]) -> Option<u8> {
    let s = core::str::from_utf8(pair).ok()?;
    u8::from_str_radix(s, 16).ok()
}

/// Escape text for safe inclusion in HTML element content or attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Red error line shown above a re-rendered screen.
pub fn error_span(message: &str) -> String {
    format!(
        r#"<span class="text-red-700 text-sm block mb-2">{}</span>"#,
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_params_are_decoded() {
        let p = Params::from_body("name=Sir+Rex&level=3&perfect=on");
        assert_eq!(p.get("name"), Some("Sir Rex"));
        assert_eq!(p.number::<u32>("level"), Some(3));
        assert!(p.flag("perfect"));
        assert!(!p.flag("correct"));
    }

    #[test]
    fn query_prefix_is_optional() {
        assert_eq!(Params::from_query("?game=island2").get("game"), Some("island2"));
        assert_eq!(Params::from_query("game=island2").get("game"), Some("island2"));
    }

    #[test]
    fn empty_and_bare_keys() {
        assert!(Params::from_body("").get("x").is_none());
        let p = Params::from_body("flag&name=");
        assert_eq!(p.get("flag"), Some(""));
        assert_eq!(p.text("name"), None);
    }

    #[test]
    fn percent_decode_handles_utf8_and_bad_escapes() {
        assert_eq!(percent_decode("caf%C3%A9"), "café");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[test]
    fn escape_html_covers_markup() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
