//! Log sanitization for patient attributes and secret material.
//!
//! Every formatted log line passes through [`SanitizingMakeWriter`], which
//! redacts:
//! - feature vectors (bracketed lists of 13 numbers)
//! - patient attribute pairs such as `age=55` or `tumor_size: 2.5`
//! - identifiers (UUIDs, MRNs, SSN-like numbers, emails)
//! - key material (signature/key/token assignments, long hex runs, PEM blocks)
//!
//! The prediction service never logs raw attributes; this layer catches
//! anything that slips into a formatted message anyway.
//!
//! Each line is capped at a byte limit (`Settings::sanitize_max_bytes`,
//! 16 KiB by default) and marked `[TRUNCATED]` beyond it.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Default per-line cap for [`sanitize`].
pub const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Rule>,
    pem: Rule,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        const NUM: &str = r"-?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?";
        let vector = format!(r"\[\s*{NUM}(?:\s*,\s*{NUM}){{12}}\s*\]");
        let attribute = format!(
            r"(?i)\b(?:age|race|t_?stage|n_?stage|sixth_?stage|marital_?status|grade|a_?stage|tumou?r_?size(?:_cm)?|estrogen_?status|progesterone_?status|regional_?nodes?_?(?:examined|positive))\b\s*[:=]\s*(?:{NUM}|[A-Za-z]+)"
        );

        let rules: Vec<(String, &'static str)> = vec![
            (vector, "[REDACTED-FEATURES]"),
            (attribute, "[REDACTED-ATTRIBUTE]"),
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}".into(),
                "[REDACTED-UUID]",
            ),
            (r"\b\d{3}-\d{2}-\d{4}\b".into(), "[REDACTED-SSN]"),
            (r"\bMRN[:\s]?\d{6,10}\b".into(), "[REDACTED-MRN]"),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b".into(),
                "[REDACTED-EMAIL]",
            ),
            (
                r"(?i)\b(?:private[_-]?key|seed|secret|signature|sig|token|key)\b\s*[:=]\s*[A-Za-z0-9+/]{32,}={0,2}".into(),
                "[REDACTED-SECRET]",
            ),
            (r"\b[0-9a-fA-F]{64,}\b".into(), "[REDACTED-KEY]"),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| p.as_str())).expect("Valid regex set");
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(&pattern).expect("Valid regex"),
                replacement,
            })
            .collect();
        let pem = Rule {
            regex: Regex::new(
                r"(?s)-----BEGIN [A-Z0-9 ]{0,40}PRIVATE KEY-----.{0,8192}?-----END [A-Z0-9 ]{0,40}PRIVATE KEY-----",
            )
            .expect("Valid regex"),
            replacement: "[REDACTED-PEM-PRIVATE-KEY]",
        };

        Patterns { set, rules, pem }
    })
}

/// Redact patient attributes and secret material from the first
/// `max_bytes` of `input`.
#[must_use]
pub fn sanitize(input: &str, max_bytes: usize) -> String {
    let patterns = patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        result = rule.regex.replace_all(&result, rule.replacement).into_owned();
    }
    if result.contains("-----BEGIN ") {
        result = patterns
            .pem
            .regex
            .replace_all(&result, patterns.pem.replacement)
            .into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// A `tracing_subscriber` writer that sanitizes each formatted line before it
/// reaches the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
    max_bytes: usize,
}

impl<M> SanitizingMakeWriter<M> {
    /// Wrap `inner`, capping each sanitized line at `max_bytes` (0 means
    /// [`DEFAULT_SANITIZE_MAX_BYTES`]).
    #[must_use]
    pub fn new(inner: M, max_bytes: usize) -> Self {
        let max_bytes = if max_bytes == 0 {
            DEFAULT_SANITIZE_MAX_BYTES
        } else {
            max_bytes
        };
        Self { inner, max_bytes }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
    max_bytes: usize,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn new(inner: W, max_bytes: usize) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            max_bytes,
        }
    }

    fn sanitize_bytes(&self, bytes: &[u8]) -> String {
        sanitize(&String::from_utf8_lossy(bytes), self.max_bytes)
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let sanitized = self.sanitize_bytes(&line[..pos]);
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A single line with no newline must not buffer without bound.
        let hard_cap = self.max_bytes.saturating_mul(2);
        if self.buffer.len() > hard_cap {
            let sanitized = self.sanitize_bytes(&self.buffer);
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let sanitized = self.sanitize_bytes(&self.buffer);
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }
        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter::new(self.inner.make_writer(), self.max_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn clean(input: &str) -> String {
        sanitize(input, DEFAULT_SANITIZE_MAX_BYTES)
    }

    fn write_through(max_bytes: usize, chunks: &[&[u8]]) -> String {
        let mut out = Vec::new();
        {
            let mut writer = SanitizingWriter::new(&mut out, max_bytes);
            for chunk in chunks {
                writer.write_all(chunk).expect("write");
            }
            writer.flush().expect("flush");
        }
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn test_sanitize_feature_vector() {
        let input = "features=[55, 0, 1, 0, 0, 0, 1, 0, 2.5, 0, 1, 10, 1] ok";
        let sanitized = clean(input);
        assert!(sanitized.contains("[REDACTED-FEATURES]"));
        assert!(!sanitized.contains("2.5"));
    }

    #[test]
    fn test_short_lists_untouched() {
        let input = "bands [0, 40, 80, 120]";
        assert_eq!(clean(input), input);
    }

    #[test]
    fn test_sanitize_patient_attributes() {
        let sanitized = clean("age=55 tumor_size_cm: 2.5 estrogen_status=Positive");
        assert!(!sanitized.contains("55"));
        assert!(!sanitized.contains("2.5"));
        assert!(!sanitized.contains("Positive"));
        assert_eq!(sanitized.matches("[REDACTED-ATTRIBUTE]").count(), 3);
    }

    #[test]
    fn test_sanitize_identifiers() {
        let sanitized = clean("id 550e8400-e29b-41d4-a716-446655440000 MRN:12345678");
        assert!(sanitized.contains("[REDACTED-UUID]"));
        assert!(sanitized.contains("[REDACTED-MRN]"));
        assert!(clean("SSN: 123-45-6789").contains("[REDACTED-SSN]"));
        assert!(clean("Contact: patient@hospital.com").contains("[REDACTED-EMAIL]"));
    }

    #[test]
    fn test_sanitize_secret_material() {
        let hex = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        assert!(clean(&format!("sha {hex}")).contains("[REDACTED-KEY]"));
        let sanitized = clean("seed=QWxhZGRpbjpvcGVuIHNlc2FtZSB3aXRoIGxvbmcgc2VjcmV0");
        assert!(sanitized.contains("[REDACTED-SECRET]"));
    }

    #[test]
    fn test_truncates_large_inputs() {
        let sanitized = sanitize("héllo wörld, long enough", 2);
        assert_eq!(sanitized, "h [TRUNCATED]");
    }

    #[test]
    fn test_writer_sanitizes_lines() {
        let text = write_through(DEFAULT_SANITIZE_MAX_BYTES, &[b"age=61 received\n", b"partial"]);
        assert_eq!(text, "[REDACTED-ATTRIBUTE] received\npartial");
    }

    #[test]
    fn test_writer_uses_configured_cap() {
        let text = write_through(12, &[b"0123456789abcdef\n", b"short\n"]);
        assert_eq!(text, "0123456789ab [TRUNCATED]\nshort\n");
    }

    #[test]
    fn test_zero_cap_falls_back_to_default() {
        let writer = SanitizingMakeWriter::new(std::io::sink, 0);
        assert_eq!(writer.max_bytes, DEFAULT_SANITIZE_MAX_BYTES);
        assert_eq!(SanitizingMakeWriter::new(std::io::sink, 64).max_bytes, 64);
    }
}
