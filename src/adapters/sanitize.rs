//! Log sanitization for patient identifiers.
//!
//! Formatted log lines pass through [`SanitizingMakeWriter`] before reaching
//! the log sink. The sanitizer redacts:
//! - Patient names (`Patient: <name>`, `patient_name=<name>`)
//! - E-mail addresses and phone numbers
//! - SSN-like identifiers
//!
//! Log call sites should still avoid formatting patient data; this is the
//! last filter before the file.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

/// Default cap on the bytes sanitized per call (16 KiB).
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct Rule {
    regex: Regex,
    replacement: &'static str,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Rule>,
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

fn max_sanitize_bytes() -> usize {
    std::env::var("RISK_PREDICTOR_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn get_patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        let rules: [(&str, &'static str); 5] = [
            (r"\bPatient:[ \t]*[^\r\n]+", "Patient: [REDACTED-NAME]"),
            (
                r#"(?i)\bpatient_name\s*[=:]\s*(?:"[^"]*"|'[^']*'|\S+)"#,
                "patient_name=[REDACTED-NAME]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
            (r"\b\d{3}-\d{2}-\d{4}\b", "[REDACTED-SSN]"),
            (
                r"(?:\+?1[-.\s]?)?\(?\b[0-9]{3}\)?[-.\s][0-9]{3}[-.\s][0-9]{4}\b",
                "[REDACTED-PHONE]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| *p)).expect("valid regex set");
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Rule {
                regex: Regex::new(pattern).expect("valid regex"),
                replacement,
            })
            .collect();

        Patterns { set, rules }
    })
}

/// Replace patient identifiers in `input`.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        result = rule.regex.replace_all(&result, rule.replacement).into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// [`MakeWriter`] wrapper that redacts patient identifiers from every
/// formatted event before it reaches `inner`.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Per-event writer handed out by [`SanitizingMakeWriter`].
///
/// Bytes are held in `pending` until their newline arrives, so a name split
/// across two `write` calls is redacted as one line. A line that grows past
/// twice `RISK_PREDICTOR_SANITIZE_MAX_BYTES` without a newline is emitted
/// early, truncated, with a newline appended.
pub struct SanitizingWriter<W> {
    inner: W,
    pending: Vec<u8>,
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn new(inner: W) -> Self {
        Self {
            inner,
            pending: Vec::new(),
        }
    }

    fn emit(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let redacted = sanitize(&String::from_utf8_lossy(bytes));
        self.inner.write_all(redacted.as_bytes())
    }

    /// Emit every complete line in `pending`, keeping the unterminated tail.
    fn emit_complete_lines(&mut self) -> std::io::Result<()> {
        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Ok(());
        };
        let tail = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, tail);
        for line in complete.split_inclusive(|&b| b == b'\n') {
            self.emit(line)?;
        }
        Ok(())
    }

    fn emit_pending(&mut self) -> std::io::Result<()> {
        let rest = std::mem::take(&mut self.pending);
        self.emit(&rest)
    }
}

impl<W> std::io::Write for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.emit_complete_lines()?;

        if self.pending.len() > max_sanitize_bytes().saturating_mul(2) {
            self.emit_pending()?;
            self.inner.write_all(b"\n")?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.emit_complete_lines()?;
        if !self.pending.is_empty() {
            self.emit_pending()?;
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
        SanitizingWriter::new(self.inner.make_writer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_redacts_patient_display_line() {
        let sanitized = sanitize("rendered Patient: Jane Q. Doe\nnext line");
        assert!(!sanitized.contains("Jane"));
        assert!(sanitized.contains("Patient: [REDACTED-NAME]"));
        assert!(sanitized.contains("next line"));
    }

    #[test]
    fn test_redacts_structured_name_field() {
        let sanitized = sanitize(r#"submit patient_name="John Smith" hospital=Kim"#);
        assert!(!sanitized.contains("John"));
        assert!(sanitized.contains("patient_name=[REDACTED-NAME]"));
        assert!(sanitized.contains("hospital=Kim"));
    }

    #[test]
    fn test_redacts_contact_details() {
        let sanitized = sanitize("reach jane.doe@example.org or 555-123-4567, ssn 123-45-6789");
        assert!(sanitized.contains("[REDACTED-EMAIL]"));
        assert!(sanitized.contains("[REDACTED-PHONE]"));
        assert!(sanitized.contains("[REDACTED-SSN]"));
        assert!(!sanitized.contains("jane.doe"));
    }

    #[test]
    fn test_plain_text_untouched() {
        let line = "Loaded 5 hospitals from \"hospital_levels.txt\"";
        assert_eq!(sanitize(line), line);
        assert_eq!(sanitize("Patient: Alice"), "Patient: [REDACTED-NAME]");
    }

    #[test]
    fn test_truncates_large_inputs() {
        let sanitized = sanitize_with_limit("ééééééééé", 5);
        assert!(sanitized.ends_with("[TRUNCATED]"));
        assert!(sanitized.starts_with("éé"));
    }

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("sink lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedSink {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().expect("sink lock").clone()).expect("utf8")
        }
    }

    #[test]
    fn test_writer_sanitizes_split_writes() {
        let sink = SharedSink::default();
        {
            let mut writer = SanitizingWriter::new(sink.clone());
            writer.write_all(b"INFO Patient: Ja").expect("write");
            writer.write_all(b"ne Doe\n").expect("write");
        }

        assert_eq!(sink.text(), "INFO Patient: [REDACTED-NAME]\n");
    }

    #[test]
    fn test_writer_emits_each_line_of_one_write() {
        let sink = SharedSink::default();
        let mut writer = SanitizingWriter::new(sink.clone());
        writer
            .write_all(b"Patient: Jane Doe\nsaved to jane@example.org\nPatient: Jo")
            .expect("write");

        assert_eq!(
            sink.text(),
            "Patient: [REDACTED-NAME]\nsaved to [REDACTED-EMAIL]\n"
        );

        writer.flush().expect("flush");
        assert_eq!(
            sink.text(),
            "Patient: [REDACTED-NAME]\nsaved to [REDACTED-EMAIL]\nPatient: [REDACTED-NAME]"
        );
    }

    #[test]
    fn test_writer_caps_unterminated_line() {
        let sink = SharedSink::default();
        let mut writer = SanitizingWriter::new(sink.clone());
        let long_line = "x".repeat(max_sanitize_bytes() * 2 + 1);
        writer.write_all(long_line.as_bytes()).expect("write");

        let written = sink.text();
        assert!(written.ends_with(" [TRUNCATED]\n"));
        assert!(written.len() < long_line.len());
        assert!(writer.pending.is_empty());
    }
}
