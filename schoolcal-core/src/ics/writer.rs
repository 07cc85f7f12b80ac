//! Content-line builder for ICS documents.

/// Maximum length of a content line in octets, excluding the line break.
const MAX_LINE_OCTETS: usize = 75;

/// Escape a TEXT value (RFC 5545 §3.3.11).
///
/// Backslash, semicolon and comma are backslash-escaped, newlines become
/// `\n` and bare carriage returns are dropped.
pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    escaped.push_str("\\n");
                }
            }
            c => escaped.push(c),
        }
    }

    escaped
}

/// Accumulates CRLF-terminated, folded content lines.
#[derive(Default)]
pub struct IcsWriter {
    buf: String,
}

impl IcsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, component: &str) -> &mut Self {
        self.property("BEGIN", component)
    }

    pub fn end(&mut self, component: &str) -> &mut Self {
        self.property("END", component)
    }

    /// Write a property whose value is already in ICS form (dates, enums,
    /// durations). The value is not escaped.
    pub fn property(&mut self, name: &str, value: &str) -> &mut Self {
        self.push_line(&format!("{name}:{value}"));
        self
    }

    /// Write a property with parameters, e.g. `DTSTART;VALUE=DATE:20240304`.
    pub fn property_with_params(
        &mut self,
        name: &str,
        params: &[(&str, &str)],
        value: &str,
    ) -> &mut Self {
        let mut line = String::from(name);
        for (key, val) in params {
            line.push(';');
            line.push_str(key);
            line.push('=');
            line.push_str(val);
        }
        line.push(':');
        line.push_str(value);
        self.push_line(&line);
        self
    }

    /// Write a TEXT property, escaping the value.
    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.property(name, &escape_text(value))
    }

    pub fn finish(self) -> String {
        self.buf
    }

    /// Fold at 75 octets without splitting a UTF-8 sequence; continuation
    /// lines start with a single space, which counts toward the limit.
    fn push_line(&mut self, line: &str) {
        let mut width = 0;
        for c in line.chars() {
            let len = c.len_utf8();
            if width + len > MAX_LINE_OCTETS {
                self.buf.push_str("\r\n ");
                width = 1;
            }
            self.buf.push(c);
            width += len;
        }
        self.buf.push_str("\r\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text_special_characters() {
        assert_eq!(escape_text("a,b;c\\d"), "a\\,b\\;c\\\\d");
        assert_eq!(escape_text("line1\nline2"), "line1\\nline2");
        assert_eq!(escape_text("line1\r\nline2"), "line1\\nline2");
        assert_eq!(escape_text("old\rmac"), "old\\nmac");
        assert_eq!(escape_text("입학식"), "입학식");
    }

    #[test]
    fn test_writer_terminates_lines_with_crlf() {
        let mut writer = IcsWriter::new();
        writer.begin("VEVENT").text("SUMMARY", "a,b").end("VEVENT");
        assert_eq!(
            writer.finish(),
            "BEGIN:VEVENT\r\nSUMMARY:a\\,b\r\nEND:VEVENT\r\n"
        );
    }

    #[test]
    fn test_property_with_params() {
        let mut writer = IcsWriter::new();
        writer.property_with_params("DTSTART", &[("VALUE", "DATE")], "20240304");
        assert_eq!(writer.finish(), "DTSTART;VALUE=DATE:20240304\r\n");
    }

    #[test]
    fn test_long_lines_are_folded_on_char_boundaries() {
        let value = "가".repeat(60);
        let mut writer = IcsWriter::new();
        writer.text("DESCRIPTION", &value);
        let output = writer.finish();

        for line in output.split("\r\n").filter(|l| !l.is_empty()) {
            assert!(line.len() <= MAX_LINE_OCTETS, "line too long: {line:?}");
        }

        let unfolded = output.replace("\r\n ", "");
        assert_eq!(unfolded, format!("DESCRIPTION:{value}\r\n"));
    }

    #[test]
    fn test_short_lines_are_not_folded() {
        let mut writer = IcsWriter::new();
        writer.text("LOCATION", "부산소프트웨어마이스터고등학교");
        assert_eq!(
            writer.finish(),
            "LOCATION:부산소프트웨어마이스터고등학교\r\n"
        );
    }
}
