//! Indented text dump of a decoded tree.

use super::visitor::{walk_document, walk_value, TreeVisitor};
use super::{Document, Value};
use std::fmt::Write as FmtWrite;

/// Configuration for tree printing
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    /// Indentation string (default: 2 spaces)
    pub indent_str: String,
    /// Number of leading binary bytes to show in hex (0 = length only)
    pub binary_preview: usize,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            indent_str: "  ".to_string(),
            binary_preview: 0,
        }
    }
}

impl PrinterConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation string
    pub fn indent_str(mut self, s: impl Into<String>) -> Self {
        self.indent_str = s.into();
        self
    }

    /// Sets how many binary bytes to preview
    pub fn binary_preview(mut self, bytes: usize) -> Self {
        self.binary_preview = bytes;
        self
    }
}

/// Renders documents as an indented tree.
///
/// Objects print as `[Object]` followed by one line per key with the value
/// indented beneath it. Arrays print as `[Array]` followed by their items.
#[derive(Debug, Clone, Default)]
pub struct TreePrinter {
    config: PrinterConfig,
}

impl TreePrinter {
    /// Creates a printer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a printer with custom configuration
    pub fn with_config(config: PrinterConfig) -> Self {
        Self { config }
    }

    /// Render a document as a string
    pub fn render(&self, doc: &Document<'_>) -> String {
        let mut output = String::new();
        self.write_to(doc, &mut output)
            .expect("String write cannot fail");
        output
    }

    /// Render a single value as a string
    pub fn render_value(&self, value: &Value<'_>) -> String {
        let mut output = String::new();
        let mut context = PrintContext::new(&mut output, &self.config);
        walk_value(None, value, &mut context).expect("String write cannot fail");
        output
    }

    /// Write a document to a writer
    pub fn write_to(&self, doc: &Document<'_>, w: &mut impl FmtWrite) -> std::fmt::Result {
        let mut context = PrintContext::new(w, &self.config);
        walk_document(doc, &mut context)
    }
}

struct PrintContext<'a, W: FmtWrite> {
    writer: &'a mut W,
    config: &'a PrinterConfig,
    indent_level: usize,
}

impl<'a, W: FmtWrite> PrintContext<'a, W> {
    fn new(writer: &'a mut W, config: &'a PrinterConfig) -> Self {
        Self {
            writer,
            config,
            indent_level: 0,
        }
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) -> std::fmt::Result {
        for _ in 0..self.indent_level {
            write!(self.writer, "{}", self.config.indent_str)?;
        }
        Ok(())
    }

    fn writeln(&mut self, s: &str) -> std::fmt::Result {
        self.write_indent()?;
        writeln!(self.writer, "{}", s)
    }

    /// Key line for object members; the value goes one level deeper
    fn open_key(&mut self, key: Option<&str>) -> std::fmt::Result {
        if let Some(key) = key {
            self.writeln(key)?;
            self.indent();
        }
        Ok(())
    }

    fn close_key(&mut self, key: Option<&str>) {
        if key.is_some() {
            self.dedent();
        }
    }

    fn binary_line(&self, bytes: &[u8]) -> String {
        let mut line = format!("[Binary] length = {}", bytes.len());
        let shown = bytes.len().min(self.config.binary_preview);
        if shown > 0 {
            let hex: Vec<String> = bytes[..shown].iter().map(|b| format!("{:02x}", b)).collect();
            line.push_str(" [");
            line.push_str(&hex.join(" "));
            if shown < bytes.len() {
                line.push_str(" ...");
            }
            line.push(']');
        }
        line
    }
}

impl<W: FmtWrite> TreeVisitor for PrintContext<'_, W> {
    fn enter_object(&mut self, key: Option<&str>, _len: usize) -> std::fmt::Result {
        self.open_key(key)?;
        self.writeln("[Object]")?;
        self.indent();
        Ok(())
    }

    fn leave_object(&mut self, key: Option<&str>) -> std::fmt::Result {
        self.dedent();
        self.close_key(key);
        Ok(())
    }

    fn enter_array(&mut self, key: Option<&str>, _len: usize) -> std::fmt::Result {
        self.open_key(key)?;
        self.writeln("[Array]")?;
        self.indent();
        Ok(())
    }

    fn leave_array(&mut self, key: Option<&str>) -> std::fmt::Result {
        self.dedent();
        self.close_key(key);
        Ok(())
    }

    fn visit_scalar(&mut self, key: Option<&str>, value: &Value<'_>) -> std::fmt::Result {
        self.open_key(key)?;
        let line = match value {
            Value::Float64(v) => format!("{:?}(float64)", v),
            Value::Int64(v) => format!("{}(int64)", v),
            Value::Boolean(v) => v.to_string(),
            Value::String(s) => quoted(s),
            Value::Binary(bytes) => self.binary_line(bytes),
            // Containers never reach visit_scalar
            Value::Array(_) | Value::Object(_) => String::new(),
        };
        self.writeln(&line)?;
        self.close_key(key);
        Ok(())
    }
}

/// Quote a string value. Control bytes (an untrimmed NUL included) print as
/// `\xNN`; quotes and backslashes are backslash-escaped.
fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c.is_ascii_control() {
            write!(out, "\\x{:02x}", c as u8).expect("String write cannot fail");
        } else {
            if matches!(c, '"' | '\\') {
                out.push('\\');
            }
            out.push(c);
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Element;
    use pretty_assertions::assert_eq;

    fn sample() -> Document<'static> {
        Document::new(
            vec![
                Element::new("ok", Value::Boolean(true)),
                Element::new("name", Value::String("hi")),
                Element::new(
                    "sub",
                    Value::Object(vec![Element::new("pi", Value::Float64(2.0))]),
                ),
                Element::new("list", Value::Array(vec![Value::Int64(-4)])),
                Element::new("bin", Value::Binary(&[0xDE, 0xAD, 0xBE])),
            ],
            0..0,
            true,
        )
    }

    #[test]
    fn test_render_tree() {
        let expected = "\
[Object]
  ok
    true
  name
    \"hi\"
  sub
    [Object]
      pi
        2.0(float64)
  list
    [Array]
      -4(int64)
  bin
    [Binary] length = 3
";
        assert_eq!(TreePrinter::new().render(&sample()), expected);
    }

    #[test]
    fn test_binary_preview() {
        let printer = TreePrinter::with_config(PrinterConfig::new().binary_preview(2));
        let out = printer.render_value(&Value::Binary(&[0xDE, 0xAD, 0xBE]));
        assert_eq!(out, "[Binary] length = 3 [de ad ...]\n");

        let out = printer.render_value(&Value::Binary(&[0x01]));
        assert_eq!(out, "[Binary] length = 1 [01]\n");
    }

    #[test]
    fn test_custom_indent() {
        let printer = TreePrinter::with_config(PrinterConfig::new().indent_str("\t"));
        let out = printer.render_value(&Value::Array(vec![Value::Boolean(false)]));
        assert_eq!(out, "[Array]\n\tfalse\n");
    }

    #[test]
    fn test_quoted_strings() {
        assert_eq!(quoted("hello"), r#""hello""#);
        assert_eq!(quoted(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(quoted("line\nbreak"), r#""line\x0abreak""#);
        assert_eq!(quoted("jojo\0"), r#""jojo\x00""#);
    }
}
