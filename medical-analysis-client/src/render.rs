//! Plain-text panels shared by the report and prescription renderers.

use serde_json::Value;
use std::fmt;

use crate::models::{FieldText, text_of};

const INDENT: &str = "  ";

/// One titled box of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    title: String,
    lines: Vec<String>,
}

impl Panel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn section(&mut self, title: &str) {
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.lines.push(format!("-- {} --", title));
    }

    pub fn heading(&mut self, depth: usize, text: impl fmt::Display) {
        self.lines.push(format!("{}[{}]", INDENT.repeat(depth), text));
    }

    pub fn text(&mut self, depth: usize, text: impl fmt::Display) {
        let indent = INDENT.repeat(depth);
        for line in text.to_string().lines() {
            self.lines.push(format!("{}{}", indent, line).trim_end().to_string());
        }
    }

    pub fn field(&mut self, depth: usize, label: &str, value: &FieldText) {
        self.lines.push(
            format!("{}{}: {}", INDENT.repeat(depth), label, value)
                .trim_end()
                .to_string(),
        );
    }

    pub fn bullet(&mut self, depth: usize, text: impl fmt::Display) {
        self.lines.push(format!("{}- {}", INDENT.repeat(depth), text));
    }

    /// Labeled, pretty-printed JSON block.
    pub fn json_block(&mut self, depth: usize, label: &str, value: &Value) {
        self.lines.push(format!("{}{}:", INDENT.repeat(depth), label));
        self.text(depth + 1, pretty_json(value));
    }

    /// Render `items` under `title` only when there is at least one.
    pub fn list_section<T>(
        &mut self,
        title: &str,
        items: Option<&Vec<T>>,
        mut render_item: impl FnMut(&mut Panel, &T),
    ) {
        let Some(items) = items.filter(|items| !items.is_empty()) else {
            return;
        };
        self.section(title);
        for item in items {
            render_item(self, item);
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Join panels with a blank line between them.
pub fn join_panels(panels: &[Panel]) -> String {
    panels
        .iter()
        .map(Panel::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn a camelCase key into a label: `bloodPressure` -> `Blood Pressure`.
pub fn humanize_key(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }

    let mut label = String::with_capacity(spaced.len());
    let mut word_start = true;
    for c in spaced.trim().chars() {
        if word_start {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        word_start = c.is_whitespace();
    }
    label
}

/// Two-space indented JSON, as the service would pretty-print it.
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Whether a value is rendered as a JSON block rather than inline text.
pub fn is_structured(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_) | Value::Null)
}

/// Whether an optional block has anything worth showing. `null`, `false`,
/// zero and empty strings count as missing.
pub fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn scalar_text(value: &Value) -> FieldText {
    FieldText::from(text_of(value).as_str())
}
