//! Markup generation for attachment tables.
//!
//! - `widgets`: chooses the editor widget of an extra field and emits it.
//! - `options`: resolves linked option sources once per render pass.
//! - `row`: one row (plus its validation row in edit mode).
//! - `table`: header, body, template row, footer and suggestion lists.
//!
//! Rendering is a pure read of its inputs. The same inputs always produce
//! byte-identical markup.

pub mod options;
pub mod row;
pub mod table;
pub mod widgets;

pub use options::{OptionSources, ResolvedOptions, resolve_all};
pub use row::{RenderMode, RowContext, render_row};
pub use table::AttachmentTable;
pub use widgets::{Widget, resolve_widget};

/// Cell positions of a row, shared by header, rows, validation rows and footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Display name (download link or plain text).
    Name,
    /// One cell per extra field, in declaration order.
    Extras,
    /// Human-readable size.
    Size,
    /// Add/delete button.
    Action,
    /// Hidden binding fields.
    Binding,
}

/// Column order of editable tables. The action cell precedes the binding cell.
pub const EDIT_COLUMNS: &[Column] = &[
    Column::Name,
    Column::Extras,
    Column::Size,
    Column::Action,
    Column::Binding,
];

/// Column order of read-only tables.
pub const DISPLAY_COLUMNS: &[Column] = &[Column::Name, Column::Extras, Column::Size];

/// Escape text for use in element content and quoted attribute values.
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Minimal HTML element builder.
///
/// Classes render first, then attributes in insertion order.
#[derive(Debug, Clone)]
pub struct Element {
    tag: &'static str,
    classes: Vec<&'static str>,
    attributes: Vec<(&'static str, String)>,
    inner: String,
    void: bool,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attributes: Vec::new(),
            inner: String::new(),
            void: false,
        }
    }

    /// Element without content or closing tag (`input`).
    pub fn void(tag: &'static str) -> Self {
        Self {
            void: true,
            ..Self::new(tag)
        }
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    pub fn class_if(self, condition: bool, class: &'static str) -> Self {
        if condition { self.class(class) } else { self }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    /// Boolean attribute (`checked`, `selected`).
    pub fn flag(mut self, name: &'static str, present: bool) -> Self {
        if present {
            self.attributes.push((name, name.to_string()));
        }
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.inner.push_str(&escape(text));
        self
    }

    /// Append already rendered markup.
    pub fn html(mut self, markup: &str) -> Self {
        self.inner.push_str(markup);
        self
    }

    pub fn child(self, child: Element) -> Self {
        let markup = child.render();
        self.html(&markup)
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.inner.len() + 32);
        out.push('<');
        out.push_str(self.tag);
        if !self.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&self.classes.join(" "));
            out.push('"');
        }
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        out.push('>');
        if !self.void {
            out.push_str(&self.inner);
            out.push_str("</");
            out.push_str(self.tag);
            out.push('>');
        }
        out
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Apply a display format; `{0}` stands for the value.
pub fn apply_format(format: Option<&str>, value: &str) -> String {
    match format {
        Some(format) if format.contains("{0}") => format.replace("{0}", value),
        _ => value.to_string(),
    }
}
