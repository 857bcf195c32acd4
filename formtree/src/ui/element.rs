use std::fmt;

use crate::ui::Callback;

/// Single-line text editor.
#[derive(Debug, Clone)]
pub struct TextInput {
    pub value: String,
    pub label: Option<String>,
    /// Input type hint (`color`, `date`, ...), passed through from user data.
    pub input_type: Option<String>,
    pub on_input: Callback<String>,
}

impl TextInput {
    /// Simulate the user typing `value` into the input.
    pub fn input(&self, value: impl Into<String>) {
        self.on_input.emit(value.into())
    }
}

/// File picker; the selected file is reported by path or URL.
#[derive(Debug, Clone)]
pub struct FileInput {
    pub current: String,
    pub label: Option<String>,
    pub on_select: Callback<String>,
}

impl FileInput {
    pub fn select(&self, file: impl Into<String>) {
        self.on_select.emit(file.into())
    }
}

#[derive(Debug, Clone)]
pub struct Button {
    pub label: String,
    pub on_click: Callback<()>,
}

impl Button {
    pub fn click(&self) {
        self.on_click.emit(())
    }
}

/// Host-neutral element tree produced by rendering a form.
#[derive(Debug, Clone)]
pub enum Element {
    Empty,
    Text(String),
    TextInput(TextInput),
    FileInput(FileInput),
    Button(Button),
    /// Children stacked vertically.
    Group(Vec<Element>),
    /// Children laid out on one line.
    Row(Vec<Element>),
    /// An object field: its key and rendered child.
    Field { key: String, child: Box<Element> },
}

impl Element {
    pub fn field(key: impl Into<String>, child: Element) -> Self {
        Element::Field {
            key: key.into(),
            child: Box::new(child),
        }
    }

    pub fn button(label: impl Into<String>, on_click: Callback<()>) -> Self {
        Element::Button(Button {
            label: label.into(),
            on_click,
        })
    }

    /// Direct children of this element.
    pub fn children(&self) -> &[Element] {
        match self {
            Element::Group(children) | Element::Row(children) => children,
            Element::Field { child, .. } => std::slice::from_ref(child.as_ref()),
            _ => &[],
        }
    }

    /// Visit this element and all descendants in document order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    pub fn text_inputs(&self) -> Vec<&TextInput> {
        let mut out = Vec::new();
        self.walk(&mut |e| {
            if let Element::TextInput(input) = e {
                out.push(input);
            }
        });
        out
    }

    pub fn buttons(&self) -> Vec<&Button> {
        let mut out = Vec::new();
        self.walk(&mut |e| {
            if let Element::Button(button) = e {
                out.push(button);
            }
        });
        out
    }

    /// First text input whose label is `label`.
    pub fn find_input(&self, label: &str) -> Option<&TextInput> {
        self.text_inputs()
            .into_iter()
            .find(|input| input.label.as_deref() == Some(label))
    }

    /// First file input whose label is `label`.
    pub fn find_file_input(&self, label: &str) -> Option<&FileInput> {
        let mut found = None;
        self.walk(&mut |e| {
            if let Element::FileInput(input) = e
                && found.is_none()
                && input.label.as_deref() == Some(label)
            {
                found = Some(input);
            }
        });
        found
    }

    /// First button whose label is `label`.
    pub fn find_button(&self, label: &str) -> Option<&Button> {
        self.buttons().into_iter().find(|b| b.label == label)
    }

    /// Rendered child of the first field named `key`.
    pub fn find_field(&self, key: &str) -> Option<&Element> {
        let mut found = None;
        self.walk(&mut |e| {
            if let Element::Field { key: k, child } = e
                && found.is_none()
                && k == key
            {
                found = Some(child.as_ref());
            }
        });
        found
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            Element::Empty => Ok(()),
            Element::Text(text) => writeln!(f, "{pad}{text}"),
            Element::TextInput(input) => {
                let label = input.label.as_deref().unwrap_or("");
                match &input.input_type {
                    Some(t) => writeln!(f, "{pad}{label} [{}] ({t})", input.value),
                    None => writeln!(f, "{pad}{label} [{}]", input.value),
                }
            }
            Element::FileInput(input) => {
                let label = input.label.as_deref().unwrap_or("");
                writeln!(f, "{pad}{label} <file: {}>", input.current)
            }
            Element::Button(button) => writeln!(f, "{pad}({})", button.label),
            Element::Group(children) => children
                .iter()
                .try_for_each(|c| c.write_indented(f, depth)),
            Element::Row(children) => {
                let cells: Vec<String> = children
                    .iter()
                    .map(|c| c.to_string().trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                writeln!(f, "{pad}{}", cells.join("  "))
            }
            Element::Field { key, child } => {
                writeln!(f, "{pad}{key}:")?;
                child.write_indented(f, depth + 1)
            }
        }
    }
}

/// Indented plain-text rendering, one element per line.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}
