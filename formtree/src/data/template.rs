use std::collections::BTreeMap;

use serde_json::Value;

use crate::data::{
    node::{FormNode, RendererId},
    user_data::UserData,
};

/// A stringified template: the plain shape a form tree is built from.
///
/// Every leaf is a string. A template node may be paired with an explicit
/// renderer ([`Template::Rendered`]), which overrides the default renderer
/// for that single node.
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    Leaf(String),
    Array(Vec<Template>),
    Object(BTreeMap<String, Template>),
    /// A template with an explicit renderer for its own node.
    Rendered(Box<Template>, RendererId),
    /// An already built tree; building returns it unchanged.
    Node(FormNode),
}

impl Template {
    pub fn leaf(value: impl Into<String>) -> Self {
        Template::Leaf(value.into())
    }

    pub fn array(items: impl IntoIterator<Item = Template>) -> Self {
        Template::Array(items.into_iter().collect())
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Template)>) -> Self {
        Template::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Pair this template with an explicit renderer.
    pub fn with_renderer(self, id: impl Into<RendererId>) -> Self {
        Template::Rendered(Box::new(self), id.into())
    }

    /// Build a form tree. Shorthand for [`build`].
    pub fn build(&self, options: &BuildOptions) -> FormNode {
        build(self, options)
    }
}

impl From<&str> for Template {
    fn from(value: &str) -> Self {
        Template::leaf(value)
    }
}

impl From<String> for Template {
    fn from(value: String) -> Self {
        Template::Leaf(value)
    }
}

impl From<FormNode> for Template {
    fn from(value: FormNode) -> Self {
        Template::Node(value)
    }
}

/// Convert a plain JSON value into a template.
///
/// Numbers and booleans become their string form, `null` the empty string.
impl From<&Value> for Template {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Template::Leaf(String::new()),
            Value::String(s) => Template::Leaf(s.clone()),
            Value::Bool(b) => Template::Leaf(b.to_string()),
            Value::Number(n) => Template::Leaf(n.to_string()),
            Value::Array(items) => Template::Array(items.iter().map(Template::from).collect()),
            Value::Object(fields) => Template::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Template::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for Template {
    fn from(value: Value) -> Self {
        Template::from(&value)
    }
}

/// Defaults applied while building a tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOptions {
    /// Renderer given to every `item` without an explicit one.
    pub item_renderer: Option<RendererId>,
    /// Renderer given to every `array` without an explicit one.
    pub array_renderer: Option<RendererId>,
    /// Renderer given to every `object` without an explicit one.
    pub object_renderer: Option<RendererId>,
    /// User data threaded through rendering. The builder ignores it.
    pub user_data: Option<UserData>,
}

impl BuildOptions {
    pub fn with_item_renderer(mut self, id: impl Into<RendererId>) -> Self {
        self.item_renderer = Some(id.into());
        self
    }

    pub fn with_array_renderer(mut self, id: impl Into<RendererId>) -> Self {
        self.array_renderer = Some(id.into());
        self
    }

    pub fn with_object_renderer(mut self, id: impl Into<RendererId>) -> Self {
        self.object_renderer = Some(id.into());
        self
    }

    pub fn with_user_data(mut self, user_data: UserData) -> Self {
        self.user_data = Some(user_data);
        self
    }
}

/// Build a form tree from a template.
///
/// Children are built with the same options. A [`Template::Node`] is
/// returned as is, without re-applying defaults.
pub fn build(template: &Template, options: &BuildOptions) -> FormNode {
    match template {
        Template::Leaf(value) => FormNode::Item {
            value: value.clone(),
            renderer: options.item_renderer.clone(),
        },
        Template::Array(items) => FormNode::Array {
            items: items.iter().map(|t| build(t, options)).collect(),
            renderer: options.array_renderer.clone(),
        },
        Template::Object(fields) => FormNode::Object {
            fields: fields
                .iter()
                .map(|(k, t)| (k.clone(), build(t, options)))
                .collect(),
            renderer: options.object_renderer.clone(),
        },
        Template::Rendered(inner, id) => {
            let mut node = build(inner, options);
            node.set_renderer(Some(id.clone()));
            node
        }
        Template::Node(node) => node.clone(),
    }
}
