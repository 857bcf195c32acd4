use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    data::path::child_path,
    error::{FormTreeError, Result},
};

/// Identifier of a renderer registered in a [`RendererRegistry`].
///
/// Nodes carry the id, never the renderer itself, so a tree stays plain data.
///
/// [`RendererRegistry`]: crate::ui::RendererRegistry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RendererId(String);

impl RendererId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RendererId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RendererId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&RendererId> for RendererId {
    fn from(value: &RendererId) -> Self {
        value.clone()
    }
}

impl fmt::Display for RendererId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant of a [`FormNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Item,
    Array,
    Object,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Item => "item",
            NodeKind::Array => "array",
            NodeKind::Object => "object",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a form tree.
///
/// The variant is fixed for the node's lifetime. Edits never mutate a shared
/// node; they produce a new root with the path to the edited node copied
/// (see [`FormNode::replace`]).
///
/// Serialised form is tagged by `kind`:
///
/// ```json
/// {"kind": "item", "value": "Math", "renderer": "text-field"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FormNode {
    /// A single string value.
    Item {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        renderer: Option<RendererId>,
    },
    /// An ordered list of child nodes.
    Array {
        items: Vec<FormNode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        renderer: Option<RendererId>,
    },
    /// Named child nodes.
    Object {
        fields: BTreeMap<String, FormNode>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        renderer: Option<RendererId>,
    },
}

impl FormNode {
    /// Create an `item` node without a renderer.
    pub fn item(value: impl Into<String>) -> Self {
        FormNode::Item {
            value: value.into(),
            renderer: None,
        }
    }

    /// Create an `array` node without a renderer.
    pub fn array(items: impl IntoIterator<Item = FormNode>) -> Self {
        FormNode::Array {
            items: items.into_iter().collect(),
            renderer: None,
        }
    }

    /// Create an `object` node without a renderer.
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, FormNode)>) -> Self {
        FormNode::Object {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            renderer: None,
        }
    }

    /// Return the node with its renderer reference replaced.
    pub fn with_renderer(mut self, id: impl Into<RendererId>) -> Self {
        self.set_renderer(Some(id.into()));
        self
    }

    pub(crate) fn set_renderer(&mut self, id: Option<RendererId>) {
        match self {
            FormNode::Item { renderer, .. }
            | FormNode::Array { renderer, .. }
            | FormNode::Object { renderer, .. } => *renderer = id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            FormNode::Item { .. } => NodeKind::Item,
            FormNode::Array { .. } => NodeKind::Array,
            FormNode::Object { .. } => NodeKind::Object,
        }
    }

    pub fn renderer(&self) -> Option<&RendererId> {
        match self {
            FormNode::Item { renderer, .. }
            | FormNode::Array { renderer, .. }
            | FormNode::Object { renderer, .. } => renderer.as_ref(),
        }
    }

    /// The string value of an `item` node.
    pub fn as_item(&self) -> Option<&str> {
        match self {
            FormNode::Item { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The children of an `array` node.
    pub fn items(&self) -> Option<&[FormNode]> {
        match self {
            FormNode::Array { items, .. } => Some(items),
            _ => None,
        }
    }

    /// The fields of an `object` node.
    pub fn fields(&self) -> Option<&BTreeMap<String, FormNode>> {
        match self {
            FormNode::Object { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Extract the plain value of the tree. Renderer ids are dropped.
    pub fn extract(&self) -> Value {
        match self {
            FormNode::Item { value, .. } => Value::String(value.clone()),
            FormNode::Array { items, .. } => Value::Array(items.iter().map(Self::extract).collect()),
            FormNode::Object { fields, .. } => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.extract()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }

    /// Extract the plain value and deserialize it into `T`.
    ///
    /// All leaves are strings, so `T` must accept strings where the form
    /// holds leaves. See [`crate::data::schema::cast_value`] for typed records.
    pub fn extract_as<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.extract())?)
    }

    /// Decode a serialised node and extract its plain value.
    ///
    /// Fails with [`FormTreeError::InvalidNodeKind`] when any node in `raw`
    /// carries an unknown or missing `kind` tag.
    pub fn extract_json(raw: &Value) -> Result<Value> {
        Ok(Self::from_json(raw)?.extract())
    }

    /// Decode a serialised node.
    pub fn from_json(raw: &Value) -> Result<Self> {
        parse_node(raw, "")
    }

    /// Fill this tree from a plain value of the same shape.
    ///
    /// Leaves take the string form of scalars (`null` clears them). Arrays
    /// are resized to the value's length; new elements are shaped like the
    /// first existing element. Fields absent from the value keep their
    /// current content, fields unknown to the tree are skipped.
    pub fn update_from_value(&mut self, value: &Value) -> Result<()> {
        self.update_at(value, "")
    }

    fn update_at(&mut self, value: &Value, path: &str) -> Result<()> {
        match self {
            FormNode::Item { value: current, .. } => {
                *current = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => String::new(),
                    other => {
                        return Err(FormTreeError::mismatch(
                            &display_path(path),
                            "string, number, or boolean",
                            other,
                        ));
                    }
                };
                Ok(())
            }
            FormNode::Array { items, .. } => match value {
                Value::Array(values) => {
                    let prototype = items.first().map(FormNode::blank);
                    items.truncate(values.len());
                    for (i, v) in values.iter().enumerate() {
                        let child_path = child_path(path, i);
                        if i >= items.len() {
                            let fresh = match &prototype {
                                Some(p) => p.clone(),
                                None => crate::data::Template::from(v)
                                    .build(&crate::data::BuildOptions::default()),
                            };
                            items.push(fresh);
                        }
                        items[i].update_at(v, &child_path)?;
                    }
                    Ok(())
                }
                Value::Null => Ok(()),
                other => Err(FormTreeError::mismatch(&display_path(path), "array", other)),
            },
            FormNode::Object { fields, .. } => match value {
                Value::Object(values) => {
                    for (key, v) in values {
                        match fields.get_mut(key) {
                            Some(field) => field.update_at(v, &child_path(path, key))?,
                            None => debug!("skipping unknown field `{}`", child_path(path, key)),
                        }
                    }
                    Ok(())
                }
                Value::Null => Ok(()),
                other => Err(FormTreeError::mismatch(&display_path(path), "object", other)),
            },
        }
    }

    /// A copy of this node with every leaf emptied and every array cut
    /// down to its first element.
    pub fn blank(&self) -> FormNode {
        match self {
            FormNode::Item { renderer, .. } => FormNode::Item {
                value: String::new(),
                renderer: renderer.clone(),
            },
            FormNode::Array { items, renderer } => FormNode::Array {
                items: items.first().map(FormNode::blank).into_iter().collect(),
                renderer: renderer.clone(),
            },
            FormNode::Object { fields, renderer } => FormNode::Object {
                fields: fields.iter().map(|(k, v)| (k.clone(), v.blank())).collect(),
                renderer: renderer.clone(),
            },
        }
    }
}

impl<'de> Deserialize<'de> for FormNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        FormNode::from_json(&raw).map_err(serde::de::Error::custom)
    }
}

pub(crate) fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

fn parse_renderer(map: &Map<String, Value>, path: &str) -> Result<Option<RendererId>> {
    match map.get("renderer") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(RendererId::new(id.clone()))),
        Some(other) => Err(FormTreeError::mismatch(
            &display_path(path),
            "renderer id string",
            other,
        )),
    }
}

fn parse_node(raw: &Value, path: &str) -> Result<FormNode> {
    let Value::Object(map) = raw else {
        return Err(FormTreeError::InvalidNodeKind {
            path: display_path(path),
            found: raw.to_string(),
        });
    };
    let renderer = parse_renderer(map, path)?;

    match map.get("kind") {
        Some(Value::String(kind)) if kind == "item" => match map.get("value") {
            Some(Value::String(value)) => Ok(FormNode::Item {
                value: value.clone(),
                renderer,
            }),
            other => Err(FormTreeError::mismatch(
                &display_path(path),
                "string `value`",
                other.unwrap_or(&Value::Null),
            )),
        },
        Some(Value::String(kind)) if kind == "array" => match map.get("items") {
            Some(Value::Array(raw_items)) => {
                let items = raw_items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| parse_node(item, &child_path(path, i)))
                    .collect::<Result<Vec<_>>>()?;
                Ok(FormNode::Array { items, renderer })
            }
            other => Err(FormTreeError::mismatch(
                &display_path(path),
                "array `items`",
                other.unwrap_or(&Value::Null),
            )),
        },
        Some(Value::String(kind)) if kind == "object" => match map.get("fields") {
            Some(Value::Object(raw_fields)) => {
                let fields = raw_fields
                    .iter()
                    .map(|(k, v)| -> Result<(String, FormNode)> {
                        Ok((k.clone(), parse_node(v, &child_path(path, k))?))
                    })
                    .collect::<Result<BTreeMap<_, _>>>()?;
                Ok(FormNode::Object { fields, renderer })
            }
            other => Err(FormTreeError::mismatch(
                &display_path(path),
                "object `fields`",
                other.unwrap_or(&Value::Null),
            )),
        },
        Some(other) => Err(FormTreeError::InvalidNodeKind {
            path: display_path(path),
            found: other.to_string(),
        }),
        None => Err(FormTreeError::InvalidNodeKind {
            path: display_path(path),
            found: "<missing>".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_drops_renderers() {
        let node = FormNode::object([
            ("icon", FormNode::item("a.svg").with_renderer("file-input")),
            ("tags", FormNode::array([FormNode::item("x")]).with_renderer("list-editor")),
        ]);
        assert_eq!(node.extract(), json!({"icon": "a.svg", "tags": ["x"]}));
    }

    #[test]
    fn test_serialized_round_trip() {
        let node = FormNode::object([(
            "label",
            FormNode::item("Math").with_renderer("text-field"),
        )]);
        let raw = serde_json::to_value(&node).unwrap();
        assert_eq!(
            raw,
            json!({
                "kind": "object",
                "fields": {"label": {"kind": "item", "value": "Math", "renderer": "text-field"}}
            })
        );
        let back: FormNode = serde_json::from_value(raw).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_unknown_kind_fails_loudly() {
        let raw = json!({
            "kind": "array",
            "items": [{"kind": "item", "value": "a"}, {"kind": "tuple", "values": []}]
        });
        let err = FormNode::extract_json(&raw).unwrap_err();
        match err {
            FormTreeError::InvalidNodeKind { path, found } => {
                assert_eq!(path, "1");
                assert_eq!(found, "\"tuple\"");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_kind_fails_loudly() {
        let err = FormNode::from_json(&json!({"value": "a"})).unwrap_err();
        assert!(matches!(err, FormTreeError::InvalidNodeKind { .. }));

        let err = serde_json::from_value::<FormNode>(json!({"kind": 3})).unwrap_err();
        assert!(err.to_string().contains("invalid node kind"));
    }

    #[test]
    fn test_update_from_value_grows_arrays() {
        let mut node = FormNode::object([
            ("label", FormNode::item("")),
            (
                "additional_description",
                FormNode::array([FormNode::item("").with_renderer("text-field")]),
            ),
        ]);
        node.update_from_value(&json!({
            "label": "Robotics",
            "additional_description": ["one", "two"],
            "unknown": 1
        }))
        .unwrap();

        assert_eq!(
            node.extract(),
            json!({"label": "Robotics", "additional_description": ["one", "two"]})
        );
        let items = node.fields().unwrap()["additional_description"].items().unwrap();
        assert_eq!(items[1].renderer().map(RendererId::as_str), Some("text-field"));
    }

    #[test]
    fn test_update_from_value_type_mismatch() {
        let mut node = FormNode::object([("tags", FormNode::array([FormNode::item("")]))]);
        let err = node.update_from_value(&json!({"tags": "oops"})).unwrap_err();
        match err {
            FormTreeError::TypeMismatch { path, expected, .. } => {
                assert_eq!(path, "tags");
                assert_eq!(expected, "array");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_update_from_value_stringifies_scalars() {
        let mut node = FormNode::array([FormNode::item("")]);
        node.update_from_value(&json!([7, true, null])).unwrap();
        assert_eq!(node.extract(), json!(["7", "true", ""]));
    }
}
