use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-node metadata handed to renderers.
///
/// Mirrors the tree's shape: `items` holds per-index data for arrays and
/// `fields` per-key data for objects. Every level is optional; a child with
/// no slice of its own inherits its parent's user data.
///
/// ```toml
/// [fields.color]
/// label = "Color"
/// type = "color"
///
/// [fields.additional_description]
/// hints = { add_label = "Add Description" }
/// items = [{ label = "Additional Description" }]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct UserData {
    /// Label shown next to the input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Input type hint (`color`, `date`, `url`, ...).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    /// Free-form hints understood by specific renderers.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub hints: BTreeMap<String, String>,
    /// Per-index overrides for array children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<UserData>>,
    /// Per-field overrides for object children.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, UserData>,
}

impl UserData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    pub fn with_hint(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.hints.insert(key.into(), value.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, data: UserData) -> Self {
        self.fields.insert(key.into(), data);
        self
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = UserData>) -> Self {
        self.items = Some(items.into_iter().collect());
        self
    }

    pub fn hint(&self, key: &str) -> Option<&str> {
        self.hints.get(key).map(String::as_str)
    }

    /// The slice for array index `index`, if one was given.
    pub fn item(&self, index: usize) -> Option<&UserData> {
        self.items.as_ref()?.get(index)
    }

    /// The slice for object field `key`, if one was given.
    pub fn field(&self, key: &str) -> Option<&UserData> {
        self.fields.get(key)
    }
}

/// User data for the child at `index`: its own slice, else the parent's.
pub fn slice_for_index(parent: Option<&UserData>, index: usize) -> Option<&UserData> {
    parent.and_then(|u| u.item(index)).or(parent)
}

/// User data for the field `key`: its own slice, else the parent's.
pub fn slice_for_field<'a>(parent: Option<&'a UserData>, key: &str) -> Option<&'a UserData> {
    parent.and_then(|u| u.field(key)).or(parent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slices_inherit_unless_overridden() {
        let data = UserData::labeled("root")
            .with_field("color", UserData::labeled("Color").with_type("color"))
            .with_items([UserData::labeled("first")]);

        assert_eq!(
            slice_for_field(Some(&data), "color").unwrap().input_type.as_deref(),
            Some("color")
        );
        assert_eq!(
            slice_for_field(Some(&data), "label").unwrap().label.as_deref(),
            Some("root")
        );
        assert_eq!(
            slice_for_index(Some(&data), 0).unwrap().label.as_deref(),
            Some("first")
        );
        assert_eq!(
            slice_for_index(Some(&data), 3).unwrap().label.as_deref(),
            Some("root")
        );
        assert!(slice_for_index(None, 0).is_none());
    }

    #[test]
    fn test_deserialize_from_toml() {
        let data: UserData = toml::from_str(
            r#"
            [fields.color]
            label = "Color"
            type = "color"

            [fields.additional_description]
            hints = { add_label = "Add Description" }
            items = [{ label = "Additional Description" }]
            "#,
        )
        .unwrap();

        assert_eq!(data.field("color").unwrap().input_type.as_deref(), Some("color"));
        let desc = data.field("additional_description").unwrap();
        assert_eq!(desc.hint("add_label"), Some("Add Description"));
        assert_eq!(desc.item(0).unwrap().label.as_deref(), Some("Additional Description"));
    }
}
