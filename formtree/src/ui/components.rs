//! Stock renderers, registered by [`RendererRegistry::with_stock`](crate::RendererRegistry::with_stock).
//!
//! | id            | kind   | element                                          |
//! |---------------|--------|--------------------------------------------------|
//! | `text-field`  | item   | labelled [`TextInput`]                           |
//! | `file-input`  | item   | labelled [`FileInput`]                           |
//! | `list-editor` | array  | one row per element, remove and add buttons      |
//! | `field-list`  | object | fields stacked without key captions              |

use std::collections::BTreeMap;

use crate::{
    data::{FormNode, RendererId, UserData},
    error::Result,
    ui::{
        ArrayRenderer, Callback, Element, FileInput, ItemRenderer, ObjectRenderer, Setter,
        TextInput,
    },
};

pub const TEXT_FIELD: &str = "text-field";
pub const FILE_INPUT: &str = "file-input";
pub const LIST_EDITOR: &str = "list-editor";
pub const FIELD_LIST: &str = "field-list";

/// User-data hint overriding the list editor's add button label.
pub const ADD_LABEL_HINT: &str = "add_label";

/// Text input labelled and typed from user data.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextField;

impl ItemRenderer for TextField {
    fn render(
        &self,
        value: &str,
        set_value: Setter<String>,
        user_data: Option<&UserData>,
    ) -> Result<Element> {
        Ok(Element::TextInput(TextInput {
            value: value.to_string(),
            label: user_data.and_then(|u| u.label.clone()),
            input_type: user_data.and_then(|u| u.input_type.clone()),
            on_input: set_value.callback(),
        }))
    }
}

/// File picker storing the selected file's path as the item value.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileInputField;

impl ItemRenderer for FileInputField {
    fn render(
        &self,
        value: &str,
        set_value: Setter<String>,
        user_data: Option<&UserData>,
    ) -> Result<Element> {
        Ok(Element::FileInput(FileInput {
            current: value.to_string(),
            label: user_data.and_then(|u| u.label.clone()),
            on_select: set_value.callback(),
        }))
    }
}

/// Editable list.
///
/// Every element but the first gets a `Remove` button, so the list never
/// becomes empty through the editor. The add button appends an empty item
/// rendered by `item_renderer`.
#[derive(Debug, Clone)]
pub struct ListEditor {
    pub item_renderer: RendererId,
    pub add_label: String,
}

impl Default for ListEditor {
    fn default() -> Self {
        Self {
            item_renderer: RendererId::new(TEXT_FIELD),
            add_label: "Add".to_string(),
        }
    }
}

impl ArrayRenderer for ListEditor {
    fn render(
        &self,
        items: &[FormNode],
        set_items: Setter<Vec<FormNode>>,
        render_item: &dyn Fn(&FormNode, usize) -> Result<Element>,
        user_data: Option<&UserData>,
    ) -> Result<Element> {
        let mut rows = Vec::with_capacity(items.len() + 1);
        for (index, child) in items.iter().enumerate() {
            let mut row = vec![render_item(child, index)?];
            if index != 0 {
                let setter = set_items.clone();
                row.push(Element::button(
                    "Remove",
                    Callback::new(move |_: ()| {
                        setter.update(|prev| {
                            prev.iter()
                                .enumerate()
                                .filter(|(i, _)| *i != index)
                                .map(|(_, node)| node.clone())
                                .collect()
                        })
                    }),
                ));
            }
            rows.push(Element::Row(row));
        }

        let label = user_data
            .and_then(|u| u.hint(ADD_LABEL_HINT))
            .unwrap_or(self.add_label.as_str())
            .to_string();
        let fresh = FormNode::item("").with_renderer(&self.item_renderer);
        rows.push(Element::button(
            label,
            Callback::new(move |_: ()| {
                set_items.update(|prev| {
                    let mut next = prev.clone();
                    next.push(fresh.clone());
                    next
                })
            }),
        ));
        Ok(Element::Group(rows))
    }
}

/// Object fields stacked in key order, without key captions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldList;

impl ObjectRenderer for FieldList {
    fn render(
        &self,
        fields: &BTreeMap<String, FormNode>,
        _set_fields: Setter<BTreeMap<String, FormNode>>,
        render_field: &dyn Fn(&str, &FormNode) -> Result<Element>,
        _user_data: Option<&UserData>,
    ) -> Result<Element> {
        fields
            .iter()
            .map(|(key, child)| render_field(key, child))
            .collect::<Result<Vec<_>>>()
            .map(Element::Group)
    }
}
