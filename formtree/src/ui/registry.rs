use std::{collections::BTreeMap, collections::HashMap, fmt, rc::Rc};

use crate::{
    data::{FormNode, NodeKind, RendererId, UserData},
    error::{FormTreeError, Result},
    ui::{Element, Setter, components},
};

/// Renders an `item` node.
pub trait ItemRenderer {
    fn render(
        &self,
        value: &str,
        set_value: Setter<String>,
        user_data: Option<&UserData>,
    ) -> Result<Element>;
}

/// Renders an `array` node.
///
/// `render_item(child, index)` renders one child; edits made through the
/// returned element rebuild the array with that index replaced.
pub trait ArrayRenderer {
    fn render(
        &self,
        items: &[FormNode],
        set_items: Setter<Vec<FormNode>>,
        render_item: &dyn Fn(&FormNode, usize) -> Result<Element>,
        user_data: Option<&UserData>,
    ) -> Result<Element>;
}

/// Renders an `object` node.
///
/// `render_field(key, child)` renders one field; edits made through the
/// returned element rebuild the object with that field replaced.
pub trait ObjectRenderer {
    fn render(
        &self,
        fields: &BTreeMap<String, FormNode>,
        set_fields: Setter<BTreeMap<String, FormNode>>,
        render_field: &dyn Fn(&str, &FormNode) -> Result<Element>,
        user_data: Option<&UserData>,
    ) -> Result<Element>;
}

impl<F> ItemRenderer for F
where
    F: Fn(&str, Setter<String>, Option<&UserData>) -> Result<Element>,
{
    fn render(
        &self,
        value: &str,
        set_value: Setter<String>,
        user_data: Option<&UserData>,
    ) -> Result<Element> {
        self(value, set_value, user_data)
    }
}

impl<F> ArrayRenderer for F
where
    F: Fn(
        &[FormNode],
        Setter<Vec<FormNode>>,
        &dyn Fn(&FormNode, usize) -> Result<Element>,
        Option<&UserData>,
    ) -> Result<Element>,
{
    fn render(
        &self,
        items: &[FormNode],
        set_items: Setter<Vec<FormNode>>,
        render_item: &dyn Fn(&FormNode, usize) -> Result<Element>,
        user_data: Option<&UserData>,
    ) -> Result<Element> {
        self(items, set_items, render_item, user_data)
    }
}

impl<F> ObjectRenderer for F
where
    F: Fn(
        &BTreeMap<String, FormNode>,
        Setter<BTreeMap<String, FormNode>>,
        &dyn Fn(&str, &FormNode) -> Result<Element>,
        Option<&UserData>,
    ) -> Result<Element>,
{
    fn render(
        &self,
        fields: &BTreeMap<String, FormNode>,
        set_fields: Setter<BTreeMap<String, FormNode>>,
        render_field: &dyn Fn(&str, &FormNode) -> Result<Element>,
        user_data: Option<&UserData>,
    ) -> Result<Element> {
        self(fields, set_fields, render_field, user_data)
    }
}

/// Maps [`RendererId`]s to renderers, one namespace per node kind.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    items: HashMap<RendererId, Rc<dyn ItemRenderer>>,
    arrays: HashMap<RendererId, Rc<dyn ArrayRenderer>>,
    objects: HashMap<RendererId, Rc<dyn ObjectRenderer>>,
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn ids<'a>(map: impl Iterator<Item = &'a RendererId>) -> Vec<&'a str> {
            let mut names: Vec<&str> = map.map(RendererId::as_str).collect();
            names.sort_unstable();
            names
        }
        f.debug_struct("RendererRegistry")
            .field("items", &ids(self.items.keys()))
            .field("arrays", &ids(self.arrays.keys()))
            .field("objects", &ids(self.objects.keys()))
            .finish()
    }
}

impl RendererRegistry {
    /// An empty registry: every node renders with the generic defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the stock renderers of [`components`].
    pub fn with_stock() -> Self {
        let mut registry = Self::new();
        registry
            .register_item(components::TEXT_FIELD, components::TextField)
            .register_item(components::FILE_INPUT, components::FileInputField)
            .register_array(components::LIST_EDITOR, components::ListEditor::default())
            .register_object(components::FIELD_LIST, components::FieldList);
        registry
    }

    pub fn register_item(
        &mut self,
        id: impl Into<RendererId>,
        renderer: impl ItemRenderer + 'static,
    ) -> &mut Self {
        self.items.insert(id.into(), Rc::new(renderer));
        self
    }

    pub fn register_array(
        &mut self,
        id: impl Into<RendererId>,
        renderer: impl ArrayRenderer + 'static,
    ) -> &mut Self {
        self.arrays.insert(id.into(), Rc::new(renderer));
        self
    }

    pub fn register_object(
        &mut self,
        id: impl Into<RendererId>,
        renderer: impl ObjectRenderer + 'static,
    ) -> &mut Self {
        self.objects.insert(id.into(), Rc::new(renderer));
        self
    }

    /// Register a closure as an item renderer.
    pub fn item_fn<F>(&mut self, id: impl Into<RendererId>, f: F) -> &mut Self
    where
        F: Fn(&str, Setter<String>, Option<&UserData>) -> Result<Element> + 'static,
    {
        self.register_item(id, f)
    }

    /// Register a closure as an array renderer.
    pub fn array_fn<F>(&mut self, id: impl Into<RendererId>, f: F) -> &mut Self
    where
        F: Fn(
                &[FormNode],
                Setter<Vec<FormNode>>,
                &dyn Fn(&FormNode, usize) -> Result<Element>,
                Option<&UserData>,
            ) -> Result<Element>
            + 'static,
    {
        self.register_array(id, f)
    }

    /// Register a closure as an object renderer.
    pub fn object_fn<F>(&mut self, id: impl Into<RendererId>, f: F) -> &mut Self
    where
        F: Fn(
                &BTreeMap<String, FormNode>,
                Setter<BTreeMap<String, FormNode>>,
                &dyn Fn(&str, &FormNode) -> Result<Element>,
                Option<&UserData>,
            ) -> Result<Element>
            + 'static,
    {
        self.register_object(id, f)
    }

    pub fn item(&self, id: &RendererId) -> Result<&dyn ItemRenderer> {
        self.items
            .get(id)
            .map(|r| r.as_ref())
            .ok_or_else(|| unknown(NodeKind::Item, id))
    }

    pub fn array(&self, id: &RendererId) -> Result<&dyn ArrayRenderer> {
        self.arrays
            .get(id)
            .map(|r| r.as_ref())
            .ok_or_else(|| unknown(NodeKind::Array, id))
    }

    pub fn object(&self, id: &RendererId) -> Result<&dyn ObjectRenderer> {
        self.objects
            .get(id)
            .map(|r| r.as_ref())
            .ok_or_else(|| unknown(NodeKind::Object, id))
    }

    /// Check that every renderer referenced in `node` is registered.
    pub fn validate(&self, node: &FormNode) -> Result<()> {
        match node {
            FormNode::Item { renderer, .. } => {
                if let Some(id) = renderer {
                    self.item(id)?;
                }
                Ok(())
            }
            FormNode::Array { items, renderer } => {
                if let Some(id) = renderer {
                    self.array(id)?;
                }
                items.iter().try_for_each(|child| self.validate(child))
            }
            FormNode::Object { fields, renderer } => {
                if let Some(id) = renderer {
                    self.object(id)?;
                }
                fields.values().try_for_each(|child| self.validate(child))
            }
        }
    }
}

fn unknown(kind: NodeKind, id: &RendererId) -> FormTreeError {
    FormTreeError::UnknownRenderer {
        kind,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_reports_missing_renderer() {
        let registry = RendererRegistry::with_stock();
        let node = FormNode::object([
            ("label", FormNode::item("").with_renderer(components::TEXT_FIELD)),
            ("tags", FormNode::array([]).with_renderer("carousel")),
        ]);
        match registry.validate(&node).unwrap_err() {
            FormTreeError::UnknownRenderer { kind, id } => {
                assert_eq!(kind, NodeKind::Array);
                assert_eq!(id, "carousel");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_namespaces_are_per_kind() {
        let registry = RendererRegistry::with_stock();
        // a text field is not an object renderer
        assert!(registry.object(&RendererId::new(components::TEXT_FIELD)).is_err());
        assert!(registry.item(&RendererId::new(components::TEXT_FIELD)).is_ok());
    }

    #[test]
    fn test_debug_lists_sorted_ids() {
        let shown = format!("{:?}", RendererRegistry::with_stock());
        assert_eq!(
            shown,
            r#"RendererRegistry { items: ["file-input", "text-field"], arrays: ["list-editor"], objects: ["field-list"] }"#
        );
    }
}
