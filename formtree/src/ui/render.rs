use std::{collections::BTreeMap, rc::Rc};

use crate::{
    data::{
        FormNode, UserData,
        path::replace_index,
        user_data::{slice_for_field, slice_for_index},
    },
    error::Result,
    ui::{Callback, Element, RendererRegistry, Setter, TextInput},
};

/// Dispatches nodes to the renderers named by their [`RendererId`](crate::RendererId)s.
///
/// Every element produced from one `render` call works against the tree as
/// it was at that moment: an edit rebuilds the path from the edited node to
/// the root out of that snapshot and emits the new root through `on_change`
/// once. Hosts re-render after each change to pick up the new snapshot.
#[derive(Debug, Clone, Copy)]
pub struct FormRenderer<'r> {
    registry: &'r RendererRegistry,
}

impl<'r> FormRenderer<'r> {
    pub fn new(registry: &'r RendererRegistry) -> Self {
        Self { registry }
    }

    /// Render `node`; edits anywhere below it are reported as a whole new
    /// `node` through `on_change`.
    ///
    /// # Errors
    ///
    /// Returns [`FormTreeError::UnknownRenderer`](crate::FormTreeError::UnknownRenderer)
    /// when a node names a renderer that is not registered for its kind, or
    /// whatever error a renderer itself reports.
    pub fn render(
        &self,
        node: &FormNode,
        on_change: Callback<FormNode>,
        user_data: Option<&UserData>,
    ) -> Result<Element> {
        match node {
            FormNode::Item { value, renderer } => {
                let id = renderer.clone();
                let set_value = Setter::new(
                    value.clone(),
                    on_change.map(move |value: String| FormNode::Item {
                        value,
                        renderer: id.clone(),
                    }),
                );
                match renderer {
                    Some(id) => self.registry.item(id)?.render(value, set_value, user_data),
                    None => Ok(default_item(value, set_value, user_data)),
                }
            }
            FormNode::Array { items, renderer } => {
                let id = renderer.clone();
                let items_change = on_change.map(move |items: Vec<FormNode>| FormNode::Array {
                    items,
                    renderer: id.clone(),
                });
                let snapshot = Rc::new(items.clone());
                let render_item = |child: &FormNode, index: usize| -> Result<Element> {
                    let snapshot = Rc::clone(&snapshot);
                    let child_change = items_change
                        .map(move |child: FormNode| replace_index(&snapshot, index, child));
                    self.render(child, child_change, slice_for_index(user_data, index))
                };
                let set_items = Setter::new(items.clone(), items_change.clone());
                match renderer {
                    Some(id) => self
                        .registry
                        .array(id)?
                        .render(items, set_items, &render_item, user_data),
                    None => items
                        .iter()
                        .enumerate()
                        .map(|(index, child)| render_item(child, index))
                        .collect::<Result<Vec<_>>>()
                        .map(Element::Group),
                }
            }
            FormNode::Object { fields, renderer } => {
                let id = renderer.clone();
                let fields_change =
                    on_change.map(move |fields: BTreeMap<String, FormNode>| FormNode::Object {
                        fields,
                        renderer: id.clone(),
                    });
                let snapshot = Rc::new(fields.clone());
                let render_field = |key: &str, child: &FormNode| -> Result<Element> {
                    let snapshot = Rc::clone(&snapshot);
                    let key_owned = key.to_string();
                    let child_change = fields_change.map(move |child: FormNode| {
                        let mut next = (*snapshot).clone();
                        next.insert(key_owned.clone(), child);
                        next
                    });
                    self.render(child, child_change, slice_for_field(user_data, key))
                };
                let set_fields = Setter::new(fields.clone(), fields_change.clone());
                match renderer {
                    Some(id) => self
                        .registry
                        .object(id)?
                        .render(fields, set_fields, &render_field, user_data),
                    None => fields
                        .iter()
                        .map(|(key, child)| {
                            render_field(key, child).map(|element| Element::field(key, element))
                        })
                        .collect::<Result<Vec<_>>>()
                        .map(Element::Group),
                }
            }
        }
    }
}

/// Plain text input used for items without a renderer.
fn default_item(value: &str, set_value: Setter<String>, user_data: Option<&UserData>) -> Element {
    Element::TextInput(TextInput {
        value: value.to_string(),
        label: user_data.and_then(|u| u.label.clone()),
        input_type: user_data.and_then(|u| u.input_type.clone()),
        on_input: set_value.callback(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        FormTreeError,
        data::{BuildOptions, Template},
    };
    use serde_json::json;
    use std::cell::RefCell;

    fn recorder() -> (Rc<RefCell<Vec<FormNode>>>, Callback<FormNode>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let seen = seen.clone();
            Callback::new(move |root: FormNode| seen.borrow_mut().push(root))
        };
        (seen, sink)
    }

    #[test]
    fn test_nested_edit_rebuilds_root_once() {
        let root = Template::object([(
            "parts",
            Template::array([Template::object([("title", Template::leaf("intro"))])]),
        )])
        .build(&BuildOptions::default());

        let registry = RendererRegistry::new();
        let (seen, on_change) = recorder();
        let element = FormRenderer::new(&registry)
            .render(&root, on_change, None)
            .unwrap();

        let inputs = element.text_inputs();
        assert_eq!(inputs.len(), 1);
        inputs[0].input("outline");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].extract(), json!({"parts": [{"title": "outline"}]}));
        // the tree that was rendered is untouched
        assert_eq!(root.extract(), json!({"parts": [{"title": "intro"}]}));
    }

    #[test]
    fn test_default_item_uses_user_data() {
        let user_data = UserData::new().with_field(
            "color",
            UserData::labeled("Цвет").with_type("color"),
        );
        let root = FormNode::object([("color", FormNode::item("#fff"))]);
        let registry = RendererRegistry::new();
        let element = FormRenderer::new(&registry)
            .render(&root, Callback::noop(), Some(&user_data))
            .unwrap();

        let input = element.find_input("Цвет").unwrap();
        assert_eq!(input.value, "#fff");
        assert_eq!(input.input_type.as_deref(), Some("color"));
        assert!(element.find_field("color").is_some());
    }

    #[test]
    fn test_custom_renderers_receive_renderer_preserving_setters() {
        let mut registry = RendererRegistry::new();
        registry.item_fn("upper", |value: &str, set: Setter<String>, _: Option<&UserData>| {
            let upper = value.to_uppercase();
            Ok(Element::button(upper.clone(), set.callback().map(move |_: ()| upper.clone())))
        });

        let root = FormNode::array([FormNode::item("a").with_renderer("upper")])
            .with_renderer("missing-is-fine-once-registered");
        registry.array_fn(
            "missing-is-fine-once-registered",
            |items: &[FormNode],
             _: Setter<Vec<FormNode>>,
             render_item: &dyn Fn(&FormNode, usize) -> Result<Element>,
             _: Option<&UserData>| {
                items
                    .iter()
                    .enumerate()
                    .map(|(i, child)| render_item(child, i))
                    .collect::<Result<Vec<_>>>()
                    .map(Element::Row)
            },
        );

        let (seen, on_change) = recorder();
        let element = FormRenderer::new(&registry)
            .render(&root, on_change, None)
            .unwrap();
        element.find_button("A").unwrap().click();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        let item = &seen[0].items().unwrap()[0];
        assert_eq!(item.as_item(), Some("A"));
        assert_eq!(item.renderer().unwrap().as_str(), "upper");
        assert_eq!(
            seen[0].renderer().unwrap().as_str(),
            "missing-is-fine-once-registered"
        );
    }

    #[test]
    fn test_unknown_renderer_is_an_error() {
        let registry = RendererRegistry::new();
        let root = FormNode::object([("x", FormNode::item("").with_renderer("nope"))]);
        let err = FormRenderer::new(&registry)
            .render(&root, Callback::noop(), None)
            .unwrap_err();
        assert!(matches!(err, FormTreeError::UnknownRenderer { .. }));
    }
}
