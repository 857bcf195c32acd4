use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    data::{
        node::FormNode,
        path::{NodePath, PathSegment, replace_index},
        template::{BuildOptions, Template, build},
        user_data::UserData,
    },
    error::{FormTreeError, Result},
    ui::{Callback, Element, FormRenderer, RendererRegistry},
};

/// Host-side state of one form.
///
/// Owns the root node and remembers the template and options it was built
/// from, so [`FormState::reset`] always returns to the original blank form.
#[derive(Debug, Clone)]
pub struct FormState {
    initial: Template,
    options: BuildOptions,
    /// Current root of the form tree.
    pub root: FormNode,
    /// Whether the form has been edited since it was built or reset.
    pub needs_save: bool,
}

impl FormState {
    /// Build the form from `template` with the given defaults.
    pub fn new(template: impl Into<Template>, options: BuildOptions) -> Self {
        let initial = template.into();
        let root = build(&initial, &options);
        Self {
            initial,
            options,
            root,
            needs_save: false,
        }
    }

    pub fn root(&self) -> &FormNode {
        &self.root
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn user_data(&self) -> Option<&UserData> {
        self.options.user_data.as_ref()
    }

    /// Replace the whole tree, as the root `on_change` does.
    pub fn set_root(&mut self, root: FormNode) {
        if root != self.root {
            self.needs_save = true;
        }
        self.root = root;
    }

    /// Rebuild the form from the original template and options.
    pub fn reset(&mut self) {
        debug!("resetting form to its initial template");
        self.root = build(&self.initial, &self.options);
        self.needs_save = false;
    }

    /// The plain value of the form.
    pub fn value(&self) -> Value {
        self.root.extract()
    }

    /// The plain value deserialized into `T`.
    pub fn value_as<T: DeserializeOwned>(&self) -> Result<T> {
        self.root.extract_as()
    }

    /// The node at a dotted path.
    pub fn get(&self, path: &str) -> Option<&FormNode> {
        self.root.get_by_key(path)
    }

    /// Set the `item` at `path` to `value`.
    pub fn set_at(&mut self, path: &str, value: impl Into<String>) -> Result<()> {
        let root = self.root.set_value(&NodePath::parse(path), value)?;
        self.set_root(root);
        Ok(())
    }

    /// Replace the node at `path`.
    pub fn replace_at(&mut self, path: &str, node: FormNode) -> Result<()> {
        let root = self.root.replace(&NodePath::parse(path), node)?;
        self.set_root(root);
        Ok(())
    }

    /// Append a blank element to the array at `path`.
    ///
    /// The new element is shaped like the array's first element, or is an
    /// empty `item` carrying the default item renderer when the array is
    /// empty. Returns the path of the new element.
    pub fn append_at(&mut self, path: &str) -> Result<String> {
        let target = NodePath::parse(path);
        let node = self
            .root
            .get(&target)
            .ok_or_else(|| FormTreeError::PathNotFound(path.to_string()))?;
        let FormNode::Array { items, renderer } = node else {
            return Err(FormTreeError::mismatch(path, "array", node.kind()));
        };
        let fresh = match items.first() {
            Some(first) => first.blank(),
            None => build(&Template::leaf(""), &self.options),
        };
        let child = target.child(PathSegment::Index(items.len()));
        let grown = FormNode::Array {
            items: replace_index(items, items.len(), fresh),
            renderer: renderer.clone(),
        };
        let root = self.root.replace(&target, grown)?;
        self.set_root(root);
        Ok(child.to_string())
    }

    /// Fill the current tree from a plain record.
    ///
    /// The record is applied to a copy; on error the form is unchanged.
    pub fn load_record(&mut self, record: &Value) -> Result<()> {
        let mut root = self.root.clone();
        root.update_from_value(record)?;
        self.set_root(root);
        Ok(())
    }

    /// A root `on_change` callback writing into `state`.
    ///
    /// Holds a weak reference; edits arriving after the state was dropped
    /// are ignored.
    pub fn on_change(state: &Rc<RefCell<Self>>) -> Callback<FormNode> {
        let weak: Weak<RefCell<Self>> = Rc::downgrade(state);
        Callback::new(move |root: FormNode| match weak.upgrade() {
            Some(state) => state.borrow_mut().set_root(root),
            None => warn!("form edit dropped: form state no longer exists"),
        })
    }

    /// Render the current tree, wiring edits back into `state`.
    pub fn render(state: &Rc<RefCell<Self>>, registry: &RendererRegistry) -> Result<Element> {
        let (root, user_data) = {
            let s = state.borrow();
            (s.root.clone(), s.options.user_data.clone())
        };
        FormRenderer::new(registry).render(&root, Self::on_change(state), user_data.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state() -> FormState {
        FormState::new(
            Template::object([
                ("label", Template::leaf("")),
                ("tags", Template::array([Template::leaf("")])),
            ]),
            BuildOptions::default().with_item_renderer("text-field"),
        )
    }

    #[test]
    fn test_edit_and_reset() {
        let mut form = state();
        assert!(!form.needs_save);

        form.set_at("label", "Math").unwrap();
        let new_tag = form.append_at("tags").unwrap();
        assert_eq!(new_tag, "tags.1");
        form.set_at(&new_tag, "new").unwrap();

        assert!(form.needs_save);
        assert_eq!(form.value(), json!({"label": "Math", "tags": ["", "new"]}));

        form.reset();
        assert!(!form.needs_save);
        assert_eq!(form.value(), json!({"label": "", "tags": [""]}));
    }

    #[test]
    fn test_append_keeps_item_renderer() {
        let mut form = state();
        form.append_at("tags").unwrap();
        let added = form.get("tags.1").unwrap();
        assert_eq!(added.renderer().unwrap().as_str(), "text-field");
    }

    #[test]
    fn test_append_grows_empty_and_root_arrays() {
        let mut form = FormState::new(
            Template::object([("tags", Template::array([]))]),
            BuildOptions::default().with_item_renderer("text-field"),
        );
        assert_eq!(form.append_at("tags").unwrap(), "tags.0");
        assert_eq!(form.append_at("tags").unwrap(), "tags.1");
        assert_eq!(form.value(), json!({"tags": ["", ""]}));
        assert!(form.needs_save);

        let mut list = FormState::new(
            Template::array([Template::leaf("first")]),
            BuildOptions::default(),
        );
        assert_eq!(list.append_at("").unwrap(), "1");
        assert_eq!(list.value(), json!(["first", ""]));
    }

    #[test]
    fn test_append_to_missing_path() {
        let mut form = state();
        assert!(matches!(
            form.append_at("nope"),
            Err(FormTreeError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_append_to_non_array() {
        let mut form = state();
        assert!(matches!(
            form.append_at("label"),
            Err(FormTreeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_load_record_failure_leaves_form_untouched() {
        let mut form = state();
        form.set_at("label", "kept").unwrap();
        let before = form.root.clone();
        assert!(form.load_record(&json!({"label": "x", "tags": {}})).is_err());
        assert_eq!(form.root, before);
    }

    #[test]
    fn test_on_change_after_drop_is_ignored() {
        let shared = Rc::new(RefCell::new(state()));
        let on_change = FormState::on_change(&shared);
        drop(shared);
        on_change.emit(FormNode::item("late"));
    }
}
