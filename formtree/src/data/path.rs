use std::{fmt, str::FromStr};

use crate::{
    data::node::{FormNode, display_path},
    error::{FormTreeError, Result},
};

/// One step of a [`NodePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Array index. On an object node it names the field `"{index}"`.
    Index(usize),
    /// Object field name.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{i}"),
            PathSegment::Key(k) => f.write_str(k),
        }
    }
}

/// Address of a node inside a form tree.
///
/// The textual form is dot separated: `additional_description.1`.
/// Numeric segments are indices, everything else is a field name.
/// The empty string is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<PathSegment>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        NodePath(
            path.split('.')
                .map(|s| match s.parse::<usize>() {
                    Ok(i) => PathSegment::Index(i),
                    Err(_) => PathSegment::Key(s.to_string()),
                })
                .collect(),
        )
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Return this path extended by one segment.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut next = self.clone();
        next.0.push(segment);
        next
    }

    /// Split off the last segment.
    pub fn split_last(&self) -> Option<(NodePath, &PathSegment)> {
        let (last, parent) = self.0.split_last()?;
        Some((NodePath(parent.to_vec()), last))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for NodePath {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

pub(crate) fn child_path(parent: &str, segment: impl fmt::Display) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}.{segment}")
    }
}

impl FormNode {
    /// The direct child addressed by `segment`.
    pub fn child(&self, segment: &PathSegment) -> Option<&FormNode> {
        match (self, segment) {
            (FormNode::Array { items, .. }, PathSegment::Index(i)) => items.get(*i),
            (FormNode::Object { fields, .. }, PathSegment::Key(k)) => fields.get(k),
            (FormNode::Object { fields, .. }, PathSegment::Index(i)) => fields.get(&i.to_string()),
            _ => None,
        }
    }

    /// The node at `path`, if any.
    pub fn get(&self, path: &NodePath) -> Option<&FormNode> {
        path.segments()
            .iter()
            .try_fold(self, |node, segment| node.child(segment))
    }

    /// The node at a dotted path string, if any.
    pub fn get_by_key(&self, key: &str) -> Option<&FormNode> {
        self.get(&NodePath::parse(key))
    }

    /// Build a new tree with the node at `path` replaced by `node`.
    ///
    /// Every ancestor on the path is copied with only the one child
    /// swapped; `self` is left untouched.
    pub fn replace(&self, path: &NodePath, node: FormNode) -> Result<FormNode> {
        self.replace_from(path.segments(), node, path)
    }

    fn replace_from(
        &self,
        segments: &[PathSegment],
        node: FormNode,
        full: &NodePath,
    ) -> Result<FormNode> {
        let Some((head, rest)) = segments.split_first() else {
            return Ok(node);
        };
        let child = self
            .child(head)
            .ok_or_else(|| FormTreeError::PathNotFound(full.to_string()))?;
        let replaced = child.replace_from(rest, node, full)?;
        Ok(self.with_child(head, replaced))
    }

    /// Build a new tree where the `item` at `path` holds `value`.
    ///
    /// The item keeps its renderer reference.
    pub fn set_value(&self, path: &NodePath, value: impl Into<String>) -> Result<FormNode> {
        let target = self
            .get(path)
            .ok_or_else(|| FormTreeError::PathNotFound(path.to_string()))?;
        match target {
            FormNode::Item { renderer, .. } => self.replace(
                path,
                FormNode::Item {
                    value: value.into(),
                    renderer: renderer.clone(),
                },
            ),
            other => Err(FormTreeError::NotAnItem {
                path: display_path(&path.to_string()),
                kind: other.kind(),
            }),
        }
    }

    /// Shallow copy of this node with one direct child swapped.
    ///
    /// An index one past the end of an array appends.
    pub(crate) fn with_child(&self, segment: &PathSegment, child: FormNode) -> FormNode {
        match (self, segment) {
            (FormNode::Array { items, renderer }, PathSegment::Index(i)) => FormNode::Array {
                items: replace_index(items, *i, child),
                renderer: renderer.clone(),
            },
            (FormNode::Object { fields, renderer }, segment) => {
                let mut fields = fields.clone();
                fields.insert(segment.to_string(), child);
                FormNode::Object {
                    fields,
                    renderer: renderer.clone(),
                }
            }
            (node, segment) => {
                warn!("cannot place a child at `{segment}` inside {} node", node.kind());
                node.clone()
            }
        }
    }
}

pub(crate) fn replace_index(items: &[FormNode], index: usize, child: FormNode) -> Vec<FormNode> {
    let mut next = items.to_vec();
    if index < next.len() {
        next[index] = child;
    } else {
        next.push(child);
    }
    next
}
