//! # formtree
//!
//! Recursive form state for building nested editable forms.
//!
//! A form is a tree of [`FormNode`]s: string leaves (`item`), ordered lists
//! (`array`) and named fields (`object`). Every node may reference a renderer
//! by id; the behaviour behind that id lives in a [`RendererRegistry`], so the
//! tree itself stays plain, cloneable and serialisable.
//!
//! ## Features
//!
//! - Build a tree from a stringified [`Template`], a JSON value or a JSON Schema
//! - Extract the plain value back out, or deserialize it into a typed record
//! - Path-addressed, copy-on-write structural updates
//! - Render dispatch into a host-neutral [`Element`] tree with edit callbacks
//! - A typed [`UserData`] side channel (labels, input hints, per-item overrides)
//!
//! ## Quick Start
//!
//! ```rust
//! use formtree::{BuildOptions, FormState, Template};
//!
//! let template = Template::object([
//!     ("label", Template::leaf("")),
//!     ("tags", Template::array([Template::leaf("")])),
//! ]);
//! let mut state = FormState::new(template, BuildOptions::default());
//! state.set_at("label", "Math").unwrap();
//!
//! assert_eq!(state.value()["label"], "Math");
//! ```
//!
//! ## Modules
//!
//! - [`data`] - Form tree nodes, templates, user data and form state
//! - [`ui`] - Element tree, renderer registry and render dispatch
//! - [`run`] - Typed form sessions driven by JSON Schema

#[macro_use]
extern crate log;

/// Form tree data structures.
///
/// This module provides the node model, the template builder, path-based
/// updates, user data and the host-side form state.
pub mod data;

/// Error types for form tree operations.
pub mod error;

/// Typed form sessions.
pub mod run;

/// Rendering: element tree, renderer registry and dispatch.
pub mod ui;

pub use data::{
    BuildOptions, FormNode, FormState, NodeKind, NodePath, RendererId, Template, UserData,
};
pub use error::{FormTreeError, Result};
pub use run::*;
pub use serde_json::Value;
pub use ui::{Callback, Element, FormRenderer, RendererRegistry, Setter};
