//! Rendering of form trees.
//!
//! Rendering turns a [`FormNode`](crate::FormNode) into a host-neutral
//! [`Element`] tree. Interactive elements carry [`Callback`]s; invoking one
//! rebuilds the edited node and every ancestor up to the root, then calls the
//! root `on_change` exactly once with the new root.
//!
//! - [`callback`] - Shared callbacks and value setters
//! - [`element`] - The element tree produced by renderers
//! - [`registry`] - Renderer traits and the id → renderer registry
//! - [`render`] - Dispatch over node kinds
//! - [`components`] - Stock renderers

/// Shared callbacks and value setters.
pub mod callback;

/// Stock renderers.
pub mod components;

/// Element tree.
pub mod element;

/// Renderer traits and registry.
pub mod registry;

/// Render dispatch.
pub mod render;

pub use callback::{Callback, Setter};
pub use element::{Button, Element, FileInput, TextInput};
pub use registry::{ArrayRenderer, ItemRenderer, ObjectRenderer, RendererRegistry};
pub use render::FormRenderer;
