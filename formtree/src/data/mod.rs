//! Form tree data structures.
//!
//! ## Architecture
//!
//! - [`node`] - The `item` / `array` / `object` node model and value extraction
//! - [`path`] - Dotted node paths and copy-on-write structural updates
//! - [`template`] - Stringified templates and the tree builder
//! - [`user_data`] - Per-node metadata side channel
//! - [`schema`] - JSON Schema driven templates and typed casting
//! - [`form_state`] - Host-side form state (root ownership, reset, edits)

/// Host-side form state.
pub mod form_state;

/// Form tree nodes and value extraction.
pub mod node;

/// Node paths and structural updates.
pub mod path;

/// JSON Schema driven templates and casting.
pub mod schema;

/// Templates and the tree builder.
pub mod template;

/// Per-node user data.
pub mod user_data;

pub use form_state::FormState;
pub use node::{FormNode, NodeKind, RendererId};
pub use path::{NodePath, PathSegment};
pub use template::{BuildOptions, Template, build};
pub use user_data::UserData;
