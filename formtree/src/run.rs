use std::{cell::RefCell, marker::PhantomData, rc::Rc, str::FromStr};

use anyhow::Context;
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    data::{
        BuildOptions, FormState, Template,
        schema::{cast_value, schema_of},
    },
    ui::{Element, RendererRegistry},
};

/// One scripted edit applied by [`run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Set the `item` at `path`.
    Set { path: String, value: String },
    /// Append a blank element to the array at `path`.
    Append { path: String },
}

impl Edit {
    pub fn set(path: impl Into<String>, value: impl Into<String>) -> Self {
        Edit::Set {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn append(path: impl Into<String>) -> Self {
        Edit::Append { path: path.into() }
    }
}

/// Parses `PATH=VALUE` into [`Edit::Set`].
impl FromStr for Edit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((path, value)) = s.split_once('=') else {
            anyhow::bail!("expected PATH=VALUE, got `{s}`");
        };
        let path = path.trim();
        if path.is_empty() {
            anyhow::bail!("empty path in `{s}`");
        }
        Ok(Edit::set(path, value))
    }
}

/// A form editing a record of type `C`.
///
/// The record's JSON Schema drives both the blank form and the casting of
/// the stringified form value back into `C`.
pub struct FormSession<C> {
    state: Rc<RefCell<FormState>>,
    schema: Value,
    _record: PhantomData<fn() -> C>,
}

impl<C: JsonSchema + DeserializeOwned + Serialize> FormSession<C> {
    /// A blank form shaped by `C`'s schema.
    ///
    /// # Errors
    ///
    /// Returns an error when the schema of `C` cannot be turned into a form.
    pub fn new(options: BuildOptions) -> anyhow::Result<Self> {
        let schema = schema_of::<C>()?;
        let template = Template::from_schema(&schema)
            .with_context(|| format!("cannot build a form for {}", C::schema_name()))?;
        Ok(Self::from_parts(template, schema, options))
    }

    /// A form with a hand-written template; values are still cast using
    /// `C`'s schema.
    pub fn with_template(
        template: impl Into<Template>,
        options: BuildOptions,
    ) -> anyhow::Result<Self> {
        let schema = schema_of::<C>()?;
        Ok(Self::from_parts(template.into(), schema, options))
    }

    fn from_parts(template: Template, schema: Value, options: BuildOptions) -> Self {
        Self {
            state: Rc::new(RefCell::new(FormState::new(template, options))),
            schema,
            _record: PhantomData,
        }
    }

    /// Shared handle to the underlying state.
    pub fn state(&self) -> Rc<RefCell<FormState>> {
        Rc::clone(&self.state)
    }

    pub fn needs_save(&self) -> bool {
        self.state.borrow().needs_save
    }

    /// Fill the form from an existing record without marking it edited.
    pub fn load(&self, record: &C) -> anyhow::Result<()> {
        let value = serde_json::to_value(record)?;
        let mut state = self.state.borrow_mut();
        state.load_record(&value)?;
        state.needs_save = false;
        Ok(())
    }

    pub fn set_at(&self, path: &str, value: impl Into<String>) -> anyhow::Result<()> {
        self.state
            .borrow_mut()
            .set_at(path, value)
            .with_context(|| format!("cannot set `{path}`"))
    }

    pub fn append_at(&self, path: &str) -> anyhow::Result<String> {
        self.state
            .borrow_mut()
            .append_at(path)
            .with_context(|| format!("cannot append to `{path}`"))
    }

    pub fn apply(&self, edit: &Edit) -> anyhow::Result<()> {
        match edit {
            Edit::Set { path, value } => self.set_at(path, value.as_str()),
            Edit::Append { path } => self.append_at(path).map(|added| {
                debug!("appended `{added}`");
            }),
        }
    }

    pub fn render(&self, registry: &RendererRegistry) -> anyhow::Result<Element> {
        Ok(FormState::render(&self.state, registry)?)
    }

    /// The stringified form value cast back into `C`.
    ///
    /// # Errors
    ///
    /// Returns an error when a leaf cannot be cast to the type its schema
    /// requires, or when the cast value does not deserialize into `C`.
    pub fn record(&self) -> anyhow::Result<C> {
        let raw = self.state.borrow().value();
        let typed = cast_value(&raw, &self.schema)?;
        serde_json::from_value(typed)
            .with_context(|| format!("form value does not fit {}", C::schema_name()))
    }
}

/// Edit a record of type `C` through a form.
///
/// The form is built from `C`'s schema, filled from `existing` when given,
/// then `edits` are applied in order. Returns `None` when the edits left the
/// form unchanged.
///
/// # Errors
///
/// Returns errors when the form cannot be built, an edit does not apply or
/// the result does not cast back into `C`.
pub fn run<C: JsonSchema + DeserializeOwned + Serialize>(
    existing: Option<&C>,
    options: BuildOptions,
    edits: &[Edit],
) -> anyhow::Result<Option<C>> {
    let session = FormSession::<C>::new(options)?;
    if let Some(record) = existing {
        session.load(record)?;
    }
    for edit in edits {
        session.apply(edit)?;
    }
    if !session.needs_save() {
        info!("no changes");
        return Ok(None);
    }
    session.record().map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
    struct Level {
        id: u32,
        label: String,
        color: String,
    }

    #[test]
    fn test_edit_parse() {
        assert_eq!(
            "color=#ff0000".parse::<Edit>().unwrap(),
            Edit::set("color", "#ff0000")
        );
        assert_eq!("note=a=b".parse::<Edit>().unwrap(), Edit::set("note", "a=b"));
        assert!("color".parse::<Edit>().is_err());
        assert!("=x".parse::<Edit>().is_err());
    }

    #[test]
    fn test_run_casts_back_into_record() {
        let existing = Level {
            id: 2,
            label: "Medium".into(),
            color: "#ffaa00".into(),
        };
        let edited = run(
            Some(&existing),
            BuildOptions::default(),
            &[Edit::set("label", "Средний"), Edit::set("id", "3")],
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            edited,
            Level {
                id: 3,
                label: "Средний".into(),
                color: "#ffaa00".into(),
            }
        );
    }

    #[test]
    fn test_run_without_changes() {
        let existing = Level {
            id: 1,
            label: "Easy".into(),
            color: "#00ff00".into(),
        };
        let out = run(Some(&existing), BuildOptions::default(), &[]).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_record_reports_bad_cast() {
        let session = FormSession::<Level>::new(BuildOptions::default()).unwrap();
        session.set_at("id", "three").unwrap();
        assert!(session.record().is_err());
    }
}
