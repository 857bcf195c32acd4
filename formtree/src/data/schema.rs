//! JSON Schema support.
//!
//! Forms are stringified: every leaf holds a string. The schema of the
//! target record tells us two things the form cannot: which blank shape to
//! start from ([`Template::from_schema`]) and how to turn the edited strings
//! back into typed JSON ([`cast_value`]).
//!
//! Handled constructs: `type` (single or list with `null`), `properties`,
//! `additionalProperties`, `items`, `enum`, `const`, `$ref` into the same
//! document, `anyOf`/`oneOf`, and single-element `allOf`.

use schemars::JsonSchema;
use serde_json::{Map, Number, Value};

use crate::{
    data::{node::display_path, path::child_path, template::Template},
    error::{FormTreeError, Result},
};

const MAX_DEPTH: usize = 32;

/// The JSON Schema of `T`, as a JSON value.
pub fn schema_of<T: JsonSchema>() -> Result<Value> {
    let schema = schemars::schema_for!(T);
    Ok(serde_json::to_value(&schema)?)
}

impl Template {
    /// Derive a blank template from a JSON Schema.
    ///
    /// Scalars become empty leaves, arrays get one blank element and objects
    /// one field per property.
    pub fn from_schema(schema: &Value) -> Result<Template> {
        Resolver { root: schema }.template_at(schema, "", 0)
    }
}

/// Convert a stringified value into typed JSON following `schema`.
///
/// Leaves declared `integer`, `number` or `boolean` are parsed; a blank leaf
/// becomes `null` where the schema allows it.
pub fn cast_value(value: &Value, schema: &Value) -> Result<Value> {
    Resolver { root: schema }.cast_at(value, schema, "", 0)
}

struct Resolver<'a> {
    root: &'a Value,
}

fn types(schema: &Value) -> Vec<&str> {
    match schema.get("type") {
        Some(Value::String(t)) => vec![t.as_str()],
        Some(Value::Array(ts)) => ts.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn variants(schema: &Value) -> Option<&Vec<Value>> {
    schema
        .get("anyOf")
        .or_else(|| schema.get("oneOf"))
        .and_then(Value::as_array)
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::Null) || value.as_str().is_some_and(|s| s.trim().is_empty())
}

impl<'a> Resolver<'a> {
    fn resolve(&self, mut schema: &'a Value, path: &str) -> Result<&'a Value> {
        for _ in 0..MAX_DEPTH {
            let Some(reference) = schema.get("$ref").and_then(Value::as_str) else {
                return Ok(schema);
            };
            let pointer = reference.strip_prefix('#').ok_or_else(|| {
                FormTreeError::schema(
                    &display_path(path),
                    format!("external reference `{reference}`"),
                )
            })?;
            schema = self.root.pointer(pointer).ok_or_else(|| {
                FormTreeError::schema(
                    &display_path(path),
                    format!("unresolved reference `{reference}`"),
                )
            })?;
        }
        Err(FormTreeError::schema(
            &display_path(path),
            "reference chain too long",
        ))
    }

    fn is_null(&self, schema: &'a Value, path: &str) -> Result<bool> {
        let schema = self.resolve(schema, path)?;
        Ok(types(schema) == ["null"] || schema.get("const") == Some(&Value::Null))
    }

    fn non_null_variants(&self, list: &'a [Value], path: &str) -> Result<Vec<&'a Value>> {
        let mut out = Vec::new();
        for v in list {
            if !self.is_null(v, path)? {
                out.push(v);
            }
        }
        Ok(out)
    }

    fn template_at(&self, schema: &'a Value, path: &str, depth: usize) -> Result<Template> {
        if depth > MAX_DEPTH {
            return Err(FormTreeError::schema(
                &display_path(path),
                "schema nests too deeply",
            ));
        }
        let schema = self.resolve(schema, path)?;
        match schema {
            Value::Bool(true) => return Ok(Template::leaf("")),
            Value::Object(_) => {}
            other => {
                return Err(FormTreeError::schema(
                    &display_path(path),
                    format!("`{other}` accepts no form value"),
                ));
            }
        }

        if let Some(list) = variants(schema) {
            return match self.non_null_variants(list, path)?.first() {
                Some(first) => self.template_at(first, path, depth + 1),
                None => Ok(Template::leaf("")),
            };
        }
        if let Some(all) = schema.get("allOf").and_then(Value::as_array) {
            return match all.as_slice() {
                [single] => self.template_at(single, path, depth + 1),
                _ => Err(FormTreeError::schema(
                    &display_path(path),
                    "`allOf` with several schemas",
                )),
            };
        }
        if let Some(constant) = schema.get("const") {
            return Ok(Template::from(constant));
        }

        let primary = types(schema).into_iter().find(|t| *t != "null");
        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            let mut fields = Vec::with_capacity(properties.len());
            for (key, field) in properties {
                fields.push((
                    key.clone(),
                    self.template_at(field, &child_path(path, key), depth + 1)?,
                ));
            }
            return Ok(Template::object(fields));
        }

        match primary {
            Some("object") => Ok(Template::object(Vec::<(String, Template)>::new())),
            Some("array") => match schema.get("items") {
                Some(items) => Ok(Template::array([self.template_at(
                    items,
                    &child_path(path, 0),
                    depth + 1,
                )?])),
                None => Ok(Template::array([])),
            },
            Some("string" | "integer" | "number" | "boolean") | None => Ok(Template::leaf("")),
            Some(other) => Err(FormTreeError::schema(
                &display_path(path),
                format!("unsupported type `{other}`"),
            )),
        }
    }

    fn cast_at(&self, value: &Value, schema: &'a Value, path: &str, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(FormTreeError::schema(
                &display_path(path),
                "schema nests too deeply",
            ));
        }
        let schema = self.resolve(schema, path)?;
        if !schema.is_object() {
            return Ok(value.clone());
        }

        if let Some(list) = variants(schema) {
            if is_blank(value) {
                for v in list {
                    if self.is_null(v, path)? {
                        return Ok(Value::Null);
                    }
                }
            }
            let mut last_err = None;
            for v in self.non_null_variants(list, path)? {
                match self.cast_at(value, v, path, depth + 1) {
                    Ok(cast) => return Ok(cast),
                    Err(e) => last_err = Some(e),
                }
            }
            return match last_err {
                Some(e) => Err(e),
                None => Ok(value.clone()),
            };
        }
        if let Some(all) = schema.get("allOf").and_then(Value::as_array)
            && let [single] = all.as_slice()
        {
            return self.cast_at(value, single, path, depth + 1);
        }

        let types = types(schema);
        if types.contains(&"null") && is_blank(value) {
            return Ok(Value::Null);
        }
        let shown = display_path(path);
        let primary = types.iter().copied().find(|t| *t != "null");
        let has_properties = schema.get("properties").is_some();

        match primary {
            Some("string") => match value {
                Value::String(_) => Ok(value.clone()),
                other => Err(FormTreeError::mismatch(&shown, "string", other)),
            },
            Some("integer") => cast_integer(value, &shown),
            Some("number") => cast_number(value, &shown),
            Some("boolean") => cast_boolean(value, &shown),
            Some("null") => Ok(Value::Null),
            Some("array") => match value {
                Value::Array(items) => {
                    let item_schema = schema.get("items");
                    let mut out = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        out.push(match item_schema {
                            Some(s) => self.cast_at(item, s, &child_path(path, i), depth + 1)?,
                            None => item.clone(),
                        });
                    }
                    Ok(Value::Array(out))
                }
                other => Err(FormTreeError::mismatch(&shown, "array", other)),
            },
            Some("object") => self.cast_object(value, schema, path, depth),
            None if has_properties => self.cast_object(value, schema, path, depth),
            _ => Ok(value.clone()),
        }
    }

    fn cast_object(
        &self,
        value: &Value,
        schema: &'a Value,
        path: &str,
        depth: usize,
    ) -> Result<Value> {
        let Value::Object(fields) = value else {
            return Err(FormTreeError::mismatch(&display_path(path), "object", value));
        };
        let properties = schema.get("properties").and_then(Value::as_object);
        let additional = schema.get("additionalProperties").filter(|s| s.is_object());

        let mut out = Map::with_capacity(fields.len());
        for (key, field) in fields {
            let field_schema = properties.and_then(|p| p.get(key)).or(additional);
            let cast = match field_schema {
                Some(s) => self.cast_at(field, s, &child_path(path, key), depth + 1)?,
                None => field.clone(),
            };
            out.insert(key.clone(), cast);
        }
        Ok(Value::Object(out))
    }
}

fn cast_integer(value: &Value, path: &str) -> Result<Value> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                Ok(Value::Number(Number::from(i)))
            } else if let Ok(u) = s.parse::<u64>() {
                Ok(Value::Number(Number::from(u)))
            } else {
                Err(FormTreeError::mismatch(path, "integer", value))
            }
        }
        other => Err(FormTreeError::mismatch(path, "integer", other)),
    }
}

fn cast_number(value: &Value, path: &str) -> Result<Value> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| FormTreeError::mismatch(path, "number", value)),
        other => Err(FormTreeError::mismatch(path, "number", other)),
    }
}

fn cast_boolean(value: &Value, path: &str) -> Result<Value> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::String(s) => match s.trim() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(FormTreeError::mismatch(path, "boolean", value)),
        },
        other => Err(FormTreeError::mismatch(path, "boolean", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BuildOptions;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::json;

    #[allow(dead_code)]
    #[derive(Debug, Deserialize, JsonSchema, PartialEq)]
    struct Lesson {
        title: String,
        grades: Vec<u32>,
        difficulty: Option<String>,
        parts: Vec<Part>,
        published: bool,
    }

    #[allow(dead_code)]
    #[derive(Debug, Deserialize, JsonSchema, PartialEq)]
    struct Part {
        name: String,
        weight: f64,
    }

    #[test]
    fn test_template_from_schema() {
        let schema = schema_of::<Lesson>().unwrap();
        let template = Template::from_schema(&schema).unwrap();
        let node = template.build(&BuildOptions::default());
        assert_eq!(
            node.extract(),
            json!({
                "title": "",
                "grades": [""],
                "difficulty": "",
                "parts": [{"name": "", "weight": ""}],
                "published": ""
            })
        );
    }

    #[test]
    fn test_cast_to_typed_record() {
        let schema = schema_of::<Lesson>().unwrap();
        let raw = json!({
            "title": "Intro",
            "grades": ["7", " 8 "],
            "difficulty": "",
            "parts": [{"name": "a", "weight": "1.5"}],
            "published": "true"
        });
        let cast = cast_value(&raw, &schema).unwrap();
        let lesson: Lesson = serde_json::from_value(cast).unwrap();
        assert_eq!(
            lesson,
            Lesson {
                title: "Intro".into(),
                grades: vec![7, 8],
                difficulty: None,
                parts: vec![Part {
                    name: "a".into(),
                    weight: 1.5
                }],
                published: true,
            }
        );
    }

    #[test]
    fn test_cast_reports_leaf_path() {
        let schema = schema_of::<Lesson>().unwrap();
        let raw = json!({
            "title": "Intro",
            "grades": ["7", "seven"],
            "difficulty": "",
            "parts": [],
            "published": "false"
        });
        match cast_value(&raw, &schema).unwrap_err() {
            FormTreeError::TypeMismatch { path, expected, .. } => {
                assert_eq!(path, "grades.1");
                assert_eq!(expected, "integer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unresolved_reference() {
        let schema = json!({"$ref": "#/$defs/Missing"});
        assert!(matches!(
            Template::from_schema(&schema),
            Err(FormTreeError::Schema { .. })
        ));
    }
}
