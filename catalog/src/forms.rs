//! Admin forms for catalog records.
//!
//! Each form is a stringified template of the record plus the user data
//! labelling its inputs. Icons use the file picker, subject descriptions
//! the list editor; everything else is a text field.

use clap::ValueEnum;
use formtree::{
    BuildOptions, FormSession, Template, UserData,
    ui::components::{
        ADD_LABEL_HINT, FIELD_LIST, FILE_INPUT, LIST_EDITOR, TEXT_FIELD,
    },
};

use crate::records::{Course, Difficulty, Subject};

/// Which record an admin form edits.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormKind {
    Subject,
    Difficulty,
    Course,
}

fn taxonomy_fields() -> Vec<(&'static str, Template)> {
    vec![
        ("type", Template::leaf("")),
        ("label", Template::leaf("")),
        ("icon", Template::leaf("").with_renderer(FILE_INPUT)),
        ("color", Template::leaf("")),
    ]
}

fn taxonomy_user_data() -> UserData {
    UserData::new()
        .with_field("type", UserData::labeled("Type"))
        .with_field("label", UserData::labeled("Label"))
        .with_field("icon", UserData::labeled("Icon"))
        .with_field("color", UserData::labeled("Color").with_type("color"))
}

pub fn subject_template() -> Template {
    let mut fields = taxonomy_fields();
    fields.push((
        "additional_description",
        Template::array([Template::leaf("")]),
    ));
    Template::object(fields)
}

pub fn subject_options() -> BuildOptions {
    let user_data = taxonomy_user_data().with_field(
        "additional_description",
        UserData::labeled("Additional Description").with_hint(ADD_LABEL_HINT, "Add Description"),
    );
    BuildOptions::default()
        .with_item_renderer(TEXT_FIELD)
        .with_array_renderer(LIST_EDITOR)
        .with_object_renderer(FIELD_LIST)
        .with_user_data(user_data)
}

pub fn difficulty_template() -> Template {
    Template::object(taxonomy_fields())
}

pub fn difficulty_options() -> BuildOptions {
    BuildOptions::default()
        .with_item_renderer(TEXT_FIELD)
        .with_object_renderer(FIELD_LIST)
        .with_user_data(taxonomy_user_data())
}

pub fn course_template() -> Template {
    Template::object([
        ("title", Template::leaf("")),
        ("description", Template::leaf("")),
        ("organization", Template::leaf("")),
        ("url", Template::leaf("")),
        ("image_url", Template::leaf("").with_renderer(FILE_INPUT)),
        ("start_date", Template::leaf("")),
        ("end_date", Template::leaf("")),
        ("difficulty", Template::leaf("")),
        // filled through the list editor; a blank grade would not cast
        ("subjects", Template::array([]).with_renderer(LIST_EDITOR)),
        ("grades", Template::array([]).with_renderer(LIST_EDITOR)),
    ])
}

pub fn course_options() -> BuildOptions {
    let user_data = UserData::new()
        .with_field("title", UserData::labeled("Title"))
        .with_field("description", UserData::labeled("Description"))
        .with_field("organization", UserData::labeled("Organization"))
        .with_field("url", UserData::labeled("URL").with_type("url"))
        .with_field("image_url", UserData::labeled("Image"))
        .with_field("start_date", UserData::labeled("Start").with_type("date"))
        .with_field("end_date", UserData::labeled("End").with_type("date"))
        .with_field("difficulty", UserData::labeled("Difficulty"))
        .with_field(
            "subjects",
            UserData::labeled("Subject").with_hint(ADD_LABEL_HINT, "Add Subject"),
        )
        .with_field(
            "grades",
            UserData::labeled("Grade")
                .with_type("number")
                .with_hint(ADD_LABEL_HINT, "Add Grade"),
        );
    BuildOptions::default()
        .with_item_renderer(TEXT_FIELD)
        .with_user_data(user_data)
}

pub fn subject_form() -> anyhow::Result<FormSession<Subject>> {
    FormSession::with_template(subject_template(), subject_options())
}

pub fn difficulty_form() -> anyhow::Result<FormSession<Difficulty>> {
    FormSession::with_template(difficulty_template(), difficulty_options())
}

pub fn course_form() -> anyhow::Result<FormSession<Course>> {
    FormSession::with_template(course_template(), course_options())
}
