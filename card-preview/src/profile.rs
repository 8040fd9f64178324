//! Sample profile sides and edit dialog over JSON data.

use std::cell::RefCell;
use std::rc::Rc;

use card_core::{
    DialogProps, EditDialog, FieldKind, FieldRule, SideProps, Sides, ValidationSchema, View,
};
use serde_json::{json, Value};

/// The profile shown when no data file is given.
#[must_use]
pub fn sample_profile() -> Value {
    json!({
        "id": 1,
        "name": "Ada Lovelace",
        "title": "Analyst",
        "skills": ["mathematics", "notation", "engines"],
        "location": "London"
    })
}

fn field<'a>(data: &'a Value, name: &str) -> &'a str {
    data.get(name).and_then(Value::as_str).unwrap_or_default()
}

/// Front shows name and title, back lists skills and location.
#[must_use]
pub fn profile_sides() -> Sides<Value> {
    Sides::new()
        .with("front", |props: &SideProps<'_, Value>| {
            View::group(vec![
                View::text(field(props.data, "name")),
                View::text(field(props.data, "title")),
            ])
        })
        .with("back", |props: &SideProps<'_, Value>| {
            let skills = props
                .data
                .get("skills")
                .and_then(Value::as_array)
                .map(|skills| {
                    skills
                        .iter()
                        .filter_map(Value::as_str)
                        .map(View::text)
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            View::group(vec![
                View::group(skills),
                View::text(field(props.data, "location")),
            ])
        })
}

/// Edit dialog for the profile's name and title.
///
/// Accepted submissions are parked in `submitted` for the host to merge
/// into the card data.
#[must_use]
pub fn profile_dialog(submitted: Rc<RefCell<Option<Value>>>) -> EditDialog<Value> {
    let schema = ValidationSchema::new()
        .field(
            FieldRule::new("name")
                .required()
                .kind(FieldKind::String)
                .min_length(1)
                .max_length(80),
        )
        .field(FieldRule::new("title").kind(FieldKind::String).max_length(80));

    EditDialog::new(
        |props: &DialogProps<'_, Value>| {
            View::group(vec![
                View::text(format!("Edit {}", field(props.data, "name"))),
                View::Button {
                    id: "dialog-save".to_string(),
                    icon: None,
                    label: Some("Save".to_string()),
                },
                View::Button {
                    id: "dialog-cancel".to_string(),
                    icon: None,
                    label: Some("Cancel".to_string()),
                },
            ])
        },
        move |args: &[Value]| {
            if let Some(first) = args.first() {
                *submitted.borrow_mut() = Some(first.clone());
            }
        },
    )
    .with_validation_schema(schema)
}
