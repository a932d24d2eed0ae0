//! Helpers for assembling a JSON Schema document out of the field
//! declarations in [`crate::schema`]. The result is a plain [`schemars`]
//! [`RootSchema`] that editors can use to validate configuration files while
//! they are being written.

use schemars::{
    r#gen::SchemaSettings,
    schema::{InstanceType, RootSchema, Schema, SchemaObject},
};

/// One property of an object schema.
pub struct Property {
    pub name: &'static str,
    pub required: bool,
    pub schema: Schema,
}

/// Build a closed object schema (`additionalProperties: false`) from its
/// properties.
pub fn object_schema(
    description: &str,
    properties: impl IntoIterator<Item = Property>,
) -> SchemaObject {
    let mut schema = SchemaObject {
        instance_type: Some(InstanceType::Object.into()),
        ..Default::default()
    };
    if !description.is_empty() {
        schema.metadata().description = Some(description.to_owned());
    }

    let object = schema.object();
    for property in properties {
        if property.required {
            object.required.insert(property.name.to_owned());
        }
        object
            .properties
            .insert(property.name.to_owned(), property.schema);
    }
    object.additional_properties = Some(Box::new(Schema::Bool(false)));

    schema
}

/// Wrap `schema` into a draft-07 root document titled `title`.
pub fn root_schema(title: &str, mut schema: SchemaObject) -> RootSchema {
    schema.metadata().title = Some(title.to_owned());

    RootSchema {
        meta_schema: SchemaSettings::draft07().meta_schema,
        schema,
        definitions: Default::default(),
    }
}
