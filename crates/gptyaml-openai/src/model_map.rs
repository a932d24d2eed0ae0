use std::borrow::Cow;

use gptyaml_core::model::Model;

pub(crate) fn map_model(model: &Model) -> Cow<'static, str> {
    match model {
        Model::OpenAi(openai_model) => openai_model.id().into(),
    }
}
