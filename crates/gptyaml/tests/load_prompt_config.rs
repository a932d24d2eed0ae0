use std::{fs, path::PathBuf};

use gptyaml::{
    GptYamlError, PromptConfig, SourceFormat,
    generic::{GenericMessage, GenericRole},
    load_prompt_config, parse_prompt_config, read_source,
};
use serde_json::json;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/files")
        .join(name)
}

#[test]
fn loads_a_complete_yaml_file() {
    let config = load_prompt_config(fixture("chat_completion_base.yaml")).unwrap();

    assert_eq!(config.model().id(), "gpt-3.5-turbo");
    assert_eq!(config.settings().temperature(), 0.7);
    assert_eq!(config.settings().top_p(), 1.0);
    assert_eq!(config.settings().choices(), 1);

    let messages = config.build_messages();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].role, GenericRole::System);
    assert_eq!(messages[1], GenericMessage::user("What is the capital of France?"));
    assert_eq!(messages[2], GenericMessage::assistant("Paris."));
    assert_eq!(messages.last(), Some(&GenericMessage::user("And of Italy?")));
}

#[test]
fn json_and_yaml_files_agree() {
    let from_yaml = load_prompt_config(fixture("chat_completion_base.yaml")).unwrap();
    let from_json = load_prompt_config(fixture("chat_completion_base.json")).unwrap();
    assert_eq!(from_yaml, from_json);
}

#[test]
fn minimal_file_gets_defaults() {
    let config = load_prompt_config(fixture("chat_completion_minimal.yaml")).unwrap();

    assert_eq!(config.model().id(), "gpt-4");
    assert_eq!(config.settings().temperature(), 1.0);
    assert_eq!(config.settings().top_p(), 1.0);
    assert_eq!(config.settings().choices(), 1);
    assert_eq!(config.build_messages(), vec![GenericMessage::user("bye")]);
}

#[test]
fn invalid_file_reports_every_violation() {
    let err = load_prompt_config(fixture("chat_completion_invalid.yaml")).unwrap_err();

    let violations = err.violations().expect("schema violation");
    assert_eq!(violations.len(), 3);
    assert!(violations.get("model").is_some());
    assert!(violations.get("settings.temperature").is_some());
    assert!(violations.get("prompt.message").unwrap().is_missing());
}

#[test]
fn missing_file_is_source_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does_not_exist.yaml");

    let err = load_prompt_config(&path).unwrap_err();
    match err {
        GptYamlError::SourceUnavailable { origin, .. } => {
            assert_eq!(origin, path.display().to_string());
        }
        other => panic!("expected SourceUnavailable, got {other:?}"),
    }
}

#[test]
fn malformed_file_is_source_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "model: gpt-4\nprompt: [message: bye\n").unwrap();

    let err = load_prompt_config(&path).unwrap_err();
    assert!(matches!(err, GptYamlError::SourceUnavailable { .. }));
    assert!(err.violations().is_none());
}

#[test]
fn extension_selects_the_parser() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prompt.json");
    fs::write(&path, r#"{"model": "gpt-4-32k", "prompt": {"message": "bye"}}"#).unwrap();

    let raw = read_source(&path).unwrap();
    assert_eq!(raw["model"], json!("gpt-4-32k"));

    let config = PromptConfig::validate(&raw).unwrap();
    assert_eq!(config.model().id(), "gpt-4-32k");
}

#[test]
fn empty_settings_block_in_yaml_uses_defaults() {
    let config = parse_prompt_config(
        "model: gpt-4\nsettings:\nprompt:\n  message: bye\n",
        SourceFormat::Yaml,
    )
    .unwrap();
    assert_eq!(config.settings().temperature(), 1.0);
    assert_eq!(config.settings().choices(), 1);
}

#[test]
fn non_finite_yaml_numbers_never_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("infinite.yaml");
    fs::write(
        &path,
        "model: gpt-4\nsettings:\n  temperature: .inf\n  top_p: .nan\n  choices: -.inf\n\
         prompt:\n  message: bye\n",
    )
    .unwrap();

    let err = load_prompt_config(&path).unwrap_err();
    let violations = err.violations().expect("schema violation");
    assert_eq!(violations.len(), 3);
    assert_eq!(
        violations.get("settings.temperature").unwrap().found,
        Some(json!(".inf"))
    );
    assert_eq!(violations.get("settings.top_p").unwrap().found, Some(json!(".nan")));
    assert_eq!(
        violations.get("settings.choices").unwrap().found,
        Some(json!("-.inf"))
    );

    assert!(read_source(&path).unwrap_err().violations().is_some());
}

#[test]
fn null_settings_values_are_rejected() {
    let err = parse_prompt_config(
        "model: gpt-4\nsettings:\n  temperature: ~\nprompt:\n  message: bye\n",
        SourceFormat::Yaml,
    )
    .unwrap_err();
    let violation = err.violations().unwrap().get("settings.temperature").unwrap();
    assert_eq!(violation.found, Some(serde_json::Value::Null));
}

#[test]
fn context_turns_must_be_text() {
    let err = parse_prompt_config(
        "model: gpt-4\nprompt:\n  context:\n    - hi\n    - [nested]\n  message: bye\n",
        SourceFormat::Yaml,
    )
    .unwrap_err();
    assert!(err.violations().unwrap().get("prompt.context[1]").is_some());
}

#[cfg(feature = "openai")]
#[test]
fn file_to_payload() {
    use gptyaml::openai::{MessageShape, PayloadAssembler};

    let config = load_prompt_config(fixture("chat_completion_base.yaml")).unwrap();

    let payload = PayloadAssembler::new().assemble_value(&config).unwrap();
    assert_eq!(payload["model"], json!("gpt-3.5-turbo"));
    assert_eq!(payload["temperature"], json!(0.7));
    assert_eq!(payload["top_p"], json!(1.0));
    assert_eq!(payload["choices"], json!(1));
    assert_eq!(
        payload["messages"][3],
        json!({ "role": "user", "content": "And of Italy?" })
    );

    let legacy = PayloadAssembler::new()
        .with_context_shape(MessageShape::RoleKeyed)
        .assemble_value(&config)
        .unwrap();
    assert_eq!(
        legacy["messages"][1],
        json!({ "user": "What is the capital of France?" })
    );
}

#[test]
fn json_schema_is_exported() {
    let schema = serde_json::to_value(PromptConfig::json_schema()).unwrap();
    assert_eq!(schema["title"], json!("Chat completion prompt"));
    assert_eq!(
        schema["properties"]["settings"]["properties"]["choices"]["minimum"],
        json!(1.0)
    );
}
