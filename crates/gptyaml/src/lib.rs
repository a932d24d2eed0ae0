//! # `gptyaml` – The umbrella crate
//!
//! Describe a chat prompt in a YAML (or JSON) file, validate it, and turn it
//! into a chat completions request payload.
//!
//! | Crate                | What it provides                                                         |
//! |----------------------|--------------------------------------------------------------------------|
//! | **`gptyaml-core`**   | Errors, supported model table, generic messages, declarative validation  |
//! | **`gptyaml-prompt`** | `PromptConfig`, prompt fragments, transcript assembly                     |
//! | **`gptyaml-openai`** | Chat completions request payload *(optional, `openai` feature)*          |
//!
//! This crate re-exports all of them and adds the file-loading convenience
//! in [`loader`].
//!
//! ## File format
//!
//! ```yaml
//! model: gpt-3.5-turbo      # required, case-insensitive
//! settings:                 # optional
//!   temperature: 0.7        # [0, 2], default 1
//!   top_p: 1                # [0, 1], default 1
//!   choices: 1              # >= 1, default 1
//! prompt:
//!   system: You are helpful.
//!   context: [hi, hello]    # alternating user / assistant turns
//!   message: bye            # required
//! ```
//!
//! ## Quick example
//!
//! ```rust
//! use gptyaml::{parse_prompt_config, SourceFormat};
//!
//! let config = parse_prompt_config(
//!     "model: GPT-4\nprompt:\n  system: You are helpful.\n  message: bye\n",
//!     SourceFormat::Yaml,
//! )?;
//!
//! let messages = config.build_messages();
//! assert_eq!(messages.len(), 2);
//! assert_eq!(messages[1].content, "bye");
//!
//! # #[cfg(feature = "openai")]
//! # {
//! let payload = gptyaml::openai::PayloadAssembler::new().assemble_value(&config)?;
//! assert_eq!(payload["model"], "gpt-4");
//! # }
//! # Ok::<(), gptyaml::GptYamlError>(())
//! ```
#![doc(html_root_url = "https://docs.rs/gptyaml/latest")]

pub mod loader;

pub use gptyaml_core::*;
pub use gptyaml_prompt as prompt;
pub use gptyaml_prompt::{PromptConfig, PromptSpec, Settings, Transcript};
pub use loader::{SourceFormat, load_prompt_config, parse_prompt_config, parse_source, read_source};

#[cfg(feature = "openai")]
pub use gptyaml_openai as openai;
