//! fmtstyle: recover the clang-format option surface from LLVM's
//! `Format.h`.
//!
//! The core is a line-oriented scanner ([`parser`]) that walks the body of
//! `struct FormatStyle` and produces a [`StyleModel`]: every option with its
//! type and documentation, every nested enum with its values, and the field
//! lists of nested structs. Around it sit the collaborators: header
//! [`source`]s, [`render`]ers, the `.clang-format` writer in [`config`] and
//! the formatter [`preview`].

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod preview;
pub mod render;
pub mod source;

pub use error::{Error, Result};
pub use model::StyleModel;
pub use parser::{parse, ParseOptions};
