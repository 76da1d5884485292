//! Option Registry Library
//!
//! A tree of named, validated options addressed by dotted path or by a
//! unique bare name. This module exports the core components for the CLI,
//! testing, and integration.

pub mod accessor;
pub mod app;
pub mod cli;
pub mod error;
pub mod format;
pub mod registry;
pub mod schema;
pub mod tree;
pub mod validators;
pub mod value;

pub use accessor::{GroupView, GroupViewMut, LeafView, NodeView};
pub use error::{ErrorCode, NodeKind, OptionError, OptionResult};
pub use registry::Registry;
pub use tree::{Group, Node, OptionDef, OptionSpec, Schema};
pub use validators::{
    FloatValidator, IntValidator, StrValidator, Validator, check_bool, check_float, check_int,
    check_str, check_url,
};
pub use value::{RawValue, Value};
