//! The typed C abstract syntax tree this back end consumes.
//!
//! Everything here is produced by a front end (lexer, preprocessor,
//! parser, semantic analyzer) that lives outside this crate; the back end
//! only reads it, adding frame offsets and a stack size as it goes.

pub mod function;
pub mod layout_ctx;
pub mod local;
pub mod node;
pub mod ty;
