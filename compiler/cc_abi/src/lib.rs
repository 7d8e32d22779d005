//! Describes the one machine this back end ever targets:
//! `loongarch64-unknown-linux-gnu`.
//!
//! There is deliberately no backend-selection enum here (no `Llvm`,
//! `Cranelift`, `Gcc` branches). A single fixed target and a single
//! calling convention is the whole job of this crate.

pub mod calling_convention;
pub mod layout;
pub mod size_and_align;
pub mod target;
