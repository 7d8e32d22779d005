//! Small, compiler-independent collection utilities shared by the rest of
//! the workspace.
//!
//! None of this is specific to C, LoongArch, or code generation; it exists
//! so that `cc_ast` and `cc_codegen` can index per-function locals and
//! synthesized basic blocks with a typed index instead of a bare `usize`.

pub mod idx;
pub mod index_slice;
pub mod index_vec;
pub mod variadic_log_macros;
