use std::io::Write;

use cc_ast::local::{Local, LocalData};
use cc_utils::index_vec::IdxVec;

use crate::emit::Emitter;
use crate::error::CodegenError;
use crate::labels::LabelAllocator;

/// Everything expression and statement lowering share for the whole
/// translation unit: the output sink, the label counter, and the
/// accumulator/spill-stack push depth. Scoped to one [`crate::codegen`]
/// call rather than process-local statics.
pub struct CodegenCtx<'a, W: Write> {
    pub emitter: Emitter<'a, W>,
    pub labels: LabelAllocator,
    pub push_depth: i64,
}

impl<'a, W: Write> CodegenCtx<'a, W> {
    pub fn new(sink: &'a mut W) -> Self {
        CodegenCtx {
            emitter: Emitter::new(sink),
            labels: LabelAllocator::new(),
            push_depth: 0,
        }
    }

    /// Pushes the accumulator onto the spill stack.
    pub fn push(&mut self) -> Result<(), CodegenError> {
        self.emitter.emit_line("  addi.d $sp, $sp, -8")?;
        self.emitter.emit_line("  st.d $a0, $sp, 0")?;
        self.push_depth += 1;
        Ok(())
    }

    /// Pops the spill stack's top into `reg`.
    pub fn pop(&mut self, reg: &str) -> Result<(), CodegenError> {
        self.emitter.emit_line(format!("  ld.d ${reg}, $sp, 0"))?;
        self.emitter.emit_line("  addi.d $sp, $sp, 8")?;
        self.push_depth -= 1;
        Ok(())
    }

    /// Emits the DWARF line directive that precedes every expression and
    /// statement node.
    pub fn loc(&mut self, line: u32) -> Result<(), CodegenError> {
        self.emitter.emit_line(format!("  .loc 1 {line}"))
    }
}

/// Per-function state threaded through expression and statement lowering:
/// the locals a `Local` index resolves against, and the epilogue label
/// `RETURN` jumps to.
pub struct FnCtx<'a> {
    pub name: &'a str,
    pub locals: &'a IdxVec<Local, LocalData>,
    pub return_label: String,
}
