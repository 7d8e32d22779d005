use std::io::Write;

use cc_ast::node::{Node, NodeKind, VarRef};

use crate::ctx::{CodegenCtx, FnCtx};
use crate::error::CodegenError;
use crate::expr::gen_expr;
use crate::frame::local_frame_offset;

/// Computes the effective address of an lvalue node into the accumulator.
pub fn gen_addr<W: Write>(
    ctx: &mut CodegenCtx<W>,
    fnctx: &FnCtx,
    node: &Node,
) -> Result<(), CodegenError> {
    match &node.kind {
        NodeKind::Var(VarRef::Local(local)) => {
            let data = &fnctx.locals[*local];
            let addr = local_frame_offset(data.offset, data.ty.size);
            ctx.emitter.emit_line(format!("  addi.d $a0, $fp, {addr}"))
        }
        NodeKind::Var(VarRef::Global(name)) => {
            ctx.emitter.emit_line(format!("  la.local $a0, {name}"))
        }
        NodeKind::Deref(inner) => gen_expr(ctx, fnctx, inner),
        NodeKind::Comma { lhs, rhs } => {
            gen_expr(ctx, fnctx, lhs)?;
            gen_addr(ctx, fnctx, rhs)
        }
        NodeKind::Member { base, member } => {
            gen_addr(ctx, fnctx, base)?;
            if member.offset != 0 {
                ctx.emitter
                    .emit_line(format!("  addi.d $a0, $a0, {}", member.offset))?;
            }
            Ok(())
        }
        _ => Err(CodegenError::NotAnLvalue { line: node.line }),
    }
}
