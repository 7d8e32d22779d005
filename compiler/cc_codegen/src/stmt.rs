use std::io::Write;

use cc_ast::node::{Node, NodeKind};

use crate::ctx::{CodegenCtx, FnCtx};
use crate::error::CodegenError;
use crate::expr::gen_expr;

/// Recursively lowers a statement node and its control flow.
pub fn gen_stmt<W: Write>(
    ctx: &mut CodegenCtx<W>,
    fnctx: &FnCtx,
    node: &Node,
) -> Result<(), CodegenError> {
    ctx.loc(node.line)?;

    match &node.kind {
        NodeKind::If { cond, then, els } => {
            let else_label = ctx.labels.next("else");
            let end_label = ctx.labels.next("end");
            gen_expr(ctx, fnctx, cond)?;
            ctx.emitter.emit_line(format!("  beqz $a0, {else_label}"))?;
            gen_stmt(ctx, fnctx, then)?;
            ctx.emitter.emit_line(format!("  b {end_label}"))?;
            ctx.emitter.emit_line(format!("{else_label}:"))?;
            if let Some(els) = els {
                gen_stmt(ctx, fnctx, els)?;
            }
            ctx.emitter.emit_line(format!("{end_label}:"))
        }

        NodeKind::For {
            init,
            cond,
            inc,
            body,
            brk_label,
            cont_label,
        } => {
            let begin_label = ctx.labels.next("begin");
            if let Some(init) = init {
                gen_stmt(ctx, fnctx, init)?;
            }
            ctx.emitter.emit_line(format!("{begin_label}:"))?;
            if let Some(cond) = cond {
                gen_expr(ctx, fnctx, cond)?;
                ctx.emitter.emit_line(format!("  beqz $a0, {brk_label}"))?;
            }
            gen_stmt(ctx, fnctx, body)?;
            ctx.emitter.emit_line(format!("{cont_label}:"))?;
            if let Some(inc) = inc {
                gen_expr(ctx, fnctx, inc)?;
            }
            ctx.emitter.emit_line(format!("  b {begin_label}"))?;
            ctx.emitter.emit_line(format!("{brk_label}:"))
        }

        NodeKind::Do {
            body,
            cond,
            brk_label,
            cont_label,
        } => {
            let begin_label = ctx.labels.next("begin");
            ctx.emitter.emit_line(format!("{begin_label}:"))?;
            gen_stmt(ctx, fnctx, body)?;
            ctx.emitter.emit_line(format!("{cont_label}:"))?;
            gen_expr(ctx, fnctx, cond)?;
            ctx.emitter
                .emit_line(format!("  bne $a0, $r0, {begin_label}"))?;
            ctx.emitter.emit_line(format!("{brk_label}:"))
        }

        NodeKind::Switch {
            cond,
            cases,
            default_case,
            body,
            brk_label,
        } => {
            gen_expr(ctx, fnctx, cond)?;
            for arm in cases {
                ctx.emitter.emit_line(format!("  li.d $a1, {}", arm.value))?;
                ctx.emitter.emit_line("  xor $a1, $a0, $a1")?;
                ctx.emitter.emit_line(format!("  beqz $a1, {}", arm.label))?;
            }
            match default_case {
                Some(arm) => ctx.emitter.emit_line(format!("  b {}", arm.label))?,
                None => ctx.emitter.emit_line(format!("  b {brk_label}"))?,
            }
            gen_stmt(ctx, fnctx, body)?;
            ctx.emitter.emit_line(format!("{brk_label}:"))
        }

        NodeKind::Case(arm) => {
            ctx.emitter.emit_line(format!("{}:", arm.label))?;
            gen_stmt(ctx, fnctx, &arm.body)
        }

        NodeKind::Block(stmts) => {
            for stmt in stmts {
                gen_stmt(ctx, fnctx, stmt)?;
            }
            Ok(())
        }

        NodeKind::Goto(label) => ctx.emitter.emit_line(format!("  b {label}")),

        NodeKind::Label {
            unique_label, body, ..
        } => {
            ctx.emitter.emit_line(format!("{unique_label}:"))?;
            gen_stmt(ctx, fnctx, body)
        }

        NodeKind::Return(expr) => {
            if let Some(expr) = expr {
                gen_expr(ctx, fnctx, expr)?;
            }
            ctx.emitter
                .emit_line(format!("  b {}", fnctx.return_label))
        }

        NodeKind::ExprStmt(expr) => gen_expr(ctx, fnctx, expr),

        _ => Err(CodegenError::InvalidStatement { line: node.line }),
    }
}
