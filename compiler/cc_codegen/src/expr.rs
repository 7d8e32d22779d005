use std::io::Write;

use cc_abi::calling_convention::function::{ArgAbi, FnAbi, PassMode};
use cc_ast::layout_ctx::LayoutCtx;
use cc_ast::node::{Node, NodeKind};
use cc_ast::ty::Type;

use crate::addr::gen_addr;
use crate::cast::gen_cast;
use crate::ctx::{CodegenCtx, FnCtx};
use crate::error::CodegenError;
use crate::frame::local_frame_offset;
use crate::loadstore::{gen_load, gen_store};
use crate::stmt::gen_stmt;

/// The 64-bit opcode suffix is chosen when `lhs`'s type is `long` or has a
/// pointer base; otherwise the 32-bit suffix is used.
fn width_suffix(ty: &Type) -> &'static str {
    if ty.is_64_bit() { "d" } else { "w" }
}

fn ty_of(node: &Node) -> &Type {
    node.ty.as_ref().expect("expression node must carry a type")
}

/// Recursively lowers an expression node, leaving its value (or, for
/// aggregates, its address) in the accumulator.
pub fn gen_expr<W: Write>(
    ctx: &mut CodegenCtx<W>,
    fnctx: &FnCtx,
    node: &Node,
) -> Result<(), CodegenError> {
    ctx.loc(node.line)?;

    match &node.kind {
        NodeKind::NullExpr => Ok(()),

        NodeKind::Num(val) => ctx.emitter.emit_line(format!("  li.d $a0, {val}")),

        NodeKind::Neg(inner) => {
            gen_expr(ctx, fnctx, inner)?;
            ctx.emitter.emit_line("  sub.d $a0, $r0, $a0")
        }

        NodeKind::Var(_) | NodeKind::Member { .. } => {
            gen_addr(ctx, fnctx, node)?;
            gen_load(ctx, ty_of(node))
        }

        NodeKind::Deref(inner) => {
            gen_expr(ctx, fnctx, inner)?;
            gen_load(ctx, ty_of(node))
        }

        NodeKind::Addr(inner) => gen_addr(ctx, fnctx, inner),

        NodeKind::Assign { lhs, rhs } => {
            gen_addr(ctx, fnctx, lhs)?;
            ctx.push()?;
            gen_expr(ctx, fnctx, rhs)?;
            gen_store(ctx, ty_of(node))
        }

        NodeKind::StmtExpr(body) => gen_stmt(ctx, fnctx, body),

        NodeKind::Comma { lhs, rhs } => {
            gen_expr(ctx, fnctx, lhs)?;
            gen_expr(ctx, fnctx, rhs)
        }

        NodeKind::Cast(inner) => {
            gen_expr(ctx, fnctx, inner)?;
            gen_cast(ctx, ty_of(inner), ty_of(node))
        }

        NodeKind::Memzero(local) => {
            let data = &fnctx.locals[*local];
            let base = local_frame_offset(data.offset, data.ty.size);
            for i in 0..data.ty.size {
                ctx.emitter
                    .emit_line(format!("  st.b $r0, $fp, {}", base + i as i64))?;
            }
            Ok(())
        }

        NodeKind::Cond { cond, then, els } => {
            let else_label = ctx.labels.next("else");
            let end_label = ctx.labels.next("end");
            gen_expr(ctx, fnctx, cond)?;
            ctx.emitter.emit_line(format!("  beqz $a0, {else_label}"))?;
            gen_expr(ctx, fnctx, then)?;
            ctx.emitter.emit_line(format!("  b {end_label}"))?;
            ctx.emitter.emit_line(format!("{else_label}:"))?;
            gen_expr(ctx, fnctx, els)?;
            ctx.emitter.emit_line(format!("{end_label}:"))
        }

        NodeKind::Not(inner) => {
            gen_expr(ctx, fnctx, inner)?;
            ctx.emitter.emit_line("  sltui $a0, $a0, 1")
        }

        NodeKind::BitNot(inner) => {
            gen_expr(ctx, fnctx, inner)?;
            ctx.emitter.emit_line("  nor $a0, $a0, $r0")
        }

        NodeKind::LogAnd { lhs, rhs } => {
            let false_label = ctx.labels.next("false");
            let end_label = ctx.labels.next("end");
            gen_expr(ctx, fnctx, lhs)?;
            ctx.emitter.emit_line(format!("  beqz $a0, {false_label}"))?;
            gen_expr(ctx, fnctx, rhs)?;
            ctx.emitter.emit_line(format!("  beqz $a0, {false_label}"))?;
            ctx.emitter.emit_line("  li.d $a0, 1")?;
            ctx.emitter.emit_line(format!("  b {end_label}"))?;
            ctx.emitter.emit_line(format!("{false_label}:"))?;
            ctx.emitter.emit_line("  li.d $a0, 0")?;
            ctx.emitter.emit_line(format!("{end_label}:"))
        }

        NodeKind::LogOr { lhs, rhs } => {
            let true_label = ctx.labels.next("true");
            let end_label = ctx.labels.next("end");
            gen_expr(ctx, fnctx, lhs)?;
            ctx.emitter
                .emit_line(format!("  bne $a0, $r0, {true_label}"))?;
            gen_expr(ctx, fnctx, rhs)?;
            ctx.emitter
                .emit_line(format!("  bne $a0, $r0, {true_label}"))?;
            ctx.emitter.emit_line("  li.d $a0, 0")?;
            ctx.emitter.emit_line(format!("  b {end_label}"))?;
            ctx.emitter.emit_line(format!("{true_label}:"))?;
            ctx.emitter.emit_line("  li.d $a0, 1")?;
            ctx.emitter.emit_line(format!("{end_label}:"))
        }

        NodeKind::FunCall {
            name,
            args,
            ret_ty,
        } => gen_funcall(ctx, fnctx, name, args, ret_ty),

        NodeKind::Add(lhs, rhs) => gen_binary(ctx, fnctx, lhs, rhs, "add")
            .map(|_| ()),
        NodeKind::Sub(lhs, rhs) => gen_binary(ctx, fnctx, lhs, rhs, "sub")
            .map(|_| ()),
        NodeKind::Mul(lhs, rhs) => gen_binary(ctx, fnctx, lhs, rhs, "mul")
            .map(|_| ()),

        NodeKind::Div(lhs, rhs) => {
            let suffix = width_suffix(ty_of(lhs));
            let unsigned = ty_of(node).is_unsigned;
            let op = format!("div.{suffix}{}", if unsigned { "u" } else { "" });
            gen_rhs_then_lhs(ctx, fnctx, rhs, lhs)?;
            ctx.emitter.emit_line(format!("  {op} $a0, $a0, $a1"))
        }

        NodeKind::Mod(lhs, rhs) => {
            let suffix = width_suffix(ty_of(lhs));
            let unsigned = ty_of(node).is_unsigned;
            let op = format!("mod.{suffix}{}", if unsigned { "u" } else { "" });
            gen_rhs_then_lhs(ctx, fnctx, rhs, lhs)?;
            ctx.emitter.emit_line(format!("  {op} $a0, $a0, $a1"))
        }

        NodeKind::BitAnd(lhs, rhs) => {
            gen_rhs_then_lhs(ctx, fnctx, rhs, lhs)?;
            ctx.emitter.emit_line("  and $a0, $a0, $a1")
        }
        NodeKind::BitOr(lhs, rhs) => {
            gen_rhs_then_lhs(ctx, fnctx, rhs, lhs)?;
            ctx.emitter.emit_line("  or $a0, $a0, $a1")
        }
        NodeKind::BitXor(lhs, rhs) => {
            gen_rhs_then_lhs(ctx, fnctx, rhs, lhs)?;
            ctx.emitter.emit_line("  xor $a0, $a0, $a1")
        }

        NodeKind::Eq(lhs, rhs) => {
            gen_rhs_then_lhs(ctx, fnctx, rhs, lhs)?;
            ctx.emitter.emit_line("  xor $a0, $a0, $a1")?;
            // (lhs ^ rhs) == 0 iff lhs == rhs, regardless of signedness.
            ctx.emitter.emit_line("  sltui $a0, $a0, 1")
        }
        NodeKind::Ne(lhs, rhs) => {
            gen_rhs_then_lhs(ctx, fnctx, rhs, lhs)?;
            ctx.emitter.emit_line("  xor $a0, $a0, $a1")?;
            // Corrected form (see Design Notes): true whenever the XOR is
            // non-zero, not just when lhs - rhs is negative.
            ctx.emitter.emit_line("  sltu $a0, $r0, $a0")
        }

        NodeKind::Lt(lhs, rhs) => {
            let op = if ty_of(lhs).is_unsigned { "sltu" } else { "slt" };
            gen_rhs_then_lhs(ctx, fnctx, rhs, lhs)?;
            ctx.emitter.emit_line(format!("  {op} $a0, $a0, $a1"))
        }
        NodeKind::Le(lhs, rhs) => {
            let op = if ty_of(lhs).is_unsigned { "sltu" } else { "slt" };
            gen_rhs_then_lhs(ctx, fnctx, rhs, lhs)?;
            // le(lhs, rhs) = !(rhs < lhs)
            ctx.emitter.emit_line(format!("  {op} $a0, $a1, $a0"))?;
            ctx.emitter.emit_line("  xori $a0, $a0, 1")
        }

        NodeKind::Shl(lhs, rhs) => {
            let suffix = width_suffix(ty_of(lhs));
            gen_rhs_then_lhs(ctx, fnctx, rhs, lhs)?;
            ctx.emitter.emit_line(format!("  sll.{suffix} $a0, $a0, $a1"))
        }
        NodeKind::Shr(lhs, rhs) => {
            let suffix = width_suffix(ty_of(lhs));
            let op = if ty_of(lhs).is_unsigned { "srl" } else { "sra" };
            gen_rhs_then_lhs(ctx, fnctx, rhs, lhs)?;
            ctx.emitter
                .emit_line(format!("  {op}.{suffix} $a0, $a0, $a1"))
        }

        _ => Err(CodegenError::InvalidExpression { line: node.line }),
    }
}

/// Evaluation order for binary operators: `rhs` first, pushed, then
/// `lhs`, then `rhs` popped into `a1` so that `lhs` stays in `a0`.
fn gen_rhs_then_lhs<W: Write>(
    ctx: &mut CodegenCtx<W>,
    fnctx: &FnCtx,
    rhs: &Node,
    lhs: &Node,
) -> Result<(), CodegenError> {
    gen_expr(ctx, fnctx, rhs)?;
    ctx.push()?;
    gen_expr(ctx, fnctx, lhs)?;
    ctx.pop("a1")
}

fn gen_binary<W: Write>(
    ctx: &mut CodegenCtx<W>,
    fnctx: &FnCtx,
    lhs: &Node,
    rhs: &Node,
    mnemonic: &str,
) -> Result<(), CodegenError> {
    let suffix = width_suffix(ty_of(lhs));
    gen_rhs_then_lhs(ctx, fnctx, rhs, lhs)?;
    ctx.emitter
        .emit_line(format!("  {mnemonic}.{suffix} $a0, $a0, $a1"))
}

/// Builds the call's ABI description: every argument is passed directly
/// in an `a0..a7` register (this back end has no stack-passed arguments,
/// and no struct-by-value argument appears in any scenario it targets),
/// and the return value is ignored for `void` and direct otherwise.
fn fn_abi_of(args: &[Node], ret_ty: &Type) -> FnAbi<Type> {
    let layout_ctx = LayoutCtx::new();
    let arg_abis = args
        .iter()
        .map(|a| ArgAbi::new(layout_ctx.ty_and_layout_of(ty_of(a).clone()), PassMode::Direct))
        .collect();
    let ret_mode = if matches!(ret_ty.kind, cc_ast::ty::TypeKind::Void) {
        PassMode::Ignore
    } else {
        PassMode::Direct
    };
    let ret = ArgAbi::new(layout_ctx.ty_and_layout_of(ret_ty.clone()), ret_mode);
    FnAbi::new(arg_abis, ret)
}

fn gen_funcall<W: Write>(
    ctx: &mut CodegenCtx<W>,
    fnctx: &FnCtx,
    name: &str,
    args: &[Node],
    ret_ty: &Type,
) -> Result<(), CodegenError> {
    let abi = fn_abi_of(args, ret_ty);

    for arg in args {
        gen_expr(ctx, fnctx, arg)?;
        ctx.push()?;
    }
    for reg in abi.arg_registers().collect::<Vec<_>>().into_iter().rev() {
        ctx.pop(reg)?;
    }

    // The ABI requires the stack to be 16-byte aligned at a call site;
    // each outstanding push is 8 bytes, so an odd push depth here means
    // realigning around the call and restoring it after.
    let misaligned = ctx.push_depth % 2 != 0;
    if misaligned {
        ctx.emitter.emit_line("  addi.d $sp, $sp, -8")?;
    }
    ctx.emitter.emit_line(format!("  bl {name}"))?;
    if misaligned {
        ctx.emitter.emit_line("  addi.d $sp, $sp, 8")?;
    }

    if matches!(abi.ret.mode, PassMode::Ignore) {
        return Ok(());
    }
    gen_cast(ctx, &Type::long(false), ret_ty)
}
