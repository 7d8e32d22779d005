use std::io::Write;

use cc_abi::calling_convention::function::{ArgAbi, FnAbi, PassMode, INT_ARG_REGS};
use cc_ast::function::Function;
use cc_ast::layout_ctx::LayoutCtx;

use crate::ctx::{CodegenCtx, FnCtx};
use crate::error::CodegenError;
use crate::frame::local_frame_offset;
use crate::stmt::gen_stmt;

/// Emits the prologue, argument homing, body, and epilogue for every
/// defined function.
pub fn gen_text<W: Write>(
    ctx: &mut CodegenCtx<W>,
    functions: &[Function],
) -> Result<(), CodegenError> {
    for function in functions {
        if function.is_definition {
            gen_function(ctx, function)?;
        }
    }
    Ok(())
}

fn gen_function<W: Write>(
    ctx: &mut CodegenCtx<W>,
    function: &Function,
) -> Result<(), CodegenError> {
    if function.is_static {
        ctx.emitter.emit_line(format!("  .local {}", function.name))?;
    } else {
        ctx.emitter.emit_line(format!("  .globl {}", function.name))?;
    }
    ctx.emitter.emit_line("  .text")?;
    ctx.emitter.emit_line(format!("{}:", function.name))?;

    let return_label = format!(".L.return.{}", function.name);

    gen_prologue(ctx, function)?;
    gen_arg_homes(ctx, function)?;

    let fnctx = FnCtx {
        name: &function.name,
        locals: &function.locals,
        return_label: return_label.clone(),
    };
    gen_stmt(ctx, &fnctx, &function.body)?;
    if ctx.push_depth != 0 {
        return Err(CodegenError::UnbalancedStack {
            function: function.name.clone(),
            depth: ctx.push_depth,
        });
    }

    gen_epilogue(ctx, function, &return_label)
}

fn gen_prologue<W: Write>(ctx: &mut CodegenCtx<W>, function: &Function) -> Result<(), CodegenError> {
    let frame = function.stack_size + 16;
    ctx.emitter.emit_line(format!("  addi.d $sp, $sp,-{frame}"))?;
    ctx.emitter
        .emit_line(format!("  st.d $ra, $sp, {}", function.stack_size + 8))?;
    ctx.emitter
        .emit_line(format!("  st.d $fp, $sp, {}", function.stack_size))?;
    ctx.emitter.emit_line("  add.d $fp, $r0, $sp")?;
    ctx.emitter
        .emit_line(format!("  addi.d $sp, $sp, -{}", function.stack_size))
}

fn gen_epilogue<W: Write>(
    ctx: &mut CodegenCtx<W>,
    function: &Function,
    return_label: &str,
) -> Result<(), CodegenError> {
    ctx.emitter.emit_line(format!("{return_label}:"))?;
    ctx.emitter.emit_line("  add.d $sp, $r0, $fp")?;
    ctx.emitter
        .emit_line(format!("  ld.d $ra, $sp, {}", function.stack_size + 8))?;
    ctx.emitter
        .emit_line(format!("  ld.d $fp, $sp, {}", function.stack_size))?;
    ctx.emitter
        .emit_line(format!("  addi.d $sp, $sp, {}", function.stack_size + 16))?;
    ctx.emitter.emit_line("  jr $ra")
}

/// Stores each argument register to its parameter's frame slot. The last
/// parameter, if it is of array type, is the variadic tail sink: it eats
/// every remaining argument register instead of homing to a single slot.
fn gen_arg_homes<W: Write>(ctx: &mut CodegenCtx<W>, function: &Function) -> Result<(), CodegenError> {
    // The variadic tail sink, if any, isn't a single ABI argument in its
    // own right (it absorbs whatever registers are left), so the FnAbi
    // only classifies the fixed parameters ahead of it.
    let fixed_count = if function.has_variadic_tail {
        function.params.len().saturating_sub(1)
    } else {
        function.params.len()
    };
    let layout_ctx = LayoutCtx::new();
    let fixed_abi = FnAbi::new(
        function.params[..fixed_count]
            .iter()
            .map(|local| {
                ArgAbi::new(
                    layout_ctx.ty_and_layout_of(function.locals[*local].ty.clone()),
                    PassMode::Direct,
                )
            })
            .collect(),
        ArgAbi::new(layout_ctx.ty_and_layout_of(cc_ast::ty::Type::void()), PassMode::Ignore),
    );
    let fixed_registers: Vec<&'static str> = fixed_abi.arg_registers().collect();

    let mut reg_idx = 0usize;
    for (i, local) in function.params.iter().enumerate() {
        let data = &function.locals[*local];
        let is_tail = function.has_variadic_tail && i == function.params.len() - 1;
        if is_tail {
            let base = local_frame_offset(data.offset, data.ty.size);
            let mut slot = 0i64;
            while reg_idx < INT_ARG_REGS.len() {
                ctx.emitter.emit_line(format!(
                    "  st.d ${}, $fp, {}",
                    INT_ARG_REGS[reg_idx],
                    base + slot
                ))?;
                reg_idx += 1;
                slot += 8;
            }
        } else {
            let addr = local_frame_offset(data.offset, data.ty.size);
            let op = match data.ty.size {
                1 => "st.b",
                2 => "st.h",
                4 => "st.w",
                _ => "st.d",
            };
            ctx.emitter
                .emit_line(format!("  {op} ${}, $fp, {}", fixed_registers[reg_idx], addr))?;
            reg_idx += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_ast::node::{Node, NodeKind};
    use cc_ast::ty::Type;
    use crate::frame::layout_function;

    #[test]
    fn prologue_reserves_stack_size_plus_sixteen() {
        let mut f = Function::new("f", true, false, Node::new(NodeKind::Block(vec![]), None, 1));
        f.add_local("a", Type::int(false));
        layout_function(&mut f);
        let mut out = Vec::new();
        let mut ctx = CodegenCtx::new(&mut out);
        gen_prologue(&mut ctx, &f).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(&format!("-{}", f.stack_size + 16)));
    }

    #[test]
    fn unbalanced_push_depth_is_reported_as_an_error() {
        let body = Node::new(NodeKind::Block(vec![]), None, 1);
        let f = Function::new("f", true, false, body);
        let mut out = Vec::new();
        let mut ctx = CodegenCtx::new(&mut out);
        // Simulate a lowering bug that left one push unmatched.
        ctx.push().unwrap();
        let err = gen_function(&mut ctx, &f).unwrap_err();
        match err {
            CodegenError::UnbalancedStack { function, depth } => {
                assert_eq!(function, "f");
                assert_eq!(depth, 1);
            }
            other => panic!("expected UnbalancedStack, got {other:?}"),
        }
    }

    #[test]
    fn variadic_tail_sinks_remaining_registers() {
        let mut f = Function::new("f", true, false, Node::new(NodeKind::Block(vec![]), None, 1));
        f.add_param("fixed", Type::int(false));
        f.add_param("tail", Type::array_of(Type::long(false), 4));
        f.has_variadic_tail = true;
        layout_function(&mut f);
        let mut out = Vec::new();
        let mut ctx = CodegenCtx::new(&mut out);
        gen_arg_homes(&mut ctx, &f).unwrap();
        let text = String::from_utf8(out).unwrap();
        for reg in &INT_ARG_REGS[1..] {
            assert!(text.contains(&format!("${reg}")));
        }
    }
}
