use std::io::Write;

use cc_ast::function::Global;

use crate::ctx::CodegenCtx;
use crate::error::CodegenError;

/// Emits `.data`/`.bss` directives for every defined global, interleaving
/// raw initializer bytes with relocation entries.
pub fn gen_data<W: Write>(ctx: &mut CodegenCtx<W>, globals: &[Global]) -> Result<(), CodegenError> {
    for global in globals {
        if !global.is_definition {
            continue;
        }
        gen_global(ctx, global)?;
    }
    Ok(())
}

fn gen_global<W: Write>(ctx: &mut CodegenCtx<W>, global: &Global) -> Result<(), CodegenError> {
    if global.is_static {
        ctx.emitter.emit_line(format!("  .local {}", global.name))?;
    } else {
        ctx.emitter.emit_line(format!("  .globl {}", global.name))?;
    }
    ctx.emitter
        .emit_line(format!("  .align {}", log2(global.ty.align)))?;

    match &global.init_data {
        Some(bytes) => {
            ctx.emitter.emit_line("  .data")?;
            ctx.emitter.emit_line(format!("{}:", global.name))?;
            emit_initializer(ctx, bytes, &global.relocations)?;
        }
        None => {
            ctx.emitter.emit_line("  .bss")?;
            ctx.emitter.emit_line(format!("{}:", global.name))?;
            ctx.emitter.emit_line(format!("  .zero {}", global.ty.size))?;
        }
    }
    Ok(())
}

/// Walks `bytes` one position at a time; wherever a relocation starts,
/// emits an 8-byte pointer entry and skips ahead instead of individual
/// `.byte`s.
fn emit_initializer<W: Write>(
    ctx: &mut CodegenCtx<W>,
    bytes: &[u8],
    relocations: &[cc_ast::function::Relocation],
) -> Result<(), CodegenError> {
    let mut rel_idx = 0;
    let mut i = 0u64;
    let len = bytes.len() as u64;
    while i < len {
        if rel_idx < relocations.len() && relocations[rel_idx].offset == i {
            let rel = &relocations[rel_idx];
            let sign = if rel.addend >= 0 { "+" } else { "" };
            ctx.emitter
                .emit_line(format!("  .quad {}{}{}", rel.label, sign, rel.addend))?;
            i += 8;
            rel_idx += 1;
        } else {
            ctx.emitter.emit_line(format!("  .byte {}", bytes[i as usize]))?;
            i += 1;
        }
    }
    Ok(())
}

/// `align` is always a power of two; the `.align` directive on this target
/// takes the log2, not the byte count.
fn log2(align: u64) -> u32 {
    align.max(1).trailing_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log2_of_power_of_two_alignments() {
        assert_eq!(log2(1), 0);
        assert_eq!(log2(4), 2);
        assert_eq!(log2(8), 3);
    }

    #[test]
    fn initializer_skips_eight_bytes_at_a_relocation() {
        let mut out = Vec::new();
        let mut ctx = CodegenCtx::new(&mut out);
        let bytes = vec![0u8; 16];
        let relocations = vec![cc_ast::function::Relocation {
            offset: 0,
            label: "target".to_string(),
            addend: 0,
        }];
        emit_initializer(&mut ctx, &bytes, &relocations).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(".quad target"));
        assert_eq!(text.matches(".byte").count(), 8);
    }
}
