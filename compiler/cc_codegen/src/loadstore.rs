use std::io::Write;

use cc_ast::ty::{Type, TypeKind};

use crate::ctx::CodegenCtx;
use crate::error::CodegenError;

/// The width-and-signedness-specific load mnemonic for a scalar of `ty`,
/// reading from `$a0` into `$a0`.
fn load_op(ty: &Type) -> &'static str {
    match (ty.size, ty.is_unsigned) {
        (1, false) => "ld.b",
        (1, true) => "ld.bu",
        (2, false) => "ld.h",
        (2, true) => "ld.hu",
        (4, false) => "ld.w",
        (4, true) => "ld.wu",
        _ => "ld.d",
    }
}

/// The width-specific store mnemonic for a scalar of `ty`. Signedness does
/// not affect a store: the bit pattern is identical either way.
fn store_op(ty: &Type) -> &'static str {
    match ty.size {
        1 => "st.b",
        2 => "st.h",
        4 => "st.w",
        _ => "st.d",
    }
}

/// Loads from the address in the accumulator into the accumulator.
///
/// Arrays, structs, and unions are left alone: their "value" already *is*
/// the address computed by [`crate::addr::gen_addr`], so there is nothing
/// to load — this is the mechanism behind array-to-pointer decay.
pub fn gen_load<W: Write>(ctx: &mut CodegenCtx<W>, ty: &Type) -> Result<(), CodegenError> {
    if ty.is_aggregate() {
        return Ok(());
    }
    let op = load_op(ty);
    ctx.emitter.emit_line(format!("  {op} $a0, $a0, 0"))
}

/// Stores the accumulator to the address on top of the spill stack.
///
/// Structs and unions are copied byte-by-byte from the address the
/// accumulator holds (their value) to the destination address; scalars
/// use a single width-specific store.
pub fn gen_store<W: Write>(ctx: &mut CodegenCtx<W>, ty: &Type) -> Result<(), CodegenError> {
    ctx.pop("a1")?;
    match &ty.kind {
        TypeKind::Struct(_) | TypeKind::Union(_) => {
            for i in 0..ty.size {
                ctx.emitter.emit_line(format!("  ld.b $t1, $a0, {i}"))?;
                ctx.emitter.emit_line(format!("  st.b $t1, $a1, {i}"))?;
            }
            Ok(())
        }
        _ => {
            let op = store_op(ty);
            ctx.emitter.emit_line(format!("  {op} $a0, $a1, 0"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_narrow_loads_sign_extend() {
        assert_eq!(load_op(&Type::char(false)), "ld.b");
        assert_eq!(load_op(&Type::short(false)), "ld.h");
    }

    #[test]
    fn unsigned_narrow_loads_zero_extend() {
        assert_eq!(load_op(&Type::char(true)), "ld.bu");
        assert_eq!(load_op(&Type::int(true)), "ld.wu");
    }

    #[test]
    fn store_ignores_signedness() {
        assert_eq!(store_op(&Type::char(false)), store_op(&Type::char(true)));
    }
}
