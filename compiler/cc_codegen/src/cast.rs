use std::io::Write;

use cc_ast::ty::{Type, TypeKind};

use crate::ctx::CodegenCtx;
use crate::error::CodegenError;

/// The size/signedness grid casts are classified into. `bool` is handled
/// separately by [`gen_cast`] before anything here is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl IntKind {
    fn of(ty: &Type) -> Self {
        match (ty.size, ty.is_unsigned) {
            (1, false) => IntKind::I8,
            (1, true) => IntKind::U8,
            (2, false) => IntKind::I16,
            (2, true) => IntKind::U16,
            (4, false) => IntKind::I32,
            (4, true) => IntKind::U32,
            (_, false) => IntKind::I64,
            (_, true) => IntKind::U64,
        }
    }

    fn bits(self) -> u32 {
        match self {
            IntKind::I8 | IntKind::U8 => 8,
            IntKind::I16 | IntKind::U16 => 16,
            IntKind::I32 | IntKind::U32 => 32,
            IntKind::I64 | IntKind::U64 => 64,
        }
    }
}

/// The fixed instruction sequence that narrows the accumulator to `to`.
///
/// LoongArch's 32-bit-suffixed arithmetic already produces a sign-extended
/// 64-bit result, and a load already sign/zero-extends per its own width
/// suffix — so unlike an x86 cast table, widening or same-width
/// reinterpretation never needs an instruction here; only narrowing does.
fn narrow_ops(to: IntKind) -> &'static [&'static str] {
    match to {
        IntKind::I8 => &["  slli.w $a0, $a0, 24", "  srai.w $a0, $a0, 24"],
        IntKind::U8 => &["  andi $a0, $a0, 0xff"],
        IntKind::I16 => &["  slli.w $a0, $a0, 16", "  srai.w $a0, $a0, 16"],
        IntKind::U16 => &["  bstrpick.d $a0, $a0, 15, 0"],
        IntKind::I32 => &["  slli.w $a0, $a0, 0"],
        IntKind::U32 => &["  bstrpick.d $a0, $a0, 31, 0"],
        IntKind::I64 | IntKind::U64 => &[],
    }
}

/// Emits the instruction sequence (possibly none) that converts the
/// accumulator from `from` to `to`.
///
/// - Target `void`: no-op.
/// - Target `bool`: `(value != 0) ? 1 : 0`.
/// - Otherwise, the (size, signedness) grid lookup: narrowing emits a
///   fixed sign/zero-extension sequence, widening or same-width
///   reinterpretation emits nothing.
pub fn gen_cast<W: Write>(
    ctx: &mut CodegenCtx<W>,
    from: &Type,
    to: &Type,
) -> Result<(), CodegenError> {
    if matches!(to.kind, TypeKind::Void) {
        return Ok(());
    }

    if matches!(to.kind, TypeKind::Bool) {
        ctx.emitter.emit_line("  sltu $a0, $r0, $a0")?;
        return Ok(());
    }

    let from_kind = IntKind::of(from);
    let to_kind = IntKind::of(to);
    if to_kind.bits() < from_kind.bits() {
        for line in narrow_ops(to_kind) {
            ctx.emitter.emit_line(*line)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_and_same_width_casts_are_no_ops() {
        assert!(narrow_ops(IntKind::I64).is_empty());
        assert_eq!(IntKind::of(&Type::int(false)).bits(), 32);
        assert_eq!(IntKind::of(&Type::long(true)).bits(), 64);
    }

    #[test]
    fn narrowing_to_signed_char_sign_extends_via_shift_pair() {
        let ops = narrow_ops(IntKind::I8);
        assert_eq!(ops, ["  slli.w $a0, $a0, 24", "  srai.w $a0, $a0, 24"]);
    }

    #[test]
    fn cast_table_closure_is_deterministic() {
        // compiling (to)(from)x twice must produce the same instructions
        for from in [IntKind::I8, IntKind::I32, IntKind::U16, IntKind::U64] {
            for to in [IntKind::I8, IntKind::I16, IntKind::I32, IntKind::U8, IntKind::U32] {
                let a = if to.bits() < from.bits() {
                    narrow_ops(to).to_vec()
                } else {
                    Vec::new()
                };
                let b = if to.bits() < from.bits() {
                    narrow_ops(to).to_vec()
                } else {
                    Vec::new()
                };
                assert_eq!(a, b);
            }
        }
    }
}
