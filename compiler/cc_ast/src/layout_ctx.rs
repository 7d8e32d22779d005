//! Bridges a [`Type`]'s own size/align fields to the [`cc_abi`] layout
//! types the code generator's frame and member address arithmetic expects.

use cc_abi::layout::{Layout, TyAndLayout};
use cc_abi::size_and_align::{AbiAndPrefAlign, Size};

use crate::ty::Type;

pub struct LayoutCtx;

impl LayoutCtx {
    pub fn new() -> Self {
        LayoutCtx
    }

    pub fn layout_of(&self, ty: &Type) -> Layout {
        Layout::new(
            Size::from_bits(ty.size * 8),
            AbiAndPrefAlign::new(ty.align * 8, ty.align * 8),
        )
    }

    pub fn ty_and_layout_of(&self, ty: Type) -> TyAndLayout<Type> {
        let layout = self.layout_of(&ty);
        TyAndLayout::new(ty, layout)
    }
}

impl Default for LayoutCtx {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_layout_is_four_bytes_aligned_to_four() {
        let ctx = LayoutCtx::new();
        let layout = ctx.layout_of(&Type::int(false));
        assert_eq!(layout.size.bytes(), 4);
        assert_eq!(layout.align.abi.bytes(), 4);
    }

    #[test]
    fn pointer_layout_is_eight_bytes() {
        let ctx = LayoutCtx::new();
        let layout = ctx.layout_of(&Type::pointer_to(Type::int(false)));
        assert_eq!(layout.size.bytes(), 8);
        assert_eq!(layout.align.abi.bytes(), 8);
    }
}
