use cc_ast::function::Function;
use cc_ast::layout_ctx::LayoutCtx;

/// Rounds `n` up to the nearest multiple of `align`.
pub fn round_up(n: u64, align: u64) -> u64 {
    if align == 0 {
        return n;
    }
    n.div_ceil(align) * align
}

/// Assigns each local a negative frame offset, in declaration order.
///
/// For each local: round the running offset up to this local's own
/// alignment, store the negated result as `local.offset`, *then* add this
/// local's size to the running offset. The store must happen before the
/// increment — `local_frame_offset` below reconstructs the slot's actual
/// start address as `local.offset - size`, which only lands inside the
/// slot this local was just given when `local.offset` is the pre-increment
/// boundary, not the post-increment one.
pub fn layout_function(function: &mut Function) {
    let layout_ctx = LayoutCtx::new();
    let mut offset = 0u64;
    for local in function.locals.raw.iter_mut() {
        let layout = layout_ctx.layout_of(&local.ty);
        let align = layout.align.abi.bytes().max(1);
        offset = round_up(offset, align);
        local.offset = -(offset as i64);
        offset += layout.size.bytes();
    }
    function.stack_size = round_up(offset, 16);
}

/// The address of a local's frame slot, relative to the frame pointer:
/// `var.offset` marks the top of the slot, and the data starts
/// `var.ty.size` bytes below it.
pub fn local_frame_offset(offset: i64, size: u64) -> i64 {
    offset - size as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_ast::node::{Node, NodeKind};
    use cc_ast::ty::Type;

    fn empty_body() -> Node {
        Node::new(NodeKind::Block(Vec::new()), None, 1)
    }

    #[test]
    fn stack_size_is_always_a_multiple_of_sixteen() {
        let mut f = Function::new("f", true, false, empty_body());
        f.add_local("a", Type::char(false));
        f.add_local("b", Type::char(false));
        f.add_local("c", Type::char(false));
        layout_function(&mut f);
        assert_eq!(f.stack_size % 16, 0);
    }

    #[test]
    fn locals_get_strictly_decreasing_non_overlapping_addresses() {
        let mut f = Function::new("f", true, false, empty_body());
        let a = f.add_local("a", Type::int(false));
        let b = f.add_local("b", Type::int(false));
        layout_function(&mut f);
        let a_off = f.locals[a].offset;
        let b_off = f.locals[b].offset;
        assert_eq!(a_off, 0);
        assert_eq!(b_off, -4);
        let a_addr = local_frame_offset(a_off, f.locals[a].ty.size);
        let b_addr = local_frame_offset(b_off, f.locals[b].ty.size);
        assert_eq!(a_addr, -4);
        assert_eq!(b_addr, -8);
        assert!(a_addr > b_addr);
    }
}
