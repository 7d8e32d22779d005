use crate::layout::TyAndLayout;

/// The integer argument registers `a0..a7`, in passing order.
pub const INT_ARG_REGS: [&str; 8] = ["a0", "a1", "a2", "a3", "a4", "a5", "a6", "a7"];

/// Describes the full application binary interface (ABI) of a function:
/// how each argument is passed to the callee and how the return value
/// comes back.
///
/// # Examples
///
/// `int add(int a, int b)` lowers to:
///
/// ```ignore
/// FnAbi {
///     args: [ArgAbi { mode: PassMode::Direct, .. }, ArgAbi { mode: PassMode::Direct, .. }],
///     ret: ArgAbi { mode: PassMode::Direct, .. },
/// }
/// ```
pub struct FnAbi<T> {
    /// The type, layout, and passing convention for each argument, in
    /// declaration order.
    pub args: Box<[ArgAbi<T>]>,

    /// The type, layout, and passing convention for the return value.
    pub ret: ArgAbi<T>,
}

impl<T> FnAbi<T> {
    pub fn new(args: Box<[ArgAbi<T>]>, ret: ArgAbi<T>) -> Self {
        FnAbi { args, ret }
    }

    /// The register each direct argument homes to, in order. Arguments
    /// beyond `a7` have no register home; this back end does not support
    /// stack-passed arguments.
    pub fn arg_registers(&self) -> impl Iterator<Item = &'static str> + '_ {
        INT_ARG_REGS.iter().copied().take(self.args.len())
    }
}

/// Describes how a single argument or return value is represented and
/// passed according to the ABI.
pub struct ArgAbi<T> {
    /// The layout of the argument or return value (size and alignment).
    pub layout: TyAndLayout<T>,

    /// The convention for passing this value across the call boundary.
    pub mode: PassMode,
}

impl<T> ArgAbi<T> {
    pub fn new(layout: TyAndLayout<T>, mode: PassMode) -> Self {
        ArgAbi { layout, mode }
    }
}

/// The possible ways in which an argument or return value can be passed.
pub enum PassMode {
    /// The argument is ignored (a `void` return).
    Ignore,
    /// The argument is passed directly in a single `a0..a7` register, or
    /// returned directly in `a0`.
    Direct,
    /// The argument is passed indirectly, via a pointer to memory the
    /// caller owns. Structs and unions larger than a register use this.
    Indirect,
}
