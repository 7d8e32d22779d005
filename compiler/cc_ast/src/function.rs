//! The top-level objects a translation unit is made of. In the source
//! material these were a linked list of `Obj` nodes distinguished by
//! `is_function`; here functions and globals are separate, borrow-checker
//! friendly structs collected into a `Program`.

use cc_utils::index_vec::IdxVec;
use tracing::{debug, instrument};

use crate::local::{Local, LocalData};
use crate::node::Node;
use crate::ty::Type;

/// A relocation record: at `offset` bytes into a global's initializer,
/// the linker should place a pointer-sized reference to `label`, plus
/// `addend`.
#[derive(Debug, Clone)]
pub struct Relocation {
    pub offset: u64,
    pub label: String,
    pub addend: i64,
}

#[derive(Debug, Clone)]
pub struct Global {
    pub name: String,
    pub ty: Type,
    pub is_static: bool,
    /// A declaration with no body is never emitted.
    pub is_definition: bool,
    /// `None` for a tentative/external declaration with no initializer.
    pub init_data: Option<Vec<u8>>,
    /// Sorted by `offset`, per the data model invariant.
    pub relocations: Vec<Relocation>,
}

impl Global {
    pub fn new(name: impl Into<String>, ty: Type, is_static: bool) -> Self {
        Global {
            name: name.into(),
            ty,
            is_static,
            is_definition: true,
            init_data: None,
            relocations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub is_definition: bool,
    pub is_static: bool,
    pub params: Vec<Local>,
    pub locals: IdxVec<Local, LocalData>,
    /// Set by the frame layout pass; `0` beforehand. Always a multiple of
    /// 16 afterwards.
    pub stack_size: u64,
    pub body: Node,
    /// True when the last parameter is of array type: it sinks the
    /// remaining argument registers instead of homing to one slot.
    pub has_variadic_tail: bool,
}

impl Function {
    #[instrument(skip(name, body))]
    pub fn new(name: impl Into<String>, is_definition: bool, is_static: bool, body: Node) -> Self {
        let name = name.into();
        debug!(%name, is_definition, is_static, "function object created");
        Function {
            name,
            is_definition,
            is_static,
            params: Vec::new(),
            locals: IdxVec::new(),
            stack_size: 0,
            body,
            has_variadic_tail: false,
        }
    }

    pub fn add_param(&mut self, name: impl Into<String>, ty: Type) -> Local {
        let local = self.locals.push(LocalData::new(name, ty, true));
        self.params.push(local);
        local
    }

    pub fn add_local(&mut self, name: impl Into<String>, ty: Type) -> Local {
        self.locals.push(LocalData::new(name, ty, false))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Program {
    pub globals: Vec<Global>,
    pub functions: Vec<Function>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}
