use crate::docs::Docs;
use crate::stability::Stability;
use crate::types::{Direction, Type, TypeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

/// What kind of WIT function this is: a freestanding interface function, or
/// one of the three shapes attached to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Freestanding,
    Method(TypeId),
    Static(TypeId),
    Constructor(TypeId),
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub kind: FunctionKind,
    pub params: Vec<Param>,
    pub results: Vec<Param>,
    pub stability: Stability,
    pub docs: Docs,
    pub direction: Direction,
}

impl Function {
    /// The canonical export/import symbol name, e.g. `[method]stream.read`.
    pub fn core_export_name(&self) -> String {
        match self.kind {
            FunctionKind::Freestanding => self.name.clone(),
            FunctionKind::Method(_) => format!("[method]{}", self.name),
            FunctionKind::Static(_) => format!("[static]{}", self.name),
            FunctionKind::Constructor(_) => format!("[constructor]{}", self.name),
        }
    }
}
