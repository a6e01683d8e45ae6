/// Doc comments attached to a world, interface, type or function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Docs {
    pub contents: Option<String>,
}

impl Docs {
    pub fn none() -> Self {
        Docs::default()
    }
}
