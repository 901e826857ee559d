//! Structured representation of an emitted Rust source file.
//!
//! Builders produce these values; [`super::printer`] turns them into text.
//! Function bodies are kept as lines; signatures, fields and imports are
//! structured values.

/// One generated `.rs` file.
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    /// Inner doc lines (`//!`).
    pub docs: Vec<String>,
    /// Inner attributes without the `#![...]` wrapper.
    pub attributes: Vec<String>,
    /// `use` paths without the `use` keyword.
    pub imports: Vec<String>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub enum Item {
    Mod(ModItem),
    Use(String),
    Const(ConstItem),
    Struct(StructItem),
    Impl(ImplBlock),
    Fn(FnItem),
}

/// `pub mod name;`
#[derive(Debug, Clone)]
pub struct ModItem {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ConstItem {
    pub docs: Vec<String>,
    pub public: bool,
    pub name: String,
    pub ty: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct StructItem {
    pub docs: Vec<String>,
    pub derives: Vec<String>,
    pub name: String,
    pub fields: Vec<FieldItem>,
}

#[derive(Debug, Clone)]
pub struct FieldItem {
    pub docs: Vec<String>,
    pub public: bool,
    pub name: String,
    pub ty: String,
}

/// `impl Target { .. }` or `impl Trait for Target { .. }`.
#[derive(Debug, Clone)]
pub struct ImplBlock {
    pub trait_name: Option<String>,
    pub target: String,
    pub fns: Vec<FnItem>,
}

#[derive(Debug, Clone)]
pub struct FnItem {
    pub docs: Vec<String>,
    pub public: bool,
    pub name: String,
    /// `&self`, `self`, or `None` for associated functions.
    pub receiver: Option<String>,
    pub params: Vec<Param>,
    pub ret: Option<String>,
    /// Body lines; nesting is expressed with leading spaces.
    pub body: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

impl SourceFile {
    /// Every function, including those inside impl blocks, in file order.
    pub fn fns(&self) -> Vec<&FnItem> {
        let mut fns = Vec::new();
        for item in &self.items {
            match item {
                Item::Fn(f) => fns.push(f),
                Item::Impl(block) => fns.extend(block.fns.iter()),
                _ => {}
            }
        }
        fns
    }

    /// Finds a function by name.
    pub fn find_fn(&self, name: &str) -> Option<&FnItem> {
        self.fns().into_iter().find(|f| f.name == name)
    }

    /// Finds a struct by name.
    pub fn find_struct(&self, name: &str) -> Option<&StructItem> {
        self.items.iter().find_map(|item| match item {
            Item::Struct(s) if s.name == name => Some(s),
            _ => None,
        })
    }
}

impl FnItem {
    /// A public function with no receiver, parameters or return type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            docs: Vec::new(),
            public: true,
            name: name.into(),
            receiver: None,
            params: Vec::new(),
            ret: None,
            body: Vec::new(),
        }
    }

    pub fn doc(mut self, line: impl Into<String>) -> Self {
        self.docs.push(line.into());
        self
    }

    pub fn receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.ret = Some(ty.into());
        self
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    /// Names of the declared parameters, in order.
    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }
}

impl ImplBlock {
    pub fn inherent(target: impl Into<String>) -> Self {
        Self {
            trait_name: None,
            target: target.into(),
            fns: Vec::new(),
        }
    }

    pub fn for_trait(trait_name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            trait_name: Some(trait_name.into()),
            target: target.into(),
            fns: Vec::new(),
        }
    }
}
