use datalog_ast::{QualifiedName, Symbol, TypeAttr};
use std::collections::HashMap;

/// Stable identity of a type within its environment. Lattice operations and
/// [`crate::TypeSet`] store these instead of owned copies so that equality
/// stays identity-based even for structurally similar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

/// A record field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Symbol,
    pub ty: TypeId,
}

/// A sum-type branch
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub name: Symbol,
    pub ty: TypeId,
}

/// The variants of a type in the environment.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// One of the four roots: `number`, `unsigned`, `float`, `symbol`
    Predefined(TypeAttr),
    /// A user alias forming a subtype chain below its base
    Primitive { base: TypeId },
    /// A set union of its element types
    Union { elements: Vec<TypeId> },
    /// An ordered list of named fields
    Record { fields: Vec<Field> },
    /// An ordered list of named branches, packed as `(index, payload)`
    Sum { branches: Vec<Branch> },
}

struct Entry {
    name: QualifiedName,
    ty: Type,
}

/// The set of all types of one program, owning every type instance.
///
/// The four predefined roots are always present; user types are registered
/// by the environment builder. Comparing types from different environments
/// is undefined.
pub struct TypeEnvironment {
    entries: Vec<Entry>,
    index: HashMap<QualifiedName, TypeId>,
    number: TypeId,
    unsigned: TypeId,
    float: TypeId,
    symbol: TypeId,
}

impl TypeEnvironment {
    pub fn new() -> Self {
        let mut env = TypeEnvironment {
            entries: Vec::new(),
            index: HashMap::new(),
            number: TypeId(0),
            unsigned: TypeId(0),
            float: TypeId(0),
            symbol: TypeId(0),
        };
        env.number = env.register("number", Type::Predefined(TypeAttr::Signed));
        env.unsigned = env.register("unsigned", Type::Predefined(TypeAttr::Unsigned));
        env.float = env.register("float", Type::Predefined(TypeAttr::Float));
        env.symbol = env.register("symbol", Type::Predefined(TypeAttr::Symbol));
        env
    }

    fn register(&mut self, name: impl AsRef<str>, ty: Type) -> TypeId {
        let name = QualifiedName::new(name);
        assert!(
            !self.index.contains_key(&name),
            "registering present type {}",
            name
        );
        let id = TypeId(self.entries.len() as u32);
        self.index.insert(name.clone(), id);
        self.entries.push(Entry { name, ty });
        id
    }

    /// Create a subset type under the predefined root selected by `attr`.
    pub fn create_subset(&mut self, name: impl AsRef<str>, attr: TypeAttr) -> TypeId {
        let base = self.root(attr);
        self.register(name, Type::Primitive { base })
    }

    pub fn create_union(&mut self, name: impl AsRef<str>) -> TypeId {
        self.register(name, Type::Union { elements: Vec::new() })
    }

    pub fn create_record(&mut self, name: impl AsRef<str>) -> TypeId {
        self.register(name, Type::Record { fields: Vec::new() })
    }

    pub fn create_sum(&mut self, name: impl AsRef<str>) -> TypeId {
        self.register(name, Type::Sum { branches: Vec::new() })
    }

    pub fn add_union_element(&mut self, union: TypeId, element: TypeId) {
        assert!((element.0 as usize) < self.entries.len());
        match &mut self.entries[union.0 as usize].ty {
            Type::Union { elements } => elements.push(element),
            _ => panic!("{} is not a union type", self.name(union)),
        }
    }

    pub fn add_record_field(&mut self, record: TypeId, name: Symbol, ty: TypeId) {
        assert!((ty.0 as usize) < self.entries.len());
        match &mut self.entries[record.0 as usize].ty {
            Type::Record { fields } => fields.push(Field { name, ty }),
            _ => panic!("{} is not a record type", self.name(record)),
        }
    }

    pub fn add_sum_branch(&mut self, sum: TypeId, name: Symbol, ty: TypeId) {
        assert!((ty.0 as usize) < self.entries.len());
        match &mut self.entries[sum.0 as usize].ty {
            Type::Sum { branches } => branches.push(Branch { name, ty }),
            _ => panic!("{} is not a sum type", self.name(sum)),
        }
    }

    pub fn get(&self, name: &QualifiedName) -> Option<TypeId> {
        self.index.get(name).copied()
    }

    pub fn is_type(&self, name: &QualifiedName) -> bool {
        self.index.contains_key(name)
    }

    pub fn ty(&self, id: TypeId) -> &Type {
        &self.entries[id.0 as usize].ty
    }

    pub fn name(&self, id: TypeId) -> &QualifiedName {
        &self.entries[id.0 as usize].name
    }

    pub fn root(&self, attr: TypeAttr) -> TypeId {
        match attr {
            TypeAttr::Signed => self.number,
            TypeAttr::Unsigned => self.unsigned,
            TypeAttr::Float => self.float,
            TypeAttr::Symbol => self.symbol,
        }
    }

    pub fn number_type(&self) -> TypeId {
        self.number
    }

    pub fn unsigned_type(&self) -> TypeId {
        self.unsigned
    }

    pub fn float_type(&self) -> TypeId {
        self.float
    }

    pub fn symbol_type(&self) -> TypeId {
        self.symbol
    }

    pub fn ids(&self) -> impl Iterator<Item = TypeId> {
        (0..self.entries.len() as u32).map(TypeId)
    }

    pub fn all_types(&self) -> crate::TypeSet {
        self.ids().collect()
    }

    /// Render a type the way it was declared, for dumps and diagnostics.
    pub fn render(&self, id: TypeId) -> String {
        match self.ty(id) {
            Type::Predefined(_) => self.name(id).to_string(),
            Type::Primitive { base } => format!("{} <: {}", self.name(id), self.name(*base)),
            Type::Union { elements } => {
                let elems: Vec<String> = elements
                    .iter()
                    .map(|element| self.name(*element).to_string())
                    .collect();
                format!("{} = {}", self.name(id), elems.join(" | "))
            }
            Type::Record { fields } => {
                if fields.is_empty() {
                    return format!("{} = ()", self.name(id));
                }
                let fields: Vec<String> = fields
                    .iter()
                    .map(|field| format!("{} : {}", field.name, self.name(field.ty)))
                    .collect();
                format!("{} = ( {} )", self.name(id), fields.join(" , "))
            }
            Type::Sum { branches } => {
                let branches: Vec<String> = branches
                    .iter()
                    .map(|branch| format!("{} = {}", branch.name, self.name(branch.ty)))
                    .collect();
                format!("{} = {}", self.name(id), branches.join(" | "))
            }
        }
    }
}

impl Default for TypeEnvironment {
    fn default() -> Self {
        TypeEnvironment::new()
    }
}
