//! The symbol graph - arena-backed model of a typed API surface
//!
//! The graph is produced once per run from the JSON emitted by the
//! type-introspection engine and never mutated afterwards. Every
//! declaration, including anonymous inline declarations that only occur
//! inside type expressions, is interned into a single arena and addressed
//! by a [`NodeId`] handle. Only nodes reachable by descending `children`
//! from the root carry a parent handle; everything else is an orphan.

use std::collections::HashMap;

mod build;
mod navigator;
mod raw;

pub use navigator::KindFilter;
pub use raw::RawNode;

use crate::error::Error;

/// Stable handle to a declaration in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("arena larger than u32::MAX"))
    }
}

/// Categorical kind of a declaration node
///
/// Each kind exposes the stable numeric mask assigned by the
/// introspection engine. The masks double as a deterministic rank when
/// name lookups collide, and combine into the bitmask filters used by
/// the navigator and categorizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// File-level container, never linkable
    Root,
    Module,
    Namespace,
    Enum,
    EnumMember,
    Variable,
    Function,
    Class,
    Interface,
    Constructor,
    Property,
    Method,
    CallSignature,
    IndexSignature,
    ConstructorSignature,
    Parameter,
    TypeLiteral,
    TypeParameter,
    Accessor,
    GetSignature,
    SetSignature,
    TypeAlias,
    /// Lightweight alias for another declaration
    Reference,
    /// Kind tag not recognized by this version of the renderer
    Unknown(u32),
}

impl DeclKind {
    pub fn from_mask(mask: u32) -> Self {
        match mask {
            0 => Self::Root,
            1 => Self::Module,
            2 => Self::Namespace,
            4 => Self::Enum,
            16 => Self::EnumMember,
            32 => Self::Variable,
            64 => Self::Function,
            128 => Self::Class,
            256 => Self::Interface,
            512 => Self::Constructor,
            1024 => Self::Property,
            2048 => Self::Method,
            4096 => Self::CallSignature,
            8192 => Self::IndexSignature,
            16384 => Self::ConstructorSignature,
            32768 => Self::Parameter,
            65536 => Self::TypeLiteral,
            131_072 => Self::TypeParameter,
            262_144 => Self::Accessor,
            524_288 => Self::GetSignature,
            1_048_576 => Self::SetSignature,
            4_194_304 => Self::TypeAlias,
            16_777_216 => Self::Reference,
            other => Self::Unknown(other),
        }
    }

    pub fn mask(self) -> u32 {
        match self {
            Self::Root => 0,
            Self::Module => 1,
            Self::Namespace => 2,
            Self::Enum => 4,
            Self::EnumMember => 16,
            Self::Variable => 32,
            Self::Function => 64,
            Self::Class => 128,
            Self::Interface => 256,
            Self::Constructor => 512,
            Self::Property => 1024,
            Self::Method => 2048,
            Self::CallSignature => 4096,
            Self::IndexSignature => 8192,
            Self::ConstructorSignature => 16384,
            Self::Parameter => 32768,
            Self::TypeLiteral => 65536,
            Self::TypeParameter => 131_072,
            Self::Accessor => 262_144,
            Self::GetSignature => 524_288,
            Self::SetSignature => 1_048_576,
            Self::TypeAlias => 4_194_304,
            Self::Reference => 16_777_216,
            Self::Unknown(mask) => mask,
        }
    }

    /// Default permalink/keyword selector for this kind
    ///
    /// Members of classes get `static`/`instance` instead, and members of
    /// interfaces get none; see the permalink generator.
    pub fn selector(self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Enum => "enum",
            Self::Variable => "variable",
            Self::Function | Self::CallSignature => "function",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Accessor | Self::GetSignature => "instance",
            Self::TypeAlias => "type",
            _ => "",
        }
    }

}

/// Mask unions used by lookups and group partitioning
pub mod masks {
    /// Property or method of a class (static members)
    pub const STATIC_MEMBER: u32 = 1024 | 2048;
    /// Property, method or accessor (instance members)
    pub const INSTANCE_MEMBER: u32 = 1024 | 2048 | 262_144;
    /// Kinds a type reference may legitimately point at
    pub const TYPE_TARGET: u32 = 4 | 128 | 256 | 4_194_304;
}

/// Modifier flags attached to a declaration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub is_abstract: bool,
    pub is_private: bool,
    pub is_protected: bool,
    pub is_public: bool,
    pub is_external: bool,
    pub is_static: bool,
    pub is_optional: bool,
    pub is_rest: bool,
}

/// One structured tag in a documentation comment, e.g. `@deprecated text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub tag: String,
    pub text: String,
}

/// Free-form documentation attached to a declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub short_text: Option<String>,
    pub text: Option<String>,
    pub returns: Option<String>,
    pub tags: Vec<TagEntry>,
}

/// Precomputed kind-partition of a container's children
#[derive(Debug, Clone)]
pub struct Group {
    pub kind: u32,
    pub title: String,
    pub children: Vec<NodeId>,
    pub categories: Vec<CategoryDef>,
}

/// Precomputed topic-partition supplied by the introspection engine
#[derive(Debug, Clone)]
pub struct CategoryDef {
    pub title: String,
    pub children: Vec<NodeId>,
}

/// Provenance of a declaration in the original source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef {
    pub file_name: String,
    pub line: u32,
    pub character: u32,
}

/// Literal value carried by a literal type expression
pub type LiteralValue = serde_json::Value;

/// A type expression - the shape of a type, not a named declaration
#[derive(Debug, Clone)]
pub enum TypeExpr {
    Array {
        element: Box<TypeExpr>,
    },
    IndexedAccess {
        object: Box<TypeExpr>,
        index: Box<TypeExpr>,
    },
    Intersection {
        types: Vec<TypeExpr>,
    },
    /// Built-in primitive, e.g. `number` or `string`
    Intrinsic {
        name: String,
    },
    /// A literal type, e.g. `"jump"` or `3.14`; `None` stands for an
    /// undefined value, which JSON cannot carry
    Literal {
        value: Option<LiteralValue>,
    },
    NamedTupleMember {
        name: String,
        element: Box<TypeExpr>,
    },
    /// `a is A` in `f(a: unknown): a is A`
    Predicate {
        name: String,
        target: Box<TypeExpr>,
    },
    /// `typeof x`
    Query {
        target: Box<TypeExpr>,
    },
    /// A use of a named type; `target` is the resolved declaration handle
    /// or `None` when the name has no declaration in this graph
    Reference {
        name: String,
        /// Identity of the target as emitted by the introspection engine
        source_id: Option<u64>,
        target: Option<NodeId>,
        type_arguments: Vec<TypeExpr>,
    },
    /// An anonymous inline declaration, e.g. `{ a: T }` or `(x: T) => U`
    Reflection {
        declaration: NodeId,
    },
    Rest {
        element: Box<TypeExpr>,
    },
    Tuple {
        elements: Vec<TypeExpr>,
    },
    Operator {
        operator: String,
        target: Box<TypeExpr>,
    },
    /// A use of a type parameter, e.g. `U` in `T[U]`
    TypeParameterRef {
        name: String,
        source_id: Option<u64>,
        declaration: Option<NodeId>,
        constraint: Option<Box<TypeExpr>>,
    },
    Union {
        types: Vec<TypeExpr>,
    },
    /// The engine could not determine a type; `name` holds its best guess
    Unknown {
        name: String,
    },
    Void,
    /// Type tag not recognized by this version of the renderer
    Unsupported {
        tag: String,
    },
}

/// One declaration node in the symbol graph
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Identity assigned by the introspection engine; unique among
    /// non-reference declarations
    pub source_id: Option<u64>,
    pub name: String,
    pub kind: DeclKind,
    /// Parent by descent from the root; `None` for the root itself and
    /// for unreachable orphans
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub ty: Option<TypeExpr>,
    pub signatures: Vec<NodeId>,
    pub get_signatures: Vec<NodeId>,
    pub set_signatures: Vec<NodeId>,
    pub index_signature: Option<NodeId>,
    pub parameters: Vec<NodeId>,
    pub type_parameters: Vec<NodeId>,
    pub comment: Option<Comment>,
    pub flags: Flags,
    pub groups: Vec<Group>,
    pub categories: Vec<CategoryDef>,
    pub extended_types: Vec<TypeExpr>,
    pub implemented_types: Vec<TypeExpr>,
    pub extended_by: Vec<TypeExpr>,
    pub implemented_by: Vec<TypeExpr>,
    pub inherited_from: Option<TypeExpr>,
    pub default_value: Option<String>,
    /// Target of a reference-kind declaration
    pub reference_target: Option<NodeId>,
    pub sources: Vec<SourceRef>,
}

/// The immutable input tree, arena-backed
#[derive(Debug)]
pub struct SymbolGraph {
    nodes: Vec<Declaration>,
    root: NodeId,
    by_source_id: HashMap<u64, NodeId>,
}

impl SymbolGraph {
    /// Build a graph from the introspection engine's JSON output
    pub fn from_json(value: serde_json::Value) -> Result<Self, Error> {
        let raw: RawNode = serde_json::from_value(value)?;
        build::build(&raw)
    }

    /// Build a graph from a JSON string
    pub fn from_json_str(text: &str) -> Result<Self, Error> {
        let raw: RawNode = serde_json::from_str(text)?;
        build::build(&raw)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Declaration {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dereference a reference-kind declaration to its target
    ///
    /// Any other declaration, and an unresolved reference, maps to
    /// itself. References must be dereferenced before any field besides
    /// the identity is consulted.
    pub fn deref(&self, id: NodeId) -> NodeId {
        let node = self.node(id);
        if node.kind == DeclKind::Reference {
            node.reference_target.unwrap_or(id)
        } else {
            id
        }
    }

    pub(crate) fn by_source_id(&self) -> &HashMap<u64, NodeId> {
        &self.by_source_id
    }

    pub(crate) fn from_parts(
        nodes: Vec<Declaration>,
        root: NodeId,
        by_source_id: HashMap<u64, NodeId>,
    ) -> Self {
        Self { nodes, root, by_source_id }
    }
}
