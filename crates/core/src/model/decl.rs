//! Compilation model handed over by the host.
//!
//! This is the serde representation of the declarations a compiler front end
//! knows about: source units with their `using` directives, and type
//! declarations with members, base lists and attributes. The generator only
//! reads it.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::member::{Accessibility, PassingMode};

/// Root of the compilation model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Compilation {
    /// Source units (files) of the compilation.
    #[serde(default)]
    pub units: Vec<CompilationUnit>,
    /// Every type declaration visible to the compilation, including
    /// referenced metadata types.
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl Compilation {
    /// Parse a compilation model from JSON.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse compilation model: {e}"))
    }
}

/// A source file and its `using` directives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Path identifying the unit, as used by [`SourceLocation::path`].
    pub path: String,
    /// Imported names, without the `using` keyword or trailing semicolon.
    #[serde(default)]
    pub usings: Vec<String>,
}

/// A position in a source unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Unit path.
    pub path: String,
    /// One-based line.
    #[serde(default)]
    pub line: u32,
    /// One-based column.
    #[serde(default)]
    pub column: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self.path, self.line, self.column)
    }
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// `class`
    Class,
    /// `interface`
    Interface,
    /// `struct`
    Struct,
    /// `enum`
    Enum,
    /// `delegate`
    Delegate,
}

impl TypeKind {
    /// C# keyword form.
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Struct => "struct",
            TypeKind::Enum => "enum",
            TypeKind::Delegate => "delegate",
        }
    }
}

/// A type declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Simple name, without namespace or type parameters.
    pub name: String,
    /// Containing namespace. Absent or empty for the global namespace.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Declaration kind.
    pub kind: TypeKind,
    /// Declared accessibility. Top-level C# types default to `internal`.
    #[serde(default = "default_type_accessibility")]
    pub accessibility: Accessibility,
    /// `static` modifier.
    #[serde(default)]
    pub is_static: bool,
    /// Base class, qualified.
    #[serde(default)]
    pub base_type: Option<String>,
    /// Directly implemented or extended interfaces, qualified, as written.
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// Generic type parameter names.
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Members in declaration order.
    #[serde(default)]
    pub members: Vec<MemberDecl>,
    /// Declaring source locations (several for partial declarations, none
    /// for metadata types).
    #[serde(default)]
    pub locations: Vec<SourceLocation>,
    /// Attributes applied to the declaration.
    #[serde(default)]
    pub attributes: Vec<AttributeDecl>,
}

fn default_type_accessibility() -> Accessibility {
    Accessibility::Internal
}

impl TypeDecl {
    /// Namespace, or `None` for the global namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.trim().is_empty())
    }

    /// Namespace-qualified name without type parameters.
    pub fn full_name(&self) -> String {
        match self.namespace() {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Qualified name including type parameters, as it is referenced in
    /// a base list.
    pub fn display_name(&self) -> String {
        if self.type_parameters.is_empty() {
            self.full_name()
        } else {
            format!("{}<{}>", self.full_name(), self.type_parameters.join(", "))
        }
    }
}

/// A member declared on a type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberDecl {
    /// Property declaration.
    Property(PropertyDecl),
    /// Method declaration, including compiler-synthesized accessors.
    Method(MethodDecl),
}

/// A property declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDecl {
    /// Property name.
    pub name: String,
    /// Property type, verbatim.
    #[serde(rename = "type")]
    pub ty: String,
    /// Declared accessibility. Interface members default to `public`.
    #[serde(default)]
    pub accessibility: Accessibility,
    /// Whether a `get` accessor is declared.
    #[serde(default)]
    pub has_getter: bool,
    /// Whether a `set` accessor is declared.
    #[serde(default)]
    pub has_setter: bool,
}

/// Method flavour as reported by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    /// Regular method.
    #[default]
    Ordinary,
    /// Synthesized `get_X` accessor of a property.
    PropertyGet,
    /// Synthesized `set_X` accessor of a property.
    PropertySet,
}

impl MethodKind {
    /// Whether this method only exists as a property accessor.
    pub fn is_property_accessor(self) -> bool {
        matches!(self, MethodKind::PropertyGet | MethodKind::PropertySet)
    }
}

/// A method declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDecl {
    /// Method name.
    pub name: String,
    /// Return type, verbatim.
    #[serde(default = "default_return_type")]
    pub return_type: String,
    /// Declared accessibility. Interface members default to `public`.
    #[serde(default)]
    pub accessibility: Accessibility,
    /// Generic type parameter names.
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Parameters in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    /// Ordinary method or property accessor.
    #[serde(default)]
    pub method_kind: MethodKind,
}

fn default_return_type() -> String {
    "void".to_string()
}

/// A method parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDecl {
    /// Parameter name.
    pub name: String,
    /// Parameter type, verbatim.
    #[serde(rename = "type")]
    pub ty: String,
    /// Passing mode.
    #[serde(default)]
    pub mode: PassingMode,
}

/// An attribute application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDecl {
    /// Attribute name as written or resolved, e.g. `InheritsToNullObj`.
    pub name: String,
    /// Constructor arguments.
    #[serde(default)]
    pub arguments: Vec<AttributeArgument>,
    /// Location of the attribute.
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

/// A constructor argument of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeArgument {
    /// Constant value, e.g. an enum's underlying integer.
    Int(i64),
    /// Source expression, e.g. `NullObjLog.DebugLog | NullObjLog.ThrowException`.
    Text(String),
    /// Any other constant (bool, float, null, array). Kept so that one odd
    /// argument does not reject the whole model.
    Other(serde_json::Value),
}

/// Lookup tables over a [`Compilation`].
#[derive(Debug)]
pub struct TypeIndex<'a> {
    by_name: HashMap<String, &'a TypeDecl>,
    by_generic_name: HashMap<String, &'a TypeDecl>,
    units: HashMap<&'a str, &'a CompilationUnit>,
}

impl<'a> TypeIndex<'a> {
    /// Index every type and unit of `compilation`. The first declaration of
    /// a name wins.
    pub fn new(compilation: &'a Compilation) -> Self {
        let mut by_name = HashMap::new();
        let mut by_generic_name = HashMap::new();
        for decl in &compilation.types {
            by_name.entry(decl.full_name()).or_insert(decl);
            by_generic_name
                .entry(generic_key(&decl.full_name(), decl.type_parameters.len()))
                .or_insert(decl);
        }
        let units = compilation
            .units
            .iter()
            .map(|unit| (unit.path.as_str(), unit))
            .collect();
        Self {
            by_name,
            by_generic_name,
            units,
        }
    }

    /// Resolve a type reference such as `Demo.IRepo<int>` or
    /// `global::Demo.IFoo` to its declaration.
    pub fn resolve(&self, reference: &str) -> Option<&'a TypeDecl> {
        let reference = normalize_reference(reference);
        if let Some(decl) = self.by_name.get(reference).copied() {
            return Some(decl);
        }
        let (base, arity) = split_generic(reference);
        if arity == 0 {
            return None;
        }
        self.by_generic_name.get(&generic_key(base, arity)).copied()
    }

    /// Look up a source unit by path.
    pub fn unit(&self, path: &str) -> Option<&'a CompilationUnit> {
        self.units.get(path).copied()
    }
}

/// Strip surrounding whitespace and a `global::` alias from a type reference.
pub fn normalize_reference(reference: &str) -> &str {
    let reference = reference.trim();
    reference.strip_prefix("global::").unwrap_or(reference)
}

fn generic_key(base: &str, arity: usize) -> String {
    format!("{base}`{arity}")
}

/// Split `Name<A, B<C>>` into `("Name", 2)`. Non-generic names have arity 0.
fn split_generic(reference: &str) -> (&str, usize) {
    let Some(open) = reference.find('<') else {
        return (reference, 0);
    };
    let mut depth = 0usize;
    let mut arity = 1;
    for ch in reference[open..].chars() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 1 => arity += 1,
            _ => {}
        }
    }
    (&reference[..open], arity)
}
