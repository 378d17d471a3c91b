//! Normalized member descriptors collected from an interface closure.

use serde::{Deserialize, Serialize};

/// Declared accessibility of a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    /// `public`
    #[default]
    Public,
    /// `internal`
    Internal,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// `protected internal`
    ProtectedInternal,
    /// `private protected`
    PrivateProtected,
}

impl Accessibility {
    /// C# keyword form.
    pub fn keyword(self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Internal => "internal",
            Accessibility::Protected => "protected",
            Accessibility::Private => "private",
            Accessibility::ProtectedInternal => "protected internal",
            Accessibility::PrivateProtected => "private protected",
        }
    }
}

/// How an argument is passed to a method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassingMode {
    /// By value, no modifier.
    #[default]
    Value,
    /// `ref`
    Ref,
    /// `out`
    Out,
    /// `in`
    In,
}

impl PassingMode {
    /// Modifier written before the parameter type, including the trailing
    /// space. Empty for by-value parameters.
    pub fn prefix(self) -> &'static str {
        match self {
            PassingMode::Value => "",
            PassingMode::Ref => "ref ",
            PassingMode::Out => "out ",
            PassingMode::In => "in ",
        }
    }
}

/// Member kind, part of the deduplication identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// Property with get and/or set accessors.
    Property,
    /// Ordinary method.
    Method,
}

/// Deduplication identity: kind, name and ordered parameter types.
///
/// Return types are deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberKey {
    /// Property or method.
    pub kind: MemberKind,
    /// Member name.
    pub name: String,
    /// Parameter types in declaration order, including passing modifiers.
    pub parameter_types: Vec<String>,
}

/// One method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    /// Parameter type, verbatim.
    pub ty: String,
    /// Parameter name.
    pub name: String,
    /// Passing mode.
    pub mode: PassingMode,
}

/// A property to stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Property name.
    pub name: String,
    /// Declared accessibility.
    pub accessibility: Accessibility,
    /// Property type, verbatim.
    pub ty: String,
    /// Whether the source declares a getter.
    pub has_getter: bool,
    /// Whether the source declares a setter.
    pub has_setter: bool,
    /// Interface the property was first collected from.
    pub declared_in: String,
}

/// A method to stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Method name.
    pub name: String,
    /// Declared accessibility.
    pub accessibility: Accessibility,
    /// Return type, verbatim.
    pub return_type: String,
    /// Generic type parameter names, passed through.
    pub type_parameters: Vec<String>,
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterDescriptor>,
    /// Interface the method was first collected from.
    pub declared_in: String,
}

/// A member the companion type must implement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberDescriptor {
    /// Property.
    Property(PropertyDescriptor),
    /// Method.
    Method(MethodDescriptor),
}

impl MemberDescriptor {
    /// Member name.
    pub fn name(&self) -> &str {
        match self {
            MemberDescriptor::Property(property) => &property.name,
            MemberDescriptor::Method(method) => &method.name,
        }
    }

    /// Interface the member was first collected from.
    pub fn declared_in(&self) -> &str {
        match self {
            MemberDescriptor::Property(property) => &property.declared_in,
            MemberDescriptor::Method(method) => &method.declared_in,
        }
    }

    /// Deduplication identity.
    pub fn key(&self) -> MemberKey {
        match self {
            MemberDescriptor::Property(property) => MemberKey {
                kind: MemberKind::Property,
                name: property.name.clone(),
                parameter_types: Vec::new(),
            },
            MemberDescriptor::Method(method) => MemberKey {
                kind: MemberKind::Method,
                name: method.name.clone(),
                parameter_types: method
                    .parameters
                    .iter()
                    .map(|param| format!("{}{}", param.mode.prefix(), param.ty))
                    .collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, return_type: &str, params: &[(&str, PassingMode)]) -> MemberDescriptor {
        MemberDescriptor::Method(MethodDescriptor {
            name: name.into(),
            accessibility: Accessibility::Public,
            return_type: return_type.into(),
            type_parameters: vec![],
            parameters: params
                .iter()
                .enumerate()
                .map(|(i, (ty, mode))| ParameterDescriptor {
                    ty: (*ty).into(),
                    name: format!("p{i}"),
                    mode: *mode,
                })
                .collect(),
            declared_in: "Demo.IA".into(),
        })
    }

    #[test]
    fn test_key_ignores_return_type_and_parameter_names() {
        let a = method("Foo", "int", &[("int", PassingMode::Value)]);
        let b = method("Foo", "string", &[("int", PassingMode::Value)]);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_key_distinguishes_overloads() {
        let a = method("Foo", "void", &[("int", PassingMode::Value)]);
        let b = method("Foo", "void", &[("float", PassingMode::Value)]);
        let c = method("Foo", "void", &[]);
        assert_ne!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn test_key_distinguishes_passing_modes() {
        let a = method("Foo", "void", &[("int", PassingMode::Value)]);
        let b = method("Foo", "void", &[("int", PassingMode::Ref)]);
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_property_and_method_with_same_name_differ() {
        let property = MemberDescriptor::Property(PropertyDescriptor {
            name: "Foo".into(),
            accessibility: Accessibility::Public,
            ty: "int".into(),
            has_getter: true,
            has_setter: false,
            declared_in: "Demo.IA".into(),
        });
        assert_ne!(property.key(), method("Foo", "int", &[]).key());
        assert_eq!(property.name(), "Foo");
        assert_eq!(property.declared_in(), "Demo.IA");
    }

    #[test]
    fn test_keywords() {
        assert_eq!(Accessibility::ProtectedInternal.keyword(), "protected internal");
        assert_eq!(PassingMode::Out.prefix(), "out ");
        assert_eq!(PassingMode::Value.prefix(), "");
    }
}
