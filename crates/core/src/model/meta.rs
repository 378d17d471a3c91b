//! Per-target member model produced by extraction.

use std::collections::BTreeSet;

use super::decl::SourceLocation;
use super::member::{Accessibility, MemberDescriptor, MethodDescriptor, PropertyDescriptor};
use crate::policy::SideEffectPolicy;

/// Whether the annotated target is a class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Class target; the companion implements its interfaces.
    Class,
    /// Interface target; the companion implements it directly.
    Interface,
}

/// Everything the synthesizer needs to render one companion type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMeta {
    /// Namespace-qualified name of the target.
    pub qualified_name: String,
    /// Target name without namespace.
    pub simple_name: String,
    /// Containing namespace, `None` for the global namespace.
    pub namespace: Option<String>,
    /// Accessibility of the target, reused for the companion.
    pub accessibility: Accessibility,
    /// Class or interface.
    pub kind: TargetKind,
    /// Generic type parameters of the target.
    pub type_parameters: Vec<String>,
    /// Side effects for every stub body.
    pub policy: SideEffectPolicy,
    /// Interfaces to implement, as referenced, in closure order.
    pub interfaces: Vec<String>,
    /// Deduplicated members to stub.
    pub members: Vec<MemberDescriptor>,
    /// Namespace imports required by the member signatures.
    pub imports: BTreeSet<String>,
    /// Annotation location, for diagnostics.
    pub location: Option<SourceLocation>,
}

impl TypeMeta {
    /// Properties in collection order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.members.iter().filter_map(|member| match member {
            MemberDescriptor::Property(property) => Some(property),
            MemberDescriptor::Method(_) => None,
        })
    }

    /// Methods in collection order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.members.iter().filter_map(|member| match member {
            MemberDescriptor::Method(method) => Some(method),
            MemberDescriptor::Property(_) => None,
        })
    }
}
