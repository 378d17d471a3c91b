//! Data model: the host's compilation, requests, and the extracted per-target
//! member model.

pub mod decl;
pub mod member;
pub mod meta;
pub mod request;

pub use decl::{
    AttributeArgument, AttributeDecl, Compilation, CompilationUnit, MemberDecl, MethodDecl,
    MethodKind, ParameterDecl, PropertyDecl, SourceLocation, TypeDecl, TypeIndex, TypeKind,
};
pub use member::{
    Accessibility, MemberDescriptor, MemberKey, MemberKind, MethodDescriptor, ParameterDescriptor,
    PassingMode, PropertyDescriptor,
};
pub use meta::{TargetKind, TypeMeta};
pub use request::{Marker, NullObjRequest};
