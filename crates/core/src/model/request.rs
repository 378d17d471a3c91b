//! Generation requests handed to the pipeline.

use std::fmt;

use super::decl::{AttributeArgument, SourceLocation};

/// The two marker annotations that make a declaration eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Placed on a class: stub every interface the class implements.
    InheritsToNullObj,
    /// Placed on an interface: stub the interface itself.
    InterfaceToNullObj,
}

impl Marker {
    /// Both markers, in discovery order.
    pub const ALL: [Marker; 2] = [Marker::InheritsToNullObj, Marker::InterfaceToNullObj];

    /// Attribute name without the `Attribute` suffix.
    pub fn attribute_name(self) -> &'static str {
        match self {
            Marker::InheritsToNullObj => "InheritsToNullObj",
            Marker::InterfaceToNullObj => "InterfaceToNullObj",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute_name())
    }
}

/// One annotated declaration to generate a companion for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullObjRequest {
    /// Qualified name of the annotated type.
    pub target: String,
    /// Marker found on the declaration.
    pub marker: Marker,
    /// Raw policy argument, if the annotation passed one.
    pub policy: Option<AttributeArgument>,
    /// Location of the annotation.
    pub location: Option<SourceLocation>,
}

impl NullObjRequest {
    /// Request with no policy argument and no location.
    pub fn new(target: impl Into<String>, marker: Marker) -> Self {
        Self {
            target: target.into(),
            marker,
            policy: None,
            location: None,
        }
    }

    /// Attach a raw policy argument.
    pub fn with_policy(mut self, policy: AttributeArgument) -> Self {
        self.policy = Some(policy);
        self
    }
}
