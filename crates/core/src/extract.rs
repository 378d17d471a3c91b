//! Member model extraction.
//!
//! Turns one [`NullObjRequest`] into a [`TypeMeta`]:
//! - resolves and validates the target declaration
//! - decodes the side-effect policy argument
//! - walks the interface closure depth first
//! - collects and deduplicates the members to stub
//! - unions the imports of every contributing source unit

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, trace};

use crate::error::{GenerateError, GenerateResult};
use crate::model::decl::normalize_reference;
use crate::model::{
    AttributeArgument, MemberDecl, MemberDescriptor, MemberKey, MethodDescriptor, Marker, NullObjRequest,
    ParameterDescriptor, PropertyDescriptor, SourceLocation, TargetKind, TypeDecl, TypeIndex,
    TypeKind, TypeMeta,
};
use crate::policy::SideEffectPolicy;

/// Build the member model for `request`.
pub fn extract(index: &TypeIndex<'_>, request: &NullObjRequest) -> GenerateResult<TypeMeta> {
    let location = request.location.as_ref();
    let decl = index
        .resolve(&request.target)
        .ok_or_else(|| GenerateError::TargetUnresolved {
            name: request.target.clone(),
            location: location.cloned(),
        })?;

    let kind = check_extensible(decl, request.marker, location)?;

    if decl.name.trim().is_empty() {
        return Err(GenerateError::RequiredNameMissing {
            context: format!("declaration of '{}'", request.target),
            location: location.cloned(),
        });
    }

    let policy = decode_policy(request.policy.as_ref(), location)?;
    let closure = interface_closure(index, decl, kind, location)?;
    let members = collect_members(&closure);
    let imports = collect_imports(index, &closure);

    debug!(
        target = %decl.full_name(),
        interfaces = closure.len(),
        members = members.len(),
        imports = imports.len(),
        %policy,
        "extracted member model"
    );

    Ok(TypeMeta {
        qualified_name: decl.full_name(),
        simple_name: decl.name.clone(),
        namespace: decl.namespace().map(str::to_string),
        accessibility: decl.accessibility,
        kind,
        type_parameters: decl.type_parameters.clone(),
        policy,
        interfaces: closure.iter().map(|entry| entry.reference.clone()).collect(),
        members,
        imports,
        location: location.cloned(),
    })
}

fn check_extensible(
    decl: &TypeDecl,
    marker: Marker,
    location: Option<&SourceLocation>,
) -> GenerateResult<TargetKind> {
    let not_extensible = |reason: String| GenerateError::NotExtensible {
        name: decl.full_name(),
        reason,
        location: location.cloned(),
    };
    match (marker, decl.kind) {
        (Marker::InheritsToNullObj, TypeKind::Class) if decl.is_static => Err(not_extensible(
            "static classes cannot implement interfaces".to_string(),
        )),
        (Marker::InheritsToNullObj, TypeKind::Class) => Ok(TargetKind::Class),
        (Marker::InterfaceToNullObj, TypeKind::Interface) => Ok(TargetKind::Interface),
        (Marker::InheritsToNullObj, other) => Err(not_extensible(format!(
            "{marker} expects a class, found {}",
            other.keyword()
        ))),
        (Marker::InterfaceToNullObj, other) => Err(not_extensible(format!(
            "{marker} expects an interface, found {}",
            other.keyword()
        ))),
    }
}

/// Decode the raw policy argument. No argument means no side effects.
pub fn decode_policy(
    argument: Option<&AttributeArgument>,
    location: Option<&SourceLocation>,
) -> GenerateResult<SideEffectPolicy> {
    let malformed = |detail: String| GenerateError::Unexpected {
        detail,
        location: location.cloned(),
    };
    match argument {
        None => Ok(SideEffectPolicy::NONE),
        Some(AttributeArgument::Int(bits)) => SideEffectPolicy::from_bits(*bits)
            .ok_or_else(|| malformed(format!("malformed side-effect policy value {bits}"))),
        Some(AttributeArgument::Text(expr)) => expr
            .parse()
            .map_err(|err| malformed(format!("malformed side-effect policy: {err}"))),
        Some(AttributeArgument::Other(value)) => Err(malformed(format!(
            "unsupported side-effect policy argument {value}"
        ))),
    }
}

/// One interface of the closure: how it is referenced, and its declaration.
#[derive(Debug)]
struct ClosureEntry<'a> {
    reference: String,
    decl: &'a TypeDecl,
}

fn interface_closure<'a>(
    index: &TypeIndex<'a>,
    target: &'a TypeDecl,
    kind: TargetKind,
    location: Option<&SourceLocation>,
) -> GenerateResult<Vec<ClosureEntry<'a>>> {
    let mut closure = Vec::new();
    let mut seen = HashSet::new();

    match kind {
        TargetKind::Class => {
            let mut visited_classes = HashSet::new();
            let mut current = Some(target);
            while let Some(class) = current {
                if !visited_classes.insert(class.full_name()) {
                    break;
                }
                for reference in &class.interfaces {
                    visit_interface(index, reference, &mut seen, &mut closure, location)?;
                }
                current = class.base_type.as_deref().and_then(|base| {
                    let resolved = index.resolve(base);
                    if resolved.is_none() {
                        debug!(base, "base class not in compilation model; skipping");
                    }
                    resolved
                });
            }
        }
        TargetKind::Interface => {
            let own_reference = target.display_name();
            seen.insert(own_reference.clone());
            for reference in &target.interfaces {
                visit_interface(index, reference, &mut seen, &mut closure, location)?;
            }
            closure.push(ClosureEntry {
                reference: own_reference,
                decl: target,
            });
        }
    }

    Ok(closure)
}

fn visit_interface<'a>(
    index: &TypeIndex<'a>,
    reference: &str,
    seen: &mut HashSet<String>,
    closure: &mut Vec<ClosureEntry<'a>>,
    location: Option<&SourceLocation>,
) -> GenerateResult<()> {
    let reference = normalize_reference(reference);
    if !seen.insert(reference.to_string()) {
        return Ok(());
    }
    let decl = index
        .resolve(reference)
        .ok_or_else(|| GenerateError::TargetUnresolved {
            name: reference.to_string(),
            location: location.cloned(),
        })?;
    closure.push(ClosureEntry {
        reference: reference.to_string(),
        decl,
    });
    for parent in &decl.interfaces {
        visit_interface(index, parent, seen, closure, location)?;
    }
    Ok(())
}

fn collect_members(closure: &[ClosureEntry<'_>]) -> Vec<MemberDescriptor> {
    let mut members: Vec<MemberDescriptor> = Vec::new();
    let mut seen: HashMap<MemberKey, usize> = HashMap::new();

    for entry in closure {
        let declared_in = entry.decl.full_name();
        for member in &entry.decl.members {
            let descriptor = match member {
                MemberDecl::Property(property) => MemberDescriptor::Property(PropertyDescriptor {
                    name: property.name.clone(),
                    accessibility: property.accessibility,
                    ty: property.ty.clone(),
                    has_getter: property.has_getter,
                    has_setter: property.has_setter,
                    declared_in: declared_in.clone(),
                }),
                MemberDecl::Method(method) if method.method_kind.is_property_accessor() => {
                    trace!(interface = %declared_in, method = %method.name, "skipping property accessor");
                    continue;
                }
                MemberDecl::Method(method) => MemberDescriptor::Method(MethodDescriptor {
                    name: method.name.clone(),
                    accessibility: method.accessibility,
                    return_type: method.return_type.clone(),
                    type_parameters: method.type_parameters.clone(),
                    parameters: method
                        .parameters
                        .iter()
                        .map(|param| ParameterDescriptor {
                            ty: param.ty.clone(),
                            name: param.name.clone(),
                            mode: param.mode,
                        })
                        .collect(),
                    declared_in: declared_in.clone(),
                }),
            };
            let key = descriptor.key();
            match seen.get(&key).copied() {
                None => {
                    seen.insert(key, members.len());
                    members.push(descriptor);
                }
                Some(first) => {
                    // A property re-declared with more accessors widens the first one.
                    if let (
                        MemberDescriptor::Property(kept),
                        MemberDescriptor::Property(duplicate),
                    ) = (&mut members[first], &descriptor)
                    {
                        kept.has_getter |= duplicate.has_getter;
                        kept.has_setter |= duplicate.has_setter;
                    }
                    trace!(interface = %declared_in, member = %descriptor.name(), "dropping duplicate member");
                }
            }
        }
    }

    members
}

fn collect_imports(index: &TypeIndex<'_>, closure: &[ClosureEntry<'_>]) -> BTreeSet<String> {
    let mut imports = BTreeSet::new();
    for entry in closure {
        for location in &entry.decl.locations {
            match index.unit(&location.path) {
                Some(unit) => imports.extend(
                    unit.usings
                        .iter()
                        .map(|using| using.trim().to_string())
                        .filter(|using| !using.is_empty()),
                ),
                None => debug!(path = %location.path, "declaring unit not in compilation model"),
            }
        }
    }
    imports
}
