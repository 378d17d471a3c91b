//! Marker discovery over a host [`Compilation`].

use tracing::debug;

use crate::attributes::ATTRIBUTE_NAMESPACE;
use crate::model::{AttributeDecl, Compilation, Marker, NullObjRequest, TypeDecl};

/// Requests for every annotated declaration: class markers first, then
/// interface markers, each in declaration order.
///
/// Only the marker is checked here. Whether the declaration can actually
/// carry a companion is decided during extraction, so that a misplaced
/// marker is reported rather than ignored.
pub fn discover(compilation: &Compilation) -> Vec<NullObjRequest> {
    let mut requests = Vec::new();
    for marker in Marker::ALL {
        for decl in &compilation.types {
            if let Some(attribute) = find_marker(decl, marker) {
                requests.push(NullObjRequest {
                    target: decl.full_name(),
                    marker,
                    policy: attribute.arguments.first().cloned(),
                    location: attribute
                        .location
                        .clone()
                        .or_else(|| decl.locations.first().cloned()),
                });
            }
        }
    }
    debug!(count = requests.len(), "discovered null object requests");
    requests
}

fn find_marker(decl: &TypeDecl, marker: Marker) -> Option<&AttributeDecl> {
    decl.attributes
        .iter()
        .find(|attribute| marker_name(&attribute.name) == marker.attribute_name())
}

/// Strip `global::`, the marker namespace and the `Attribute` suffix.
fn marker_name(name: &str) -> &str {
    let name = name.trim();
    let name = name.strip_prefix("global::").unwrap_or(name);
    let name = name
        .strip_prefix(ATTRIBUTE_NAMESPACE)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(name);
    name.strip_suffix("Attribute").unwrap_or(name)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttributeArgument;

    #[test]
    fn test_marker_name_normalization() {
        assert_eq!(marker_name("InheritsToNullObj"), "InheritsToNullObj");
        assert_eq!(marker_name("InheritsToNullObjAttribute"), "InheritsToNullObj");
        assert_eq!(
            marker_name("global::NullObjectGenerator.InterfaceToNullObjAttribute"),
            "InterfaceToNullObj"
        );
        assert_eq!(marker_name("Other.InheritsToNullObj"), "Other.InheritsToNullObj");
    }

    #[test]
    fn test_discover_orders_class_markers_first() {
        let compilation = Compilation::from_json(
            r#"{
                "types": [
                    { "name": "IFuga", "namespace": "SandBox", "kind": "interface",
                      "locations": [{ "path": "Class1.cs", "line": 25, "column": 5 }],
                      "attributes": [{ "name": "InterfaceToNullObj", "arguments": ["LogType.ThrowException"] }] },
                    { "name": "Class1", "namespace": "SandBox", "kind": "class",
                      "attributes": [{ "name": "NullObjectGenerator.InheritsToNullObjAttribute", "arguments": [8],
                                       "location": { "path": "Class1.cs", "line": 6, "column": 6 } }] },
                    { "name": "IHoge", "namespace": "SandBox", "kind": "interface",
                      "attributes": [{ "name": "Serializable" }] }
                ]
            }"#,
        )
        .unwrap();
        let requests = discover(&compilation);
        assert_eq!(requests.len(), 2);

        assert_eq!(requests[0].target, "SandBox.Class1");
        assert_eq!(requests[0].marker, Marker::InheritsToNullObj);
        assert_eq!(requests[0].policy, Some(AttributeArgument::Int(8)));
        assert_eq!(requests[0].location.as_ref().map(|l| l.line), Some(6));

        assert_eq!(requests[1].target, "SandBox.IFuga");
        assert_eq!(
            requests[1].policy,
            Some(AttributeArgument::Text("LogType.ThrowException".into()))
        );
        // Falls back to the declaration location.
        assert_eq!(requests[1].location.as_ref().map(|l| l.line), Some(25));
    }

    #[test]
    fn test_marker_on_wrong_kind_still_requested() {
        let compilation = Compilation::from_json(
            r#"{ "types": [{ "name": "Util", "kind": "class", "is_static": true,
                            "attributes": [{ "name": "InterfaceToNullObj" }] }] }"#,
        )
        .unwrap();
        let requests = discover(&compilation);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].marker, Marker::InterfaceToNullObj);
        assert_eq!(requests[0].policy, None);
    }
}
