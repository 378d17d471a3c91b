//! Marker attribute declarations injected into the consuming project.

use crate::model::Marker;
use crate::policy::SideEffect;
use crate::synth::AUTO_GENERATED_HEADER;
use crate::writer::CodeWriter;

/// Namespace the marker attributes live in.
pub const ATTRIBUTE_NAMESPACE: &str = "NullObjectGenerator";

/// File name the attribute source is registered under.
pub const ATTRIBUTE_FILE_NAME: &str = "NullObjAttribute.cs";

/// Name of the flags enum carrying the side-effect policy.
pub const POLICY_ENUM_NAME: &str = "NullObjLog";

/// C# source declaring both marker attributes and the policy flags enum.
pub fn marker_source(indent_width: usize) -> String {
    let mut writer = CodeWriter::with_indent_width(indent_width);
    writer.append_line(AUTO_GENERATED_HEADER, false);
    writer.append_line("using System;", false);
    writer.append_line("", false);

    let namespace = format!("namespace {ATTRIBUTE_NAMESPACE}");
    {
        let mut scope = writer.block_scope(Some(namespace.as_str()));
        for (i, marker) in Marker::ALL.into_iter().enumerate() {
            if i > 0 {
                scope.append_line("", false);
            }
            write_marker(&mut scope, marker);
        }
        scope.append_line("", false);
        write_policy_enum(&mut scope);
    }
    writer.take()
}

fn write_marker(writer: &mut CodeWriter, marker: Marker) {
    let target = match marker {
        Marker::InheritsToNullObj => "Class",
        Marker::InterfaceToNullObj => "Interface",
    };
    let class_name = format!("{}Attribute", marker.attribute_name());

    writer.append_line(
        &format!("[AttributeUsage(AttributeTargets.{target}, Inherited = false, AllowMultiple = false)]"),
        true,
    );
    let header = format!("internal sealed class {class_name} : Attribute");
    let mut class = writer.block_scope(Some(header.as_str()));
    class.append_line(&format!("public {POLICY_ENUM_NAME} LogType {{ get; }}"), true);
    class.append_line("", false);
    let constructor =
        format!("public {class_name}({POLICY_ENUM_NAME} logType = {POLICY_ENUM_NAME}.None)");
    let mut body = class.block_scope(Some(constructor.as_str()));
    body.append_line("LogType = logType;", true);
}

fn write_policy_enum(writer: &mut CodeWriter) {
    writer.append_line("[Flags]", true);
    let header = format!("internal enum {POLICY_ENUM_NAME}");
    let mut body = writer.block_scope(Some(header.as_str()));
    body.append_line("None = 0,", true);
    for effect in SideEffect::EMISSION_ORDER {
        body.append_line(
            &format!("{} = {},", effect.marker_name(), effect.flag().bits()),
            true,
        );
    }
}
