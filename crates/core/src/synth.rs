//! Stub synthesis: renders a [`TypeMeta`] as the source of its null object
//! companion.

use tracing::trace;

use crate::config::GeneratorOptions;
use crate::error::{GenerateError, GenerateResult};
use crate::model::decl::normalize_reference;
use crate::model::{MethodDescriptor, PassingMode, PropertyDescriptor, TypeMeta};
use crate::policy::{SideEffect, SideEffectPolicy};
use crate::writer::CodeWriter;

/// First line of every generated file.
pub const AUTO_GENERATED_HEADER: &str = "// <auto-generated/>";

/// Render the companion type for `meta`.
///
/// The writer is cleared first and left empty afterwards. On error nothing
/// written so far is returned.
pub fn synthesize(
    meta: &TypeMeta,
    policy: SideEffectPolicy,
    options: &GeneratorOptions,
    writer: &mut CodeWriter,
) -> GenerateResult<String> {
    writer.clear();
    let result = write_file(meta, policy, options, writer);
    let text = writer.take();
    match result {
        Ok(()) => Ok(text),
        Err(err) => Err(err.or_location(meta.location.as_ref())),
    }
}

fn write_file(
    meta: &TypeMeta,
    policy: SideEffectPolicy,
    options: &GeneratorOptions,
    writer: &mut CodeWriter,
) -> GenerateResult<()> {
    if meta.simple_name.trim().is_empty() {
        return Err(GenerateError::RequiredNameMissing {
            context: format!("companion type for '{}'", meta.qualified_name),
            location: None,
        });
    }

    writer.append_line(AUTO_GENERATED_HEADER, false);
    for import in &meta.imports {
        writer.append_line(&format!("using {import};"), false);
    }
    writer.append_line("", false);

    match meta.namespace.as_deref() {
        Some(namespace) => {
            let line = format!("namespace {namespace}");
            let mut scope = writer.block_scope(Some(line.as_str()));
            write_class(meta, policy, options, &mut scope)
        }
        None => write_class(meta, policy, options, writer),
    }
}

fn write_class(
    meta: &TypeMeta,
    policy: SideEffectPolicy,
    options: &GeneratorOptions,
    writer: &mut CodeWriter,
) -> GenerateResult<()> {
    let accessibility = meta.accessibility.keyword();
    let companion = options.companion_name(&meta.simple_name);

    let mut header = format!("{accessibility} class {companion}");
    header.push_str(&type_parameter_list(&meta.type_parameters));
    if !meta.interfaces.is_empty() {
        header.push_str(" : ");
        header.push_str(&meta.interfaces.join(", "));
    }

    writer.append_line(
        &format!("// This class is generated by {}.", options.generator_name),
        true,
    );
    let mut class = writer.block_scope(Some(header.as_str()));
    let constructor = format!("{accessibility} {companion}()");
    drop(class.block_scope(Some(constructor.as_str())));

    let stubs = StubContext {
        owner: &meta.simple_name,
        policy,
        options,
    };
    for property in meta.properties() {
        class.append_line("", false);
        stubs.write_property(&mut class, property)?;
    }
    for method in meta.methods() {
        class.append_line("", false);
        stubs.write_method(&mut class, method)?;
    }

    trace!(
        companion = %companion,
        members = meta.members.len(),
        "synthesized companion"
    );
    Ok(())
}

/// Per-target settings shared by every stub body.
#[derive(Debug, Clone, Copy)]
struct StubContext<'a> {
    owner: &'a str,
    policy: SideEffectPolicy,
    options: &'a GeneratorOptions,
}

impl StubContext<'_> {
    fn write_property(
        &self,
        writer: &mut CodeWriter,
        property: &PropertyDescriptor,
    ) -> GenerateResult<()> {
        if property.name.trim().is_empty() {
            return Err(GenerateError::RequiredNameMissing {
                context: format!("property of '{}'", self.owner),
                location: None,
            });
        }
        if property.ty.trim().is_empty() {
            return Err(GenerateError::unexpected(format!(
                "property '{}.{}' has no type",
                self.owner, property.name
            )));
        }
        if !property.has_getter && !property.has_setter {
            return Err(GenerateError::unexpected(format!(
                "property '{}.{}' declares neither a getter nor a setter",
                self.owner, property.name
            )));
        }

        let declaration = format!(
            "{} {} {}",
            property.accessibility.keyword(),
            property.ty,
            property.name
        );
        let mut block = writer.block_scope(Some(declaration.as_str()));
        if property.has_getter {
            let mut getter = block.block_scope(Some("get"));
            self.write_side_effects(
                &mut getter,
                &format!(
                    "{}.{} was read on a null object; returning default.",
                    self.owner, property.name
                ),
            );
            getter.append_line("return default;", true);
        }
        if property.has_setter {
            let mut setter = block.block_scope(Some("set"));
            self.write_side_effects(
                &mut setter,
                &format!(
                    "{}.{} was assigned on a null object; ignoring value.",
                    self.owner, property.name
                ),
            );
        }
        Ok(())
    }

    fn write_method(&self, writer: &mut CodeWriter, method: &MethodDescriptor) -> GenerateResult<()> {
        if method.name.trim().is_empty() {
            return Err(GenerateError::RequiredNameMissing {
                context: format!("method of '{}'", self.owner),
                location: None,
            });
        }
        if method.return_type.trim().is_empty() {
            return Err(GenerateError::unexpected(format!(
                "method '{}.{}' has no return type",
                self.owner, method.name
            )));
        }

        let mut parameters = Vec::with_capacity(method.parameters.len());
        for (position, param) in method.parameters.iter().enumerate() {
            if param.name.trim().is_empty() {
                return Err(GenerateError::RequiredNameMissing {
                    context: format!(
                        "parameter {} of '{}.{}'",
                        position + 1,
                        self.owner,
                        method.name
                    ),
                    location: None,
                });
            }
            if param.ty.trim().is_empty() {
                return Err(GenerateError::unexpected(format!(
                    "parameter '{}' of '{}.{}' has no type",
                    param.name, self.owner, method.name
                )));
            }
            parameters.push(format!("{}{} {}", param.mode.prefix(), param.ty, param.name));
        }

        let signature = format!(
            "{} {} {}{}({})",
            method.accessibility.keyword(),
            method.return_type,
            method.name,
            type_parameter_list(&method.type_parameters),
            parameters.join(", ")
        );
        let mut body = writer.block_scope(Some(signature.as_str()));
        for param in method
            .parameters
            .iter()
            .filter(|param| param.mode == PassingMode::Out)
        {
            body.append_line(&format!("{} = default;", param.name), true);
        }
        self.write_side_effects(
            &mut body,
            &format!(
                "{}.{} was called on a null object; doing nothing.",
                self.owner, method.name
            ),
        );
        if let Some(completed) = self.options.completed_value(&method.return_type) {
            body.append_line(&format!("return {completed};"), true);
        } else if !is_void(&method.return_type) {
            body.append_line("return default;", true);
        }
        Ok(())
    }

    /// One statement per enabled side effect, in emission order.
    fn write_side_effects(&self, writer: &mut CodeWriter, message: &str) {
        let literal = verbatim_string(message);
        for effect in self.policy.actions() {
            let statement = match effect {
                SideEffect::Log => format!("{}({literal});", self.options.log_call),
                SideEffect::LogError => format!("{}({literal});", self.options.log_error_call),
                SideEffect::LogWarning => format!("{}({literal});", self.options.log_warning_call),
                SideEffect::Throw => {
                    format!("throw new {}({literal});", self.options.exception_type)
                }
            };
            writer.append_line(&statement, true);
        }
    }
}

fn type_parameter_list(type_parameters: &[String]) -> String {
    if type_parameters.is_empty() {
        String::new()
    } else {
        format!("<{}>", type_parameters.join(", "))
    }
}

fn is_void(return_type: &str) -> bool {
    matches!(normalize_reference(return_type), "void" | "System.Void")
}

/// C# verbatim string literal for `text`.
pub fn verbatim_string(text: &str) -> String {
    format!("@\"{}\"", text.replace('"', "\"\""))
}
