//! Null object companion generation for C# classes and interfaces.
//!
//! Given a compilation model and the declarations annotated with
//! `[InheritsToNullObj]` or `[InterfaceToNullObj]`, the generator produces a
//! companion type per declaration that implements the same interfaces with
//! inert stub members.
//!
//! The pipeline for one declaration is:
//!
//! 1. [`extract::extract`] builds a [`model::TypeMeta`] from the interface
//!    closure of the target.
//! 2. [`synth::synthesize`] renders it through a [`writer::CodeWriter`].
//!
//! [`pipeline::Generator`] drives both over every request and reports
//! failures through a [`diagnostics::DiagnosticSink`].

pub mod attributes;
pub mod config;
pub mod diagnostics;
pub mod discover;
pub mod error;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod policy;
pub mod synth;
pub mod writer;

pub use config::{ConfigError, GeneratorOptions};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, Severity};
pub use error::{GenerateError, GenerateResult};
pub use model::{Compilation, NullObjRequest};
pub use pipeline::{GeneratedSource, Generator, generate};
pub use policy::SideEffectPolicy;
pub use writer::CodeWriter;
