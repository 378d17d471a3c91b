//! Driving pipeline: extract then synthesize, once per request.
//!
//! Requests are independent. They are processed in parallel, one
//! [`CodeWriter`] per worker, and results come back in request order. A
//! failing request produces a diagnostic and no output; the others are
//! unaffected.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::GeneratorOptions;
use crate::diagnostics::DiagnosticSink;
use crate::discover::discover;
use crate::error::{GenerateError, GenerateResult};
use crate::extract::extract;
use crate::model::{Compilation, NullObjRequest, TypeIndex};
use crate::synth::synthesize;
use crate::writer::CodeWriter;

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    /// File name the text is registered under, e.g. `FooAsNullObj.g.cs`.
    pub file_name: String,
    /// Full file contents.
    pub text: String,
}

/// Companion generator configured with a set of options.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: GeneratorOptions,
}

impl Generator {
    /// Create a generator.
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generate the companion for a single request.
    pub fn generate_one(
        &self,
        index: &TypeIndex<'_>,
        request: &NullObjRequest,
        writer: &mut CodeWriter,
    ) -> GenerateResult<GeneratedSource> {
        let meta = extract(index, request)?;
        let text = synthesize(&meta, meta.policy, &self.options, writer)?;
        Ok(GeneratedSource {
            file_name: self.options.file_name(&meta.simple_name),
            text,
        })
    }

    /// Generate companions for `requests`. Failures are reported to `sink`
    /// and leave no output behind.
    pub fn run(
        &self,
        compilation: &Compilation,
        requests: &[NullObjRequest],
        sink: &dyn DiagnosticSink,
    ) -> Vec<GeneratedSource> {
        let index = TypeIndex::new(compilation);
        let indent_width = self.options.indent_width;

        let results: Vec<GenerateResult<GeneratedSource>> = requests
            .par_iter()
            .map_init(
                || CodeWriter::with_indent_width(indent_width),
                |writer, request| self.generate_one(&index, request, writer),
            )
            .collect();

        let mut sources = Vec::with_capacity(results.len());
        let mut owners: HashMap<String, &str> = HashMap::new();
        let mut failed = 0usize;

        for (request, result) in requests.iter().zip(results) {
            let result = result.and_then(|source| {
                if let Some(owner) = owners.get(&source.file_name) {
                    return Err(GenerateError::unexpected(format!(
                        "generated file name '{}' is already used by '{owner}'",
                        source.file_name
                    )));
                }
                Ok(source)
            });
            match result {
                Ok(source) => {
                    debug!(target = %request.target, file = %source.file_name, "generated companion");
                    owners.insert(source.file_name.clone(), &request.target);
                    sources.push(source);
                }
                Err(err) => {
                    failed += 1;
                    let err = err.or_location(request.location.as_ref());
                    warn!(target = %request.target, error = %err, "skipping null object target");
                    sink.report(err.to_diagnostic());
                }
            }
        }

        info!(
            requested = requests.len(),
            generated = sources.len(),
            failed,
            "null object generation finished"
        );
        sources
    }
}

/// Discover every annotated declaration in `compilation` and generate its
/// companion.
pub fn generate(
    compilation: &Compilation,
    options: &GeneratorOptions,
    sink: &dyn DiagnosticSink,
) -> Vec<GeneratedSource> {
    let requests = discover(compilation);
    Generator::new(options.clone()).run(compilation, &requests, sink)
}
