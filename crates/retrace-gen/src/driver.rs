// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Composition of the generator: pick the API description, emit the support
//! block, run the traversal with the quirk hook.

use std::path::Path;

use retrace_spec::{Api, SpecError};
use tracing::info;

use crate::bootstrap::Bootstrap;
use crate::config::GeneratorConfig;
use crate::emit::CodeWriter;
use crate::retracer::{RetraceHook, Retracer};
use crate::specializer::QuirkRetracer;

/// Load the API description at `path`, or the embedded Direct3D 9 one.
pub fn load_api(path: Option<&Path>) -> Result<Api, SpecError> {
    match path {
        Some(path) => retrace_spec::load_path(path),
        None => retrace_spec::d3d9(),
    }
}

/// Generate the Direct3D 9 retracer for `api`.
pub fn generate(api: &Api, config: &GeneratorConfig) -> String {
    generate_with(api, config, QuirkRetracer::d3d9())
}

/// Generate a retracer for `api` specialised by `hook`.
///
/// The support block comes first; the replay functions and dispatch table
/// follow in declaration order.
pub fn generate_with<H: RetraceHook>(api: &Api, config: &GeneratorConfig, hook: H) -> String {
    let mut out = CodeWriter::new();

    let bootstrap = Bootstrap {
        headers: api
            .headers
            .iter()
            .chain(&config.extra_headers)
            .cloned()
            .collect(),
        window_class: config.window_class.clone(),
        max_window_extent: config.max_window_extent,
    };
    bootstrap.emit(&mut out);

    let retracer = Retracer::new(hook, config.table_name.as_str());
    let functions = retracer.retrace_api(api, &mut out);

    let code = out.finish();
    info!(
        api = %api.name,
        functions,
        bytes = code.len(),
        "generated retracer"
    );
    code
}
