// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Retrace hook that wraps each canonical call with the quirks a rule table
//! assigns to it.

use retrace_spec::{Interface, Method};
use tracing::debug;

use crate::emit::CodeWriter;
use crate::quirks::{d3d9_rules, Quirk};
use crate::retracer::{emit_canonical_call, CallContext, RetraceHook};
use crate::rules::RuleTable;

/// [`RetraceHook`] driven by a [`RuleTable`] of [`Quirk`]s.
///
/// For every method it emits, in order: `Pre` quirks, the canonical call,
/// `Post` quirks. The canonical call is always emitted; a rule can add code
/// around it but never replace it.
#[derive(Debug, Clone, Default)]
pub struct QuirkRetracer {
    rules: RuleTable<Quirk>,
}

impl QuirkRetracer {
    /// Specialise with `rules`.
    pub fn new(rules: RuleTable<Quirk>) -> Self {
        Self { rules }
    }

    /// Specialise with the Direct3D 9 quirk table.
    pub fn d3d9() -> Self {
        Self::new(d3d9_rules())
    }

    /// The rule table in use.
    pub fn rules(&self) -> &RuleTable<Quirk> {
        &self.rules
    }
}

impl RetraceHook for QuirkRetracer {
    fn invoke_method(
        &self,
        iface: &Interface,
        method: &Method,
        ctx: &CallContext,
        out: &mut CodeWriter,
    ) {
        let applicable = self
            .rules
            .applicable(&iface.name, &method.name, method.ret_name());

        for quirk in &applicable.pre {
            debug!(interface = %iface.name, method = %method.name, quirk = quirk.name(), "pre quirk");
            quirk.emit(iface, method, ctx, out);
        }

        emit_canonical_call(iface, method, ctx, out);

        for quirk in &applicable.post {
            debug!(interface = %iface.name, method = %method.name, quirk = quirk.name(), "post quirk");
            quirk.emit(iface, method, ctx, out);
        }
    }
}
