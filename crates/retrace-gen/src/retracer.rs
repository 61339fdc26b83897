// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Generic retracer: walks every interface method of an API and emits one C++
//! replay function per method plus the dispatch table that maps recorded call
//! names to those functions.
//!
//! The traversal knows nothing about any particular API. Per-API behaviour is
//! plugged in through [`RetraceHook`], which owns the emission of the real call
//! statement and is invoked exactly once per method.

use retrace_spec::{Api, Direction, Interface, Method, Param, TypeKind};
use tracing::{debug, info};

use crate::emit::CodeWriter;

/// Names the generated replay function uses for its implicit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// The `trace::Call &` being replayed.
    pub call: &'static str,
    /// Local holding the captured return value.
    pub result: &'static str,
    /// Receiver expression of the instance method.
    pub receiver: &'static str,
}

impl Default for CallContext {
    fn default() -> Self {
        Self {
            call: "call",
            result: "__result",
            receiver: "_this",
        }
    }
}

/// Per-method extension point of the traversal.
///
/// Implementations must emit the canonical call (see [`emit_canonical_call`])
/// exactly once; they may surround it with extra statements.
pub trait RetraceHook {
    /// Emit the statements that invoke `method` on the receiver.
    fn invoke_method(
        &self,
        iface: &Interface,
        method: &Method,
        ctx: &CallContext,
        out: &mut CodeWriter,
    ) {
        emit_canonical_call(iface, method, ctx, out);
    }
}

/// Hook with no specialisation: every method gets the canonical call only.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRetracer;

impl RetraceHook for PlainRetracer {}

/// Emit the real API call and, for non-void methods, capture its result.
pub fn emit_canonical_call(
    _iface: &Interface,
    method: &Method,
    ctx: &CallContext,
    out: &mut CodeWriter,
) {
    let args = method
        .params
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    match method.ret_name() {
        Some(ret) => {
            out.line(format!("{ret} {};", ctx.result));
            out.line(format!(
                "{} = {}->{}({args});",
                ctx.result, ctx.receiver, method.name
            ));
        }
        None => {
            out.line(format!("{}->{}({args});", ctx.receiver, method.name));
        }
    }
}

/// Name of the generated replay function for `iface::method`.
pub fn function_name(iface: &Interface, method: &Method) -> String {
    format!("retrace_{}__{}", iface.name, method.name)
}

/// Drives a [`RetraceHook`] over a whole API.
#[derive(Debug)]
pub struct Retracer<H> {
    hook: H,
    table_name: String,
    ctx: CallContext,
}

impl<H: RetraceHook> Retracer<H> {
    /// Create a retracer emitting its dispatch table under `table_name`.
    pub fn new(hook: H, table_name: impl Into<String>) -> Self {
        Self {
            hook,
            table_name: table_name.into(),
            ctx: CallContext::default(),
        }
    }

    /// Emit every replay function of `api` followed by the dispatch table.
    ///
    /// Interfaces and methods are visited in declaration order, inherited
    /// methods before the interface's own. Returns the number of functions
    /// emitted.
    pub fn retrace_api(&self, api: &Api, out: &mut CodeWriter) -> usize {
        info!(api = %api.name, table = %self.table_name, "retracing api");
        let mut entries = Vec::new();
        for iface in &api.interfaces {
            let methods = api.methods_of(iface);
            debug!(interface = %iface.name, methods = methods.len(), "visiting interface");
            for method in methods {
                self.retrace_interface_method(iface, method, out);
                entries.push((
                    format!("{}::{}", iface.name, method.name),
                    function_name(iface, method),
                ));
            }
        }

        out.block(&format!("const retrace::Entry {}[] = {{", self.table_name), "};", |w| {
            for (name, func) in &entries {
                w.line(format!("{{\"{name}\", &{func}}},"));
            }
            w.line("{NULL, NULL}");
        });
        entries.len()
    }

    /// Emit the replay function for one method.
    pub fn retrace_interface_method(&self, iface: &Interface, method: &Method, out: &mut CodeWriter) {
        let ctx = &self.ctx;
        out.line("static void");
        out.block(
            &format!("{}(trace::Call &{}) {{", function_name(iface, method), ctx.call),
            "}",
            |w| {
                emit_receiver(iface, ctx, w);
                for (index, param) in method.params.iter().enumerate() {
                    emit_argument(param, index + 1, ctx, w);
                }
                self.hook.invoke_method(iface, method, ctx, w);
                for (index, param) in method.params.iter().enumerate() {
                    emit_output_object(param, index + 1, ctx, w);
                }
                if method.ret_name().is_some() {
                    w.line(format!("(void){};", ctx.result));
                }
            },
        );
        out.blank();
    }
}

fn emit_receiver(iface: &Interface, ctx: &CallContext, out: &mut CodeWriter) {
    let this = ctx.receiver;
    out.line(format!("{} * {this};", iface.name));
    out.line(format!(
        "{this} = static_cast<{} *>(retrace::toObjPointer({call}, {call}.arg(0)));",
        iface.name,
        call = ctx.call
    ));
    out.block(&format!("if (!{this}) {{"), "}", |w| {
        w.line(format!(
            "retrace::warning({}) << \"NULL this pointer\\n\";",
            ctx.call
        ));
        w.line("return;");
    });
}

fn emit_argument(param: &Param, index: usize, ctx: &CallContext, out: &mut CodeWriter) {
    let name = &param.name;
    let ty = &param.ty.name;
    let call = ctx.call;

    if param.direction == Direction::Out {
        if let Some(pointee) = &param.ty.pointee {
            let storage = format!("{name}_out");
            match pointee.kind {
                TypeKind::Interface | TypeKind::Pointer | TypeKind::Handle => {
                    out.line(format!("{} {storage} = NULL;", pointee.name));
                }
                _ => {
                    out.line(format!("{} {storage};", pointee.name));
                }
            }
            out.line(format!("{ty} {name} = &{storage};"));
            return;
        }
    }

    let value = match param.ty.kind {
        TypeKind::SInt | TypeKind::Enum => {
            format!("static_cast<{ty}>(({call}.arg({index})).toSInt())")
        }
        TypeKind::UInt | TypeKind::Flags => {
            format!("static_cast<{ty}>(({call}.arg({index})).toUInt())")
        }
        TypeKind::Float => format!("static_cast<{ty}>(({call}.arg({index})).toFloat())"),
        TypeKind::Handle => {
            format!("reinterpret_cast<{ty}>(({call}.arg({index})).toUIntPtr())")
        }
        TypeKind::Interface => {
            format!("static_cast<{ty}>(retrace::toObjPointer({call}, {call}.arg({index})))")
        }
        TypeKind::Pointer | TypeKind::Opaque | TypeKind::Void => {
            format!("static_cast<{ty}>(retrace::toPointer({call}.arg({index})))")
        }
    };
    out.line(format!("{ty} {name};"));
    out.line(format!("{name} = {value};"));
}

fn emit_output_object(param: &Param, index: usize, ctx: &CallContext, out: &mut CodeWriter) {
    if param.direction != Direction::Out {
        return;
    }
    let returns_object = param
        .ty
        .pointee
        .as_ref()
        .is_some_and(|p| p.kind == TypeKind::Interface);
    if returns_object {
        out.line(format!(
            "retrace::addObj({call}, {call}.arg({index}), *{});",
            param.name,
            call = ctx.call
        ));
    }
}
