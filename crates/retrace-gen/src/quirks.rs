// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Quirk actions and the Direct3D 9 quirk table.
//!
//! Each [`Quirk`] is a small, stateless piece of replay code that the generic
//! traversal cannot derive from the API description alone. The set is closed:
//! adding a behaviour means adding a variant here and registering it in a
//! table.

use retrace_spec::{Interface, Method};
use tracing::warn;

use crate::emit::CodeWriter;
use crate::retracer::CallContext;
use crate::rules::RuleTable;

/// Return type carrying the Direct3D success/failure convention.
pub const D3D_STATUS_TYPE: &str = "HRESULT";
/// Success value of [`D3D_STATUS_TYPE`].
pub const D3D_SUCCESS: &str = "S_OK";

/// A replay-code patch emitted around a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quirk {
    /// Create the output window from the presentation parameters and point
    /// the device at it.
    ///
    /// Device creation is where the replayed program first learns how big its
    /// back buffer is, so the window is created there rather than up front.
    /// The recorded window handle belonged to the captured process and is
    /// meaningless at replay time.
    CreateOutputWindow {
        /// Parameter holding the presentation parameters struct pointer.
        present_params: String,
        /// Parameter holding the focus window, if the method takes one.
        focus_window: Option<String>,
    },
    /// Report a non-success result as a replay warning. Replay continues.
    CheckResult {
        /// Success sentinel the result is compared against.
        success: String,
        /// Warning text. Emitted escaped, so any text is accepted.
        message: String,
    },
    /// Replace a zero lock size with the real size of the locked resource.
    ///
    /// A zero size means "the whole buffer" at capture time; the trace does
    /// not record how big that was, so the live object is asked instead.
    InferLockSize {
        /// Parameter holding the number of bytes to lock.
        size: String,
        /// Descriptor struct returned by the receiver's `GetDesc`.
        desc_type: String,
    },
}

impl Quirk {
    /// Window creation keyed on the Direct3D parameter names.
    pub fn create_output_window() -> Self {
        Self::CreateOutputWindow {
            present_params: "pPresentationParameters".to_owned(),
            focus_window: Some("hFocusWindow".to_owned()),
        }
    }

    /// Result check against `success`.
    pub fn check_result(success: &str, message: &str) -> Self {
        Self::CheckResult {
            success: success.to_owned(),
            message: message.to_owned(),
        }
    }

    /// Lock size inference for a buffer described by `desc_type`.
    pub fn infer_lock_size(desc_type: &str) -> Self {
        Self::InferLockSize {
            size: "SizeToLock".to_owned(),
            desc_type: desc_type.to_owned(),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateOutputWindow { .. } => "create-output-window",
            Self::CheckResult { .. } => "check-result",
            Self::InferLockSize { .. } => "infer-lock-size",
        }
    }

    /// Emit the quirk's statements for `iface::method`.
    pub fn emit(&self, iface: &Interface, method: &Method, ctx: &CallContext, out: &mut CodeWriter) {
        match self {
            Self::CreateOutputWindow {
                present_params,
                focus_window,
            } => {
                expect_param(iface, method, present_params);
                out.line(format!(
                    "HWND hWnd = createWindow({present_params}->BackBufferWidth, {present_params}->BackBufferHeight);"
                ));
                out.line(format!("{present_params}->hDeviceWindow = hWnd;"));
                if let Some(focus) = focus_window {
                    expect_param(iface, method, focus);
                    out.line(format!("{focus} = hWnd;"));
                }
            }
            Self::CheckResult { success, message } => {
                if method.ret_name().is_none() {
                    warn!(
                        interface = %iface.name,
                        method = %method.name,
                        "result check attached to a method without a result"
                    );
                }
                out.block(&format!("if ({} != {success}) {{", ctx.result), "}", |w| {
                    w.line(format!(
                        "retrace::warning({}) << \"{}\\n\";",
                        ctx.call,
                        escape_literal(message)
                    ));
                });
            }
            Self::InferLockSize { size, desc_type } => {
                expect_param(iface, method, size);
                out.block(&format!("if ({size} == 0) {{"), "}", |w| {
                    w.line(format!("{desc_type} Desc;"));
                    w.line(format!("{}->GetDesc(&Desc);", ctx.receiver));
                    w.line(format!("{size} = Desc.Size;"));
                });
            }
        }
    }
}

/// Escape `text` for use inside a C++ string literal.
fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            c if c.is_control() => escaped.push_str(&format!("\\{:03o}", u32::from(c))),
            c => escaped.push(c),
        }
    }
    escaped
}

fn expect_param(iface: &Interface, method: &Method, name: &str) {
    if method.param(name).is_none() {
        warn!(
            interface = %iface.name,
            method = %method.name,
            param = name,
            "quirk references a parameter the method does not declare"
        );
    }
}

/// Quirk table for Direct3D 9.
pub fn d3d9_rules() -> RuleTable<Quirk> {
    RuleTable::new()
        .before("IDirect3D9", "CreateDevice", Quirk::create_output_window())
        .before("IDirect3D9Ex", "CreateDevice", Quirk::create_output_window())
        .before("IDirect3D9Ex", "CreateDeviceEx", Quirk::create_output_window())
        .after_returning(D3D_STATUS_TYPE, Quirk::check_result(D3D_SUCCESS, "failed"))
        .after(
            "IDirect3DVertexBuffer9",
            "Lock",
            Quirk::infer_lock_size("D3DVERTEXBUFFER_DESC"),
        )
        .after(
            "IDirect3DIndexBuffer9",
            "Lock",
            Quirk::infer_lock_size("D3DINDEXBUFFER_DESC"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrace_spec::{Param, Type, TypeKind};

    fn emit(quirk: &Quirk, method: &Method) -> String {
        let iface = Interface::new("IThing", vec![]);
        let mut out = CodeWriter::new();
        quirk.emit(&iface, method, &CallContext::default(), &mut out);
        out.finish()
    }

    #[test]
    fn window_creation_uses_the_named_parameter() {
        let method = Method::new(
            "CreateThing",
            None,
            vec![Param::new("p", Type::pointer(Type::new("Params", TypeKind::Opaque)))],
        );
        let quirk = Quirk::CreateOutputWindow {
            present_params: "p".into(),
            focus_window: None,
        };
        assert_eq!(
            emit(&quirk, &method),
            "HWND hWnd = createWindow(p->BackBufferWidth, p->BackBufferHeight);\n\
             p->hDeviceWindow = hWnd;\n"
        );
    }

    #[test]
    fn window_creation_sets_focus() {
        let method = Method::new("CreateDevice", None, vec![]);
        let text = emit(&Quirk::create_output_window(), &method);
        assert!(text.ends_with("hFocusWindow = hWnd;\n"));
    }

    #[test]
    fn result_check_warns_without_aborting() {
        let method = Method::new("F", Some(Type::new("HRESULT", TypeKind::SInt)), vec![]);
        assert_eq!(
            emit(&Quirk::check_result("S_OK", "failed"), &method),
            "if (__result != S_OK) {\n    retrace::warning(call) << \"failed\\n\";\n}\n"
        );
    }

    #[test]
    fn result_message_is_escaped() {
        let method = Method::new("F", Some(Type::new("HRESULT", TypeKind::SInt)), vec![]);
        let text = emit(&Quirk::check_result("S_OK", "bad \"arg\" in C:\\tmp\n"), &method);
        assert!(
            text.contains(r#"<< "bad \"arg\" in C:\\tmp\n\n";"#),
            "{text}"
        );
    }

    #[test]
    fn lock_size_queries_the_descriptor() {
        let method = Method::new(
            "Lock",
            None,
            vec![Param::new("SizeToLock", Type::new("UINT", TypeKind::UInt))],
        );
        assert_eq!(
            emit(&Quirk::infer_lock_size("D3DVERTEXBUFFER_DESC"), &method),
            "if (SizeToLock == 0) {\n    \
             D3DVERTEXBUFFER_DESC Desc;\n    \
             _this->GetDesc(&Desc);\n    \
             SizeToLock = Desc.Size;\n}\n"
        );
    }

    #[test]
    fn d3d9_table_shape() {
        let table = d3d9_rules();
        let create = table.applicable("IDirect3D9", "CreateDevice", Some("HRESULT"));
        assert_eq!(create.pre, [&Quirk::create_output_window()]);
        assert_eq!(create.post, [&Quirk::check_result("S_OK", "failed")]);

        let lock = table.applicable("IDirect3DVertexBuffer9", "Lock", Some("HRESULT"));
        assert!(lock.pre.is_empty());
        assert_eq!(lock.post.len(), 2);
        assert_eq!(lock.post[0].name(), "infer-lock-size");
        assert_eq!(lock.post[1].name(), "check-result");

        assert!(table.applicable("IDirect3DDevice9", "Release", Some("ULONG")).is_empty());
    }
}
