// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed support code every generated retracer starts with.
//!
//! The block is independent of the API description: standard includes, the
//! API's own headers, a window procedure that lifts the desktop size limit,
//! and `createWindow`, which the device-creation quirk calls.

use crate::emit::CodeWriter;

/// Largest window dimension the emitted window procedure allows by default.
pub const DEFAULT_MAX_WINDOW_EXTENT: i32 = 60000;

/// Parameters of the emitted support block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bootstrap {
    /// Project headers to include, in order.
    pub headers: Vec<String>,
    /// Window class registered by `createWindow`.
    pub window_class: String,
    /// Maximum window width and height reported to the window manager.
    pub max_window_extent: i32,
}

impl Bootstrap {
    /// Emit the block. Call once, before any replay function.
    pub fn emit(&self, out: &mut CodeWriter) {
        out.blank();
        out.line("#include <string.h>");
        out.blank();
        out.line("#include <iostream>");
        out.blank();
        for header in &self.headers {
            out.line(format!("#include \"{header}\""));
        }
        out.blank();
        out.blank();
        out.raw(&self.window_proc());
        out.blank();
        out.blank();
        out.raw(&self.create_window());
        out.blank();
    }

    fn window_proc(&self) -> String {
        let max = self.max_window_extent;
        format!(
            r"static LRESULT CALLBACK
WndProc(HWND hWnd, UINT uMsg, WPARAM wParam, LPARAM lParam)
{{
    MINMAXINFO *pMMI;
    switch (uMsg) {{
    case WM_GETMINMAXINFO:
        // Allow to create a window bigger than the desktop
        pMMI = (MINMAXINFO *)lParam;
        pMMI->ptMaxSize.x = {max};
        pMMI->ptMaxSize.y = {max};
        pMMI->ptMaxTrackSize.x = {max};
        pMMI->ptMaxTrackSize.y = {max};
        break;
    default:
        break;
    }}

    return DefWindowProc(hWnd, uMsg, wParam, lParam);
}}
"
        )
    }

    fn create_window(&self) -> String {
        let class = &self.window_class;
        format!(
            r#"static HWND
createWindow(int width, int height) {{
    static bool first = TRUE;
    RECT rect;

    if (first) {{
        WNDCLASS wc;
        memset(&wc, 0, sizeof wc);
        wc.hbrBackground = (HBRUSH) (COLOR_BTNFACE + 1);
        wc.hCursor = LoadCursor(NULL, IDC_ARROW);
        wc.hIcon = LoadIcon(NULL, IDI_APPLICATION);
        wc.lpfnWndProc = WndProc;
        wc.lpszClassName = "{class}";
        wc.style = CS_OWNDC | CS_HREDRAW | CS_VREDRAW;
        RegisterClass(&wc);
        first = FALSE;
    }}

    DWORD dwExStyle;
    DWORD dwStyle;
    HWND hWnd;

    dwExStyle = 0;
    dwStyle = WS_CLIPSIBLINGS | WS_CLIPCHILDREN | WS_OVERLAPPEDWINDOW;

    int x = 0, y = 0;

    rect.left = x;
    rect.top = y;
    rect.right = rect.left + width;
    rect.bottom = rect.top + height;

    AdjustWindowRectEx(&rect, dwStyle, FALSE, dwExStyle);

    hWnd = CreateWindowEx(dwExStyle,
                          "{class}", /* wc.lpszClassName */
                          NULL,
                          dwStyle,
                          0, /* x */
                          0, /* y */
                          rect.right - rect.left, /* width */
                          rect.bottom - rect.top, /* height */
                          NULL,
                          NULL,
                          NULL,
                          NULL);
    ShowWindow(hWnd, SW_SHOW);
    return hWnd;
}}
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bootstrap() -> Bootstrap {
        Bootstrap {
            headers: vec!["d3d9imports.hpp".into(), "d3dretrace.hpp".into()],
            window_class: "d3dretrace".into(),
            max_window_extent: DEFAULT_MAX_WINDOW_EXTENT,
        }
    }

    fn emit(b: &Bootstrap) -> String {
        let mut out = CodeWriter::new();
        b.emit(&mut out);
        out.finish()
    }

    #[test]
    fn includes_headers_in_order() {
        let text = emit(&bootstrap());
        let a = text.find("#include \"d3d9imports.hpp\"").unwrap();
        let b = text.find("#include \"d3dretrace.hpp\"").unwrap();
        assert!(text.find("#include <string.h>").unwrap() < a);
        assert!(a < b);
        assert!(b < text.find("WndProc(").unwrap());
    }

    #[test]
    fn widens_window_limits() {
        let text = emit(&bootstrap());
        for field in ["ptMaxSize.x", "ptMaxSize.y", "ptMaxTrackSize.x", "ptMaxTrackSize.y"] {
            assert!(text.contains(&format!("pMMI->{field} = 60000;")), "{field}");
        }
    }

    #[test]
    fn registers_window_class_once() {
        let text = emit(&bootstrap());
        assert_eq!(text.matches("RegisterClass(&wc);").count(), 1);
        assert!(text.contains("static bool first = TRUE;"));
        let guard = text.find("if (first) {").unwrap();
        let register = text.find("RegisterClass(&wc);").unwrap();
        let reset = text.find("first = FALSE;").unwrap();
        assert!(guard < register && register < reset);
        assert!(text.contains("wc.lpszClassName = \"d3dretrace\";"));
        assert!(text.contains("ShowWindow(hWnd, SW_SHOW);"));
    }

    #[test]
    fn window_proc_precedes_create_window() {
        let text = emit(&bootstrap());
        assert!(text.find("WndProc(HWND").unwrap() < text.find("createWindow(int").unwrap());
    }

    #[test]
    fn custom_class_and_extent() {
        let b = Bootstrap {
            headers: vec![],
            window_class: "replay".into(),
            max_window_extent: 16384,
        };
        let text = emit(&b);
        assert!(text.contains("pMMI->ptMaxTrackSize.y = 16384;"));
        assert_eq!(text.matches("\"replay\"").count(), 2);
    }
}
