// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Line-oriented C++ text sink.

const INDENT: &str = "    ";

/// Accumulates generated C++ source, one line at a time, with indentation.
///
/// Emission is infallible; the driver writes the finished text out once.
#[derive(Debug, Default, Clone)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
}

impl CodeWriter {
    /// Create an empty writer at depth zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line at the current depth. Empty text yields a bare newline.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push_str(INDENT);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
        self
    }

    /// Append an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// Append text verbatim, ignoring the current depth.
    pub fn raw(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self
    }

    /// Increase the depth by one level.
    pub fn indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    /// Decrease the depth by one level (saturating at zero).
    pub fn dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// Emit `open`, the body one level deeper, then `close`.
    pub fn block(&mut self, open: &str, close: &str, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.line(open);
        self.indent();
        body(self);
        self.dedent();
        self.line(close)
    }

    /// Current indentation depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Text emitted so far.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consume the writer and return the text.
    pub fn finish(self) -> String {
        self.buf
    }
}
