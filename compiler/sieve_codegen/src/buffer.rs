//! Render buffers.
//!
//! Output is written to the innermost of a stack of buffers. A sub-expression
//! whose text must be embedded somewhere else (a null-checked receiver, a call
//! argument) is rendered into a freshly pushed buffer and taken back with
//! [`RenderStack::pop_frame`].

const INDENT: &str = "    ";

pub(crate) struct RenderStack {
    frames: Vec<String>,
    indent: usize,
}

impl RenderStack {
    pub fn new() -> Self {
        RenderStack {
            frames: vec![String::with_capacity(4096)],
            indent: 0,
        }
    }

    fn top(&mut self) -> &mut String {
        if self.frames.is_empty() {
            self.frames.push(String::new());
        }
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Redirect output to a new buffer.
    pub fn push_frame(&mut self) {
        self.frames.push(String::new());
    }

    /// End the innermost redirection and return what was written to it.
    pub fn pop_frame(&mut self) -> String {
        if self.frames.len() > 1 {
            self.frames.pop().unwrap_or_default()
        } else {
            std::mem::take(self.top())
        }
    }

    /// Nesting depth; 1 when nothing is being captured.
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn write_indent(&mut self) {
        let depth = self.indent;
        let top = self.top();
        for _ in 0..depth {
            top.push_str(INDENT);
        }
    }

    pub fn write(&mut self, s: &str) {
        self.top().push_str(s);
    }

    /// Indentation, `s`, newline.
    pub fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.write(s);
        self.newline();
    }

    pub fn newline(&mut self) {
        self.top().push('\n');
    }

    /// Take the outermost buffer's text.
    pub fn take_output(&mut self) -> String {
        debug_assert_eq!(self.frames.len(), 1, "take_output inside a capture");
        std::mem::take(self.top())
    }
}
