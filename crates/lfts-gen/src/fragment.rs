// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Structured output document and its single textual backend.
//!
//! Emitters build trees of [`Fragment`]s instead of appending to a shared
//! buffer. Indentation is a property of the tree: a [`Fragment::Scope`] body
//! sits one level deeper than its head and tail, so opening and closing are
//! balanced by construction and no indentation state outlives a call.
//!
//! # Example
//!
//! ```
//! use lfts_gen::fragment::{Fragment, TextBackend};
//!
//! let class = Fragment::scope(
//!     "export class Counter extends __Reactor {",
//!     vec![Fragment::property("count", "__Parameter<number>")],
//!     "}",
//! );
//! let text = TextBackend::new(4).render(&[class]);
//! assert_eq!(
//!     text,
//!     "export class Counter extends __Reactor {\n    count: __Parameter<number>;\n}\n"
//! );
//! ```

/// One node of the output document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Class-level property declaration: `name: ty;`.
    Property {
        /// Property name.
        name: String,
        /// Declared type.
        ty: String,
    },
    /// Call statement: `callee(arg, arg);`.
    Call {
        /// Callee expression (`super`, `this.registerFederatePortAction`, ...).
        callee: String,
        /// Argument expressions, in order.
        args: Vec<String>,
    },
    /// Verbatim text; every line is indented to the enclosing scope. Empty text is a blank line.
    Raw(String),
    /// Text copied byte for byte, never indented or trimmed; a final newline is added if missing.
    Verbatim(String),
    /// Comma-separated items, one per line, one level deeper than `open`/`close`.
    List {
        /// Opening line.
        open: String,
        /// Items, rendered without trailing separator on the last one.
        items: Vec<String>,
        /// Closing line.
        close: String,
    },
    /// Head fragments, then a body one level deeper, then an optional tail line.
    Scope {
        /// Rendered at the current depth.
        head: Vec<Fragment>,
        /// Rendered one level deeper.
        body: Vec<Fragment>,
        /// Closing line at the current depth; empty means none.
        tail: String,
    },
}

impl Fragment {
    /// `name: ty;`
    pub fn property(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::Property {
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// `callee(args...);`
    pub fn call<I, S>(callee: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Call {
            callee: callee.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Verbatim text.
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    /// Text copied byte for byte (user code such as preambles).
    pub fn verbatim(text: impl Into<String>) -> Self {
        Self::Verbatim(text.into())
    }

    /// Blank line.
    pub fn blank() -> Self {
        Self::Raw(String::new())
    }

    /// Scope whose head is a single line.
    pub fn scope(head: impl Into<String>, body: Vec<Fragment>, tail: impl Into<String>) -> Self {
        Self::Scope {
            head: vec![Self::Raw(head.into())],
            body,
            tail: tail.into(),
        }
    }

    /// Pre-order walk over this fragment and all nested fragments.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Fragment)) {
        f(self);
        if let Self::Scope { head, body, .. } = self {
            for child in head.iter().chain(body) {
                child.visit(f);
            }
        }
    }
}

/// Collect every call statement to `callee` in `fragments`, in document order.
pub fn calls_to<'a>(fragments: &'a [Fragment], callee: &str) -> Vec<&'a [String]> {
    let mut found = Vec::new();
    for fragment in fragments {
        fragment.visit(&mut |f| {
            if let Fragment::Call { callee: c, args } = f {
                if c == callee {
                    found.push(args.as_slice());
                }
            }
        });
    }
    found
}

/// Renders fragment trees as TypeScript source text.
#[derive(Debug, Clone)]
pub struct TextBackend {
    unit: String,
}

impl Default for TextBackend {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TextBackend {
    /// Backend indenting `indent_width` spaces per level.
    pub fn new(indent_width: usize) -> Self {
        Self {
            unit: " ".repeat(indent_width),
        }
    }

    /// Render a sequence of top-level fragments.
    pub fn render(&self, fragments: &[Fragment]) -> String {
        let mut out = String::new();
        for fragment in fragments {
            self.render_at(&mut out, fragment, 0);
        }
        out
    }

    fn line(&self, out: &mut String, depth: usize, text: &str) {
        if !text.is_empty() {
            for _ in 0..depth {
                out.push_str(&self.unit);
            }
            out.push_str(text);
        }
        out.push('\n');
    }

    fn render_at(&self, out: &mut String, fragment: &Fragment, depth: usize) {
        match fragment {
            Fragment::Property { name, ty } => self.line(out, depth, &format!("{name}: {ty};")),
            Fragment::Call { callee, args } => {
                self.line(out, depth, &format!("{callee}({});", args.join(", ")));
            }
            Fragment::Raw(text) => {
                if text.is_empty() {
                    out.push('\n');
                }
                for line in text.lines() {
                    self.line(out, depth, line.trim_end());
                }
            }
            Fragment::Verbatim(text) => {
                out.push_str(text);
                if !text.ends_with('\n') {
                    out.push('\n');
                }
            }
            Fragment::List { open, items, close } => {
                if items.is_empty() {
                    self.line(out, depth, &format!("{open}{close}"));
                    return;
                }
                self.line(out, depth, open);
                let last = items.len() - 1;
                for (i, item) in items.iter().enumerate() {
                    if i == last {
                        self.line(out, depth + 1, item);
                    } else {
                        self.line(out, depth + 1, &format!("{item},"));
                    }
                }
                self.line(out, depth, close);
            }
            Fragment::Scope { head, body, tail } => {
                for h in head {
                    self.render_at(out, h, depth);
                }
                for b in body {
                    self.render_at(out, b, depth + 1);
                }
                if !tail.is_empty() {
                    self.line(out, depth, tail);
                }
            }
        }
    }
}
