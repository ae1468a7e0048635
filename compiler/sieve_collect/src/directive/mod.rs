//! Directive extraction from method documentation.
//!
//! A directive is `<marker> <key>` optionally followed by a parenthesized
//! value, e.g. `@tag code(return x + 1;)`. The value is scanned with
//! parenthesis nesting, so `@tag code(if (a(b)) { return c; })` yields
//! `if (a(b)) { return c; }`. Parsing is a pure function of the text.

use std::fmt;

use sieve_diagnostic::ErrorCode;
use thiserror::Error;

/// Marker used when the target profile does not override it.
pub const DEFAULT_MARKER: &str = "@tag";

/// Recognized directive keys.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum DirectiveKey {
    /// Translation entry point; optional value names the exported function.
    Root,
    /// Verbatim C body.
    Code,
    /// Text-substitution macro body.
    Macro,
    /// Forward to a runtime function; value defaults to the method name.
    Proxy,
    /// Space-separated qualified names of the types implementing an abstract
    /// method.
    Implementers,
}

impl DirectiveKey {
    const ALL: [DirectiveKey; 5] = [
        DirectiveKey::Root,
        DirectiveKey::Code,
        DirectiveKey::Macro,
        DirectiveKey::Proxy,
        DirectiveKey::Implementers,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            DirectiveKey::Root => "root",
            DirectiveKey::Code => "code",
            DirectiveKey::Macro => "macro",
            DirectiveKey::Proxy => "proxy",
            DirectiveKey::Implementers => "implementers",
        }
    }

    /// Keys that may appear without a parenthesized value.
    pub const fn value_is_optional(self) -> bool {
        matches!(self, DirectiveKey::Root | DirectiveKey::Proxy)
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DirectiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum DirectiveError {
    #[error("malformed directive: {reason}")]
    Malformed { reason: String },
    #[error("unknown directive key `{key}`")]
    UnknownKey { key: String },
    #[error("directive `{key}` requires a parenthesized value")]
    MissingValue { key: DirectiveKey },
    #[error("directive `{key}` can only be applied to {expected}")]
    Misapplied {
        key: DirectiveKey,
        expected: &'static str,
    },
}

impl DirectiveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DirectiveError::Malformed { .. } => ErrorCode::E0001,
            DirectiveError::UnknownKey { .. } => ErrorCode::E0002,
            DirectiveError::MissingValue { .. } => ErrorCode::E0003,
            DirectiveError::Misapplied { .. } => ErrorCode::E0004,
        }
    }
}

/// Body replacement requested by a directive.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BodyOverride<'a> {
    Code(&'a str),
    Macro(&'a str),
    /// Target function name; empty means "same name as the method".
    Proxy(&'a str),
}

/// Parsed directives of one method.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DirectiveSet {
    values: [Option<String>; DirectiveKey::ALL.len()],
}

impl DirectiveSet {
    /// Parse every directive in `doc`.
    ///
    /// A marker immediately followed by a non-whitespace character (such as
    /// `@tagline`) is ordinary text. Repeated keys keep the last value. An
    /// empty marker matches nothing.
    pub fn parse(doc: &str, marker: &str) -> Result<Self, DirectiveError> {
        let mut set = DirectiveSet::default();
        if marker.is_empty() {
            return Ok(set);
        }
        let mut rest = doc;
        while let Some(pos) = rest.find(marker) {
            let after = &rest[pos + marker.len()..];
            if !after.starts_with(char::is_whitespace) {
                rest = after;
                continue;
            }
            let after = after.trim_start();
            let key_len = after
                .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            let key_text = &after[..key_len];
            if !key_text.starts_with(|c: char| c.is_alphabetic() || c == '_') {
                return Err(DirectiveError::Malformed {
                    reason: format!("expected a key after `{marker}`"),
                });
            }
            let key = DirectiveKey::from_name(key_text).ok_or_else(|| {
                DirectiveError::UnknownKey {
                    key: key_text.to_owned(),
                }
            })?;

            let tail = &after[key_len..];
            let trimmed = tail.trim_start();
            if trimmed.starts_with('(') {
                let (value, remainder) = scan_balanced(trimmed, key)?;
                set.values[key.slot()] = Some(value.trim().to_owned());
                rest = remainder;
            } else if key.value_is_optional() {
                set.values[key.slot()] = Some(String::new());
                rest = tail;
            } else {
                return Err(DirectiveError::MissingValue { key });
            }
        }
        set.check_overrides()?;
        Ok(set)
    }

    fn check_overrides(&self) -> Result<(), DirectiveError> {
        let present: Vec<&str> = [DirectiveKey::Code, DirectiveKey::Macro, DirectiveKey::Proxy]
            .into_iter()
            .filter(|key| self.get(*key).is_some())
            .map(DirectiveKey::as_str)
            .collect();
        if present.len() > 1 {
            return Err(DirectiveError::Malformed {
                reason: format!("conflicting body overrides `{}`", present.join("`, `")),
            });
        }
        Ok(())
    }

    pub fn get(&self, key: DirectiveKey) -> Option<&str> {
        self.values[key.slot()].as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    pub fn is_root(&self) -> bool {
        self.get(DirectiveKey::Root).is_some()
    }

    /// Exported function name given by `root(<name>)`.
    pub fn root_name(&self) -> Option<&str> {
        self.get(DirectiveKey::Root).filter(|name| !name.is_empty())
    }

    pub fn body_override(&self) -> Option<BodyOverride<'_>> {
        if let Some(code) = self.get(DirectiveKey::Code) {
            Some(BodyOverride::Code(code))
        } else if let Some(text) = self.get(DirectiveKey::Macro) {
            Some(BodyOverride::Macro(text))
        } else {
            self.get(DirectiveKey::Proxy).map(BodyOverride::Proxy)
        }
    }

    /// Implementer type names, if the directive is present.
    pub fn implementers(&self) -> Option<impl Iterator<Item = &str>> {
        self.get(DirectiveKey::Implementers)
            .map(str::split_whitespace)
    }

    /// Whether the body AST is replaced and must not be traversed.
    pub fn skips_body(&self) -> bool {
        self.body_override().is_some() || self.get(DirectiveKey::Implementers).is_some()
    }

    /// Drop a directive that turned out not to apply.
    pub fn remove(&mut self, key: DirectiveKey) {
        self.values[key.slot()] = None;
    }
}

/// Split `text` (starting at `(`) into the parenthesized value and the text
/// after the matching `)`.
fn scan_balanced(text: &str, key: DirectiveKey) -> Result<(&str, &str), DirectiveError> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&text[1..i], &text[i + 1..]));
                }
            }
            _ => {}
        }
    }
    Err(DirectiveError::Malformed {
        reason: format!("unbalanced parentheses in `{key}` value"),
    })
}

#[cfg(test)]
mod tests;
