//! Canonical C++ type spellings.
//!
//! A type is read as a stack of "layers", outermost first. Each layer is
//! one indirection (pointer, lvalue/rvalue reference) together with the
//! cv-qualifiers and pack expansion that apply to it. The innermost layer
//! holds the spelling of the core type (`std::vector<int>` in
//! `const std::vector<int> &`).
//!
//! Rendering a parsed type yields its canonical form, so `T*`, `T *` and
//! `T  *` all compare equal, and so do `int const&` and `const int &`.

use std::collections::HashMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical textual representation of a C++ type.
///
/// Two `TypeRef`s are equal iff their canonical strings are identical.
/// Pointer, reference, cv-qualifiers and template arguments are preserved.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    /// Canonicalize a type spelling.
    #[must_use]
    pub fn parse(spelling: &str) -> Self {
        Self(Layer::parse(spelling).render())
    }

    /// The canonical spelling.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The type as it contributes to a function signature.
    ///
    /// Top-level cv-qualifiers of a by-value parameter are not part of the
    /// function type: `void f(const int)` redeclares `void f(int)`.
    #[must_use]
    pub fn signature_form(&self) -> Self {
        let mut layer = Layer::parse(&self.0);
        if !layer.lvalue_ref && !layer.rvalue_ref {
            layer.is_const = false;
            layer.is_volatile = false;
        }
        Self(layer.simplified().render())
    }

    /// The type with references and cv-qualifiers removed.
    ///
    /// For references the qualifiers of the referred-to type are removed,
    /// so `const T &` decays to `T` and `T * const &` to `T *`.
    #[must_use]
    pub fn decayed(&self) -> Self {
        let mut layer = Layer::parse(&self.0);
        if layer.lvalue_ref || layer.rvalue_ref {
            layer.lvalue_ref = false;
            layer.rvalue_ref = false;
            if let Inner::Nested(inner) = &mut layer.inner {
                inner.is_const = false;
                inner.is_volatile = false;
            }
        } else {
            layer.is_const = false;
            layer.is_volatile = false;
        }
        Self(layer.simplified().render())
    }

    /// Whether this is a pack expansion (`Ts && ...`).
    #[must_use]
    pub fn is_pack(&self) -> bool {
        Layer::parse(&self.0).pack
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        self.0 == "void"
    }

    /// Replace unqualified identifiers according to `bindings`.
    ///
    /// Used to rewrite the member types of a class template base in terms
    /// of the arguments the derived class passes to it.
    #[must_use]
    pub fn substitute(&self, bindings: &HashMap<String, String>) -> Self {
        if bindings.is_empty() {
            return self.clone();
        }
        Self(Layer::parse(&self.0).substitute(bindings).simplified().render())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(spelling: &str) -> Self {
        Self::parse(spelling)
    }
}

// ── Layered representation ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Inner {
    Core(String),
    Nested(Box<Layer>),
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq)]
struct Layer {
    inner: Inner,
    is_const: bool,
    is_volatile: bool,
    lvalue_ref: bool,
    rvalue_ref: bool,
    pointer: bool,
    pack: bool,
}

impl Layer {
    const fn core(spelling: String) -> Self {
        Self {
            inner: Inner::Core(spelling),
            is_const: false,
            is_volatile: false,
            lvalue_ref: false,
            rvalue_ref: false,
            pointer: false,
            pack: false,
        }
    }

    fn parse(spelling: &str) -> Self {
        let tokens = tokenize(spelling);
        let refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
        Self::from_tokens(&refs)
    }

    /// Read qualifiers and one indirection from the right; recurse into
    /// the remaining tokens for pointers and references, otherwise strip
    /// leading cv-qualifiers and keep the rest as the core spelling.
    fn from_tokens(tokens: &[&str]) -> Self {
        let mut rest = tokens.to_vec();
        let mut layer = Self::core(String::new());

        while rest.len() > 1 {
            match rest[rest.len() - 1] {
                "const" => layer.is_const = true,
                "volatile" => layer.is_volatile = true,
                "..." => layer.pack = true,
                "*" => {
                    layer.pointer = true;
                    rest.pop();
                    break;
                }
                "&" => {
                    layer.lvalue_ref = true;
                    rest.pop();
                    break;
                }
                "&&" => {
                    layer.rvalue_ref = true;
                    rest.pop();
                    break;
                }
                _ => break,
            }
            rest.pop();
        }

        if layer.pointer || layer.lvalue_ref || layer.rvalue_ref {
            layer.inner = Inner::Nested(Box::new(Self::from_tokens(&rest)));
            return layer.simplified();
        }

        // cv before a function type belongs to its return type.
        while rest.len() > 1 && !has_top_level_paren(&rest) {
            match rest[0] {
                "const" => layer.is_const = true,
                "volatile" => layer.is_volatile = true,
                _ => break,
            }
            rest.remove(0);
        }

        layer.inner = Inner::Core(render_core(&rest));
        layer.simplified()
    }

    /// Replace a bound core with the layers of its argument. The
    /// qualifiers written around the parameter apply to the argument as a
    /// whole, so `const T &` with `T = int *` is `int * const &`.
    fn substitute(self, bindings: &HashMap<String, String>) -> Self {
        match self.inner {
            Inner::Nested(inner) => Self {
                inner: Inner::Nested(Box::new(inner.substitute(bindings))),
                ..self
            }
            .collapse_references(),
            Inner::Core(ref spelling) => {
                if let Some(argument) = bindings.get(spelling) {
                    let mut bound = Self::parse(argument);
                    if !bound.lvalue_ref && !bound.rvalue_ref {
                        bound.is_const |= self.is_const;
                        bound.is_volatile |= self.is_volatile;
                    }
                    bound.pack |= self.pack;
                    return bound;
                }
                let tokens = tokenize(spelling);
                let refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
                Self {
                    inner: Inner::Core(substitute_core(&refs, bindings)),
                    ..self
                }
            }
        }
    }

    /// `T &` with `T = U &&` is `U &`: a reference to a reference collapses,
    /// lvalue winning.
    fn collapse_references(self) -> Self {
        if !self.lvalue_ref && !self.rvalue_ref {
            return self;
        }
        match self.inner {
            Inner::Nested(inner) if inner.lvalue_ref || inner.rvalue_ref => {
                let inner = *inner;
                let lvalue = self.lvalue_ref || inner.lvalue_ref;
                Self {
                    lvalue_ref: lvalue,
                    rvalue_ref: !lvalue,
                    pack: self.pack || inner.pack,
                    ..inner
                }
            }
            inner => Self { inner, ..self },
        }
    }

    const fn is_naked(&self) -> bool {
        !(self.is_const
            || self.is_volatile
            || self.lvalue_ref
            || self.rvalue_ref
            || self.pointer
            || self.pack)
    }

    /// Drop layers that carry no qualifier or indirection.
    fn simplified(mut self) -> Self {
        let naked = self.is_naked();
        if let Inner::Nested(inner) = self.inner {
            let inner = inner.simplified();
            if naked {
                return inner;
            }
            self.inner = Inner::Nested(Box::new(inner));
        }
        self
    }

    fn render(&self) -> String {
        let mut out = match &self.inner {
            Inner::Core(spelling) => spelling.clone(),
            Inner::Nested(inner) => inner.render(),
        };
        if self.lvalue_ref {
            out.push_str(" &");
        }
        if self.rvalue_ref {
            out.push_str(" &&");
        }
        if self.pointer {
            out.push_str(" *");
            if self.is_const {
                out.push_str(" const");
            }
            if self.is_volatile {
                out.push_str(" volatile");
            }
        } else {
            if self.is_volatile {
                out.insert_str(0, "volatile ");
            }
            if self.is_const {
                out.insert_str(0, "const ");
            }
        }
        if self.pack {
            out.push_str(" ...");
        }
        out
    }
}

// ── Tokens ─────────────────────────────────────────────────────────

const MULTI_CHAR_PUNCT: [&str; 3] = ["...", "::", "&&"];

fn tokenize(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if is_word_char(c) {
            let start = i;
            while i < chars.len() && is_word_char(chars[i]) {
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
            continue;
        }
        let ahead: String = chars[i..chars.len().min(i + 3)].iter().collect();
        let punct = MULTI_CHAR_PUNCT
            .iter()
            .find(|p| ahead.starts_with(**p))
            .map_or_else(|| c.to_string(), |p| (*p).to_string());
        i += punct.chars().count();
        tokens.push(punct);
    }
    tokens
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word(token: &str) -> bool {
    token.chars().next().is_some_and(is_word_char)
}

/// Join core tokens with canonical spacing; template arguments are
/// canonicalized recursively.
fn render_core(tokens: &[&str]) -> String {
    let mut out = String::new();
    let mut prev_word = false;
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if token == "<"
            && let Some(close) = matching_angle(tokens, i)
        {
            let args: Vec<String> = split_top_level(&tokens[i + 1..close])
                .iter()
                .map(|arg| Layer::from_tokens(arg).render())
                .collect();
            out.push('<');
            out.push_str(&args.join(", "));
            out.push('>');
            prev_word = false;
            i = close + 1;
            continue;
        }
        if token == "," {
            out.push_str(", ");
            prev_word = false;
            i += 1;
            continue;
        }
        let word = is_word(token);
        if word && prev_word {
            out.push(' ');
        }
        out.push_str(token);
        prev_word = word;
        i += 1;
    }
    out
}

/// Substitute identifiers inside a compound core such as
/// `std::vector<T>`. Template arguments are substituted as whole types.
fn substitute_core(tokens: &[&str], bindings: &HashMap<String, String>) -> String {
    let mut out = String::new();
    let mut prev_word = false;
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if token == "<"
            && let Some(close) = matching_angle(tokens, i)
        {
            let args: Vec<String> = split_top_level(&tokens[i + 1..close])
                .iter()
                .map(|arg| Layer::from_tokens(arg).substitute(bindings).simplified().render())
                .collect();
            out.push('<');
            out.push_str(&args.join(", "));
            out.push('>');
            prev_word = false;
            i = close + 1;
            continue;
        }
        if token == "," {
            out.push_str(", ");
            prev_word = false;
            i += 1;
            continue;
        }
        let qualified = i > 0 && tokens[i - 1] == "::";
        let text = match bindings.get(token) {
            Some(argument) if !qualified => TypeRef::parse(argument).0,
            _ => token.to_string(),
        };
        if prev_word && is_word(&text) {
            out.push(' ');
        }
        prev_word = text.ends_with(is_word_char);
        out.push_str(&text);
        i += 1;
    }
    out
}

fn has_top_level_paren(tokens: &[&str]) -> bool {
    let mut angle = 0usize;
    for token in tokens {
        match *token {
            "<" => angle += 1,
            ">" => angle = angle.saturating_sub(1),
            "(" if angle == 0 => return true,
            _ => {}
        }
    }
    false
}

fn matching_angle(tokens: &[&str], open: usize) -> Option<usize> {
    let mut angle = 0usize;
    let mut paren = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(open) {
        match *token {
            "(" | "[" => paren += 1,
            ")" | "]" => paren = paren.saturating_sub(1),
            "<" if paren == 0 => angle += 1,
            ">" if paren == 0 => {
                angle -= 1;
                if angle == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn split_top_level<'a>(tokens: &[&'a str]) -> Vec<Vec<&'a str>> {
    if tokens.is_empty() {
        return Vec::new();
    }
    let mut parts = vec![Vec::new()];
    let mut depth = 0usize;
    for token in tokens {
        match *token {
            "<" | "(" | "[" => depth += 1,
            ">" | ")" | "]" => depth = depth.saturating_sub(1),
            "," if depth == 0 => {
                parts.push(Vec::new());
                continue;
            }
            _ => {}
        }
        if let Some(last) = parts.last_mut() {
            last.push(*token);
        }
    }
    parts
}
