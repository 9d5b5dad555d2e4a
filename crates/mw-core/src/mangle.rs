//! Operator name mangling.
//!
//! Generated mocks need an identifier per method (`operatorEqual` for
//! `operator==`). Symbols are replaced longest first, so `operator<=>`
//! becomes `operatorSpaceShip` and not `operatorLesserOrEqualGreater`.

/// Symbol table, ordered so that no entry is a prefix of a later one
/// that would match the same text.
const OPERATOR_SYMBOLS: [(&str, &str); 32] = [
    ("<=>", "SpaceShip"),
    ("<<=", "StreamLeftAssign"),
    (">>=", "StreamRightAssign"),
    ("->*", "PointerToMember"),
    ("co_await", "CoAwait"),
    ("==", "Equal"),
    ("!=", "NotEqual"),
    ("<=", "LesserOrEqual"),
    (">=", "GreaterOrEqual"),
    ("<<", "StreamLeft"),
    (">>", "StreamRight"),
    ("&&", "And"),
    ("||", "Or"),
    ("++", "Increment"),
    ("--", "Decrement"),
    ("->", "Arrow"),
    ("()", "Call"),
    ("[]", "Brackets"),
    ("+", "Plus"),
    ("-", "Minus"),
    ("*", "Ast"),
    ("/", "Div"),
    ("%", "Modulo"),
    ("^", "Caret"),
    ("&", "Amp"),
    ("|", "Pipe"),
    ("~", "Tilde"),
    ("!", "Not"),
    ("=", "Assign"),
    ("<", "Lesser"),
    (">", "Greater"),
    (",", "Comma"),
];

const OPERATOR: &str = "operator";

/// Whether `name` names an operator function (`operator+=`, `operator()`,
/// `operator int`), as opposed to an identifier like `operatorCount`.
#[must_use]
pub fn is_operator_name(name: &str) -> bool {
    name.strip_prefix(OPERATOR).is_some_and(|rest| {
        rest.chars()
            .next()
            .is_some_and(|c| c.is_whitespace() || !(c.is_alphanumeric() || c == '_'))
    })
}

/// Whether `name` is a symbolic operator whose symbol is in the table
/// (conversion operators and `operator new` are not).
#[must_use]
pub fn is_symbolic_operator(name: &str) -> bool {
    if !is_operator_name(name) {
        return false;
    }
    let symbol: String = name[OPERATOR.len()..]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if symbol == "co_await" {
        return true;
    }
    !symbol.is_empty()
        && !symbol.chars().any(|c| c.is_alphanumeric() || c == '_')
        && mangle_symbol(&symbol).chars().all(char::is_alphanumeric)
}

/// Mangle a method name into an identifier. Names that are not symbolic
/// operators are returned unchanged.
#[must_use]
pub fn mangle(name: &str) -> String {
    if !is_symbolic_operator(name) {
        return name.to_string();
    }
    let symbol: String = name[OPERATOR.len()..]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("{OPERATOR}{}", mangle_symbol(&symbol))
}

fn mangle_symbol(symbol: &str) -> String {
    let mut result = symbol.to_string();
    for (sym, word) in OPERATOR_SYMBOLS {
        result = result.replace(sym, word);
    }
    result
}
