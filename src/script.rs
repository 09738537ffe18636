//! Splits a multi-statement script into statement strings.

/// Splits `script` on `;` and newlines that sit outside quoted strings and
/// bracketed column names. Pieces are trimmed and empty pieces dropped.
///
/// ```
/// use ccl_lang::script::split_statements;
///
/// let parts = split_statements("A = 'x;y'; B = 1\n\n");
/// assert_eq!(parts, vec!["A = 'x;y'", "B = 1"]);
/// ```
pub fn split_statements(script: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut in_brackets = false;

    for (i, ch) in script.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, ']') if in_brackets => in_brackets = false,
            (None, _) if in_brackets => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '[') => in_brackets = true,
            (None, ';' | '\n') => {
                push_trimmed(&mut statements, &script[start..i]);
                start = i + ch.len_utf8();
            }
            (None, _) => {}
        }
    }
    push_trimmed(&mut statements, &script[start..]);

    statements
}

fn push_trimmed<'a>(statements: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        statements.push(piece);
    }
}
