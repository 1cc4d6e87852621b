/// Characters that separate tokens: space, tab, CR, LF and BEL.
pub const DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', '\x07'];

/// Room reserved for tokens before the vector has to grow.
pub const TOKEN_BUFSIZE: usize = 64;

/// Returns the text between the first `"` in `line` and the next one after it.
pub fn quoted_span(line: &str) -> Option<String> {
    let (_, rest) = line.split_once('"')?;
    let (inner, _) = rest.split_once('"')?;
    Some(inner.to_owned())
}

/// Splits `line` on runs of delimiters, then lets the first quoted span
/// replace a single argument slot.
///
/// The slot is 2 when the command name starts with `g` (so `grep PATTERN
/// "some file"` keeps its pattern), and 1 for everything else. Quote
/// characters are not delimiters, so the other tokens keep them. If the slot
/// lies past the last token the quoted text is appended instead.
pub fn tokenize(line: &str) -> Vec<String> {
    let quoted = quoted_span(line);

    let mut tokens = Vec::with_capacity(TOKEN_BUFSIZE);
    tokens.extend(
        line.split(DELIMITERS)
            .filter(|t| !t.is_empty())
            .map(str::to_owned),
    );

    if let Some(quoted) = quoted {
        let slot = match tokens.first() {
            Some(cmd) if cmd.starts_with('g') => 2,
            _ => 1,
        };
        match tokens.get_mut(slot) {
            Some(token) => *token = quoted,
            None => tokens.push(quoted),
        }
    }

    tokens
}
