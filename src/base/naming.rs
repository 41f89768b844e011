//! Identifier text utilities: prefixes, casing, word splitting and templates.
//!
//! All functions are pure and operate on C# identifier text as written in
//! source. Nothing here knows about syntax trees.

use thiserror::Error;

/// A character counts as part of a word when it is a letter or digit.
///
/// Underscores are XID_Continue but act as word separators here.
#[inline]
fn is_word_char(c: char) -> bool {
    c != '_' && unicode_ident::is_xid_continue(c)
}

/// Whether `text` starts with a field-style prefix (`_name` or `mName`).
pub fn has_prefix(text: &str) -> bool {
    let mut chars = text.chars();
    let (Some(first), Some(second)) = (chars.next(), chars.next()) else {
        return false;
    };
    if first == '_' {
        return true;
    }
    first.is_lowercase() && second.is_uppercase()
}

/// Strips a single prefix character recognized by [`has_prefix`].
pub fn without_prefix(text: &str) -> &str {
    if has_prefix(text) {
        let mut chars = text.chars();
        chars.next();
        chars.as_str()
    } else {
        text
    }
}

/// Upper-cases the first character.
pub fn to_upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-cases the first character.
pub fn to_lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Removes the first postfix in `postfixes` that `text` ends with (ordinal).
pub fn remove_postfix<'a>(text: &'a str, postfixes: &[&str]) -> &'a str {
    postfixes
        .iter()
        .find_map(|postfix| text.strip_suffix(postfix))
        .unwrap_or(text)
}

/// Replaces a trailing `suffix` with `replacement`.
///
/// Returns `None` when `name` does not end with `suffix`.
///
/// # Example
/// ```
/// use devassist::base::naming::replace_suffix;
///
/// assert_eq!(
///     replace_suffix("CreateInvoiceCommand", "Command", "CommandHandler").as_deref(),
///     Some("CreateInvoiceCommandHandler")
/// );
/// assert_eq!(replace_suffix("Invoice", "Command", "CommandHandler"), None);
/// ```
pub fn replace_suffix(name: &str, suffix: &str, replacement: &str) -> Option<String> {
    let stem = name.strip_suffix(suffix)?;
    Some(format!("{stem}{replacement}"))
}

/// Splits an identifier into words on casing and punctuation boundaries.
///
/// Every upper-case character starts a new word and every non letter/digit
/// character ends one, so `HTTPServer` yields `H T T P Server`.
pub fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if !is_word_char(c) {
            if i > start {
                words.push(&text[start..i]);
            }
            start = i + c.len_utf8();
        } else if c.is_uppercase() {
            if i > start {
                words.push(&text[start..i]);
            }
            start = i;
        }
    }

    if start < text.len() {
        words.push(&text[start..]);
    }

    words
}

/// Fuzzy similarity between two identifiers.
///
/// | score | meaning |
/// |-------|---------|
/// | 1.0 | identical |
/// | 0.9 | equal ignoring case |
/// | 0.8 | equal ignoring case once field prefixes are stripped |
/// | 0.7 | same word sequence ignoring case |
/// | 0.0 | anything else |
pub fn approximately_equals(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase() {
        return 0.9;
    }

    let a = without_prefix(a);
    let b = without_prefix(b);
    if a.to_lowercase() == b.to_lowercase() {
        return 0.8;
    }

    let a_words = split_words(a);
    let b_words = split_words(b);
    if a_words.len() == b_words.len()
        && a_words
            .iter()
            .zip(&b_words)
            .all(|(x, y)| x.to_lowercase() == y.to_lowercase())
    {
        return 0.7;
    }

    0.0
}

/// Failure to resolve a positional template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template references `{index}` but fewer arguments were supplied.
    #[error("template `{template}` references argument {index} but only {supplied} supplied")]
    MissingArgument {
        template: String,
        index: usize,
        supplied: usize,
    },

    /// Unbalanced or non-numeric placeholder.
    #[error("malformed placeholder in template `{0}`")]
    Malformed(String),
}

/// Substitutes `{0}`, `{1}`, ... with `args`. `{{` and `}}` escape braces.
///
/// A template is only ever emitted fully resolved: a placeholder without a
/// matching argument is an error rather than being left in the output.
///
/// # Example
/// ```
/// use devassist::base::naming::format_positional;
///
/// assert_eq!(
///     format_positional("Aurora.{0}.Domain", &["Billing"]).unwrap(),
///     "Aurora.Billing.Domain"
/// );
/// assert!(format_positional("Aurora.{0}.{1}", &["Billing"]).is_err());
/// ```
pub fn format_positional(template: &str, args: &[&str]) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut chars = template.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        match c {
            '{' if chars.peek().map(|&(_, n)| n) == Some('{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek().map(|&(_, n)| n) == Some('}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, d)) if d.is_ascii_digit() => digits.push(d),
                        _ => return Err(TemplateError::Malformed(template.to_string())),
                    }
                }
                let index: usize = digits
                    .parse()
                    .map_err(|_| TemplateError::Malformed(template.to_string()))?;
                let arg = args.get(index).ok_or_else(|| TemplateError::MissingArgument {
                    template: template.to_string(),
                    index,
                    supplied: args.len(),
                })?;
                out.push_str(arg);
            }
            '}' => return Err(TemplateError::Malformed(template.to_string())),
            other => out.push(other),
        }
    }

    Ok(out)
}
