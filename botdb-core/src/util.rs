pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Cuts `value` to at most `max` bytes without splitting a character.
pub fn truncate_at_boundary(value: &str, max: usize) -> &str {
    if value.len() <= max {
        return value;
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[macro_export]
macro_rules! possibly_parenthesized {
    ($buff:ident, $cond:expr, $v:expr) => {
        if $cond {
            $buff.push('(');
            $v;
            $buff.push(')');
        } else {
            $v;
        }
    };
}

/// Shortens long queries before they end up in logs and error messages.
#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {{
        let query = &$query;
        let query: &str = ::std::convert::AsRef::<str>::as_ref(query);
        format!(
            "{}{}",
            $crate::truncate_at_boundary(query, 497).trim_end(),
            if query.len() > 497 { "..." } else { "" },
        )
    }};
}
