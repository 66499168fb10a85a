//! Escaping of Markdown-significant characters

/// Escape Markdown-significant characters in raw text.
///
/// Every `\`, `` ` ``, `*`, `_`, `[` and `]` gets a leading backslash so raw
/// text can never turn into emphasis, code, or link syntax.
pub fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}

/// Escape live runs of `delimiter` in already rendered inline Markdown.
///
/// A run is escaped when `escape_run` returns true for its length. A delimiter
/// that is already preceded by an odd number of backslashes is literal and
/// left alone, and code spans are copied through untouched.
pub fn escape_delimiter_runs<F>(content: &str, delimiter: char, escape_run: F) -> String
where
    F: Fn(usize) -> bool,
{
    let chars: Vec<char> = content.chars().collect();
    let mut out = String::with_capacity(content.len());
    let mut backslashes = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let escaped = backslashes % 2 == 1;

        if c == '`' && !escaped {
            let run = run_length(&chars, i, '`');
            let end = closing_backticks(&chars, i + run, run).unwrap_or(i + run);
            out.extend(&chars[i..end]);
            i = end;
            backslashes = 0;
            continue;
        }

        if c == delimiter {
            let run = run_length(&chars, i, delimiter);
            let (literal, live) = if escaped { (1, run - 1) } else { (0, run) };
            for _ in 0..literal {
                out.push(delimiter);
            }
            let escape = live > 0 && escape_run(live);
            for _ in 0..live {
                if escape {
                    out.push('\\');
                }
                out.push(delimiter);
            }
            i += run;
            backslashes = 0;
            continue;
        }

        if c == '\\' {
            backslashes += 1;
        } else {
            backslashes = 0;
        }
        out.push(c);
        i += 1;
    }

    out
}

fn run_length(chars: &[char], start: usize, c: char) -> usize {
    chars[start..].iter().take_while(|&&x| x == c).count()
}

/// Index just past the backtick run of exactly `len` that closes a code span
fn closing_backticks(chars: &[char], from: usize, len: usize) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        if chars[i] == '`' {
            let run = run_length(chars, i, '`');
            if run == len {
                return Some(i + run);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

/// Length of the longest run of `c` in `text`
pub(crate) fn longest_run(text: &str, c: char) -> usize {
    text.chars()
        .fold((0, 0), |(max, current), x| {
            if x == c {
                (max.max(current + 1), current + 1)
            } else {
                (max, 0)
            }
        })
        .0
}
