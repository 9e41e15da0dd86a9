//! Regular expressions, in the syntax of the `regex` crate.
//!
//! `flags` is text made of single-letter switches:
//!
//! | flag | effect                                   |
//! |------|------------------------------------------|
//! | `i`  | ignore case                              |
//! | `m`  | `^` and `$` also match at line breaks    |
//! | `s`  | `.` also matches a newline               |
//! | `x`  | whitespace and `#` comments are ignored  |
//!
//! A `Null` flags value is the same as no flags.

use cil_value::errors::{invalid_regex, unknown_regex_flag};
use cil_value::{EvalError, EvalResult, Value};
use regex::{Captures, NoExpand, Regex, RegexBuilder};

use super::int_arg;
use super::strings::text;

fn compile(operation: &str, pattern: &Value, flags: Option<&Value>) -> Result<Regex, EvalError> {
    let pattern = text(operation, pattern)?;
    let mut builder = RegexBuilder::new(pattern);
    if let Some(flags) = flags.filter(|f| !matches!(f, Value::Null)) {
        for flag in text(operation, flags)?.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'x' => builder.ignore_whitespace(true),
                other => return Err(unknown_regex_flag(other)),
            };
        }
    }
    builder.build().map_err(|err| {
        // Syntax errors render over several lines; the last one names the problem.
        let rendered = err.to_string();
        let detail = rendered.lines().last().unwrap_or_default();
        invalid_regex(pattern, detail.trim_start_matches("error: "))
    })
}

/// True when the pattern matches anywhere in the text.
pub(crate) fn is_match(string: &Value, pattern: &Value, flags: Option<&Value>) -> EvalResult {
    let s = text("RegexMatch", string)?;
    let re = compile("RegexMatch", pattern, flags)?;
    Ok(Value::Bool(re.is_match(s)))
}

/// Every non-overlapping match, left to right. With one capture group the
/// group's text is collected instead of the whole match; with several, a
/// tuple of the groups.
pub(crate) fn find_all(string: &Value, pattern: &Value, flags: Option<&Value>) -> EvalResult {
    let s = text("RegexFindAll", string)?;
    let re = compile("RegexFindAll", pattern, flags)?;
    let groups = re.captures_len() - 1;
    let found = re
        .captures_iter(s)
        .map(|caps| match groups {
            0 => group_text(&caps, 0),
            1 => group_text(&caps, 1),
            _ => Value::tuple((1..=groups).map(|i| group_text(&caps, i)).collect()),
        })
        .collect();
    Ok(Value::array(found))
}

fn group_text(caps: &Captures<'_>, index: usize) -> Value {
    Value::string(caps.get(index).map_or("", |m| m.as_str()))
}

/// Replaces every match. The replacement is inserted literally.
pub(crate) fn replace(
    string: &Value,
    pattern: &Value,
    replacement: &Value,
    flags: Option<&Value>,
) -> EvalResult {
    let s = text("RegexReplace", string)?;
    let re = compile("RegexReplace", pattern, flags)?;
    let replacement = text("RegexReplace", replacement)?;
    Ok(Value::string(re.replace_all(s, NoExpand(replacement))))
}

/// Split at each match. Captured groups are kept between the pieces, with
/// `Null` for a group that did not take part. A positive `maxsplit` caps
/// the number of splits; a negative one disables splitting.
pub(crate) fn split(
    string: &Value,
    pattern: &Value,
    flags: Option<&Value>,
    maxsplit: Option<&Value>,
) -> EvalResult {
    let s = text("RegexSplit", string)?;
    let re = compile("RegexSplit", pattern, flags)?;
    let max = match maxsplit {
        None | Some(Value::Null) => usize::MAX,
        Some(n) => match int_arg("RegexSplit", n)? {
            0 => usize::MAX,
            n => usize::try_from(n).unwrap_or(0),
        },
    };

    let mut parts = Vec::new();
    let mut last = 0;
    for caps in re.captures_iter(s).take(max) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        parts.push(Value::string(&s[last..whole.start()]));
        for group in caps.iter().skip(1) {
            parts.push(group.map_or(Value::Null, |m| Value::string(m.as_str())));
        }
        last = whole.end();
    }
    parts.push(Value::string(&s[last..]));
    Ok(Value::array(parts))
}
