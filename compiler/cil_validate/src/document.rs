//! The document envelope: version, ambiguities and body.

use cil_ir::{unsupported_version_message, Version};
use serde_json::{Map, Value as Json};

use crate::functions::{collect_arities, collect_import_aliases};
use crate::walker::Walker;
use crate::Violation;

pub(crate) fn validate_document(doc: &Json) -> Vec<Violation> {
    let mut violations = Vec::new();
    let Json::Object(root) = doc else {
        violations.push(violation("$", "document must be an object"));
        return violations;
    };

    let version = root
        .get("version")
        .and_then(Json::as_str)
        .and_then(Version::from_label);
    if version.is_none() {
        violations.push(violation("$.version", unsupported_version_message()));
    }

    match root.get("ambiguities") {
        None | Some(Json::Null) => {}
        Some(Json::Array(items)) => {
            for (i, item) in items.iter().enumerate() {
                check_ambiguity(item, &format!("$.ambiguities[{i}]"), &mut violations);
            }
        }
        Some(_) => violations.push(violation("$.ambiguities", "ambiguities must be a list")),
    }

    let Some(Json::Array(body)) = root.get("body") else {
        violations.push(violation("$.body", "body must be a list"));
        return violations;
    };

    let mut walker = Walker::new(
        version,
        collect_arities(body),
        collect_import_aliases(body),
        violations,
    );
    walker.top_level(body);
    walker.finish()
}

fn check_ambiguity(item: &Json, path: &str, out: &mut Vec<Violation>) {
    let Json::Object(item) = item else {
        out.push(violation(path, "ambiguity item must be an object"));
        return;
    };

    if !is_non_empty_str(item.get("question")) {
        out.push(violation(
            &format!("{path}.question"),
            "missing or invalid question",
        ));
    }

    let options = match item.get("options") {
        Some(Json::Array(options)) if !options.is_empty() => Some(options),
        _ => {
            out.push(violation(
                &format!("{path}.options"),
                "missing or invalid options",
            ));
            None
        }
    };
    if let Some(options) = options {
        for (j, option) in options.iter().enumerate() {
            if !is_non_empty_str(Some(option)) {
                out.push(violation(
                    &format!("{path}.options[{j}]"),
                    "option must be a non-empty string",
                ));
            }
        }
    }

    check_default(item, path, options.map(Vec::len), out);
}

fn check_default(item: &Map<String, Json>, path: &str, options: Option<usize>, out: &mut Vec<Violation>) {
    let Some(default) = item.get("default").and_then(Json::as_i64) else {
        out.push(violation(
            &format!("{path}.default"),
            "missing or invalid default",
        ));
        return;
    };
    if let Some(count) = options {
        if usize::try_from(default).map_or(true, |d| d >= count) {
            out.push(violation(
                &format!("{path}.default"),
                "default must be a valid option index",
            ));
        }
    }
}

fn is_non_empty_str(value: Option<&Json>) -> bool {
    value
        .and_then(Json::as_str)
        .is_some_and(|s| !s.is_empty())
}

pub(crate) fn violation(path: &str, message: impl Into<String>) -> Violation {
    Violation {
        path: path.to_string(),
        message: message.into(),
    }
}
