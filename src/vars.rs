// src/vars.rs

//! Extra variables passed to the playbook via `--extra-vars`.
//!
//! Two sources feed the final mapping:
//! 1. `ansible.default_extra_vars` from the config file,
//! 2. `--extra-vars` tokens from the command line.
//!
//! The command line wins key by key; keys already present keep their
//! original position so the rendered JSON stays stable.

use std::io;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};

use crate::errors::{Result, RunnerError};

/// Insertion-ordered variable mapping.
pub type ExtraVars = IndexMap<String, Value>;

/// Parse `--extra-vars` tokens.
///
/// - a single token wrapped in `{ ... }` is parsed as a JSON object;
/// - otherwise every token must be `key=value` (split at the first `=`), and
///   values are kept as strings.
pub fn parse_cli_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<ExtraVars> {
    let mut vars = ExtraVars::new();

    if let [single] = tokens {
        let single = single.as_ref().trim();
        if single.starts_with('{') && single.ends_with('}') {
            let parsed: Map<String, Value> = serde_json::from_str(single).map_err(|e| {
                RunnerError::InvalidExtraVars(format!("invalid JSON object: {e}"))
            })?;
            vars.extend(parsed);
            return Ok(vars);
        }
    }

    for token in tokens {
        let token = token.as_ref();
        let Some((key, value)) = token.split_once('=') else {
            return Err(RunnerError::InvalidExtraVars(format!(
                "'{token}' is not in key=value form (e.g. host=web01)"
            )));
        };
        if key.is_empty() {
            return Err(RunnerError::InvalidExtraVars(format!(
                "'{token}' has an empty key"
            )));
        }
        vars.insert(key.to_string(), Value::String(value.to_string()));
    }

    Ok(vars)
}

/// Merge `overrides` into a copy of `defaults`, override wins per key.
pub fn merge(defaults: &ExtraVars, overrides: ExtraVars) -> ExtraVars {
    let mut merged = defaults.clone();
    for (key, value) in overrides {
        merged.insert(key, value);
    }
    merged
}

/// Render the mapping as the `--extra-vars` argument.
///
/// Keys keep insertion order and separators are `", "` / `": "`, e.g.
/// `{"env": "prod", "replicas": 3}`.
pub fn to_json(vars: &ExtraVars) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    vars.serialize(&mut ser)
        .map_err(|e| RunnerError::InvalidExtraVars(format!("cannot serialize: {e}")))?;
    // serde_json only ever emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Compact JSON with a space after every `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}
