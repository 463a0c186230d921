// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Validation and coercion of raw settings payloads.
//!
//! The map client sends numbers either as JSON numbers or as strings
//! (`"48"`, `"5.5"`), so values are coerced the way the client's own
//! JavaScript would read them: integers with `parseInt` prefix rules,
//! the timezone offset with `parseFloat` prefix rules. Non-string values
//! are stringified first, as JavaScript does (`[7]` reads as `"7"`, `5e-7`
//! as `"5e-7"`).
//!
//! ## Required fields
//!
//! `general.timezone` only has to be present (`0` is a real offset). An
//! explicit `null` is present; it does not parse and falls back to `0.0`.
//! `pastDataHours`, `dataRefresh`, `pastTrail.hours` and `pastTrail.plotSize`
//! must be *truthy*: `0`, `""`, `false` and `null` count as missing. A
//! numeric string such as `"0"` is truthy and coerces to `0`, which then
//! falls back to the field default.

use serde_json::{Map, Value};

use crate::error::ServiceError;
use crate::storage::{GeneralSettings, PastTrailSettings};

pub const DEFAULT_PAST_DATA_HOURS: u32 = 24;
pub const DEFAULT_DATA_REFRESH: u32 = 5;
pub const DEFAULT_TRAIL_HOURS: u32 = 24;
pub const DEFAULT_TIMEZONE_OFFSET: f64 = 0.0;
pub const DEFAULT_PLOT_SIZE: &str = "Small";

pub const MIN_TIMEZONE_OFFSET: f64 = -12.0;
pub const MAX_TIMEZONE_OFFSET: f64 = 14.0;

/// Coerced `general` and `pastTrail` sections, ready to store.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsUpdate {
    pub general: GeneralSettings,
    pub past_trail: PastTrailSettings,
}

/// JavaScript truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy_field(section: &Map<String, Value>, name: &str) -> bool {
    section.get(name).is_some_and(is_truthy)
}

fn present_field(section: &Map<String, Value>, name: &str) -> bool {
    section.contains_key(name)
}

/// Validate and coerce the `settings` object of a save request.
pub fn parse_settings(raw: &Value) -> Result<SettingsUpdate, ServiceError> {
    let general = raw
        .get("general")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            ServiceError::InvalidInput(
                "Invalid settings structure. General section is required.".to_string(),
            )
        })?;
    let past_trail = raw
        .get("pastTrail")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            ServiceError::InvalidInput(
                "Invalid settings structure. Past trail section is required.".to_string(),
            )
        })?;

    let complete = truthy_field(general, "pastDataHours")
        && truthy_field(general, "dataRefresh")
        && present_field(general, "timezone")
        && truthy_field(past_trail, "hours")
        && truthy_field(past_trail, "plotSize");
    if !complete {
        return Err(ServiceError::InvalidInput(
            "Missing required settings fields".to_string(),
        ));
    }

    let timezone_offset_hours = coerce_timezone(&general["timezone"])?;

    Ok(SettingsUpdate {
        general: GeneralSettings {
            past_data_hours: coerce_count(
                "pastDataHours",
                &general["pastDataHours"],
                DEFAULT_PAST_DATA_HOURS,
            )?,
            data_refresh: coerce_count("dataRefresh", &general["dataRefresh"], DEFAULT_DATA_REFRESH)?,
            timezone_offset_hours,
        },
        past_trail: PastTrailSettings {
            hours: coerce_count("pastTrail.hours", &past_trail["hours"], DEFAULT_TRAIL_HOURS)?,
            plot_size: coerce_plot_size(&past_trail["plotSize"]),
        },
    })
}

/// Coerce a positive integer field, falling back to `default` when the value
/// does not parse or parses to zero.
fn coerce_count(field: &str, value: &Value, default: u32) -> Result<u32, ServiceError> {
    match parse_int(value) {
        None | Some(0) => Ok(default),
        Some(n) => u32::try_from(n).map_err(|_| {
            ServiceError::OutOfRange(format!("Invalid {field}. Must be a positive integer"))
        }),
    }
}

fn coerce_timezone(value: &Value) -> Result<f64, ServiceError> {
    let offset = match parse_float(value) {
        // also folds -0.0 into 0.0
        Some(f) if f != 0.0 => f,
        _ => DEFAULT_TIMEZONE_OFFSET,
    };

    if !(MIN_TIMEZONE_OFFSET..=MAX_TIMEZONE_OFFSET).contains(&offset) {
        return Err(ServiceError::OutOfRange(
            "Invalid timezone offset. Must be between -12.0 and +14.0".to_string(),
        ));
    }
    Ok(offset)
}

/// Scalars are stringified; arrays and objects have no string form to
/// store and fall back to the default.
fn coerce_plot_size(value: &Value) -> String {
    match value {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(_) | Value::Bool(_) => js_string(value),
        _ => DEFAULT_PLOT_SIZE.to_string(),
    }
}

// =============================================================================
// parseInt / parseFloat
// =============================================================================

/// `String(value)` for a JSON value.
fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.as_f64().map(js_float_string).unwrap_or_else(|| n.to_string()),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// `String(f)`: plain decimal for exponents in [-6, 21), exponent form
/// (`5e-7`, `1.5e+21`) outside it.
fn js_float_string(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let scientific = format!("{f:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return f.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if (-6..21).contains(&exponent) {
        f.to_string()
    } else if exponent > 0 {
        format!("{mantissa}e+{exponent}")
    } else {
        format!("{mantissa}e{exponent}")
    }
}

fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) if n.is_i64() => n.as_i64(),
        Value::String(s) => parse_int_prefix(s),
        other => parse_int_prefix(&js_string(other)),
    }
}

fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        other => parse_float_prefix(&js_string(other)),
    }
}

/// Split an optional leading sign off `s`, returning (is_negative, rest).
fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    }
}

/// Longest-prefix integer parse: leading whitespace, optional sign, then
/// decimal digits (or hex digits after `0x`). Saturates on overflow.
fn parse_int_prefix(s: &str) -> Option<i64> {
    let (negative, rest) = split_sign(s.trim_start());

    let (radix, digits) = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(hex) => (16, hex),
        None => (10, rest),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else { break };
        seen_digit = true;
        value = value.saturating_mul(i64::from(radix)).saturating_add(i64::from(d));
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Longest-prefix float parse: leading whitespace, optional sign, then
/// `Infinity` or `digits[.digits][e[sign]digits]`.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let trimmed = s.trim_start();
    let (negative, rest) = split_sign(trimmed);

    if rest.starts_with("Infinity") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let bytes = rest.as_bytes();
    let mut end = 0;
    let mut mantissa_digits = 0;

    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts if at least one digit follows
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    let magnitude: f64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
