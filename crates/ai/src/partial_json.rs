//! Lenient parsing of a JSON object that is still being streamed.
//!
//! The model answers with a single JSON object. While it streams, the buffer
//! is cut back to the last point where the document can be closed and then
//! closed, so each delta yields a best-effort [`PartialCheckInAnalysis`].

use serde_json::Value;

use cadence_core::checkins::{CheckInAnalysis, CheckInResource, PartialCheckInAnalysis};

use crate::error::CheckInError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Frame {
    Object { expect_key: bool },
    Array,
}

impl Frame {
    fn closer(&self) -> char {
        match self {
            Frame::Object { .. } => '}',
            Frame::Array => ']',
        }
    }
}

/// Removes a surrounding Markdown code fence, if any.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Closes a truncated JSON object so it parses.
///
/// An open string value is closed in place so text keeps growing between
/// snapshots; anything else incomplete (a dangling key, a half-written
/// literal, a trailing comma) is cut back to the last complete value.
/// Returns `None` until the opening brace has arrived.
pub fn repair_partial_json(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let body = &text[start..];

    let mut stack: Vec<Frame> = Vec::new();
    let mut safe: Option<(usize, Vec<Frame>)> = None;
    let mut in_string = false;
    let mut string_is_key = false;
    let mut escaped = false;

    for (i, c) in body.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
                if string_is_key {
                    if let Some(Frame::Object { expect_key }) = stack.last_mut() {
                        *expect_key = false;
                    }
                } else {
                    safe = Some((i + 1, stack.clone()));
                }
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                string_is_key = matches!(stack.last(), Some(Frame::Object { expect_key: true }));
            }
            '{' => {
                stack.push(Frame::Object { expect_key: true });
                safe = Some((i + 1, stack.clone()));
            }
            '[' => {
                stack.push(Frame::Array);
                safe = Some((i + 1, stack.clone()));
            }
            '}' | ']' => {
                stack.pop();
                if stack.is_empty() {
                    return Some(body[..=i].to_string());
                }
                safe = Some((i + 1, stack.clone()));
            }
            ',' => {
                // The value before the comma is complete (covers bare literals).
                let value_done = match stack.last() {
                    Some(Frame::Array) => true,
                    Some(Frame::Object { expect_key }) => !*expect_key,
                    None => false,
                };
                if value_done {
                    safe = Some((i, stack.clone()));
                }
                if let Some(Frame::Object { expect_key }) = stack.last_mut() {
                    *expect_key = true;
                }
            }
            _ => {}
        }
    }

    if in_string && !string_is_key {
        let mut repaired = body.to_string();
        if escaped {
            repaired.pop();
        }
        repaired.push('"');
        repaired.extend(stack.iter().rev().map(Frame::closer));
        return Some(repaired);
    }

    let (cut, frames) = safe?;
    let mut repaired = body[..cut].to_string();
    repaired.extend(frames.iter().rev().map(Frame::closer));
    Some(repaired)
}

/// Best-effort snapshot of a streaming analysis.
pub fn parse_partial_analysis(buffer: &str) -> Option<PartialCheckInAnalysis> {
    let repaired = repair_partial_json(buffer)?;
    let value: Value = serde_json::from_str(&repaired).ok()?;
    let object = value.as_object()?;

    let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
    let list = |key: &str| {
        object.get(key).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
    };
    // Resources still being written are skipped until they deserialize.
    let resources = object.get("resources").and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(|item| serde_json::from_value::<CheckInResource>(item.clone()).ok())
            .collect::<Vec<_>>()
    });

    Some(PartialCheckInAnalysis {
        overall_summary: text("overallSummary"),
        celebrations: list("celebrations"),
        insights: list("insights"),
        recommendations: list("recommendations"),
        resources,
        weekly_focus: text("weeklyFocus"),
        motivation: text("motivation"),
    })
}

/// Parses the complete model output.
pub fn parse_final_analysis(output: &str) -> Result<CheckInAnalysis, CheckInError> {
    let stripped = strip_code_fences(output);
    let json = match (stripped.find('{'), stripped.rfind('}')) {
        (Some(start), Some(end)) if end > start => &stripped[start..=end],
        _ => {
            return Err(CheckInError::generation(
                "model output did not contain a JSON object",
            ))
        }
    };
    serde_json::from_str(json)
        .map_err(|e| CheckInError::generation(format!("model output is not a valid analysis: {}", e)))
}
