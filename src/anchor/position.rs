// Legacy position values look like jQuery UI's `{ my: "...", at: "..." }`.
// Only `at` decides the placement; `my` and `of` are accepted and ignored.

use serde_json::Value;
use thiserror::Error;

use super::{Anchor, AxisAnchor};
use crate::dialogwm::Length;

#[derive(Error, Debug, PartialEq)]
pub enum PositionError {
    #[error("unknown position keyword {0:?}")]
    UnknownKeyword(String),
    #[error("invalid offset {0:?}")]
    InvalidOffset(String),
    #[error("center does not take an offset: {0:?}")]
    CenterOffset(String),
    #[error("expected a string or an object with `at`")]
    UnexpectedValue,
}

#[derive(Clone, Copy, PartialEq)]
enum Axis {
    Horizontal,
    Vertical,
}

pub fn parse_position(value: &Value) -> Result<Anchor, PositionError> {
    match value {
        Value::String(at) => parse_at(at),
        Value::Object(map) => match map.get("at").or_else(|| map.get("my")) {
            Some(Value::String(at)) => parse_at(at),
            Some(_) => Err(PositionError::UnexpectedValue),
            None => Ok(Anchor::Centered),
        },
        _ => Err(PositionError::UnexpectedValue),
    }
}

pub fn parse_at(at: &str) -> Result<Anchor, PositionError> {
    let mut tokens = at.split_whitespace();
    let first = tokens.next().unwrap_or("center");
    let second = tokens.next();

    let (horizontal, vertical) = match second {
        Some(second) => (
            parse_token(first, Axis::Horizontal)?,
            parse_token(second, Axis::Vertical)?,
        ),
        // a single keyword names one axis, the other one is centered
        None => match parse_token(first, Axis::Horizontal) {
            Ok(h) => (h, AxisAnchor::Center),
            Err(_) => (AxisAnchor::Center, parse_token(first, Axis::Vertical)?),
        },
    };

    if horizontal == AxisAnchor::Center && vertical == AxisAnchor::Center {
        return Ok(Anchor::Centered);
    }
    Ok(Anchor::edges(horizontal, vertical))
}

fn parse_token(token: &str, axis: Axis) -> Result<AxisAnchor, PositionError> {
    let split = token.find(|c: char| c == '+' || c == '-').unwrap_or(token.len());
    let (keyword, offset) = token.split_at(split);
    let (start, end) = match axis {
        Axis::Horizontal => ("left", "right"),
        Axis::Vertical => ("top", "bottom"),
    };

    if keyword == "center" {
        if !offset.is_empty() {
            return Err(PositionError::CenterOffset(token.to_string()));
        }
        return Ok(AxisAnchor::Center);
    }
    let offset = parse_offset(offset)?;
    if keyword == start {
        Ok(AxisAnchor::Start(offset))
    } else if keyword == end {
        Ok(AxisAnchor::End(offset))
    } else {
        Err(PositionError::UnknownKeyword(keyword.to_string()))
    }
}

fn parse_offset(raw: &str) -> Result<Length, PositionError> {
    if raw.is_empty() {
        return Ok(Length::Px(0));
    }
    let digits = raw.trim_start_matches(|c: char| c == '+' || c == '-');
    let invalid = || PositionError::InvalidOffset(raw.to_string());

    for unit in ["%", "vh", "vw"] {
        if let Some(number) = digits.strip_suffix(unit) {
            let pct: f64 = number.parse().map_err(|_| invalid())?;
            return Ok(Length::Percent(pct.abs()));
        }
    }
    let number = digits.strip_suffix("px").unwrap_or(digits);
    let px: i32 = number.parse().map_err(|_| invalid())?;
    Ok(Length::Px(px.abs()))
}
