use super::finger::{Finger, FingerId, Hand, KeyPosition, Modifier};
use crate::error::{KcResult, KeyComfortError};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

/// Raw rule table as it arrives from an adapter: symbol -> number | list | object.
pub type RawRuleTable = Map<String, Value>;

/// Where a symbol sits under an extended rule.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyAssignment {
    pub penalty: f64,
    pub finger: FingerId,
    pub position: Option<KeyPosition>,
    pub modifiers: Vec<Modifier>,
}

/// One symbol's rule. Shape is resolved once here so nothing downstream
/// needs to look at the raw table again.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutRule {
    /// Legacy: penalty only.
    Scalar(f64),
    /// Penalty plus the finger (and optionally key position / modifiers).
    Extended(KeyAssignment),
}

impl LayoutRule {
    #[inline(always)]
    pub fn penalty(&self) -> f64 {
        match self {
            LayoutRule::Scalar(p) => *p,
            LayoutRule::Extended(a) => a.penalty,
        }
    }

    #[inline(always)]
    pub fn finger(&self) -> Option<FingerId> {
        match self {
            LayoutRule::Scalar(_) => None,
            LayoutRule::Extended(a) => Some(a.finger),
        }
    }

    pub fn assignment(&self) -> Option<&KeyAssignment> {
        match self {
            LayoutRule::Scalar(_) => None,
            LayoutRule::Extended(a) => Some(a),
        }
    }
}

/// Immutable symbol -> rule mapping for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutModel {
    pub name: String,
    rules: HashMap<char, LayoutRule>,
}

impl LayoutModel {
    /// Parses a rule table. Fails on the first malformed entry.
    pub fn parse(raw: &RawRuleTable) -> KcResult<Self> {
        if raw.is_empty() {
            return Err(KeyComfortError::invalid_rule("", "rule table is empty"));
        }

        let mut rules = HashMap::with_capacity(raw.len());
        for (key, value) in raw {
            let symbol = parse_symbol(key)?;
            let rule = parse_rule(key, value)?;
            rules.insert(symbol, rule);
        }

        let extended = rules
            .values()
            .filter(|r| matches!(r, LayoutRule::Extended(_)))
            .count();
        debug!(
            "Parsed layout: {} rules ({} extended, {} legacy)",
            rules.len(),
            extended,
            rules.len() - extended
        );

        Ok(Self {
            name: String::new(),
            rules,
        })
    }

    /// Accepts either the table itself or a document holding it under
    /// `"layout"` or `"rules"`.
    pub fn from_json_value(doc: &Value) -> KcResult<Self> {
        let obj = doc
            .as_object()
            .ok_or_else(|| KeyComfortError::invalid_rule("", "rule table must be a JSON object"))?;

        for key in ["layout", "rules"] {
            if let Some(Value::Object(inner)) = obj.get(key) {
                return Self::parse(inner);
            }
        }
        Self::parse(obj)
    }

    /// Builds a model from already-typed rules, applying the same checks as `parse`.
    pub fn from_rules<I>(rules: I) -> KcResult<Self>
    where
        I: IntoIterator<Item = (char, LayoutRule)>,
    {
        let rules: HashMap<char, LayoutRule> = rules.into_iter().collect();
        if rules.is_empty() {
            return Err(KeyComfortError::invalid_rule("", "rule table is empty"));
        }
        for (symbol, rule) in &rules {
            check_penalty(&symbol.to_string(), rule.penalty())?;
        }
        Ok(Self {
            name: String::new(),
            rules,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline(always)]
    pub fn get(&self, symbol: char) -> Option<&LayoutRule> {
        self.rules.get(&symbol)
    }

    #[inline(always)]
    pub fn assignment(&self, symbol: char) -> Option<&KeyAssignment> {
        self.rules.get(&symbol).and_then(LayoutRule::assignment)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True when at least one rule carries a finger.
    pub fn has_fingers(&self) -> bool {
        self.rules.values().any(|r| r.finger().is_some())
    }

    /// Rules in symbol order.
    pub fn iter_sorted(&self) -> Vec<(char, &LayoutRule)> {
        let mut entries: Vec<_> = self.rules.iter().map(|(c, r)| (*c, r)).collect();
        entries.sort_by_key(|(c, _)| *c);
        entries
    }
}

fn parse_symbol(key: &str) -> KcResult<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        (None, _) => Err(KeyComfortError::invalid_rule(key, "symbol key is empty")),
        _ => Err(KeyComfortError::invalid_rule(
            key,
            "symbol key must be a single character",
        )),
    }
}

fn check_penalty(symbol: &str, p: f64) -> KcResult<f64> {
    if !p.is_finite() {
        return Err(KeyComfortError::invalid_rule(symbol, "penalty is not finite"));
    }
    if p < 0.0 {
        return Err(KeyComfortError::invalid_rule(
            symbol,
            format!("penalty {} is negative", p),
        ));
    }
    Ok(p)
}

fn parse_penalty(symbol: &str, value: &Value) -> KcResult<f64> {
    match value.as_f64() {
        Some(p) => check_penalty(symbol, p),
        None => Err(KeyComfortError::invalid_rule(
            symbol,
            format!("penalty must be a number, got {}", value),
        )),
    }
}

fn parse_finger_tag(symbol: &str, tag: &str, hand: Option<Hand>) -> KcResult<FingerId> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(KeyComfortError::invalid_rule(symbol, "finger tag is empty"));
    }
    if let Ok(id) = FingerId::from_str(tag) {
        return Ok(id);
    }
    // Object form may split the hand out into its own field.
    if let (Some(hand), Ok(finger)) = (hand, Finger::from_str(tag)) {
        return Ok(FingerId::new(hand, finger));
    }
    Err(KeyComfortError::invalid_rule(
        symbol,
        format!("unrecognized finger tag '{}'", tag),
    ))
}

fn parse_modifier(symbol: &str, value: &Value) -> KcResult<Modifier> {
    let name = value.as_str().ok_or_else(|| {
        KeyComfortError::invalid_rule(symbol, format!("modifier must be a string, got {}", value))
    })?;
    Modifier::from_str(name.trim())
        .map_err(|_| KeyComfortError::invalid_rule(symbol, format!("unknown modifier '{}'", name)))
}

fn parse_coord(symbol: &str, value: &Value, what: &str) -> KcResult<i32> {
    value
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| {
            KeyComfortError::invalid_rule(symbol, format!("{} must be an integer, got {}", what, value))
        })
}

fn parse_rule(symbol: &str, value: &Value) -> KcResult<LayoutRule> {
    match value {
        Value::Array(items) => parse_list_rule(symbol, items),
        Value::Object(fields) => parse_object_rule(symbol, fields),
        other => parse_penalty(symbol, other).map(LayoutRule::Scalar),
    }
}

/// `[penalty, finger, (row, column)?, modifier*]`
fn parse_list_rule(symbol: &str, items: &[Value]) -> KcResult<LayoutRule> {
    let Some(first) = items.first() else {
        return Err(KeyComfortError::invalid_rule(symbol, "rule list is empty"));
    };
    let penalty = parse_penalty(symbol, first)?;

    let Some(tag) = items.get(1) else {
        return Ok(LayoutRule::Scalar(penalty));
    };
    let tag = tag.as_str().ok_or_else(|| {
        KeyComfortError::invalid_rule(symbol, format!("finger tag must be a string, got {}", tag))
    })?;
    let finger = parse_finger_tag(symbol, tag, None)?;

    let mut rest = &items[2..];
    let mut position = None;
    if rest.first().is_some_and(Value::is_number) {
        let (Some(row), Some(col)) = (rest.first(), rest.get(1)) else {
            return Err(KeyComfortError::invalid_rule(
                symbol,
                "row given without column",
            ));
        };
        position = Some(KeyPosition {
            row: parse_coord(symbol, row, "row")?,
            column: parse_coord(symbol, col, "column")?,
        });
        rest = &rest[2..];
    }

    let modifiers = rest
        .iter()
        .map(|m| parse_modifier(symbol, m))
        .collect::<KcResult<Vec<_>>>()?;

    Ok(LayoutRule::Extended(KeyAssignment {
        penalty,
        finger,
        position,
        modifiers,
    }))
}

/// `{ "penalty": n, "finger": tag, "hand": h, "row": r, "column": c, "modifiers": [..] }`
fn parse_object_rule(symbol: &str, fields: &Map<String, Value>) -> KcResult<LayoutRule> {
    let penalty = match fields.get("penalty") {
        Some(v) => parse_penalty(symbol, v)?,
        None => {
            return Err(KeyComfortError::invalid_rule(
                symbol,
                "rule object has no 'penalty'",
            ))
        }
    };

    let Some(tag) = fields.get("finger") else {
        return Ok(LayoutRule::Scalar(penalty));
    };
    let tag = tag.as_str().ok_or_else(|| {
        KeyComfortError::invalid_rule(symbol, format!("finger tag must be a string, got {}", tag))
    })?;
    let hand = fields
        .get("hand")
        .and_then(Value::as_str)
        .and_then(|h| Hand::from_str(h.trim()).ok());
    let finger = parse_finger_tag(symbol, tag, hand)?;

    let row = fields.get("row").map(|v| parse_coord(symbol, v, "row")).transpose()?;
    let column = fields
        .get("column")
        .map(|v| parse_coord(symbol, v, "column"))
        .transpose()?;
    let position = match (row, column) {
        (None, None) => None,
        (r, c) => Some(KeyPosition {
            row: r.unwrap_or(0),
            column: c.unwrap_or(0),
        }),
    };

    let modifiers = match fields.get("modifiers") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(list)) => list
            .iter()
            .map(|m| parse_modifier(symbol, m))
            .collect::<KcResult<Vec<_>>>()?,
        Some(other) => {
            return Err(KeyComfortError::invalid_rule(
                symbol,
                format!("modifiers must be a list, got {}", other),
            ))
        }
    };

    Ok(LayoutRule::Extended(KeyAssignment {
        penalty,
        finger,
        position,
        modifiers,
    }))
}
