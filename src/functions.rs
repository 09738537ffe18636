//! The closed set of built-in functions.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};

use crate::value::Value;

/// Accepted argument counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::Range(lo, hi) => (lo..=hi).contains(&count),
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{}", n),
            Arity::Range(lo, hi) => write!(f, "{} to {}", lo, hi),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    If,
    IfNil,
    And,
    Or,
    Not,
    IsNil,
    Concat,
    Abs,
    Round,
    Len,
    Upper,
    Lower,
}

impl Builtin {
    /// Case-insensitive lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "IF" => Some(Builtin::If),
            "IFNIL" => Some(Builtin::IfNil),
            "AND" => Some(Builtin::And),
            "OR" => Some(Builtin::Or),
            "NOT" => Some(Builtin::Not),
            "ISNIL" => Some(Builtin::IsNil),
            "CONCAT" => Some(Builtin::Concat),
            "ABS" => Some(Builtin::Abs),
            "ROUND" => Some(Builtin::Round),
            "LEN" => Some(Builtin::Len),
            "UPPER" => Some(Builtin::Upper),
            "LOWER" => Some(Builtin::Lower),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::If => "IF",
            Builtin::IfNil => "IFNIL",
            Builtin::And => "AND",
            Builtin::Or => "OR",
            Builtin::Not => "NOT",
            Builtin::IsNil => "ISNIL",
            Builtin::Concat => "CONCAT",
            Builtin::Abs => "ABS",
            Builtin::Round => "ROUND",
            Builtin::Len => "LEN",
            Builtin::Upper => "UPPER",
            Builtin::Lower => "LOWER",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Builtin::If => Arity::Exactly(3),
            Builtin::IfNil => Arity::Exactly(2),
            Builtin::And | Builtin::Or | Builtin::Concat => Arity::AtLeast(1),
            Builtin::Round => Arity::Range(1, 2),
            Builtin::Not
            | Builtin::IsNil
            | Builtin::Abs
            | Builtin::Len
            | Builtin::Upper
            | Builtin::Lower => Arity::Exactly(1),
        }
    }

    /// Whether the evaluator must hand over unevaluated arguments.
    pub fn is_lazy(self) -> bool {
        matches!(self, Builtin::If | Builtin::IfNil)
    }
}

/// Rounds half away from zero to `digits` decimal places; negative digits
/// round to tens, hundreds and so on.
pub(crate) fn round_to(n: f64, digits: i32) -> f64 {
    if digits >= 0
        && let Some(d) = Decimal::from_f64(n)
        && let Some(r) = d
            .round_dp_with_strategy(digits as u32, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
    {
        return r;
    }
    let rounded = if digits < 0 {
        let factor = 10f64.powi(-digits);
        (n / factor).round() * factor
    } else {
        let factor = 10f64.powi(digits);
        (n * factor).round() / factor
    };
    if rounded.is_finite() { rounded } else { n }
}

pub(crate) fn concat(values: &[Value]) -> Value {
    Value::Text(values.iter().map(Value::render).collect())
}

pub(crate) fn len(value: &Value) -> Value {
    Value::Number(value.render().chars().count() as f64)
}

pub(crate) fn upper(value: &Value) -> Value {
    Value::Text(value.render().to_uppercase())
}

pub(crate) fn lower(value: &Value) -> Value {
    Value::Text(value.render().to_lowercase())
}

/// Text form used in function docs and the CLI reference.
pub fn signature(builtin: Builtin) -> String {
    let params = match builtin {
        Builtin::If => "condition, then, else",
        Builtin::IfNil => "value, fallback",
        Builtin::And | Builtin::Or => "bool, ...",
        Builtin::Concat => "value, ...",
        Builtin::Round => "number[, digits]",
        Builtin::Not => "bool",
        Builtin::IsNil | Builtin::Len | Builtin::Upper | Builtin::Lower => "value",
        Builtin::Abs => "number",
    };
    format!("{}({})", builtin.name(), params)
}
