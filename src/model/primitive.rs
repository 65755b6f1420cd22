//! Primitive categories and their typed payloads.
//!
//! `PrimitiveValue` carries its category in its variant, so a payload can never
//! disagree with its category once constructed. Loose input (a plain [`Value`])
//! goes through [`PrimitiveValue::from_value`], which is where a mismatch is caught.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use super::Value;
use crate::{Error, Result};

/// The twelve primitive categories of the open metadata type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimitiveCategory {
    #[serde(rename = "OM_PRIMITIVE_TYPE_BOOLEAN")]
    Boolean,
    #[serde(rename = "OM_PRIMITIVE_TYPE_BYTE")]
    Byte,
    #[serde(rename = "OM_PRIMITIVE_TYPE_CHAR")]
    Char,
    #[serde(rename = "OM_PRIMITIVE_TYPE_SHORT")]
    Short,
    #[serde(rename = "OM_PRIMITIVE_TYPE_INT")]
    Int,
    #[serde(rename = "OM_PRIMITIVE_TYPE_LONG")]
    Long,
    #[serde(rename = "OM_PRIMITIVE_TYPE_FLOAT")]
    Float,
    #[serde(rename = "OM_PRIMITIVE_TYPE_DOUBLE")]
    Double,
    #[serde(rename = "OM_PRIMITIVE_TYPE_BIGINTEGER")]
    BigInteger,
    #[serde(rename = "OM_PRIMITIVE_TYPE_BIGDECIMAL")]
    BigDecimal,
    #[serde(rename = "OM_PRIMITIVE_TYPE_STRING")]
    String,
    #[serde(rename = "OM_PRIMITIVE_TYPE_DATE")]
    Date,
}

impl PrimitiveCategory {
    /// Canonical name used in type definitions and on the wire.
    pub fn type_name(self) -> &'static str {
        match self {
            PrimitiveCategory::Boolean => "boolean",
            PrimitiveCategory::Byte => "byte",
            PrimitiveCategory::Char => "char",
            PrimitiveCategory::Short => "short",
            PrimitiveCategory::Int => "int",
            PrimitiveCategory::Long => "long",
            PrimitiveCategory::Float => "float",
            PrimitiveCategory::Double => "double",
            PrimitiveCategory::BigInteger => "biginteger",
            PrimitiveCategory::BigDecimal => "bigdecimal",
            PrimitiveCategory::String => "string",
            PrimitiveCategory::Date => "date",
        }
    }

    /// The Rust representation a payload of this category is held in.
    pub fn representation(self) -> &'static str {
        match self {
            PrimitiveCategory::Boolean => "bool",
            PrimitiveCategory::Byte => "i8",
            PrimitiveCategory::Char => "char",
            PrimitiveCategory::Short => "i16",
            PrimitiveCategory::Int => "i32",
            PrimitiveCategory::Long => "i64",
            PrimitiveCategory::Float => "f32",
            PrimitiveCategory::Double => "f64",
            PrimitiveCategory::BigInteger => "BigInt",
            PrimitiveCategory::BigDecimal => "BigDecimal",
            PrimitiveCategory::String => "String",
            PrimitiveCategory::Date => "DateTime<Utc>",
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveCategory::Byte
                | PrimitiveCategory::Short
                | PrimitiveCategory::Int
                | PrimitiveCategory::Long
                | PrimitiveCategory::BigInteger
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(self, PrimitiveCategory::Float | PrimitiveCategory::Double)
    }
}

impl fmt::Display for PrimitiveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A single scalar payload, typed by its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "primitiveDefCategory", content = "primitiveValue")]
pub enum PrimitiveValue {
    #[serde(rename = "OM_PRIMITIVE_TYPE_BOOLEAN")]
    Boolean(bool),
    #[serde(rename = "OM_PRIMITIVE_TYPE_BYTE")]
    Byte(i8),
    #[serde(rename = "OM_PRIMITIVE_TYPE_CHAR")]
    Char(char),
    #[serde(rename = "OM_PRIMITIVE_TYPE_SHORT")]
    Short(i16),
    #[serde(rename = "OM_PRIMITIVE_TYPE_INT")]
    Int(i32),
    #[serde(rename = "OM_PRIMITIVE_TYPE_LONG")]
    Long(i64),
    #[serde(rename = "OM_PRIMITIVE_TYPE_FLOAT")]
    Float(f32),
    #[serde(rename = "OM_PRIMITIVE_TYPE_DOUBLE")]
    Double(f64),
    #[serde(rename = "OM_PRIMITIVE_TYPE_BIGINTEGER")]
    BigInteger(Box<BigInt>),
    #[serde(rename = "OM_PRIMITIVE_TYPE_BIGDECIMAL")]
    BigDecimal(Box<BigDecimal>),
    #[serde(rename = "OM_PRIMITIVE_TYPE_STRING")]
    String(String),
    #[serde(rename = "OM_PRIMITIVE_TYPE_DATE")]
    Date(#[serde(with = "chrono::serde::ts_milliseconds")] DateTime<Utc>),
}

impl PrimitiveValue {
    pub fn category(&self) -> PrimitiveCategory {
        match self {
            PrimitiveValue::Boolean(_) => PrimitiveCategory::Boolean,
            PrimitiveValue::Byte(_) => PrimitiveCategory::Byte,
            PrimitiveValue::Char(_) => PrimitiveCategory::Char,
            PrimitiveValue::Short(_) => PrimitiveCategory::Short,
            PrimitiveValue::Int(_) => PrimitiveCategory::Int,
            PrimitiveValue::Long(_) => PrimitiveCategory::Long,
            PrimitiveValue::Float(_) => PrimitiveCategory::Float,
            PrimitiveValue::Double(_) => PrimitiveCategory::Double,
            PrimitiveValue::BigInteger(_) => PrimitiveCategory::BigInteger,
            PrimitiveValue::BigDecimal(_) => PrimitiveCategory::BigDecimal,
            PrimitiveValue::String(_) => PrimitiveCategory::String,
            PrimitiveValue::Date(_) => PrimitiveCategory::Date,
        }
    }

    /// Build a primitive of `category` from a loosely typed plain value.
    ///
    /// Fails with `InvalidPrimitiveType` when the value's representation does not
    /// match the category (including integers out of the category's range).
    pub fn from_value(category: PrimitiveCategory, value: &Value) -> Result<Self> {
        let mismatch = |actual: String| Error::InvalidPrimitiveType {
            category,
            expected: category.representation(),
            actual,
        };
        let out_of_range = || mismatch(format!("{} {value}", value.type_name()));

        match (category, value) {
            (PrimitiveCategory::Boolean, Value::Bool(b)) => Ok(PrimitiveValue::Boolean(*b)),
            (PrimitiveCategory::Byte, Value::Int(i)) => {
                i8::try_from(*i).map(PrimitiveValue::Byte).map_err(|_| out_of_range())
            }
            (PrimitiveCategory::Short, Value::Int(i)) => {
                i16::try_from(*i).map(PrimitiveValue::Short).map_err(|_| out_of_range())
            }
            (PrimitiveCategory::Int, Value::Int(i)) => {
                i32::try_from(*i).map(PrimitiveValue::Int).map_err(|_| out_of_range())
            }
            (PrimitiveCategory::Long, Value::Int(i)) => Ok(PrimitiveValue::Long(*i)),
            (PrimitiveCategory::Float, Value::Float(f)) => {
                if f.is_finite() && f.abs() > f32::MAX as f64 {
                    Err(out_of_range())
                } else {
                    Ok(PrimitiveValue::Float(*f as f32))
                }
            }
            (PrimitiveCategory::Double, Value::Float(f)) => Ok(PrimitiveValue::Double(*f)),
            (PrimitiveCategory::Char, Value::String(s)) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(PrimitiveValue::Char(c)),
                    _ => Err(mismatch(format!("STRING of length {}", s.chars().count()))),
                }
            }
            (PrimitiveCategory::BigInteger, Value::BigInt(b)) => {
                Ok(PrimitiveValue::BigInteger(b.clone()))
            }
            (PrimitiveCategory::BigInteger, Value::Int(i)) => {
                Ok(PrimitiveValue::BigInteger(Box::new(BigInt::from(*i))))
            }
            (PrimitiveCategory::BigDecimal, Value::Decimal(d)) => {
                Ok(PrimitiveValue::BigDecimal(d.clone()))
            }
            (PrimitiveCategory::String, Value::String(s)) => Ok(PrimitiveValue::String(s.clone())),
            (PrimitiveCategory::Date, Value::Date(d)) => Ok(PrimitiveValue::Date(*d)),
            _ => Err(mismatch(value.type_name().to_owned())),
        }
    }

    /// Strip the category, leaving plain data.
    pub fn to_value(&self) -> Value {
        match self {
            PrimitiveValue::Boolean(b) => Value::Bool(*b),
            PrimitiveValue::Byte(v) => Value::Int(i64::from(*v)),
            PrimitiveValue::Char(c) => Value::String(c.to_string()),
            PrimitiveValue::Short(v) => Value::Int(i64::from(*v)),
            PrimitiveValue::Int(v) => Value::Int(i64::from(*v)),
            PrimitiveValue::Long(v) => Value::Int(*v),
            PrimitiveValue::Float(v) => Value::Float(f64::from(*v)),
            PrimitiveValue::Double(v) => Value::Float(*v),
            PrimitiveValue::BigInteger(b) => Value::BigInt(b.clone()),
            PrimitiveValue::BigDecimal(d) => Value::Decimal(d.clone()),
            PrimitiveValue::String(s) => Value::String(s.clone()),
            PrimitiveValue::Date(d) => Value::Date(*d),
        }
    }

    /// Convert to `target`, or `None` when the value cannot be represented there.
    ///
    /// Integers narrow and widen with range checks, integers widen to floating
    /// point and decimals, `long` and `date` interconvert as epoch milliseconds,
    /// and `char` and single-character strings interconvert.
    pub fn cast_to(&self, target: PrimitiveCategory) -> Option<PrimitiveValue> {
        let source = self.category();
        if source == target {
            return Some(self.clone());
        }

        if let Some(big) = self.as_big_int() {
            return match target {
                PrimitiveCategory::Byte => i8::try_from(&big).ok().map(PrimitiveValue::Byte),
                PrimitiveCategory::Short => i16::try_from(&big).ok().map(PrimitiveValue::Short),
                PrimitiveCategory::Int => i32::try_from(&big).ok().map(PrimitiveValue::Int),
                PrimitiveCategory::Long => i64::try_from(&big).ok().map(PrimitiveValue::Long),
                PrimitiveCategory::BigInteger => Some(PrimitiveValue::BigInteger(Box::new(big))),
                PrimitiveCategory::BigDecimal => {
                    Some(PrimitiveValue::BigDecimal(Box::new(BigDecimal::new(big, 0))))
                }
                PrimitiveCategory::Float => {
                    i64::try_from(&big).ok().map(|i| PrimitiveValue::Float(i as f32))
                }
                PrimitiveCategory::Double => {
                    i64::try_from(&big).ok().map(|i| PrimitiveValue::Double(i as f64))
                }
                PrimitiveCategory::Date if source == PrimitiveCategory::Long => {
                    let millis = i64::try_from(&big).ok()?;
                    DateTime::from_timestamp_millis(millis).map(PrimitiveValue::Date)
                }
                _ => None,
            };
        }

        match (self, target) {
            (PrimitiveValue::Float(f), PrimitiveCategory::Double) => {
                Some(PrimitiveValue::Double(f64::from(*f)))
            }
            (PrimitiveValue::Double(d), PrimitiveCategory::Float) => {
                if d.is_finite() && d.abs() > f32::MAX as f64 {
                    None
                } else {
                    Some(PrimitiveValue::Float(*d as f32))
                }
            }
            (PrimitiveValue::Float(f), PrimitiveCategory::BigDecimal) => {
                BigDecimal::from_str(&f.to_string())
                    .ok()
                    .map(|d| PrimitiveValue::BigDecimal(Box::new(d)))
            }
            (PrimitiveValue::Double(d), PrimitiveCategory::BigDecimal) => {
                BigDecimal::from_str(&d.to_string())
                    .ok()
                    .map(|d| PrimitiveValue::BigDecimal(Box::new(d)))
            }
            (PrimitiveValue::Date(d), PrimitiveCategory::Long) => {
                Some(PrimitiveValue::Long(d.timestamp_millis()))
            }
            (PrimitiveValue::Char(c), PrimitiveCategory::String) => {
                Some(PrimitiveValue::String(c.to_string()))
            }
            (PrimitiveValue::String(s), PrimitiveCategory::Char) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(PrimitiveValue::Char(c)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn as_big_int(&self) -> Option<BigInt> {
        match self {
            PrimitiveValue::Byte(v) => Some(BigInt::from(*v)),
            PrimitiveValue::Short(v) => Some(BigInt::from(*v)),
            PrimitiveValue::Int(v) => Some(BigInt::from(*v)),
            PrimitiveValue::Long(v) => Some(BigInt::from(*v)),
            PrimitiveValue::BigInteger(b) => Some((**b).clone()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrimitiveValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PrimitiveValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Any integral payload that fits in an i64.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_big_int().and_then(|b| i64::try_from(&b).ok())
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            PrimitiveValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// Floats hash by bit pattern with both zeroes folded together, matching `==`.
fn float_bits(v: f64) -> u64 {
    if v == 0.0 { 0 } else { v.to_bits() }
}

impl Hash for PrimitiveValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.category().hash(state);
        match self {
            PrimitiveValue::Boolean(b) => b.hash(state),
            PrimitiveValue::Byte(v) => v.hash(state),
            PrimitiveValue::Char(c) => c.hash(state),
            PrimitiveValue::Short(v) => v.hash(state),
            PrimitiveValue::Int(v) => v.hash(state),
            PrimitiveValue::Long(v) => v.hash(state),
            PrimitiveValue::Float(v) => float_bits(f64::from(*v)).hash(state),
            PrimitiveValue::Double(v) => float_bits(*v).hash(state),
            PrimitiveValue::BigInteger(b) => b.hash(state),
            PrimitiveValue::BigDecimal(d) => d.hash(state),
            PrimitiveValue::String(s) => s.hash(state),
            PrimitiveValue::Date(d) => d.hash(state),
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for PrimitiveValue { fn from(v: bool) -> Self { PrimitiveValue::Boolean(v) } }
impl From<i8> for PrimitiveValue { fn from(v: i8) -> Self { PrimitiveValue::Byte(v) } }
impl From<char> for PrimitiveValue { fn from(v: char) -> Self { PrimitiveValue::Char(v) } }
impl From<i16> for PrimitiveValue { fn from(v: i16) -> Self { PrimitiveValue::Short(v) } }
impl From<i32> for PrimitiveValue { fn from(v: i32) -> Self { PrimitiveValue::Int(v) } }
impl From<i64> for PrimitiveValue { fn from(v: i64) -> Self { PrimitiveValue::Long(v) } }
impl From<f32> for PrimitiveValue { fn from(v: f32) -> Self { PrimitiveValue::Float(v) } }
impl From<f64> for PrimitiveValue { fn from(v: f64) -> Self { PrimitiveValue::Double(v) } }
impl From<String> for PrimitiveValue { fn from(v: String) -> Self { PrimitiveValue::String(v) } }
impl From<&str> for PrimitiveValue { fn from(v: &str) -> Self { PrimitiveValue::String(v.to_owned()) } }
impl From<BigInt> for PrimitiveValue {
    fn from(v: BigInt) -> Self { PrimitiveValue::BigInteger(Box::new(v)) }
}
impl From<BigDecimal> for PrimitiveValue {
    fn from(v: BigDecimal) -> Self { PrimitiveValue::BigDecimal(Box::new(v)) }
}
impl From<DateTime<Utc>> for PrimitiveValue {
    fn from(v: DateTime<Utc>) -> Self { PrimitiveValue::Date(v) }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveValue::Boolean(b) => write!(f, "{b}"),
            PrimitiveValue::Byte(v) => write!(f, "{v}"),
            PrimitiveValue::Char(c) => write!(f, "{c}"),
            PrimitiveValue::Short(v) => write!(f, "{v}"),
            PrimitiveValue::Int(v) => write!(f, "{v}"),
            PrimitiveValue::Long(v) => write!(f, "{v}"),
            PrimitiveValue::Float(v) => write!(f, "{v}"),
            PrimitiveValue::Double(v) => write!(f, "{v}"),
            PrimitiveValue::BigInteger(b) => write!(f, "{b}"),
            PrimitiveValue::BigDecimal(d) => write!(f, "{d}"),
            PrimitiveValue::String(s) => f.write_str(s),
            PrimitiveValue::Date(d) => write!(f, "{}", d.to_rfc3339()),
        }
    }
}
