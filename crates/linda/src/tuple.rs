// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// This file is part of PlexSpaces.
//
// PlexSpaces is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// PlexSpaces is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with PlexSpaces. If not, see <https://www.gnu.org/licenses/>.

//! Tuples and the patterns that match them.
//!
//! A tuple is an ordered, fixed-arity sequence of typed fields, immutable
//! once written. A pattern has the same shape but each position may be an
//! exact value, a typed or untyped wildcard, or a predicate. Matching is
//! field-by-field and one-directional: the pattern is asked whether it
//! accepts a candidate tuple, never the reverse.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A tuple in the space
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tuple {
    /// Tuple fields
    fields: Vec<TupleField>,
}

impl Tuple {
    /// Create a new tuple from fields
    pub fn new(fields: Vec<TupleField>) -> Self {
        Tuple { fields }
    }

    /// Get the fields of the tuple
    pub fn fields(&self) -> &[TupleField] {
        &self.fields
    }

    /// Number of fields (arity)
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the tuple has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check if tuple matches a pattern
    pub fn matches(&self, pattern: &Pattern) -> bool {
        pattern.matches(self)
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", field)?;
        }
        write!(f, ")")
    }
}

/// Field in a tuple
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TupleField {
    /// Integer value
    Integer(i64),
    /// String value
    String(String),
    /// Boolean value
    Boolean(bool),
    /// Binary data
    Binary(Vec<u8>),
    /// Floating point
    Float(OrderedFloat),
    /// Null value
    Null,
}

impl fmt::Display for TupleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TupleField::Integer(v) => write!(f, "{}", v),
            TupleField::String(v) => write!(f, "\"{}\"", v),
            TupleField::Boolean(v) => write!(f, "{}", v),
            TupleField::Binary(v) => write!(f, "binary[{} bytes]", v.len()),
            TupleField::Float(v) => write!(f, "{}", v.get()),
            TupleField::Null => write!(f, "null"),
        }
    }
}

/// Ordered float for hashing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderedFloat(f64);

impl OrderedFloat {
    /// Create a new OrderedFloat from a float value
    pub fn new(value: f64) -> Self {
        OrderedFloat(value)
    }

    /// Get the inner float value
    pub fn get(&self) -> f64 {
        self.0
    }
}

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedFloat {}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        // NaN compares greater than any number, equal to itself
        match (self.0.is_nan(), other.0.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self
                .0
                .partial_cmp(&other.0)
                .unwrap_or(Ordering::Equal),
        }
    }
}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Pattern for matching tuples
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Pattern fields
    fields: Vec<PatternField>,
}

impl Pattern {
    /// Create a new pattern
    pub fn new(fields: Vec<PatternField>) -> Self {
        Pattern { fields }
    }

    /// Get the fields of the pattern
    pub fn fields(&self) -> &[PatternField] {
        &self.fields
    }

    /// Number of fields (arity)
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the pattern has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check if a tuple matches this pattern
    ///
    /// Arity must be equal and every pattern field must accept the tuple
    /// field at the same position.
    pub fn matches(&self, tuple: &Tuple) -> bool {
        if self.fields.len() != tuple.fields().len() {
            return false;
        }

        self.fields
            .iter()
            .zip(tuple.fields().iter())
            .all(|(pattern_field, tuple_field)| pattern_field.matches(tuple_field))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", field)?;
        }
        write!(f, ")")
    }
}

/// Field in a pattern
#[derive(Clone)]
pub enum PatternField {
    /// Exact match
    Exact(TupleField),
    /// Wildcard (matches any value)
    Wildcard,
    /// Type constraint (matches any value of the given kind)
    Type(FieldType),
    /// Predicate function (cannot be serialized)
    Predicate(Arc<dyn Fn(&TupleField) -> bool + Send + Sync>),
}

impl fmt::Debug for PatternField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternField::Exact(field) => f.debug_tuple("Exact").field(field).finish(),
            PatternField::Wildcard => f.debug_tuple("Wildcard").finish(),
            PatternField::Type(ty) => f.debug_tuple("Type").field(ty).finish(),
            PatternField::Predicate(_) => f.debug_tuple("Predicate").field(&"<function>").finish(),
        }
    }
}

impl fmt::Display for PatternField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternField::Exact(field) => write!(f, "{}", field),
            PatternField::Wildcard => write!(f, "?"),
            PatternField::Type(ty) => write!(f, "?{}", ty),
            PatternField::Predicate(_) => write!(f, "?fn"),
        }
    }
}

impl PatternField {
    /// Check if a field matches this pattern field
    fn matches(&self, field: &TupleField) -> bool {
        match self {
            PatternField::Exact(expected) => field == expected,
            PatternField::Wildcard => true,
            PatternField::Type(field_type) => matches_type(field, field_type),
            PatternField::Predicate(pred) => pred(field),
        }
    }
}

/// Field type for pattern matching
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldType {
    /// Integer type
    Integer,
    /// String type
    String,
    /// Boolean type
    Boolean,
    /// Binary data type
    Binary,
    /// Floating point type
    Float,
    /// Null/empty type
    Null,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Integer => "Integer",
            FieldType::String => "String",
            FieldType::Boolean => "Boolean",
            FieldType::Binary => "Binary",
            FieldType::Float => "Float",
            FieldType::Null => "Null",
        };
        write!(f, "{}", name)
    }
}

fn matches_type(field: &TupleField, field_type: &FieldType) -> bool {
    matches!(
        (field, field_type),
        (TupleField::Integer(_), FieldType::Integer)
            | (TupleField::String(_), FieldType::String)
            | (TupleField::Boolean(_), FieldType::Boolean)
            | (TupleField::Binary(_), FieldType::Binary)
            | (TupleField::Float(_), FieldType::Float)
            | (TupleField::Null, FieldType::Null)
    )
}

/// Helper macro for creating tuples from values
///
/// # Examples
/// ```
/// # use plexspaces_linda::tuple;
/// let t = tuple!("job", 42, true);
/// assert_eq!(t.len(), 3);
/// ```
#[macro_export]
macro_rules! tuple {
    ($($field:expr),* $(,)?) => {
        $crate::Tuple::new(vec![$($crate::TupleField::from($field)),*])
    };
}

/// Helper macro for creating patterns
///
/// Accepts plain values (exact match), [`FieldType`] values (typed
/// wildcard), and [`PatternField`] values such as `PatternField::Wildcard`.
///
/// # Examples
/// ```
/// # use plexspaces_linda::{pattern, FieldType, PatternField};
/// let p = pattern!("job", FieldType::Integer, PatternField::Wildcard);
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! pattern {
    ($($field:expr),* $(,)?) => {
        $crate::Pattern::new(vec![$($crate::PatternField::from($field)),*])
    };
}

// Conversion traits
impl From<i64> for TupleField {
    fn from(val: i64) -> Self {
        TupleField::Integer(val)
    }
}

impl From<i32> for TupleField {
    fn from(val: i32) -> Self {
        TupleField::Integer(val as i64)
    }
}

impl From<String> for TupleField {
    fn from(val: String) -> Self {
        TupleField::String(val)
    }
}

impl From<&str> for TupleField {
    fn from(val: &str) -> Self {
        TupleField::String(val.to_string())
    }
}

impl From<bool> for TupleField {
    fn from(val: bool) -> Self {
        TupleField::Boolean(val)
    }
}

impl From<Vec<u8>> for TupleField {
    fn from(val: Vec<u8>) -> Self {
        TupleField::Binary(val)
    }
}

impl From<f64> for TupleField {
    fn from(val: f64) -> Self {
        TupleField::Float(OrderedFloat::new(val))
    }
}

impl From<TupleField> for PatternField {
    fn from(val: TupleField) -> Self {
        PatternField::Exact(val)
    }
}

impl From<FieldType> for PatternField {
    fn from(val: FieldType) -> Self {
        PatternField::Type(val)
    }
}

impl From<i64> for PatternField {
    fn from(val: i64) -> Self {
        PatternField::Exact(TupleField::from(val))
    }
}

impl From<i32> for PatternField {
    fn from(val: i32) -> Self {
        PatternField::Exact(TupleField::from(val))
    }
}

impl From<String> for PatternField {
    fn from(val: String) -> Self {
        PatternField::Exact(TupleField::from(val))
    }
}

impl From<&str> for PatternField {
    fn from(val: &str) -> Self {
        PatternField::Exact(TupleField::from(val))
    }
}

impl From<bool> for PatternField {
    fn from(val: bool) -> Self {
        PatternField::Exact(TupleField::from(val))
    }
}

impl From<Vec<u8>> for PatternField {
    fn from(val: Vec<u8>) -> Self {
        PatternField::Exact(TupleField::from(val))
    }
}

impl From<f64> for PatternField {
    fn from(val: f64) -> Self {
        PatternField::Exact(TupleField::from(val))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_wildcard_matching() {
        let tuple = tuple!("x", 1);

        assert!(pattern!("x", 1).matches(&tuple));
        assert!(pattern!("x", PatternField::Wildcard).matches(&tuple));
        assert!(pattern!(PatternField::Wildcard, PatternField::Wildcard).matches(&tuple));
        assert!(!pattern!("y", 1).matches(&tuple));
        assert!(!pattern!("x", 2).matches(&tuple));
    }

    #[test]
    fn test_arity_must_be_equal() {
        let tuple = tuple!("x", 1);

        assert!(!pattern!("x").matches(&tuple));
        assert!(!pattern!("x", 1, true).matches(&tuple));
    }

    #[test]
    fn test_typed_wildcard() {
        let tuple = tuple!("x", 1);

        assert!(pattern!(FieldType::String, FieldType::Integer).matches(&tuple));
        assert!(!pattern!(FieldType::Integer, FieldType::Integer).matches(&tuple));
        assert!(!pattern!(FieldType::String, FieldType::Float).matches(&tuple));
    }

    #[test]
    fn test_predicate_field() {
        let even = PatternField::Predicate(Arc::new(|field| {
            matches!(field, TupleField::Integer(v) if v % 2 == 0)
        }));
        let pattern = Pattern::new(vec![PatternField::from("n"), even]);

        assert!(pattern.matches(&tuple!("n", 4)));
        assert!(!pattern.matches(&tuple!("n", 3)));
    }

    #[test]
    fn test_structurally_equal_tuples_are_equal() {
        assert_eq!(tuple!("a", 1), tuple!("a", 1));
        assert_ne!(tuple!("a", 1), tuple!("a", 2));
    }

    #[test]
    fn test_float_fields_are_bit_exact() {
        assert_eq!(
            TupleField::from(1.5),
            TupleField::Float(OrderedFloat::new(1.5))
        );
        assert_eq!(
            OrderedFloat::new(f64::NAN).cmp(&OrderedFloat::new(f64::NAN)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_display_forms() {
        let tuple = tuple!("x", 1);
        assert_eq!(tuple.to_string(), "(\"x\", 1)");

        let pattern = pattern!("x", FieldType::Integer, PatternField::Wildcard);
        assert_eq!(pattern.to_string(), "(\"x\", ?Integer, ?)");
    }
}
