//! Filter evaluation for in-memory reads.
//!
//! Evaluates the subset of the document store's filter syntax that the
//! client facade passes through: top-level field equality, plus the
//! comparison/membership/existence operators nested under a field
//! (`$eq`, `$ne`, `$gt`, `$gte`, `$lt`, `$lte`, `$in`, `$nin`,
//! `$exists`). An empty filter matches every document.

use std::cmp::Ordering;

use bson::{Bson, Document};

/// Comparable view of a BSON value with numeric types normalized to f64,
/// so `{ "a": 1 }` matches a stored `Int64` or `Double` the way the real
/// store would.
#[derive(Debug)]
enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    DateTime(bson::DateTime),
    String(&'a str),
    Other(&'a Bson),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(f64::from(*value)),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            other => Comparable::Other(other),
        }
    }
}

fn values_eq(left: &Bson, right: &Bson) -> bool {
    match (Comparable::from(left), Comparable::from(right)) {
        (Comparable::Null, Comparable::Null) => true,
        (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
        (Comparable::Number(a), Comparable::Number(b)) => a == b,
        (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
        (Comparable::String(a), Comparable::String(b)) => a == b,
        (Comparable::Other(a), Comparable::Other(b)) => a == b,
        _ => false,
    }
}

fn values_cmp(left: &Bson, right: &Bson) -> Option<Ordering> {
    match (Comparable::from(left), Comparable::from(right)) {
        (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(&b),
        (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(&b),
        (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(&b),
        (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
        _ => None,
    }
}

/// Returns true if `document` satisfies `filter`.
pub(crate) fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(field, condition)| field_matches(document, field, condition))
}

fn field_matches(document: &Document, field: &str, condition: &Bson) -> bool {
    let value = document.get(field);

    if let Bson::Document(ops) = condition
        && ops.keys().any(|key| key.starts_with('$'))
    {
        return ops
            .iter()
            .all(|(op, operand)| operator_matches(value, op, operand));
    }

    match value {
        Some(value) => values_eq(value, condition),
        None => false,
    }
}

fn operator_matches(value: Option<&Bson>, op: &str, operand: &Bson) -> bool {
    if op == "$exists" {
        let should_exist = matches!(operand, Bson::Boolean(true));
        return value.is_some() == should_exist;
    }

    let Some(value) = value else {
        // Absent fields satisfy only $nin, mirroring the store.
        return op == "$nin";
    };

    match op {
        "$eq" => values_eq(value, operand),
        "$ne" => !values_eq(value, operand),
        "$gt" => values_cmp(value, operand) == Some(Ordering::Greater),
        "$gte" => matches!(
            values_cmp(value, operand),
            Some(Ordering::Greater) | Some(Ordering::Equal)
        ),
        "$lt" => values_cmp(value, operand) == Some(Ordering::Less),
        "$lte" => matches!(
            values_cmp(value, operand),
            Some(Ordering::Less) | Some(Ordering::Equal)
        ),
        "$in" => match operand {
            Bson::Array(candidates) => candidates.iter().any(|c| values_eq(value, c)),
            _ => false,
        },
        "$nin" => match operand {
            Bson::Array(candidates) => !candidates.iter().any(|c| values_eq(value, c)),
            _ => true,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[test]
    fn empty_filter_matches_everything() {
        assert!(matches(&doc! { "a": 1 }, &doc! {}));
        assert!(matches(&doc! {}, &doc! {}));
    }

    #[test]
    fn top_level_equality() {
        let document = doc! { "name": "alice", "age": 30 };

        assert!(matches(&document, &doc! { "name": "alice" }));
        assert!(matches(&document, &doc! { "name": "alice", "age": 30 }));
        assert!(!matches(&document, &doc! { "name": "bob" }));
        assert!(!matches(&document, &doc! { "missing": 1 }));
    }

    #[test]
    fn numeric_types_are_normalized() {
        let document = doc! { "count": 7_i64 };

        assert!(matches(&document, &doc! { "count": 7_i32 }));
        assert!(matches(&document, &doc! { "count": 7.0 }));
    }

    #[test]
    fn comparison_operators() {
        let document = doc! { "age": 30 };

        assert!(matches(&document, &doc! { "age": { "$gt": 20 } }));
        assert!(matches(&document, &doc! { "age": { "$gte": 30 } }));
        assert!(matches(&document, &doc! { "age": { "$lt": 40 } }));
        assert!(!matches(&document, &doc! { "age": { "$lt": 30 } }));
        assert!(matches(&document, &doc! { "age": { "$ne": 31 } }));
        assert!(matches(&document, &doc! { "age": { "$gt": 20, "$lt": 40 } }));
    }

    #[test]
    fn membership_operators() {
        let document = doc! { "role": "admin" };

        assert!(matches(&document, &doc! { "role": { "$in": ["admin", "ops"] } }));
        assert!(!matches(&document, &doc! { "role": { "$in": ["user"] } }));
        assert!(matches(&document, &doc! { "role": { "$nin": ["user"] } }));
        assert!(matches(&document, &doc! { "missing": { "$nin": ["user"] } }));
    }

    #[test]
    fn exists_operator() {
        let document = doc! { "name": "alice" };

        assert!(matches(&document, &doc! { "name": { "$exists": true } }));
        assert!(matches(&document, &doc! { "missing": { "$exists": false } }));
        assert!(!matches(&document, &doc! { "missing": { "$exists": true } }));
    }

    #[test]
    fn nested_document_without_operators_compares_by_equality() {
        let document = doc! { "meta": { "a": 1 } };

        assert!(matches(&document, &doc! { "meta": { "a": 1 } }));
        assert!(!matches(&document, &doc! { "meta": { "a": 2 } }));
    }
}
