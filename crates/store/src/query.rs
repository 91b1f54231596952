//! Query shapes: filters and ordering over a collection snapshot.

use serde_json::Value as JsonValue;
use std::cmp::Ordering;

use crate::document::Document;

/// Filter applied to a collection query.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Keep documents whose `field` equals `value`.
    FieldEquals(String, JsonValue),
}

impl Filter {
    pub fn field_equals(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::FieldEquals(field.into(), value.into())
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::FieldEquals(field, value) => doc.fields.get(field) == Some(value),
        }
    }
}

/// Ordering applied to a collection query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    pub fn sort(&self, docs: &mut [Document]) {
        docs.sort_by(|a, b| {
            let ord = compare_values(a.fields.get(&self.field), b.fields.get(&self.field));
            if self.descending { ord.reverse() } else { ord }
        });
    }
}

/// Total order over the JSON values this store keeps in fields.
///
/// Missing fields sort first; mixed types fall back to a stable
/// type-rank comparison so sorting never panics.
fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match (a, b) {
            (JsonValue::Number(x), JsonValue::Number(y)) => {
                let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (JsonValue::String(x), JsonValue::String(y)) => x.cmp(y),
            (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
            _ => type_rank(a).cmp(&type_rank(b)),
        },
    }
}

fn type_rank(v: &JsonValue) -> u8 {
    match v {
        JsonValue::Null => 0,
        JsonValue::Bool(_) => 1,
        JsonValue::Number(_) => 2,
        JsonValue::String(_) => 3,
        JsonValue::Array(_) => 4,
        JsonValue::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn doc(fields: JsonValue) -> Document {
        Document {
            id: Uuid::now_v7(),
            version: 1,
            fields,
        }
    }

    #[test]
    fn field_equals_matches_on_value() {
        let d = doc(json!({"budget_id": "abc", "quantity": 2.0}));
        assert!(Filter::field_equals("budget_id", "abc").matches(&d));
        assert!(!Filter::field_equals("budget_id", "xyz").matches(&d));
        assert!(!Filter::field_equals("missing", "abc").matches(&d));
    }

    #[test]
    fn order_by_sorts_numbers_and_reverses() {
        let mut docs = vec![
            doc(json!({"n": 3.0})),
            doc(json!({"n": 1.0})),
            doc(json!({"n": 2.0})),
        ];
        OrderBy::asc("n").sort(&mut docs);
        let ns: Vec<f64> = docs
            .iter()
            .map(|d| d.fields["n"].as_f64().unwrap())
            .collect();
        assert_eq!(ns, vec![1.0, 2.0, 3.0]);

        OrderBy::desc("n").sort(&mut docs);
        let ns: Vec<f64> = docs
            .iter()
            .map(|d| d.fields["n"].as_f64().unwrap())
            .collect();
        assert_eq!(ns, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn order_by_sorts_strings() {
        let mut docs = vec![
            doc(json!({"name": "Cemento"})),
            doc(json!({"name": "Arena"})),
        ];
        OrderBy::asc("name").sort(&mut docs);
        assert_eq!(docs[0].fields["name"], json!("Arena"));
    }
}
