//! Decoding query documents.
//!
//! Every node is a JSON object; its kind is recognized by shape. An object
//! with a `conjuncts` key is a conjunction, one with a `wildcard` key is a
//! wildcard. Children decode through the same dispatcher, so nesting depth
//! is bounded by `serde_json`'s recursion limit of 128 JSON levels. Each
//! conjunction uses two (object and array), so about 63 nested conjunctions
//! fit; deeper documents fail with a `Decode` error.

use crate::error::{QueryError, Result};
use crate::query::{Boost, ConjunctionQuery, Query, WildcardQuery};
use serde_json::{Map, Value};

const ROOT: &str = "$";

const CONJUNCTS: &str = "conjuncts";
const WILDCARD: &str = "wildcard";
const FIELD: &str = "field";
const BOOST: &str = "boost";

/// Node kinds, each recognized by the presence of one discriminating key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryKind {
    Conjunction,
    Wildcard,
}

impl QueryKind {
    const ALL: [(&'static str, QueryKind); 2] = [
        (CONJUNCTS, QueryKind::Conjunction),
        (WILDCARD, QueryKind::Wildcard),
    ];

    fn allowed_keys(self) -> &'static [&'static str] {
        match self {
            QueryKind::Conjunction => &[CONJUNCTS, BOOST],
            QueryKind::Wildcard => &[WILDCARD, FIELD, BOOST],
        }
    }

    fn detect(map: &Map<String, Value>, path: &str) -> Result<QueryKind> {
        let mut found = QueryKind::ALL
            .iter()
            .filter(|(key, _)| map.contains_key(*key))
            .map(|&(_, kind)| kind);

        match (found.next(), found.next()) {
            (Some(kind), None) => Ok(kind),
            (Some(_), Some(_)) => Err(QueryError::decode(
                path,
                format!("ambiguous query: both `{}` and `{}` present", CONJUNCTS, WILDCARD),
            )),
            (None, _) => Err(QueryError::UnknownQueryKind {
                path: path.to_string(),
                keys: map.keys().cloned().collect(),
            }),
        }
    }
}

/// Parse a query from JSON text.
pub fn parse_query(input: &str) -> Result<Query> {
    let value: Value =
        serde_json::from_str(input).map_err(|e| QueryError::decode(ROOT, e.to_string()))?;
    parse_query_value(&value)
}

/// Parse a query from JSON bytes.
pub fn parse_query_slice(input: &[u8]) -> Result<Query> {
    let value: Value =
        serde_json::from_slice(input).map_err(|e| QueryError::decode(ROOT, e.to_string()))?;
    parse_query_value(&value)
}

/// Decode a query from an already parsed JSON value.
pub fn parse_query_value(value: &Value) -> Result<Query> {
    decode_node(value, ROOT)
}

fn decode_node(value: &Value, path: &str) -> Result<Query> {
    let Value::Object(map) = value else {
        return Err(QueryError::decode(
            path,
            format!("expected a query object, found {}", type_name(value)),
        ));
    };

    let kind = QueryKind::detect(map, path)?;
    if let Some(key) = map.keys().find(|k| !kind.allowed_keys().contains(&k.as_str())) {
        return Err(QueryError::decode(
            path,
            format!("unexpected key `{}` in {:?} query", key, kind),
        ));
    }

    match kind {
        QueryKind::Conjunction => decode_conjunction(map, path).map(Query::Conjunction),
        QueryKind::Wildcard => decode_wildcard(map, path).map(Query::Wildcard),
    }
}

fn decode_conjunction(map: &Map<String, Value>, path: &str) -> Result<ConjunctionQuery> {
    let conjuncts = match map.get(CONJUNCTS) {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| decode_node(item, &format!("{}.{}[{}]", path, CONJUNCTS, i)))
            .collect::<Result<Vec<_>>>()?,
        other => {
            return Err(QueryError::decode(
                path,
                format!("`{}` must be an array, found {}", CONJUNCTS, opt_type_name(other)),
            ));
        }
    };

    let mut query = ConjunctionQuery::new(conjuncts);
    query.set_boost_opt(decode_boost(map, path)?);
    Ok(query)
}

fn decode_wildcard(map: &Map<String, Value>, path: &str) -> Result<WildcardQuery> {
    let pattern = match map.get(WILDCARD) {
        Some(Value::String(s)) => s.as_str(),
        other => {
            return Err(QueryError::decode(
                path,
                format!("`{}` must be a string, found {}", WILDCARD, opt_type_name(other)),
            ));
        }
    };

    let mut query = WildcardQuery::new(pattern);
    match map.get(FIELD) {
        None | Some(Value::Null) => {}
        Some(Value::String(field)) => query.set_field(field.as_str()),
        Some(other) => {
            return Err(QueryError::decode(
                path,
                format!("`{}` must be a string, found {}", FIELD, type_name(other)),
            ));
        }
    }
    query.set_boost_opt(decode_boost(map, path)?);
    Ok(query)
}

fn decode_boost(map: &Map<String, Value>, path: &str) -> Result<Option<Boost>> {
    match map.get(BOOST) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            // Positivity is checked by `validate`, not here
            match n.as_f64() {
                Some(boost) => Ok(Some(Boost::new(boost))),
                None => Err(QueryError::decode(
                    path,
                    format!("`{}` is not representable as f64: {}", BOOST, n),
                )),
            }
        }
        Some(other) => Err(QueryError::decode(
            path,
            format!("`{}` must be a number, found {}", BOOST, type_name(other)),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn opt_type_name(value: Option<&Value>) -> &'static str {
    value.map_or("nothing", type_name)
}
