// Filter grammar parser
//
// Grammar: comma-separated clauses, each `<field> <operator> <value>`.
// Clauses that fail any validation step are dropped without error; the
// surviving clauses keep their input order.
use super::registry::OperatorRegistry;
use super::types::{FilterOp, FilterValue, ParsedClause, ScalarKind};

pub fn parse_filter_string(raw: &str, registry: &OperatorRegistry) -> Vec<ParsedClause> {
    raw.split(',')
        .filter_map(|segment| parse_clause(segment, registry))
        .collect()
}

fn parse_clause(segment: &str, registry: &OperatorRegistry) -> Option<ParsedClause> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }

    let (field, rest) = split_token(segment)?;
    let (op_token, value_raw) = split_token(rest)?;
    let value_raw = value_raw.trim();
    if value_raw.is_empty() {
        drop_clause(segment, "incomplete clause");
        return None;
    }

    let operator = match FilterOp::parse(op_token) {
        Some(op) => op,
        None => {
            drop_clause(segment, "unsupported operator");
            return None;
        }
    };

    let descriptor = match registry.descriptor(field) {
        Some(descriptor) => descriptor,
        None => {
            drop_clause(segment, "unregistered field");
            return None;
        }
    };
    if !descriptor.allows(operator) {
        drop_clause(segment, "operator not allowed for field");
        return None;
    }

    let text = strip_quotes(value_raw);
    let value = match descriptor.data_type {
        ScalarKind::Char => FilterValue::Text(text.to_string()),
        ScalarKind::Number => match text.parse::<f64>() {
            Ok(number) if number.is_finite() => FilterValue::Number(number),
            _ => {
                drop_clause(segment, "non-numeric value for number field");
                return None;
            }
        },
    };

    Some(ParsedClause {
        field: field.to_string(),
        operator,
        value,
    })
}

/// Split off the leading non-whitespace token, returning it with the rest.
fn split_token(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    match input.find(char::is_whitespace) {
        Some(idx) => Some((&input[..idx], &input[idx..])),
        None => None,
    }
}

/// Strip one layer of matching surrounding quotes.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn drop_clause(segment: &str, reason: &str) {
    tracing::debug!(segment, reason, "dropping filter clause");
}
