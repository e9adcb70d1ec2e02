use serde::Serialize;

/// Operator tokens accepted by the filter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Like,
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl FilterOp {
    /// Map a raw operator word to its token, case-insensitively.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "like" => Some(FilterOp::Like),
            "eq" => Some(FilterOp::Eq),
            "not_eq" => Some(FilterOp::NotEq),
            "gt" => Some(FilterOp::Gt),
            "gte" => Some(FilterOp::Gte),
            "lt" => Some(FilterOp::Lt),
            "lte" => Some(FilterOp::Lte),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            FilterOp::Like => "like",
            FilterOp::Eq => "eq",
            FilterOp::NotEq => "not_eq",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOp::Like => "ILIKE",
            FilterOp::Eq => "=",
            FilterOp::NotEq => "<>",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
        }
    }
}

/// Declared data type for a filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Char,
    Number,
}

/// A filter value typed according to the field's declared kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
}

/// One validated clause from a filter string.
///
/// A clause only exists once its field is registered, its operator is in
/// the field's allowed list and, for number fields, its value parsed to a
/// finite number.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedClause {
    pub field: String,
    pub operator: FilterOp,
    pub value: FilterValue,
}

/// Immutable per-field whitelist entry, fixed at startup.
///
/// Operator lists are plain tokens rather than `FilterOp` so a registry can
/// advertise operators the grammar does not accept (the users table declares
/// `between` on `created_at`); such tokens are visible in initiate payloads
/// but never parse into a clause.
#[derive(Debug, Clone, Serialize)]
pub struct OperatorDescriptor {
    pub data_type: ScalarKind,
    #[serde(rename = "operator")]
    pub operators: &'static [&'static str],
}

impl OperatorDescriptor {
    pub fn allows(&self, op: FilterOp) -> bool {
        self.operators.contains(&op.token())
    }
}
