// Predicate applier: parsed clauses to SQL fragments with positional binds
use super::types::{FilterOp, FilterValue, ParsedClause};

/// Accumulates WHERE conditions and their bind parameters.
///
/// Conditions join with AND; parameters bind in clause order starting from
/// `$<starting_param_index + 1>` so callers can prepend their own binds.
pub struct FilterApply {
    conditions: Vec<String>,
    params: Vec<FilterValue>,
    param_index: usize,
}

impl FilterApply {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            conditions: vec![],
            params: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn from_clauses(clauses: &[ParsedClause]) -> Self {
        let mut apply = Self::new(0);
        for clause in clauses {
            apply.push_clause(clause);
        }
        apply
    }

    fn param(&mut self) -> String {
        self.param_index += 1;
        format!("${}", self.param_index)
    }

    pub fn push_clause(&mut self, clause: &ParsedClause) {
        let value = match (&clause.operator, &clause.value) {
            (FilterOp::Like, FilterValue::Text(text)) => {
                FilterValue::Text(wrap_like_pattern(text))
            }
            (_, value) => value.clone(),
        };
        let placeholder = self.param();
        self.conditions.push(format!(
            "\"{}\" {} {}",
            clause.field,
            clause.operator.to_sql(),
            placeholder
        ));
        self.params.push(value);
    }

    /// Raw condition with pre-bound parameters, for constraints that do not
    /// come from the filter grammar (e.g. a provinceId equality).
    pub fn push_condition(&mut self, column: &str, operator: FilterOp, value: FilterValue) {
        let placeholder = self.param();
        self.conditions
            .push(format!("\"{}\" {} {}", column, operator.to_sql(), placeholder));
        self.params.push(value);
    }

    pub fn next_param_index(&self) -> usize {
        self.param_index
    }

    /// `WHERE ...` fragment, or an empty string when no clause survived.
    pub fn where_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn to_count_sql(&self, table: &str) -> String {
        let where_sql = self.where_sql();
        if where_sql.is_empty() {
            format!("SELECT COUNT(*) FROM \"{}\"", table)
        } else {
            format!("SELECT COUNT(*) FROM \"{}\" {}", table, where_sql)
        }
    }

    pub fn to_select_sql(&self, table: &str, order_by: &str, limit: i64, offset: i64) -> String {
        [
            "SELECT *".to_string(),
            format!("FROM \"{}\"", table),
            self.where_sql(),
            format!("ORDER BY {}", order_by),
            format!("LIMIT {} OFFSET {}", limit, offset),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    pub fn params(&self) -> &[FilterValue] {
        &self.params
    }
}

/// Wrap bare values for substring matching; explicit patterns pass verbatim.
fn wrap_like_pattern(value: &str) -> String {
    if value.contains('%') {
        value.to_string()
    } else {
        format!("%{}%", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(field: &str, operator: FilterOp, value: FilterValue) -> ParsedClause {
        ParsedClause {
            field: field.to_string(),
            operator,
            value,
        }
    }

    #[test]
    fn like_wraps_bare_values() {
        let apply = FilterApply::from_clauses(&[clause(
            "name",
            FilterOp::Like,
            FilterValue::Text("bandung".to_string()),
        )]);
        assert_eq!(apply.where_sql(), "WHERE \"name\" ILIKE $1");
        assert_eq!(
            apply.params(),
            &[FilterValue::Text("%bandung%".to_string())]
        );
    }

    #[test]
    fn like_keeps_explicit_patterns_verbatim() {
        let apply = FilterApply::from_clauses(&[clause(
            "name",
            FilterOp::Like,
            FilterValue::Text("Kota%".to_string()),
        )]);
        assert_eq!(apply.params(), &[FilterValue::Text("Kota%".to_string())]);
    }

    #[test]
    fn clauses_join_with_and_binding_in_order() {
        let apply = FilterApply::from_clauses(&[
            clause("email", FilterOp::Like, FilterValue::Text("gmail".to_string())),
            clause("id", FilterOp::Gt, FilterValue::Number(5.0)),
            clause("id", FilterOp::Lte, FilterValue::Number(100.0)),
        ]);
        assert_eq!(
            apply.where_sql(),
            "WHERE \"email\" ILIKE $1 AND \"id\" > $2 AND \"id\" <= $3"
        );
        assert_eq!(
            apply.params(),
            &[
                FilterValue::Text("%gmail%".to_string()),
                FilterValue::Number(5.0),
                FilterValue::Number(100.0),
            ]
        );
    }

    #[test]
    fn comparison_operator_sql() {
        let apply = FilterApply::from_clauses(&[
            clause("id", FilterOp::Eq, FilterValue::Number(1.0)),
            clause("id", FilterOp::NotEq, FilterValue::Number(2.0)),
            clause("id", FilterOp::Gte, FilterValue::Number(3.0)),
            clause("id", FilterOp::Lt, FilterValue::Number(4.0)),
        ]);
        assert_eq!(
            apply.where_sql(),
            "WHERE \"id\" = $1 AND \"id\" <> $2 AND \"id\" >= $3 AND \"id\" < $4"
        );
    }

    #[test]
    fn empty_clause_list_emits_no_where() {
        let apply = FilterApply::from_clauses(&[]);
        assert_eq!(apply.where_sql(), "");
        assert_eq!(apply.to_count_sql("users"), "SELECT COUNT(*) FROM \"users\"");
        assert_eq!(
            apply.to_select_sql("users", "\"id\" ASC", 10, 0),
            "SELECT * FROM \"users\" ORDER BY \"id\" ASC LIMIT 10 OFFSET 0"
        );
    }

    #[test]
    fn count_and_select_share_the_where_fragment() {
        let apply = FilterApply::from_clauses(&[clause(
            "code",
            FilterOp::Eq,
            FilterValue::Text("JB".to_string()),
        )]);
        assert_eq!(
            apply.to_count_sql("provinces"),
            "SELECT COUNT(*) FROM \"provinces\" WHERE \"code\" = $1"
        );
        assert_eq!(
            apply.to_select_sql("provinces", "\"name\" ASC", 25, 50),
            "SELECT * FROM \"provinces\" WHERE \"code\" = $1 ORDER BY \"name\" ASC LIMIT 25 OFFSET 50"
        );
    }

    #[test]
    fn starting_param_index_offsets_placeholders() {
        let mut apply = FilterApply::new(1);
        apply.push_clause(&clause(
            "name",
            FilterOp::Eq,
            FilterValue::Text("x".to_string()),
        ));
        assert_eq!(apply.where_sql(), "WHERE \"name\" = $2");
        assert_eq!(apply.next_param_index(), 2);
    }

    #[test]
    fn extra_conditions_compose_with_clauses() {
        let mut apply = FilterApply::from_clauses(&[clause(
            "name",
            FilterOp::Like,
            FilterValue::Text("kota".to_string()),
        )]);
        apply.push_condition("province_id", FilterOp::Eq, FilterValue::Number(3.0));
        assert_eq!(
            apply.where_sql(),
            "WHERE \"name\" ILIKE $1 AND \"province_id\" = $2"
        );
    }
}
