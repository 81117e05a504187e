use crate::error::ParseError;
use crate::plugin::table::ColumnType;
use serde::Deserialize;
use serde_json::value::RawValue;

// ConstraintList contains the details of the constraints for one column: the
// column's affinity and every (operator, expression) pair from the WHERE
// clause, in the order osquery sent them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintList {
    affinity: ColumnType,
    constraints: Vec<Constraint>,
}

impl ConstraintList {
    /// Create a new, empty ConstraintList with the given column type
    pub fn new(affinity: ColumnType) -> Self {
        Self {
            affinity,
            constraints: Vec::new(),
        }
    }

    pub fn with_constraints(affinity: ColumnType, constraints: Vec<Constraint>) -> Self {
        Self {
            affinity,
            constraints,
        }
    }

    /// Add a constraint to this list
    pub fn add_constraint(&mut self, op: Operator, expr: impl Into<String>) {
        self.constraints.push(Constraint::new(op, expr));
    }

    /// Get the column type affinity
    pub fn affinity(&self) -> ColumnType {
        self.affinity
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Constraint> {
        self.constraints.iter()
    }

    /// Expressions of every constraint using `op`, in query order.
    ///
    /// ```
    /// use osquery_table::plugin::{ColumnType, ConstraintList, Operator};
    ///
    /// let mut list = ConstraintList::new(ColumnType::Text);
    /// list.add_constraint(Operator::Equals, "a");
    /// list.add_constraint(Operator::Like, "b%");
    /// list.add_constraint(Operator::Equals, "c");
    ///
    /// let equals: Vec<&str> = list.expressions(Operator::Equals).collect();
    /// assert_eq!(equals, vec!["a", "c"]);
    /// ```
    pub fn expressions(&self, op: Operator) -> impl Iterator<Item = &str> + '_ {
        self.constraints
            .iter()
            .filter(move |c| c.op == op)
            .map(|c| c.expr.as_str())
    }

    /// Get the number of constraints
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Check if there are no constraints
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl<'a> IntoIterator for &'a ConstraintList {
    type Item = &'a Constraint;
    type IntoIter = std::slice::Iter<'a, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.constraints.iter()
    }
}

// Constraint contains both an operator and an expression that are applied as
// constraints in the query. The expression is always the textual form of the
// right-hand side, whatever the column type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    op: Operator,
    expr: String,
}

impl Constraint {
    pub fn new(op: Operator, expr: impl Into<String>) -> Self {
        Self {
            op,
            expr: expr.into(),
        }
    }

    pub fn operator(&self) -> Operator {
        self.op
    }

    pub fn expression(&self) -> &str {
        &self.expr
    }
}

/// Operators for query constraints, mapping to osquery's constraint operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Unique constraint (code 1)
    Unique = 1,
    /// Equality constraint (code 2)
    Equals = 2,
    /// Greater than constraint (code 4)
    GreaterThan = 4,
    /// Less than or equals constraint (code 8)
    LessThanOrEquals = 8,
    /// Less than constraint (code 16)
    LessThan = 16,
    /// Greater than or equals constraint (code 32)
    GreaterThanOrEquals = 32,
    /// Match constraint (code 64)
    Match = 64,
    /// Like constraint (code 65)
    Like = 65,
    /// Glob constraint (code 66)
    Glob = 66,
    /// Regexp constraint (code 67)
    Regexp = 67,
}

impl Operator {
    /// The integer code osquery uses on the wire.
    pub fn code(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for Operator {
    type Error = ParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Operator::Unique),
            2 => Ok(Operator::Equals),
            4 => Ok(Operator::GreaterThan),
            8 => Ok(Operator::LessThanOrEquals),
            16 => Ok(Operator::LessThan),
            32 => Ok(Operator::GreaterThanOrEquals),
            64 => Ok(Operator::Match),
            65 => Ok(Operator::Like),
            66 => Ok(Operator::Glob),
            67 => Ok(Operator::Regexp),
            _ => Err(ParseError::UnknownOperator(value)),
        }
    }
}

// osquery < 3 sends an empty list as "" and operators as strings ("2");
// later versions send [] and numbers (2). Lists and expressions are kept as
// raw JSON so the shape can be dispatched on and numbers keep their text.
#[derive(Debug, Deserialize)]
struct WireConstraint {
    op: WireOperator,
    expr: Box<RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireOperator {
    Code(i64),
    Text(String),
}

impl WireConstraint {
    fn into_constraint(self) -> Result<Constraint, ParseError> {
        let code = match self.op {
            WireOperator::Code(code) => code,
            WireOperator::Text(text) => text
                .parse::<i64>()
                .map_err(|_| ParseError::InvalidOperator(text))?,
        };
        let expr = decode_expression(&self.expr)?;

        Ok(Constraint::new(Operator::try_from(code)?, expr))
    }
}

fn decode_expression(raw: &RawValue) -> Result<String, ParseError> {
    let text = raw.get();
    match text.as_bytes().first() {
        Some(b'"') => Ok(serde_json::from_str::<String>(text)?),
        Some(b'-' | b'0'..=b'9') => Ok(text.to_string()),
        _ => Err(ParseError::InvalidExpression(text.to_string())),
    }
}

/// Decode an already tokenized constraint list.
pub(crate) fn decode_constraint_list(raw: &RawValue) -> Result<Vec<Constraint>, ParseError> {
    let text = raw.get();
    match text.as_bytes().first() {
        Some(b'[') => serde_json::from_str::<Vec<WireConstraint>>(text)
            .map_err(ParseError::Shape)?
            .into_iter()
            .map(WireConstraint::into_constraint)
            .collect(),
        Some(b'"') => {
            let legacy: String = serde_json::from_str(text)?;
            if legacy.is_empty() {
                Ok(Vec::new())
            } else {
                Err(ParseError::UnexpectedList(legacy))
            }
        }
        _ => Err(ParseError::InvalidList(text.to_string())),
    }
}

/// Decode one column's constraint list as it appears in the query context,
/// accepting both the legacy and the typed encodings.
pub fn parse_constraint_list(json: &str) -> Result<Vec<Constraint>, ParseError> {
    let raw: Box<RawValue> = serde_json::from_str(json)?;
    decode_constraint_list(&raw)
}
