use crate::error::ParseError;
use crate::plugin::table::query_constraint::{decode_constraint_list, ConstraintList};
use crate::plugin::table::ColumnType;
use serde::Deserialize;
use serde_json::value::RawValue;
use std::collections::HashMap;
use std::str::FromStr;

// QueryContext contains the constraints from the WHERE clause of the query,
// that can optionally be used to optimize the table generation. Note that the
// osquery SQLite engine will perform the filtering with these constraints, so
// it is not mandatory that they be used in table generation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryContext {
    constraints: HashMap<String, ConstraintList>,
}

#[derive(Debug, Deserialize)]
struct WireQueryContext {
    #[serde(default)]
    constraints: Option<Vec<WireColumnConstraints>>,
}

#[derive(Debug, Deserialize)]
struct WireColumnConstraints {
    name: String,
    list: Box<RawValue>,
    affinity: String,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the `context` string of a generate request.
    pub fn parse(json: &str) -> Result<Self, ParseError> {
        let wire: WireQueryContext = serde_json::from_str(json)?;
        let mut ctx = QueryContext::new();

        for column in wire.constraints.unwrap_or_default() {
            let affinity = ColumnType::from_str(&column.affinity)
                .map_err(|_| ParseError::UnknownAffinity(column.affinity.clone()))?;
            let constraints =
                decode_constraint_list(&column.list).map_err(|source| ParseError::Column {
                    column: column.name.clone(),
                    source: Box::new(source),
                })?;

            ctx.insert(
                column.name,
                ConstraintList::with_constraints(affinity, constraints),
            );
        }

        Ok(ctx)
    }

    pub fn insert(&mut self, column: impl Into<String>, list: ConstraintList) {
        self.constraints.insert(column.into(), list);
    }

    /// Constraints on `column`, if the query mentioned it.
    pub fn get(&self, column: &str) -> Option<&ConstraintList> {
        self.constraints.get(column)
    }

    pub fn constraints(&self) -> &HashMap<String, ConstraintList> {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl FromIterator<(String, ConstraintList)> for QueryContext {
    fn from_iter<I: IntoIterator<Item = (String, ConstraintList)>>(iter: I) -> Self {
        Self {
            constraints: iter.into_iter().collect(),
        }
    }
}

pub fn parse_query_context(json: &str) -> Result<QueryContext, ParseError> {
    QueryContext::parse(json)
}
