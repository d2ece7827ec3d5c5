use crate::{AsValue, GenericSqlWriter, Parameters, SqlWriter, Value};
use std::{
    collections::BTreeSet,
    fmt::{self, Display},
};

/// Node of a predicate tree, leaves refer to bound parameters only.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Equals { column: String, key: String },
    In { column: String, keys: Vec<String> },
    NotIn { column: String, keys: Vec<String> },
}

impl Condition {
    /// Needs parentheses when nested inside another group.
    pub fn is_compound(&self) -> bool {
        match self {
            Condition::And(v) | Condition::Or(v) => {
                v.len() > 1 || v.first().is_some_and(Condition::is_compound)
            }
            _ => false,
        }
    }
}

/// `$` followed by the column name, with characters that are not valid in a
/// parameter name replaced by `_`, plus the first numeric suffix not yet taken.
pub fn parameter_key(column: &str, taken: impl Fn(&str) -> bool) -> String {
    let base: String = std::iter::once('$')
        .chain(column.chars().map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        }))
        .collect();
    if !taken(&base) {
        return base;
    }
    (1..)
        .map(|i| format!("{}{}", base, i))
        .find(|key| !taken(key))
        .unwrap_or(base)
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Namespace {
    parameters: Parameters,
    reserved: BTreeSet<String>,
}

impl Namespace {
    fn key(&self, column: &str) -> String {
        parameter_key(column, |k| {
            self.parameters.contains_key(k) || self.reserved.contains(k)
        })
    }

    fn bind(&mut self, column: &str, value: Value) -> String {
        let key = self.key(column);
        self.parameters.insert(key.clone(), value);
        key
    }
}

/// Composable predicate, every value ends up as a named parameter.
///
/// ```rust,ignore
/// let filter = Where::new()
///     .eq("id", 1)
///     .or(|w| w.eq("id", 2).eq("id", 3));
/// assert_eq!(
///     filter.to_string(),
///     " WHERE (id = $id) AND (id = $id1 OR id = $id2)"
/// );
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Where {
    conditions: Vec<Condition>,
    namespace: Namespace,
}

impl Where {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl AsValue) -> Self {
        let column = column.into();
        let key = self.namespace.bind(&column, value.as_value());
        self.conditions.push(Condition::Equals { column, key });
        self
    }

    fn list<V: AsValue>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Vec<String> {
        values
            .into_iter()
            .map(|v| self.namespace.bind(column, v.as_value()))
            .collect()
    }

    pub fn is_in<V: AsValue>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let column = column.into();
        let keys = self.list(&column, values);
        self.conditions.push(Condition::In { column, keys });
        self
    }

    pub fn not_in<V: AsValue>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let column = column.into();
        let keys = self.list(&column, values);
        self.conditions.push(Condition::NotIn { column, keys });
        self
    }

    /// Moves a condition built against `values` into this namespace, every
    /// leaf gets a fresh key so nothing collides with the parameters bound so far.
    fn adopt(&mut self, condition: Condition, values: &mut Parameters) -> Condition {
        match condition {
            Condition::And(v) => {
                Condition::And(v.into_iter().map(|c| self.adopt(c, values)).collect())
            }
            Condition::Or(v) => {
                Condition::Or(v.into_iter().map(|c| self.adopt(c, values)).collect())
            }
            Condition::Equals { column, key } => {
                let key = self.rebind(&column, key, values);
                Condition::Equals { column, key }
            }
            Condition::In { column, keys } => {
                let keys = keys.into_iter().map(|k| self.rebind(&column, k, values)).collect();
                Condition::In { column, keys }
            }
            Condition::NotIn { column, keys } => {
                let keys = keys.into_iter().map(|k| self.rebind(&column, k, values)).collect();
                Condition::NotIn { column, keys }
            }
        }
    }

    fn rebind(&mut self, column: &str, key: String, values: &mut Parameters) -> String {
        let value = values.remove(&key).unwrap_or_default();
        self.namespace.bind(column, value)
    }

    fn adopt_all(&mut self, other: Where) -> Vec<Condition> {
        let mut values = other.namespace.parameters;
        other
            .conditions
            .into_iter()
            .map(|c| self.adopt(c, &mut values))
            .collect()
    }

    fn group(mut self, or: bool, scope: impl FnOnce(Where) -> Where) -> Self {
        let conditions = self.adopt_all(scope(Where::new()));
        if !conditions.is_empty() {
            self.conditions.push(if or {
                Condition::Or(conditions)
            } else {
                Condition::And(conditions)
            });
        }
        self
    }

    /// Appends the top level conditions of `other`, its parameters are re-keyed
    /// into this namespace.
    pub fn merge(mut self, other: Where) -> Self {
        let conditions = self.adopt_all(other);
        self.conditions.extend(conditions);
        self
    }

    /// Conditions added inside `scope` are joined by `AND` into a single node.
    pub fn and(self, scope: impl FnOnce(Where) -> Where) -> Self {
        self.group(false, scope)
    }

    /// Conditions added inside `scope` are joined by `OR` into a single node.
    pub fn or(self, scope: impl FnOnce(Where) -> Where) -> Self {
        self.group(true, scope)
    }

    /// Makes `key` unavailable to the parameters created afterwards.
    pub fn reserve(&mut self, key: impl Into<String>) {
        self.namespace.reserved.insert(key.into());
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn parameters(&self) -> &Parameters {
        &self.namespace.parameters
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl Display for Where {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        GenericSqlWriter.write_where(&mut out, self);
        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::{Where, parameter_key};
    use crate::Value;

    #[test]
    fn empty_renders_nothing() {
        assert_eq!(Where::new().to_string(), "");
        assert_eq!(Where::new().or(|w| w).to_string(), "");
    }

    #[test]
    fn keys_are_sanitized() {
        assert_eq!(parameter_key("user name", |_| false), "$user_name");
        assert_eq!(parameter_key("a", |k| k == "$a" || k == "$a1"), "$a2");
    }

    #[test]
    fn foreign_scope_result_is_rekeyed() {
        let filter = Where::new()
            .eq("id", 1i64)
            .or(|_| Where::new().eq("id", 2i64).eq("id", 3i64));
        assert_eq!(filter.to_string(), " WHERE (id = $id) AND (id = $id1 OR id = $id2)");
        let values: Vec<_> = filter.parameters().values().cloned().collect();
        assert_eq!(
            values,
            [Value::Int64(Some(1)), Value::Int64(Some(2)), Value::Int64(Some(3))]
        );
    }

    #[test]
    fn merge_respects_reserved_keys() {
        let mut filter = Where::new();
        filter.reserve("$karma");
        let filter = filter.merge(Where::new().eq("karma", 1i64).is_in("id", [4i64, 5]));
        assert_eq!(filter.to_string(), " WHERE (karma = $karma1) AND (id IN ($id, $id1))");
        assert!(!filter.parameters().contains_key("$karma"));
        assert_eq!(filter.parameters().get("$id1"), Some(&Value::Int64(Some(5))));
    }

    #[test]
    fn single_child_group_is_bare() {
        let filter = Where::new().eq("a", 1i64).or(|w| w.eq("b", 2i64).and(|w| w.eq("c", 3i64)));
        assert_eq!(filter.to_string(), " WHERE (a = $a) AND (b = $b OR c = $c)");
        assert_eq!(filter.parameters().get("$c"), Some(&Value::Int64(Some(3))));
    }
}
