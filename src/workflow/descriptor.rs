use serde_json::Value;

/// SQL type used when binding a request value to a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Id,
    Text,
    Integer,
    Numeric,
}

impl FieldKind {
    pub fn sql_type(&self) -> &'static str {
        match self {
            FieldKind::Id => "uuid",
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Numeric => "numeric",
        }
    }

    /// Ids arrive as strings or bare numbers; both compare as lowercase text
    pub fn normalize(&self, value: &Value) -> Value {
        match (self, value) {
            (FieldKind::Id, Value::Number(n)) => Value::String(n.to_string()),
            (FieldKind::Id, Value::String(s)) => Value::String(s.trim().to_lowercase()),
            (FieldKind::Text, Value::Number(n)) => Value::String(n.to_string()),
            (FieldKind::Text, Value::Bool(b)) => Value::String(b.to_string()),
            (FieldKind::Integer, Value::Number(n)) if n.as_i64().is_none() => {
                n.as_f64().map(|f| Value::from(f as i64)).unwrap_or_else(|| value.clone())
            }
            (FieldKind::Integer, Value::String(s)) => s.trim().parse::<i64>().map(Value::from).unwrap_or_else(|_| value.clone()),
            _ => value.clone(),
        }
    }

    /// Whether a request value can be stored in this kind of column.
    /// Integer columns are 32-bit and take neither booleans nor fractions.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (FieldKind::Id, Value::String(_) | Value::Number(_)) => true,
            (FieldKind::Text, Value::String(_) | Value::Number(_) | Value::Bool(_)) => true,
            (FieldKind::Integer, Value::Number(n)) => match n.as_i64() {
                Some(i) => i32::try_from(i).is_ok(),
                None => n
                    .as_f64()
                    .is_some_and(|f| f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64),
            },
            (FieldKind::Integer, Value::String(s)) => s.trim().parse::<i32>().is_ok(),
            (FieldKind::Numeric, Value::Number(_)) => true,
            (FieldKind::Numeric, Value::String(s)) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
            _ => false,
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            FieldKind::Id => "an id",
            FieldKind::Text => "a string",
            FieldKind::Integer => "an integer",
            FieldKind::Numeric => "a number",
        }
    }
}

/// A request body key and the column it is stored in
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub key: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
    /// SQL expression used when the key is absent or null
    pub default: Option<&'static str>,
    /// Column may be cleared to NULL by an update
    pub nullable: bool,
}

impl Field {
    pub const fn new(key: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self { key, column, kind, default: None, nullable: false }
    }

    pub const fn with_default(self, default: &'static str) -> Self {
        Self { default: Some(default), ..self }
    }

    pub const fn nullable(self) -> Self {
        Self { nullable: true, ..self }
    }

    /// Type check for a supplied value: "Field 'year' must be an integer"
    pub fn check(&self, value: &Value) -> Result<(), String> {
        if self.kind.accepts(value) {
            Ok(())
        } else {
            Err(format!("Field '{}' must be {}", self.key, self.kind.expected()))
        }
    }
}

/// A foreign key that must point at an existing parent row
#[derive(Debug, Clone, Copy)]
pub struct ParentRef {
    pub key: &'static str,
    pub column: &'static str,
    pub table: &'static str,
    /// Display name used in "<label> not found"
    pub label: &'static str,
    /// Nullable references are only checked when supplied
    pub optional: bool,
}

impl ParentRef {
    pub const fn required(key: &'static str, column: &'static str, table: &'static str, label: &'static str) -> Self {
        Self { key, column, table, label, optional: false }
    }

    pub const fn optional(key: &'static str, column: &'static str, table: &'static str, label: &'static str) -> Self {
        Self { key, column, table, label, optional: true }
    }

    pub fn not_found_message(&self) -> String {
        format!("{} not found", self.label)
    }

    /// Postgres' default name for an inline `REFERENCES` constraint
    pub fn constraint_name(&self, child_table: &str) -> String {
        format!("{}_{}_fkey", child_table, self.column)
    }
}

/// Natural key that must not repeat within the entity's table
#[derive(Debug, Clone, Copy)]
pub struct UniqueKey {
    /// Field keys, resolved against `CreateSpec::fields`
    pub keys: &'static [&'static str],
    pub message: &'static str,
}

#[derive(Debug)]
pub struct CreateSpec {
    pub table: &'static str,
    pub required: &'static [&'static str],
    pub fields: &'static [Field],
    pub parents: &'static [ParentRef],
    pub unique: Option<UniqueKey>,
    pub failure: &'static str,
}

impl CreateSpec {
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// Optional query-string filter and the column expression it restricts
#[derive(Debug, Clone, Copy)]
pub struct ListFilter {
    pub param: &'static str,
    pub column: &'static str,
}

#[derive(Debug)]
pub struct ListSpec {
    /// `SELECT ... FROM ... JOIN ...` without WHERE or ORDER BY
    pub select: &'static str,
    /// Checked in order; the first one present in the query string applies
    pub filters: &'static [ListFilter],
    pub order_by: &'static str,
    pub failure: &'static str,
}

#[derive(Debug)]
pub struct PatchSpec {
    pub table: &'static str,
    pub updatable: &'static [Field],
    pub not_found: &'static str,
    pub failure: &'static str,
}

/// Everything the generic workflows need to know about one entity
#[derive(Debug)]
pub struct EntityDescriptor {
    pub name: &'static str,
    pub create: CreateSpec,
    pub list: ListSpec,
    pub patch: Option<PatchSpec>,
}

/// Statement parameter placeholder with an explicit cast
pub(crate) fn placeholder(index: usize, kind: FieldKind) -> String {
    format!("${}::{}", index, kind.sql_type())
}

/// `column = $n` comparison. Ids compare as text so malformed ids simply
/// match nothing instead of failing the cast.
pub(crate) fn equals(column: &str, index: usize, kind: FieldKind) -> String {
    match kind {
        FieldKind::Id => format!("{}::text = ${}::text", column, index),
        _ => format!("{} = {}", column, placeholder(index, kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_normalize_to_strings() {
        assert_eq!(FieldKind::Id.normalize(&json!(7)), json!("7"));
        assert_eq!(FieldKind::Id.normalize(&json!("abc")), json!("abc"));
        assert_eq!(FieldKind::Integer.normalize(&json!(2025)), json!(2025));
    }

    #[test]
    fn ids_compare_case_insensitively() {
        assert_eq!(
            FieldKind::Id.normalize(&json!(" 3F2A0C4E-9B1D-4C44-8E6A-0F6B1B2C3D4E ")),
            json!("3f2a0c4e-9b1d-4c44-8e6a-0f6b1b2c3d4e")
        );
    }

    #[test]
    fn integers_reject_booleans_and_fractions() {
        let year = Field::new("year", "year", FieldKind::Integer);
        assert!(year.check(&json!(2025)).is_ok());
        assert!(year.check(&json!(2025.0)).is_ok());
        assert!(year.check(&json!("2025")).is_ok());
        assert_eq!(year.check(&json!(true)).unwrap_err(), "Field 'year' must be an integer");
        assert!(year.check(&json!(2025.6)).is_err());
        assert!(year.check(&json!("twenty")).is_err());
        assert!(year.check(&json!(3_000_000_000i64)).is_err());
        assert_eq!(FieldKind::Integer.normalize(&json!(2025.0)), json!(2025));
    }

    #[test]
    fn numerics_reject_non_numbers() {
        let score = Field::new("score", "score", FieldKind::Numeric);
        assert!(score.check(&json!(72.5)).is_ok());
        assert!(score.check(&json!("72.5")).is_ok());
        assert_eq!(score.check(&json!(false)).unwrap_err(), "Field 'score' must be a number");
        assert!(score.check(&json!([1])).is_err());
    }

    #[test]
    fn comparisons_cast_parameters() {
        assert_eq!(equals("\"team_id\"", 1, FieldKind::Id), "\"team_id\"::text = $1::text");
        assert_eq!(equals("\"year\"", 2, FieldKind::Integer), "\"year\" = $2::integer");
    }

    #[test]
    fn parent_constraint_names_follow_postgres_defaults() {
        let parent = ParentRef::required("teamId", "team_id", "teams", "Team");
        assert_eq!(parent.constraint_name("results"), "results_team_id_fkey");
        assert_eq!(parent.not_found_message(), "Team not found");
    }
}
