//! Structured records built from the children of `class` and `sql_table`
//! objects.

use std::fmt;

use serde::Serialize;

/// Visibility of a class member, written as a leading sigil on its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Protected,
}

impl Visibility {
    /// Split a leading `+`, `-` or `#` off a member name.
    ///
    /// Names without a sigil are public.
    pub fn split(name: &str) -> (Visibility, &str) {
        if let Some(rest) = name.strip_prefix('+') {
            (Visibility::Public, rest)
        } else if let Some(rest) = name.strip_prefix('-') {
            (Visibility::Private, rest)
        } else if let Some(rest) = name.strip_prefix('#') {
            (Visibility::Protected, rest)
        } else {
            (Visibility::Public, name)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Protected => "protected",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMethod {
    pub name: String,
    /// Text between the parentheses of the declaration.
    pub parameters: String,
    pub return_type: String,
    pub visibility: Visibility,
}

impl ClassMethod {
    /// The method as declared, e.g. `getName()`.
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.parameters)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Class {
    pub fields: Vec<ClassField>,
    pub methods: Vec<ClassMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub constraint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SqlTable {
    pub columns: Vec<SqlColumn>,
}

/// The structured form an object takes on. An object holds at most one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialization {
    Class(Class),
    SqlTable(SqlTable),
}

impl Specialization {
    pub fn kind(&self) -> &'static str {
        match self {
            Specialization::Class(_) => "class",
            Specialization::SqlTable(_) => "sql_table",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_split() {
        assert_eq!(Visibility::split("+name"), (Visibility::Public, "name"));
        assert_eq!(Visibility::split("-id"), (Visibility::Private, "id"));
        assert_eq!(Visibility::split("#count"), (Visibility::Protected, "count"));
        assert_eq!(Visibility::split("plain"), (Visibility::Public, "plain"));
    }

    #[test]
    fn test_method_signature() {
        let method = ClassMethod {
            name: "getName".to_string(),
            parameters: String::new(),
            return_type: "string".to_string(),
            visibility: Visibility::Public,
        };
        assert_eq!(method.signature(), "getName()");
    }
}
