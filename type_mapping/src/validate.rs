//! Identifier validation
//!
//! Table and column names are spliced into statement text unquoted, so they
//! are restricted to plain SQL identifiers. The same rules run at compile time
//! in the entity derive and at runtime when descriptors are built by hand.

use thiserror::Error;

/// PostgreSQL identifier length limit
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    Empty,

    #[error("Name '{name}' is too long: {length} characters (max {max_length})")]
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },

    #[error("Name '{0}' must start with a letter or underscore")]
    InvalidStartCharacter(String),

    #[error("Invalid characters in name '{0}': only alphanumeric characters and underscores are allowed")]
    InvalidCharacters(String),

    #[error("Name '{0}' is a reserved SQL keyword")]
    ReservedKeyword(String),
}

const RESERVED_KEYWORDS: &[&str] = &[
    "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
    "CONSTRAINT", "CREATE", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END",
    "EXISTS", "FALSE", "FOREIGN", "FROM", "FULL", "GROUP", "HAVING", "IN", "INDEX", "INNER",
    "INSERT", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "NOT", "NULL", "OFFSET",
    "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES", "RETURNING", "RIGHT", "SELECT",
    "SET", "TABLE", "THEN", "TO", "TRUE", "UNION", "UNIQUE", "UPDATE", "USER", "VALUES",
    "WHEN", "WHERE",
];

fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

/// Check that `name` can be used as a bare table or column identifier
pub fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    let first_char = name.chars().next().ok_or(ValidationError::Empty)?;

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            name: name.to_string(),
            length: name.len(),
            max_length: MAX_IDENTIFIER_LENGTH,
        });
    }

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(ValidationError::InvalidStartCharacter(name.to_string()));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidCharacters(name.to_string()));
    }

    if is_reserved_keyword(name) {
        return Err(ValidationError::ReservedKeyword(name.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        for name in ["orders", "item_id", "itemPrice", "_private", "table123", "a"] {
            assert!(validate_identifier(name).is_ok(), "{} should be valid", name);
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        assert_eq!(validate_identifier(""), Err(ValidationError::Empty));
        assert!(matches!(
            validate_identifier("123orders"),
            Err(ValidationError::InvalidStartCharacter(_))
        ));
        assert!(matches!(
            validate_identifier("order-lines"),
            Err(ValidationError::InvalidCharacters(_))
        ));
        assert!(matches!(
            validate_identifier("order"),
            Err(ValidationError::ReservedKeyword(_))
        ));
        assert!(matches!(
            validate_identifier(&"x".repeat(64)),
            Err(ValidationError::TooLong { length: 64, .. })
        ));
    }

    #[test]
    fn test_sql_injection_prevention() {
        let malicious_names = [
            "orders; DROP TABLE orders; --",
            "orders' OR '1'='1",
            "orders/**/UNION/**/SELECT",
            "orders\"; DELETE FROM orders; --",
        ];

        for name in malicious_names {
            assert!(
                validate_identifier(name).is_err(),
                "Should reject malicious name: {}",
                name
            );
        }
    }
}
