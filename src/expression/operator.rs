//! Operator definitions for predicate expressions.

/// Binary operators supported in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Logical
    And,
    Or,

    // String matching
    Like,
    StartsWith,
    EndsWith,
    Contains,
}

impl BinaryOperator {
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }

    /// Operators that only apply to character data
    pub fn is_string_match(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Like
                | BinaryOperator::StartsWith
                | BinaryOperator::EndsWith
                | BinaryOperator::Contains
        )
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::Ne => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
            BinaryOperator::Like => "LIKE",
            BinaryOperator::StartsWith => "STARTS WITH",
            BinaryOperator::EndsWith => "ENDS WITH",
            BinaryOperator::Contains => "CONTAINS",
        }
    }
}

/// Unary operators supported in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    // Logical
    Not,

    // NULL checks
    IsNull,
    IsNotNull,

    // Emptiness of strings and collections
    IsEmpty,
    IsNotEmpty,

    // Boolean checks
    IsTrue,
    IsFalse,

    /// Lower-cases a string operand; used by the ignore-case comparisons
    Lower,
}

impl UnaryOperator {
    /// Whether the operator is written after its operand (`x IS NULL`)
    pub fn is_postfix(&self) -> bool {
        !matches!(self, UnaryOperator::Not | UnaryOperator::Lower)
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "NOT",
            UnaryOperator::IsNull => "IS NULL",
            UnaryOperator::IsNotNull => "IS NOT NULL",
            UnaryOperator::IsEmpty => "IS EMPTY",
            UnaryOperator::IsNotEmpty => "IS NOT EMPTY",
            UnaryOperator::IsTrue => "IS TRUE",
            UnaryOperator::IsFalse => "IS FALSE",
            UnaryOperator::Lower => "LOWER",
        }
    }
}
