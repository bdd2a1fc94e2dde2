//! Comparison operators and their textual aliases.
//!
//! A comparison operator is identified by its set of alias symbols. Two
//! operators are the same operator when their symbol sets intersect, so a
//! caller-defined operator that reuses `=eq=` compares equal to
//! [`BuiltinOperator::Equals`].

use crate::expression::{ExpressionError, ExpressionResult};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;

/// Operators known out of the box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinOperator {
    Equals,
    NotEquals,
    In,
    NotIn,
    IsNull,
    IsNotNull,
    EqualsIgnoreCase,
    NotEqualsIgnoreCase,
    Like,
    NotLike,
    LikeIgnoreCase,
    StartsWith,
    StartsWithIgnoreCase,
    EndsWith,
    EndsWithIgnoreCase,
    IsEmpty,
    IsNotEmpty,
    Contains,
    ContainsIgnoreCase,
    Greater,
    GreaterOrEquals,
    LessThan,
    LessThanOrEquals,
    IsTrue,
    IsFalse,
    Before,
    After,
}

impl BuiltinOperator {
    pub const ALL: [BuiltinOperator; 27] = [
        BuiltinOperator::Equals,
        BuiltinOperator::NotEquals,
        BuiltinOperator::In,
        BuiltinOperator::NotIn,
        BuiltinOperator::IsNull,
        BuiltinOperator::IsNotNull,
        BuiltinOperator::EqualsIgnoreCase,
        BuiltinOperator::NotEqualsIgnoreCase,
        BuiltinOperator::Like,
        BuiltinOperator::NotLike,
        BuiltinOperator::LikeIgnoreCase,
        BuiltinOperator::StartsWith,
        BuiltinOperator::StartsWithIgnoreCase,
        BuiltinOperator::EndsWith,
        BuiltinOperator::EndsWithIgnoreCase,
        BuiltinOperator::IsEmpty,
        BuiltinOperator::IsNotEmpty,
        BuiltinOperator::Contains,
        BuiltinOperator::ContainsIgnoreCase,
        BuiltinOperator::Greater,
        BuiltinOperator::GreaterOrEquals,
        BuiltinOperator::LessThan,
        BuiltinOperator::LessThanOrEquals,
        BuiltinOperator::IsTrue,
        BuiltinOperator::IsFalse,
        BuiltinOperator::Before,
        BuiltinOperator::After,
    ];

    /// Every alias accepted for this operator
    pub fn symbols(&self) -> &'static [&'static str] {
        match self {
            BuiltinOperator::Equals => &["=eq=", "=="],
            BuiltinOperator::NotEquals => &["=ne=", "!="],
            BuiltinOperator::In => &["=in="],
            BuiltinOperator::NotIn => &["=notin=", "=notIn=", "=out="],
            BuiltinOperator::IsNull => &["=isnull=", "=isNull="],
            BuiltinOperator::IsNotNull => &["=notnull=", "=notNull=", "=isnotnull=", "=isNotNull="],
            BuiltinOperator::EqualsIgnoreCase => {
                &["=eqic=", "=equalsignorecase=", "=equalsIgnoreCase="]
            }
            BuiltinOperator::NotEqualsIgnoreCase => {
                &["=noteqic=", "=notequalsignorecase=", "=notEqualsIgnoreCase="]
            }
            BuiltinOperator::Like => &["=like="],
            BuiltinOperator::NotLike => &["=notlike=", "=notLike="],
            BuiltinOperator::LikeIgnoreCase => &["=likeic=", "=likeignorecase=", "=likeIgnoreCase="],
            BuiltinOperator::StartsWith => &["=startsw=", "=startswith=", "=startsWith="],
            BuiltinOperator::StartsWithIgnoreCase => &[
                "=startswic=",
                "=startswithignorecase=",
                "=startsWithIgnoreCase=",
            ],
            BuiltinOperator::EndsWith => &["=endsw=", "=endswith=", "=endsWith="],
            BuiltinOperator::EndsWithIgnoreCase => {
                &["=endswic=", "=endswithignorecase=", "=endsWithIgnoreCase="]
            }
            BuiltinOperator::IsEmpty => &["=isempty=", "=isEmpty=", "=empty="],
            BuiltinOperator::IsNotEmpty => &["=notempty=", "=notEmpty=", "=isnotempty=", "=isNotEmpty="],
            BuiltinOperator::Contains => &["=con=", "=contains="],
            BuiltinOperator::ContainsIgnoreCase => {
                &["=conic=", "=containsignorecase=", "=containsIgnoreCase="]
            }
            BuiltinOperator::Greater => &["=gt=", ">", "=greater="],
            BuiltinOperator::GreaterOrEquals => {
                &["=goe=", "=ge=", ">=", "=greaterorequals=", "=greaterOrEquals="]
            }
            BuiltinOperator::LessThan => &["=lt=", "<", "=lessthan=", "=lessThan="],
            BuiltinOperator::LessThanOrEquals => {
                &["=loe=", "=le=", "<=", "=lessthanorequals=", "=lessThanOrEquals="]
            }
            BuiltinOperator::IsTrue => &["=istrue=", "=isTrue="],
            BuiltinOperator::IsFalse => &["=isfalse=", "=isFalse="],
            BuiltinOperator::Before => &["=before="],
            BuiltinOperator::After => &["=after="],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinOperator::Equals => "equals",
            BuiltinOperator::NotEquals => "not-equals",
            BuiltinOperator::In => "in",
            BuiltinOperator::NotIn => "not-in",
            BuiltinOperator::IsNull => "is-null",
            BuiltinOperator::IsNotNull => "is-not-null",
            BuiltinOperator::EqualsIgnoreCase => "equals-ignore-case",
            BuiltinOperator::NotEqualsIgnoreCase => "not-equals-ignore-case",
            BuiltinOperator::Like => "like",
            BuiltinOperator::NotLike => "not-like",
            BuiltinOperator::LikeIgnoreCase => "like-ignore-case",
            BuiltinOperator::StartsWith => "starts-with",
            BuiltinOperator::StartsWithIgnoreCase => "starts-with-ignore-case",
            BuiltinOperator::EndsWith => "ends-with",
            BuiltinOperator::EndsWithIgnoreCase => "ends-with-ignore-case",
            BuiltinOperator::IsEmpty => "is-empty",
            BuiltinOperator::IsNotEmpty => "is-not-empty",
            BuiltinOperator::Contains => "contains",
            BuiltinOperator::ContainsIgnoreCase => "contains-ignore-case",
            BuiltinOperator::Greater => "greater",
            BuiltinOperator::GreaterOrEquals => "greater-or-equals",
            BuiltinOperator::LessThan => "less-than",
            BuiltinOperator::LessThanOrEquals => "less-than-or-equals",
            BuiltinOperator::IsTrue => "is-true",
            BuiltinOperator::IsFalse => "is-false",
            BuiltinOperator::Before => "before",
            BuiltinOperator::After => "after",
        }
    }
}

/// A comparison operator identified by its alias symbols
#[derive(Debug, Clone)]
pub struct ComparisonOperator {
    name: Option<String>,
    symbols: Vec<String>,
}

impl ComparisonOperator {
    /// Anonymous operator with a single alias
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            name: None,
            symbols: vec![symbol.into()],
        }
    }

    pub fn with_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    pub fn named<I, S>(name: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Some(name.into()),
            ..Self::with_symbols(symbols)
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    fn shares_symbol<S: AsRef<str>>(&self, others: &[S]) -> bool {
        self.symbols
            .iter()
            .any(|s| others.iter().any(|o| o.as_ref() == s))
    }
}

impl PartialEq for ComparisonOperator {
    fn eq(&self, other: &Self) -> bool {
        self.shares_symbol(&other.symbols)
    }
}

impl PartialEq<BuiltinOperator> for ComparisonOperator {
    fn eq(&self, other: &BuiltinOperator) -> bool {
        self.shares_symbol(other.symbols())
    }
}

impl PartialEq<ComparisonOperator> for BuiltinOperator {
    fn eq(&self, other: &ComparisonOperator) -> bool {
        other == self
    }
}

impl From<BuiltinOperator> for ComparisonOperator {
    fn from(op: BuiltinOperator) -> Self {
        Self::named(op.name(), op.symbols().iter().copied())
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, self.symbols.first()) {
            (Some(name), _) => write!(f, "{}", name),
            (None, Some(symbol)) => write!(f, "{}", symbol),
            (None, None) => write!(f, "<anonymous>"),
        }
    }
}

/// Check an alias against the operator symbol grammar:
/// `=letters=` or one of `>`, `>=`, `<`, `<=`, `!=`.
pub fn validate_symbol(symbol: &str) -> ExpressionResult<()> {
    let valid = match symbol {
        ">" | ">=" | "<" | "<=" | "!=" => true,
        _ => {
            symbol.len() > 2
                && symbol.starts_with('=')
                && symbol.ends_with('=')
                && symbol[1..symbol.len() - 1]
                    .chars()
                    .all(|c| c.is_ascii_alphabetic())
        }
    };

    if valid {
        Ok(())
    } else {
        Err(ExpressionError::IllegalOperatorSyntax {
            symbol: symbol.to_string(),
        })
    }
}

/// Alias table mapping each symbol to the operator it denotes
#[derive(Debug, Clone)]
pub struct OperatorRegistry {
    aliases: HashMap<String, ComparisonOperator>,
}

impl OperatorRegistry {
    /// Registry seeded with every built-in operator
    pub fn new() -> Self {
        let mut aliases = HashMap::new();
        for op in BuiltinOperator::ALL {
            let operator = ComparisonOperator::from(op);
            for symbol in op.symbols() {
                aliases.insert(symbol.to_string(), operator.clone());
            }
        }
        Self { aliases }
    }

    /// Reject any alias that does not follow the operator symbol grammar
    pub fn validate(operators: &[ComparisonOperator]) -> ExpressionResult<()> {
        for operator in operators {
            if operator.symbols().is_empty() {
                return Err(ExpressionError::IllegalOperatorSyntax {
                    symbol: format!("{} (no aliases)", operator),
                });
            }
            for symbol in operator.symbols() {
                validate_symbol(symbol)?;
            }
        }
        Ok(())
    }

    /// Add caller operators. A colliding alias maps to the operator merged last.
    pub fn merge(&mut self, operators: &[ComparisonOperator]) {
        for operator in operators {
            for symbol in operator.symbols() {
                if let Some(previous) = self.aliases.insert(symbol.clone(), operator.clone()) {
                    warn!(
                        "Operator alias '{}' now maps to {} instead of {}",
                        symbol, operator, previous
                    );
                } else {
                    debug!("Registered operator alias '{}' for {}", symbol, operator);
                }
            }
        }
    }

    pub fn lookup(&self, symbol: &str) -> ExpressionResult<&ComparisonOperator> {
        self.aliases
            .get(symbol)
            .ok_or_else(|| ExpressionError::UnknownOperator {
                symbol: symbol.to_string(),
            })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.aliases.contains_key(symbol)
    }

    /// All registered aliases in sorted order
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.aliases.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
