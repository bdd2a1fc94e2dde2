// Filter node tree produced by the parser

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalKind {
    And,
    Or,
}

impl fmt::Display for LogicalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalKind::And => write!(f, ";"),
            LogicalKind::Or => write!(f, ","),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `selector operator argument(s)`
    Comparison {
        selector: String,
        operator: String,
        arguments: Vec<String>,
    },
    /// Two or more constraints joined by the same logical operator
    Logical {
        kind: LogicalKind,
        children: Vec<Node>,
    },
}

impl Node {
    pub fn comparison<I, S>(selector: impl Into<String>, operator: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Node::Comparison {
            selector: selector.into(),
            operator: operator.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn and(children: Vec<Node>) -> Self {
        Node::Logical {
            kind: LogicalKind::And,
            children,
        }
    }

    pub fn or(children: Vec<Node>) -> Self {
        Node::Logical {
            kind: LogicalKind::Or,
            children,
        }
    }

    /// Number of comparison leaves
    pub fn comparisons(&self) -> usize {
        match self {
            Node::Comparison { .. } => 1,
            Node::Logical { children, .. } => children.iter().map(Node::comparisons).sum(),
        }
    }
}

fn fmt_argument(f: &mut fmt::Formatter<'_>, argument: &str) -> fmt::Result {
    if argument.is_empty() || argument.chars().any(super::token::Token::is_reserved) {
        write!(f, "'{}'", argument.replace('\\', "\\\\").replace('\'', "\\'"))
    } else {
        write!(f, "{}", argument)
    }
}

/// Renders the node back into filter syntax, with every logical group parenthesized
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Comparison {
                selector,
                operator,
                arguments,
            } => {
                write!(f, "{}{}", selector, operator)?;
                if arguments.len() == 1 {
                    fmt_argument(f, &arguments[0])
                } else {
                    write!(f, "(")?;
                    for (i, argument) in arguments.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        fmt_argument(f, argument)?;
                    }
                    write!(f, ")")
                }
            }
            Node::Logical { kind, children } => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", kind)?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let node = Node::or(vec![
            Node::and(vec![
                Node::comparison("name", "==", ["Car 1"]),
                Node::comparison("id", "=in=", ["3", "6"]),
            ]),
            Node::comparison("description", "=notempty=", [""]),
        ]);
        assert_eq!(
            node.to_string(),
            "((name=='Car 1';id=in=(3,6)),description=notempty='')"
        );
        assert_eq!(node.comparisons(), 3);
    }
}
