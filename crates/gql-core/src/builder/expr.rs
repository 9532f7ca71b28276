//! Expression trees for WHERE and RETURNING clauses.

use super::value::{SqlValue, ToSqlValue};
use crate::dialect::Dialect;

/// Creates an identifier. Dots separate qualifiers: `i("items.name")`
/// renders as `"items"."name"`.
#[must_use]
pub fn i(name: &str) -> Ident {
    Ident {
        parts: name.split('.').map(String::from).collect(),
        all: false,
    }
}

/// Creates a raw SQL fragment that is rendered verbatim.
///
/// **Warning**: Only use this for SQL fragments that don't contain user input.
#[must_use]
pub fn literal(sql: impl Into<String>) -> Expr {
    Expr::Literal(sql.into())
}

/// Creates a value operand.
#[must_use]
pub fn val<T: ToSqlValue>(value: T) -> Expr {
    Expr::Value(value.to_sql_value())
}

/// Combines expressions with AND.
#[must_use]
pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Group {
        op: GroupOp::And,
        exprs: exprs.into_iter().collect(),
    }
}

/// Combines expressions with OR.
#[must_use]
pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Group {
        op: GroupOp::Or,
        exprs: exprs.into_iter().collect(),
    }
}

/// A possibly qualified identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    parts: Vec<String>,
    all: bool,
}

impl Ident {
    /// Appends a column to this identifier.
    #[must_use]
    pub fn col(mut self, name: &str) -> Self {
        self.parts.push(String::from(name));
        self
    }

    /// Selects every column of this identifier: `"items".*`.
    #[must_use]
    pub fn all(mut self) -> Self {
        self.all = true;
        self
    }

    /// Returns the unquoted identifier parts.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Renders the quoted identifier using the given dialect.
    #[must_use]
    pub fn to_sql<D: Dialect + ?Sized>(&self, dialect: &D) -> String {
        let mut out = String::new();
        self.write_sql(dialect, &mut out);
        out
    }

    fn write_sql<D: Dialect + ?Sized>(&self, dialect: &D, out: &mut String) {
        let mut quoted: Vec<String> = self
            .parts
            .iter()
            .map(|part| dialect.quote_identifier(part))
            .collect();
        if self.all {
            quoted.push(String::from("*"));
        }
        out.push_str(&quoted.join("."));
    }

    /// Creates an IS NULL expression.
    #[must_use]
    pub fn is_null(self) -> Expr {
        Expr::from(self).is_null()
    }

    /// Creates an IS NOT NULL expression.
    #[must_use]
    pub fn is_not_null(self) -> Expr {
        Expr::from(self).is_not_null()
    }

    /// Creates an IS TRUE expression.
    #[must_use]
    pub fn is_true(self) -> Expr {
        Expr::from(self).is_true()
    }

    /// Creates an IS FALSE expression.
    #[must_use]
    pub fn is_false(self) -> Expr {
        Expr::from(self).is_false()
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq<T: ToSqlValue>(self, value: T) -> Expr {
        Expr::from(self).eq(value)
    }

    /// Creates an inequality expression.
    #[must_use]
    pub fn neq<T: ToSqlValue>(self, value: T) -> Expr {
        Expr::from(self).neq(value)
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt<T: ToSqlValue>(self, value: T) -> Expr {
        Expr::from(self).gt(value)
    }

    /// Creates a greater-than-or-equal expression.
    #[must_use]
    pub fn gte<T: ToSqlValue>(self, value: T) -> Expr {
        Expr::from(self).gte(value)
    }

    /// Creates a less-than expression.
    #[must_use]
    pub fn lt<T: ToSqlValue>(self, value: T) -> Expr {
        Expr::from(self).lt(value)
    }

    /// Creates a less-than-or-equal expression.
    #[must_use]
    pub fn lte<T: ToSqlValue>(self, value: T) -> Expr {
        Expr::from(self).lte(value)
    }

    /// Creates a LIKE expression.
    #[must_use]
    pub fn like<T: ToSqlValue>(self, pattern: T) -> Expr {
        Expr::from(self).like(pattern)
    }

    /// Creates an IN expression.
    #[must_use]
    pub fn in_list<T: ToSqlValue>(self, values: impl IntoIterator<Item = T>) -> Expr {
        Expr::from(self).in_list(values)
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
}

impl CompareOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
        }
    }
}

/// Postfix IS tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsOp {
    Null,
    NotNull,
    True,
    False,
}

impl IsOp {
    /// Returns the SQL representation of the test.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "IS NULL",
            Self::NotNull => "IS NOT NULL",
            Self::True => "IS TRUE",
            Self::False => "IS FALSE",
        }
    }
}

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOp {
    And,
    Or,
}

impl GroupOp {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Identifier reference.
    Ident(Ident),
    /// Raw fragment, rendered verbatim.
    Literal(String),
    /// Inlined value.
    Value(SqlValue),
    /// Binary comparison.
    Compare {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: CompareOp,
        /// Right operand.
        right: Box<Expr>,
    },
    /// IS NULL / IS TRUE style test.
    Is {
        /// The expression to test.
        expr: Box<Expr>,
        /// The test.
        op: IsOp,
    },
    /// IN list.
    In {
        /// The expression to check.
        expr: Box<Expr>,
        /// Candidate values.
        list: Vec<Expr>,
        /// Whether this is NOT IN.
        negated: bool,
    },
    /// AND / OR group.
    Group {
        /// Connective.
        op: GroupOp,
        /// Members, in order.
        exprs: Vec<Expr>,
    },
}

impl Expr {
    fn compare<T: ToSqlValue>(self, op: CompareOp, value: T) -> Self {
        Self::Compare {
            left: Box::new(self),
            op,
            right: Box::new(val(value)),
        }
    }

    fn is(self, op: IsOp) -> Self {
        Self::Is {
            expr: Box::new(self),
            op,
        }
    }

    /// Creates an IS NULL expression.
    #[must_use]
    pub fn is_null(self) -> Self {
        self.is(IsOp::Null)
    }

    /// Creates an IS NOT NULL expression.
    #[must_use]
    pub fn is_not_null(self) -> Self {
        self.is(IsOp::NotNull)
    }

    /// Creates an IS TRUE expression.
    #[must_use]
    pub fn is_true(self) -> Self {
        self.is(IsOp::True)
    }

    /// Creates an IS FALSE expression.
    #[must_use]
    pub fn is_false(self) -> Self {
        self.is(IsOp::False)
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq<T: ToSqlValue>(self, value: T) -> Self {
        self.compare(CompareOp::Eq, value)
    }

    /// Creates an inequality expression.
    #[must_use]
    pub fn neq<T: ToSqlValue>(self, value: T) -> Self {
        self.compare(CompareOp::NotEq, value)
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt<T: ToSqlValue>(self, value: T) -> Self {
        self.compare(CompareOp::Gt, value)
    }

    /// Creates a greater-than-or-equal expression.
    #[must_use]
    pub fn gte<T: ToSqlValue>(self, value: T) -> Self {
        self.compare(CompareOp::GtEq, value)
    }

    /// Creates a less-than expression.
    #[must_use]
    pub fn lt<T: ToSqlValue>(self, value: T) -> Self {
        self.compare(CompareOp::Lt, value)
    }

    /// Creates a less-than-or-equal expression.
    #[must_use]
    pub fn lte<T: ToSqlValue>(self, value: T) -> Self {
        self.compare(CompareOp::LtEq, value)
    }

    /// Creates a LIKE expression.
    #[must_use]
    pub fn like<T: ToSqlValue>(self, pattern: T) -> Self {
        self.compare(CompareOp::Like, pattern)
    }

    /// Creates an IN expression.
    #[must_use]
    pub fn in_list<T: ToSqlValue>(self, values: impl IntoIterator<Item = T>) -> Self {
        Self::In {
            expr: Box::new(self),
            list: values.into_iter().map(val).collect(),
            negated: false,
        }
    }

    /// Creates a NOT IN expression.
    #[must_use]
    pub fn not_in_list<T: ToSqlValue>(self, values: impl IntoIterator<Item = T>) -> Self {
        Self::In {
            expr: Box::new(self),
            list: values.into_iter().map(val).collect(),
            negated: true,
        }
    }

    /// Combines with another expression using AND.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        self.join(GroupOp::And, other)
    }

    /// Combines with another expression using OR.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        self.join(GroupOp::Or, other)
    }

    fn join(self, op: GroupOp, other: Self) -> Self {
        if other.is_empty_group() {
            return self;
        }
        if self.is_empty_group() {
            return other;
        }
        match self {
            Self::Group { op: current, mut exprs } if current == op => {
                exprs.push(other);
                Self::Group { op, exprs }
            }
            first => Self::Group {
                op,
                exprs: vec![first, other],
            },
        }
    }

    /// Returns `true` for a group whose members are all empty groups,
    /// including a group with no members at all.
    #[must_use]
    pub fn is_empty_group(&self) -> bool {
        matches!(self, Self::Group { exprs, .. } if exprs.iter().all(Self::is_empty_group))
    }

    fn members(exprs: &[Self]) -> impl Iterator<Item = &Self> {
        exprs.iter().filter(|e| !e.is_empty_group())
    }

    /// Renders the expression using the given dialect.
    #[must_use]
    pub fn to_sql<D: Dialect + ?Sized>(&self, dialect: &D) -> String {
        let mut out = String::new();
        self.write_sql(dialect, &mut out);
        out
    }

    fn write_sql<D: Dialect + ?Sized>(&self, dialect: &D, out: &mut String) {
        match self {
            Self::Ident(ident) => ident.write_sql(dialect, out),
            Self::Literal(sql) => out.push_str(sql),
            Self::Value(value) => out.push_str(&value.to_sql_inline()),
            Self::Compare { left, op, right } => {
                left.write_operand(dialect, out);
                out.push(' ');
                out.push_str(op.as_str());
                out.push(' ');
                right.write_operand(dialect, out);
            }
            Self::Is { expr, op } => {
                expr.write_operand(dialect, out);
                out.push(' ');
                out.push_str(op.as_str());
            }
            Self::In {
                expr,
                list,
                negated,
            } => {
                expr.write_operand(dialect, out);
                out.push_str(if *negated { " NOT IN (" } else { " IN (" });
                for (idx, item) in list.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    item.write_operand(dialect, out);
                }
                out.push(')');
            }
            Self::Group { op, exprs } => match Self::members(exprs).collect::<Vec<_>>().as_slice() {
                [] => {}
                [single] => single.write_sql(dialect, out),
                members => {
                    for (idx, expr) in members.iter().enumerate() {
                        if idx > 0 {
                            out.push(' ');
                            out.push_str(op.as_str());
                            out.push(' ');
                        }
                        expr.write_operand(dialect, out);
                    }
                }
            },
        }
    }

    /// Writes the expression, parenthesised when it is itself a predicate.
    fn write_operand<D: Dialect + ?Sized>(&self, dialect: &D, out: &mut String) {
        match self {
            Self::Ident(_) | Self::Literal(_) | Self::Value(_) => self.write_sql(dialect, out),
            Self::Group { exprs, .. } if Self::members(exprs).count() <= 1 => {
                if let Some(only) = Self::members(exprs).next() {
                    only.write_operand(dialect, out);
                }
            }
            _ => {
                out.push('(');
                self.write_sql(dialect, out);
                out.push(')');
            }
        }
    }
}

impl From<Ident> for Expr {
    fn from(ident: Ident) -> Self {
        Self::Ident(ident)
    }
}

impl From<SqlValue> for Expr {
    fn from(value: SqlValue) -> Self {
        Self::Value(value)
    }
}
