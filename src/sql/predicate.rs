//! The typed form of a WHERE clause.
//!
//! A [`Predicate`] is built once by the parser and then evaluated directly against
//! each [`Row`]. Every value is a raw string, so comparisons go through
//! [`compare_values`] which picks numeric or textual ordering per pair.

use std::cmp::Ordering;
use std::fmt::Display;

use crate::persistence::Row;

/// One side of a comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Column(String),
    Literal(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    Compare {
        left: Operand,
        op: ComparisonOp,
        right: Operand,
    },
    IsNull(String),
    IsNotNull(String),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    Constant(bool),
}

/// Total order over raw values.
///
/// Two values that both parse as numbers compare numerically. Anything else compares
/// as text, and numbers sort before non-numbers so a column of mixed values still
/// sorts consistently.
pub fn compare_values(left: &str, right: &str) -> Ordering {
    match (as_number(left), as_number(right)) {
        (Some(l), Some(r)) => l.total_cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.cmp(right),
    }
}

fn as_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Order two possibly absent values; absent sorts first.
pub fn compare_optional(left: Option<&str>, right: Option<&str>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => compare_values(l, r),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl Operand {
    fn resolve<'a>(&'a self, row: &'a Row) -> Option<&'a str> {
        match self {
            Operand::Column(name) => row.get(name),
            Operand::Literal(value) => Some(value.as_str()),
        }
    }
}

impl ComparisonOp {
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Eq => ordering == Ordering::Equal,
            ComparisonOp::NotEq => ordering != Ordering::Equal,
            ComparisonOp::Lt => ordering == Ordering::Less,
            ComparisonOp::LtEq => ordering != Ordering::Greater,
            ComparisonOp::Gt => ordering == Ordering::Greater,
            ComparisonOp::GtEq => ordering != Ordering::Less,
        }
    }
}

impl Predicate {
    pub fn and(left: Predicate, right: Predicate) -> Predicate {
        Predicate::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Predicate, right: Predicate) -> Predicate {
        Predicate::Or(Box::new(left), Box::new(right))
    }

    pub fn negate(inner: Predicate) -> Predicate {
        Predicate::Not(Box::new(inner))
    }

    pub fn compare(left: Operand, op: ComparisonOp, right: Operand) -> Predicate {
        Predicate::Compare { left, op, right }
    }

    pub fn evaluate(&self, row: &Row) -> bool {
        //! Check whether `row` satisfies the predicate.
        //!
        //! A comparison with an absent value on either side is false.

        match self {
            Predicate::Compare { left, op, right } => {
                match (left.resolve(row), right.resolve(row)) {
                    (Some(l), Some(r)) => op.holds(compare_values(l, r)),
                    _ => false,
                }
            }
            Predicate::IsNull(column) => !row.contains(column),
            Predicate::IsNotNull(column) => row.contains(column),
            Predicate::And(left, right) => left.evaluate(row) && right.evaluate(row),
            Predicate::Or(left, right) => left.evaluate(row) || right.evaluate(row),
            Predicate::Not(inner) => !inner.evaluate(row),
            Predicate::Constant(value) => *value,
        }
    }

    pub fn columns(&self) -> Vec<&str> {
        //! Every column name the predicate reads, in order of appearance.

        let mut columns = vec![];
        self.collect_columns(&mut columns);
        columns
    }

    fn collect_columns<'a>(&'a self, into: &mut Vec<&'a str>) {
        match self {
            Predicate::Compare { left, right, .. } => {
                for operand in [left, right] {
                    if let Operand::Column(name) = operand {
                        into.push(name);
                    }
                }
            }
            Predicate::IsNull(column) | Predicate::IsNotNull(column) => into.push(column),
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                left.collect_columns(into);
                right.collect_columns(into);
            }
            Predicate::Not(inner) => inner.collect_columns(into),
            Predicate::Constant(_) => {}
        }
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Column(name) => write!(f, "{}", name),
            Operand::Literal(value) => write!(f, "'{}'", value),
        }
    }
}

impl Display for ComparisonOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::NotEq => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::LtEq => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::GtEq => ">=",
        };
        write!(f, "{}", symbol)
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Compare { left, op, right } => write!(f, "{} {} {}", left, op, right),
            Predicate::IsNull(column) => write!(f, "{} IS NULL", column),
            Predicate::IsNotNull(column) => write!(f, "{} IS NOT NULL", column),
            Predicate::And(left, right) => write!(f, "({} AND {})", left, right),
            Predicate::Or(left, right) => write!(f, "({} OR {})", left, right),
            Predicate::Not(inner) => write!(f, "NOT {}", inner),
            Predicate::Constant(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(age: &str, name: &str) -> Row {
        Row::from_pairs([("age", age), ("name", name)])
    }

    fn column(name: &str) -> Operand {
        Operand::Column(name.to_string())
    }

    fn literal(value: &str) -> Operand {
        Operand::Literal(value.to_string())
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(compare_values("9", "10"), Ordering::Less);
        assert_eq!(compare_values("2.50", "2.5"), Ordering::Equal);
        assert_eq!(compare_values("-3", "1"), Ordering::Less);
    }

    #[test]
    fn text_compares_lexicographically_after_numbers() {
        assert_eq!(compare_values("Alice", "Bob"), Ordering::Less);
        assert_eq!(compare_values("100", "abc"), Ordering::Less);
        assert_eq!(compare_values("abc", "100"), Ordering::Greater);
    }

    #[test]
    fn comparison_against_literal() {
        let older_than_30 = Predicate::compare(column("age"), ComparisonOp::Gt, literal("30"));

        assert!(older_than_30.evaluate(&person("35", "Charlie")));
        assert!(!older_than_30.evaluate(&person("30", "Alice")));
        assert!(!older_than_30.evaluate(&person("4", "Dora")));
    }

    #[test]
    fn absent_column_never_compares() {
        let row = Row::from_pairs([("name", "Eve")]);
        let eq = Predicate::compare(column("age"), ComparisonOp::Eq, literal("1"));
        let ne = Predicate::compare(column("age"), ComparisonOp::NotEq, literal("1"));

        assert!(!eq.evaluate(&row));
        assert!(!ne.evaluate(&row));
        assert!(Predicate::IsNull("age".to_string()).evaluate(&row));
        assert!(Predicate::IsNotNull("name".to_string()).evaluate(&row));
    }

    #[test]
    fn logical_operators_combine() {
        let young = Predicate::compare(column("age"), ComparisonOp::Lt, literal("30"));
        let bob = Predicate::compare(column("name"), ComparisonOp::Eq, literal("Bob"));
        let either = Predicate::or(young.clone(), bob.clone());
        let neither = Predicate::negate(either.clone());
        let both = Predicate::and(young, bob);

        let bob_25 = person("25", "Bob");
        let alice_40 = person("40", "Alice");

        assert!(either.evaluate(&bob_25));
        assert!(both.evaluate(&bob_25));
        assert!(!either.evaluate(&alice_40));
        assert!(neither.evaluate(&alice_40));
    }

    #[test]
    fn column_to_column_comparison() {
        let row = Row::from_pairs([("low", "3"), ("high", "12")]);
        let ordered = Predicate::compare(column("low"), ComparisonOp::LtEq, column("high"));

        assert!(ordered.evaluate(&row));
    }

    #[test]
    fn columns_are_collected_in_order() {
        let predicate = Predicate::and(
            Predicate::compare(column("a"), ComparisonOp::Eq, literal("1")),
            Predicate::negate(Predicate::IsNull("b".to_string())),
        );

        assert_eq!(predicate.columns(), vec!["a", "b"]);
    }
}
