//! Turns SQL text into engine [`Statement`]s.
//!
//! Tokenizing and grammar are left to `sqlparser`. This module walks the resulting
//! AST and keeps only the shapes the engine can run, rejecting everything else with
//! [`EngineError::Unsupported`] instead of guessing.

use indexmap::IndexMap;
use log::trace;
use sqlparser::ast::{
    self, Assignment, AssignmentTarget, BinaryOperator, DuplicateTreatment, Expr, FromTable,
    FunctionArgExpr, FunctionArguments, GroupByExpr, LimitClause, ObjectName, ObjectNamePart, ObjectType, OrderBy,
    OrderByKind, Query, Select, SelectItem, SetExpr, TableFactor, TableObject, TableWithJoins,
    UnaryOperator, Value,
};
use sqlparser::dialect::{Dialect, MySqlDialect};
use sqlparser::parser::Parser;

use super::predicate::{ComparisonOp, Operand, Predicate};
use super::statement::{
    AggregateCall, FunctionArg, OrderKey, Projection, SelectColumn, SelectStatement, Statement,
};
use crate::error::{EngineError, Result};
use crate::functions::aggregators::{self, Aggregator};

/// An SQL parser that performs the parsing and lowering of the SQL statements.
///
/// For now, it only uses a single dialect by default, but any `sqlparser`
/// dialect can be handed in.
pub struct SqlParser {
    dialect: Box<dyn Dialect>,
}

impl Default for SqlParser {
    fn default() -> Self {
        SqlParser::new(Box::new(MySqlDialect {}))
    }
}

impl SqlParser {
    pub fn new(dialect: Box<dyn Dialect>) -> SqlParser {
        SqlParser { dialect }
    }

    pub fn parse_sql(&self, sql: &str) -> Result<Vec<Statement>> {
        //! Parse one or more SQL statements at once.
        //!
        //! Returns the statements in source order.

        let ast = Parser::parse_sql(self.dialect.as_ref(), sql)?;
        trace!("parsed {} statement(s)", ast.len());

        ast.iter().map(lower_statement).collect()
    }

    pub fn parse_single_sql(&self, sql: &str) -> Result<Statement> {
        //! Parse exactly one SQL statement.

        let mut statements = self.parse_sql(sql)?;

        match statements.len() {
            0 => Err(EngineError::Parse("No statement to run.".to_string())),
            1 => Ok(statements.remove(0)),
            n => Err(EngineError::Parse(format!(
                "Please write a single statement at a time, got {}.",
                n
            ))),
        }
    }
}

fn unsupported<T>(what: impl Into<String>) -> Result<T> {
    Err(EngineError::Unsupported(what.into()))
}

fn reject_clauses(statement: &str, clauses: &[(bool, &str)]) -> Result<()> {
    //! Fail on the first clause that is present. The engine would otherwise run
    //! the statement as if the clause were not there.

    match clauses.iter().find(|(present, _)| *present) {
        Some((_, clause)) => unsupported(format!("{} in {}", clause, statement)),
        None => Ok(()),
    }
}

fn lower_statement(statement: &ast::Statement) -> Result<Statement> {
    match statement {
        ast::Statement::Query(query) => lower_query(query).map(Statement::Select),
        ast::Statement::Insert(insert) => {
            let table = match &insert.table {
                TableObject::TableName(name) => object_name(name)?,
                _ => return unsupported("INSERT into a table function"),
            };

            let columns = if insert.columns.is_empty() {
                None
            } else {
                Some(insert.columns.iter().map(|c| c.value.clone()).collect())
            };

            let source = insert
                .source
                .as_ref()
                .ok_or_else(|| EngineError::Parse("INSERT has no values.".to_string()))?;

            let rows = match source.body.as_ref() {
                SetExpr::Values(values) => values
                    .rows
                    .iter()
                    .map(|row| row.iter().map(literal).collect::<Result<Vec<_>>>())
                    .collect::<Result<Vec<_>>>()?,
                _ => return unsupported("INSERT only supports VALUES lists"),
            };

            Ok(Statement::Insert {
                table,
                columns,
                rows,
            })
        }
        ast::Statement::Update(update) => {
            reject_clauses(
                "UPDATE",
                &[
                    (update.or.is_some(), "OR conflict clause"),
                    (update.from.is_some(), "FROM"),
                    (update.returning.is_some(), "RETURNING"),
                    (update.limit.is_some(), "LIMIT"),
                ],
            )?;

            let table = table_name(&update.table)?;

            let mut assignments = IndexMap::new();
            for assignment in update.assignments.iter() {
                let (column, value) = lower_assignment(assignment)?;
                assignments.insert(column, value);
            }

            let filter = update.selection.as_ref().map(lower_predicate).transpose()?;

            Ok(Statement::Update {
                table,
                assignments,
                filter,
            })
        }
        ast::Statement::Delete(delete) => {
            reject_clauses(
                "DELETE",
                &[
                    (!delete.tables.is_empty(), "a table list before FROM"),
                    (delete.using.is_some(), "USING"),
                    (delete.returning.is_some(), "RETURNING"),
                    (!delete.order_by.is_empty(), "ORDER BY"),
                    (delete.limit.is_some(), "LIMIT"),
                ],
            )?;

            let tables = match &delete.from {
                FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables) => tables,
            };

            let table = match tables.as_slice() {
                [single] => table_name(single)?,
                [] => return Err(EngineError::Parse("DELETE names no table.".to_string())),
                _ => return unsupported("DELETE from more than one table"),
            };

            let filter = delete.selection.as_ref().map(lower_predicate).transpose()?;

            Ok(Statement::Delete { table, filter })
        }
        ast::Statement::CreateTable(create_table) => Ok(Statement::CreateTable {
            name: object_name(&create_table.name)?,
            columns: create_table
                .columns
                .iter()
                .map(|column| column.name.value.clone())
                .collect(),
            if_not_exists: create_table.if_not_exists,
        }),
        ast::Statement::Drop {
            object_type: ObjectType::Table,
            if_exists,
            names,
            ..
        } => Ok(Statement::DropTable {
            names: names.iter().map(object_name).collect::<Result<_>>()?,
            if_exists: *if_exists,
        }),
        ast::Statement::ShowTables { .. } => Ok(Statement::ShowTables),
        other => unsupported(format!("statement '{}'", other)),
    }
}

fn lower_query(query: &Query) -> Result<SelectStatement> {
    let select = match query.body.as_ref() {
        SetExpr::Select(select) => select,
        _ => return unsupported("only plain SELECT queries are handled"),
    };

    let grouped = match &select.group_by {
        GroupByExpr::Expressions(expressions, modifiers) => {
            !expressions.is_empty() || !modifiers.is_empty()
        }
        GroupByExpr::All(_) => true,
    };

    reject_clauses(
        "SELECT",
        &[
            (query.with.is_some(), "WITH"),
            (query.fetch.is_some(), "FETCH"),
            (!query.locks.is_empty(), "locking clause"),
            (query.for_clause.is_some(), "FOR clause"),
            (!query.pipe_operators.is_empty(), "pipe operators"),
            (select.distinct.is_some(), "DISTINCT"),
            (select.top.is_some(), "TOP"),
            (select.into.is_some(), "INTO"),
            (select.exclude.is_some(), "EXCLUDE"),
            (!select.lateral_views.is_empty(), "LATERAL VIEW"),
            (select.prewhere.is_some(), "PREWHERE"),
            (grouped, "GROUP BY"),
            (select.having.is_some(), "HAVING"),
            (!select.named_window.is_empty(), "WINDOW"),
            (select.qualify.is_some(), "QUALIFY"),
            (select.connect_by.is_some(), "CONNECT BY"),
            (
                !select.cluster_by.is_empty()
                    || !select.distribute_by.is_empty()
                    || !select.sort_by.is_empty(),
                "CLUSTER/DISTRIBUTE/SORT BY",
            ),
        ],
    )?;

    let table = match select.from.as_slice() {
        [single] => table_name(single)?,
        [] => {
            return Err(EngineError::Parse(
                "There is no table name after FROM keyword.".to_string(),
            ));
        }
        _ => return unsupported("SELECT over more than one table"),
    };

    let projection = lower_projection(select)?;
    let filter = select.selection.as_ref().map(lower_predicate).transpose()?;

    let order_by = match &query.order_by {
        Some(order_by) => lower_order_by(order_by)?,
        None => vec![],
    };

    let (limit, offset) = match &query.limit_clause {
        Some(limit_clause) => lower_limit(limit_clause)?,
        None => (None, None),
    };

    Ok(SelectStatement {
        projection,
        table,
        filter,
        order_by,
        limit,
        offset,
    })
}

fn lower_projection(select: &Select) -> Result<Projection> {
    let mut columns = vec![];
    let mut calls = vec![];
    let mut wildcard = false;

    for item in select.projection.iter() {
        let (expr, alias) = match item {
            SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(_, _) => {
                wildcard = true;
                continue;
            }
            SelectItem::UnnamedExpr(expr) => (expr, None),
            SelectItem::ExprWithAlias { expr, alias } => (expr, Some(alias.value.clone())),
        };

        match expr {
            Expr::Function(function) => calls.push(lower_aggregate(function, alias)?),
            other => columns.push(SelectColumn {
                name: column_name(other)?,
                alias,
            }),
        }
    }

    match (wildcard, columns.is_empty(), calls.is_empty()) {
        (true, true, true) => Ok(Projection::All),
        (false, false, true) => Ok(Projection::Columns(columns)),
        (false, true, false) => Ok(Projection::Aggregates(calls)),
        (true, _, _) => unsupported("'*' mixed with other select items"),
        _ => Err(EngineError::Invalid(
            "Plain columns are not allowed together with aggregators.".to_string(),
        )),
    }
}

fn lower_aggregate(function: &ast::Function, alias: Option<String>) -> Result<AggregateCall> {
    let name = match function.name.0.as_slice() {
        [ObjectNamePart::Identifier(ident)] => ident.value.clone(),
        _ => return unsupported(format!("function '{}'", function.name)),
    };

    if !aggregators::is_allowed(&name) {
        return Err(EngineError::Unsupported(format!(
            "The function {} is not an allowed aggregator.",
            name
        )));
    }

    let aggregator = Aggregator::from_name(&name)
        .ok_or_else(|| EngineError::Unsupported(format!("aggregator {}", name)))?;

    reject_clauses(
        "an aggregate call",
        &[
            (function.filter.is_some(), "FILTER"),
            (function.over.is_some(), "OVER"),
            (function.null_treatment.is_some(), "null treatment"),
            (!function.within_group.is_empty(), "WITHIN GROUP"),
            (!matches!(function.parameters, FunctionArguments::None), "parameters"),
        ],
    )?;

    let args = match &function.args {
        FunctionArguments::List(list) => {
            reject_clauses(
                "an aggregate call",
                &[
                    (
                        list.duplicate_treatment == Some(DuplicateTreatment::Distinct),
                        "DISTINCT",
                    ),
                    (!list.clauses.is_empty(), "argument clauses"),
                ],
            )?;
            &list.args
        }
        _ => {
            return Err(EngineError::Invalid(format!(
                "Invalid arguments to {}. Check your query.",
                name
            )));
        }
    };

    let arg = match args.as_slice() {
        [ast::FunctionArg::Unnamed(FunctionArgExpr::Wildcard)] => FunctionArg::Wildcard,
        [ast::FunctionArg::Unnamed(FunctionArgExpr::Expr(expr))] => {
            FunctionArg::Column(column_name(expr)?)
        }
        _ => {
            return Err(EngineError::Invalid(format!(
                "{} takes in a wildcard or a single column.",
                name
            )));
        }
    };

    Ok(AggregateCall {
        aggregator,
        arg,
        alias,
    })
}

fn lower_order_by(order_by: &OrderBy) -> Result<Vec<OrderKey>> {
    match &order_by.kind {
        OrderByKind::Expressions(expressions) => expressions
            .iter()
            .map(|order| -> Result<OrderKey> {
                Ok(OrderKey {
                    column: column_name(&order.expr)?,
                    ascending: order.options.asc.unwrap_or(true),
                })
            })
            .collect(),
        _ => unsupported("ORDER BY ALL"),
    }
}

fn lower_limit(limit_clause: &LimitClause) -> Result<(Option<usize>, Option<usize>)> {
    match limit_clause {
        LimitClause::LimitOffset { limit, offset, .. } => {
            let limit = limit.as_ref().map(|e| count(e, "LIMIT")).transpose()?;
            let offset = offset
                .as_ref()
                .map(|o| count(&o.value, "OFFSET"))
                .transpose()?;
            Ok((limit, offset))
        }
        LimitClause::OffsetCommaLimit { offset, limit } => {
            Ok((Some(count(limit, "LIMIT")?), Some(count(offset, "OFFSET")?)))
        }
    }
}

fn count(expr: &Expr, what: &str) -> Result<usize> {
    let value = literal(expr)?
        .ok_or_else(|| EngineError::Invalid(format!("{} cannot be NULL", what)))?;

    value
        .parse::<usize>()
        .map_err(|_| EngineError::Invalid(format!("{} must be a non-negative integer", what)))
}

fn lower_assignment(assignment: &Assignment) -> Result<(String, Option<String>)> {
    let column = match &assignment.target {
        AssignmentTarget::ColumnName(name) => match name.0.last() {
            Some(ObjectNamePart::Identifier(ident)) => ident.value.clone(),
            _ => return Err(EngineError::Parse("Invalid column name format.".to_string())),
        },
        _ => return unsupported("tuple assignments"),
    };

    Ok((column, literal(&assignment.value)?))
}

fn lower_predicate(expr: &Expr) -> Result<Predicate> {
    //! Build the [`Predicate`] tree for a WHERE clause.

    match expr {
        Expr::Nested(inner) => lower_predicate(inner),
        Expr::BinaryOp { left, op, right } => match op {
            BinaryOperator::And => Ok(Predicate::and(
                lower_predicate(left)?,
                lower_predicate(right)?,
            )),
            BinaryOperator::Or => Ok(Predicate::or(
                lower_predicate(left)?,
                lower_predicate(right)?,
            )),
            _ => {
                let op = comparison_op(op)?;
                Ok(Predicate::compare(operand(left)?, op, operand(right)?))
            }
        },
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr,
        } => Ok(Predicate::negate(lower_predicate(expr)?)),
        Expr::IsNull(inner) => Ok(Predicate::IsNull(column_name(inner)?)),
        Expr::IsNotNull(inner) => Ok(Predicate::IsNotNull(column_name(inner)?)),
        Expr::Value(value) => match &value.value {
            Value::Boolean(b) => Ok(Predicate::Constant(*b)),
            _ => Err(EngineError::Invalid(format!(
                "'{}' is not a condition.",
                value
            ))),
        },
        other => unsupported(format!("WHERE condition '{}'", other)),
    }
}

fn comparison_op(op: &BinaryOperator) -> Result<ComparisonOp> {
    match op {
        BinaryOperator::Eq => Ok(ComparisonOp::Eq),
        BinaryOperator::NotEq => Ok(ComparisonOp::NotEq),
        BinaryOperator::Lt => Ok(ComparisonOp::Lt),
        BinaryOperator::LtEq => Ok(ComparisonOp::LtEq),
        BinaryOperator::Gt => Ok(ComparisonOp::Gt),
        BinaryOperator::GtEq => Ok(ComparisonOp::GtEq),
        other => unsupported(format!("operator '{}' in WHERE condition", other)),
    }
}

fn operand(expr: &Expr) -> Result<Operand> {
    match expr {
        Expr::Identifier(_) | Expr::CompoundIdentifier(_) => Ok(Operand::Column(column_name(expr)?)),
        Expr::Nested(inner) => operand(inner),
        _ => match literal(expr)? {
            Some(value) => Ok(Operand::Literal(value)),
            None => Err(EngineError::Invalid(
                "Comparing with NULL is never true; use IS NULL instead.".to_string(),
            )),
        },
    }
}

fn literal(expr: &Expr) -> Result<Option<String>> {
    //! Extract a literal as the raw string the engine stores. `None` is NULL.

    match expr {
        Expr::Value(value) => match &value.value {
            Value::Number(number, _) => Ok(Some(number.clone())),
            Value::SingleQuotedString(string) | Value::DoubleQuotedString(string) => {
                Ok(Some(string.clone()))
            }
            Value::Boolean(b) => Ok(Some(b.to_string())),
            Value::Null => Ok(None),
            other => unsupported(format!("value {}", other)),
        },
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr,
        } => match literal(expr)? {
            Some(value) if value.parse::<f64>().is_ok() => match value.strip_prefix('-') {
                Some(positive) => Ok(Some(positive.to_string())),
                None => Ok(Some(format!("-{}", value))),
            },
            _ => Err(EngineError::Invalid(format!("Cannot negate '{}'.", expr))),
        },
        Expr::UnaryOp {
            op: UnaryOperator::Plus,
            expr,
        } => literal(expr),
        Expr::Nested(inner) => literal(inner),
        other => unsupported(format!("expression '{}' where a value was expected", other)),
    }
}

fn column_name(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Identifier(ident) => Ok(ident.value.clone()),
        Expr::CompoundIdentifier(idents) => idents
            .last()
            .map(|ident| ident.value.clone())
            .ok_or_else(|| EngineError::Parse("Empty column name.".to_string())),
        Expr::Nested(inner) => column_name(inner),
        other => Err(EngineError::Invalid(format!(
            "Invalid column identifier expression '{}'!",
            other
        ))),
    }
}

fn object_name(name: &ObjectName) -> Result<String> {
    match name.0.last() {
        Some(ObjectNamePart::Identifier(ident)) => Ok(ident.value.clone()),
        _ => Err(EngineError::Parse(format!("Invalid table name '{}'.", name))),
    }
}

fn table_name(table_with_joins: &TableWithJoins) -> Result<String> {
    if !table_with_joins.joins.is_empty() {
        return unsupported("JOIN");
    }

    match &table_with_joins.relation {
        TableFactor::Table { name, .. } => object_name(name),
        _ => Err(EngineError::Parse("Invalid table name format.".to_string())),
    }
}
