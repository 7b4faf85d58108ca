use sqlparser::ast::{
    BinaryOperator, Expr, Ident, Insert, Query, SelectItem, SetExpr, Statement as SqlStatement, TableFactor,
    UnaryOperator, Value as SqlValue,
};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser as SqlParser;

use crate::value::Value;

use super::{MemError, MemResult};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Statement {
    CreateTable {
        table: String,
        columns: Vec<String>,
    },
    /// An empty column list means every column of the table, in table order.
    Insert {
        table: String,
        columns: Vec<String>,
        rows: Vec<Vec<Operand>>,
    },
    Select(Select),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Select {
    pub table: String,
    pub projection: Projection,
    pub filter: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Projection {
    All,
    Columns(Vec<Output>),
}

/// A projected column and the name it is reported under.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Output {
    pub column: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Condition {
    Eq { column: String, operand: Operand },
    IsNull { column: String },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Operand {
    Literal(Value),
    /// Zero-based index into the query parameters.
    Param(usize),
}

impl Operand {
    pub fn evaluate(&self, params: &[Value]) -> MemResult<Value> {
        match self {
            Operand::Literal(value) => Ok(value.clone()),
            Operand::Param(index) => params
                .get(*index)
                .cloned()
                .ok_or(MemError::MissingParameter(index + 1)),
        }
    }
}

pub(crate) struct Parser {
    dialect: GenericDialect,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            dialect: GenericDialect {},
        }
    }

    pub fn parse(&self, sql: &str) -> MemResult<Statement> {
        let ast = SqlParser::parse_sql(&self.dialect, sql).map_err(|e| MemError::Parse(e.to_string()))?;
        let statement = match ast.as_slice() {
            [statement] => statement,
            [] => return Err(MemError::Parse("empty SQL statement".to_string())),
            _ => return Err(MemError::Unsupported("multiple statements".to_string())),
        };

        // Positional `?` placeholders are numbered across the whole statement.
        let mut next_param = 0;
        match statement {
            SqlStatement::CreateTable(create_table) => Ok(Statement::CreateTable {
                table: create_table.name.to_string(),
                columns: create_table.columns.iter().map(|col| col.name.value.clone()).collect(),
            }),
            SqlStatement::Insert(insert) => parse_insert(insert, &mut next_param),
            SqlStatement::Query(query) => parse_select(query, &mut next_param).map(Statement::Select),
            other => Err(MemError::Unsupported(other.to_string())),
        }
    }
}

fn parse_insert(insert: &Insert, next_param: &mut usize) -> MemResult<Statement> {
    let table = insert.table.to_string();
    let columns = insert.columns.iter().map(|col| col.value.clone()).collect();

    let rows = match insert.source.as_deref().map(|query| query.body.as_ref()) {
        Some(SetExpr::Values(values)) if !values.rows.is_empty() => values
            .rows
            .iter()
            .map(|row| row.iter().map(|expr| parse_operand(expr, next_param)).collect())
            .collect::<MemResult<Vec<Vec<Operand>>>>()?,
        _ => {
            return Err(MemError::Unsupported(
                "only INSERT ... VALUES is supported".to_string(),
            ));
        }
    };

    Ok(Statement::Insert { table, columns, rows })
}

fn parse_select(query: &Query, next_param: &mut usize) -> MemResult<Select> {
    let select = match query.body.as_ref() {
        SetExpr::Select(select) => select,
        _ => return Err(MemError::Unsupported("only plain SELECT is supported".to_string())),
    };

    let table = match select.from.as_slice() {
        [from] if from.joins.is_empty() => match &from.relation {
            TableFactor::Table { name, .. } => name.to_string(),
            _ => return Err(MemError::Unsupported("only simple table references are supported".to_string())),
        },
        _ => return Err(MemError::Unsupported("SELECT must read exactly one table".to_string())),
    };

    let projection = match select.projection.as_slice() {
        [SelectItem::Wildcard(_)] => Projection::All,
        items => Projection::Columns(
            items
                .iter()
                .map(|item| match item {
                    SelectItem::UnnamedExpr(expr) => {
                        let column = column_name(expr)?;
                        Ok(Output {
                            name: column.clone(),
                            column,
                        })
                    }
                    SelectItem::ExprWithAlias { expr, alias } => Ok(Output {
                        column: column_name(expr)?,
                        name: alias.value.clone(),
                    }),
                    _ => Err(MemError::Unsupported(
                        "only column references are supported in the projection".to_string(),
                    )),
                })
                .collect::<MemResult<Vec<Output>>>()?,
        ),
    };

    let mut filter = Vec::new();
    if let Some(selection) = &select.selection {
        parse_where(selection, next_param, &mut filter)?;
    }

    Ok(Select {
        table,
        projection,
        filter,
    })
}

fn parse_where(expr: &Expr, next_param: &mut usize, filter: &mut Vec<Condition>) -> MemResult<()> {
    match expr {
        Expr::Nested(inner) => parse_where(inner, next_param, filter),
        Expr::BinaryOp {
            left,
            op: BinaryOperator::And,
            right,
        } => {
            parse_where(left, next_param, filter)?;
            parse_where(right, next_param, filter)
        }
        Expr::BinaryOp {
            left,
            op: BinaryOperator::Eq,
            right,
        } => {
            filter.push(Condition::Eq {
                column: column_name(left)?,
                operand: parse_operand(right, next_param)?,
            });
            Ok(())
        }
        Expr::IsNull(inner) => {
            filter.push(Condition::IsNull {
                column: column_name(inner)?,
            });
            Ok(())
        }
        other => Err(MemError::Unsupported(format!(
            "WHERE supports `column = value`, `column IS NULL` and AND, got `{other}`"
        ))),
    }
}

fn column_name(expr: &Expr) -> MemResult<String> {
    match expr {
        Expr::Identifier(ident) => Ok(ident.value.clone()),
        Expr::CompoundIdentifier(parts) => parts
            .last()
            .map(|ident: &Ident| ident.value.clone())
            .ok_or_else(|| MemError::Parse("empty identifier".to_string())),
        other => Err(MemError::Unsupported(format!("`{other}` is not a column reference"))),
    }
}

fn parse_operand(expr: &Expr, next_param: &mut usize) -> MemResult<Operand> {
    match expr {
        Expr::Nested(inner) => parse_operand(inner, next_param),
        Expr::Value(value) => match &value.value {
            SqlValue::Placeholder(placeholder) => placeholder_index(placeholder, next_param).map(Operand::Param),
            literal => parse_literal(literal).map(Operand::Literal),
        },
        Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr,
        } => match parse_operand(expr, next_param)? {
            Operand::Literal(Value::Int(n)) => Ok(Operand::Literal(Value::Int(-n))),
            Operand::Literal(Value::Float(f)) => Ok(Operand::Literal(Value::Float(-f))),
            _ => Err(MemError::Unsupported(format!("cannot negate `{expr}`"))),
        },
        other => Err(MemError::Unsupported(format!("`{other}` is not a literal or a parameter"))),
    }
}

fn parse_literal(value: &SqlValue) -> MemResult<Value> {
    match value {
        SqlValue::Null => Ok(Value::Null),
        SqlValue::Boolean(b) => Ok(Value::Bool(*b)),
        SqlValue::SingleQuotedString(s) => Ok(Value::Text(s.clone())),
        SqlValue::Number(n, _) => n
            .parse::<i64>()
            .map(Value::Int)
            .or_else(|_| n.parse::<f64>().map(Value::Float))
            .map_err(|_| MemError::Parse(format!("invalid number {n}"))),
        other => Err(MemError::Unsupported(format!("literal {other}"))),
    }
}

/// `$n` is one-based; `?` takes the next position.
fn placeholder_index(placeholder: &str, next_param: &mut usize) -> MemResult<usize> {
    if placeholder == "?" {
        let index = *next_param;
        *next_param += 1;
        return Ok(index);
    }
    match placeholder.strip_prefix('$').map(str::parse::<usize>) {
        Some(Ok(n)) if n > 0 => Ok(n - 1),
        _ => Err(MemError::Parse(format!("invalid placeholder {placeholder}"))),
    }
}
