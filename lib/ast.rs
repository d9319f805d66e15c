use std::{fmt, rc::Rc};

use crate::{
    token::{Keyword, Position},
    value::format_number,
};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum UnaryOperator {
    Minus,
    Not,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::NotEq
                | BinaryOperator::Lt
                | BinaryOperator::LtEq
                | BinaryOperator::Gt
                | BinaryOperator::GtEq
        )
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LogicalOperator {
    And,
    Or,
}

/// Type named by a `Num`/`String` declaration.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum DeclaredType {
    Number,
    String,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Branch {
    pub condition: Expression,
    pub body: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Assignment {
        name: String,
        value: Expression,
    },
    Declaration {
        declared: DeclaredType,
        name: String,
        value: Option<Expression>,
        position: Position,
    },
    If {
        branches: Vec<Branch>,
        alternative: Option<Vec<Statement>>,
    },
    For {
        variable: String,
        start: Expression,
        end: Expression,
        step: Option<Expression>,
        body: Vec<Statement>,
        position: Position,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    /// The body is shared with every function value the definition creates.
    Function {
        name: String,
        parameters: Vec<String>,
        body: Rc<[Statement]>,
    },
    Output(Expression),
    Input(String),
    Expression(Expression),
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    NumberLiteral(f64),
    StringLiteral(String),
    Identifier {
        name: String,
        position: Position,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
        position: Position,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
        position: Position,
    },
    Logical {
        operator: LogicalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Call {
        name: String,
        arguments: Vec<Expression>,
        position: Position,
    },
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOperator::Minus => write!(f, "-"),
            UnaryOperator::Not => write!(f, "{}", Keyword::Not),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "^",
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
        };
        write!(f, "{}", symbol)
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LogicalOperator::And => write!(f, "{}", Keyword::And),
            LogicalOperator::Or => write!(f, "{}", Keyword::Or),
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeclaredType::Number => write!(f, "{}", Keyword::Num),
            DeclaredType::String => write!(f, "{}", Keyword::String),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_body(f, &self.statements)
    }
}

fn write_body(f: &mut fmt::Formatter, statements: &[Statement]) -> fmt::Result {
    for statement in statements {
        writeln!(f, "{}", statement)?;
    }
    Ok(())
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Assignment { name, value } => write!(f, "set {} = {}", name, value),
            Statement::Declaration {
                declared,
                name,
                value,
                ..
            } => match value {
                Some(value) => write!(f, "{} {} = {}", declared, name, value),
                None => write!(f, "{} {}", declared, name),
            },
            Statement::If {
                branches,
                alternative,
            } => {
                for (i, branch) in branches.iter().enumerate() {
                    let keyword = if i == 0 { Keyword::If } else { Keyword::ElseIf };
                    writeln!(f, "{} {} then", keyword, branch.condition)?;
                    write_body(f, &branch.body)?;
                }
                if let Some(alternative) = alternative {
                    writeln!(f, "else")?;
                    write_body(f, alternative)?;
                }
                write!(f, "endif")
            }
            Statement::For {
                variable,
                start,
                end,
                step,
                body,
                ..
            } => {
                write!(f, "for {} = {} to {}", variable, start, end)?;
                if let Some(step) = step {
                    write!(f, " step {}", step)?;
                }
                writeln!(f, " do")?;
                write_body(f, body)?;
                write!(f, "endfor")
            }
            Statement::While { condition, body } => {
                writeln!(f, "while {} do", condition)?;
                write_body(f, body)?;
                write!(f, "endwhile")
            }
            Statement::Function {
                name,
                parameters,
                body,
            } => {
                writeln!(f, "func {}({})", name, parameters.join(", "))?;
                write_body(f, body)?;
                write!(f, "endfunc")
            }
            Statement::Output(value) => write!(f, "output {}", value),
            Statement::Input(name) => write!(f, "input {}", name),
            Statement::Expression(expression) => write!(f, "{}", expression),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::NumberLiteral(value) => write!(f, "{}", format_number(*value)),
            Expression::StringLiteral(value) => write_string_literal(f, value),
            Expression::Identifier { name, .. } => write!(f, "{}", name),
            Expression::Unary {
                operator: UnaryOperator::Not,
                operand,
                ..
            } => write!(f, "(not {})", operand),
            Expression::Unary {
                operator, operand, ..
            } => write!(f, "({}{})", operator, operand),
            Expression::Binary {
                operator,
                left,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::Logical {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::Call {
                name, arguments, ..
            } => {
                let arguments: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", name, arguments.join(", "))
            }
        }
    }
}

fn write_string_literal(f: &mut fmt::Formatter, value: &str) -> fmt::Result {
    write!(f, "\"")?;
    for char in value.chars() {
        match char {
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            _ => write!(f, "{}", char)?,
        }
    }
    write!(f, "\"")
}
