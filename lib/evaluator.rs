use std::{
    cell::RefCell,
    io::{BufRead, Write},
    rc::Rc,
};

use crate::{
    ast::{
        BinaryOperator, Branch, DeclaredType, Expression, LogicalOperator, Program, Statement,
        UnaryOperator,
    },
    environment::Environment,
    error::RuntimeError,
    lexer::parse_number,
    token::Position,
    value::{format_number, Function, Value},
};

type Result<T> = std::result::Result<T, RuntimeError>;

/// Value of every call expression; the language has no `return`.
const CALL_RESULT: Value = Value::Number(0.0);

/// Walks a parsed program, reading `input` lines from `R` and writing
/// `output` lines to `W`.
pub struct Evaluator<R, W> {
    env: Rc<RefCell<Environment>>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Evaluator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            env: Environment::new(),
            input,
            output,
        }
    }

    pub fn eval(&mut self, program: &Program) -> Result<()> {
        for statement in &program.statements {
            self.eval_statement(statement)?;
        }
        self.output.flush()?;
        Ok(())
    }

    /// Global scope, for inspecting bindings after a run.
    pub fn env(&self) -> Rc<RefCell<Environment>> {
        self.env.clone()
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn eval_statement(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Expression(expression) => {
                self.eval_expression(expression)?;
            }
            Statement::Assignment { name, value } => {
                let value = self.eval_expression(value)?;
                self.env.borrow_mut().set(name, value);
            }
            Statement::Declaration {
                declared,
                name,
                value,
                position,
            } => self.eval_declaration(*declared, name, value.as_ref(), *position)?,
            Statement::If {
                branches,
                alternative,
            } => self.eval_if_statement(branches, alternative.as_deref())?,
            Statement::For {
                variable,
                start,
                end,
                step,
                body,
                position,
            } => self.eval_for_statement(variable, start, end, step.as_ref(), body, *position)?,
            Statement::While { condition, body } => self.eval_while_statement(condition, body)?,
            Statement::Function {
                name,
                parameters,
                body,
            } => {
                let function = Function {
                    name: name.clone(),
                    parameters: parameters.clone(),
                    body: Rc::clone(body),
                    env: self.env.clone(),
                };
                self.env
                    .borrow_mut()
                    .define(name, Value::Function(Rc::new(function)));
            }
            Statement::Output(expression) => {
                let value = self.eval_expression(expression)?;
                writeln!(self.output, "{}", value)?;
            }
            Statement::Input(name) => {
                let value = self.read_input()?;
                self.env.borrow_mut().define(name, value);
            }
        }
        Ok(())
    }

    fn eval_declaration(
        &mut self,
        declared: DeclaredType,
        name: &str,
        value: Option<&Expression>,
        position: Position,
    ) -> Result<()> {
        let value = match (declared, value) {
            (_, Some(expression)) => self.eval_expression(expression)?,
            (DeclaredType::Number, None) => Value::Number(0.0),
            (DeclaredType::String, None) => Value::String(String::new()),
        };
        match (declared, &value) {
            (DeclaredType::Number, Value::Number(_)) | (DeclaredType::String, Value::String(_)) => {
                self.env.borrow_mut().define(name, value);
                Ok(())
            }
            _ => Err(RuntimeError::TypeMismatch {
                detail: format!("cannot declare {} {} as {}", declared, name, value.kind()),
                position,
            }),
        }
    }

    /// Runs `statements` in a fresh scope nested in `outer`, restoring the
    /// current scope afterwards even when a statement fails.
    fn eval_block(
        &mut self,
        statements: &[Statement],
        outer: Rc<RefCell<Environment>>,
    ) -> Result<()> {
        let old_env = std::mem::replace(&mut self.env, Environment::new_enclosed_environment(outer));
        let result = statements
            .iter()
            .try_for_each(|statement| self.eval_statement(statement));
        self.env = old_env;
        result
    }

    fn eval_if_statement(
        &mut self,
        branches: &[Branch],
        alternative: Option<&[Statement]>,
    ) -> Result<()> {
        for branch in branches {
            if self.eval_expression(&branch.condition)?.is_truthy() {
                return self.eval_block(&branch.body, self.env.clone());
            }
        }
        match alternative {
            Some(alternative) => self.eval_block(alternative, self.env.clone()),
            None => Ok(()),
        }
    }

    fn eval_for_statement(
        &mut self,
        variable: &str,
        start: &Expression,
        end: &Expression,
        step: Option<&Expression>,
        body: &[Statement],
        position: Position,
    ) -> Result<()> {
        let start = self.eval_loop_bound(start, "start", position)?;
        let end = self.eval_loop_bound(end, "end", position)?;
        let step = match step {
            Some(step) => self.eval_loop_bound(step, "step", position)?,
            None => 1.0,
        };
        if start + step == start {
            return Err(RuntimeError::InvalidStep { position });
        }

        let loop_env = Environment::new_enclosed_environment(self.env.clone());
        let mut index: u64 = 0;
        let mut counter = start;
        while (step > 0.0 && counter <= end) || (step < 0.0 && counter >= end) {
            loop_env.borrow_mut().define(variable, Value::Number(counter));
            self.eval_block(body, loop_env.clone())?;

            // derived from the index so rounding does not accumulate
            index += 1;
            let next = start + index as f64 * step;
            if next == counter {
                return Err(RuntimeError::InvalidStep { position });
            }
            counter = next;
        }
        Ok(())
    }

    fn eval_loop_bound(
        &mut self,
        expression: &Expression,
        role: &str,
        position: Position,
    ) -> Result<f64> {
        match self.eval_expression(expression)? {
            Value::Number(value) => Ok(value),
            value => Err(RuntimeError::TypeMismatch {
                detail: format!("for loop {} must be a Number, got {}", role, value.kind()),
                position,
            }),
        }
    }

    fn eval_while_statement(&mut self, condition: &Expression, body: &[Statement]) -> Result<()> {
        while self.eval_expression(condition)?.is_truthy() {
            self.eval_block(body, self.env.clone())?;
        }
        Ok(())
    }

    fn read_input(&mut self) -> Result<Value> {
        let mut line = String::new();
        self.output.flush()?;
        self.input.read_line(&mut line)?;
        let line = line
            .strip_suffix('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .unwrap_or(line.as_str());
        Ok(match parse_number(line) {
            Some(value) => Value::Number(value),
            None => Value::String(line.to_string()),
        })
    }

    fn eval_expression(&mut self, expression: &Expression) -> Result<Value> {
        let value = match expression {
            Expression::NumberLiteral(value) => Value::Number(*value),
            Expression::StringLiteral(value) => Value::String(value.clone()),
            Expression::Identifier { name, position } => {
                self.eval_identifier_expression(name, *position)?
            }
            Expression::Unary {
                operator,
                operand,
                position,
            } => {
                let operand = self.eval_expression(operand)?;
                self.eval_prefix_expression(*operator, operand, *position)?
            }
            Expression::Binary {
                operator,
                left,
                right,
                position,
            } => {
                let left = self.eval_expression(left)?;
                let right = self.eval_expression(right)?;
                eval_infix_expression(left, *operator, right, *position)?
            }
            Expression::Logical {
                operator,
                left,
                right,
            } => {
                let left = self.eval_expression(left)?;
                match (operator, left.is_truthy()) {
                    (LogicalOperator::And, false) | (LogicalOperator::Or, true) => left,
                    _ => self.eval_expression(right)?,
                }
            }
            Expression::Call {
                name,
                arguments,
                position,
            } => self.eval_call_function(name, arguments, *position)?,
        };
        Ok(value)
    }

    fn eval_identifier_expression(&mut self, name: &str, position: Position) -> Result<Value> {
        match self.env.borrow().get(name) {
            Some(value) => Ok(value),
            None => Err(RuntimeError::UndefinedVariable {
                name: name.to_string(),
                position,
            }),
        }
    }

    fn eval_prefix_expression(
        &mut self,
        operator: UnaryOperator,
        operand: Value,
        position: Position,
    ) -> Result<Value> {
        match (operator, operand) {
            (UnaryOperator::Not, operand) => Ok(Value::boolean(!operand.is_truthy())),
            (UnaryOperator::Minus, Value::Number(value)) => Ok(Value::Number(-value)),
            (UnaryOperator::Minus, operand) => Err(RuntimeError::TypeMismatch {
                detail: format!("-{}", operand.kind()),
                position,
            }),
        }
    }

    fn eval_call_function(
        &mut self,
        name: &str,
        arguments: &[Expression],
        position: Position,
    ) -> Result<Value> {
        let function = match self.env.borrow().get(name) {
            Some(Value::Function(function)) => function,
            Some(value) => {
                return Err(RuntimeError::TypeMismatch {
                    detail: format!("cannot call {} '{}'", value.kind(), name),
                    position,
                })
            }
            None => {
                return Err(RuntimeError::UndefinedFunction {
                    name: name.to_string(),
                    position,
                })
            }
        };

        if function.parameters.len() != arguments.len() {
            return Err(RuntimeError::ArityMismatch {
                name: name.to_string(),
                expected: function.parameters.len(),
                found: arguments.len(),
                position,
            });
        }

        let args = arguments
            .iter()
            .map(|arg| self.eval_expression(arg))
            .collect::<Result<Vec<Value>>>()?;

        let call_env = Environment::new_enclosed_environment(function.env.clone());
        for (param, arg) in function.parameters.iter().zip(args) {
            call_env.borrow_mut().define(param, arg);
        }

        let old_env = std::mem::replace(&mut self.env, call_env);
        let result = function
            .body
            .iter()
            .try_for_each(|statement| self.eval_statement(statement));
        self.env = old_env;
        result?;

        Ok(CALL_RESULT)
    }
}

fn eval_infix_expression(
    left: Value,
    operator: BinaryOperator,
    right: Value,
    position: Position,
) -> Result<Value> {
    match operator {
        BinaryOperator::Eq => return Ok(Value::boolean(left == right)),
        BinaryOperator::NotEq => return Ok(Value::boolean(left != right)),
        _ => {}
    }

    match (left, right) {
        (Value::Number(left), Value::Number(right)) => {
            eval_number_infix_expression(left, operator, right, position)
        }
        (Value::String(left), Value::String(right)) => {
            eval_string_infix_expression(left, operator, right, position)
        }
        (left, right) => Err(type_mismatch(&left, operator, &right, position)),
    }
}

fn eval_number_infix_expression(
    left: f64,
    operator: BinaryOperator,
    right: f64,
    position: Position,
) -> Result<Value> {
    let value = match operator {
        BinaryOperator::Add => left + right,
        BinaryOperator::Subtract => left - right,
        BinaryOperator::Multiply => left * right,
        BinaryOperator::Divide | BinaryOperator::Modulo if right == 0.0 => {
            return Err(RuntimeError::DivisionByZero { position })
        }
        BinaryOperator::Divide => left / right,
        BinaryOperator::Modulo => left % right,
        BinaryOperator::Power => left.powf(right),
        BinaryOperator::Lt => return Ok(Value::boolean(left < right)),
        BinaryOperator::LtEq => return Ok(Value::boolean(left <= right)),
        BinaryOperator::Gt => return Ok(Value::boolean(left > right)),
        BinaryOperator::GtEq => return Ok(Value::boolean(left >= right)),
        BinaryOperator::Eq => return Ok(Value::boolean(left == right)),
        BinaryOperator::NotEq => return Ok(Value::boolean(left != right)),
    };
    if !value.is_finite() {
        return Err(RuntimeError::NumberOutOfRange {
            detail: format!(
                "{} {} {}",
                format_number(left),
                operator,
                format_number(right)
            ),
            position,
        });
    }
    Ok(Value::Number(value))
}

fn eval_string_infix_expression(
    left: String,
    operator: BinaryOperator,
    right: String,
    position: Position,
) -> Result<Value> {
    match operator {
        BinaryOperator::Add => Ok(Value::String(left + &right)),
        BinaryOperator::Lt => Ok(Value::boolean(left < right)),
        BinaryOperator::LtEq => Ok(Value::boolean(left <= right)),
        BinaryOperator::Gt => Ok(Value::boolean(left > right)),
        BinaryOperator::GtEq => Ok(Value::boolean(left >= right)),
        _ => Err(type_mismatch(
            &Value::String(left),
            operator,
            &Value::String(right),
            position,
        )),
    }
}

fn type_mismatch(
    left: &Value,
    operator: BinaryOperator,
    right: &Value,
    position: Position,
) -> RuntimeError {
    RuntimeError::TypeMismatch {
        detail: format!("{} {} {}", left.kind(), operator, right.kind()),
        position,
    }
}
