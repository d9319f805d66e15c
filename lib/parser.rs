use crate::{
    ast::{
        BinaryOperator, Branch, DeclaredType, Expression, LogicalOperator, Program, Statement,
        UnaryOperator,
    },
    error::{Error, ParseError},
    lexer::Lexer,
    token::{Keyword, Position, Token, TokenKind},
};

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialOrd, PartialEq, Eq, Ord)]
enum Precedence {
    Lowest,
    Or,
    And,
    Comparison,
    Sum,
    Product,
    Power,
    Prefix,
}

impl Precedence {
    fn from_token(token: &TokenKind) -> Self {
        match token {
            TokenKind::Keyword(Keyword::Or) => Precedence::Or,
            TokenKind::Keyword(Keyword::And) => Precedence::And,
            TokenKind::Eq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq => Precedence::Comparison,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash | TokenKind::Percent => Precedence::Product,
            TokenKind::Caret => Precedence::Power,
            _ => Precedence::Lowest,
        }
    }
}

pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
    peek_token: Token,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self> {
        Ok(Self {
            cur_token: lexer.next_token()?,
            peek_token: lexer.next_token()?,
            lexer,
        })
    }

    pub fn parse_program(&mut self) -> Result<Program> {
        let mut statements: Vec<Statement> = Vec::new();
        while !self.cur_is(&TokenKind::Eof) {
            let statement = self.parse_statement()?;
            statements.push(statement);
            self.next_token()?;
        }
        Ok(Program { statements })
    }

    fn next_token(&mut self) -> Result<&mut Self> {
        let peek_token = self.lexer.next_token()?;
        self.cur_token = std::mem::replace(&mut self.peek_token, peek_token);
        Ok(self)
    }

    fn cur_is(&self, kind: &TokenKind) -> bool {
        token_matches(&self.cur_token.kind, kind)
    }

    fn peek_is(&self, kind: &TokenKind) -> bool {
        token_matches(&self.peek_token.kind, kind)
    }

    fn peek_is_keyword(&self, keyword: Keyword) -> bool {
        self.peek_token.kind.is_keyword(keyword)
    }

    fn unexpected(&self, token: &Token, expected: impl Into<String>) -> Error {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: token.kind.clone(),
            position: token.position,
        }
        .into()
    }

    fn expect_peek(&mut self, exp_token: TokenKind) -> Result<()> {
        if self.peek_is(&exp_token) {
            self.next_token()?;
            Ok(())
        } else {
            Err(self.unexpected(&self.peek_token, exp_token.to_string()))
        }
    }

    fn expect_peek_keyword(&mut self, keyword: Keyword) -> Result<()> {
        self.expect_peek(TokenKind::Keyword(keyword))
    }

    fn expect_peek_ident(&mut self) -> Result<String> {
        match &self.peek_token.kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.next_token()?;
                Ok(name)
            }
            _ => Err(self.unexpected(&self.peek_token, "identifier")),
        }
    }

    fn expect_peek_rparen(&mut self, opened: Position) -> Result<()> {
        if self.peek_is(&TokenKind::Rparen) {
            self.next_token()?;
            Ok(())
        } else {
            Err(ParseError::UnmatchedParenthesis {
                opened,
                found: self.peek_token.kind.clone(),
                position: self.peek_token.position,
            }
            .into())
        }
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        let TokenKind::Keyword(keyword) = self.cur_token.kind else {
            return self.parse_expression_statement();
        };
        match keyword {
            Keyword::Set => self.parse_assignment(),
            Keyword::Num => self.parse_declaration(DeclaredType::Number),
            Keyword::String => self.parse_declaration(DeclaredType::String),
            Keyword::If => self.parse_if_statement(),
            Keyword::For => self.parse_for_statement(),
            Keyword::While => self.parse_while_statement(),
            Keyword::Func => self.parse_function_definition(),
            Keyword::Output => self.parse_output_statement(),
            Keyword::Input => self.parse_input_statement(),
            Keyword::Not => self.parse_expression_statement(),
            _ => Err(self.unexpected(&self.cur_token, "statement")),
        }
    }

    fn parse_assignment(&mut self) -> Result<Statement> {
        let name = self.expect_peek_ident()?;
        self.expect_peek(TokenKind::Assign)?;
        self.next_token()?;
        let value = self.parse_expression(Precedence::Lowest)?;
        Ok(Statement::Assignment { name, value })
    }

    fn parse_declaration(&mut self, declared: DeclaredType) -> Result<Statement> {
        let position = self.cur_token.position;
        let name = self.expect_peek_ident()?;
        let value = if self.peek_is(&TokenKind::Assign) {
            self.next_token()?.next_token()?;
            Some(self.parse_expression(Precedence::Lowest)?)
        } else {
            None
        };
        Ok(Statement::Declaration {
            declared,
            name,
            value,
            position,
        })
    }

    fn parse_if_statement(&mut self) -> Result<Statement> {
        let mut branches: Vec<Branch> = Vec::new();
        let terminators = [Keyword::ElseIf, Keyword::Else, Keyword::EndIf];

        loop {
            self.next_token()?;
            let condition = self.parse_expression(Precedence::Lowest)?;
            self.expect_peek_keyword(Keyword::Then)?;
            let body = self.parse_block(&terminators, Keyword::EndIf)?;
            branches.push(Branch { condition, body });
            if !self.cur_token.kind.is_keyword(Keyword::ElseIf) {
                break;
            }
        }

        let alternative = if self.cur_token.kind.is_keyword(Keyword::Else) {
            Some(self.parse_block(&[Keyword::EndIf], Keyword::EndIf)?)
        } else {
            None
        };

        Ok(Statement::If {
            branches,
            alternative,
        })
    }

    fn parse_for_statement(&mut self) -> Result<Statement> {
        let position = self.cur_token.position;
        let variable = self.expect_peek_ident()?;
        self.expect_peek(TokenKind::Assign)?;
        self.next_token()?;
        let start = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek_keyword(Keyword::To)?;
        self.next_token()?;
        let end = self.parse_expression(Precedence::Lowest)?;
        let step = if self.peek_is_keyword(Keyword::Step) {
            self.next_token()?.next_token()?;
            Some(self.parse_expression(Precedence::Lowest)?)
        } else {
            None
        };
        self.expect_peek_keyword(Keyword::Do)?;
        let body = self.parse_block(&[Keyword::EndFor], Keyword::EndFor)?;

        Ok(Statement::For {
            variable,
            start,
            end,
            step,
            body,
            position,
        })
    }

    fn parse_while_statement(&mut self) -> Result<Statement> {
        self.next_token()?;
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek_keyword(Keyword::Do)?;
        let body = self.parse_block(&[Keyword::EndWhile], Keyword::EndWhile)?;
        Ok(Statement::While { condition, body })
    }

    fn parse_function_definition(&mut self) -> Result<Statement> {
        let name = self.expect_peek_ident()?;
        self.expect_peek(TokenKind::Lparen)?;
        let opened = self.cur_token.position;

        let mut parameters: Vec<String> = Vec::new();
        if !self.peek_is(&TokenKind::Rparen) {
            parameters.push(self.expect_peek_ident()?);
            while self.peek_is(&TokenKind::Comma) {
                self.next_token()?;
                parameters.push(self.expect_peek_ident()?);
            }
        }
        self.expect_peek_rparen(opened)?;

        let body = self.parse_block(&[Keyword::EndFunc], Keyword::EndFunc)?;

        Ok(Statement::Function {
            name,
            parameters,
            body: body.into(),
        })
    }

    fn parse_output_statement(&mut self) -> Result<Statement> {
        self.next_token()?;
        let value = self.parse_expression(Precedence::Lowest)?;
        Ok(Statement::Output(value))
    }

    fn parse_input_statement(&mut self) -> Result<Statement> {
        let name = self.expect_peek_ident()?;
        Ok(Statement::Input(name))
    }

    fn parse_expression_statement(&mut self) -> Result<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        Ok(Statement::Expression(expression))
    }

    /// Parses statements after the current token up to one of `terminators`,
    /// leaving the terminator as the current token.
    fn parse_block(&mut self, terminators: &[Keyword], closing: Keyword) -> Result<Vec<Statement>> {
        self.next_token()?;

        let mut statements: Vec<Statement> = Vec::new();
        loop {
            match &self.cur_token.kind {
                TokenKind::Keyword(keyword) if terminators.contains(keyword) => break,
                TokenKind::Keyword(keyword) if keyword.is_block_terminator() => {
                    return Err(self.missing_closing(closing));
                }
                TokenKind::Eof => return Err(self.missing_closing(closing)),
                _ => {}
            }
            let statement = self.parse_statement()?;
            statements.push(statement);
            self.next_token()?;
        }

        Ok(statements)
    }

    fn missing_closing(&self, expected: Keyword) -> Error {
        ParseError::ExpectedClosingKeyword {
            expected,
            found: self.cur_token.kind.clone(),
            position: self.cur_token.position,
        }
        .into()
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Result<Expression> {
        let cur_token = self.cur_token.clone();

        let mut left_exp = match cur_token.kind {
            TokenKind::Number(value) => Expression::NumberLiteral(value),
            TokenKind::String(value) => Expression::StringLiteral(value),
            TokenKind::Ident(name) if self.peek_is(&TokenKind::Lparen) => {
                self.parse_call_expression(name)?
            }
            TokenKind::Ident(name) => Expression::Identifier {
                name,
                position: cur_token.position,
            },
            TokenKind::Minus => self.parse_prefix_expression(UnaryOperator::Minus)?,
            TokenKind::Keyword(Keyword::Not) => self.parse_prefix_expression(UnaryOperator::Not)?,
            TokenKind::Lparen => self.parse_grouped_expression()?,
            _ => return Err(self.unexpected(&self.cur_token, "expression")),
        };

        while precedence < Precedence::from_token(&self.peek_token.kind) {
            self.next_token()?;
            left_exp = self.parse_infix_expression(left_exp)?;
        }

        Ok(left_exp)
    }

    fn parse_prefix_expression(&mut self, operator: UnaryOperator) -> Result<Expression> {
        let position = self.cur_token.position;
        self.next_token()?;
        let operand = self.parse_expression(Precedence::Prefix)?;
        Ok(Expression::Unary {
            operator,
            operand: Box::new(operand),
            position,
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Result<Expression> {
        let token = self.cur_token.clone();
        let precedence = Precedence::from_token(&token.kind);
        self.next_token()?;

        // `^` is right-associative
        let right = if precedence == Precedence::Power {
            self.parse_expression(Precedence::Product)?
        } else {
            self.parse_expression(precedence)?
        };

        let (left, right) = (Box::new(left), Box::new(right));
        let operator = match &token.kind {
            TokenKind::Keyword(Keyword::And) => {
                return Ok(Expression::Logical {
                    operator: LogicalOperator::And,
                    left,
                    right,
                })
            }
            TokenKind::Keyword(Keyword::Or) => {
                return Ok(Expression::Logical {
                    operator: LogicalOperator::Or,
                    left,
                    right,
                })
            }
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Minus => BinaryOperator::Subtract,
            TokenKind::Asterisk => BinaryOperator::Multiply,
            TokenKind::Slash => BinaryOperator::Divide,
            TokenKind::Percent => BinaryOperator::Modulo,
            TokenKind::Caret => BinaryOperator::Power,
            TokenKind::Eq => BinaryOperator::Eq,
            TokenKind::NotEq => BinaryOperator::NotEq,
            TokenKind::Lt => BinaryOperator::Lt,
            TokenKind::LtEq => BinaryOperator::LtEq,
            TokenKind::Gt => BinaryOperator::Gt,
            TokenKind::GtEq => BinaryOperator::GtEq,
            _ => return Err(self.unexpected(&token, "operator")),
        };

        // comparisons do not chain, even behind `and`/`or`
        if operator.is_comparison()
            && Precedence::from_token(&self.peek_token.kind) == Precedence::Comparison
        {
            return Err(self.unexpected(&self.peek_token, "expression"));
        }

        Ok(Expression::Binary {
            operator,
            left,
            right,
            position: token.position,
        })
    }

    fn parse_grouped_expression(&mut self) -> Result<Expression> {
        let opened = self.cur_token.position;
        self.next_token()?;
        let exp = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek_rparen(opened)?;
        Ok(exp)
    }

    fn parse_call_expression(&mut self, name: String) -> Result<Expression> {
        let position = self.cur_token.position;
        self.next_token()?;
        let arguments = self.parse_call_arguments()?;
        Ok(Expression::Call {
            name,
            arguments,
            position,
        })
    }

    fn parse_call_arguments(&mut self) -> Result<Vec<Expression>> {
        let opened = self.cur_token.position;
        let mut arguments: Vec<Expression> = Vec::new();

        if self.peek_is(&TokenKind::Rparen) {
            self.next_token()?;
            return Ok(arguments);
        }

        self.next_token()?;
        arguments.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(&TokenKind::Comma) {
            self.next_token()?.next_token()?;
            arguments.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek_rparen(opened)?;

        Ok(arguments)
    }
}

// Keywords must match exactly; other tokens match on kind alone.
fn token_matches(found: &TokenKind, expected: &TokenKind) -> bool {
    match expected {
        TokenKind::Keyword(keyword) => found.is_keyword(*keyword),
        _ => found.variant_eq(expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Position;

    fn get_program(input: &str) -> Program {
        let lexer = Lexer::new(input);
        let mut parser = Parser::new(lexer).unwrap();
        parser.parse_program().unwrap()
    }

    fn parse_error(input: &str) -> ParseError {
        let result = Parser::new(Lexer::new(input)).and_then(|mut parser| parser.parse_program());
        match result {
            Err(Error::Parse(err)) => err,
            other => panic!("expected parse error for {input:?}, got {other:?}"),
        }
    }

    fn ident(name: &str, line: usize, column: usize) -> Expression {
        Expression::Identifier {
            name: name.to_string(),
            position: Position::new(line, column),
        }
    }

    #[test]
    fn assignment_statement() {
        let program = get_program("set x = 5");
        assert_eq!(
            program.statements,
            vec![Statement::Assignment {
                name: "x".to_string(),
                value: Expression::NumberLiteral(5.0),
            }]
        );
    }

    #[test]
    fn declarations() {
        let program = get_program("Num n = 2 String s");
        assert_eq!(
            program.statements,
            vec![
                Statement::Declaration {
                    declared: DeclaredType::Number,
                    name: "n".to_string(),
                    value: Some(Expression::NumberLiteral(2.0)),
                    position: Position::new(1, 1),
                },
                Statement::Declaration {
                    declared: DeclaredType::String,
                    name: "s".to_string(),
                    value: None,
                    position: Position::new(1, 11),
                },
            ]
        );
    }

    #[test]
    fn call_and_identifier_expressions() {
        let program = get_program("add(x, \"y\") foo() bar");
        assert_eq!(
            program.statements,
            vec![
                Statement::Expression(Expression::Call {
                    name: "add".to_string(),
                    arguments: vec![
                        ident("x", 1, 5),
                        Expression::StringLiteral("y".to_string()),
                    ],
                    position: Position::new(1, 1),
                }),
                Statement::Expression(Expression::Call {
                    name: "foo".to_string(),
                    arguments: vec![],
                    position: Position::new(1, 13),
                }),
                Statement::Expression(ident("bar", 1, 19)),
            ]
        );
    }

    #[test]
    fn operator_precedence() {
        let tests = vec![
            ("1 + 2 * 3", "(1 + (2 * 3))"),
            ("1 * 2 + 3", "((1 * 2) + 3)"),
            ("1 - 2 - 3", "((1 - 2) - 3)"),
            ("8 / 4 / 2", "((8 / 4) / 2)"),
            ("7 % 4 * 2", "((7 % 4) * 2)"),
            ("2 ^ 3 ^ 2", "(2 ^ (3 ^ 2))"),
            ("2 * 3 ^ 2", "(2 * (3 ^ 2))"),
            ("-2 ^ 2", "((-2) ^ 2)"),
            ("2 ^ -1", "(2 ^ (-1))"),
            ("--x", "(-(-x))"),
            ("not a == b", "((not a) == b)"),
            ("not not a", "(not (not a))"),
            ("a + 1 < b * 2", "((a + 1) < (b * 2))"),
            ("a or b and c", "(a or (b and c))"),
            ("a and b or c", "((a and b) or c)"),
            ("a < b and c >= d", "((a < b) and (c >= d))"),
            ("a or b or c", "((a or b) or c)"),
            ("(a < b) == c", "((a < b) == c)"),
            ("a and b < c or d", "((a and (b < c)) or d)"),
            ("(1 + 2) * 3", "((1 + 2) * 3)"),
            ("f(1 + 2, g(3) * 4)", "f((1 + 2), (g(3) * 4))"),
            ("x == \"a\\nb\"", "(x == \"a\\nb\")"),
            ("0.5 + 10", "(0.5 + 10)"),
        ];

        for (input, expected) in tests {
            let program = get_program(&format!("output {input}"));
            assert_eq!(program.statements.len(), 1, "input: {input}");
            assert_eq!(program.statements[0].to_string(), format!("output {expected}"));
        }
    }

    #[test]
    fn binary_expression_structure() {
        let program = get_program("output a ^ 2 - 1");
        assert_eq!(
            program.statements,
            vec![Statement::Output(Expression::Binary {
                operator: BinaryOperator::Subtract,
                left: Box::new(Expression::Binary {
                    operator: BinaryOperator::Power,
                    left: Box::new(ident("a", 1, 8)),
                    right: Box::new(Expression::NumberLiteral(2.0)),
                    position: Position::new(1, 10),
                }),
                right: Box::new(Expression::NumberLiteral(1.0)),
                position: Position::new(1, 14),
            })]
        );
    }

    #[test]
    fn if_statement() {
        let program = get_program(
            r#"
            if x < 1 then
                output "small"
            elseif x < 10 then
                output "medium"
                output "still medium"
            elseif x < 100 then
            else
                output "large"
            endif
            "#,
        );
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Statement::If {
                branches,
                alternative,
            } => {
                assert_eq!(branches.len(), 3);
                assert_eq!(branches[0].condition.to_string(), "(x < 1)");
                assert_eq!(branches[0].body.len(), 1);
                assert_eq!(branches[1].body.len(), 2);
                assert!(branches[2].body.is_empty());
                let alternative = alternative.as_ref().expect("else body");
                assert_eq!(
                    alternative,
                    &vec![Statement::Output(Expression::StringLiteral(
                        "large".to_string()
                    ))]
                );
            }
            statement => panic!("expected if statement, found {statement}"),
        }
    }

    #[test]
    fn if_without_else() {
        let program = get_program("if 1 then endif output 2");
        assert_eq!(
            program.statements,
            vec![
                Statement::If {
                    branches: vec![Branch {
                        condition: Expression::NumberLiteral(1.0),
                        body: vec![],
                    }],
                    alternative: None,
                },
                Statement::Output(Expression::NumberLiteral(2.0)),
            ]
        );
    }

    #[test]
    fn for_statement() {
        let program = get_program("for i = 1 to n step 2 do output i endfor");
        assert_eq!(
            program.statements,
            vec![Statement::For {
                variable: "i".to_string(),
                start: Expression::NumberLiteral(1.0),
                end: ident("n", 1, 14),
                step: Some(Expression::NumberLiteral(2.0)),
                body: vec![Statement::Output(ident("i", 1, 33))],
                position: Position::new(1, 1),
            }]
        );

        let program = get_program("for i = 3 to 1 do endfor");
        match &program.statements[0] {
            Statement::For { step, body, .. } => {
                assert!(step.is_none());
                assert!(body.is_empty());
            }
            statement => panic!("expected for statement, found {statement}"),
        }
    }

    #[test]
    fn while_and_nested_blocks() {
        let program = get_program(
            r#"
            while n > 0 do
                if n % 2 == 0 then
                    output n
                endif
                set n = n - 1
            endwhile
            "#,
        );
        match &program.statements[..] {
            [Statement::While { condition, body }] => {
                assert_eq!(condition.to_string(), "(n > 0)");
                assert_eq!(body.len(), 2);
                assert!(matches!(body[0], Statement::If { .. }));
                assert_eq!(body[1].to_string(), "set n = (n - 1)");
            }
            statements => panic!("expected one while statement, found {statements:?}"),
        }
    }

    #[test]
    fn function_definition() {
        let program = get_program(
            r#"
            func greet(first, last)
                output "hi " + first + last
            endfunc
            func nothing()
            endfunc
            "#,
        );
        assert_eq!(program.statements.len(), 2);
        match &program.statements[0] {
            Statement::Function {
                name,
                parameters,
                body,
            } => {
                assert_eq!(name, "greet");
                assert_eq!(parameters, &vec!["first".to_string(), "last".to_string()]);
                assert_eq!(body.len(), 1);
            }
            statement => panic!("expected function definition, found {statement}"),
        }
        match &program.statements[1] {
            Statement::Function {
                parameters, body, ..
            } => {
                assert!(parameters.is_empty());
                assert!(body.is_empty());
            }
            statement => panic!("expected function definition, found {statement}"),
        }
    }

    #[test]
    fn input_statement() {
        let program = get_program("input answer");
        assert_eq!(
            program.statements,
            vec![Statement::Input("answer".to_string())]
        );
    }

    #[test]
    fn parsing_is_repeatable() {
        let input = r#"
            func fib(n)
                set a = 0 set b = 1
                for i = 1 to n do set t = a + b set a = b set b = t endfor
                output a
            endfunc
            fib(10)
        "#;
        assert_eq!(get_program(input), get_program(input));
    }

    #[test]
    fn rendering_round_trips() {
        let input = r#"
            Num total
            String label = "sum:\t"
            func add(a, b) set total = total + a + b endfunc
            for i = 1 to 10 step 3 do add(i, -i ^ 2) endfor
            if total < 0 or not total then output label + "neg" elseif total == 0 then output 0 else output total endif
            while 0 do input x endwhile
        "#;
        let program = get_program(input);
        let rendered = program.to_string();
        let reparsed = get_program(&rendered);
        assert_eq!(reparsed.to_string(), rendered);
        assert_eq!(reparsed.statements.len(), program.statements.len());
    }

    #[test]
    fn unexpected_tokens() {
        let tests = vec![
            (
                "set = 5",
                ParseError::UnexpectedToken {
                    expected: "identifier".to_string(),
                    found: TokenKind::Assign,
                    position: Position::new(1, 5),
                },
            ),
            (
                "set x 5",
                ParseError::UnexpectedToken {
                    expected: "'='".to_string(),
                    found: TokenKind::Number(5.0),
                    position: Position::new(1, 7),
                },
            ),
            (
                "output",
                ParseError::UnexpectedToken {
                    expected: "expression".to_string(),
                    found: TokenKind::Eof,
                    position: Position::new(1, 7),
                },
            ),
            (
                "output 1 +",
                ParseError::UnexpectedToken {
                    expected: "expression".to_string(),
                    found: TokenKind::Eof,
                    position: Position::new(1, 11),
                },
            ),
            (
                "if x output 1 endif",
                ParseError::UnexpectedToken {
                    expected: "'then'".to_string(),
                    found: TokenKind::Keyword(Keyword::Output),
                    position: Position::new(1, 6),
                },
            ),
            (
                "for i = 1 do endfor",
                ParseError::UnexpectedToken {
                    expected: "'to'".to_string(),
                    found: TokenKind::Keyword(Keyword::Do),
                    position: Position::new(1, 11),
                },
            ),
            (
                "output 1 < 2 < 3",
                ParseError::UnexpectedToken {
                    expected: "expression".to_string(),
                    found: TokenKind::Lt,
                    position: Position::new(1, 14),
                },
            ),
            (
                "output 0 and 5 < 3 < 1",
                ParseError::UnexpectedToken {
                    expected: "expression".to_string(),
                    found: TokenKind::Lt,
                    position: Position::new(1, 20),
                },
            ),
            (
                "output 1 or 1 < 2 == 0",
                ParseError::UnexpectedToken {
                    expected: "expression".to_string(),
                    found: TokenKind::Eq,
                    position: Position::new(1, 19),
                },
            ),
            (
                "then",
                ParseError::UnexpectedToken {
                    expected: "statement".to_string(),
                    found: TokenKind::Keyword(Keyword::Then),
                    position: Position::new(1, 1),
                },
            ),
            (
                "func (a) endfunc",
                ParseError::UnexpectedToken {
                    expected: "identifier".to_string(),
                    found: TokenKind::Lparen,
                    position: Position::new(1, 6),
                },
            ),
        ];

        for (input, expected) in tests {
            assert_eq!(parse_error(input), expected, "input: {input:?}");
        }
    }

    #[test]
    fn missing_closing_keywords() {
        let tests = vec![
            (
                "if 1 then output 1",
                Keyword::EndIf,
                TokenKind::Eof,
                Position::new(1, 19),
            ),
            (
                "if 1 then else output 1 else endif",
                Keyword::EndIf,
                TokenKind::Keyword(Keyword::Else),
                Position::new(1, 25),
            ),
            (
                "for i = 1 to 2 do output i endwhile",
                Keyword::EndFor,
                TokenKind::Keyword(Keyword::EndWhile),
                Position::new(1, 28),
            ),
            (
                "while 1 do\n output 1",
                Keyword::EndWhile,
                TokenKind::Eof,
                Position::new(2, 10),
            ),
            (
                "func f() output 1 endif",
                Keyword::EndFunc,
                TokenKind::Keyword(Keyword::EndIf),
                Position::new(1, 19),
            ),
        ];

        for (input, expected, found, position) in tests {
            assert_eq!(
                parse_error(input),
                ParseError::ExpectedClosingKeyword {
                    expected,
                    found,
                    position
                },
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn unmatched_parentheses() {
        let tests = vec![
            ("output (1 + 2", Position::new(1, 8), TokenKind::Eof, Position::new(1, 14)),
            (
                "output f(1, 2 output 3",
                Position::new(1, 9),
                TokenKind::Keyword(Keyword::Output),
                Position::new(1, 15),
            ),
            (
                "func f(a, b output a endfunc",
                Position::new(1, 7),
                TokenKind::Keyword(Keyword::Output),
                Position::new(1, 13),
            ),
        ];

        for (input, opened, found, position) in tests {
            assert_eq!(
                parse_error(input),
                ParseError::UnmatchedParenthesis {
                    opened,
                    found,
                    position
                },
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn lex_errors_surface_through_parser() {
        let result = Parser::new(Lexer::new("output 1 $")).and_then(|mut parser| parser.parse_program());
        assert!(matches!(result, Err(Error::Lex(_))));
    }
}
