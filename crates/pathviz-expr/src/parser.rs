//! Expression parser.
//!
//! A precedence-climbing parser over `ScannerState` tokens. Two entry points
//! exist: `parse_expression` for conditions (assignment is rejected) and
//! `parse_assignment` for the text of declaration and assignment statements,
//! which may start with `let`/`const`/`var` and may omit the initializer.

use crate::node::{ExprArena, ExprIndex, ExprNode, TextRange};
use crate::scanner::{ScannerState, SyntaxKind};
use pathviz_common::limits::MAX_EXPRESSION_DEPTH;
use thiserror::Error;

/// Expression text that does not parse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("malformed expression `{text}` at offset {pos}: {message}")]
pub struct ParseError {
    pub text: String,
    pub pos: u32,
    pub message: String,
}

/// A parsed expression together with the arena that owns its nodes.
#[derive(Clone, Debug)]
pub struct ParsedExpression {
    pub arena: ExprArena,
    pub root: ExprIndex,
    /// Leading `let`/`const`/`var`, if the text was a declaration.
    pub declaration_keyword: Option<SyntaxKind>,
}

impl ParsedExpression {
    pub fn root_node(&self) -> Option<&ExprNode> {
        self.arena.get(self.root)
    }
}

/// Parse a condition or right-hand side.
pub fn parse_expression(text: &str) -> Result<ParsedExpression, ParseError> {
    let mut parser = ParserState::new(text);
    parser.next_token();
    let root = parser.parse_expression()?;
    parser.finish(root, None)
}

/// Parse the text of a declaration or assignment statement.
///
/// Accepts `let x = e`, `x = e`, `a[i] = e`, compound forms like `x += e`,
/// and a bare declaration `let x` (whose root is the identifier).
pub fn parse_assignment(text: &str) -> Result<ParsedExpression, ParseError> {
    let mut parser = ParserState::new(text);
    parser.next_token();

    let declaration_keyword = if parser.token().is_declaration_keyword() {
        let keyword = parser.token();
        parser.next_token();
        Some(keyword)
    } else {
        None
    };

    let target = parser.parse_expression()?;
    let root = if parser.token().is_assignment_operator() {
        let operator = parser.token();
        parser.next_token();
        let value = parser.parse_expression()?;
        let range = parser.range_from(target);
        parser.add(
            ExprNode::Assignment {
                operator,
                target,
                value,
            },
            range,
        )?
    } else {
        target
    };
    parser.finish(root, declaration_keyword)
}

pub struct ParserState<'a> {
    text: &'a str,
    scanner: ScannerState<'a>,
    arena: ExprArena,
    /// Current recursion depth of the descent itself.
    depth: u32,
}

impl<'a> ParserState<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            scanner: ScannerState::new(text),
            arena: ExprArena::new(),
            depth: 0,
        }
    }

    fn token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    fn next_token(&mut self) -> SyntaxKind {
        self.scanner.scan()
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            text: self.text.to_string(),
            pos: self.scanner.token_start() as u32,
            message: message.into(),
        }
    }

    fn unexpected_token(&self) -> ParseError {
        if let Some(message) = self.scanner.token_error() {
            return self.error(message);
        }
        let message = match self.token() {
            SyntaxKind::EndOfFileToken => "unexpected end of expression".to_string(),
            SyntaxKind::NumericLiteral | SyntaxKind::StringLiteral | SyntaxKind::Identifier => {
                format!("unexpected {} `{}`", self.token().text(), self.scanner.token_text())
            }
            other => format!("unexpected `{}`", other.text()),
        };
        self.error(message)
    }

    fn expect_token(&mut self, kind: SyntaxKind) -> Result<(), ParseError> {
        if self.token() == kind {
            self.next_token();
            Ok(())
        } else {
            Err(self.error(format!(
                "expected `{}`, found `{}`",
                kind.text(),
                self.token().text()
            )))
        }
    }

    fn add(&mut self, node: ExprNode, range: TextRange) -> Result<ExprIndex, ParseError> {
        let index = self.arena.add(node, range);
        if self.arena.height(index) > MAX_EXPRESSION_DEPTH {
            return Err(self.error(format!(
                "expression nests deeper than {MAX_EXPRESSION_DEPTH} levels"
            )));
        }
        Ok(index)
    }

    /// Range from the start of `start` to the end of the last consumed token.
    fn range_from(&self, start: ExprIndex) -> TextRange {
        TextRange {
            pos: self.arena.range(start).pos,
            end: self.previous_end(),
        }
    }

    fn previous_end(&self) -> u32 {
        // The scanner has already moved past the current token; everything
        // before its start has been consumed.
        self.text[..self.scanner.token_start()].trim_end().len() as u32
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_EXPRESSION_DEPTH {
            return Err(self.error(format!(
                "expression nests deeper than {MAX_EXPRESSION_DEPTH} levels"
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn finish(
        mut self,
        root: ExprIndex,
        declaration_keyword: Option<SyntaxKind>,
    ) -> Result<ParsedExpression, ParseError> {
        if self.token() == SyntaxKind::SemicolonToken {
            self.next_token();
        }
        if self.token() != SyntaxKind::EndOfFileToken {
            return Err(self.unexpected_token());
        }
        Ok(ParsedExpression {
            arena: self.arena,
            root,
            declaration_keyword,
        })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Parse a full expression (conditional level).
    pub fn parse_expression(&mut self) -> Result<ExprIndex, ParseError> {
        self.enter()?;
        let result = self.parse_conditional_expression();
        self.leave();
        result
    }

    fn parse_conditional_expression(&mut self) -> Result<ExprIndex, ParseError> {
        let condition = self.parse_binary_expression(1)?;
        if self.token() != SyntaxKind::QuestionToken {
            return Ok(condition);
        }
        self.next_token();
        let when_true = self.parse_expression()?;
        self.expect_token(SyntaxKind::ColonToken)?;
        let when_false = self.parse_expression()?;
        let range = self.range_from(condition);
        self.add(
            ExprNode::Conditional {
                condition,
                when_true,
                when_false,
            },
            range,
        )
    }

    /// Parse a binary expression with precedence climbing.
    fn parse_binary_expression(&mut self, min_precedence: u8) -> Result<ExprIndex, ParseError> {
        let mut left = self.parse_unary_expression()?;

        loop {
            let precedence = get_operator_precedence(self.token());
            if precedence == 0 || precedence < min_precedence {
                break;
            }

            let operator = self.token();
            self.next_token();

            // `**` is right-associative.
            let next_min = if operator == SyntaxKind::AsteriskAsteriskToken {
                precedence
            } else {
                precedence + 1
            };
            self.enter()?;
            let right = self.parse_binary_expression(next_min);
            self.leave();
            let right = right?;
            let range = self.range_from(left);
            left = self.add(
                ExprNode::Binary {
                    operator,
                    left,
                    right,
                },
                range,
            )?;
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> Result<ExprIndex, ParseError> {
        match self.token() {
            SyntaxKind::ExclamationToken | SyntaxKind::MinusToken | SyntaxKind::PlusToken => {
                let operator = self.token();
                let pos = self.scanner.token_start() as u32;
                self.next_token();
                self.enter()?;
                let operand = self.parse_unary_expression();
                self.leave();
                let operand = operand?;
                let end = self.previous_end();
                self.add(ExprNode::Unary { operator, operand }, TextRange { pos, end })
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_postfix_expression(&mut self) -> Result<ExprIndex, ParseError> {
        let mut expression = self.parse_primary_expression()?;
        loop {
            match self.token() {
                SyntaxKind::OpenBracketToken => {
                    self.next_token();
                    let index = self.parse_expression()?;
                    self.expect_token(SyntaxKind::CloseBracketToken)?;
                    let range = self.range_from(expression);
                    expression = self.add(
                        ExprNode::Element {
                            object: expression,
                            index,
                        },
                        range,
                    )?;
                }
                SyntaxKind::DotToken => {
                    self.next_token();
                    if self.token() != SyntaxKind::Identifier {
                        return Err(self.error("expected property name after `.`"));
                    }
                    let name = self.scanner.token_text().to_string();
                    self.next_token();
                    let range = self.range_from(expression);
                    expression = self.add(
                        ExprNode::Property {
                            object: expression,
                            name,
                        },
                        range,
                    )?;
                }
                _ => return Ok(expression),
            }
        }
    }

    fn parse_primary_expression(&mut self) -> Result<ExprIndex, ParseError> {
        let range = TextRange {
            pos: self.scanner.token_start() as u32,
            end: self.scanner.token_end() as u32,
        };
        match self.token() {
            SyntaxKind::NumericLiteral => {
                let text = self.scanner.token_text();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| self.error(format!("invalid numeric literal `{text}`")))?;
                self.next_token();
                self.add(ExprNode::Number(value), range)
            }
            SyntaxKind::StringLiteral => {
                let value = self.scanner.token_value().to_string();
                self.next_token();
                self.add(ExprNode::Str(value), range)
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let value = self.token() == SyntaxKind::TrueKeyword;
                self.next_token();
                self.add(ExprNode::Bool(value), range)
            }
            SyntaxKind::Identifier => {
                let name = self.scanner.token_text().to_string();
                self.next_token();
                self.add(ExprNode::Identifier(name), range)
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let inner = self.parse_expression()?;
                self.expect_token(SyntaxKind::CloseParenToken)?;
                Ok(inner)
            }
            SyntaxKind::OpenBracketToken => self.parse_array_literal(range.pos),
            _ => Err(self.unexpected_token()),
        }
    }

    fn parse_array_literal(&mut self, pos: u32) -> Result<ExprIndex, ParseError> {
        self.expect_token(SyntaxKind::OpenBracketToken)?;
        let mut elements = Vec::new();
        while self.token() != SyntaxKind::CloseBracketToken {
            elements.push(self.parse_expression()?);
            if self.token() == SyntaxKind::CommaToken {
                self.next_token();
            } else {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseBracketToken)?;
        let end = self.previous_end();
        self.add(ExprNode::Array(elements), TextRange { pos, end })
    }
}

/// Get the precedence of a binary operator (0 if the token is not one).
fn get_operator_precedence(token: SyntaxKind) -> u8 {
    match token {
        SyntaxKind::BarBarToken => 4,
        SyntaxKind::AmpersandAmpersandToken => 5,
        SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken => 9,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken => 10,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => 12,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => 13,
        SyntaxKind::AsteriskAsteriskToken => 14,
        _ => 0,
    }
}

#[cfg(test)]
#[path = "../tests/parser_tests.rs"]
mod tests;
