//! Scanner for the expression subset pathviz evaluates.
//!
//! The scanner is a small state machine over the source text. It produces
//! one token at a time; the parser pulls tokens with `scan()` and reads the
//! current token's kind, range and value from the scanner state.

/// Token kinds produced by the scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Unknown,
    EndOfFileToken,

    // Literals and names
    NumericLiteral,
    StringLiteral,
    Identifier,

    // Keywords
    TrueKeyword,
    FalseKeyword,
    LetKeyword,
    ConstKeyword,
    VarKeyword,

    // Punctuation
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    CommaToken,
    DotToken,
    QuestionToken,
    ColonToken,
    SemicolonToken,

    // Operators
    PlusToken,
    MinusToken,
    AsteriskToken,
    AsteriskAsteriskToken,
    SlashToken,
    PercentToken,
    ExclamationToken,
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsEqualsToken,
    AmpersandAmpersandToken,
    BarBarToken,

    // Assignment operators
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    SlashEqualsToken,
    PercentEqualsToken,
}

impl SyntaxKind {
    /// Declaration keywords that may prefix an assignment (`let x = 1`).
    pub const fn is_declaration_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword | SyntaxKind::VarKeyword
        )
    }

    pub const fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::EqualsToken
                | SyntaxKind::PlusEqualsToken
                | SyntaxKind::MinusEqualsToken
                | SyntaxKind::AsteriskEqualsToken
                | SyntaxKind::SlashEqualsToken
                | SyntaxKind::PercentEqualsToken
        )
    }

    /// The binary operator a compound assignment applies (`+=` -> `+`).
    pub const fn compound_operator(self) -> Option<SyntaxKind> {
        match self {
            SyntaxKind::PlusEqualsToken => Some(SyntaxKind::PlusToken),
            SyntaxKind::MinusEqualsToken => Some(SyntaxKind::MinusToken),
            SyntaxKind::AsteriskEqualsToken => Some(SyntaxKind::AsteriskToken),
            SyntaxKind::SlashEqualsToken => Some(SyntaxKind::SlashToken),
            SyntaxKind::PercentEqualsToken => Some(SyntaxKind::PercentToken),
            _ => None,
        }
    }

    /// Source spelling of punctuation and operator tokens.
    pub const fn text(self) -> &'static str {
        match self {
            SyntaxKind::OpenParenToken => "(",
            SyntaxKind::CloseParenToken => ")",
            SyntaxKind::OpenBracketToken => "[",
            SyntaxKind::CloseBracketToken => "]",
            SyntaxKind::CommaToken => ",",
            SyntaxKind::DotToken => ".",
            SyntaxKind::QuestionToken => "?",
            SyntaxKind::ColonToken => ":",
            SyntaxKind::SemicolonToken => ";",
            SyntaxKind::PlusToken => "+",
            SyntaxKind::MinusToken => "-",
            SyntaxKind::AsteriskToken => "*",
            SyntaxKind::AsteriskAsteriskToken => "**",
            SyntaxKind::SlashToken => "/",
            SyntaxKind::PercentToken => "%",
            SyntaxKind::ExclamationToken => "!",
            SyntaxKind::LessThanToken => "<",
            SyntaxKind::GreaterThanToken => ">",
            SyntaxKind::LessThanEqualsToken => "<=",
            SyntaxKind::GreaterThanEqualsToken => ">=",
            SyntaxKind::EqualsEqualsToken => "==",
            SyntaxKind::ExclamationEqualsToken => "!=",
            SyntaxKind::EqualsEqualsEqualsToken => "===",
            SyntaxKind::ExclamationEqualsEqualsToken => "!==",
            SyntaxKind::AmpersandAmpersandToken => "&&",
            SyntaxKind::BarBarToken => "||",
            SyntaxKind::EqualsToken => "=",
            SyntaxKind::PlusEqualsToken => "+=",
            SyntaxKind::MinusEqualsToken => "-=",
            SyntaxKind::AsteriskEqualsToken => "*=",
            SyntaxKind::SlashEqualsToken => "/=",
            SyntaxKind::PercentEqualsToken => "%=",
            SyntaxKind::TrueKeyword => "true",
            SyntaxKind::FalseKeyword => "false",
            SyntaxKind::LetKeyword => "let",
            SyntaxKind::ConstKeyword => "const",
            SyntaxKind::VarKeyword => "var",
            SyntaxKind::NumericLiteral => "numeric literal",
            SyntaxKind::StringLiteral => "string literal",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::EndOfFileToken => "end of expression",
            SyntaxKind::Unknown => "unknown token",
        }
    }
}

fn keyword_kind(text: &str) -> Option<SyntaxKind> {
    match text {
        "true" => Some(SyntaxKind::TrueKeyword),
        "false" => Some(SyntaxKind::FalseKeyword),
        "let" => Some(SyntaxKind::LetKeyword),
        "const" => Some(SyntaxKind::ConstKeyword),
        "var" => Some(SyntaxKind::VarKeyword),
        _ => None,
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphabetic()
}

fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_alphanumeric()
}

/// Tokenizer state.
///
/// Positions are byte offsets into the scanned text.
pub struct ScannerState<'a> {
    text: &'a str,
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    /// Cooked value of the current string literal.
    token_value: String,
    /// Set when the current token is `Unknown` or an unterminated string.
    token_error: Option<&'static str>,
}

impl<'a> ScannerState<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_value: String::new(),
            token_error: None,
        }
    }

    pub const fn token(&self) -> SyntaxKind {
        self.token
    }

    pub const fn token_start(&self) -> usize {
        self.token_start
    }

    pub const fn token_end(&self) -> usize {
        self.pos
    }

    /// Raw source text of the current token.
    pub fn token_text(&self) -> &'a str {
        &self.text[self.token_start..self.pos]
    }

    /// Cooked value of the current string literal (escapes resolved).
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    pub const fn token_error(&self) -> Option<&'static str> {
        self.token_error
    }

    fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(offset)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    /// Advance to the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.skip_trivia();
        self.token_start = self.pos;
        self.token_value.clear();
        self.token_error = None;

        let Some(ch) = self.bump() else {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        };

        self.token = match ch {
            '(' => SyntaxKind::OpenParenToken,
            ')' => SyntaxKind::CloseParenToken,
            '[' => SyntaxKind::OpenBracketToken,
            ']' => SyntaxKind::CloseBracketToken,
            ',' => SyntaxKind::CommaToken,
            '?' => SyntaxKind::QuestionToken,
            ':' => SyntaxKind::ColonToken,
            ';' => SyntaxKind::SemicolonToken,
            '.' => {
                if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number_rest()
                } else {
                    SyntaxKind::DotToken
                }
            }
            '+' => {
                if self.eat('=') {
                    SyntaxKind::PlusEqualsToken
                } else {
                    SyntaxKind::PlusToken
                }
            }
            '-' => {
                if self.eat('=') {
                    SyntaxKind::MinusEqualsToken
                } else {
                    SyntaxKind::MinusToken
                }
            }
            '*' => {
                if self.eat('*') {
                    SyntaxKind::AsteriskAsteriskToken
                } else if self.eat('=') {
                    SyntaxKind::AsteriskEqualsToken
                } else {
                    SyntaxKind::AsteriskToken
                }
            }
            '/' => {
                if self.eat('=') {
                    SyntaxKind::SlashEqualsToken
                } else {
                    SyntaxKind::SlashToken
                }
            }
            '%' => {
                if self.eat('=') {
                    SyntaxKind::PercentEqualsToken
                } else {
                    SyntaxKind::PercentToken
                }
            }
            '!' => {
                if self.eat('=') {
                    if self.eat('=') {
                        SyntaxKind::ExclamationEqualsEqualsToken
                    } else {
                        SyntaxKind::ExclamationEqualsToken
                    }
                } else {
                    SyntaxKind::ExclamationToken
                }
            }
            '=' => {
                if self.eat('=') {
                    if self.eat('=') {
                        SyntaxKind::EqualsEqualsEqualsToken
                    } else {
                        SyntaxKind::EqualsEqualsToken
                    }
                } else {
                    SyntaxKind::EqualsToken
                }
            }
            '<' => {
                if self.eat('=') {
                    SyntaxKind::LessThanEqualsToken
                } else {
                    SyntaxKind::LessThanToken
                }
            }
            '>' => {
                if self.eat('=') {
                    SyntaxKind::GreaterThanEqualsToken
                } else {
                    SyntaxKind::GreaterThanToken
                }
            }
            '&' if self.eat('&') => SyntaxKind::AmpersandAmpersandToken,
            '|' if self.eat('|') => SyntaxKind::BarBarToken,
            '"' | '\'' => self.scan_string(ch),
            c if c.is_ascii_digit() => self.scan_number_rest(),
            c if is_identifier_start(c) => {
                while self.peek_char().is_some_and(is_identifier_part) {
                    self.bump();
                }
                keyword_kind(self.token_text()).unwrap_or(SyntaxKind::Identifier)
            }
            _ => {
                self.token_error = Some("unexpected character");
                SyntaxKind::Unknown
            }
        };
        self.token
    }

    /// Scan the remainder of a numeric literal whose first character was consumed.
    fn scan_number_rest(&mut self) -> SyntaxKind {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek_char() == Some('.') && !self.token_text().contains('.') {
            self.bump();
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let digit_at = match self.peek_char_at(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if self.peek_char_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    self.bump();
                }
                while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
            }
        }
        SyntaxKind::NumericLiteral
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        loop {
            let Some(ch) = self.bump() else {
                self.token_error = Some("unterminated string literal");
                return SyntaxKind::Unknown;
            };
            if ch == quote {
                return SyntaxKind::StringLiteral;
            }
            if ch == '\\' {
                let Some(escaped) = self.bump() else {
                    self.token_error = Some("unterminated string literal");
                    return SyntaxKind::Unknown;
                };
                let cooked = match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => other,
                };
                self.token_value.push(cooked);
            } else {
                self.token_value.push(ch);
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/scanner_tests.rs"]
mod tests;
