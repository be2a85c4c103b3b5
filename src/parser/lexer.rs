//! Lexer (tokenizer) for C source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! The stream always ends with exactly one [`TokenKind::End`] token.
//!
//! Lexing never stops early. Problems are collected as [`LexError`]s next to
//! the tokens: unknown characters are skipped, while an unterminated string or
//! block comment runs to the end of the buffer and is flagged so the caller
//! can refuse to parse it.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token kinds produced by the lexer.
///
/// Built-in type names such as `int` are not keywords: they lex as
/// [`TokenKind::Name`] and are recognised as types by the scope table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    End,

    // Qualifiers
    Volatile,
    Unsigned,
    Const,
    Register,
    Inline,

    // Constants
    True,
    False,
    Null,

    // Type keywords
    Sizeof,
    Typeof,
    Typedef,
    Struct,
    Enum,
    Union,

    // Loops
    Do,
    While,
    For,
    Break,
    Continue,

    // Branches
    If,
    Else,
    Switch,
    Case,
    Default,
    Return,

    // Literals
    Number,
    String,
    Name,

    // Comparison and assignment
    Equals,            // =
    PlusEquals,        // +=
    MinusEquals,       // -=
    EqualsEquals,      // ==
    Not,               // !
    NotEquals,         // !=
    LessThan,          // <
    LessThanEquals,    // <=
    GreaterThan,       // >
    GreaterThanEquals, // >=

    // Logical and bitwise
    Ampersand, // &
    And,       // &&
    Pipe,      // |
    Or,        // ||
    Caret,     // ^

    // Arithmetic
    Plus,       // +
    PlusPlus,   // ++
    Minus,      // -
    MinusMinus, // --
    Star,       // *
    Slash,      // /
    Percent,    // %

    // Punctuation
    Dot,          // .
    Ellipsis,     // ...
    Arrow,        // ->
    Comma,        // ,
    Semicolon,    // ;
    Colon,        // :
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    LeftBrace,    // {
    RightBrace,   // }
}

impl TokenKind {
    /// Look up a keyword; `None` means the word is an ordinary name.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "volatile" => TokenKind::Volatile,
            "unsigned" => TokenKind::Unsigned,
            "const" => TokenKind::Const,
            "register" => TokenKind::Register,
            "inline" => TokenKind::Inline,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "NULL" => TokenKind::Null,
            "sizeof" => TokenKind::Sizeof,
            "typeof" => TokenKind::Typeof,
            "typedef" => TokenKind::Typedef,
            "struct" => TokenKind::Struct,
            "enum" => TokenKind::Enum,
            "union" => TokenKind::Union,
            "do" => TokenKind::Do,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "switch" => TokenKind::Switch,
            "case" => TokenKind::Case,
            "default" => TokenKind::Default,
            "return" => TokenKind::Return,
            _ => return None,
        };
        Some(kind)
    }

    /// True for tokens whose text is a literal payload rather than fixed
    /// spelling.
    pub fn is_literal(self) -> bool {
        matches!(self, TokenKind::Number | TokenKind::String | TokenKind::Name)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TokenKind::End => "end of file",
            TokenKind::Volatile => "'volatile'",
            TokenKind::Unsigned => "'unsigned'",
            TokenKind::Const => "'const'",
            TokenKind::Register => "'register'",
            TokenKind::Inline => "'inline'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Null => "'NULL'",
            TokenKind::Sizeof => "'sizeof'",
            TokenKind::Typeof => "'typeof'",
            TokenKind::Typedef => "'typedef'",
            TokenKind::Struct => "'struct'",
            TokenKind::Enum => "'enum'",
            TokenKind::Union => "'union'",
            TokenKind::Do => "'do'",
            TokenKind::While => "'while'",
            TokenKind::For => "'for'",
            TokenKind::Break => "'break'",
            TokenKind::Continue => "'continue'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::Switch => "'switch'",
            TokenKind::Case => "'case'",
            TokenKind::Default => "'default'",
            TokenKind::Return => "'return'",
            TokenKind::Number => "number",
            TokenKind::String => "string literal",
            TokenKind::Name => "identifier",
            TokenKind::Equals => "'='",
            TokenKind::PlusEquals => "'+='",
            TokenKind::MinusEquals => "'-='",
            TokenKind::EqualsEquals => "'=='",
            TokenKind::Not => "'!'",
            TokenKind::NotEquals => "'!='",
            TokenKind::LessThan => "'<'",
            TokenKind::LessThanEquals => "'<='",
            TokenKind::GreaterThan => "'>'",
            TokenKind::GreaterThanEquals => "'>='",
            TokenKind::Ampersand => "'&'",
            TokenKind::And => "'&&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Or => "'||'",
            TokenKind::Caret => "'^'",
            TokenKind::Plus => "'+'",
            TokenKind::PlusPlus => "'++'",
            TokenKind::Minus => "'-'",
            TokenKind::MinusMinus => "'--'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Dot => "'.'",
            TokenKind::Ellipsis => "'...'",
            TokenKind::Arrow => "'->'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
        };
        f.write_str(label)
    }
}

/// A classified lexeme.
///
/// `text` is an owned copy of the lexeme; for string literals it holds the
/// characters between the quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    /// Rebuild source text that lexes back to this token.
    pub fn source_text(&self) -> String {
        match self.kind {
            TokenKind::String => format!("\"{}\"", self.text),
            TokenKind::End => String::new(),
            _ => self.text.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Number => write!(f, "number {}", self.text),
            TokenKind::String => write!(f, "string literal \"{}\"", self.text),
            TokenKind::Name => write!(f, "identifier '{}'", self.text),
            kind => write!(f, "{}", kind),
        }
    }
}

/// What went wrong while lexing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    UnknownCharacter(char),
    UnterminatedString,
    UnterminatedComment,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::UnknownCharacter(ch) => write!(f, "unknown character {:?}", ch),
            LexErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            LexErrorKind::UnterminatedComment => write!(f, "unterminated block comment"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at {location}: {kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub location: SourceLocation,
}

impl LexError {
    /// Unknown characters are skipped without affecting the surrounding
    /// tokens; anything that swallowed the rest of the buffer is not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind, LexErrorKind::UnknownCharacter(_))
    }
}

/// Output of one lexing pass
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl Tokens {
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    /// First error that should stop the parse, if any
    pub fn first_fatal(&self) -> Option<&LexError> {
        self.errors.iter().find(|e| !e.is_recoverable())
    }
}

/// Tokenize a whole buffer in one pass.
pub fn tokenize(source: &str) -> Tokens {
    Lexer::new(source).tokenize()
}

/// Lexer for C source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    errors: Vec<LexError>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(mut self) -> Tokens {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();

            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::End, "", self.current_location()));
                break;
            }

            if let Some(token) = self.next_token() {
                tokens.push(token);
            }
        }

        Tokens {
            tokens,
            errors: self.errors,
        }
    }

    /// Get next token, or `None` when the character was skipped
    fn next_token(&mut self) -> Option<Token> {
        let loc = self.current_location();
        let ch = self.advance()?;

        let kind = match ch {
            '"' => return Some(self.string_literal(loc)),
            '0'..='9' => return Some(self.number_literal(ch, loc)),
            'a'..='z' | 'A'..='Z' => return Some(self.identifier_or_keyword(ch, loc)),

            '=' => self.pick(&[('=', TokenKind::EqualsEquals)], TokenKind::Equals),
            '!' => self.pick(&[('=', TokenKind::NotEquals)], TokenKind::Not),
            '<' => self.pick(&[('=', TokenKind::LessThanEquals)], TokenKind::LessThan),
            '>' => self.pick(
                &[('=', TokenKind::GreaterThanEquals)],
                TokenKind::GreaterThan,
            ),
            '&' => self.pick(&[('&', TokenKind::And)], TokenKind::Ampersand),
            '|' => self.pick(&[('|', TokenKind::Or)], TokenKind::Pipe),
            '+' => self.pick(
                &[('+', TokenKind::PlusPlus), ('=', TokenKind::PlusEquals)],
                TokenKind::Plus,
            ),
            '-' => self.pick(
                &[
                    ('-', TokenKind::MinusMinus),
                    ('=', TokenKind::MinusEquals),
                    ('>', TokenKind::Arrow),
                ],
                TokenKind::Minus,
            ),
            '.' => {
                if self.peek() == Some('.') && self.peek_ahead(1) == Some('.') {
                    self.advance();
                    self.advance();
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Dot
                }
            }
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '^' => TokenKind::Caret,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,

            _ => {
                log::warn!("skipping unknown character {:?} at {}", ch, loc);
                self.errors.push(LexError {
                    kind: LexErrorKind::UnknownCharacter(ch),
                    location: loc,
                });
                return None;
            }
        };

        let text: String = self.input[self.position_of(loc)..self.position].iter().collect();
        Some(Token::new(kind, text, loc))
    }

    /// Choose between a one-character token and the two-character tokens it
    /// can start, based on the character that follows.
    fn pick(&mut self, pairs: &[(char, TokenKind)], single: TokenKind) -> TokenKind {
        for &(next, kind) in pairs {
            if self.peek() == Some(next) {
                self.advance();
                return kind;
            }
        }
        single
    }

    /// Parse string literal (the opening quote is already consumed)
    fn string_literal(&mut self, loc: SourceLocation) -> Token {
        let mut string = String::new();

        while let Some(ch) = self.advance() {
            if ch == '"' {
                return Token::new(TokenKind::String, string, loc);
            }
            string.push(ch);
        }

        self.errors.push(LexError {
            kind: LexErrorKind::UnterminatedString,
            location: loc,
        });
        Token::new(TokenKind::String, string, loc)
    }

    /// Parse numeric literal (decimal digits only)
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Token {
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::new(TokenKind::Number, num_str, loc)
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = TokenKind::keyword(&ident).unwrap_or(TokenKind::Name);
        Token::new(kind, ident, loc)
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance(); // skip '*'
                self.advance(); // skip '/'
                return;
            }
            self.advance();
        }

        self.errors.push(LexError {
            kind: LexErrorKind::UnterminatedComment,
            location: start_loc,
        });
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Operators never span lines, so the start offset can be recovered from
    /// the column distance.
    fn position_of(&self, start: SourceLocation) -> usize {
        self.position - (self.column - start.column)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
