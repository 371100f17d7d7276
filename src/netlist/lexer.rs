//! Lexer (tokenizer) for the netlist export format.

use crate::error::{BoardnetError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text. Keywords are uppercased; strings hold the text
    /// between the quotes.
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in the netlist format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Equals sign '='
    Equals,
    /// Semicolon ';'
    Semicolon,
    /// Colon ':'
    Colon,
    /// Open parenthesis '('
    LParen,
    /// Close parenthesis ')'
    RParen,
    /// Comma ','
    Comma,
    /// Dot '.'
    Dot,
    /// A reserved keyword
    Keyword(Keyword),
    /// A generic identifier (refdes, pin number, attribute name, ...)
    Ident,
    /// A tick-quoted string
    Str,
    /// End of file
    Eof,
}

/// Reserved keywords of the netlist format. Matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    FileType,
    LibraryParts,
    ExpandedNetlist,
    ExpandedPartList,
    Primitive,
    Pin,
    PinNumber,
    InputLoad,
    OutputLoad,
    OutputType,
    Bidirectional,
    PinUse,
    EndPin,
    Body,
    PartName,
    JedecType,
    Class,
    SwapInfo,
    Value,
    PartNumber,
    AltSymbols,
    EndBody,
    EndPrimitive,
    End,
    NetName,
    NodeName,
    Directives,
    PstVersion,
    RootDrawing,
    PostTime,
    SourceTool,
    EndDirectives,
    SectionNumber,
}

impl Keyword {
    /// Look up a reserved keyword, case-insensitively.
    pub fn lookup(text: &str) -> Option<Keyword> {
        let kw = match text.to_ascii_uppercase().as_str() {
            "FILE_TYPE" => Keyword::FileType,
            "LIBRARY_PARTS" => Keyword::LibraryParts,
            "EXPANDEDNETLIST" => Keyword::ExpandedNetlist,
            "EXPANDEDPARTLIST" => Keyword::ExpandedPartList,
            "PRIMITIVE" => Keyword::Primitive,
            "PIN" => Keyword::Pin,
            "PIN_NUMBER" => Keyword::PinNumber,
            "INPUT_LOAD" => Keyword::InputLoad,
            "OUTPUT_LOAD" => Keyword::OutputLoad,
            "OUTPUT_TYPE" => Keyword::OutputType,
            "BIDIRECTIONAL" => Keyword::Bidirectional,
            "PINUSE" => Keyword::PinUse,
            "END_PIN" => Keyword::EndPin,
            "BODY" => Keyword::Body,
            "PART_NAME" => Keyword::PartName,
            "JEDEC_TYPE" => Keyword::JedecType,
            "CLASS" => Keyword::Class,
            "SWAP_INFO" => Keyword::SwapInfo,
            "VALUE" => Keyword::Value,
            "PART_NUMBER" => Keyword::PartNumber,
            "ALT_SYMBOLS" => Keyword::AltSymbols,
            "END_BODY" => Keyword::EndBody,
            "END_PRIMITIVE" => Keyword::EndPrimitive,
            "END" => Keyword::End,
            "NET_NAME" => Keyword::NetName,
            "NODE_NAME" => Keyword::NodeName,
            "DIRECTIVES" => Keyword::Directives,
            "PST_VERSION" => Keyword::PstVersion,
            "ROOT_DRAWING" => Keyword::RootDrawing,
            "POST_TIME" => Keyword::PostTime,
            "SOURCE_TOOL" => Keyword::SourceTool,
            "END_DIRECTIVES" => Keyword::EndDirectives,
            "SECTION_NUMBER" => Keyword::SectionNumber,
            _ => return None,
        };
        Some(kw)
    }
}

/// Lexer for tokenizing netlist input.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        loop {
            let ch = match self.chars.peek().copied() {
                Some(ch) => ch,
                None => {
                    return Ok(Token {
                        kind: TokenKind::Eof,
                        text: String::new(),
                        line: self.line,
                        column: self.column,
                    });
                }
            };

            // Brace-delimited runs are annotations; discard through the
            // closing brace without producing a token.
            if ch == '{' {
                while let Some(c) = self.advance() {
                    if c == '}' {
                        break;
                    }
                }
                continue;
            }

            if ch.is_whitespace() {
                self.advance();
                continue;
            }

            if ch == '\'' {
                return Ok(self.string());
            }

            if ch.is_alphanumeric() {
                return Ok(self.ident());
            }

            let line = self.line;
            let column = self.column;
            let kind = match ch {
                '=' => TokenKind::Equals,
                ';' => TokenKind::Semicolon,
                ':' => TokenKind::Colon,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                ',' => TokenKind::Comma,
                '.' => TokenKind::Dot,
                _ => {
                    return Err(BoardnetError::lexer(
                        line,
                        column,
                        format!("unexpected character '{}'", ch),
                    ));
                }
            };
            self.advance();
            return Ok(Token {
                kind,
                text: ch.to_string(),
                line,
                column,
            });
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Read a tick-quoted string. The string only terminates on a quote
    /// immediately followed by a structural character, which tolerates
    /// embedded quotes in the value.
    fn string(&mut self) -> Token {
        let line = self.line;
        let column = self.column;
        self.advance(); // opening quote

        let mut text = String::new();
        while let Some(ch) = self.advance() {
            if ch == '\'' {
                match self.chars.peek().copied() {
                    Some('\r') | Some('\n') | Some(':') | Some(',') | Some(';') => break,
                    // Not a terminator: the quote is part of the value
                    _ => text.push('\''),
                }
            } else {
                text.push(ch);
            }
        }

        Token {
            kind: TokenKind::Str,
            text,
            line,
            column,
        }
    }

    /// Read an identifier or reserved keyword.
    fn ident(&mut self) -> Token {
        let line = self.line;
        let column = self.column;

        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '-' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match Keyword::lookup(&text) {
            Some(kw) => Token {
                kind: TokenKind::Keyword(kw),
                text: text.to_ascii_uppercase(),
                line,
                column,
            },
            None => Token {
                kind: TokenKind::Ident,
                text,
                line,
                column,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            let done = tok.kind == TokenKind::Eof;
            out.push(tok);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn test_lexer_basic() {
        let toks = tokens("FILE_TYPE = LIBRARY_PARTS ;");
        assert_eq!(toks[0].kind, TokenKind::Keyword(Keyword::FileType));
        assert_eq!(toks[1].kind, TokenKind::Equals);
        assert_eq!(toks[2].kind, TokenKind::Keyword(Keyword::LibraryParts));
        assert_eq!(toks[3].kind, TokenKind::Semicolon);
        assert_eq!(toks[4].kind, TokenKind::Eof);
    }

    #[rstest]
    #[case("file_type", Keyword::FileType)]
    #[case("Primitive", Keyword::Primitive)]
    #[case("PIN_NUMBER", Keyword::PinNumber)]
    #[case("end_directives", Keyword::EndDirectives)]
    fn test_keywords_case_insensitive(#[case] input: &str, #[case] expected: Keyword) {
        let toks = tokens(input);
        assert_eq!(toks[0].kind, TokenKind::Keyword(expected));
        assert_eq!(toks[0].text, input.to_ascii_uppercase());
    }

    #[test]
    fn test_identifier_with_dash_and_underscore() {
        let toks = tokens("R12_a-b");
        assert_eq!(toks[0].kind, TokenKind::Ident);
        assert_eq!(toks[0].text, "R12_a-b");
    }

    #[test]
    fn test_string_value_excludes_quotes() {
        let toks = tokens("'cap_0603';");
        assert_eq!(toks[0].kind, TokenKind::Str);
        assert_eq!(toks[0].text, "cap_0603");
        assert_eq!(toks[1].kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_string_tolerates_embedded_quote() {
        // The first quote is not followed by a structural character, so it
        // belongs to the value
        let toks = tokens("'5% 1/4'W res';");
        assert_eq!(toks[0].kind, TokenKind::Str);
        assert_eq!(toks[0].text, "5% 1/4'W res");
    }

    #[test]
    fn test_brace_run_is_skipped() {
        let toks = tokens("PIN { ignored annotation } ;");
        assert_eq!(toks[0].kind, TokenKind::Keyword(Keyword::Pin));
        assert_eq!(toks[1].kind, TokenKind::Semicolon);
    }

    #[test]
    fn test_line_and_column_tracking() {
        let toks = tokens("END\n .");
        assert_eq!(toks[0].line, 1);
        assert_eq!(toks[0].column, 1);
        assert_eq!(toks[1].kind, TokenKind::Dot);
        assert_eq!(toks[1].line, 2);
        assert_eq!(toks[1].column, 2);
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("  @");
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(
            err,
            BoardnetError::LexerError { line: 1, column: 3, .. }
        ));
    }
}
