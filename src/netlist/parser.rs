//! Parser for the netlist export format.
//!
//! Recursive descent, one function per production. The `FILE_TYPE =` header
//! selects one of three sub-grammars sharing the token vocabulary: the part
//! library, the part instance list, and the connectivity list. The three
//! files reference each other's definitions, so they must be parsed in that
//! order against the same board.

use std::collections::{HashMap, VecDeque};

use super::lexer::{Keyword, Lexer, Token, TokenKind};
use crate::error::{BoardnetError, Result};
use crate::model::Board;

/// A part definition from the library file: the package tag plus the
/// ordered (pin number, pin name) list.
#[derive(Debug, Clone)]
pub struct PartDef {
    pub package: String,
    pub pins: Vec<(String, String)>,
}

/// Part-type name → definition, filled by the library grammar and consumed
/// by the instance grammar.
pub type PartLibrary = HashMap<String, PartDef>;

/// Parser over one netlist file.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    queue: VecDeque<Token>,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            queue: VecDeque::new(),
        })
    }

    /// Parse one file, dispatching on its `FILE_TYPE =` header.
    pub fn parse_file(&mut self, board: &mut Board, library: &mut PartLibrary) -> Result<()> {
        self.expect_keyword(Keyword::FileType)?;
        self.expect(TokenKind::Equals)?;
        match self.current.kind {
            TokenKind::Keyword(Keyword::LibraryParts) => self.parse_library(library),
            TokenKind::Keyword(Keyword::ExpandedPartList) => self.parse_parts(board, library),
            TokenKind::Keyword(Keyword::ExpandedNetlist) => self.parse_nets(board),
            _ => Err(self.unexpected("a file type keyword")),
        }
    }

    // ---- token plumbing ----

    fn advance(&mut self) -> Result<()> {
        self.current = match self.queue.pop_front() {
            Some(tok) => tok,
            None => self.lexer.next_token()?,
        };
        Ok(())
    }

    /// Look ahead k tokens (k >= 1) without consuming anything. Tokens are
    /// pulled from the lexer into a queue on demand.
    fn peek(&mut self, k: usize) -> Result<&Token> {
        while self.queue.len() < k {
            let tok = self.lexer.next_token()?;
            self.queue.push_back(tok);
        }
        Ok(&self.queue[k - 1])
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            let tok = self.current.clone();
            self.advance()?;
            Ok(tok)
        } else {
            Err(BoardnetError::parse(
                self.current.line,
                self.current.column,
                format!(
                    "expected {:?}, got {:?} '{}'",
                    kind, self.current.kind, self.current.text
                ),
            ))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token> {
        self.expect(TokenKind::Keyword(keyword))
    }

    fn take_str(&mut self) -> Result<String> {
        Ok(self.expect(TokenKind::Str)?.text)
    }

    fn take_ident(&mut self) -> Result<String> {
        Ok(self.expect(TokenKind::Ident)?.text)
    }

    fn unexpected(&self, wanted: &str) -> BoardnetError {
        BoardnetError::parse(
            self.current.line,
            self.current.column,
            format!(
                "expected {}, got {:?} '{}'",
                wanted, self.current.kind, self.current.text
            ),
        )
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        self.current.kind == TokenKind::Keyword(keyword)
    }

    // ---- library grammar ----

    // library_file := FILE_TYPE = LIBRARY_PARTS ;
    //                 primitive*
    //                 END .
    fn parse_library(&mut self, library: &mut PartLibrary) -> Result<()> {
        self.expect_keyword(Keyword::LibraryParts)?;
        self.expect(TokenKind::Semicolon)?;

        while !self.at_keyword(Keyword::End) {
            self.parse_primitive(library)?;
        }

        self.expect_keyword(Keyword::End)?;
        self.expect(TokenKind::Dot)?;
        Ok(())
    }

    // primitive := PRIMITIVE 'name' ;
    //              PIN pin_entry* END_PIN ;
    //              BODY body_entry* END_BODY ;
    //              END_PRIMITIVE ;
    fn parse_primitive(&mut self, library: &mut PartLibrary) -> Result<()> {
        self.expect_keyword(Keyword::Primitive)?;
        let name = self.take_str()?;
        self.expect(TokenKind::Semicolon)?;

        self.expect_keyword(Keyword::Pin)?;
        let mut pins = Vec::new();
        while !self.at_keyword(Keyword::EndPin) {
            self.parse_pin_entry(&mut pins)?;
        }
        self.expect_keyword(Keyword::EndPin)?;
        self.expect(TokenKind::Semicolon)?;

        self.expect_keyword(Keyword::Body)?;
        let mut package = String::new();
        while !self.at_keyword(Keyword::EndBody) {
            self.parse_body_entry(&mut package)?;
        }
        self.expect_keyword(Keyword::EndBody)?;
        self.expect(TokenKind::Semicolon)?;

        self.expect_keyword(Keyword::EndPrimitive)?;
        self.expect(TokenKind::Semicolon)?;

        library.insert(name, PartDef { package, pins });
        Ok(())
    }

    // pin_entry := 'pinname' : PIN_NUMBER = '(numbers)' ; pin_attr*
    fn parse_pin_entry(&mut self, pins: &mut Vec<(String, String)>) -> Result<()> {
        let pinname = self.take_str()?;
        self.expect(TokenKind::Colon)?;

        self.expect_keyword(Keyword::PinNumber)?;
        self.expect(TokenKind::Equals)?;
        let numbers = self.take_str()?;
        self.expect(TokenKind::Semicolon)?;

        // Load/polarity/swap attributes are recognized and discarded
        while matches!(
            self.current.kind,
            TokenKind::Keyword(Keyword::InputLoad)
                | TokenKind::Keyword(Keyword::OutputLoad)
                | TokenKind::Keyword(Keyword::OutputType)
                | TokenKind::Keyword(Keyword::Bidirectional)
                | TokenKind::Keyword(Keyword::PinUse)
        ) {
            self.advance()?;
            self.expect(TokenKind::Equals)?;
            self.take_str()?;
            self.expect(TokenKind::Semicolon)?;
        }

        // Multi-section parts list one number per section, comma-separated;
        // a literal 0 is the "no pin" sentinel.
        let numbers = numbers
            .strip_prefix('(')
            .and_then(|n| n.strip_suffix(')'))
            .unwrap_or(&numbers);
        for number in numbers.split(',') {
            if number == "0" {
                continue;
            }
            pins.push((number.to_string(), pinname.clone()));
        }
        Ok(())
    }

    // body_entry := (attr = 'value' ;)*
    //               PART_NAME = 'name' ; JEDEC_TYPE = 'package' ;
    //               known_attr*
    fn parse_body_entry(&mut self, package: &mut String) -> Result<()> {
        // Generic attributes may precede the part name
        while self.current.kind == TokenKind::Ident && self.peek(1)?.kind == TokenKind::Equals {
            self.advance()?;
            self.expect(TokenKind::Equals)?;
            self.take_str()?;
            self.expect(TokenKind::Semicolon)?;
        }

        self.expect_keyword(Keyword::PartName)?;
        self.expect(TokenKind::Equals)?;
        self.take_str()?;
        self.expect(TokenKind::Semicolon)?;

        self.expect_keyword(Keyword::JedecType)?;
        self.expect(TokenKind::Equals)?;
        *package = self.take_str()?;
        self.expect(TokenKind::Semicolon)?;

        while matches!(
            self.current.kind,
            TokenKind::Keyword(Keyword::Class)
                | TokenKind::Keyword(Keyword::SwapInfo)
                | TokenKind::Keyword(Keyword::Value)
                | TokenKind::Keyword(Keyword::PartNumber)
                | TokenKind::Keyword(Keyword::AltSymbols)
        ) {
            self.advance()?;
            self.expect(TokenKind::Equals)?;
            self.take_str()?;
            self.expect(TokenKind::Semicolon)?;
        }
        Ok(())
    }

    // ---- instance grammar ----

    // parts_file := FILE_TYPE = EXPANDEDPARTLIST ;
    //               DIRECTIVES directive* END_DIRECTIVES ;
    //               part* END .
    fn parse_parts(&mut self, board: &mut Board, library: &PartLibrary) -> Result<()> {
        self.expect_keyword(Keyword::ExpandedPartList)?;
        self.expect(TokenKind::Semicolon)?;

        self.expect_keyword(Keyword::Directives)?;

        self.expect_keyword(Keyword::PstVersion)?;
        self.expect(TokenKind::Equals)?;
        let version = self.take_str()?;
        if version != "PST_HDL_CENTRIC_VERSION_0" {
            return Err(BoardnetError::UnsupportedVersion {
                version,
                expected: "PST_HDL_CENTRIC_VERSION_0".to_string(),
            });
        }
        self.expect(TokenKind::Semicolon)?;

        self.expect_keyword(Keyword::RootDrawing)?;
        self.expect(TokenKind::Equals)?;
        board.name = self.take_str()?;
        self.expect(TokenKind::Semicolon)?;

        self.expect_keyword(Keyword::PostTime)?;
        self.expect(TokenKind::Equals)?;
        self.take_str()?;
        self.expect(TokenKind::Semicolon)?;

        self.expect_keyword(Keyword::SourceTool)?;
        self.expect(TokenKind::Equals)?;
        self.take_str()?;
        self.expect(TokenKind::Semicolon)?;

        self.expect_keyword(Keyword::EndDirectives)?;
        self.expect(TokenKind::Semicolon)?;

        while !self.at_keyword(Keyword::End) {
            self.parse_part(board, library)?;
        }

        self.expect_keyword(Keyword::End)?;
        self.expect(TokenKind::Dot)?;
        Ok(())
    }

    // part := PART_NAME refdes 'type' : attr_list ;
    //         (SECTION_NUMBER n 'x' : attr_list ;)*
    fn parse_part(&mut self, board: &mut Board, library: &PartLibrary) -> Result<()> {
        self.expect_keyword(Keyword::PartName)?;

        let refdes = self.take_ident()?;
        let part_type = self.take_str()?;
        self.expect(TokenKind::Colon)?;
        self.parse_attr_list()?;
        self.expect(TokenKind::Semicolon)?;

        // Section assignments are validated structurally and discarded
        while self.at_keyword(Keyword::SectionNumber) {
            self.advance()?;
            self.take_ident()?;
            self.take_str()?;
            self.expect(TokenKind::Colon)?;
            self.parse_attr_list()?;
            self.expect(TokenKind::Semicolon)?;
        }

        let part = library
            .get(&part_type)
            .ok_or_else(|| BoardnetError::not_found("part", part_type.clone()))?;
        let component = board.add_component(refdes, part.package.clone())?;
        for (number, name) in &part.pins {
            board.add_pin(component, number, name)?;
        }
        Ok(())
    }

    // attr_list := (attr = 'value' ,?)*
    fn parse_attr_list(&mut self) -> Result<()> {
        while self.current.kind != TokenKind::Semicolon {
            self.expect(TokenKind::Ident)?;
            self.expect(TokenKind::Equals)?;
            self.take_str()?;
            if self.current.kind == TokenKind::Comma {
                self.advance()?;
            }
        }
        Ok(())
    }

    // ---- connectivity grammar ----

    // nets_file := FILE_TYPE = EXPANDEDNETLIST ;
    //              net* END .
    fn parse_nets(&mut self, board: &mut Board) -> Result<()> {
        self.expect_keyword(Keyword::ExpandedNetlist)?;
        self.expect(TokenKind::Semicolon)?;

        while !self.at_keyword(Keyword::End) {
            self.parse_net(board)?;
        }

        self.expect_keyword(Keyword::End)?;
        self.expect(TokenKind::Dot)?;
        Ok(())
    }

    // net := NET_NAME 'name' 'path' : attr_list ;
    //        (NODE_NAME refdes pinnumber 'x' : 'y' : ;)*
    fn parse_net(&mut self, board: &mut Board) -> Result<()> {
        self.expect_keyword(Keyword::NetName)?;

        let name = self.take_str()?;
        let wire = board.add_wire(name)?;

        // Net canonical path
        self.take_str()?;
        self.expect(TokenKind::Colon)?;
        self.parse_attr_list()?;
        self.expect(TokenKind::Semicolon)?;

        while self.at_keyword(Keyword::NodeName) {
            self.advance()?;

            let refdes = self.take_ident()?;
            let pinnumber = self.take_ident()?;
            let component = board.get_component(&refdes)?;
            let pin = board.get_pin(component, &pinnumber)?;
            board.connect(wire, pin)?;

            self.take_str()?;
            self.expect(TokenKind::Colon)?;
            self.take_str()?;
            self.expect(TokenKind::Colon)?;
            self.expect(TokenKind::Semicolon)?;
        }
        Ok(())
    }
}
