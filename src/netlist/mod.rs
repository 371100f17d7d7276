//! Reader for the three-file proprietary netlist export.
//!
//! A board export consists of three cooperating text files sharing one token
//! vocabulary, distinguished by their `FILE_TYPE =` header:
//!
//! ```text
//! library file  (pstchip.dat):
//!   FILE_TYPE = LIBRARY_PARTS ;
//!   ( PRIMITIVE 'name' ;
//!       PIN ( 'pinname' : PIN_NUMBER = '(numbers)' ; attr* )* END_PIN ;
//!       BODY ( PART_NAME = 'name' ; JEDEC_TYPE = 'package' ; attr* )* END_BODY ;
//!     END_PRIMITIVE ; )*
//!   END .
//!
//! instance file (pstxprt.dat):
//!   FILE_TYPE = EXPANDEDPARTLIST ;
//!   DIRECTIVES PST_VERSION = 'PST_HDL_CENTRIC_VERSION_0' ;
//!              ROOT_DRAWING = 'board name' ;
//!              POST_TIME = '...' ; SOURCE_TOOL = '...' ;
//!   END_DIRECTIVES ;
//!   ( PART_NAME refdes 'type' : attrs ;
//!     ( SECTION_NUMBER n 'x' : attrs ; )* )*
//!   END .
//!
//! connectivity file (pstxnet.dat):
//!   FILE_TYPE = EXPANDEDNETLIST ;
//!   ( NET_NAME 'name' 'path' : attrs ;
//!     ( NODE_NAME refdes pinnumber 'x' : 'y' : ; )* )*
//!   END .
//! ```
//!
//! The instance file resolves part types defined by the library file, and
//! the connectivity file resolves refdes/pin pairs defined by the instance
//! file, so the three must be read in that order against the same board.
//! [`read_netlist`] does exactly that for a directory holding the canonical
//! file names. A failure in any file aborts the whole read; the error
//! propagates to the caller after a log message names the offending file.

mod lexer;
mod parser;

pub use lexer::{Keyword, Lexer, Token, TokenKind};
pub use parser::{Parser, PartDef, PartLibrary};

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{BoardnetError, Result};
use crate::model::Board;

/// Incremental reader holding the part library and the board under
/// construction across the three per-file parses.
#[derive(Default)]
pub struct NetlistReader {
    library: PartLibrary,
    board: Board,
}

impl NetlistReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one file's text. Dispatches on the `FILE_TYPE =` header.
    pub fn read_str(&mut self, input: &str) -> Result<()> {
        let mut parser = Parser::new(Lexer::new(input))?;
        parser.parse_file(&mut self.board, &mut self.library)
    }

    /// The part library accumulated so far.
    pub fn library(&self) -> &PartLibrary {
        &self.library
    }

    /// Finish reading and hand over the board.
    pub fn into_board(self) -> Board {
        self.board
    }
}

/// Read a netlist export directory (`pstchip.dat`, `pstxprt.dat`,
/// `pstxnet.dat`) and return the populated board.
pub fn read_netlist(dir: impl AsRef<Path>) -> Result<Board> {
    let dir = dir.as_ref();
    let mut reader = NetlistReader::new();

    for file in ["pstchip.dat", "pstxprt.dat", "pstxnet.dat"] {
        let path = dir.join(file);
        let text = std::fs::read_to_string(&path).map_err(|e| BoardnetError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        debug!(file = %path.display(), "reading netlist file");
        if let Err(err) = reader.read_str(&text) {
            warn!(file = %path.display(), error = %err, "netlist read failed");
            return Err(err);
        }
    }

    Ok(reader.into_board())
}
