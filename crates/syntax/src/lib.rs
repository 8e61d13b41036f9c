//! # Syntax
//! Tokenise and parse source code into an abstract syntax tree.
//!
//! A pratt parser, based on [Crafting Interpreters](https://craftinginterpreters.com/compiling-expressions.html).
//!
//! The parser consumes any iterator of [`Token`]s (the bundled [`Tokeniser`]
//! is the default source) and yields one statement-level [`ast::Node`] per
//! call. Fully-literal arithmetic and comparisons are folded at parse time.
//! On a syntax error the parser reports it, skips to the next statement
//! boundary, and yields an error node, so a whole file can be checked in one
//! pass.

pub mod ast;
mod parser;
mod token;
mod tokeniser;


pub use ast::Node;
pub use parser::{ParseError, Parser};
pub use token::{Token, TokenKind};
pub use tokeniser::Tokeniser;

/// Parse a source string into statement nodes plus any errors found.
///
/// # Examples
/// ```
/// let parse = mote_syntax::parse("print 5 + 3;");
/// assert!(parse.is_valid());
/// assert_eq!(parse.statements.len(), 1);
/// ```
#[must_use]
pub fn parse(source: &str) -> Parse {
  let mut parser = Parser::new(Tokeniser::from(source));
  let statements = parser.by_ref().collect();

  Parse {
    statements,
    errors: parser.into_errors(),
  }
}

/// The result of parsing a whole source string
#[derive(Debug)]
pub struct Parse {
  /// The statement-level nodes, in source order
  pub statements: Vec<Node>,
  /// The errors reported whilst parsing
  pub errors: Vec<ParseError>,
}

impl Parse {
  /// Did the source parse without errors?
  #[must_use]
  pub fn is_valid(&self) -> bool {
    self.errors.is_empty()
  }
}
