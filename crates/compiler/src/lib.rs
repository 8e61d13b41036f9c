//! # Compiler
//! Lower syntax trees into a serialized bytecode module.
//!
//! A [`Compiler`] accumulates statements ([`Compiler::write`]) into a byte
//! buffer and a deduplicating constant pool, then
//! [`Compiler::collate`] serializes the version header, the pool, and the
//! bytecode into one binary blob. [`Module::decode`] reads such a blob back,
//! checking the version header first.

mod compiler;
mod module;
mod opcodes;
mod pool;

#[cfg(test)]
mod test;

pub use compiler::{CompileError, Compiler};
pub use module::{
  DecodeError, Module, VERSION_BUILD, VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH,
};
pub use opcodes::OpCode;
pub use pool::PoolEntry;

use mote_syntax::Node;

/// Compile a sequence of statement nodes into a serialized module.
///
/// # Examples
/// ```
/// let parse = mote_syntax::parse("print 5 + 3;");
/// assert!(parse.is_valid());
///
/// let module = mote_compiler::compile(&parse.statements).unwrap();
/// assert!(!module.is_empty());
/// ```
///
/// # Errors
/// If a node violates the parser/compiler contract, or the module's limits
/// are exceeded.
pub fn compile<'a>(statements: impl IntoIterator<Item = &'a Node>) -> Result<Vec<u8>, CompileError> {
  let mut compiler = Compiler::new();
  for statement in statements {
    compiler.write(statement)?;
  }
  compiler.collate()
}
