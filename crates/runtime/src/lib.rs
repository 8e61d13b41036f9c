//! # Runtime
//! Lexical scopes and the native-function registration interface.
//!
//! A [`Scope`] is one environment of the chain the interpreter runs in:
//! variable bindings, their declared types, and a shared handle on the
//! enclosing scope. Sibling scopes (blocks, captured environments) may share
//! an ancestor; the ancestor stays alive until the last chain holding it is
//! popped.

mod natives;
mod scope;


pub use natives::{inject_native_fn, register_library};
pub use scope::{Scope, ScopeRef};
