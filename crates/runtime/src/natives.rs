use super::scope::ScopeRef;
use mote_value::{Literal, LiteralDictionary, NativeFunction, TypeDescriptor, TypeShape};

/// Bind a single native function under its name in `scope`.
///
/// The binding is declared as a const function. Fails when the name is
/// already declared in that scope.
pub fn inject_native_fn(scope: &ScopeRef, native: NativeFunction) -> bool {
  let mut scope = scope.borrow_mut();

  let declared = TypeDescriptor::new(TypeShape::Function).constant();
  if !scope.declare(native.name, declared) {
    return false;
  }
  scope.set(native.name, Literal::NativeFunction(native), false)
}

/// Register a native library into `scope`.
///
/// Without an alias, every function is injected directly under its own name.
/// With an alias, the functions become entries of a fresh dictionary bound
/// under the alias, declared as a const dictionary of string to function;
/// registration fails when the alias is already declared in that scope.
pub fn register_library(scope: &ScopeRef, alias: Option<&str>, natives: &[NativeFunction]) -> bool {
  let Some(alias) = alias else {
    return natives
      .iter()
      .all(|native| inject_native_fn(scope, *native));
  };

  let mut dictionary = LiteralDictionary::new();
  for native in natives {
    dictionary.insert(Literal::string(native.name), Literal::NativeFunction(*native));
  }

  let declared = TypeDescriptor::new(TypeShape::Dictionary(
    Box::new(TypeDescriptor::new(TypeShape::String).constant()),
    Box::new(TypeDescriptor::new(TypeShape::Function).constant()),
  ))
  .constant();

  let mut scope = scope.borrow_mut();
  if !scope.declare(alias, declared) {
    return false;
  }
  scope.set(alias, Literal::Dictionary(Box::new(dictionary)), false)
}
