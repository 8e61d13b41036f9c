use mote_value::{Literal, LiteralDictionary, TypeDescriptor};
use std::{cell::RefCell, rc::Rc};

/// A shared handle on a scope.
///
/// The handle's reference count is the scope's liveness: pushing a child
/// clones the ancestor handle, so a scope survives for as long as any chain
/// built on it, and is destroyed with its dictionaries when the last handle
/// drops.
pub type ScopeRef = Rc<RefCell<Scope>>;

/// One lexical environment: variable bindings, their declared types, and a
/// link to the enclosing scope
#[derive(Debug, Default)]
pub struct Scope {
  variables: LiteralDictionary,
  types: LiteralDictionary,
  ancestor: Option<ScopeRef>,
}

impl Scope {
  /// Create a new scope chained to `ancestor`, and return a handle on it.
  ///
  /// The new scope holds one unit of liveness for the whole chain being
  /// extended.
  #[must_use]
  pub fn push(ancestor: Option<ScopeRef>) -> ScopeRef {
    Rc::new(RefCell::new(Self {
      variables: LiteralDictionary::new(),
      types: LiteralDictionary::new(),
      ancestor,
    }))
  }

  /// Release `scope`, returning the new current scope (its ancestor).
  ///
  /// Dropping the handle destroys the scope unless something else still
  /// holds it; an ancestor shared with a sibling chain survives until that
  /// chain is popped too.
  #[must_use]
  pub fn pop(scope: ScopeRef) -> Option<ScopeRef> {
    let ancestor = scope.borrow().ancestor.clone();
    drop(scope);
    ancestor
  }

  /// Declare `name` in this scope with the given type, initialised to null.
  ///
  /// Fails when `name` already exists in *this* scope; shadowing an
  /// ancestor's binding is allowed.
  pub fn declare(&mut self, name: &str, declared_type: TypeDescriptor) -> bool {
    let key = Literal::identifier(name);
    if self.variables.contains_key(&key) {
      return false;
    }

    // the type is consulted on every later assignment
    self.types.insert(key.clone(), Literal::Type(declared_type));
    self.variables.insert(key, Literal::Null);
    true
  }

  /// Is `name` declared in this scope or any ancestor?
  #[must_use]
  pub fn is_declared(&self, name: &str) -> bool {
    let key = Literal::identifier(name);
    self.is_declared_key(&key)
  }

  fn is_declared_key(&self, key: &Literal) -> bool {
    if self.variables.contains_key(key) {
      return true;
    }
    match &self.ancestor {
      Some(ancestor) => ancestor.borrow().is_declared_key(key),
      None => false,
    }
  }

  /// The current value of `name`, searching up the ancestor chain
  #[must_use]
  pub fn get(&self, name: &str) -> Option<Literal> {
    let key = Literal::identifier(name);
    self.get_key(&key)
  }

  fn get_key(&self, key: &Literal) -> Option<Literal> {
    if let Some(value) = self.variables.get(key) {
      return Some(value.clone());
    }
    self
      .ancestor
      .as_ref()
      .and_then(|ancestor| ancestor.borrow().get_key(key))
  }

  /// Assign `value` to `name` in its declaring scope.
  ///
  /// Fails when `name` is not declared anywhere up the chain, when the value
  /// does not satisfy the declared type, or when `const_check` is requested
  /// and the declared type is const.
  pub fn set(&mut self, name: &str, value: Literal, const_check: bool) -> bool {
    let key = Literal::identifier(name);
    self.set_key(&key, value, const_check)
  }

  fn set_key(&mut self, key: &Literal, value: Literal, const_check: bool) -> bool {
    if !self.variables.contains_key(key) {
      return match &self.ancestor {
        Some(ancestor) => ancestor.borrow_mut().set_key(key, value, const_check),
        None => false,
      };
    }

    let Some(Literal::Type(declared)) = self.types.get(key).cloned() else {
      return false;
    };
    if !declared.admits(&value) {
      return false;
    }
    if const_check && declared.constant {
      return false;
    }

    self.variables.insert(key.clone(), value);
    true
  }
}
