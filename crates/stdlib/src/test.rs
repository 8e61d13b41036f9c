use super::{clock, hook_standard, hook_string, to_lower, to_upper};
use mote_runtime::Scope;
use mote_value::{Literal, LiteralArray, TypeDescriptor};

fn arguments(values: Vec<Literal>) -> LiteralArray {
  values.into()
}

#[test]
fn clock_returns_a_time_string() {
  let Literal::String(value) = clock(&LiteralArray::new()).unwrap() else {
    panic!("clock did not return a string");
  };
  assert!(!value.is_empty());

  // asctime-style: weekday, month, day, time, year
  assert_eq!(value.split_whitespace().count(), 5);
}

#[test]
fn clock_rejects_arguments() {
  assert!(clock(&arguments(vec![Literal::Integer(1)])).is_err());
}

#[test]
fn case_conversion() {
  assert_eq!(
    to_lower(&arguments(vec![Literal::string("Hello World")])).unwrap(),
    Literal::string("hello world")
  );
  assert_eq!(
    to_upper(&arguments(vec![Literal::string("Hello World")])).unwrap(),
    Literal::string("HELLO WORLD")
  );
}

#[test]
fn case_conversion_requires_one_string() {
  assert!(to_lower(&LiteralArray::new()).is_err());
  assert!(to_lower(&arguments(vec![Literal::Integer(5)])).is_err());
  assert!(to_upper(&arguments(vec![Literal::string("a"), Literal::string("b")])).is_err());
}

#[test]
fn hooks_register_into_a_scope() {
  let scope = Scope::push(None);

  assert!(hook_standard(&scope, None));
  assert!(scope.borrow().is_declared("clock"));

  assert!(hook_string(&scope, Some("str")));
  let Some(Literal::Dictionary(library)) = scope.borrow().get("str") else {
    panic!("alias was not bound to a dictionary");
  };
  assert!(library.contains_key(&Literal::string("toLower")));
  assert!(library.contains_key(&Literal::string("toUpper")));
}

#[test]
fn alias_conflicts_are_reported() {
  let scope = Scope::push(None);
  scope.borrow_mut().declare("str", TypeDescriptor::any());

  assert!(!hook_string(&scope, Some("str")));
}
