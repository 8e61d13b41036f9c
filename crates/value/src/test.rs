use super::*;

#[test]
fn identifiers_are_not_strings() {
  assert_ne!(Literal::string("clock"), Literal::identifier("clock"));
  assert_eq!(Literal::string("clock"), Literal::string("clock"));
  assert_eq!(Literal::identifier("clock"), Literal::identifier("clock"));
}

#[test]
fn floats_compare_by_bits() {
  assert_eq!(Literal::Float(1.5), Literal::Float(1.5));
  assert_ne!(Literal::Float(0.0), Literal::Float(-0.0));
  assert_ne!(Literal::Float(1.5), Literal::Integer(1));
}

#[test]
fn array_lookup_is_structural() {
  let mut array = LiteralArray::new();
  let first = array.push(Literal::Integer(5));
  let second = array.push(Literal::string("five"));

  assert_eq!(array.position(&Literal::Integer(5)), Some(first));
  assert_eq!(array.position(&Literal::string("five")), Some(second));
  assert_eq!(array.position(&Literal::Integer(6)), None);
}

#[test]
fn array_find_or_push_deduplicates() {
  let mut array = LiteralArray::new();
  let first = array.find_or_push(Literal::Integer(5));
  let again = array.find_or_push(Literal::Integer(5));
  let other = array.find_or_push(Literal::Integer(6));

  assert_eq!(first, again);
  assert_ne!(first, other);
  assert_eq!(array.len(), 2);
}

#[test]
fn dictionary_insert_get_remove() {
  let mut dictionary = LiteralDictionary::new();
  assert!(dictionary.is_empty());

  dictionary.insert(Literal::string("a"), Literal::Integer(1));
  dictionary.insert(Literal::string("b"), Literal::Integer(2));
  assert_eq!(dictionary.len(), 2);
  assert_eq!(
    dictionary.get(&Literal::string("a")),
    Some(&Literal::Integer(1))
  );

  let previous = dictionary.insert(Literal::string("a"), Literal::Integer(3));
  assert_eq!(previous, Some(Literal::Integer(1)));
  assert_eq!(dictionary.len(), 2);

  assert_eq!(
    dictionary.remove(&Literal::string("a")),
    Some(Literal::Integer(3))
  );
  assert_eq!(dictionary.get(&Literal::string("a")), None);
  assert_eq!(dictionary.len(), 1);
}

#[test]
fn dictionary_probes_through_tombstones() {
  let mut dictionary = LiteralDictionary::new();
  for i in 0..6 {
    dictionary.insert(Literal::Integer(i), Literal::Integer(i * 10));
  }

  // punch holes in the probe sequences, then check every survivor
  dictionary.remove(&Literal::Integer(1));
  dictionary.remove(&Literal::Integer(3));

  for i in [0, 2, 4, 5] {
    assert_eq!(
      dictionary.get(&Literal::Integer(i)),
      Some(&Literal::Integer(i * 10)),
      "lost key {i} after removals"
    );
  }

  // reinsert into the tombstoned slots
  dictionary.insert(Literal::Integer(1), Literal::Integer(100));
  assert_eq!(
    dictionary.get(&Literal::Integer(1)),
    Some(&Literal::Integer(100))
  );
}

#[test]
fn dictionary_grows_past_the_load_factor() {
  let mut dictionary = LiteralDictionary::new();
  for i in 0..100 {
    dictionary.insert(Literal::Integer(i), Literal::Integer(-i));
  }

  assert_eq!(dictionary.len(), 100);
  assert!(dictionary.capacity() >= 128);
  for i in 0..100 {
    assert_eq!(
      dictionary.get(&Literal::Integer(i)),
      Some(&Literal::Integer(-i))
    );
  }
}

#[test]
fn dictionary_equality_ignores_slot_order() {
  let forward: LiteralDictionary = (0..10)
    .map(|i| (Literal::Integer(i), Literal::Integer(i * i)))
    .collect();
  let backward: LiteralDictionary = (0..10)
    .rev()
    .map(|i| (Literal::Integer(i), Literal::Integer(i * i)))
    .collect();

  assert_eq!(forward, backward);
}

#[test]
fn any_admits_everything() {
  let any = TypeDescriptor::any();
  assert!(any.admits(&Literal::Null));
  assert!(any.admits(&Literal::Boolean(true)));
  assert!(any.admits(&Literal::string("x")));
  assert!(any.admits(&Literal::Array(vec![Literal::Integer(1)].into())));
}

#[test]
fn primitives_require_an_exact_tag() {
  let integer = TypeDescriptor::new(TypeShape::Integer);
  assert!(integer.admits(&Literal::Integer(5)));
  assert!(!integer.admits(&Literal::Float(5.0)));
  assert!(!integer.admits(&Literal::Null));

  let string = TypeDescriptor::new(TypeShape::String);
  assert!(string.admits(&Literal::string("x")));
  assert!(!string.admits(&Literal::identifier("x")));
}

#[test]
fn array_types_check_every_element() {
  let integers = TypeDescriptor::new(TypeShape::Array(Box::new(TypeDescriptor::new(
    TypeShape::Integer,
  ))));

  assert!(integers.admits(&Literal::Array(LiteralArray::new())));
  assert!(integers.admits(&Literal::Array(
    vec![Literal::Integer(1), Literal::Integer(2)].into()
  )));
  assert!(!integers.admits(&Literal::Array(
    vec![Literal::Integer(1), Literal::string("two")].into()
  )));
  assert!(!integers.admits(&Literal::Integer(1)));
}

#[test]
fn dictionary_types_check_live_entries() {
  let string_to_integer = TypeDescriptor::new(TypeShape::Dictionary(
    Box::new(TypeDescriptor::new(TypeShape::String)),
    Box::new(TypeDescriptor::new(TypeShape::Integer)),
  ));

  let mut dictionary = LiteralDictionary::new();
  dictionary.insert(Literal::string("a"), Literal::Integer(1));
  dictionary.insert(Literal::string("bad"), Literal::string("value"));

  let value = Literal::Dictionary(Box::new(dictionary.clone()));
  assert!(!string_to_integer.admits(&value));

  // removing the offending entry leaves a tombstone, which the check skips
  dictionary.remove(&Literal::string("bad"));
  let value = Literal::Dictionary(Box::new(dictionary));
  assert!(string_to_integer.admits(&value));
}

#[test]
fn display_forms() {
  assert_eq!(Literal::Null.to_string(), "null");
  assert_eq!(Literal::Integer(-3).to_string(), "-3");
  assert_eq!(
    Literal::Array(vec![Literal::Integer(1), Literal::Integer(2)].into()).to_string(),
    "[1, 2]"
  );
  assert_eq!(
    Literal::Dictionary(Box::new(LiteralDictionary::new())).to_string(),
    "[:]"
  );

  let descriptor = TypeDescriptor::new(TypeShape::Dictionary(
    Box::new(TypeDescriptor::new(TypeShape::String)),
    Box::new(TypeDescriptor::new(TypeShape::Integer)),
  ))
  .constant();
  assert_eq!(descriptor.to_string(), "[string, integer] const");
}
