//! The binary module layout is a contract: these tests pin the exact bytes
//! and check that decoding reconstructs what was written, bit for bit.

use mote_compiler::{
  Compiler, DecodeError, Module, OpCode, PoolEntry, VERSION_BUILD, VERSION_MAJOR, VERSION_MINOR,
  VERSION_PATCH,
};
use mote_value::LiteralKind;

fn compile(source: &str) -> Compiler {
  let parse = mote_syntax::parse(source);
  assert!(parse.is_valid(), "unexpected errors: {:?}", parse.errors);

  let mut compiler = Compiler::new();
  for statement in &parse.statements {
    compiler.write(statement).unwrap();
  }
  compiler
}

#[test]
fn exact_layout_of_a_tiny_module() {
  let module = compile("print 5;").collate().unwrap();

  let mut expected = vec![VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH];
  expected.extend_from_slice(VERSION_BUILD.as_bytes());
  expected.push(0); // build string terminator
  expected.push(OpCode::SectionEnd as u8);

  expected.extend_from_slice(&1u16.to_le_bytes()); // one constant
  expected.push(LiteralKind::Integer as u8);
  expected.extend_from_slice(&5i32.to_le_bytes());
  expected.push(OpCode::SectionEnd as u8);

  expected.push(OpCode::Literal as u8);
  expected.push(0);
  expected.push(OpCode::Print as u8);
  expected.push(OpCode::SectionEnd as u8);

  expected.push(OpCode::Eof as u8);

  assert_eq!(module, expected);
}

#[test]
fn strings_and_identifiers_are_nul_terminated() {
  let module = compile("var greeting = 'hi';").collate().unwrap();

  let hi = [LiteralKind::String as u8, b'h', b'i', 0];
  assert!(module.windows(hi.len()).any(|window| window == hi));

  let greeting = {
    let mut bytes = vec![LiteralKind::Identifier as u8];
    bytes.extend_from_slice(b"greeting");
    bytes.push(0);
    bytes
  };
  assert!(module.windows(greeting.len()).any(|window| window == greeting));
}

#[test]
fn round_trip_reconstructs_the_pool_and_bytecode() {
  let compiler = compile(
    "var xs: [integer] = [1, 2, 1];\n\
     var d: [string, any] = ['one': 1];\n\
     if (flag) { print xs; } else print d;\n\
     type [string, any];\n\
     print integer y;\n\
     x = 4;\n\
     assert 1 == 1, 'fine';\n\
     print -x;\n\
     print (x + 1) * 2;",
  );
  let bytes = compiler.collate().unwrap();

  let module = Module::decode(&bytes).unwrap();
  assert_eq!(module.version, (VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH));
  assert_eq!(module.build, VERSION_BUILD);
  assert_eq!(module.constants, compiler.constants());
  assert_eq!(module.bytecode, compiler.bytecode());

  // and the same source always collates to the same bytes
  let again = compile(
    "var xs: [integer] = [1, 2, 1];\n\
     var d: [string, any] = ['one': 1];\n\
     if (flag) { print xs; } else print d;\n\
     type [string, any];\n\
     print integer y;\n\
     x = 4;\n\
     assert 1 == 1, 'fine';\n\
     print -x;\n\
     print (x + 1) * 2;",
  );
  assert_eq!(again.collate().unwrap(), bytes);
}

#[test]
fn round_trip_with_a_long_pool() {
  let mut source = String::new();
  for i in 0..300 {
    source.push_str(&format!("print {i};"));
  }

  let compiler = compile(&source);
  let bytes = compiler.collate().unwrap();
  let module = Module::decode(&bytes).unwrap();

  assert_eq!(module.constants.len(), 300);
  assert_eq!(module.constants, compiler.constants());
  assert_eq!(module.bytecode, compiler.bytecode());
}

#[test]
fn float_constants_round_trip_bit_exact() {
  let compiler = compile("print 0.1; print 1234.5678;");
  let bytes = compiler.collate().unwrap();
  let module = Module::decode(&bytes).unwrap();

  assert_eq!(module.constants, compiler.constants());
}

#[test]
fn compound_entries_resolve_backwards_only() {
  let compiler = compile("print [[1], [2, 1]];");
  let bytes = compiler.collate().unwrap();
  let module = Module::decode(&bytes).unwrap();

  for (position, entry) in module.constants.iter().enumerate() {
    let indices = match entry {
      PoolEntry::Array(indices) | PoolEntry::Dictionary(indices) => indices.as_slice(),
      PoolEntry::Type { subtypes, .. } => subtypes.as_slice(),
      PoolEntry::Literal(_) => &[],
    };
    for index in indices {
      assert!(usize::from(*index) < position);
    }
  }
}

#[test]
fn version_mismatch_is_rejected_before_anything_else() {
  let mut bytes = compile("print 5;").collate().unwrap();
  bytes[0] = VERSION_MAJOR.wrapping_add(1);

  assert_eq!(
    Module::decode(&bytes),
    Err(DecodeError::UnsupportedVersion {
      found: (VERSION_MAJOR.wrapping_add(1), VERSION_MINOR, VERSION_PATCH)
    })
  );
}

#[test]
fn truncated_modules_are_rejected() {
  let bytes = compile("print 5;").collate().unwrap();

  for length in 0..bytes.len() - 1 {
    assert!(
      Module::decode(&bytes[..length]).is_err(),
      "accepted a module truncated to {length} bytes"
    );
  }
}

#[test]
fn corrupt_tags_are_rejected() {
  let compiler = compile("print 5;");
  let mut bytes = compiler.collate().unwrap();

  // the constant's tag byte sits just after the count
  let tag_position = 3 + VERSION_BUILD.len() + 1 + 1 + 2;
  bytes[tag_position] = 200;

  assert_eq!(Module::decode(&bytes), Err(DecodeError::UnknownTag(200)));
}

#[test]
fn empty_modules_serialize_and_decode() {
  let compiler = Compiler::new();
  let bytes = compiler.collate().unwrap();
  let module = Module::decode(&bytes).unwrap();

  assert_eq!(module.constants, []);
  assert_eq!(module.bytecode, []);
}

#[test]
fn display_lists_constants_and_code() {
  let bytes = compile("print 5;").collate().unwrap();
  let module = Module::decode(&bytes).unwrap();

  let listing = module.to_string();
  assert!(listing.contains("Integer(5)"));
  assert!(listing.contains("Print"));
}
