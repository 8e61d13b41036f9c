use super::{CompileError, Compiler, OpCode, PoolEntry};
use mote_value::{Literal, LiteralKind};

fn compile_source(source: &str) -> Compiler {
  let parse = mote_syntax::parse(source);
  assert!(parse.is_valid(), "unexpected errors: {:?}", parse.errors);

  let mut compiler = Compiler::new();
  for statement in &parse.statements {
    compiler.write(statement).unwrap();
  }
  compiler
}

fn op(opcode: OpCode) -> u8 {
  opcode as u8
}

#[test]
fn literal_load_and_print() {
  let compiler = compile_source("print 5;");

  assert_eq!(compiler.constants(), [PoolEntry::Literal(Literal::Integer(5))]);
  assert_eq!(compiler.bytecode(), [op(OpCode::Literal), 0, op(OpCode::Print)]);
}

#[test]
fn pool_deduplicates_literals() {
  let compiler = compile_source("print 5; print 5; print 'five'; print 'five';");

  assert_eq!(compiler.constants(), [
    PoolEntry::Literal(Literal::Integer(5)),
    PoolEntry::Literal(Literal::string("five")),
  ]);
}

#[test]
fn distinct_literals_get_distinct_indices() {
  let compiler = compile_source("print 5; print 6; print 5.0;");

  assert_eq!(compiler.constants(), [
    PoolEntry::Literal(Literal::Integer(5)),
    PoolEntry::Literal(Literal::Integer(6)),
    PoolEntry::Literal(Literal::Float(5.0)),
  ]);
}

#[test]
fn binary_emits_children_post_order() {
  let compiler = compile_source("print x + y;");

  assert_eq!(compiler.bytecode(), [
    op(OpCode::Literal),
    0,
    op(OpCode::Literal),
    1,
    op(OpCode::Add),
    op(OpCode::Print),
  ]);
}

#[test]
fn grouping_is_bracketed() {
  let compiler = compile_source("(x);");

  assert_eq!(compiler.bytecode(), [
    op(OpCode::GroupingBegin),
    op(OpCode::Literal),
    0,
    op(OpCode::GroupingEnd),
  ]);
}

#[test]
fn blocks_are_bracketed_by_scope_markers() {
  let compiler = compile_source("{ print 1; print 2; }");

  assert_eq!(compiler.bytecode(), [
    op(OpCode::ScopeBegin),
    op(OpCode::Literal),
    0,
    op(OpCode::Print),
    op(OpCode::Literal),
    1,
    op(OpCode::Print),
    op(OpCode::ScopeEnd),
  ]);
}

#[test]
fn var_decl_emits_initializer_then_declaration() {
  // the scenario of the format contract: literal 5 and identifier "x" are
  // each pooled exactly once
  let compiler = compile_source("var x: integer = 2 + 3;");

  assert_eq!(compiler.constants(), [
    PoolEntry::Literal(Literal::Integer(5)),
    PoolEntry::Literal(Literal::identifier("x")),
    PoolEntry::Type {
      tag: LiteralKind::Integer,
      constant: false,
      subtypes: vec![],
    },
  ]);
  assert_eq!(compiler.bytecode(), [
    op(OpCode::Literal),
    0,
    op(OpCode::VarDecl),
    1,
    2,
  ]);
}

#[test]
fn compound_types_lower_subtypes_first() {
  let compiler = compile_source("var xs: [integer] = [];");

  assert_eq!(compiler.constants(), [
    PoolEntry::Array(vec![]),
    PoolEntry::Literal(Literal::identifier("xs")),
    PoolEntry::Type {
      tag: LiteralKind::Integer,
      constant: false,
      subtypes: vec![],
    },
    PoolEntry::Type {
      tag: LiteralKind::Array,
      constant: false,
      subtypes: vec![2],
    },
  ]);
  assert_eq!(compiler.bytecode(), [
    op(OpCode::Literal),
    0,
    op(OpCode::VarDecl),
    1,
    3,
  ]);
}

#[test]
fn type_statements_emit_a_declaration() {
  let compiler = compile_source("type [string, any] const;");

  assert_eq!(compiler.constants(), [
    PoolEntry::Type {
      tag: LiteralKind::String,
      constant: false,
      subtypes: vec![],
    },
    PoolEntry::Type {
      tag: LiteralKind::Any,
      constant: false,
      subtypes: vec![],
    },
    PoolEntry::Type {
      tag: LiteralKind::Dictionary,
      constant: true,
      subtypes: vec![0, 1],
    },
  ]);
  assert_eq!(compiler.bytecode(), [op(OpCode::TypeDecl), 2]);
}

#[test]
fn array_compounds_store_element_indices() {
  let compiler = compile_source("print [1, 2, 1];");

  // the repeated 1 shares its entry
  assert_eq!(compiler.constants(), [
    PoolEntry::Literal(Literal::Integer(1)),
    PoolEntry::Literal(Literal::Integer(2)),
    PoolEntry::Array(vec![0, 1, 0]),
  ]);
  assert_eq!(compiler.bytecode(), [
    op(OpCode::Literal),
    2,
    op(OpCode::Print),
  ]);
}

#[test]
fn dictionary_compounds_store_key_value_indices() {
  let compiler = compile_source("print [1: 'one', 2: 'two'];");

  assert_eq!(compiler.constants(), [
    PoolEntry::Literal(Literal::Integer(1)),
    PoolEntry::Literal(Literal::string("one")),
    PoolEntry::Literal(Literal::Integer(2)),
    PoolEntry::Literal(Literal::string("two")),
    PoolEntry::Dictionary(vec![0, 1, 2, 3]),
  ]);
}

#[test]
fn nested_compounds_push_children_first() {
  let compiler = compile_source("print [[1], [2, 1]];");

  assert_eq!(compiler.constants(), [
    PoolEntry::Literal(Literal::Integer(1)),
    PoolEntry::Array(vec![0]),
    PoolEntry::Literal(Literal::Integer(2)),
    PoolEntry::Array(vec![2, 0]),
    PoolEntry::Array(vec![1, 3]),
  ]);
  assert_eq!(compiler.bytecode(), [
    op(OpCode::Literal),
    4,
    op(OpCode::Print),
  ]);
}

#[test]
fn casts_load_the_type_then_the_value() {
  let compiler = compile_source("print integer y;");

  assert_eq!(compiler.constants(), [
    PoolEntry::Literal(Literal::Type(mote_value::TypeDescriptor::new(
      mote_value::TypeShape::Integer,
    ))),
    PoolEntry::Literal(Literal::identifier("y")),
  ]);
  assert_eq!(compiler.bytecode(), [
    op(OpCode::Literal),
    0,
    op(OpCode::Literal),
    1,
    op(OpCode::Cast),
    op(OpCode::Print),
  ]);
}

#[test]
fn if_else_patches_absolute_jump_targets() {
  let compiler = compile_source("if (c) print 1; else print 2;");

  assert_eq!(compiler.bytecode(), [
    op(OpCode::Literal),
    0, // c
    op(OpCode::JumpIfFalse),
    11, // absolute position of the else branch
    0,
    op(OpCode::Literal),
    1,
    op(OpCode::Print),
    op(OpCode::Jump),
    14, // absolute position of the end
    0,
    op(OpCode::Literal),
    2,
    op(OpCode::Print),
  ]);
}

#[test]
fn if_without_else_jumps_to_the_end() {
  let compiler = compile_source("if (c) print 1;");

  assert_eq!(compiler.bytecode(), [
    op(OpCode::Literal),
    0,
    op(OpCode::JumpIfFalse),
    8,
    0,
    op(OpCode::Literal),
    1,
    op(OpCode::Print),
  ]);
}

#[test]
fn assignment_and_assert_emit_operators() {
  let compiler = compile_source("x = 4;");
  assert_eq!(compiler.bytecode(), [
    op(OpCode::Literal),
    0,
    op(OpCode::Literal),
    1,
    op(OpCode::Assign),
  ]);

  let compiler = compile_source("assert true, 'oops';");
  assert_eq!(compiler.bytecode(), [
    op(OpCode::Literal),
    0,
    op(OpCode::Literal),
    1,
    op(OpCode::Assert),
  ]);
}

#[test]
fn long_indices_switch_opcode_form() {
  let mut source = String::new();
  for i in 0..300 {
    source.push_str(&format!("print {i};"));
  }
  let compiler = compile_source(&source);

  assert_eq!(compiler.constants().len(), 300);

  // the 256th constant onwards loads with the long form
  let bytecode = compiler.bytecode();
  let mut position = 0;
  let mut loads = 0;
  while position < bytecode.len() {
    let opcode = OpCode::from_byte(bytecode[position]).unwrap();
    if loads < 256 {
      assert_ne!(opcode, OpCode::LiteralLong);
    }
    if opcode == OpCode::Literal || opcode == OpCode::LiteralLong {
      loads += 1;
    }
    position += opcode.length();
  }

  let last_load = bytecode.len() - OpCode::LiteralLong.length() - 1;
  assert_eq!(bytecode[last_load], op(OpCode::LiteralLong));
  assert_eq!(
    u16::from_le_bytes([bytecode[last_load + 1], bytecode[last_load + 2]]),
    299
  );
}

#[test]
fn error_nodes_abort_compilation() {
  let mut compiler = Compiler::new();
  assert_eq!(
    compiler.write(&mote_syntax::Node::Error),
    Err(CompileError::InvalidAst)
  );
}

#[test]
fn bare_pairs_are_internal_errors() {
  let pair = mote_syntax::Node::Pair {
    key: Box::new(mote_syntax::Node::Literal(Literal::Integer(1))),
    value: Box::new(mote_syntax::Node::Literal(Literal::Integer(2))),
  };

  let mut compiler = Compiler::new();
  assert_eq!(compiler.write(&pair), Err(CompileError::UnexpectedPair));
}

#[test]
fn raw_compound_literals_cannot_serialize() {
  let node = mote_syntax::Node::Literal(Literal::Array(vec![Literal::Integer(1)].into()));

  let mut compiler = Compiler::new();
  compiler.write(&node).unwrap();
  assert_eq!(
    compiler.collate(),
    Err(CompileError::UnserializableConstant)
  );
}
