use super::{
  opcodes::OpCode,
  pool::{ConstantPool, PoolEntry},
};
use mote_syntax::{
  Node,
  ast::{BinaryOperator, CompoundKind, UnaryOperator},
};
use mote_value::{Literal, TypeDescriptor, TypeShape};
use std::{error, fmt};

/// Lowers statement nodes into bytecode plus a constant pool.
///
/// One compiler accumulates every statement of a compilation unit; children
/// are emitted before their parent's opcode, so the interpreter's stack
/// discipline follows directly from the byte order.
#[derive(Debug, Default)]
pub struct Compiler {
  pool: ConstantPool,
  bytecode: Vec<u8>,
}

impl Compiler {
  /// A compiler with an empty pool and bytecode buffer
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// The constant pool accumulated so far
  #[must_use]
  pub fn constants(&self) -> &[PoolEntry] {
    self.pool.entries()
  }

  /// The bytecode accumulated so far
  #[must_use]
  pub fn bytecode(&self) -> &[u8] {
    &self.bytecode
  }

  /// Append one statement's bytecode, recording its literals in the pool.
  ///
  /// # Errors
  /// On an internal contract violation (an error or pair node reaching
  /// emission) or when the module's limits are exceeded; the compiler must
  /// not be collated afterwards.
  pub fn write(&mut self, node: &Node) -> Result<(), CompileError> {
    match node {
      Node::Error => Err(CompileError::InvalidAst),
      Node::Pair { .. } => Err(CompileError::UnexpectedPair),

      Node::Literal(literal) => {
        let index = self.pool.intern_literal(literal)?;
        self.emit_indexed(OpCode::Literal, OpCode::LiteralLong, index);
        Ok(())
      }

      Node::Unary { operator, child } => {
        self.write(child)?;
        self.emit(unary_opcode(*operator));
        Ok(())
      }

      Node::Binary {
        left,
        operator,
        right,
      } => {
        self.write(left)?;
        self.write(right)?;
        self.emit(binary_opcode(*operator));
        Ok(())
      }

      Node::Grouping(child) => {
        self.emit(OpCode::GroupingBegin);
        self.write(child)?;
        self.emit(OpCode::GroupingEnd);
        Ok(())
      }

      Node::Block(statements) => {
        self.emit(OpCode::ScopeBegin);
        for statement in statements {
          self.write(statement)?;
        }
        self.emit(OpCode::ScopeEnd);
        Ok(())
      }

      Node::Compound { kind, elements } => {
        let index = self.write_compound(*kind, elements)?;
        self.emit_indexed(OpCode::Literal, OpCode::LiteralLong, index);
        Ok(())
      }

      Node::VarTypes { declared_type } => {
        let index = self.write_type(declared_type)?;
        self.emit_indexed(OpCode::TypeDecl, OpCode::TypeDeclLong, index);
        Ok(())
      }

      Node::VarDecl {
        name,
        declared_type,
        initializer,
      } => {
        // the initial value is left on the stack for the declaration
        self.write(initializer)?;

        let identifier = self.pool.intern_literal(&Literal::Identifier(name.clone()))?;
        let type_index = self.write_type(declared_type)?;

        if identifier >= 256 || type_index >= 256 {
          self.emit(OpCode::VarDeclLong);
          self.emit_short(identifier);
          self.emit_short(type_index);
        } else {
          self.emit(OpCode::VarDecl);
          self.emit_truncated(identifier);
          self.emit_truncated(type_index);
        }
        Ok(())
      }

      Node::If {
        condition,
        then,
        otherwise,
      } => {
        self.write(condition)?;

        self.emit(OpCode::JumpIfFalse);
        let jump_to_else = self.reserve_jump();
        self.write(then)?;

        if let Some(otherwise) = otherwise {
          self.emit(OpCode::Jump);
          let jump_to_end = self.reserve_jump();

          self.patch_jump(jump_to_else)?;
          self.write(otherwise)?;
          self.patch_jump(jump_to_end)?;
        } else {
          self.patch_jump(jump_to_else)?;
        }
        Ok(())
      }
    }
  }

  /// Lower a compound literal into the pool, returning the index of its
  /// entry.
  ///
  /// Every element is cached (or recursively lowered) before its index is
  /// recorded, so children always precede the parent entry in the pool.
  fn write_compound(&mut self, kind: CompoundKind, elements: &[Node]) -> Result<u16, CompileError> {
    let mut indices = Vec::with_capacity(elements.len());

    match kind {
      CompoundKind::Array => {
        for element in elements {
          indices.push(self.element_index(element)?);
        }
        self.pool.push(PoolEntry::Array(indices))
      }
      CompoundKind::Dictionary => {
        for element in elements {
          let Node::Pair { key, value } = element else {
            return Err(CompileError::InvalidCompoundElement);
          };
          indices.push(self.element_index(key)?);
          indices.push(self.element_index(value)?);
        }
        self.pool.push(PoolEntry::Dictionary(indices))
      }
    }
  }

  /// The pool index of one compound element
  fn element_index(&mut self, element: &Node) -> Result<u16, CompileError> {
    match element {
      Node::Literal(literal) => self.pool.intern_literal(literal),
      Node::Compound { kind, elements } => self.write_compound(*kind, elements),
      _ => Err(CompileError::InvalidCompoundElement),
    }
  }

  /// Lower a type descriptor into the pool, returning the index of its
  /// entry; subtypes are lowered first, mirroring the compound lowering
  fn write_type(&mut self, descriptor: &TypeDescriptor) -> Result<u16, CompileError> {
    let mut subtypes = Vec::new();

    match &descriptor.shape {
      TypeShape::Array(element) => subtypes.push(self.write_type(element)?),
      TypeShape::Dictionary(key, value) => {
        subtypes.push(self.write_type(key)?);
        subtypes.push(self.write_type(value)?);
      }
      _ => {}
    }

    self.pool.push(PoolEntry::Type {
      tag: descriptor.shape.tag(),
      constant: descriptor.constant,
      subtypes,
    })
  }

  fn emit(&mut self, opcode: OpCode) {
    self.bytecode.push(opcode as u8);
  }

  fn emit_short(&mut self, value: u16) {
    self.bytecode.extend_from_slice(&value.to_le_bytes());
  }

  /// Emit the 1-byte form when the index fits, otherwise the 2-byte form
  fn emit_indexed(&mut self, short: OpCode, long: OpCode, index: u16) {
    if index >= 256 {
      self.emit(long);
      self.emit_short(index);
    } else {
      self.emit(short);
      self.emit_truncated(index);
    }
  }

  fn emit_truncated(&mut self, index: u16) {
    #[expect(clippy::cast_possible_truncation, reason = "caller checked < 256")]
    self.bytecode.push(index as u8);
  }

  /// Emit a blank 2-byte jump operand, returning its position for patching
  fn reserve_jump(&mut self) -> usize {
    let position = self.bytecode.len();
    self.emit_short(u16::MAX);
    position
  }

  /// Overwrite a reserved jump operand with the current position
  fn patch_jump(&mut self, position: usize) -> Result<(), CompileError> {
    let Ok(target) = u16::try_from(self.bytecode.len()) else {
      return Err(CompileError::TooBigJump);
    };

    self.bytecode[position..position + 2].copy_from_slice(&target.to_le_bytes());
    Ok(())
  }
}

fn unary_opcode(operator: UnaryOperator) -> OpCode {
  match operator {
    UnaryOperator::Negate => OpCode::Negate,
    UnaryOperator::Not => OpCode::Not,
    UnaryOperator::Print => OpCode::Print,
  }
}

fn binary_opcode(operator: BinaryOperator) -> OpCode {
  match operator {
    BinaryOperator::Add => OpCode::Add,
    BinaryOperator::Subtract => OpCode::Subtract,
    BinaryOperator::Multiply => OpCode::Multiply,
    BinaryOperator::Divide => OpCode::Divide,
    BinaryOperator::Remainder => OpCode::Remainder,
    BinaryOperator::Equal => OpCode::Equal,
    BinaryOperator::NotEqual => OpCode::NotEqual,
    BinaryOperator::Less => OpCode::Less,
    BinaryOperator::LessEqual => OpCode::LessEqual,
    BinaryOperator::Greater => OpCode::Greater,
    BinaryOperator::GreaterEqual => OpCode::GreaterEqual,
    BinaryOperator::Assign => OpCode::Assign,
    BinaryOperator::Assert => OpCode::Assert,
    BinaryOperator::Cast => OpCode::Cast,
  }
}

/// An error from lowering an AST into a module.
///
/// These are internal contract violations or module limits, never a fault in
/// the user's program; a parse that reported no errors cannot produce the
/// first two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileError {
  /// An error node reached emission
  InvalidAst,
  /// A pair node reached emission outside a dictionary compound
  UnexpectedPair,
  /// A compound element was neither a literal nor a compound
  InvalidCompoundElement,
  /// The constant pool exceeded its two-byte index space
  TooManyConstants,
  /// A jump target exceeded its two-byte operand
  TooBigJump,
  /// A literal with no serialized form reached the pool
  UnserializableConstant,
}

impl CompileError {
  /// The title of the error message
  #[must_use]
  pub fn title(&self) -> &'static str {
    match self {
      Self::InvalidAst => "Invalid AST",
      Self::UnexpectedPair => "Unexpected Pair",
      Self::InvalidCompoundElement => "Invalid Compound Element",
      Self::TooManyConstants => "Too Many Constants",
      Self::TooBigJump => "Too Big Jump",
      Self::UnserializableConstant => "Unserializable Constant",
    }
  }

  /// The body of the error message describing what went wrong
  #[must_use]
  pub fn message(&self) -> &'static str {
    match self {
      Self::InvalidAst => "the tree contains an error node, see the errors from parsing",
      Self::UnexpectedPair => "a dictionary pair appeared outside a dictionary",
      Self::InvalidCompoundElement => "a compound element cannot be lowered to the pool",
      Self::TooManyConstants => "the maximum no. of constants has been reached (65535)",
      Self::TooBigJump => "the maximum jump target has been reached (65535)",
      Self::UnserializableConstant => "a constant has no serialized form",
    }
  }
}

impl fmt::Display for CompileError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.message())
  }
}
impl error::Error for CompileError {}
