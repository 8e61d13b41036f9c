/// An instruction of the bytecode, one byte on the wire.
///
/// The discriminant values are the serialized encoding; new opcodes go at
/// the end.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpCode {
  /// Terminates the whole module
  Eof,
  /// Terminates a section of the serialized module
  SectionEnd,

  /// Load a constant, 1-byte pool index operand
  Literal,
  /// Load a constant, 2-byte pool index operand
  LiteralLong,

  // Unary operations
  /// Negate the top of the stack
  Negate,
  /// Invert the boolean top of the stack
  Not,
  /// Print the top of the stack
  Print,
  /// Check a condition against a message
  Assert,

  // Arithmetic
  /// Add the top two values
  Add,
  /// Subtract the top two values
  Subtract,
  /// Multiply the top two values
  Multiply,
  /// Divide the top two values
  Divide,
  /// Remainder of the top two values
  Remainder,

  // Comparisons
  /// Equality of the top two values
  Equal,
  /// Inequality of the top two values
  NotEqual,
  /// Less-than of the top two values
  Less,
  /// Less-or-equal of the top two values
  LessEqual,
  /// Greater-than of the top two values
  Greater,
  /// Greater-or-equal of the top two values
  GreaterEqual,

  /// Assign the top of the stack to a variable
  Assign,
  /// Cast a value to a type
  Cast,

  // Structural markers
  /// Start of a parenthesised expression
  GroupingBegin,
  /// End of a parenthesised expression
  GroupingEnd,
  /// Start of a lexical scope
  ScopeBegin,
  /// End of a lexical scope
  ScopeEnd,

  // Declarations
  /// Declare a type, 1-byte pool index operand
  TypeDecl,
  /// Declare a type, 2-byte pool index operand
  TypeDeclLong,
  /// Declare a variable, 1-byte identifier and type pool index operands
  VarDecl,
  /// Declare a variable, 2-byte identifier and type pool index operands
  VarDeclLong,

  // Jumps, 2-byte absolute byte-position operands
  /// Jump when the top of the stack is falsy
  JumpIfFalse,
  /// Jump unconditionally
  Jump,
}

/// Every opcode in discriminant order, for byte round-trips
const OPCODES: [OpCode; 31] = [
  OpCode::Eof,
  OpCode::SectionEnd,
  OpCode::Literal,
  OpCode::LiteralLong,
  OpCode::Negate,
  OpCode::Not,
  OpCode::Print,
  OpCode::Assert,
  OpCode::Add,
  OpCode::Subtract,
  OpCode::Multiply,
  OpCode::Divide,
  OpCode::Remainder,
  OpCode::Equal,
  OpCode::NotEqual,
  OpCode::Less,
  OpCode::LessEqual,
  OpCode::Greater,
  OpCode::GreaterEqual,
  OpCode::Assign,
  OpCode::Cast,
  OpCode::GroupingBegin,
  OpCode::GroupingEnd,
  OpCode::ScopeBegin,
  OpCode::ScopeEnd,
  OpCode::TypeDecl,
  OpCode::TypeDeclLong,
  OpCode::VarDecl,
  OpCode::VarDeclLong,
  OpCode::JumpIfFalse,
  OpCode::Jump,
];

impl OpCode {
  /// The length of this instruction including operands, in bytes
  #[must_use]
  pub fn length(self) -> usize {
    match self {
      Self::VarDeclLong => 5,
      Self::VarDecl | Self::LiteralLong | Self::TypeDeclLong | Self::JumpIfFalse | Self::Jump => 3,
      Self::Literal | Self::TypeDecl => 2,
      _ => 1,
    }
  }

  /// Recover an opcode from its serialized byte
  #[must_use]
  pub fn from_byte(byte: u8) -> Option<Self> {
    OPCODES.get(usize::from(byte)).copied()
  }
}
