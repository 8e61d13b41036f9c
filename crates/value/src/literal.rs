use super::{LiteralArray, LiteralDictionary, TypeDescriptor};
use rustc_hash::FxHasher;
use smartstring::alias::String as SmartString;
use std::{
  fmt,
  hash::{Hash, Hasher},
  mem, ptr,
  rc::Rc,
};

/// A value the language can hold at runtime or reference at compile time.
///
/// Strings are immutable and reference counted; their length comes from the
/// handle, never from a terminator. Identifiers are a distinct form from
/// strings, as the compiler serializes them under a different tag. Compound
/// literals own their backing storage, so cloning one is a deep copy.
#[derive(Debug, Clone, Default)]
pub enum Literal {
  /// The absent value
  #[default]
  Null,
  /// `true` or `false`
  Boolean(bool),
  /// A 32-bit signed integer
  Integer(i32),
  /// A 32-bit float
  Float(f32),
  /// An immutable shared string
  String(Rc<str>),
  /// A name, as distinct from a string value
  Identifier(SmartString),
  /// An ordered sequence of values
  Array(LiteralArray),
  /// A mapping of values to values
  Dictionary(Box<LiteralDictionary>),
  /// A callable provided by the host
  NativeFunction(NativeFunction),
  /// A type descriptor used by casts and declarations
  Type(TypeDescriptor),
}

impl Literal {
  /// Create a string literal from borrowed text
  #[must_use]
  pub fn string(value: &str) -> Self {
    Self::String(Rc::from(value))
  }

  /// Create an identifier literal from borrowed text
  #[must_use]
  pub fn identifier(name: &str) -> Self {
    Self::Identifier(name.into())
  }

  /// The serialization tag for this value's form
  #[must_use]
  pub fn kind(&self) -> LiteralKind {
    match self {
      Self::Null => LiteralKind::Null,
      Self::Boolean(_) => LiteralKind::Boolean,
      Self::Integer(_) => LiteralKind::Integer,
      Self::Float(_) => LiteralKind::Float,
      Self::String(_) => LiteralKind::String,
      Self::Identifier(_) => LiteralKind::Identifier,
      Self::Array(_) => LiteralKind::Array,
      Self::Dictionary(_) => LiteralKind::Dictionary,
      Self::NativeFunction(_) => LiteralKind::Function,
      Self::Type(_) => LiteralKind::Type,
    }
  }
}

impl PartialEq for Literal {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Null, Self::Null) => true,
      (Self::Boolean(a), Self::Boolean(b)) => a == b,
      (Self::Integer(a), Self::Integer(b)) => a == b,
      // bitwise, so equality stays coherent with the bit-exact module format
      (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
      (Self::String(a), Self::String(b)) => a == b,
      (Self::Identifier(a), Self::Identifier(b)) => a == b,
      (Self::Array(a), Self::Array(b)) => a == b,
      (Self::Dictionary(a), Self::Dictionary(b)) => a == b,
      (Self::NativeFunction(a), Self::NativeFunction(b)) => a == b,
      (Self::Type(a), Self::Type(b)) => a == b,
      _ => false,
    }
  }
}
impl Eq for Literal {}

impl Hash for Literal {
  fn hash<H: Hasher>(&self, state: &mut H) {
    mem::discriminant(self).hash(state);

    match self {
      Self::Null => {}
      Self::Boolean(value) => value.hash(state),
      Self::Integer(value) => value.hash(state),
      Self::Float(value) => value.to_bits().hash(state),
      Self::String(value) => value.hash(state),
      Self::Identifier(value) => value.hash(state),
      Self::Array(items) => items.hash(state),
      Self::Dictionary(dictionary) => {
        // entries hash order-independently, as two dictionaries with the
        // same pairs are equal regardless of slot layout
        let mut combined: u64 = 0;
        for (key, value) in dictionary.entries() {
          let mut entry_hasher = FxHasher::default();
          key.hash(&mut entry_hasher);
          value.hash(&mut entry_hasher);
          combined ^= entry_hasher.finish();
        }
        dictionary.len().hash(state);
        combined.hash(state);
      }
      Self::NativeFunction(function) => function.hash(state),
      Self::Type(descriptor) => descriptor.hash(state),
    }
  }
}

impl fmt::Display for Literal {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::Null => write!(f, "null"),
      Self::Boolean(value) => write!(f, "{value}"),
      Self::Integer(value) => write!(f, "{value}"),
      Self::Float(value) => write!(f, "{value}"),
      Self::String(value) => write!(f, "{value}"),
      Self::Identifier(name) => write!(f, "{name}"),
      Self::Array(items) => {
        write!(f, "[")?;
        for (index, item) in items.iter().enumerate() {
          if index > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{item}")?;
        }
        write!(f, "]")
      }
      Self::Dictionary(dictionary) => {
        if dictionary.is_empty() {
          return write!(f, "[:]");
        }

        write!(f, "[")?;
        for (index, (key, value)) in dictionary.entries().enumerate() {
          if index > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{key}: {value}")?;
        }
        write!(f, "]")
      }
      Self::NativeFunction(function) => write!(f, "<native {}>", function.name),
      Self::Type(descriptor) => write!(f, "{descriptor}"),
    }
  }
}

/// The stable on-disk tag for each literal form.
///
/// The serialized module writes these bytes in front of every constant pool
/// entry; a deserializer dispatches on them, so the values never change.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralKind {
  /// `null`
  Null = 0,
  /// `true`/`false`
  Boolean = 1,
  /// 32-bit signed integer
  Integer = 2,
  /// 32-bit float
  Float = 3,
  /// string bytes
  String = 4,
  /// array of pool indices
  Array = 5,
  /// dictionary of pool index pairs
  Dictionary = 6,
  /// a callable
  Function = 7,
  /// identifier bytes
  Identifier = 8,
  /// a leaf type descriptor
  Type = 9,
  /// a type descriptor with subtype pool indices
  TypeIntermediate = 10,
  /// the `any` type tag
  Any = 11,
}

impl LiteralKind {
  /// Recover a tag from its serialized byte
  #[must_use]
  pub fn from_byte(byte: u8) -> Option<Self> {
    match byte {
      0 => Some(Self::Null),
      1 => Some(Self::Boolean),
      2 => Some(Self::Integer),
      3 => Some(Self::Float),
      4 => Some(Self::String),
      5 => Some(Self::Array),
      6 => Some(Self::Dictionary),
      7 => Some(Self::Function),
      8 => Some(Self::Identifier),
      9 => Some(Self::Type),
      10 => Some(Self::TypeIntermediate),
      11 => Some(Self::Any),
      _ => None,
    }
  }
}

/// The signature of a host-provided callable
pub type NativeFn = fn(&LiteralArray) -> Result<Literal, NativeError>;

/// A named callable provided by the host, registered into a scope by a
/// native library
#[derive(Debug, Clone, Copy)]
pub struct NativeFunction {
  /// The name the function is registered under
  pub name: &'static str,
  /// The function itself
  pub function: NativeFn,
}

impl PartialEq for NativeFunction {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name && ptr::fn_addr_eq(self.function, other.function)
  }
}
impl Eq for NativeFunction {}

impl Hash for NativeFunction {
  fn hash<H: Hasher>(&self, state: &mut H) {
    // coarser than equality, which also compares the function address
    self.name.hash(state);
  }
}

/// An error raised by a native function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
  message: String,
}

impl NativeError {
  /// Wrap a message describing what the native rejected
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }

  /// The message describing what the native rejected
  #[must_use]
  pub fn message(&self) -> &str {
    &self.message
  }
}

impl fmt::Display for NativeError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.message)
  }
}
impl std::error::Error for NativeError {}
