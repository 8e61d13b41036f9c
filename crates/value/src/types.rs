use super::{Literal, LiteralKind};
use std::fmt;

/// Describes the shape of values a binding may hold.
///
/// A descriptor is a shape plus a `const` flag; compound shapes carry the
/// descriptors of their element (arrays) or key and value (dictionaries),
/// nested arbitrarily deep.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
  /// The shape of admitted values
  pub shape: TypeShape,
  /// Whether assignments past the first are rejected
  pub constant: bool,
}

/// The shape component of a [`TypeDescriptor`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeShape {
  /// Admits any value
  Any,
  /// Admits booleans
  Boolean,
  /// Admits 32-bit integers
  Integer,
  /// Admits 32-bit floats
  Float,
  /// Admits strings
  String,
  /// Admits arrays whose every element satisfies the subtype
  Array(Box<TypeDescriptor>),
  /// Admits dictionaries whose every live entry satisfies the key and value
  /// subtypes
  Dictionary(Box<TypeDescriptor>, Box<TypeDescriptor>),
  /// Admits callables
  Function,
}

impl TypeDescriptor {
  /// A non-const descriptor with the given shape
  #[must_use]
  pub fn new(shape: TypeShape) -> Self {
    Self {
      shape,
      constant: false,
    }
  }

  /// The non-const `any` descriptor, the default for untyped declarations
  #[must_use]
  pub fn any() -> Self {
    Self::new(TypeShape::Any)
  }

  /// This descriptor with the `const` flag set
  #[must_use]
  pub fn constant(mut self) -> Self {
    self.constant = true;
    self
  }

  /// Does `value` structurally satisfy this descriptor?
  ///
  /// `any` admits everything. A primitive shape requires the value's tag to
  /// match exactly. Compound shapes additionally recurse: every array
  /// element must satisfy the element subtype, and every live dictionary
  /// entry must satisfy the key and value subtypes.
  #[must_use]
  pub fn admits(&self, value: &Literal) -> bool {
    match (&self.shape, value) {
      (TypeShape::Any, _)
      | (TypeShape::Boolean, Literal::Boolean(_))
      | (TypeShape::Integer, Literal::Integer(_))
      | (TypeShape::Float, Literal::Float(_))
      | (TypeShape::String, Literal::String(_))
      | (TypeShape::Function, Literal::NativeFunction(_)) => true,

      (TypeShape::Array(element), Literal::Array(items)) => {
        items.iter().all(|item| element.admits(item))
      }
      (TypeShape::Dictionary(key_type, value_type), Literal::Dictionary(dictionary)) => dictionary
        .entries()
        .all(|(key, value)| key_type.admits(key) && value_type.admits(value)),

      _ => false,
    }
  }
}

impl TypeShape {
  /// The serialization tag for this shape
  #[must_use]
  pub fn tag(&self) -> LiteralKind {
    match self {
      Self::Any => LiteralKind::Any,
      Self::Boolean => LiteralKind::Boolean,
      Self::Integer => LiteralKind::Integer,
      Self::Float => LiteralKind::Float,
      Self::String => LiteralKind::String,
      Self::Array(_) => LiteralKind::Array,
      Self::Dictionary(_, _) => LiteralKind::Dictionary,
      Self::Function => LiteralKind::Function,
    }
  }
}

impl fmt::Display for TypeDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match &self.shape {
      TypeShape::Any => write!(f, "any")?,
      TypeShape::Boolean => write!(f, "boolean")?,
      TypeShape::Integer => write!(f, "integer")?,
      TypeShape::Float => write!(f, "float")?,
      TypeShape::String => write!(f, "string")?,
      TypeShape::Array(element) => write!(f, "[{element}]")?,
      TypeShape::Dictionary(key, value) => write!(f, "[{key}, {value}]")?,
      TypeShape::Function => write!(f, "function")?,
    }

    if self.constant {
      write!(f, " const")?;
    }

    Ok(())
  }
}
