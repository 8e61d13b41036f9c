use super::{
  compiler::{CompileError, Compiler},
  opcodes::OpCode,
  pool::PoolEntry,
};
use mote_value::{Literal, LiteralKind, TypeDescriptor, TypeShape};
use std::{error, fmt};

/// Major version embedded in every module
pub const VERSION_MAJOR: u8 = 0;
/// Minor version embedded in every module
pub const VERSION_MINOR: u8 = 1;
/// Patch version embedded in every module
pub const VERSION_PATCH: u8 = 0;
/// Build identifier embedded in every module, NUL-terminated on the wire
pub const VERSION_BUILD: &str = "mote 0.1.0";

impl Compiler {
  /// Serialize everything written so far into one binary module.
  ///
  /// Layout, little-endian throughout: three version bytes, the
  /// NUL-terminated build string, a section-end marker; a two-byte constant
  /// count followed by each pool entry (tag byte then payload) and a
  /// section-end marker; the bytecode, a section-end marker, and an
  /// end-of-file marker.
  ///
  /// # Errors
  /// If the pool holds a constant with no serialized form.
  pub fn collate(&self) -> Result<Vec<u8>, CompileError> {
    let mut module = Vec::with_capacity(64 + self.bytecode().len());

    // header
    module.push(VERSION_MAJOR);
    module.push(VERSION_MINOR);
    module.push(VERSION_PATCH);
    module.extend_from_slice(VERSION_BUILD.as_bytes());
    module.push(0);
    module.push(OpCode::SectionEnd as u8);

    // data section
    let count = u16::try_from(self.constants().len()).map_err(|_| CompileError::TooManyConstants)?;
    module.extend_from_slice(&count.to_le_bytes());
    for entry in self.constants() {
      serialize_entry(&mut module, entry)?;
    }
    module.push(OpCode::SectionEnd as u8);

    // code section
    module.extend_from_slice(self.bytecode());
    module.push(OpCode::SectionEnd as u8);

    module.push(OpCode::Eof as u8);
    Ok(module)
  }
}

fn serialize_entry(module: &mut Vec<u8>, entry: &PoolEntry) -> Result<(), CompileError> {
  match entry {
    PoolEntry::Literal(literal) => serialize_literal(module, literal),

    PoolEntry::Array(indices) => {
      module.push(LiteralKind::Array as u8);
      serialize_indices(module, indices)
    }
    PoolEntry::Dictionary(indices) => {
      module.push(LiteralKind::Dictionary as u8);
      serialize_indices(module, indices)
    }

    PoolEntry::Type {
      tag,
      constant,
      subtypes,
    } => {
      module.push(LiteralKind::TypeIntermediate as u8);
      module.push(*tag as u8);
      module.push(u8::from(*constant));
      for index in subtypes {
        module.extend_from_slice(&index.to_le_bytes());
      }
      Ok(())
    }
  }
}

fn serialize_literal(module: &mut Vec<u8>, literal: &Literal) -> Result<(), CompileError> {
  match literal {
    Literal::Null => module.push(LiteralKind::Null as u8),
    Literal::Boolean(value) => {
      module.push(LiteralKind::Boolean as u8);
      module.push(u8::from(*value));
    }
    Literal::Integer(value) => {
      module.push(LiteralKind::Integer as u8);
      module.extend_from_slice(&value.to_le_bytes());
    }
    Literal::Float(value) => {
      module.push(LiteralKind::Float as u8);
      module.extend_from_slice(&value.to_le_bytes());
    }
    Literal::String(value) => {
      module.push(LiteralKind::String as u8);
      module.extend_from_slice(value.as_bytes());
      module.push(0);
    }
    Literal::Identifier(name) => {
      module.push(LiteralKind::Identifier as u8);
      module.extend_from_slice(name.as_bytes());
      module.push(0);
    }
    Literal::Type(descriptor) => {
      module.push(LiteralKind::Type as u8);
      module.push(descriptor.shape.tag() as u8);
      module.push(u8::from(descriptor.constant));
    }

    // value-bearing compounds and functions only reach the pool through
    // the index indirection, never as raw literals
    Literal::Array(_) | Literal::Dictionary(_) | Literal::NativeFunction(_) => {
      return Err(CompileError::UnserializableConstant);
    }
  }

  Ok(())
}

fn serialize_indices(module: &mut Vec<u8>, indices: &[u16]) -> Result<(), CompileError> {
  let count = u16::try_from(indices.len()).map_err(|_| CompileError::TooManyConstants)?;
  module.extend_from_slice(&count.to_le_bytes());
  for index in indices {
    module.extend_from_slice(&index.to_le_bytes());
  }
  Ok(())
}

/// A deserialized bytecode module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
  /// The version triple from the header
  pub version: (u8, u8, u8),
  /// The build identifier from the header
  pub build: String,
  /// The constant pool, in serialized order
  pub constants: Vec<PoolEntry>,
  /// The bytecode
  pub bytecode: Vec<u8>,
}

impl Module {
  /// Read a serialized module back into its parts.
  ///
  /// The version header is checked before anything else is trusted. Pool
  /// entries are read in emitted order, so the indices of compound and type
  /// entries must refer to entries already consumed.
  ///
  /// # Errors
  /// On a version mismatch, truncated input, unknown tags, or an index
  /// referring forwards.
  pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
    let mut reader = Reader { bytes, position: 0 };

    let version = (reader.byte()?, reader.byte()?, reader.byte()?);
    if version != (VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH) {
      return Err(DecodeError::UnsupportedVersion { found: version });
    }
    let build = reader.c_string()?;
    reader.expect_marker(OpCode::SectionEnd)?;

    let count = reader.short()?;
    let mut constants = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
      let entry = read_entry(&mut reader, constants.len())?;
      constants.push(entry);
    }
    reader.expect_marker(OpCode::SectionEnd)?;

    // the code section runs to the trailing section-end and eof markers
    let end = bytes.len();
    if end < reader.position + 2 {
      return Err(DecodeError::UnexpectedEnd);
    }
    if bytes[end - 1] != OpCode::Eof as u8 || bytes[end - 2] != OpCode::SectionEnd as u8 {
      return Err(DecodeError::MissingMarker);
    }
    let bytecode = bytes[reader.position..end - 2].to_vec();

    Ok(Self {
      version,
      build,
      constants,
      bytecode,
    })
  }
}

fn read_entry(reader: &mut Reader, seen: usize) -> Result<PoolEntry, DecodeError> {
  let tag = reader.byte()?;
  let Some(kind) = LiteralKind::from_byte(tag) else {
    return Err(DecodeError::UnknownTag(tag));
  };

  match kind {
    LiteralKind::Null => Ok(PoolEntry::Literal(Literal::Null)),
    LiteralKind::Boolean => Ok(PoolEntry::Literal(Literal::Boolean(reader.byte()? != 0))),
    LiteralKind::Integer => Ok(PoolEntry::Literal(Literal::Integer(reader.integer()?))),
    LiteralKind::Float => Ok(PoolEntry::Literal(Literal::Float(reader.float()?))),
    LiteralKind::String => Ok(PoolEntry::Literal(Literal::string(&reader.c_string()?))),
    LiteralKind::Identifier => Ok(PoolEntry::Literal(Literal::identifier(&reader.c_string()?))),

    LiteralKind::Array => Ok(PoolEntry::Array(read_indices(reader, seen)?)),
    LiteralKind::Dictionary => Ok(PoolEntry::Dictionary(read_indices(reader, seen)?)),

    LiteralKind::Type => {
      let tag = reader.byte()?;
      let constant = reader.byte()? != 0;
      let shape = leaf_shape(tag)?;

      let descriptor = TypeDescriptor {
        shape,
        constant,
      };
      Ok(PoolEntry::Literal(Literal::Type(descriptor)))
    }

    LiteralKind::TypeIntermediate => {
      let type_tag = reader.byte()?;
      let Some(tag) = LiteralKind::from_byte(type_tag) else {
        return Err(DecodeError::InvalidTypeTag(type_tag));
      };
      let constant = reader.byte()? != 0;

      // the tag determines how many subtype indices follow
      let subtype_count = match tag {
        LiteralKind::Array => 1,
        LiteralKind::Dictionary => 2,
        _ => 0,
      };
      let mut subtypes = Vec::with_capacity(subtype_count);
      for _ in 0..subtype_count {
        subtypes.push(checked_index(reader.short()?, seen)?);
      }

      Ok(PoolEntry::Type {
        tag,
        constant,
        subtypes,
      })
    }

    LiteralKind::Function | LiteralKind::Any => Err(DecodeError::UnknownTag(tag)),
  }
}

fn read_indices(reader: &mut Reader, seen: usize) -> Result<Vec<u16>, DecodeError> {
  let count = reader.short()?;
  let mut indices = Vec::with_capacity(usize::from(count));
  for _ in 0..count {
    indices.push(checked_index(reader.short()?, seen)?);
  }
  Ok(indices)
}

/// Indices may only refer to entries already consumed
fn checked_index(index: u16, seen: usize) -> Result<u16, DecodeError> {
  if usize::from(index) >= seen {
    return Err(DecodeError::ForwardReference { index });
  }
  Ok(index)
}

fn leaf_shape(tag: u8) -> Result<TypeShape, DecodeError> {
  match LiteralKind::from_byte(tag) {
    Some(LiteralKind::Any) => Ok(TypeShape::Any),
    Some(LiteralKind::Boolean) => Ok(TypeShape::Boolean),
    Some(LiteralKind::Integer) => Ok(TypeShape::Integer),
    Some(LiteralKind::Float) => Ok(TypeShape::Float),
    Some(LiteralKind::String) => Ok(TypeShape::String),
    Some(LiteralKind::Function) => Ok(TypeShape::Function),
    _ => Err(DecodeError::InvalidTypeTag(tag)),
  }
}

struct Reader<'bytes> {
  bytes: &'bytes [u8],
  position: usize,
}

impl Reader<'_> {
  fn byte(&mut self) -> Result<u8, DecodeError> {
    let byte = self
      .bytes
      .get(self.position)
      .copied()
      .ok_or(DecodeError::UnexpectedEnd)?;
    self.position += 1;
    Ok(byte)
  }

  fn short(&mut self) -> Result<u16, DecodeError> {
    Ok(u16::from_le_bytes([self.byte()?, self.byte()?]))
  }

  fn integer(&mut self) -> Result<i32, DecodeError> {
    Ok(i32::from_le_bytes([
      self.byte()?,
      self.byte()?,
      self.byte()?,
      self.byte()?,
    ]))
  }

  fn float(&mut self) -> Result<f32, DecodeError> {
    Ok(f32::from_le_bytes([
      self.byte()?,
      self.byte()?,
      self.byte()?,
      self.byte()?,
    ]))
  }

  fn c_string(&mut self) -> Result<String, DecodeError> {
    let mut bytes = Vec::new();
    loop {
      let byte = self.byte()?;
      if byte == 0 {
        break;
      }
      bytes.push(byte);
    }

    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidString)
  }

  fn expect_marker(&mut self, marker: OpCode) -> Result<(), DecodeError> {
    if self.byte()? == marker as u8 {
      Ok(())
    } else {
      Err(DecodeError::MissingMarker)
    }
  }
}

impl fmt::Display for Module {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let (major, minor, patch) = self.version;
    writeln!(f, "      ╭─[{} v{major}.{minor}.{patch}]", self.build)?;

    for (index, entry) in self.constants.iter().enumerate() {
      match entry {
        PoolEntry::Literal(literal) => writeln!(f, " {index:0>4} │ {literal:?}")?,
        PoolEntry::Array(indices) => writeln!(f, " {index:0>4} │ Array {indices:?}")?,
        PoolEntry::Dictionary(indices) => writeln!(f, " {index:0>4} │ Dictionary {indices:?}")?,
        PoolEntry::Type {
          tag,
          constant,
          subtypes,
        } => {
          write!(f, " {index:0>4} │ Type {tag:?}")?;
          if *constant {
            write!(f, " const")?;
          }
          if subtypes.is_empty() {
            writeln!(f)?;
          } else {
            writeln!(f, " {subtypes:?}")?;
          }
        }
      }
    }

    writeln!(f, "      ├─[bytecode]")?;
    let mut position = 0;
    while position < self.bytecode.len() {
      let Some(opcode) = OpCode::from_byte(self.bytecode[position]) else {
        writeln!(f, " {position:0>4} │ !{}", self.bytecode[position])?;
        position += 1;
        continue;
      };

      write!(f, " {position:0>4} │ {opcode:?}")?;
      for operand in 1..opcode.length() {
        match self.bytecode.get(position + operand) {
          Some(byte) => write!(f, " {byte}")?,
          None => write!(f, " ??")?,
        }
      }
      writeln!(f)?;

      position += opcode.length();
    }

    writeln!(f, "──────╯")
  }
}

/// An error from reading a serialized module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
  /// The version triple does not match this build
  UnsupportedVersion {
    /// The version found in the header
    found: (u8, u8, u8),
  },
  /// The input ended inside an entry or header
  UnexpectedEnd,
  /// A section or end-of-file marker was missing
  MissingMarker,
  /// An entry carried an unknown tag byte
  UnknownTag(u8),
  /// A type entry carried an unknown type tag
  InvalidTypeTag(u8),
  /// String bytes were not valid UTF-8
  InvalidString,
  /// An index referred to an entry not yet consumed
  ForwardReference {
    /// The offending index
    index: u16,
  },
}

impl DecodeError {
  /// The title of the error message
  #[must_use]
  pub fn title(&self) -> &'static str {
    match self {
      Self::UnsupportedVersion { .. } => "Unsupported Version",
      Self::UnexpectedEnd => "Unexpected End",
      Self::MissingMarker => "Missing Marker",
      Self::UnknownTag(_) => "Unknown Tag",
      Self::InvalidTypeTag(_) => "Invalid Type Tag",
      Self::InvalidString => "Invalid String",
      Self::ForwardReference { .. } => "Forward Reference",
    }
  }

  /// The body of the error message describing what went wrong
  #[must_use]
  pub fn message(&self) -> String {
    match self {
      Self::UnsupportedVersion { found } => format!(
        "module version {}.{}.{} does not match {VERSION_MAJOR}.{VERSION_MINOR}.{VERSION_PATCH}",
        found.0, found.1, found.2
      ),
      Self::UnexpectedEnd => "the module ended unexpectedly".to_owned(),
      Self::MissingMarker => "a section marker was missing".to_owned(),
      Self::UnknownTag(tag) => format!("unknown constant tag {tag}"),
      Self::InvalidTypeTag(tag) => format!("unknown type tag {tag}"),
      Self::InvalidString => "string bytes were not valid utf-8".to_owned(),
      Self::ForwardReference { index } => {
        format!("index {index} refers to an entry not yet read")
      }
    }
  }
}

impl fmt::Display for DecodeError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.message())
  }
}
impl error::Error for DecodeError {}
