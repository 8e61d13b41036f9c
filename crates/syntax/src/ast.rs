//! The abstract syntax tree produced by the parser.
//!
//! Nodes exclusively own their children, so dropping a node frees its whole
//! subtree. `Display` pretty-prints a statement as a tree, based on this
//! [blog post](https://www.georgevreilly.com/blog/2023/01/24/TreeInRust2PrintingTrees.html).

use mote_value::{Literal, TypeDescriptor};
use smartstring::alias::String as SmartString;
use std::fmt;
use thin_vec::ThinVec;

/// A node of the syntax tree, one variant per statement or expression form
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
  /// A constant value
  Literal(Literal),
  /// An operator applied to a single operand
  Unary {
    /// The operator
    operator: UnaryOperator,
    /// The operand
    child: Box<Node>,
  },
  /// An operator applied to two operands
  Binary {
    /// The left operand
    left: Box<Node>,
    /// The operator
    operator: BinaryOperator,
    /// The right operand
    right: Box<Node>,
  },
  /// A parenthesised expression; kept for pretty-printing, no runtime effect
  Grouping(Box<Node>),
  /// A sequence of statements introducing a lexical scope
  Block(ThinVec<Node>),
  /// An array or dictionary literal written in source
  Compound {
    /// Whether this is an array or a dictionary
    kind: CompoundKind,
    /// The elements; for dictionaries, [`Node::Pair`] nodes
    elements: ThinVec<Node>,
  },
  /// A key/value entry of a dictionary compound
  Pair {
    /// The key expression
    key: Box<Node>,
    /// The value expression
    value: Box<Node>,
  },
  /// A variable declaration
  VarDecl {
    /// The declared name
    name: SmartString,
    /// The declared type
    declared_type: TypeDescriptor,
    /// The initial value expression
    initializer: Box<Node>,
  },
  /// A standalone type declaration
  VarTypes {
    /// The declared type
    declared_type: TypeDescriptor,
  },
  /// An if statement with an optional else branch
  If {
    /// The condition expression
    condition: Box<Node>,
    /// The branch taken when the condition holds
    then: Box<Node>,
    /// The branch taken otherwise, if present
    otherwise: Option<Box<Node>>,
  },
  /// A statement that failed to parse; short-circuits compilation
  Error,
}

/// An operator over a single operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
  /// `-`
  Negate,
  /// `!`
  Not,
  /// The `print` statement
  Print,
}

/// An operator over two operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
  /// `+`
  Add,
  /// `-`
  Subtract,
  /// `*`
  Multiply,
  /// `/`
  Divide,
  /// `%`
  Remainder,
  /// `==`
  Equal,
  /// `!=`
  NotEqual,
  /// `<`
  Less,
  /// `<=`
  LessEqual,
  /// `>`
  Greater,
  /// `>=`
  GreaterEqual,
  /// `=`
  Assign,
  /// The `assert` statement
  Assert,
  /// An explicit type cast
  Cast,
}

impl BinaryOperator {
  /// Is this an arithmetic or comparison operator, eligible for folding?
  #[must_use]
  pub fn is_foldable(self) -> bool {
    !matches!(self, Self::Assign | Self::Assert | Self::Cast)
  }
}

/// Whether a compound literal is an array or a dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundKind {
  /// An ordered sequence of elements
  Array,
  /// Key/value pairs
  Dictionary,
}

impl fmt::Display for UnaryOperator {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::Negate => write!(f, "-"),
      Self::Not => write!(f, "!"),
      Self::Print => write!(f, "print"),
    }
  }
}

impl fmt::Display for BinaryOperator {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::Add => write!(f, "+"),
      Self::Subtract => write!(f, "-"),
      Self::Multiply => write!(f, "*"),
      Self::Divide => write!(f, "/"),
      Self::Remainder => write!(f, "%"),
      Self::Equal => write!(f, "=="),
      Self::NotEqual => write!(f, "!="),
      Self::Less => write!(f, "<"),
      Self::LessEqual => write!(f, "<="),
      Self::Greater => write!(f, ">"),
      Self::GreaterEqual => write!(f, ">="),
      Self::Assign => write!(f, "="),
      Self::Assert => write!(f, "assert"),
      Self::Cast => write!(f, "as"),
    }
  }
}

const OTHER_CHILD: &str = "│  ";
const OTHER_ENTRY: &str = "├─ ";
const FINAL_CHILD: &str = "   ";
const FINAL_ENTRY: &str = "╰─ ";

impl Node {
  fn pretty(&self, f: &mut fmt::Formatter, prefix: &str, last: bool) -> fmt::Result {
    let connector = if last { FINAL_ENTRY } else { OTHER_ENTRY };
    let child_prefix = format!("{prefix}{}", if last { FINAL_CHILD } else { OTHER_CHILD });

    match self {
      Self::Literal(literal) => match literal {
        Literal::Null => writeln!(f, "{prefix}{connector}Null"),
        Literal::Boolean(value) => writeln!(f, "{prefix}{connector}Boolean ({value})"),
        Literal::Integer(value) => writeln!(f, "{prefix}{connector}Integer ({value})"),
        Literal::Float(value) => writeln!(f, "{prefix}{connector}Float ({value})"),
        Literal::String(value) => writeln!(f, "{prefix}{connector}String '{value}'"),
        Literal::Identifier(name) => writeln!(f, "{prefix}{connector}Identifier ({name})"),
        Literal::Type(descriptor) => writeln!(f, "{prefix}{connector}Type ({descriptor})"),
        literal => writeln!(f, "{prefix}{connector}Literal ({literal})"),
      },
      Self::Unary { operator, child } => {
        writeln!(f, "{prefix}{connector}Unary ({operator})")?;
        child.pretty(f, &child_prefix, true)
      }
      Self::Binary {
        left,
        operator,
        right,
      } => {
        writeln!(f, "{prefix}{connector}Binary ({operator})")?;
        left.pretty(f, &child_prefix, false)?;
        right.pretty(f, &child_prefix, true)
      }
      Self::Grouping(child) => {
        writeln!(f, "{prefix}{connector}Group")?;
        child.pretty(f, &child_prefix, true)
      }
      Self::Block(statements) => {
        writeln!(f, "{prefix}{connector}Block")?;
        pretty_children(f, statements, &child_prefix)
      }
      Self::Compound { kind, elements } => {
        match kind {
          CompoundKind::Array => writeln!(f, "{prefix}{connector}Array")?,
          CompoundKind::Dictionary => writeln!(f, "{prefix}{connector}Dictionary")?,
        }
        pretty_children(f, elements, &child_prefix)
      }
      Self::Pair { key, value } => {
        writeln!(f, "{prefix}{connector}Pair")?;
        key.pretty(f, &child_prefix, false)?;
        value.pretty(f, &child_prefix, true)
      }
      Self::VarDecl {
        name,
        declared_type,
        initializer,
      } => {
        writeln!(f, "{prefix}{connector}VarDecl ({name}: {declared_type})")?;
        initializer.pretty(f, &child_prefix, true)
      }
      Self::VarTypes { declared_type } => {
        writeln!(f, "{prefix}{connector}TypeDecl ({declared_type})")
      }
      Self::If {
        condition,
        then,
        otherwise,
      } => {
        writeln!(f, "{prefix}{connector}If")?;
        condition.pretty(f, &child_prefix, false)?;
        match otherwise {
          Some(otherwise) => {
            then.pretty(f, &child_prefix, false)?;
            otherwise.pretty(f, &child_prefix, true)
          }
          None => then.pretty(f, &child_prefix, true),
        }
      }
      Self::Error => writeln!(f, "{prefix}{connector}Invalid"),
    }
  }
}

fn pretty_children(f: &mut fmt::Formatter, children: &[Node], prefix: &str) -> fmt::Result {
  if let Some((last, rest)) = children.split_last() {
    for child in rest {
      child.pretty(f, prefix, false)?;
    }
    last.pretty(f, prefix, true)?;
  }
  Ok(())
}

impl fmt::Display for Node {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    self.pretty(f, "", false)
  }
}
