use super::{
  ast::{BinaryOperator, CompoundKind, Node, UnaryOperator},
  token::{Token, TokenKind},
};
use mote_value::{Literal, TypeDescriptor, TypeShape};
use std::{error, fmt};
use thin_vec::ThinVec;

/// Strings longer than this are truncated and reported
const MAX_STRING_LENGTH: usize = 4096;
/// Identifiers longer than this are truncated and reported
const MAX_IDENTIFIER_LENGTH: usize = 256;

/// A pratt parser over a stream of tokens.
///
/// Each call to [`next_statement`](Parser::next_statement) yields one
/// statement-level node, or `None` at the end of input. After a syntax error
/// the parser reports it, discards tokens up to the next statement boundary,
/// and yields an error node, so the rest of the source is still checked.
pub struct Parser<'source, Tokens: Iterator<Item = Token<'source>>> {
  tokens: Tokens,

  /// The token being looked at
  current: Token<'source>,
  /// The token just consumed
  previous: Token<'source>,

  /// The errors reported so far
  errors: Vec<ParseError>,
  /// Suppress further errors until the next synchronization point?
  panicking: bool,
}

impl<'source, Tokens: Iterator<Item = Token<'source>>> Parser<'source, Tokens> {
  /// Create a parser over a token stream
  pub fn new(tokens: Tokens) -> Self {
    let mut parser = Self {
      tokens,
      current: Token::default(),
      previous: Token::default(),
      errors: Vec::new(),
      panicking: false,
    };
    parser.advance();
    parser
  }

  /// Parse the next statement, or `None` at the end of the input.
  ///
  /// A statement that fails to parse is returned as [`Node::Error`] after
  /// synchronizing, with the failure recorded in [`errors`](Parser::errors).
  pub fn next_statement(&mut self) -> Option<Node> {
    if self.current.kind == TokenKind::EndOfFile {
      return None;
    }

    let node = self.declaration();

    if self.panicking {
      self.synchronize();
      return Some(Node::Error);
    }
    Some(node)
  }

  /// The errors reported so far
  #[must_use]
  pub fn errors(&self) -> &[ParseError] {
    &self.errors
  }

  /// Consume the parser, returning every error it reported
  #[must_use]
  pub fn into_errors(self) -> Vec<ParseError> {
    self.errors
  }

  fn advance(&mut self) {
    self.previous = self.current;
    self.current = self.tokens.next().unwrap_or(Token {
      kind: TokenKind::EndOfFile,
      lexeme: "",
      line: self.previous.line,
    });

    if self.current.kind == TokenKind::Error {
      self.error(ParseError::Lexer {
        lexeme: self.current.lexeme.into(),
        line: self.current.line,
      });
    }
  }

  fn matches(&mut self, kind: TokenKind) -> bool {
    if self.current.kind == kind {
      self.advance();
      true
    } else {
      false
    }
  }

  fn consume(&mut self, kind: TokenKind) {
    if self.current.kind == kind {
      self.advance();
    } else {
      self.expected(kind);
    }
  }

  fn error(&mut self, error: ParseError) {
    // keep going whilst panicking, a single report per statement is enough
    if self.panicking {
      return;
    }
    self.panicking = true;
    self.errors.push(error);
  }

  fn expected(&mut self, expected: TokenKind) {
    self.error(ParseError::Expected {
      expected,
      found: describe(self.current),
      line: self.current.line,
    });
  }

  /// Discard tokens until one that can legally start a statement
  fn synchronize(&mut self) {
    while self.current.kind != TokenKind::EndOfFile {
      match self.current.kind {
        TokenKind::Assert
        | TokenKind::Break
        | TokenKind::Class
        | TokenKind::Continue
        | TokenKind::Do
        | TokenKind::Export
        | TokenKind::For
        | TokenKind::Foreach
        | TokenKind::If
        | TokenKind::Import
        | TokenKind::Print
        | TokenKind::Return
        | TokenKind::Type
        | TokenKind::Var
        | TokenKind::While => break,
        _ => self.advance(),
      }
    }
    self.panicking = false;
  }
}

// Statements
impl<'source, Tokens: Iterator<Item = Token<'source>>> Parser<'source, Tokens> {
  fn declaration(&mut self) -> Node {
    if self.matches(TokenKind::Var) {
      self.var_declaration()
    } else {
      self.statement()
    }
  }

  fn statement(&mut self) -> Node {
    if self.matches(TokenKind::LeftCurly) {
      return self.block();
    }
    if self.matches(TokenKind::Print) {
      return self.print_statement();
    }
    if self.matches(TokenKind::Assert) {
      return self.assert_statement();
    }
    if self.matches(TokenKind::If) {
      return self.if_statement();
    }
    if self.matches(TokenKind::Type) {
      return self.type_statement();
    }

    self.expression_statement()
  }

  fn expression_statement(&mut self) -> Node {
    // the empty statement `;` parses as a null literal
    if self.matches(TokenKind::Semicolon) {
      return Node::Literal(Literal::Null);
    }

    let expression = self.expression();
    self.consume(TokenKind::Semicolon);

    expression
  }

  fn block(&mut self) -> Node {
    let mut statements = ThinVec::new();

    while !self.matches(TokenKind::RightCurly) {
      if self.current.kind == TokenKind::EndOfFile {
        self.expected(TokenKind::RightCurly);
        break;
      }

      statements.push(self.declaration());
      if self.panicking {
        break;
      }
    }

    Node::Block(statements)
  }

  fn print_statement(&mut self) -> Node {
    let child = self.expression();
    self.consume(TokenKind::Semicolon);

    Node::Unary {
      operator: UnaryOperator::Print,
      child: child.into(),
    }
  }

  fn assert_statement(&mut self) -> Node {
    let left = self.parse_precedence(ParsePrecedence::Ternary);
    self.consume(TokenKind::Comma);
    let right = self.parse_precedence(ParsePrecedence::Ternary);
    self.consume(TokenKind::Semicolon);

    Node::Binary {
      left: left.into(),
      operator: BinaryOperator::Assert,
      right: right.into(),
    }
  }

  fn if_statement(&mut self) -> Node {
    self.consume(TokenKind::LeftParen);
    let condition = self.expression();
    self.consume(TokenKind::RightParen);
    if self.panicking {
      return Node::Error;
    }

    let then = self.statement();
    let otherwise = if self.matches(TokenKind::Else) {
      Some(Box::new(self.statement()))
    } else {
      None
    };

    Node::If {
      condition: condition.into(),
      then: then.into(),
      otherwise,
    }
  }

  fn type_statement(&mut self) -> Node {
    let declared_type = self.type_signature();
    self.consume(TokenKind::Semicolon);

    Node::VarTypes { declared_type }
  }

  fn var_declaration(&mut self) -> Node {
    self.consume(TokenKind::Identifier);
    if self.panicking {
      return Node::Error;
    }
    let name = self.limited_lexeme(MAX_IDENTIFIER_LENGTH, ParseError::IdentifierTooLong {
      line: self.previous.line,
    });

    let declared_type = if self.matches(TokenKind::Colon) {
      self.type_signature()
    } else {
      TypeDescriptor::any()
    };

    let initializer = if self.matches(TokenKind::Assign) {
      self.expression()
    } else {
      Node::Literal(Literal::Null)
    };

    self.consume(TokenKind::Semicolon);

    Node::VarDecl {
      name: name.into(),
      declared_type,
      initializer: initializer.into(),
    }
  }

  fn type_signature(&mut self) -> TypeDescriptor {
    self.advance();

    let shape = match self.previous.kind {
      TokenKind::Boolean => TypeShape::Boolean,
      TokenKind::Integer => TypeShape::Integer,
      TokenKind::Float => TypeShape::Float,
      TokenKind::String => TypeShape::String,
      TokenKind::Any => TypeShape::Any,

      // array and dictionary signatures carry their subtypes
      TokenKind::LeftSquare => {
        let first = self.type_signature();
        let shape = if self.matches(TokenKind::Comma) {
          let second = self.type_signature();
          TypeShape::Dictionary(first.into(), second.into())
        } else {
          TypeShape::Array(first.into())
        };
        self.consume(TokenKind::RightSquare);
        shape
      }

      _ => {
        self.error(ParseError::BadTypeSignature {
          found: describe(self.previous),
          line: self.previous.line,
        });
        TypeShape::Any
      }
    };

    let descriptor = TypeDescriptor::new(shape);
    if self.matches(TokenKind::Const) {
      descriptor.constant()
    } else {
      descriptor
    }
  }
}

// Expressions
impl<'source, Tokens: Iterator<Item = Token<'source>>> Parser<'source, Tokens> {
  fn expression(&mut self) -> Node {
    self.parse_precedence(ParsePrecedence::Assignment)
  }

  fn parse_precedence(&mut self, precedence: ParsePrecedence) -> Node {
    // every valid expression starts with a prefix rule
    self.advance();
    let Some(mut node) = self.prefix_rule() else {
      self.error(ParseError::ExpectedExpression {
        found: describe(self.previous),
        line: self.previous.line,
      });
      return Node::Error;
    };
    if self.panicking {
      return Node::Error;
    }

    let can_assign = precedence <= ParsePrecedence::Assignment;

    // infix rules bind while their precedence holds
    while precedence <= ParsePrecedence::from(self.current.kind) {
      if !has_infix_rule(self.current.kind) {
        self.error(ParseError::ExpectedOperator {
          found: describe(self.current),
          line: self.current.line,
        });
        return Node::Error;
      }

      self.advance();
      node = self.infix_rule(node);
      if self.panicking {
        return Node::Error;
      }
    }

    if can_assign && self.matches(TokenKind::Assign) {
      self.error(ParseError::InvalidAssignmentTarget {
        line: self.previous.line,
      });
    }

    node
  }

  fn prefix_rule(&mut self) -> Option<Node> {
    let node = match self.previous.kind {
      TokenKind::Null => Node::Literal(Literal::Null),
      TokenKind::True => Node::Literal(Literal::Boolean(true)),
      TokenKind::False => Node::Literal(Literal::Boolean(false)),
      TokenKind::LiteralInteger => self.integer(),
      TokenKind::LiteralFloat => self.float(),
      TokenKind::LiteralString => self.string(),
      TokenKind::Identifier => self.identifier(),

      // a leading type keyword denotes a type literal, the start of a cast
      TokenKind::Boolean => Node::Literal(Literal::Type(TypeDescriptor::new(TypeShape::Boolean))),
      TokenKind::Integer => Node::Literal(Literal::Type(TypeDescriptor::new(TypeShape::Integer))),
      TokenKind::Float => Node::Literal(Literal::Type(TypeDescriptor::new(TypeShape::Float))),
      TokenKind::String => Node::Literal(Literal::Type(TypeDescriptor::new(TypeShape::String))),

      TokenKind::LeftParen => self.grouping(),
      TokenKind::LeftSquare => self.compound(),
      TokenKind::Minus => self.unary(UnaryOperator::Negate),
      TokenKind::Bang => self.unary(UnaryOperator::Not),

      _ => return None,
    };

    Some(node)
  }

  fn infix_rule(&mut self, left: Node) -> Node {
    match self.previous.kind {
      TokenKind::Plus => self.binary(left, BinaryOperator::Add, ParsePrecedence::Term),
      TokenKind::Minus => self.binary(left, BinaryOperator::Subtract, ParsePrecedence::Term),
      TokenKind::Star => self.binary(left, BinaryOperator::Multiply, ParsePrecedence::Factor),
      TokenKind::Slash => self.binary(left, BinaryOperator::Divide, ParsePrecedence::Factor),
      TokenKind::Percent => self.binary(left, BinaryOperator::Remainder, ParsePrecedence::Factor),
      TokenKind::EqualEqual => self.binary(left, BinaryOperator::Equal, ParsePrecedence::Comparison),
      TokenKind::NotEqual => self.binary(left, BinaryOperator::NotEqual, ParsePrecedence::Comparison),
      TokenKind::Less => self.binary(left, BinaryOperator::Less, ParsePrecedence::Comparison),
      TokenKind::LessEqual => self.binary(left, BinaryOperator::LessEqual, ParsePrecedence::Comparison),
      TokenKind::Greater => self.binary(left, BinaryOperator::Greater, ParsePrecedence::Comparison),
      TokenKind::GreaterEqual => {
        self.binary(left, BinaryOperator::GreaterEqual, ParsePrecedence::Comparison)
      }
      TokenKind::Assign => self.assignment(left),
      _ => self.cast(left),
    }
  }

  fn integer(&mut self) -> Node {
    match self.previous.lexeme.parse::<i32>() {
      Ok(value) => Node::Literal(Literal::Integer(value)),
      Err(_) => {
        self.error(ParseError::InvalidNumber {
          lexeme: self.previous.lexeme.into(),
          line: self.previous.line,
        });
        Node::Error
      }
    }
  }

  fn float(&mut self) -> Node {
    match self.previous.lexeme.parse::<f32>() {
      Ok(value) => Node::Literal(Literal::Float(value)),
      Err(_) => {
        self.error(ParseError::InvalidNumber {
          lexeme: self.previous.lexeme.into(),
          line: self.previous.line,
        });
        Node::Error
      }
    }
  }

  fn string(&mut self) -> Node {
    let text = self.limited_lexeme(MAX_STRING_LENGTH, ParseError::StringTooLong {
      line: self.previous.line,
    });
    Node::Literal(Literal::string(text))
  }

  fn identifier(&mut self) -> Node {
    let name = self.limited_lexeme(MAX_IDENTIFIER_LENGTH, ParseError::IdentifierTooLong {
      line: self.previous.line,
    });
    Node::Literal(Literal::identifier(name))
  }

  /// The previous token's lexeme, truncated and reported if over `limit`
  fn limited_lexeme(&mut self, limit: usize, error: ParseError) -> &'source str {
    let lexeme = self.previous.lexeme;
    if lexeme.len() <= limit {
      return lexeme;
    }

    self.error(error);

    let mut end = limit;
    while !lexeme.is_char_boundary(end) {
      end -= 1;
    }
    &lexeme[..end]
  }

  fn grouping(&mut self) -> Node {
    let inner = self.parse_precedence(ParsePrecedence::Ternary);
    if self.panicking {
      return Node::Error;
    }
    self.consume(TokenKind::RightParen);

    Node::Grouping(inner.into())
  }

  fn unary(&mut self, operator: UnaryOperator) -> Node {
    let line = self.previous.line;
    let child = self.parse_precedence(ParsePrecedence::Ternary);
    if self.panicking {
      return Node::Error;
    }

    match operator {
      UnaryOperator::Negate => match child {
        // negative literals fold directly
        Node::Literal(Literal::Integer(value)) => {
          Node::Literal(Literal::Integer(value.wrapping_neg()))
        }
        Node::Literal(Literal::Float(value)) => Node::Literal(Literal::Float(-value)),
        Node::Literal(Literal::Boolean(_)) => {
          self.error(ParseError::NegatedBoolean { line });
          Node::Error
        }
        child => Node::Unary {
          operator,
          child: child.into(),
        },
      },
      UnaryOperator::Not => match child {
        Node::Literal(Literal::Boolean(value)) => Node::Literal(Literal::Boolean(!value)),
        Node::Literal(Literal::Integer(_) | Literal::Float(_)) => {
          self.error(ParseError::InvertedNumber { line });
          Node::Error
        }
        child => Node::Unary {
          operator,
          child: child.into(),
        },
      },
      UnaryOperator::Print => Node::Unary {
        operator,
        child: child.into(),
      },
    }
  }

  /// Read an array or dictionary literal; the first entry decides which
  fn compound(&mut self) -> Node {
    let mut kind = None;
    let mut elements = ThinVec::new();
    let mut iterations = 0;

    while !self.matches(TokenKind::RightSquare) {
      if self.current.kind == TokenKind::EndOfFile {
        self.expected(TokenKind::RightSquare);
        return Node::Error;
      }

      // an empty dictionary is a colon between the brackets
      if iterations == 0 && self.matches(TokenKind::Colon) {
        self.consume(TokenKind::RightSquare);
        kind = Some(CompoundKind::Dictionary);
        break;
      }

      if iterations > 0 {
        self.consume(TokenKind::Comma);
        if self.panicking {
          return Node::Error;
        }
      }
      iterations += 1;

      let left = self.parse_precedence(ParsePrecedence::Primary);
      if self.panicking {
        return Node::Error;
      }

      if self.matches(TokenKind::Colon) {
        let right = self.parse_precedence(ParsePrecedence::Primary);
        if self.panicking {
          return Node::Error;
        }

        if kind == Some(CompoundKind::Array) {
          self.error(ParseError::MixedCompound {
            line: self.previous.line,
          });
          return Node::Error;
        }
        kind = Some(CompoundKind::Dictionary);

        elements.push(Node::Pair {
          key: left.into(),
          value: right.into(),
        });
      } else {
        if kind == Some(CompoundKind::Dictionary) {
          self.error(ParseError::MixedCompound {
            line: self.previous.line,
          });
          return Node::Error;
        }
        kind = Some(CompoundKind::Array);

        elements.push(left);
      }
    }

    Node::Compound {
      // a bare `[]` is an empty array
      kind: kind.unwrap_or(CompoundKind::Array),
      elements,
    }
  }

  fn binary(&mut self, left: Node, operator: BinaryOperator, precedence: ParsePrecedence) -> Node {
    let line = self.previous.line;
    let right = self.parse_precedence(precedence);
    if self.panicking {
      return Node::Error;
    }

    let node = Node::Binary {
      left: left.into(),
      operator,
      right: right.into(),
    };
    self.fold_binary(node, line)
  }

  fn assignment(&mut self, left: Node) -> Node {
    if !matches!(left, Node::Literal(Literal::Identifier(_))) {
      self.error(ParseError::InvalidAssignmentTarget {
        line: self.previous.line,
      });
      return Node::Error;
    }

    let right = self.parse_precedence(ParsePrecedence::Assignment);
    if self.panicking {
      return Node::Error;
    }

    Node::Binary {
      left: left.into(),
      operator: BinaryOperator::Assign,
      right: right.into(),
    }
  }

  /// A literal or identifier directly after a type literal is a cast
  fn cast(&mut self, left: Node) -> Node {
    if !matches!(left, Node::Literal(Literal::Type(_))) {
      self.error(ParseError::ExpectedOperator {
        found: describe(self.previous),
        line: self.previous.line,
      });
      return Node::Error;
    }

    let Some(value) = self.prefix_rule() else {
      return Node::Error;
    };
    if self.panicking {
      return Node::Error;
    }

    Node::Binary {
      left: left.into(),
      operator: BinaryOperator::Cast,
      right: value.into(),
    }
  }
}

// Constant folding
impl<'source, Tokens: Iterator<Item = Token<'source>>> Parser<'source, Tokens> {
  /// Evaluate a fully-literal arithmetic or comparison node at parse time,
  /// replacing it with its result
  fn fold_binary(&mut self, node: Node, line: u32) -> Node {
    let Node::Binary {
      left,
      operator,
      right,
    } = node
    else {
      return node;
    };

    if !operator.is_foldable() {
      return Node::Binary {
        left,
        operator,
        right,
      };
    }

    // descendants fold first, so their results can feed this node
    let left = Box::new(self.fold_binary(*left, line));
    let right = Box::new(self.fold_binary(*right, line));
    if self.panicking {
      return Node::Error;
    }

    let folded = match (&*left, &*right) {
      (Node::Literal(lhs), Node::Literal(rhs)) => self.fold_literals(lhs, rhs, operator, line),
      _ => None,
    };

    match folded {
      Some(Ok(literal)) => Node::Literal(literal),
      Some(Err(())) => Node::Error,
      None => Node::Binary {
        left,
        operator,
        right,
      },
    }
  }

  fn fold_literals(
    &mut self,
    lhs: &Literal,
    rhs: &Literal,
    operator: BinaryOperator,
    line: u32,
  ) -> Option<Result<Literal, ()>> {
    #[expect(clippy::cast_precision_loss, reason = "promotion is to 32-bit floats")]
    let (lhs, rhs) = match (lhs, rhs) {
      // mixed operands promote the integer to a float
      (Literal::Integer(l), Literal::Float(r)) => (Literal::Float(*l as f32), Literal::Float(*r)),
      (Literal::Float(l), Literal::Integer(r)) => (Literal::Float(*l), Literal::Float(*r as f32)),
      _ => (lhs.clone(), rhs.clone()),
    };

    match (lhs, rhs) {
      (Literal::Integer(l), Literal::Integer(r)) => Some(self.fold_integers(l, r, operator, line)),
      (Literal::Float(l), Literal::Float(r)) => Some(self.fold_floats(l, r, operator, line)),
      _ => None,
    }
  }

  fn fold_integers(
    &mut self,
    left: i32,
    right: i32,
    operator: BinaryOperator,
    line: u32,
  ) -> Result<Literal, ()> {
    let literal = match operator {
      BinaryOperator::Add => Literal::Integer(left.wrapping_add(right)),
      BinaryOperator::Subtract => Literal::Integer(left.wrapping_sub(right)),
      BinaryOperator::Multiply => Literal::Integer(left.wrapping_mul(right)),
      BinaryOperator::Divide => {
        if right == 0 {
          self.error(ParseError::DivisionByZero { line });
          return Err(());
        }
        Literal::Integer(left.wrapping_div(right))
      }
      BinaryOperator::Remainder => {
        if right == 0 {
          self.error(ParseError::RemainderByZero { line });
          return Err(());
        }
        Literal::Integer(left.wrapping_rem(right))
      }
      BinaryOperator::Equal => Literal::Boolean(left == right),
      BinaryOperator::NotEqual => Literal::Boolean(left != right),
      BinaryOperator::Less => Literal::Boolean(left < right),
      BinaryOperator::LessEqual => Literal::Boolean(left <= right),
      BinaryOperator::Greater => Literal::Boolean(left > right),
      BinaryOperator::GreaterEqual => Literal::Boolean(left >= right),
      BinaryOperator::Assign | BinaryOperator::Assert | BinaryOperator::Cast => {
        unreachable!("not a foldable operator")
      }
    };

    Ok(literal)
  }

  #[expect(clippy::float_cmp, reason = "zero divisors are exact")]
  fn fold_floats(
    &mut self,
    left: f32,
    right: f32,
    operator: BinaryOperator,
    line: u32,
  ) -> Result<Literal, ()> {
    let literal = match operator {
      BinaryOperator::Add => Literal::Float(left + right),
      BinaryOperator::Subtract => Literal::Float(left - right),
      BinaryOperator::Multiply => Literal::Float(left * right),
      BinaryOperator::Divide => {
        if right == 0.0 {
          self.error(ParseError::DivisionByZero { line });
          return Err(());
        }
        Literal::Float(left / right)
      }
      BinaryOperator::Remainder => {
        self.error(ParseError::FloatRemainder { line });
        return Err(());
      }
      BinaryOperator::Equal => Literal::Boolean(left == right),
      BinaryOperator::NotEqual => Literal::Boolean(left != right),
      BinaryOperator::Less => Literal::Boolean(left < right),
      BinaryOperator::LessEqual => Literal::Boolean(left <= right),
      BinaryOperator::Greater => Literal::Boolean(left > right),
      BinaryOperator::GreaterEqual => Literal::Boolean(left >= right),
      BinaryOperator::Assign | BinaryOperator::Assert | BinaryOperator::Cast => {
        unreachable!("not a foldable operator")
      }
    };

    Ok(literal)
  }
}

impl<'source, Tokens: Iterator<Item = Token<'source>>> Iterator for Parser<'source, Tokens> {
  type Item = Node;

  fn next(&mut self) -> Option<Self::Item> {
    self.next_statement()
  }
}

/// The binding strength of each operator, for precedence climbing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ParsePrecedence {
  None,
  Assignment,
  Ternary,
  Or,
  And,
  Comparison,
  Term,
  Factor,
  Unary,
  Call,
  Primary,
}

impl From<TokenKind> for ParsePrecedence {
  fn from(kind: TokenKind) -> Self {
    match kind {
      TokenKind::Assign => Self::Assignment,
      TokenKind::EqualEqual
      | TokenKind::NotEqual
      | TokenKind::Less
      | TokenKind::Greater
      | TokenKind::LessEqual
      | TokenKind::GreaterEqual => Self::Comparison,
      TokenKind::Plus | TokenKind::Minus => Self::Term,
      TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Self::Factor,
      TokenKind::LeftParen
      | TokenKind::LeftSquare
      | TokenKind::Bang
      | TokenKind::Boolean
      | TokenKind::Integer
      | TokenKind::Float
      | TokenKind::String => Self::Call,
      TokenKind::Null
      | TokenKind::True
      | TokenKind::False
      | TokenKind::LiteralInteger
      | TokenKind::LiteralFloat
      | TokenKind::LiteralString
      | TokenKind::Identifier => Self::Primary,
      _ => Self::None,
    }
  }
}

/// Only some tokens with a binding precedence can continue an expression
fn has_infix_rule(kind: TokenKind) -> bool {
  matches!(
    kind,
    TokenKind::Plus
      | TokenKind::Minus
      | TokenKind::Star
      | TokenKind::Slash
      | TokenKind::Percent
      | TokenKind::EqualEqual
      | TokenKind::NotEqual
      | TokenKind::Less
      | TokenKind::LessEqual
      | TokenKind::Greater
      | TokenKind::GreaterEqual
      | TokenKind::Assign
      | TokenKind::True
      | TokenKind::False
      | TokenKind::LiteralInteger
      | TokenKind::LiteralFloat
      | TokenKind::LiteralString
      | TokenKind::Identifier
  )
}

fn describe(token: Token) -> String {
  if token.kind == TokenKind::EndOfFile {
    "the end of the file".to_owned()
  } else if token.lexeme.is_empty() {
    token.kind.to_string()
  } else {
    format!("'{}'", token.lexeme)
  }
}

/// An error found whilst parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
  /// The lexer produced an error token
  Lexer {
    /// The text the lexer rejected
    lexeme: String,
    /// The source line
    line: u32,
  },
  /// A specific token was required but something else appeared
  Expected {
    /// The token that was required
    expected: TokenKind,
    /// A description of what appeared instead
    found: String,
    /// The source line
    line: u32,
  },
  /// An expression was required but something else appeared
  ExpectedExpression {
    /// A description of what appeared instead
    found: String,
    /// The source line
    line: u32,
  },
  /// An operator was required but something else appeared
  ExpectedOperator {
    /// A description of what appeared instead
    found: String,
    /// The source line
    line: u32,
  },
  /// The left side of an `=` was not a variable
  InvalidAssignmentTarget {
    /// The source line
    line: u32,
  },
  /// A string literal was longer than the safety limit
  StringTooLong {
    /// The source line
    line: u32,
  },
  /// An identifier was longer than the safety limit
  IdentifierTooLong {
    /// The source line
    line: u32,
  },
  /// A number literal could not be read as a 32-bit value
  InvalidNumber {
    /// The text of the number
    lexeme: String,
    /// The source line
    line: u32,
  },
  /// Array elements and dictionary pairs were mixed in one compound
  MixedCompound {
    /// The source line
    line: u32,
  },
  /// A type signature was required but something else appeared
  BadTypeSignature {
    /// A description of what appeared instead
    found: String,
    /// The source line
    line: u32,
  },
  /// A constant expression divided by zero
  DivisionByZero {
    /// The source line
    line: u32,
  },
  /// A constant expression took a remainder by zero
  RemainderByZero {
    /// The source line
    line: u32,
  },
  /// A constant expression took a remainder of floats
  FloatRemainder {
    /// The source line
    line: u32,
  },
  /// A boolean was negated with `-`
  NegatedBoolean {
    /// The source line
    line: u32,
  },
  /// A number was inverted with `!`
  InvertedNumber {
    /// The source line
    line: u32,
  },
}

impl ParseError {
  /// The title of the error message
  #[must_use]
  pub fn title(&self) -> &'static str {
    match self {
      Self::Lexer { .. } => "Lexer Error",
      Self::Expected { .. } | Self::ExpectedExpression { .. } | Self::ExpectedOperator { .. } => {
        "Syntax Error"
      }
      Self::InvalidAssignmentTarget { .. } => "Invalid Assignment Target",
      Self::StringTooLong { .. } => "String Too Long",
      Self::IdentifierTooLong { .. } => "Identifier Too Long",
      Self::InvalidNumber { .. } => "Invalid Number",
      Self::MixedCompound { .. } => "Mixed Compound Literal",
      Self::BadTypeSignature { .. } => "Invalid Type",
      Self::DivisionByZero { .. } => "Division By Zero",
      Self::RemainderByZero { .. } => "Remainder By Zero",
      Self::FloatRemainder { .. } => "Invalid Remainder",
      Self::NegatedBoolean { .. } => "Invalid Negation",
      Self::InvertedNumber { .. } => "Invalid Not",
    }
  }

  /// The body of the error message describing what went wrong
  #[must_use]
  pub fn message(&self) -> String {
    match self {
      Self::Lexer { lexeme, .. } => format!("invalid token {lexeme:?}"),
      Self::Expected {
        expected, found, ..
      } => format!("expected {expected} but found {found}"),
      Self::ExpectedExpression { found, .. } => {
        format!("expected an expression but found {found}")
      }
      Self::ExpectedOperator { found, .. } => format!("expected an operator but found {found}"),
      Self::InvalidAssignmentTarget { .. } => "only a variable can be assigned to".to_owned(),
      Self::StringTooLong { .. } => {
        format!("strings can be at most {MAX_STRING_LENGTH} bytes long")
      }
      Self::IdentifierTooLong { .. } => {
        format!("identifiers can be at most {MAX_IDENTIFIER_LENGTH} bytes long")
      }
      Self::InvalidNumber { lexeme, .. } => format!("'{lexeme}' is not a valid 32-bit number"),
      Self::MixedCompound { .. } => {
        "cannot mix array elements and dictionary pairs in one compound".to_owned()
      }
      Self::BadTypeSignature { found, .. } => format!("expected a type but found {found}"),
      Self::DivisionByZero { .. } => "cannot divide by zero in a constant expression".to_owned(),
      Self::RemainderByZero { .. } => {
        "cannot take a remainder by zero in a constant expression".to_owned()
      }
      Self::FloatRemainder { .. } => "cannot take a remainder of float values".to_owned(),
      Self::NegatedBoolean { .. } => "negative booleans are not allowed".to_owned(),
      Self::InvertedNumber { .. } => "inverted numbers are not allowed".to_owned(),
    }
  }

  /// The source line the error was found on
  #[must_use]
  pub fn line(&self) -> u32 {
    match self {
      Self::Lexer { line, .. }
      | Self::Expected { line, .. }
      | Self::ExpectedExpression { line, .. }
      | Self::ExpectedOperator { line, .. }
      | Self::InvalidAssignmentTarget { line }
      | Self::StringTooLong { line }
      | Self::IdentifierTooLong { line }
      | Self::InvalidNumber { line, .. }
      | Self::MixedCompound { line }
      | Self::BadTypeSignature { line, .. }
      | Self::DivisionByZero { line }
      | Self::RemainderByZero { line }
      | Self::FloatRemainder { line }
      | Self::NegatedBoolean { line }
      | Self::InvertedNumber { line } => *line,
    }
  }
}

impl fmt::Display for ParseError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "[line {}] {}: {}", self.line(), self.title(), self.message())
  }
}
impl error::Error for ParseError {}
