use mote_value::{Literal, LiteralArray, NativeError};

/// The argument string with every character lowercased
pub fn to_lower(arguments: &LiteralArray) -> Result<Literal, NativeError> {
  let value = single_string(arguments, "toLower")?;
  Ok(Literal::string(&value.to_lowercase()))
}

/// The argument string with every character uppercased
pub fn to_upper(arguments: &LiteralArray) -> Result<Literal, NativeError> {
  let value = single_string(arguments, "toUpper")?;
  Ok(Literal::string(&value.to_uppercase()))
}

fn single_string<'a>(arguments: &'a LiteralArray, name: &str) -> Result<&'a str, NativeError> {
  match arguments.as_slice() {
    [Literal::String(value)] => Ok(value),
    [_] => Err(NativeError::new(format!("{name} expects a string"))),
    _ => Err(NativeError::new(format!(
      "incorrect number of arguments to {name}"
    ))),
  }
}
