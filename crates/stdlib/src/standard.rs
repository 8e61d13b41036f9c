use chrono::Local;
use mote_value::{Literal, LiteralArray, NativeError};

/// The current local time as a string, e.g. `Thu Aug  6 12:30:45 2026`
///
/// Takes no arguments.
pub fn clock(arguments: &LiteralArray) -> Result<Literal, NativeError> {
  if !arguments.is_empty() {
    return Err(NativeError::new("incorrect number of arguments to clock"));
  }

  let now = Local::now().format("%a %b %e %H:%M:%S %Y");
  Ok(Literal::string(&now.to_string()))
}
