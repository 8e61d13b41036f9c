//! # Standard library
//!
//! Native libraries registered into a scope through the runtime's
//! registration interface: each library exposes its functions and a hook
//! that binds them either directly or under a dictionary alias.

mod standard;
mod string;

#[cfg(test)]
mod test;

use mote_runtime::{ScopeRef, register_library};
use mote_value::NativeFunction;

pub use standard::clock;
pub use string::{to_lower, to_upper};

/// The functions of the `standard` library
pub const STANDARD_NATIVES: [NativeFunction; 1] = [NativeFunction {
  name: "clock",
  function: standard::clock,
}];

/// The functions of the `string` library
pub const STRING_NATIVES: [NativeFunction; 2] = [
  NativeFunction {
    name: "toLower",
    function: string::to_lower,
  },
  NativeFunction {
    name: "toUpper",
    function: string::to_upper,
  },
];

/// Register the `standard` library into `scope`, optionally under an alias
pub fn hook_standard(scope: &ScopeRef, alias: Option<&str>) -> bool {
  register_library(scope, alias, &STANDARD_NATIVES)
}

/// Register the `string` library into `scope`, optionally under an alias
pub fn hook_string(scope: &ScopeRef, alias: Option<&str>) -> bool {
  register_library(scope, alias, &STRING_NATIVES)
}
