/*!
CBOR diagnostic notation (RFC 7049 §6, RFC 8949 §8)

The formatter and parser agree on one dialect, so any decoded value tree
survives a trip through text:

- integers of any size, `NaN`, `Infinity`, `-Infinity` and floats that always
  carry a `.` or an exponent
- `h'..'` and `b64'..'` byte strings, `"..."` text with JSON-style escapes
- `[..]` and `{..}`, or `[_ ..]` and `{_ ..}` for indefinite lengths
- `N(..)` tags, `true`, `false`, `null`, `undefined` and `simple(N)`
*/

pub mod formatter;
pub mod parser;

pub use formatter::{format_cbor, format_value};
pub use parser::parse;
