/*!
An RFC 8949 CBOR encoder for dynamically-typed value graphs.

A [`Value`] tree is packed into a fresh byte buffer by an [`Encoder`]. Tagged
values pass through a [`Replacer`] before their payload is encoded, which lets
callers substitute a concrete representation for a semantic tag.

```
use valcbor::{Encoder, Tagged, Value};

let bytes = Encoder::new()
    .encode(Value::from(Tagged::new(0, "2013-03-21T20:04:00Z")))
    .unwrap();
assert_eq!(bytes[0], 0xC0);
```
*/
#![no_std]
extern crate alloc;

use alloc::{boxed::Box, string::String, vec::Vec};

mod encode;
mod error;
mod options;
mod value;

pub use encode::{Encoder, Identity, Replacer, encode};
pub use error::Error;
pub use options::{NanPolicy, Options};
pub use value::{Tagged, Value};
