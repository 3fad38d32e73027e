//! RFC 1035 wire format.
//!
//! Encoding never compresses names. Decoding follows compression pointers
//! under the rules documented on [`decode_name`].

mod message;
mod name;
mod reader;
mod record;

pub use message::{decode_message, encode_message, encode_query};
pub use name::{decode_name, encode_name, MAX_POINTER_JUMPS};
pub use record::{decode_record, encode_record};
