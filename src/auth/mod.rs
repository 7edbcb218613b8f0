//! Request authentication: secret decoding and `Authent` signature computation.
mod signer;


pub use signer::{AuthSecret, sign};
