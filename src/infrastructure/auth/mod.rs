//! Token issuance and public key publication

mod issuer;
mod publisher;

pub use issuer::{TokenConfig, TokenIssuer};
pub use publisher::PublicKeyPublisher;
