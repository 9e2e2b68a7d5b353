mod asn;
mod origin;
mod peer;

pub use asn::*;
pub use origin::*;
pub use peer::*;
