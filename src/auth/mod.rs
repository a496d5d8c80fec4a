/// Authentication module
///
/// Password hashing, JWT issuance/parsing, and the token authority that
/// ties them to the user and revocation stores.

mod authority;
mod claims;
mod clock;
mod jwt;
mod password;

pub use authority::{TokenAuthority, TokenStatus};
pub use claims::Claims;
pub use clock::{Clock, SystemClock};
pub use jwt::TokenCodec;
pub use password::hash_password;
