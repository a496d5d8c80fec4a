mod auth;
mod health_check;
mod users;

pub use auth::{refresh, sign_in_email, sign_in_login, sign_out, sign_up, validate};
pub use health_check::health_check;
pub use users::get_users;
