pub mod config;
pub mod email;
pub mod password;
pub mod token;

pub use config::{AuthConfig, DEFAULT_TOKEN_TTL};
pub use email::is_email;
pub use password::{compare_password, hash_password};
pub use token::{Claims, TokenAuthority};
