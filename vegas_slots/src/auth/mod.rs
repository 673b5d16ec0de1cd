//! Authentication module providing user registration, login, and session lookup.
//!
//! Passwords are hashed with Argon2id plus a server-side pepper. Sessions are
//! opaque UUID tokens held in memory and resolved with a direct map lookup.
//!
//! ## Example
//!
//! ```no_run
//! use vegas_slots::auth::{AuthManager, RegisterRequest};
//! use vegas_slots::db::MemoryRepository;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = AuthManager::new(
//!         Arc::new(MemoryRepository::new()),
//!         "secret_pepper_value".to_string(),
//!     );
//!
//!     let request = RegisterRequest {
//!         username: "player1".to_string(),
//!         password: "lucky-sevens".to_string(),
//!     };
//!
//!     let user = auth.register(request).await?;
//!     println!("Registered user: {}", user.username);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use models::{LoginRequest, RegisterRequest, Session, User, UserCredentials, UserId};
