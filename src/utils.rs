use sha2::{Digest, Sha256};

pub mod error;
pub mod render;

/// Derives the stored credential from a submitted password.
pub fn hash_password(password: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(password.as_bytes());
  let result = hasher.finalize();
  format!("{:x}", result)
}
