pub mod user;

pub use user::{HashedCredential, NewUser, Profile, User, UserId, UserPublic};
