// store

mod refresh_token_store;

pub use refresh_token_store::*;

// repo

mod auth_repo;

pub use auth_repo::*;
