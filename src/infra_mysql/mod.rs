mod auth_repo_mysql;
mod refresh_token_store_mysql;

pub use auth_repo_mysql::*;
pub use refresh_token_store_mysql::*;
