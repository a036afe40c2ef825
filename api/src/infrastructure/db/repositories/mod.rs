pub mod account_repository_memory;
pub mod account_repository_sqlx;
