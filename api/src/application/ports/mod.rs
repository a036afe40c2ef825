pub mod account_repository;
pub mod credential_hasher;
pub mod store_connector;
