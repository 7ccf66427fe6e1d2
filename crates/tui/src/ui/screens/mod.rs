pub mod account;
pub mod advisor;
pub mod dashboard;
pub mod link_account;
pub mod login;
pub mod placeholder;
pub mod receipt;
pub mod security;
pub mod transactions;
pub mod transfer;
