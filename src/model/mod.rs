pub mod account;
pub mod algorithm;
pub mod login;
pub mod timeline;
pub mod vote;
