pub mod chat;
pub mod gateway;
pub mod init_db;
