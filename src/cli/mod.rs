pub mod check;
pub mod classify;
pub mod init;
pub mod log;
pub mod serve;
pub mod status;
