pub mod diff;
pub mod init;
pub mod sync;
pub mod teams;
