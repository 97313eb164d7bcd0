pub mod entities;
pub mod session;
