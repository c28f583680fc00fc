pub mod logging;
pub mod pidfile;
pub mod text;
