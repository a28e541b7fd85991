pub mod cache;
pub mod dispatch;
pub mod extract;
pub mod logs;
pub mod maps;
pub mod run;
pub mod validate;
