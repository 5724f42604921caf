pub mod create;
pub mod interactive;
