pub mod hint_model;
pub mod input;
pub mod scan;
pub mod session;
pub mod shell;
