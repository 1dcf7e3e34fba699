pub mod analyze;
pub mod replay;
