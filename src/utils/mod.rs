pub mod email;
pub mod ids;
