pub mod motor;
pub mod speech;
