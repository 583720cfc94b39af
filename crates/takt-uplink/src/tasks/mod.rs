pub mod poll;
pub mod publish;
