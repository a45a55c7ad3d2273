pub mod decode;
pub mod pitch;
pub mod smooth;
