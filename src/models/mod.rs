pub mod class;
pub mod common;
pub mod lesson_pack;
pub mod lesson_request;
pub mod note;
pub mod payment;
pub mod profile;
pub mod student;
pub mod studio;
pub mod waiver;

pub use class::*;
pub use common::*;
pub use lesson_pack::*;
pub use lesson_request::*;
pub use note::*;
pub use payment::*;
pub use profile::*;
pub use student::*;
pub use studio::*;
pub use waiver::*;
