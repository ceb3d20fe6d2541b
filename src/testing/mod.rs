//! Small hand-built BIR graphs shared by the unit tests.

mod cases;

pub use self::cases::*;
