pub mod print;
pub mod system;
mod unused;
pub use unused::Unused;

pub mod prelude {
    pub use crate::system;
    pub use crate::system::ResultIn;
    pub use crate::{error_context, errorln, hintln, infoln, verboseln};
    pub use error_stack::{report, Report, Result, ResultExt};
}
