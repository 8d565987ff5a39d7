mod apply;
mod check;
mod groups;
mod init;
mod list;
mod remove;
mod util;

pub use apply::apply;
pub use check::check;
pub use groups::groups;
pub use init::initialize;
pub use list::list;
pub use remove::remove;
