mod delta;
mod filter;
mod progress;
mod windowed;

pub use delta::delta;
pub use filter::filter;
pub use progress::progress;
pub use windowed::windowed;
