pub mod markers;
pub mod overlays;
pub mod symbology;
pub mod view;

pub use markers::*;
pub use overlays::*;
pub use symbology::*;
pub use view::*;
