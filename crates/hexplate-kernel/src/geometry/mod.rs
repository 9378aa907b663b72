pub mod hex;
pub mod offset;
pub mod region;
pub mod text;
pub mod wire;

pub use region::Region;
pub use wire::Wire;
