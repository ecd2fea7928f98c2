pub mod tactics;
pub mod spinner;
pub mod sniper;
pub mod rammer;

pub use spinner::SpinnerPolicy;
pub use sniper::SniperPolicy;
pub use rammer::RammerPolicy;
