pub mod authority;
pub mod bus;

pub use authority::{Authority, AuthorityResponse, NewAuthority};
pub use bus::{Bus, BusAction, BusPatch, BusStatus, NewBus, DEFAULT_CAPACITY, DEFAULT_DRIVER};
