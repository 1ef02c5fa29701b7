#[macro_use]
extern crate serde;

#[macro_use]
extern crate log;

mod authority;
mod config;
mod elgamal;
mod error;
mod lifecycle;
mod postproc;
mod question;
mod serde_hex;
mod service;
mod store;
mod tally;
mod util;
mod voting;

pub use authority::*;
pub use config::*;
pub use elgamal::*;
pub use error::*;
pub use lifecycle::*;
pub use postproc::*;
pub use question::*;
pub use serde_hex::*;
pub use service::*;
pub use store::*;
pub use tally::*;
pub use util::*;
pub use voting::*;
