pub mod admin_set;
pub mod beneficiary;
pub mod campaign;
pub mod claims;
pub mod controller;
pub mod governance;
pub mod marketplace;

pub use admin_set::*;
pub use beneficiary::*;
pub use campaign::*;
pub use claims::*;
pub use controller::*;
pub use governance::*;
pub use marketplace::*;
