pub mod extract;
pub mod referral;
pub mod statement;
pub mod types;

pub use extract::extract_fields;
pub use referral::{Referral, find_referral};
pub use statement::build_statement;
pub use types::{AddressRange, LookupOptions, LookupResult, ResponseEncoding};
