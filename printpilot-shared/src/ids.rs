use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Human-readable reference such as `JOB-20261019-3F2A9C07B1D4`.
///
/// The suffix is the first 48 bits of a random UUIDv4, so two references
/// minted on the same day collide with negligible probability. The store
/// still declares the column UNIQUE.
pub fn mint_reference(prefix: &str, at: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{}-{}-{}", prefix, at.format("%Y%m%d"), &random[..12])
}
