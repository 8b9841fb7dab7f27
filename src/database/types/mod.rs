mod tar_id;
mod urn_uuid;

pub use tar_id::TarId;
pub use urn_uuid::{UrnUuid, UrnUuidError};
