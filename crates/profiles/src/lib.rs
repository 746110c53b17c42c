//! Community profiles: registry reads, IPFS-pinned profile documents and
//! the upsert/delete workflows that write the registry through the
//! sponsored user-operation pipeline.

mod error;
pub mod pin;
pub mod reads;
pub mod types;
pub mod upsert;
pub mod username;

pub use error::ProfileError;
pub use pin::{PinataClient, Pinner};
pub use reads::{
    get_profile_from_address, get_profile_from_id, get_profile_from_username,
    get_profile_uri_from_id,
};
pub use types::{Profile, ProfileWithTokenId, cid_from_uri, format_profile_image_links};
pub use upsert::{
    DEFAULT_PROFILE_IMAGE_IPFS_HASH, ProfileImage, ProfileImages, ProfileMetadata, delete_profile,
    upsert_profile,
};
pub use username::suggest_username;
