pub mod role_resolver;
pub mod snapshot;
pub mod store;

pub use role_resolver::{decode_token_payload, resolve_role, TokenPayloadError};
pub use snapshot::read_persisted_record;
pub use store::SessionStore;
