//! Shared configuration types for twitter-compose.
//!
//! Parsing-level types only: the `twitter-compose.yml` model, the stream
//! parameter vocabulary accepted by the stream endpoint, and the credentials
//! file. No I/O happens here; callers hand in already-read text.

pub mod compose;
pub mod credentials;
pub mod parameters;

pub use compose::{
    DEFAULT_IMAGE_NAME, OptionValue, OutputDriver, StreamRuleModel, TagConflict, TwitterComposeModel,
};
pub use credentials::{Credentials, CredentialsError};
pub use parameters::{
    Expansion, MediaField, PlaceField, PollField, StreamParameters, TweetField, UserField,
};
