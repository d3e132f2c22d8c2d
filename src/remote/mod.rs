//! Optional network collaborators
//!
//! Name generation and the profile backend are decorative. The core never waits on
//! them and never reads their results back into state.

mod error;
pub mod names;
pub mod profile;

pub use error::RemoteError;
pub use names::{ChatNameGenerator, NameGenerator, NameRequest, generate_or_fallback};
pub use profile::{
    FriendEdge, LeaderboardEntry, ProfileBackend, ProfileMirror, ProfileRecord,
    RestProfileBackend, toggle_friend,
};
