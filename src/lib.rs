// spo library - everything the binary wires together
// The picker and result model know nothing about Spotify or D-Bus; those sit behind traits

pub mod cli;       // argument parsing
pub mod commands;  // one command, start to finish
pub mod config;    // settings and preferences
pub mod control;   // player control over MPRIS, volume, launching
pub mod error;     // error types callers branch on
pub mod logging;   // tracing setup
pub mod results;   // search results in display order
pub mod spotify;   // catalog search
pub mod ui;        // raw keyboard input and the picker

// Export the stuff other modules actually use
pub use config::Config;
pub use control::{MprisPlayer, PlaybackControl, TrackMetadata};
pub use error::SpoError;
pub use results::{CatalogItem, ResultEntry, ResultKind, ResultModel};
pub use spotify::{CatalogSearch, SpotifyClient};
pub use ui::{Picker, RawInputSource, TerminalInput};
