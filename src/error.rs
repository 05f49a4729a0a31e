// Error types for spo
// Only the failures callers actually branch on get a variant; everything else rides in anyhow

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpoError {
    /// Nothing owns the player's bus name - client not running
    #[error("cannot connect to player at {bus_name}")]
    PlayerUnreachable { bus_name: String },

    /// Raw terminal read failed (detached tty, closed stdin, ...)
    #[error("failed to read from terminal")]
    InputRead(#[source] io::Error),

    /// Writing a picker frame failed
    #[error("failed to draw to terminal")]
    Render(#[source] io::Error),

    #[error("spotify credentials missing - set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET or add them to the config file")]
    MissingCredentials,

    #[error("spotify api returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("`{program}` exited with {status}")]
    Command { program: String, status: String },
}
