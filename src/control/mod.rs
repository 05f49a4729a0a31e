// Player control - MPRIS over the D-Bus session bus, plus the OS-side helpers
// (mixer volume, launching the client) that live outside the player itself

use crate::error::SpoError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::process::{Command, Stdio};
use tracing::{debug, info};
use zbus::zvariant::{OwnedValue, Value};
use zbus::{dbus_proxy, CacheProperties, Connection};

pub const MPRIS_PATH: &str = "/org/mpris/MediaPlayer2";

#[dbus_proxy(
    interface = "org.mpris.MediaPlayer2.Player",
    default_service = "org.mpris.MediaPlayer2.spotify",
    default_path = "/org/mpris/MediaPlayer2"
)]
trait MediaPlayer2Player {
    fn play_pause(&self) -> zbus::Result<()>;
    fn pause(&self) -> zbus::Result<()>;
    fn next(&self) -> zbus::Result<()>;
    fn previous(&self) -> zbus::Result<()>;
    fn open_uri(&self, uri: &str) -> zbus::Result<()>;

    #[dbus_proxy(property)]
    fn metadata(&self) -> zbus::Result<HashMap<String, OwnedValue>>;
}

/// Fire-and-forget playback commands plus a now-playing query
#[async_trait]
pub trait PlaybackControl: Send + Sync {
    async fn play_pause(&self) -> Result<()>;
    async fn pause(&self) -> Result<()>;
    async fn next(&self) -> Result<()>;
    async fn previous(&self) -> Result<()>;
    async fn open_uri(&self, uri: &str) -> Result<()>;
    async fn current_track(&self) -> Result<TrackMetadata>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl TrackMetadata {
    /// Read the xesam fields we show; anything missing or oddly typed stays None
    pub fn from_mpris(metadata: &HashMap<String, OwnedValue>) -> Self {
        let field = |key: &str| metadata.get(key).and_then(|v| first_text(v));

        Self {
            title: field("xesam:title"),
            artist: field("xesam:artist"),
            album: field("xesam:album"),
        }
    }
}

impl fmt::Display for TrackMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "Unknown".to_string());
        writeln!(f, "Song:\t{}", show(&self.title))?;
        writeln!(f, "Artist:\t{}", show(&self.artist))?;
        write!(f, "Album:\t{}", show(&self.album))
    }
}

// xesam:artist is a string array, title/album plain strings
fn first_text(value: &Value<'_>) -> Option<String> {
    match value {
        Value::Str(s) if !s.as_str().is_empty() => Some(s.as_str().to_string()),
        Value::Array(items) => items.get().iter().find_map(first_text),
        Value::Value(inner) => first_text(inner),
        _ => None,
    }
}

pub struct MprisPlayer {
    proxy: MediaPlayer2PlayerProxy<'static>,
}

impl MprisPlayer {
    /// Connect to the session bus and make sure someone actually owns `bus_name`
    pub async fn connect(bus_name: &str) -> Result<Self> {
        let not_running = || SpoError::PlayerUnreachable {
            bus_name: bus_name.to_string(),
        };

        let connection = Connection::session().await.map_err(|e| {
            debug!("Session bus unavailable: {e}");
            not_running()
        })?;

        let dbus = zbus::fdo::DBusProxy::new(&connection).await?;
        let name = zbus::names::BusName::try_from(bus_name.to_string())
            .with_context(|| format!("invalid bus name {bus_name}"))?;
        if !dbus.name_has_owner(name).await? {
            return Err(not_running().into());
        }

        // Metadata must be read fresh, it changes right after next/prev/open
        let proxy = MediaPlayer2PlayerProxy::builder(&connection)
            .destination(bus_name.to_string())?
            .path(MPRIS_PATH)?
            .cache_properties(CacheProperties::No)
            .build()
            .await?;

        info!("Connected to {}", bus_name);
        Ok(Self { proxy })
    }
}

#[async_trait]
impl PlaybackControl for MprisPlayer {
    async fn play_pause(&self) -> Result<()> {
        Ok(self.proxy.play_pause().await?)
    }

    async fn pause(&self) -> Result<()> {
        Ok(self.proxy.pause().await?)
    }

    async fn next(&self) -> Result<()> {
        Ok(self.proxy.next().await?)
    }

    async fn previous(&self) -> Result<()> {
        Ok(self.proxy.previous().await?)
    }

    async fn open_uri(&self, uri: &str) -> Result<()> {
        debug!("OpenUri {}", uri);
        Ok(self.proxy.open_uri(uri).await?)
    }

    async fn current_track(&self) -> Result<TrackMetadata> {
        let metadata = self.proxy.metadata().await?;
        Ok(TrackMetadata::from_mpris(&metadata))
    }
}

/// Start the player in the background; we don't wait for it to come up
pub fn launch_player(command: &[String]) -> Result<()> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| anyhow::anyhow!("player launch command is empty"))?;

    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to launch {program}"))?;

    info!("Launched {}", program);
    Ok(())
}

/// Run the configured mixer command (amixer by default)
pub fn adjust_volume(command: &[String]) -> Result<()> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| anyhow::anyhow!("volume command is empty"))?;

    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .status()
        .with_context(|| format!("failed to run {program}"))?;

    if !status.success() {
        return Err(SpoError::Command {
            program: program.clone(),
            status: status.to_string(),
        }
        .into());
    }
    Ok(())
}
