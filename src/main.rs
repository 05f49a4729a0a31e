// spo - a simple command line controller for Spotify
// Playback goes over MPRIS, search goes to the Web API and ends in an inline picker

use anyhow::Result;
use clap::Parser;
use spo::{
    cli::{Args, Command},
    commands::{self, Controller},
    logging::init_logging,
    Config, MprisPlayer, SpoError, SpotifyClient, TerminalInput,
};
use std::io;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging(args.dev)?;

    // Load config - falls back to defaults if missing
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    info!("spo {} starting: {:?}", env!("CARGO_PKG_VERSION"), args.command);

    // Volume is the OS mixer's business, no need for the player to be up
    if let Some(Command::Vol { direction }) = &args.command {
        return commands::change_volume(*direction, &config.volume);
    }

    let player = match MprisPlayer::connect(&config.player.bus_name).await {
        Ok(player) => player,
        Err(e) if matches!(e.downcast_ref::<SpoError>(), Some(SpoError::PlayerUnreachable { .. })) => {
            warn!("{e:#}");
            commands::offer_launch(TerminalInput::new, &mut io::stdout(), &config.player.launch_command)?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let catalog = SpotifyClient::new(config.spotify.clone())?;
    let (width, height) = crossterm::terminal::size()
        .map(|(cols, rows)| (cols as usize, rows as usize))
        .unwrap_or((80, 24));

    let controller = Controller::new(&player, &catalog, &config).with_terminal_size(width, height);
    let mut stdout = io::stdout();
    controller
        .run(args.command.as_ref(), TerminalInput::new, &mut stdout)
        .await
}
