use anyhow::Result;
use tavern_werewolf::{Moderator, Player, RandomPlayer, seat_name};

use crate::config::TavernConfig;

/// Handle the `werewolf` command: a full game with random players.
pub async fn handle(seed: Option<u64>, config: &TavernConfig) -> Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "Starting werewolf simulation");

    let players: Vec<Box<dyn Player>> = (0..config.werewolf.lineup.len())
        .map(|i| Box::new(RandomPlayer::new(seat_name(i), seed.wrapping_add(i as u64))) as Box<dyn Player>)
        .collect();

    let mut moderator = Moderator::new(config.werewolf.clone(), players)?;
    let outcome = moderator.run().await?;

    for announcement in moderator.transcript() {
        if announcement.content.is_empty() {
            continue;
        }
        println!(
            "[round {}] {} -> {}: {}",
            announcement.round,
            announcement.speaker,
            announcement.audience.join(","),
            announcement.content
        );
    }

    println!();
    println!("Seats:");
    for seat in moderator.state().seats() {
        let status = if seat.alive { "alive" } else { "dead" };
        println!("  {:<9} {:<9} {}", seat.name, seat.role, status);
    }
    for death in &outcome.deaths {
        println!("  round {}: {} ({:?})", death.round, death.player, death.cause);
    }
    match outcome.winner {
        Some(team) => println!("Winner: {team:?} after {} round(s)", outcome.rounds_played),
        None => println!("No winner after {} round(s)", outcome.rounds_played),
    }
    Ok(())
}
