use anyhow::Result;
use tavern_werewolf::{majority, tally};

/// Handle the `tally` command.
pub fn handle(votes: &[String]) -> Result<()> {
    for (candidate, count) in tally(votes) {
        println!("  {candidate}: {count}");
    }
    match majority(votes) {
        Some(winner) => println!("Majority: {winner}"),
        None => println!("Majority: no winner"),
    }
    Ok(())
}
