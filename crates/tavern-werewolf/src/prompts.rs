//! Moderator announcements and the reply formats they ask for.

fn names(players: &[String]) -> String {
    players.join(", ")
}

pub fn to_wolves(wolves: &[String]) -> String {
    format!(
        "{}, you are playing werewolf. You are a werewolf and must kill a player tonight. \
         If you are the only werewolf, just pick a player. Otherwise discuss with your \
         teammates and reach an agreement. Reply in the following format:\n\
         {{\n    \"thought\": \"your thought\",\n    \"speak\": \"your thought summarized as a speech\",\n    \
         \"agreement\": \"whether the discussion reached agreement (true/false)\"\n}}",
        names(wolves)
    )
}

pub fn to_wolves_vote(alive: &[String]) -> String {
    format!(
        "Which player do you vote to kill? Living players: {}. Reply in the following format:\n\
         {{\n    \"thought\": \"your thought\",\n    \"speak\": \"the name of one player\"\n}}",
        names(alive)
    )
}

pub fn to_wolves_result(victim: Option<&str>) -> String {
    match victim {
        Some(name) => format!("The player with the most votes is {name}."),
        None => "No agreement was reached, nobody is attacked tonight.".to_string(),
    }
}

pub fn to_witch_resurrect(witch: &str, dead: &str) -> String {
    format!(
        "{witch}, you are playing werewolf. You are the witch. Tonight {dead} was killed. \
         Do you want to resurrect {dead}? Reply in the following format:\n\
         {{\n    \"thought\": \"your thought\",\n    \"speak\": \"your thought summarized as a speech\",\n    \
         \"resurrect\": true/false\n}}"
    )
}

pub fn to_witch_poison(alive: &[String]) -> String {
    format!(
        "Do you want to poison one of the living players ({})? Name the player in \"speak\". \
         Reply in the following format:\n\
         {{\n    \"thought\": \"your thought\",\n    \"speak\": \"your thought summarized as a speech\",\n    \
         \"eliminate\": true/false\n}}",
        names(alive)
    )
}

pub fn to_seer(seer: &str, alive: &[String]) -> String {
    format!(
        "{seer}, you are playing werewolf. You are the seer. Which of these players do you \
         want to inspect tonight: {}? Reply in the following format:\n\
         {{\n    \"thought\": \"your thought\",\n    \"speak\": \"the name of one player\"\n}}",
        names(alive)
    )
}

pub fn to_seer_result(player: &str, label: &str) -> String {
    format!("Okay, the role of {player} is {label}.")
}

pub fn to_all_danger(dead: &[String]) -> String {
    format!(
        "The day is coming, all players open your eyes. Last night the following players died: {}.",
        names(dead)
    )
}

pub fn to_all_peace() -> String {
    "The day is coming, all players open your eyes. Last night was peaceful, no player died."
        .to_string()
}

pub fn to_all_discuss(alive: &[String]) -> String {
    format!(
        "The living players are {}. Given the rules, your role and what you know, what do \
         you want to say to the others before voting someone out? You may decide whether to \
         reveal your role. Reply in the following format:\n\
         {{\n    \"thought\": \"your thought\",\n    \"speak\": \"your thought summarized\"\n}}",
        names(alive)
    )
}

pub fn to_all_vote(alive: &[String]) -> String {
    format!(
        "The living players are {}. You must vote to eliminate one of them, pick the player \
         you believe is a werewolf. Reply in the following format:\n\
         {{\n    \"thought\": \"your thought\",\n    \"speak\": \"the name of one player\"\n}}",
        names(alive)
    )
}

pub fn to_all_result(eliminated: Option<&str>) -> String {
    match eliminated {
        Some(name) => format!("{name} has been voted out."),
        None => "The vote was inconclusive, nobody is eliminated.".to_string(),
    }
}

pub fn to_all_continue() -> String {
    "The game goes on.".to_string()
}

pub fn to_all_wolf_win() -> String {
    "The werewolves have prevailed and taken over the village. Better luck next time!".to_string()
}

pub fn to_all_village_win() -> String {
    "The game is over. The werewolves have been defeated, and the village is safe once again!"
        .to_string()
}
