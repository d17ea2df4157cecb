use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Tutoring bot commands:")]
pub enum Command {
    #[command(description = "Show the main menu")]
    Start,
}
