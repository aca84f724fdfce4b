use teloxide::utils::command::BotCommands;

#[derive(Debug, Clone, PartialEq, Eq, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "display help.")]
    Help,
    #[command(description = "show the welcome message.")]
    Start,
    #[command(description = "start the quiz.")]
    Quiz,
    #[command(description = "show your score.")]
    Score,
}

pub(crate) fn help_text() -> String {
    Command::descriptions().to_string()
}
