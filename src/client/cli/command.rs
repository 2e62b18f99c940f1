/// A line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    Clear,
    Empty,
    Message(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.to_lowercase().as_str() {
            "" => Command::Empty,
            "/bye" | "/exit" | "/quit" => Command::Exit,
            "/help" => Command::Help,
            "/clear" => Command::Clear,
            _ => Command::Message(input.to_string()),
        }
    }
}
