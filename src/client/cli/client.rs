use super::command::Command;
use super::io::{
    Speaker, error_line, print_colored, read_user_input, show_help, show_welcome, tools_summary,
};

use crate::client::backend::ChatBackend;
use crate::client::relay::{Exchange, Relay};
use crate::types::Turn;

use anyhow::Result;
use tokio::io::AsyncBufRead;

/// Interactive session. Owns the conversation history; nothing else writes it.
pub struct CliClient<B, C, R> {
    relay: Relay<B, C>,
    reader: R,
    history: Vec<Turn>,
}

impl<B, C, R> CliClient<B, C, R>
where
    B: ChatBackend,
    C: Clone,
    R: AsyncBufRead + Unpin,
{
    pub fn new(relay: Relay<B, C>, reader: R) -> Self {
        CliClient {
            relay,
            reader,
            history: vec![],
        }
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Runs until an exit command, end of input or Ctrl+C.
    pub async fn chat(&mut self) -> Result<()> {
        self.chat_until(tokio::signal::ctrl_c()).await
    }

    /// Like [`chat`](Self::chat), but stops when `interrupt` resolves, whether
    /// the session is waiting for input or for the model.
    pub async fn chat_until<F: Future>(&mut self, interrupt: F) -> Result<()> {
        show_welcome();
        tokio::pin!(interrupt);
        loop {
            let user_input = tokio::select! {
                line = read_user_input(&mut self.reader) => line?,
                _ = &mut interrupt => {
                    interrupted();
                    return Ok(());
                }
            };
            let Some(user_input) = user_input else {
                println!();
                print_colored(Speaker::System, "Goodbye! (EOF)");
                return Ok(());
            };

            match Command::parse(&user_input) {
                Command::Exit => {
                    print_colored(Speaker::System, "Goodbye! Thanks for chatting!");
                    return Ok(());
                }
                Command::Help => show_help(),
                Command::Clear => {
                    self.history.clear();
                    print_colored(Speaker::System, "Conversation history cleared!");
                }
                Command::Empty => continue,
                Command::Message(message) => {
                    print_colored(Speaker::System, "Thinking...");
                    // history is only replaced once the turn completes
                    let exchange = tokio::select! {
                        exchange = self.relay.send(self.history.clone(), message) => exchange,
                        _ = &mut interrupt => {
                    interrupted();
                    return Ok(());
                }
                    };
                    self.chat_response(exchange);
                }
            }
        }
    }

    fn chat_response(&mut self, exchange: Exchange) {
        self.history = exchange.history;

        match exchange.outcome {
            Ok(reply) => {
                print_colored(Speaker::Assistant, &reply.text);
                if let Some(summary) = tools_summary(&reply.tools_used, &reply.failed_tools) {
                    print_colored(Speaker::System, &summary);
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "turn failed");
                print_colored(Speaker::System, &error_line(&err));
            }
        }
    }
}

fn interrupted() {
    println!();
    print_colored(Speaker::System, "Goodbye! (Ctrl+C pressed)");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::backend::{BackendError, ChatRequest};
    use crate::client::relay::RelaySettings;
    use crate::types::{ContentBlock, ModelReply, NoContext, StopReason, ToolSet};
    use async_openai::error::OpenAIError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::io::BufReader;

    /// Echoes the user's message, or fails when it says "fail".
    #[derive(Default)]
    struct EchoBackend {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn complete(&self, request: ChatRequest) -> Result<ModelReply, BackendError> {
            *self.calls.lock().unwrap() += 1;
            match request.history.last() {
                Some(Turn::User(text)) if text == "fail" => Err(BackendError::OpenAI(
                    OpenAIError::InvalidArgument("unreachable".into()),
                )),
                Some(Turn::User(text)) => Ok(ModelReply {
                    stop: StopReason::EndTurn,
                    blocks: vec![ContentBlock::Text(format!("echo: {text}"))],
                }),
                _ => Err(BackendError::NoChoices),
            }
        }
    }

    fn client(input: &'static str) -> CliClient<EchoBackend, NoContext, BufReader<&'static [u8]>> {
        let relay = Relay::new(
            EchoBackend::default(),
            ToolSet::new(),
            NoContext(),
            RelaySettings::default(),
        );
        CliClient::new(relay, BufReader::new(input.as_bytes()))
    }

    #[tokio::test]
    async fn stops_at_exit_command() {
        let mut client = client("hello\n/bye\nnever sent\n");
        client.chat().await.unwrap();
        assert_eq!(*client.relay.backend().calls.lock().unwrap(), 1);
        assert_eq!(
            client.history(),
            [Turn::User("hello".into()), Turn::assistant_text("echo: hello")]
        );
    }

    #[tokio::test]
    async fn empty_lines_are_ignored_and_eof_ends_the_session() {
        let mut client = client("\n   \nhi\n");
        client.chat().await.unwrap();
        assert_eq!(*client.relay.backend().calls.lock().unwrap(), 1);
        assert_eq!(client.history().len(), 2);
    }

    #[tokio::test]
    async fn clear_resets_history() {
        let mut client = client("one\n/CLEAR\ntwo\n/quit\n");
        client.chat().await.unwrap();
        assert_eq!(
            client.history(),
            [Turn::User("two".into()), Turn::assistant_text("echo: two")]
        );
    }

    #[tokio::test]
    async fn failed_turn_keeps_the_session_going() {
        let mut client = client("fail\nafter\n/exit\n");
        client.chat().await.unwrap();
        assert_eq!(*client.relay.backend().calls.lock().unwrap(), 2);
        assert_eq!(
            client.history(),
            [Turn::User("after".into()), Turn::assistant_text("echo: after")]
        );
    }

    struct HangingBackend;

    #[async_trait]
    impl ChatBackend for HangingBackend {
        async fn complete(&self, _: ChatRequest) -> Result<ModelReply, BackendError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn interrupt_ends_a_turn_waiting_on_the_model() {
        let relay = Relay::new(
            HangingBackend,
            ToolSet::new(),
            NoContext(),
            RelaySettings::default(),
        );
        let mut client = CliClient::new(relay, BufReader::new("hello\n".as_bytes()));
        let interrupt = tokio::time::sleep(Duration::from_millis(50));

        let finished = tokio::time::timeout(Duration::from_secs(3), client.chat_until(interrupt))
            .await
            .expect("session did not stop on interrupt");
        finished.unwrap();
        assert!(client.history().is_empty());
    }

    #[tokio::test]
    async fn interrupt_ends_a_session_waiting_for_input() {
        let relay = Relay::new(
            EchoBackend::default(),
            ToolSet::new(),
            NoContext(),
            RelaySettings::default(),
        );
        let (reader, _writer) = tokio::io::duplex(64);
        let mut client = CliClient::new(relay, BufReader::new(reader));
        let interrupt = tokio::time::sleep(Duration::from_millis(50));

        tokio::time::timeout(Duration::from_secs(3), client.chat_until(interrupt))
            .await
            .expect("session did not stop on interrupt")
            .unwrap();
        assert_eq!(*client.relay.backend().calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn help_does_not_reach_the_backend() {
        let mut client = client("/help\n");
        client.chat().await.unwrap();
        assert_eq!(*client.relay.backend().calls.lock().unwrap(), 0);
        assert!(client.history().is_empty());
    }
}
