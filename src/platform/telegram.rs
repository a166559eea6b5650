use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use grammers_client::session::{PackedChat, Session};
use grammers_client::types::{Chat, Media, Message};
use grammers_client::{
    Client, Config as ClientConfig, InitParams, InputMessage, SignInError, Update,
};
use tracing::info;

use super::{ChatHandle, ChatPlatform, MediaKind, NewMessage, PlatformMessage};
use crate::config::Config;

const SESSION_FILE: &str = "media_forwarder.session";

pub type TelegramHandle = ChatHandle<PackedChat>;

/// Telegram session, authenticated as a regular user account.
pub struct TelegramPlatform {
    client: Client,
}

impl TelegramPlatform {
    /// Establish the session, signing in interactively on first run.
    pub async fn connect(config: &Config) -> Result<Self> {
        let params = InitParams {
            proxy_url: config.proxy.as_ref().map(|proxy| proxy.url()),
            ..Default::default()
        };

        let client = Client::connect(ClientConfig {
            session: Session::load_file_or_create(SESSION_FILE)
                .context("failed to open session file")?,
            api_id: config.api_id,
            api_hash: config.api_hash.clone(),
            params,
        })
        .await
        .context("failed to connect to Telegram")?;

        if !client.is_authorized().await? {
            sign_in(&client).await?;
            client
                .session()
                .save_to_file(SESSION_FILE)
                .context("failed to save session file")?;
        }

        Ok(Self { client })
    }
}

/// First-run login: phone and code prompts, with the two-factor password
/// as a follow-up when the account has one.
async fn sign_in(client: &Client) -> Result<()> {
    let phone = prompt("Phone number (international format): ")?;
    let token = client
        .request_login_code(&phone)
        .await
        .context("failed to request login code")?;
    let code = prompt("Login code: ")?;

    match client.sign_in(&token, &code).await {
        Ok(_) => {}
        Err(SignInError::PasswordRequired(password_token)) => {
            let hint = password_token.hint().unwrap_or("none");
            let password = prompt(&format!("Password (hint: {hint}): "))?;
            client
                .check_password(password_token, password)
                .await
                .context("two-factor password rejected")?;
        }
        Err(err) => return Err(err).context("sign-in failed"),
    }

    info!("signed in, session saved for future runs");
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(message.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn handle_from_chat(chat: &Chat) -> TelegramHandle {
    ChatHandle {
        id: chat.id(),
        name: chat.name().to_string(),
        raw: chat.pack(),
    }
}

#[async_trait]
impl ChatPlatform for TelegramPlatform {
    type Raw = PackedChat;
    type Message = Message;

    async fn self_name(&self) -> Result<String> {
        let me = self.client.get_me().await?;
        Ok(me
            .username()
            .map(str::to_string)
            .unwrap_or_else(|| me.full_name()))
    }

    async fn lookup(&self, identifier: &str) -> Result<Option<TelegramHandle>> {
        // Bare numeric ids carry no access hash, so they can only be
        // resolved through the dialog scan.
        if identifier.parse::<i64>().is_ok() {
            return Ok(None);
        }

        let username = identifier.strip_prefix('@').unwrap_or(identifier);
        let chat = self.client.resolve_username(username).await?;
        Ok(chat.as_ref().map(handle_from_chat))
    }

    async fn dialogs(&self) -> Result<Vec<TelegramHandle>> {
        let mut iter = self.client.iter_dialogs();
        let mut handles = Vec::new();
        while let Some(dialog) = iter.next().await? {
            handles.push(handle_from_chat(dialog.chat()));
        }
        Ok(handles)
    }

    async fn history_oldest_first(&self, source: &TelegramHandle) -> Result<Vec<Message>> {
        // The wire protocol serves history newest-first; buffer the
        // snapshot and reverse it so the target receives the original
        // timeline order.
        let mut iter = self.client.iter_messages(source.raw);
        let mut messages = Vec::new();
        while let Some(message) = iter.next().await? {
            messages.push(message);
        }
        messages.reverse();
        Ok(messages)
    }

    async fn forward_message(
        &self,
        message: &Message,
        source: &TelegramHandle,
        target: &TelegramHandle,
    ) -> Result<()> {
        self.client
            .forward_messages(target.raw, &[message.id()], source.raw)
            .await?;
        Ok(())
    }

    async fn send_media_copy(
        &self,
        message: &Message,
        caption: &str,
        target: &TelegramHandle,
    ) -> Result<()> {
        let Some(media) = message.media() else {
            bail!("message {} carries no media payload", message.id());
        };
        self.client
            .send_message(target.raw, InputMessage::text(caption).copy_media(&media))
            .await?;
        Ok(())
    }

    async fn send_text(&self, text: &str, target: &TelegramHandle) -> Result<()> {
        self.client
            .send_message(target.raw, InputMessage::text(text))
            .await?;
        Ok(())
    }

    async fn next_event(&self) -> Result<NewMessage<Message>> {
        loop {
            match self.client.next_update().await? {
                Update::NewMessage(message) => {
                    return Ok(NewMessage {
                        chat_id: message.chat().id(),
                        message,
                    });
                }
                _ => continue,
            }
        }
    }
}

impl PlatformMessage for Message {
    fn id(&self) -> i32 {
        Message::id(self)
    }

    fn text(&self) -> &str {
        Message::text(self)
    }

    fn media_kind(&self) -> MediaKind {
        match self.media() {
            None => MediaKind::None,
            Some(Media::Photo(_)) => MediaKind::Photo,
            Some(Media::Document(_)) => MediaKind::Document,
            Some(Media::Sticker(_)) => MediaKind::Document,
            Some(Media::WebPage(_)) => MediaKind::WebPagePreview,
            Some(Media::Poll(_)) => MediaKind::Poll,
            Some(_) => MediaKind::Other,
        }
    }
}
