//! One-time password handling for registry writes

use std::future::Future;
use std::io::IsTerminal;

#[cfg(test)]
use mockall::automock;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::unpublish::error::{OtpError, RegistryError, UnpublishError};

/// Source of one-time passwords
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait OtpProvider: Send + Sync {
    /// Obtain a password after the registry asked for one
    async fn one_time_password(&self) -> Result<String, OtpError>;
}

/// Asks on the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptOtp;

#[async_trait::async_trait]
impl OtpProvider for PromptOtp {
    async fn one_time_password(&self) -> Result<String, OtpError> {
        if !std::io::stdin().is_terminal() {
            return Err(OtpError::Unavailable);
        }

        let mut stderr = tokio::io::stderr();
        stderr
            .write_all(b"This operation requires a one-time password.\nEnter OTP: ")
            .await?;
        stderr.flush().await?;

        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await?;

        let otp = line.trim();
        if otp.is_empty() {
            return Err(OtpError::Empty);
        }
        Ok(otp.to_string())
    }
}

/// Never has a password to give
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOtp;

#[async_trait::async_trait]
impl OtpProvider for NoOtp {
    async fn one_time_password(&self) -> Result<String, OtpError> {
        Err(OtpError::Unavailable)
    }
}

enum OtpState {
    Attempt,
    ChallengeReceived,
    Retry,
}

/// Runs registry writes, answering at most one OTP challenge per write.
///
/// A password obtained for one write is sent with the following writes of the
/// same session.
pub struct OtpSession<'a> {
    provider: &'a dyn OtpProvider,
    otp: Option<String>,
}

impl<'a> OtpSession<'a> {
    pub fn new(provider: &'a dyn OtpProvider, otp: Option<String>) -> Self {
        Self { provider, otp }
    }

    /// Password currently sent with writes
    pub fn otp(&self) -> Option<&str> {
        self.otp.as_deref()
    }

    /// Run `write`, retrying it once with a fresh password if the registry
    /// demands one. Any other failure, or a second challenge, is returned as is.
    pub async fn write<T, F, Fut>(&mut self, mut write: F) -> Result<T, UnpublishError>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<T, RegistryError>>,
    {
        let mut state = OtpState::Attempt;
        loop {
            state = match state {
                OtpState::Attempt => match write(self.otp.clone()).await {
                    Err(RegistryError::OtpRequired) => OtpState::ChallengeReceived,
                    result => return result.map_err(UnpublishError::from),
                },
                OtpState::ChallengeReceived => {
                    info!("registry requires a one-time password");
                    self.otp = Some(self.provider.one_time_password().await?);
                    OtpState::Retry
                }
                OtpState::Retry => {
                    debug!("retrying with one-time password");
                    return write(self.otp.clone()).await.map_err(UnpublishError::from);
                }
            };
        }
    }
}
