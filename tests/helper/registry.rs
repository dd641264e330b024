//! Registry test utilities

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use npm_unpublish::unpublish::error::{OtpError, RegistryError};
use npm_unpublish::unpublish::otp::OtpProvider;
use npm_unpublish::unpublish::packument::Packument;
use npm_unpublish::unpublish::registry::RegistryClient;

/// A request the fake registry received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch(String),
    DeletePackage {
        rev: String,
        otp: Option<String>,
    },
    Put {
        rev: String,
        otp: Option<String>,
    },
    DeleteTarball {
        path: String,
        rev: String,
        otp: Option<String>,
    },
}

struct State {
    packument: Option<Packument>,
    revision: u32,
    calls: Vec<Call>,
}

/// In-memory registry holding one package
///
/// Every successful write bumps the revision, writes with a stale revision
/// fail with a conflict, and writes without the expected OTP are challenged.
pub struct FakeRegistry {
    state: Mutex<State>,
    required_otp: Option<String>,
    races_tarball_delete: bool,
}

impl FakeRegistry {
    pub fn new(mut packument: Packument) -> Self {
        let revision = 1;
        packument.rev = Some(format!("{revision}-fake"));
        Self {
            state: Mutex::new(State {
                packument: Some(packument),
                revision,
                calls: Vec::new(),
            }),
            required_otp: None,
            races_tarball_delete: false,
        }
    }

    /// Registry that does not know the package
    pub fn empty() -> Self {
        Self {
            state: Mutex::new(State {
                packument: None,
                revision: 0,
                calls: Vec::new(),
            }),
            required_otp: None,
            races_tarball_delete: false,
        }
    }

    pub fn with_required_otp(mut self, otp: &str) -> Self {
        self.required_otp = Some(otp.to_string());
        self
    }

    /// Let another client write just before each tarball delete arrives
    pub fn with_write_racing_tarball_delete(mut self) -> Self {
        self.races_tarball_delete = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn packument(&self) -> Option<Packument> {
        self.state.lock().unwrap().packument.clone()
    }

    /// Simulate a concurrent write by someone else
    pub fn bump_revision(&self) {
        Self::bump(&mut self.state.lock().unwrap());
    }

    fn authorize(&self, otp: &Option<String>) -> Result<(), RegistryError> {
        match &self.required_otp {
            Some(required) if otp.as_ref() != Some(required) => Err(RegistryError::OtpRequired),
            _ => Ok(()),
        }
    }

    fn check_revision(state: &State, rev: &str) -> Result<(), RegistryError> {
        if state.packument.is_none() {
            return Err(RegistryError::NotFound(rev.to_string()));
        }
        if rev != format!("{}-fake", state.revision) {
            return Err(RegistryError::Conflict(rev.to_string()));
        }
        Ok(())
    }

    fn bump(state: &mut State) {
        state.revision += 1;
        let rev = format!("{}-fake", state.revision);
        if let Some(packument) = state.packument.as_mut() {
            packument.rev = Some(rev);
        }
    }
}

#[async_trait]
impl RegistryClient for FakeRegistry {
    async fn fetch_packument(&self, package_name: &str) -> Result<Packument, RegistryError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Fetch(package_name.to_string()));
        state
            .packument
            .clone()
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()))
    }

    async fn delete_package(
        &self,
        _package_name: &str,
        rev: &str,
        otp: Option<String>,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeletePackage {
            rev: rev.to_string(),
            otp: otp.clone(),
        });
        self.authorize(&otp)?;
        Self::check_revision(&state, rev)?;
        state.packument = None;
        Ok(())
    }

    async fn put_packument(
        &self,
        _package_name: &str,
        rev: &str,
        packument: &Packument,
        otp: Option<String>,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Put {
            rev: rev.to_string(),
            otp: otp.clone(),
        });
        self.authorize(&otp)?;
        Self::check_revision(&state, rev)?;
        state.packument = Some(packument.clone());
        Self::bump(&mut state);
        Ok(())
    }

    async fn delete_tarball(
        &self,
        tarball_path: &str,
        rev: &str,
        otp: Option<String>,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeleteTarball {
            path: tarball_path.to_string(),
            rev: rev.to_string(),
            otp: otp.clone(),
        });
        if self.races_tarball_delete {
            Self::bump(&mut state);
        }
        self.authorize(&otp)?;
        Self::check_revision(&state, rev)?;
        Self::bump(&mut state);
        Ok(())
    }
}

/// OTP source that always answers with the same password
pub struct FixedOtp(pub &'static str);

#[async_trait]
impl OtpProvider for FixedOtp {
    async fn one_time_password(&self) -> Result<String, OtpError> {
        Ok(self.0.to_string())
    }
}

/// Build a packument for `pkg` with the given versions and dist-tags
pub fn packument(versions: &[&str], tags: &[(&str, &str)]) -> Packument {
    let versions: serde_json::Map<String, serde_json::Value> = versions
        .iter()
        .map(|v| {
            (
                v.to_string(),
                json!({
                    "name": "pkg",
                    "version": v,
                    "dist": { "tarball": format!("https://registry.example.com/pkg/-/pkg-{v}.tgz") }
                }),
            )
        })
        .collect();
    let tags: serde_json::Map<String, serde_json::Value> = tags
        .iter()
        .map(|(tag, v)| (tag.to_string(), json!(v)))
        .collect();

    serde_json::from_value(json!({
        "_id": "pkg",
        "name": "pkg",
        "versions": versions,
        "dist-tags": tags,
        "_attachments": {}
    }))
    .unwrap()
}
