/*!
 * Credential resolution for the remote services.
 *
 * Keys are resolved once at startup: process environment first, then an
 * interactive masked prompt. The resulting store is read-only for the rest
 * of the process lifetime and is handed to each adapter at construction —
 * no adapter reads or writes the process environment afterwards.
 */

use std::collections::HashMap;
use std::env;

use log::warn;

/// The remote services a credential can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Groq (transcription and reasoning share one key)
    Groq,
    /// Google Veo video generation
    Veo,
    /// Runway video generation
    Runway,
    /// fal.ai video generation
    Fal,
}

impl Service {
    /// Environment variable holding this service's key
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::Veo => "GEMINI_API_KEY",
            Self::Runway => "RUNWAY_API_KEY",
            Self::Fal => "FAL_KEY",
        }
    }

    /// Human-readable service name for prompts and log lines
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Groq => "Groq",
            Self::Veo => "Google Veo",
            Self::Runway => "Runway",
            Self::Fal => "fal.ai",
        }
    }
}

/// Source a credential can be resolved from
trait CredentialSource {
    /// Look up a credential for the given service, `None` when unavailable
    fn lookup(&self, service: Service) -> Option<String>;
}

/// Reads keys from the process environment
struct EnvSource;

impl CredentialSource for EnvSource {
    fn lookup(&self, service: Service) -> Option<String> {
        env::var(service.env_var()).ok().filter(|v| !v.is_empty())
    }
}

/// Asks the user for a key on the terminal, input masked.
/// Whatever the user supplies is accepted, including an empty line.
struct PromptSource;

impl CredentialSource for PromptSource {
    fn lookup(&self, service: Service) -> Option<String> {
        let prompt = format!("Enter {} API key (leave blank to skip): ", service.display_name());
        match rpassword::prompt_password(prompt) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Could not read {} key from terminal: {}", service.display_name(), e);
                None
            }
        }
    }
}

/// Resolved credentials, one optional bearer token per service
#[derive(Debug, Default, Clone)]
pub struct CredentialStore {
    keys: HashMap<Service, String>,
}

impl CredentialStore {
    /// Resolve the given services from the environment only.
    /// Missing keys stay absent; useful for non-interactive runs and tests.
    pub fn from_env(services: &[Service]) -> Self {
        Self::resolve_with(services, &EnvSource, None)
    }

    /// Resolve the given services from the environment, falling back to an
    /// interactive masked prompt for each key the environment lacks.
    pub fn resolve_interactive(services: &[Service]) -> Self {
        Self::resolve_with(services, &EnvSource, Some(&PromptSource))
    }

    fn resolve_with(
        services: &[Service],
        primary: &dyn CredentialSource,
        fallback: Option<&dyn CredentialSource>,
    ) -> Self {
        let mut keys = HashMap::new();
        for &service in services {
            let value = primary
                .lookup(service)
                .or_else(|| fallback.and_then(|f| f.lookup(service)))
                .filter(|v| !v.is_empty());
            match value {
                Some(v) => {
                    keys.insert(service, v);
                }
                None => {
                    warn!(
                        "No {} credential configured ({} unset); the dependent stage will be skipped",
                        service.display_name(),
                        service.env_var()
                    );
                }
            }
        }
        Self { keys }
    }

    /// Build a store from explicit key/value pairs, for tests
    pub fn from_pairs(pairs: &[(Service, &str)]) -> Self {
        Self {
            keys: pairs
                .iter()
                .map(|(s, v)| (*s, (*v).to_string()))
                .collect(),
        }
    }

    /// The key for a service, if one was resolved
    pub fn get(&self, service: Service) -> Option<&str> {
        self.keys.get(&service).map(String::as_str)
    }

    /// Whether a non-empty key was resolved for the service
    pub fn has(&self, service: Service) -> bool {
        self.keys.contains_key(&service)
    }
}
