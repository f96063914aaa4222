//! Configuration management for Scopechat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//!
//! Precedence (lowest to highest): built-in defaults, YAML file,
//! `SCOPECHAT_*` environment variables, CLI flags.

use crate::error::{Result, ScopechatError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Scopechat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Completion backend settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Topical domain the assistant is restricted to
    #[serde(default)]
    pub domain: DomainConfig,
    /// Interactive session settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Completion backend configuration
///
/// The backend is any server speaking the OpenAI-compatible
/// `/chat/completions` protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the API, without the `/chat/completions` suffix
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Name of the environment variable holding the API key
    ///
    /// Also used as the keyring user name for the secure store lookup.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Models tried in order until one succeeds
    #[serde(default = "default_candidate_models")]
    pub candidate_models: Vec<String>,

    /// Sampling temperature sent with every request
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Optional client-side timeout per attempt (seconds)
    ///
    /// Unset by default: each attempt runs until the backend answers or fails.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_candidate_models() -> Vec<String> {
    vec![
        "llama-3.1-70b-versatile".to_string(),
        "llama-3.1-8b-instant".to_string(),
        "llama3-70b-8192".to_string(),
        "llama3-8b-8192".to_string(),
    ]
}

fn default_temperature() -> f32 {
    0.5
}

fn default_max_tokens() -> u32 {
    400
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            candidate_models: default_candidate_models(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_seconds: None,
        }
    }
}

/// Domain description, answering rules and admission keywords
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    /// What the assistant covers; first half of the system prompt
    #[serde(default = "default_description")]
    pub description: String,

    /// How the assistant must answer; second half of the system prompt
    #[serde(default = "default_rules")]
    pub rules: String,

    /// Substrings that admit a question into the domain (case-insensitive)
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Reply used when a question is rejected by the keyword gate
    #[serde(default = "default_refusal_message")]
    pub refusal_message: String,

    /// Reply used when every candidate model failed
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

fn default_description() -> String {
    r#"Sem specializiran chatbot za spletno stran "Pametna tehnologija v vsakdanjem življenju".
Odgovarjam samo na vprašanja, ki so neposredno povezana z vsebino te strani.

Na strani so predstavljene teme:
1) Domov:
- kaj je pametna tehnologija v vsakdanjem življenju,
- primeri uporabe (pametni telefoni, domovi, avtomobili, splet),
- koristi (udobje, varnost, učinkovitost).

2) Umetna inteligenca:
- kaj je umetna inteligenca (AI),
- primeri uporabe (navigacija, priporočila, prepoznavanje govora, chatboti),
- razlaga pojma chatbot.

3) Pametni dom:
- kaj je pametni dom in kako deluje (povezane naprave, avtomatizacija, nadzor na daljavo),
- upravljanje s telefonom ali glasovnim asistentom,
- primeri pametnih naprav (žarnice, termostati, varnostne kamere, vtičnice, glasovni pomočniki).

Če uporabnik vpraša nekaj, kar ni povezano z zgornjimi temami, moram vprašanje vljudno zavrniti."#
        .to_string()
}

fn default_rules() -> String {
    r#"Pravila odgovarjanja:
1) Odgovarjaj izključno v slovenščini.
2) Odgovarjaj samo o vsebini spletne strani "Pametna tehnologija v vsakdanjem življenju"
   (Domov / Umetna inteligenca / Pametni dom).
3) Če vprašanje ni povezano s temi temami, vljudno zavrni, npr.:
   "Za to področje nimam informacij, ker sem namenjen razlagi pametne tehnologije, AI in pametnega doma."
4) Odgovori naj bodo kratki, pregledni in slovnično pravilni.
5) Uporabi alineje, kadar naštevaš primere ali korake.
6) Ne izmišljaj si dodatnih dejstev, ki niso na strani; ostani pri razlagi pojmov in primerih iz vsebine."#
        .to_string()
}

fn default_keywords() -> Vec<String> {
    [
        // general
        "pametna tehnologija",
        "pametni telefon",
        "pametni telefoni",
        "udobje",
        "varnost",
        "učinkovitost",
        "tehnologija",
        "vsakdan",
        "vsakdanje življenje",
        "digitalno",
        // AI
        "umetna inteligenca",
        "ai",
        "chatbot",
        "klepetalnik",
        "prepoznavanje govora",
        "navigacija",
        "priporočila",
        "priporočilni",
        "algoritem",
        "priporočilni algoritem",
        // smart home
        "pametni dom",
        "smart home",
        "avtomatizacija",
        "nadzor na daljavo",
        "glasovni asistent",
        "pametne žarnice",
        "žarnice",
        "termostat",
        "varnostne kamere",
        "kamera",
        "pametne vtičnice",
        "vtičnice",
        "glasovni pomočniki",
        "povezane naprave",
    ]
    .iter()
    .map(|k| k.to_string())
    .collect()
}

fn default_refusal_message() -> String {
    "Za to vprašanje nimam informacij, ker sem namenjen samo razlagi vsebine strani \
»Pametna tehnologija v vsakdanjem življenju« (pametna tehnologija, umetna inteligenca, pametni dom). \
Lahko vprašaš npr. kaj je pametni dom, kaj je umetna inteligenca ali kaj je chatbot."
        .to_string()
}

fn default_fallback_message() -> String {
    "Trenutno imam tehnične težave pri povezavi z jezikovnim modelom (API napaka). \
Poskusi prosim ponovno čez nekaj trenutkov."
        .to_string()
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            description: default_description(),
            rules: default_rules(),
            keywords: default_keywords(),
            refusal_message: default_refusal_message(),
            fallback_message: default_fallback_message(),
        }
    }
}

/// Interactive session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Reject out-of-domain questions before contacting the backend
    #[serde(default = "default_domain_gate")]
    pub domain_gate: bool,

    /// Prompt shown by the interactive reader
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Title printed when a session starts
    #[serde(default = "default_title")]
    pub title: String,

    /// One-line description printed under the title
    #[serde(default = "default_caption")]
    pub caption: String,
}

fn default_domain_gate() -> bool {
    true
}

fn default_prompt() -> String {
    "Vpiši vprašanje> ".to_string()
}

fn default_title() -> String {
    "Pametni pomočnik".to_string()
}

fn default_caption() -> String {
    "Odgovarjam izključno v slovenščini in samo o vsebini spletne strani \
     »Pametna tehnologija v vsakdanjem življenju«."
        .to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            domain_gate: default_domain_gate(),
            prompt: default_prompt(),
            title: default_title(),
            caption: default_caption(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ScopechatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ScopechatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_base) = std::env::var("SCOPECHAT_API_BASE") {
            self.provider.api_base = api_base;
        }

        if let Ok(key_env) = std::env::var("SCOPECHAT_API_KEY_ENV") {
            self.provider.api_key_env = key_env;
        }

        if let Ok(models) = std::env::var("SCOPECHAT_MODELS") {
            let models = split_list(&models);
            if models.is_empty() {
                tracing::warn!("Ignoring empty SCOPECHAT_MODELS");
            } else {
                self.provider.candidate_models = models;
            }
        }

        if let Ok(temperature) = std::env::var("SCOPECHAT_TEMPERATURE") {
            if let Ok(value) = temperature.parse() {
                self.provider.temperature = value;
            } else {
                tracing::warn!("Invalid SCOPECHAT_TEMPERATURE: {}", temperature);
            }
        }

        if let Ok(max_tokens) = std::env::var("SCOPECHAT_MAX_TOKENS") {
            if let Ok(value) = max_tokens.parse() {
                self.provider.max_tokens = value;
            } else {
                tracing::warn!("Invalid SCOPECHAT_MAX_TOKENS: {}", max_tokens);
            }
        }

        if let Ok(timeout) = std::env::var("SCOPECHAT_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.provider.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid SCOPECHAT_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(gate) = std::env::var("SCOPECHAT_DOMAIN_GATE") {
            match gate.to_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => self.chat.domain_gate = true,
                "0" | "false" | "off" | "no" => self.chat.domain_gate = false,
                _ => tracing::warn!("Invalid SCOPECHAT_DOMAIN_GATE: {}", gate),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if !cli.models.is_empty() {
            self.provider.candidate_models = cli.models.clone();
        }
        if cli.no_gate {
            self.chat.domain_gate = false;
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_base.trim().is_empty() {
            return Err(
                ScopechatError::Config("provider.api_base cannot be empty".to_string()).into(),
            );
        }

        if self.provider.api_key_env.trim().is_empty() {
            return Err(
                ScopechatError::Config("provider.api_key_env cannot be empty".to_string()).into(),
            );
        }

        if self
            .provider
            .candidate_models
            .iter()
            .all(|m| m.trim().is_empty())
        {
            return Err(ScopechatError::Config(
                "provider.candidate_models must list at least one model".to_string(),
            )
            .into());
        }

        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ScopechatError::Config(
                "provider.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.provider.max_tokens == 0 {
            return Err(ScopechatError::Config(
                "provider.max_tokens must be greater than 0".to_string(),
            )
            .into());
        }

        if self.provider.timeout_seconds == Some(0) {
            return Err(ScopechatError::Config(
                "provider.timeout_seconds must be greater than 0 when set".to_string(),
            )
            .into());
        }

        if self.domain.description.trim().is_empty() || self.domain.rules.trim().is_empty() {
            return Err(ScopechatError::Config(
                "domain.description and domain.rules cannot be empty".to_string(),
            )
            .into());
        }

        if self.chat.domain_gate && self.domain.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ScopechatError::Config(
                "domain.keywords cannot be empty while chat.domain_gate is enabled".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            domain: DomainConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
