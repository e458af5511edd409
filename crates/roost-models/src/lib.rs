// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model identifier registry.
//!
//! Keeps provider identification in one place so the router and the store
//! agree on canonical strings and corruption detection stays local. A model
//! id is a prefixed string `<prefix>:<native_name>` with prefix `gemini` or
//! `openrouter`. Invalid ids are rejected at the boundary and never stored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use roost_core::GatewayError;

/// Which provider protocol a model speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Provider-managed chat history, native session object.
    Gemini,
    /// Stateless HTTP completion, caller-managed history list.
    OpenRouter,
}

impl ProviderKind {
    fn prefix(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenRouter => "openrouter",
        }
    }
}

/// A model id string that failed to parse.
#[derive(Debug, Error)]
#[error("invalid model id: {0:?}")]
pub struct InvalidModel(pub String);

impl From<InvalidModel> for GatewayError {
    fn from(e: InvalidModel) -> Self {
        GatewayError::InternalConfig(e.to_string())
    }
}

/// A validated, prefixed model identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId {
    kind: ProviderKind,
    native: String,
}

impl ModelId {
    /// Parses `<prefix>:<native_name>`. Both parts must be non-empty.
    pub fn parse(id: &str) -> Result<Self, InvalidModel> {
        let (prefix, native) = id.split_once(':').ok_or_else(|| InvalidModel(id.into()))?;
        if native.trim().is_empty() {
            return Err(InvalidModel(id.into()));
        }
        let kind = match prefix {
            "gemini" => ProviderKind::Gemini,
            "openrouter" => ProviderKind::OpenRouter,
            _ => return Err(InvalidModel(id.into())),
        };
        Ok(Self {
            kind,
            native: native.to_string(),
        })
    }

    /// Builds an id from parts (the inverse of [`parse`](Self::parse)).
    pub fn format(kind: ProviderKind, native: &str) -> Self {
        Self {
            kind,
            native: native.to_string(),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// The provider's own name for this model.
    pub fn native(&self) -> &str {
        &self.native
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind.prefix(), self.native)
    }
}

/// Gemini models surfaced by `listmodels`. Any gemini native name the
/// provider accepts is usable; these are the ones advertised to users.
const GEMINI_LISTED: &[&str] = &[
    "gemini-1.5-flash-latest",
    "gemini-1.5-pro-latest",
    "gemini-2.0-flash",
];

/// Deployment-level model policy: the process default and the single
/// allowed openrouter model.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    default_model: ModelId,
    openrouter_native: String,
}

impl ModelCatalog {
    /// Builds a catalog from the configured default id and the single
    /// openrouter native name. The default is canonicalized like any
    /// other id.
    pub fn new(default_model: &str, openrouter_native: &str) -> Result<Self, GatewayError> {
        if openrouter_native.trim().is_empty() {
            return Err(GatewayError::InternalConfig(
                "openrouter model name must not be empty".into(),
            ));
        }
        let parsed = ModelId::parse(default_model)?;
        let mut catalog = Self {
            default_model: parsed.clone(),
            openrouter_native: openrouter_native.to_string(),
        };
        catalog.default_model = catalog.canonicalize(parsed);
        Ok(catalog)
    }

    /// The deployment default model.
    pub fn default_model(&self) -> ModelId {
        self.default_model.clone()
    }

    /// The single native name the openrouter prefix is restricted to.
    pub fn openrouter_native(&self) -> &str {
        &self.openrouter_native
    }

    /// The canonical openrouter id.
    pub fn openrouter_model(&self) -> ModelId {
        ModelId::format(ProviderKind::OpenRouter, &self.openrouter_native)
    }

    /// Whether an id may be bound to a conversation. For openrouter this is
    /// exactly the configured single model; for gemini, any parsed id (the
    /// provider itself rejects names it does not know).
    pub fn is_supported(&self, id: &ModelId) -> bool {
        match id.kind {
            ProviderKind::Gemini => true,
            ProviderKind::OpenRouter => id.native == self.openrouter_native,
        }
    }

    /// Folds unsupported openrouter ids onto the single configured value.
    pub fn canonicalize(&self, id: ModelId) -> ModelId {
        match id.kind {
            ProviderKind::OpenRouter if id.native != self.openrouter_native => {
                self.openrouter_model()
            }
            _ => id,
        }
    }

    /// Parses a stored string, falling back to the default when the row is
    /// corrupt and canonicalizing drifted openrouter values. Returns the id
    /// and whether a correction was applied.
    pub fn coerce(&self, raw: &str) -> (ModelId, bool) {
        match ModelId::parse(raw) {
            Ok(id) => {
                let canonical = self.canonicalize(id.clone());
                let corrected = canonical != id;
                (canonical, corrected)
            }
            Err(_) => (self.default_model(), true),
        }
    }

    /// Ids advertised by the `listmodels` command.
    pub fn listed_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = GEMINI_LISTED
            .iter()
            .map(|n| ModelId::format(ProviderKind::Gemini, n).to_string())
            .collect();
        ids.push(self.openrouter_model().to_string());
        ids
    }
}
