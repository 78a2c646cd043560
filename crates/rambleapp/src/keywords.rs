//! # Keyword Resolution
//!
//! Users type moods ("a rainy afternoon in a tiny bookshop"), but image search
//! works best on short keyword lists. [`KeywordResolver`] bridges the two by
//! asking an optional [`RewriteProvider`] (a chat model) for 5-7 keywords.
//!
//! Rewriting is strictly best effort. With no provider configured, or when the
//! provider fails or answers with nothing usable, the raw input is searched
//! as typed. [`KeywordResolver::resolve`] cannot fail.
//!
//! ## Cleaning
//!
//! Models like to answer with numbered lists:
//!
//! ```text
//! 1. rainy window
//! 2. bookshop
//! 3. warm lamp light
//! ```
//!
//! [`clean_keywords`] strips the ordinal markers at the start of each line and
//! joins the remaining non-blank lines with `", "`, giving
//! `rainy window, bookshop, warm lamp light`.

use crate::error::ProviderError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static ORDINAL_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+[.)]\s*").expect("ordinal marker pattern is valid"));

/// An external text-rewrite service, e.g. a chat-completions endpoint.
#[async_trait]
pub trait RewriteProvider: Send + Sync {
    async fn rewrite(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Outcome of resolving one piece of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    /// What the user typed.
    pub input: String,
    /// Cleaned keywords, when the rewrite succeeded.
    pub keywords: Option<String>,
    /// What gets sent to the image search provider.
    pub query: String,
}

impl ResolvedQuery {
    fn raw(input: &str) -> Self {
        Self {
            input: input.to_string(),
            keywords: None,
            query: input.to_string(),
        }
    }

    pub fn was_rewritten(&self) -> bool {
        self.keywords.is_some()
    }
}

pub fn keyword_prompt(input: &str) -> String {
    format!(
        "Extract 5-7 clean image search keywords from this sentence, as a comma-separated list: {}",
        input
    )
}

pub fn clean_keywords(text: &str) -> String {
    text.lines()
        .map(|line| ORDINAL_MARKER.replace(line, ""))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Default)]
pub struct KeywordResolver {
    provider: Option<Box<dyn RewriteProvider>>,
}

impl KeywordResolver {
    /// A resolver that always searches the raw input.
    pub fn passthrough() -> Self {
        Self { provider: None }
    }

    pub fn with_provider(provider: impl RewriteProvider + 'static) -> Self {
        Self {
            provider: Some(Box::new(provider)),
        }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn resolve(&self, input: &str) -> ResolvedQuery {
        let Some(provider) = &self.provider else {
            debug!("no rewrite provider configured, searching raw input");
            return ResolvedQuery::raw(input);
        };

        match provider.rewrite(&keyword_prompt(input)).await {
            Ok(text) => {
                let cleaned = clean_keywords(&text);
                if cleaned.is_empty() {
                    warn!("keyword rewrite returned no keywords, searching raw input");
                    return ResolvedQuery::raw(input);
                }
                debug!(keywords = %cleaned, "rewrote search input");
                ResolvedQuery {
                    input: input.to_string(),
                    keywords: Some(cleaned.clone()),
                    query: cleaned,
                }
            }
            Err(e) => {
                warn!(error = %e, "keyword rewrite failed, searching raw input");
                ResolvedQuery::raw(input)
            }
        }
    }
}
