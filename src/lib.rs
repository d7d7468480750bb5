//! # chatguard
//!
//! An obfuscation-aware banned-word filtering engine for chat moderation
//! bots. Given message text and a mutable list of banned base terms, it
//! decides whether the message contains disallowed content despite deliberate
//! evasion (Latin lookalikes, leetspeak digits, separators, repeated
//! characters, transliteration, letter spacing) and reports which term
//! matched and by which strategy.
//!
//! Message delivery, admin permissions, punishments and persistence are the
//! hosting bot's concern; this crate only sees text in and verdicts out.
//!
//! ## Detection strategies
//!
//! Strategies run in fixed priority order; the first hit wins:
//!
//! 1. `pattern_match` - compiled per-term patterns tolerating character
//!    substitution, separators and repetition
//! 2. `no_spaces` - literal containment after stripping separators
//! 3. `translit` - containment after folding Latin lookalikes to Cyrillic
//! 4. `spaced` - the letter-spaced term inside the letter-spaced message
//!
//! ## Quick start
//!
//! ```rust
//! use chatguard::prelude::*;
//!
//! # fn main() -> Result<(), chatguard::TermError> {
//! let engine = MatchEngine::with_default_terms(
//!     ObfuscationModel::default(),
//!     FilterSettings::default(),
//! );
//! engine.add_term("спам")?;
//!
//! match engine.check("с-п-а-м в чате") {
//!     MatchVerdict::Flagged { term, strategy } => {
//!         println!("blocked '{}' via {}", term, strategy);
//!     }
//!     MatchVerdict::Clean => println!("message is fine"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod filter;
pub mod types;

// Re-export commonly used items
pub mod prelude {
    pub use crate::config::{FilterSettings, ObfuscationModel};
    pub use crate::filter::{CompiledMatcher, MatchEngine, NormalizedMessage, TermStore};
    pub use crate::types::{BannedTerm, MatchStrategy, MatchVerdict};
}

pub use config::{FilterSettings, ObfuscationModel};
pub use filter::{MatchEngine, TermStore};
pub use types::{BannedTerm, CompileError, LoadError, MatchStrategy, MatchVerdict, TermError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
