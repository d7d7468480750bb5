// src/filter/mod.rs - Detection engine: store, compiler, normalizer, strategies

pub mod compiler;
pub mod engine;
pub mod normalize;
pub mod store;

pub use compiler::{compile, compile_all, CompiledMatcher};
pub use engine::{MatchEngine, MatcherGeneration};
pub use normalize::{is_separator, spaced, NormalizedMessage};
pub use store::{TermStore, DEFAULT_TERMS};
