//! # Pressroom Prompt
//!
//! Builds the instruction documents handed to the external text generator.
//! Everything here is synchronous, pure and total: no I/O, no errors, every
//! missing or malformed input degrades to a named fallback.
//!
//! - [`tone`] classifies a brand-voice document
//! - [`rules`] holds the immutable rule library and the content audit
//! - [`composer`] layers brand, rules and project context
//! - [`extract`] pulls structured signals out of the brand document
//! - [`resolver`] turns a fact record into a concrete generation brief

pub mod composer;
pub mod extract;
pub mod resolver;
pub mod rules;
pub mod tone;

pub use composer::{compose, ComposedPrompt, CompositionInput, Layer, ProjectContext};
pub use extract::{first_success, KeyMessage, LocationSource, ResolvedLocation};
pub use resolver::{FactResolver, GenerationBrief, ResolvedSpeaker, ResolverInput, SpeakerSource};
pub use rules::{audit, render_rules, render_rules_for, RuleViolation};
pub use tone::{classify, Tone, ToneReport};
