//! Core resolution machinery
//!
//! Contains the tokenizer, literal parser, argument binder, and the
//! resolver loop that drives them.

pub mod binder;
pub mod literal;
pub mod resolver;
pub mod token;

pub use binder::{Binding, bind};
pub use literal::LiteralParser;
pub use resolver::{Resolution, ResolveOptions, resolve};
