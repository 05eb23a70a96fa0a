//! cfg-sampler draws random derivation trees from context-free grammars.
//!
//! A grammar is a list of rules plus an axiom. Symbols that appear as a
//! rule's left-hand side are non-terminals, every other symbol is a
//! terminal. Generation starts from the axiom and rewrites the leftmost
//! unexpanded non-terminal with a randomly chosen rule until only
//! terminals are left; the leaves of the resulting tree read as text.
//!
//! # Example
//!
//! ```rust
//! use cfg_sampler::{join_tokens, GrammarBuilder, RandomChooser};
//!
//! let grammar = GrammarBuilder::new("greeting")
//!     .rule("greeting", &["Hello", "subject", "!"])
//!     .rule("subject", &["world"])
//!     .rule("subject", &["Rust", "programmers"])
//!     .build()
//!     .unwrap();
//!
//! let tree = grammar.generate(&mut RandomChooser::seeded(1)).unwrap();
//! let text = join_tokens(&tree.get_yield());
//! assert!(text == "Hello world !" || text == "Hello Rust programmers !");
//! ```

pub mod detokenize;
pub mod generator;
pub mod grammar;
pub mod samples;
pub mod tree;
pub mod utils;

pub use detokenize::join_tokens;
pub use generator::{ExpansionObserver, ExpansionStep, Generator, GeneratorConfig, LogObserver};
pub use grammar::{Grammar, GrammarBuilder, Rule};
pub use samples::Sample;
pub use tree::Tree;
pub use utils::{GrammarError, RandomChooser, Result, RuleChooser, SequenceChooser};
