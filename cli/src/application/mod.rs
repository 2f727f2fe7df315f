//! Use-cases of the tool, written against the ports in [`ports`].

pub mod ports;
pub mod services;

pub use ports::{
    CommandRunner, ContainerOrchestrator, ProgressReporter, RuleRegistry, TweetCountSource,
};
