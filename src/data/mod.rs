pub mod monsters;

pub use monsters::ActorTemplate;
