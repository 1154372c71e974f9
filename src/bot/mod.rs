//! Computer players: a setter that picks words from its rack and a guesser
//! that works from the visible mask.

pub mod guesser;
pub mod setter;
