//! Commonly used imports
//!
//! Use `use stepwise::prelude::*;` for quick access to the most common types and functions.

// Core types
pub use crate::{Error, Input, Signal, Step};

// Effects
pub use crate::effect::{Async, Deferred, Effect, Strict};

// Producers
pub use crate::enumerator::{
    chain, empty, enum_iter, enum_one, enum_vec, ensure_eval, lift_m, lift_m_eval, Enumerator,
};

// Transducers and consumers, by module
pub use crate::enumeratee::{self, Enumeratee};
pub use crate::iteratee;

// Execution
pub use crate::{handle, run};
