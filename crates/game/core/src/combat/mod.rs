//! Combat math.
//!
//! Pure functions shared by the battle engine: critical/special rolls, damage
//! and heal scaling, and HP clamping. All of them are deterministic and
//! side-effect free.
//!
//! # Core Functions
//!
//! - `roll_chance`: per-mille chance check against the RNG oracle
//! - `scale`: multiplier application on a base value
//! - `apply_damage`: HP reduction (clamped to 0)
//! - `apply_heal`: HP restoration (clamped to the maximum)

pub mod damage;
pub mod hit;

pub use damage::{apply_damage, apply_heal, backfire_damage, scale};
pub use hit::{Roll, roll_chance};
