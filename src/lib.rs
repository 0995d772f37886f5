//! Battle Regen - health regeneration for battle participants
//!
//! The host engine drives everything through [`mission::MissionBridge`]:
//! agents are registered as they spawn, healed a little every tick according
//! to their role, medicine skill and the selected [`formula`], and the
//! medicine experience earned along the way is handed back when the mission
//! ends.

pub mod classify;
pub mod core;
pub mod experience;
pub mod formula;
pub mod host;
pub mod mission;
pub mod regen;
pub mod sandbox;
