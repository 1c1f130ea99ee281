//! Decision logic: safe zone model, classifier, cooldown gate, dispatch and
//! evidence capture

pub mod safe_zone;
pub mod classifier;
pub mod cooldown;
pub mod dispatch;
pub mod evidence;
