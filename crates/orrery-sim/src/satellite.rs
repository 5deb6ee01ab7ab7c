//! Satellites: bodies whose orbit is centred on a moving parent.
//!
//! The parent is looked up by [`BodyId`](crate::BodyId) and only its current
//! position is read; the satellite never owns or mutates its parent. Local
//! orbits lie in the parent's horizontal plane and are not tilted.

use glam::DVec3;

use crate::BodyState;

/// Advance a satellite by `dt` simulated seconds around `parent_position`.
///
/// The satellite's own orbit phase and spin advance exactly as for a primary
/// body; the returned position is `parent_position + local offset`. Tidal
/// locking is a catalog choice (spin rate equal to orbital rate), not
/// something enforced here.
pub fn advance(state: &mut BodyState, parent_position: DVec3, dt: f64) -> DVec3 {
    let offset = state.integrate(dt);
    state.position = parent_position + offset;
    state.position
}
