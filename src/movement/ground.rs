//! Movement domain: edge-tracking contact sensors.

/// Transition reported by a sensor update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Landed,
    Left,
    Unchanged,
}

/// Boolean contact state fed once per frame by a physics query. Used for
/// the body's feet and for the umbrella tip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroundSensor {
    touching: bool,
}

impl GroundSensor {
    pub fn update(&mut self, touching: bool) -> Contact {
        let was = std::mem::replace(&mut self.touching, touching);
        match (was, touching) {
            (false, true) => Contact::Landed,
            (true, false) => Contact::Left,
            _ => Contact::Unchanged,
        }
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }
}
