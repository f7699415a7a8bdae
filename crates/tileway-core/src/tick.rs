use crate::{rng, EntityId, SplitMix64};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt_seconds: f32,
    pub seed: u64,
}

impl TickContext {
    pub fn rng_for_entity(&self, entity: EntityId, stream: u64) -> SplitMix64 {
        let seed = rng::derive_seed(self.seed, entity.stable_id(), stream);
        SplitMix64::new(seed)
    }
}
