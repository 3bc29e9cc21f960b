use rand::distributions::{Alphanumeric, Distribution, Standard};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::args::PositiveUsize;

pub const DEFAULT_ID_LENGTH: usize = 10;
pub const DEFAULT_MAX_SLOTS: usize = 3;

/// Slot tag attached to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Slot {
    P,
    R,
    Q,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::P, Slot::R, Slot::Q];
}

impl Distribution<Slot> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Slot {
        match rng.gen_range(0..3u8) {
            0 => Slot::P,
            1 => Slot::R,
            _ => Slot::Q,
        }
    }
}

/// JSON body of `POST /rpc/add_widget`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetRequest {
    pub widget_sn: String,
    pub widget_name: String,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadConfig {
    pub id_length: PositiveUsize,
    pub max_slots: usize,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            id_length: PositiveUsize::new(DEFAULT_ID_LENGTH).unwrap_or(PositiveUsize::MIN),
            max_slots: DEFAULT_MAX_SLOTS,
        }
    }
}

/// Per-worker request generator. Owning the RNG keeps workers free of shared
/// state; a seeded generator yields a reproducible request stream.
#[derive(Debug, Clone)]
pub struct PayloadGenerator {
    config: PayloadConfig,
    rng: StdRng,
}

impl PayloadGenerator {
    #[must_use]
    pub fn new(config: PayloadConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    #[must_use]
    pub fn seeded(config: PayloadConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator for worker `worker_id`: seeded from `seed + worker_id` when a
    /// seed is configured, otherwise from entropy.
    #[must_use]
    pub fn for_worker(config: PayloadConfig, seed: Option<u64>, worker_id: usize) -> Self {
        match seed {
            Some(seed) => {
                let offset = u64::try_from(worker_id).unwrap_or(u64::MAX);
                Self::seeded(config, seed.wrapping_add(offset))
            }
            None => Self::new(config),
        }
    }

    pub fn generate(&mut self) -> WidgetRequest {
        let id_length = self.config.id_length.get();
        WidgetRequest {
            widget_sn: random_alphanumeric(&mut self.rng, id_length),
            widget_name: random_alphanumeric(&mut self.rng, id_length),
            slots: random_slots(&mut self.rng, self.config.max_slots),
        }
    }
}

fn random_alphanumeric(rng: &mut StdRng, length: usize) -> String {
    rng.sample_iter(Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

fn random_slots(rng: &mut StdRng, max_slots: usize) -> Vec<Slot> {
    let count = rng.gen_range(0..=max_slots);
    (0..count).map(|_| rng.r#gen::<Slot>()).collect()
}
