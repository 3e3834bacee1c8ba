//! Seeded random streams, one per concern, so that rolls never share draws.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

const SPECIES_DOMAIN: &[u8] = b"species";
const REWARD_DOMAIN: &[u8] = b"reward";
const SHUFFLE_DOMAIN: &[u8] = b"shuffle";
const IDS_DOMAIN: &[u8] = b"ids";

/// Deterministic bundle of RNG streams segregated by domain.
///
/// The species and reward streams use `ChaCha20Rng` so that recorded seeds
/// reproduce the same harvests on every platform.
#[derive(Debug, Clone)]
pub struct RngBundle {
    species: CountingRng<ChaCha20Rng>,
    reward: CountingRng<ChaCha20Rng>,
    shuffle: CountingRng<SmallRng>,
    ids: CountingRng<SmallRng>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            species: CountingRng::seeded(derive_stream_seed(seed, SPECIES_DOMAIN)),
            reward: CountingRng::seeded(derive_stream_seed(seed, REWARD_DOMAIN)),
            shuffle: CountingRng::seeded(derive_stream_seed(seed, SHUFFLE_DOMAIN)),
            ids: CountingRng::seeded(derive_stream_seed(seed, IDS_DOMAIN)),
        }
    }

    /// Stream used to pick the harvested species.
    pub fn species(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.species
    }

    /// Stream used to roll the seed reward tier.
    pub fn reward(&mut self) -> &mut CountingRng<ChaCha20Rng> {
        &mut self.reward
    }

    /// Stream used to shuffle reveal-animation candidates.
    pub fn shuffle(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.shuffle
    }

    /// Stream used for the random suffix of generated ids.
    pub fn ids(&mut self) -> &mut CountingRng<SmallRng> {
        &mut self.ids
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl<R: SeedableRng> CountingRng<R> {
    fn seeded(seed: u64) -> Self {
        Self {
            rng: R::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// HMAC-SHA256 keyed by the user seed; the first eight digest bytes form the
/// stream seed.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
