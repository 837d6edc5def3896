//! Random person identities for badge-only registration.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::application::ports::{IdentityGenerator, SyntheticIdentity};
use crate::domain::{DisplayName, Email};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Amara", "Bruno", "Chen", "Dalia", "Elena", "Farid", "Grace", "Hiro", "Ines",
    "Jonas", "Kaia", "Liam", "Maya", "Nikolai", "Olga", "Pedro", "Quinn", "Rosa", "Sami", "Tariq",
    "Uma", "Victor", "Wen", "Yara", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Abbott", "Baptiste", "Costa", "Dubois", "Eriksen", "Fischer", "Garcia", "Hopper", "Ibrahim",
    "Jensen", "Kowalski", "Lovelace", "Moreau", "Nakamura", "Okafor", "Petrov", "Rossi", "Silva",
    "Tanaka", "Usman", "Varga", "Weber", "Yilmaz", "Zhang",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

/// Draws names from fixed pools using the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdentityGenerator;

impl RandomIdentityGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Same as [`IdentityGenerator::generate`] with a caller-supplied RNG.
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> Result<SyntheticIdentity, String> {
        let first = pick(FIRST_NAMES, rng);
        let last = pick(LAST_NAMES, rng);
        let domain = pick(EMAIL_DOMAINS, rng);

        let local = match rng.gen_range(0..3) {
            0 => format!("{first}.{last}"),
            1 => format!("{first}_{last}{}", rng.gen_range(1..100)),
            _ => format!("{first}{}", rng.gen_range(10..1000)),
        };

        Ok(SyntheticIdentity {
            name: DisplayName::new(format!("{first} {last}"))?,
            email: Email::new(format!("{local}@{domain}"))?,
            entered_department: rng.gen_bool(0.5),
        })
    }
}

fn pick<R: Rng>(pool: &[&'static str], rng: &mut R) -> &'static str {
    pool.choose(rng).copied().unwrap_or("Alex")
}

impl IdentityGenerator for RandomIdentityGenerator {
    fn generate(&self) -> Result<SyntheticIdentity, String> {
        self.generate_with(&mut rand::thread_rng())
    }
}
