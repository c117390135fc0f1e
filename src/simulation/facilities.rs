//! Synthetic facility lists around a point.

use rand::RngExt;
use rand_chacha::ChaCha8Rng;

use crate::facility::{FacilityKind, FacilityRecord};

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn identifier(rng: &mut ChaCha8Rng, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[(rng.random::<f64>() * ALPHABET.len() as f64) as usize % ALPHABET.len()] as char)
        .collect()
}

/// `count` records of `kind` scattered within about a degree of the origin
///
/// Every `duplicate_every`-th record repeats the identifier of the record
/// before it, the way overlapping provider deliveries do.
pub fn synthetic_facilities(
    rng: &mut ChaCha8Rng,
    kind: FacilityKind,
    count: usize,
    duplicate_every: usize,
    origin: (f64, f64),
) -> Vec<FacilityRecord> {
    let mut records: Vec<FacilityRecord> = Vec::with_capacity(count);
    for i in 0..count {
        let latitude = origin.0 + rng.random::<f64>() * 2.0 - 1.0;
        let longitude = origin.1 + rng.random::<f64>() * 2.0 - 1.0;
        let repeat = duplicate_every > 0 && i > 0 && i % duplicate_every == 0;
        let icao = match records.last() {
            Some(previous) if repeat => previous.icao().to_string(),
            _ => match kind {
                FacilityKind::Airport => format!("L{}", identifier(rng, 3)),
                FacilityKind::Vor => identifier(rng, 3),
                FacilityKind::Ndb => identifier(rng, 2),
            },
        };

        let record = match kind {
            FacilityKind::Airport => {
                FacilityRecord::airport(icao, latitude, longitude, rng.random::<f64>() * 1500.0)
            }
            FacilityKind::Vor => {
                let channel = (rng.random::<f64>() * 200.0) as u32;
                let flags = if rng.random::<bool>() { 0x0D } else { 0x05 };
                FacilityRecord::vor(icao, latitude, longitude, 108_000_000 + channel * 50_000, flags)
            }
            FacilityKind::Ndb => {
                let frequency = 190_000.0 + (rng.random::<f64>() * 1600.0).round() * 500.0;
                FacilityRecord::ndb(icao, latitude, longitude, frequency, 0.0)
            }
        };
        records.push(record);
    }
    records
}
