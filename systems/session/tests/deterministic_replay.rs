use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use snowfall_core::{Group, InputIntent, PixelPoint, SessionOutcome};
use snowfall_system_session::{Session, SessionSettings};
use snowfall_world::query;

const LEVEL: &str = "\
KKKKKKKKKKKK
K@A#AAAAAA+K
KAAAAAAAAAAK
KA=AAAAAAAAK
KAAAAAAAAA*K
KKKKKKKKKKKK
";

#[test]
fn deterministic_replay_produces_identical_fingerprints() {
    let first = replay(scripted_inputs());
    let second = replay(scripted_inputs());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first.collectibles > 0, "mandarins were never scattered");
}

fn scripted_inputs() -> Vec<InputIntent> {
    let held = |up, down, left, right| InputIntent {
        up,
        down,
        left,
        right,
        ..InputIntent::default()
    };
    let mut inputs = Vec::new();
    inputs.extend(std::iter::repeat(InputIntent::default()).take(5 * 45));
    inputs.extend(std::iter::repeat(held(false, false, false, true)).take(8));
    inputs.extend(std::iter::repeat(held(false, true, false, false)).take(30));
    inputs.extend(std::iter::repeat(held(false, false, true, false)).take(30));
    inputs.push(InputIntent {
        attack: true,
        ..InputIntent::default()
    });
    inputs.extend(std::iter::repeat(InputIntent::default()).take(15 * 45));
    inputs.extend(std::iter::repeat(held(true, false, false, true)).take(60));
    inputs
}

fn replay(inputs: Vec<InputIntent>) -> ReplayOutcome {
    let mut session = Session::new(LEVEL, SessionSettings::default()).expect("valid level");
    let mut frames = Vec::new();
    let mut positions = Vec::new();
    let mut collectibles = 0;

    for input in inputs {
        let frame = session.tick(input).expect("tick");
        frames.push(format!("{frame:?}"));

        let world = session.world();
        positions.push(
            query::entities(world)
                .iter()
                .map(|(id, entity)| (id.get(), entity.rect().origin()))
                .collect::<Vec<(u32, PixelPoint)>>(),
        );
        collectibles = collectibles.max(query::members(world, Group::Collectibles).len());

        if frame.outcome != SessionOutcome::Continue {
            break;
        }
    }

    ReplayOutcome {
        frames,
        positions,
        collectibles,
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    frames: Vec<String>,
    positions: Vec<Vec<(u32, PixelPoint)>>,
    collectibles: usize,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
