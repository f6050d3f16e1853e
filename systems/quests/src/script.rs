//! The New Year's Eve campaign: narrative text and quest configurations.

use snowfall_core::{EnemyType, EntityKind, Overlay, Tuning};

use crate::{Condition, QuestAction, QuestConfig, ScheduledQuest};

/// Shown once before the first level.
pub const INTRO: &[&str] = &[
    "Backstory...",
    "",
    "Hooray! The New Year holidays have begun!",
    "Like any devoted grandchild, you of course",
    "decided to visit your grandmother!",
];

/// Shown before a lost level is regenerated.
pub const LOSS: &[&str] = &[
    "Unfortunately, you lost.",
    "To start over,",
    "press any key.",
];

/// Shown after the last level is won.
pub const EPILOGUE: &[&str] = &[
    "The night is over and the tree still stands.",
    "Happy New Year!",
];

/// Audio loop played while the tree is under attack.
pub const NIGHT_TRACK: &str = "night";

/// Squared trigger distance for the mandarin hunt.
pub const MANDARINS_TRIGGER: i64 = 5000;
/// Squared trigger distance for the night defense.
pub const NIGHT_TRIGGER: i64 = 10_000;

/// Owned copy of a static narrative.
#[must_use]
pub fn narrative(text: &[&str]) -> Vec<String> {
    text.iter().map(|line| (*line).to_owned()).collect()
}

/// Collect `count` mandarins scattered around the level for grandmother.
#[must_use]
pub fn mandarins(tuning: &Tuning, count: u32) -> QuestConfig {
    QuestConfig {
        name: "mandarins".to_owned(),
        target: EntityKind::Npc,
        trigger_distance_sq: MANDARINS_TRIGGER,
        grace: tuning.seconds(45),
        deadline: Some(tuning.seconds(60)),
        wave_interval: None,
        fail_when: None,
        succeed_when: Condition::CollectedAtLeast(count),
        overlay: None,
        on_create: Vec::new(),
        on_start: vec![
            QuestAction::Narrative(vec![
                "Grandmother asks you to find".to_owned(),
                "her lost mandarins!".to_owned(),
                "Please help her!".to_owned(),
                format!("There are exactly {count} of them."),
            ]),
            QuestAction::ScatterCollectibles(count),
        ],
        on_end: vec![QuestAction::Narrative(narrative(&[
            "Well done!",
            "You found all the mandarins!",
        ]))],
        on_fail: Vec::new(),
    }
}

/// Guard the tree against `enemy_type` through the night.
#[must_use]
pub fn night(tuning: &Tuning, enemy_type: EnemyType) -> QuestConfig {
    QuestConfig {
        name: "night".to_owned(),
        target: EntityKind::Objective,
        trigger_distance_sq: NIGHT_TRIGGER,
        grace: tuning.seconds(45),
        deadline: None,
        wave_interval: Some(tuning.seconds(35)),
        fail_when: Some(Condition::TargetDepleted),
        succeed_when: Condition::SurvivedFor(tuning.seconds(300)),
        overlay: Some(Overlay::Darkness { alpha: 70 }),
        on_create: vec![
            QuestAction::RetargetSpawners(enemy_type),
            QuestAction::RestoreObjective(tuning.objective_health),
        ],
        on_start: vec![QuestAction::PlayAudio(NIGHT_TRACK.to_owned())],
        on_end: vec![
            QuestAction::StopAudio(NIGHT_TRACK.to_owned()),
            QuestAction::ClearEnemies,
            QuestAction::RestoreObjective(tuning.objective_health),
            QuestAction::Narrative(narrative(&["Congratulations, the night is over!"])),
        ],
        on_fail: vec![QuestAction::StopAudio(NIGHT_TRACK.to_owned())],
    }
}

/// The campaign schedule: the mandarin hunt at 5 s, the night at 15 s.
#[must_use]
pub fn default_script(tuning: &Tuning) -> Vec<ScheduledQuest> {
    vec![
        ScheduledQuest {
            at: tuning.seconds(5),
            narrative: narrative(&["Grandmother urgently needs your", "help, hurry to her!"]),
            quest: mandarins(tuning, 15),
        },
        ScheduledQuest {
            at: tuning.seconds(15),
            narrative: narrative(&["Run to the tree, quickly!", "Someone wants to break it!"]),
            quest: night(tuning, EnemyType::new(1)),
        },
    ]
}
