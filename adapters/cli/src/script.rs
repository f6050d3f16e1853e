use std::{collections::VecDeque, error::Error, fmt};

use snowfall_platform::PlatformInput;

const REPEAT_DELIMITER: char = '*';

/// Scripted input replayed by the headless platform, one entry per tick.
///
/// The script is a whitespace separated list of steps. Each step is a set of
/// keys held together, optionally followed by `*COUNT` to hold them for
/// several ticks: `U`/`D`/`L`/`R` move, `A` attacks, `W` spawns a wave, `Q`
/// quits and `.` idles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct InputScript {
    steps: VecDeque<PlatformInput>,
}

impl InputScript {
    /// Parses the textual representation of a script.
    pub(crate) fn parse(value: &str) -> Result<Self, ScriptError> {
        let mut steps = VecDeque::new();
        for token in value.split_whitespace() {
            let (keys, count) = match token.split_once(REPEAT_DELIMITER) {
                Some((keys, count)) => {
                    let count = count
                        .parse::<u32>()
                        .map_err(|_| ScriptError::InvalidCount(token.to_owned()))?;
                    (keys, count)
                }
                None => (token, 1),
            };
            if keys.is_empty() {
                return Err(ScriptError::EmptyStep(token.to_owned()));
            }

            let mut input = PlatformInput::default();
            for key in keys.chars() {
                apply_key(&mut input, key)?;
            }
            steps.extend(std::iter::repeat(input).take(count as usize));
        }
        Ok(Self { steps })
    }

    /// Input for the next tick; idle once the script is exhausted.
    pub(crate) fn next_input(&mut self) -> PlatformInput {
        self.steps.pop_front().unwrap_or_default()
    }

    /// Number of scripted ticks not yet replayed.
    pub(crate) fn remaining(&self) -> usize {
        self.steps.len()
    }
}

fn apply_key(input: &mut PlatformInput, key: char) -> Result<(), ScriptError> {
    let intent = &mut input.intent;
    match key.to_ascii_uppercase() {
        'U' => intent.up = true,
        'D' => intent.down = true,
        'L' => intent.left = true,
        'R' => intent.right = true,
        'A' => intent.attack = true,
        'W' => intent.spawn_wave = true,
        '.' => {}
        'Q' => {
            input.quit = true;
        }
        _ => return Err(ScriptError::UnknownKey(key)),
    }
    Ok(())
}

/// Errors produced while parsing an input script.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// A step used a key outside the supported set.
    UnknownKey(char),
    /// A repeat count could not be parsed.
    InvalidCount(String),
    /// A step named no keys before its repeat count.
    EmptyStep(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey(key) => write!(f, "unknown key '{key}' in input script"),
            Self::InvalidCount(step) => write!(f, "invalid repeat count in step '{step}'"),
            Self::EmptyStep(step) => write!(f, "step '{step}' holds no keys"),
        }
    }
}

impl Error for ScriptError {}
