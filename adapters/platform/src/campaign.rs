use anyhow::{Context, Result as AnyResult};
use log::info;
use snowfall_core::{PlatformEffect, SessionOutcome};
use snowfall_system_quests::script;
use snowfall_system_session::{Session, SessionSettings};

use crate::{render, tile_layer, Flow, Platform};

/// Ordered levels played with shared settings.
#[derive(Clone, Debug)]
pub struct Campaign {
    /// Level names resolved through [`Platform::load_level`].
    pub levels: Vec<String>,
    /// Settings used for every session.
    pub settings: SessionSettings,
    /// Stops the campaign after this many ticks across all sessions.
    pub tick_budget: Option<u64>,
}

/// How a campaign ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CampaignOutcome {
    /// Every level was won and the epilogue shown.
    Completed,
    /// The player quit.
    Quit,
    /// The tick budget ran out.
    OutOfTicks,
}

/// Plays the campaign: a win advances to the next level, a loss regenerates
/// the current one.
pub fn run_campaign<P: Platform>(
    platform: &mut P,
    campaign: &Campaign,
) -> AnyResult<CampaignOutcome> {
    if narrate(platform, script::INTRO)? == Flow::Quit {
        return Ok(CampaignOutcome::Quit);
    }

    let mut ticks = 0_u64;
    let mut index = 0;
    while let Some(name) = campaign.levels.get(index) {
        let text = platform
            .load_level(name)
            .with_context(|| format!("failed to load level {name}"))?;
        let mut session = Session::new(&text, campaign.settings.clone())
            .with_context(|| format!("failed to generate level {name}"))?;
        platform.prepare_tiles(&tile_layer(session.world()))?;
        info!("level {name} started");

        loop {
            if campaign.tick_budget.is_some_and(|budget| ticks >= budget) {
                info!("tick budget exhausted after {ticks} ticks");
                return Ok(CampaignOutcome::OutOfTicks);
            }

            let input = platform.poll_input()?;
            if input.quit {
                return Ok(CampaignOutcome::Quit);
            }

            let frame = session
                .tick(input.intent)
                .with_context(|| format!("session on level {name} aborted"))?;
            ticks += 1;

            for effect in &frame.effects {
                if platform.present(effect)? == Flow::Quit {
                    return Ok(CampaignOutcome::Quit);
                }
            }
            platform.draw(&render(session.world(), &frame))?;

            match frame.outcome {
                SessionOutcome::Continue => {}
                SessionOutcome::Won => {
                    info!("level {name} won at {}", frame.clock);
                    index += 1;
                    break;
                }
                SessionOutcome::Lost => {
                    info!("level {name} lost at {}", frame.clock);
                    if narrate(platform, script::LOSS)? == Flow::Quit {
                        return Ok(CampaignOutcome::Quit);
                    }
                    break;
                }
            }
        }
    }

    if narrate(platform, script::EPILOGUE)? == Flow::Quit {
        return Ok(CampaignOutcome::Quit);
    }
    Ok(CampaignOutcome::Completed)
}

fn narrate<P: Platform>(platform: &mut P, text: &[&str]) -> AnyResult<Flow> {
    platform.present(&PlatformEffect::Narrative {
        lines: script::narrative(text),
    })
}
