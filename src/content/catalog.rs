use std::collections::{BTreeMap, HashSet};

use super::types::{Chapter, Prompt, Role};
use crate::error::ContentError;

/// Largest boss health or attack damage the engine's signed pools can hold.
const MAX_STAT: u32 = i32::MAX as u32;

/// Validated content tree: role -> chapters numbered 1..=n.
#[derive(Debug)]
pub struct Catalog {
    roles: BTreeMap<Role, Vec<Chapter>>,
}

impl Catalog {
    pub fn new(mut roles: BTreeMap<Role, Vec<Chapter>>) -> Result<Self, ContentError> {
        let mut scenario_ids = HashSet::new();

        for (role, chapters) in roles.iter_mut() {
            if chapters.is_empty() {
                return Err(ContentError::EmptyRole(*role));
            }
            chapters.sort_by_key(|c| c.number);

            for (i, chapter) in chapters.iter().enumerate() {
                let expected = i as u32 + 1;
                if chapter.number != expected {
                    return Err(ContentError::ChapterGap {
                        role: *role,
                        expected,
                        found: chapter.number,
                    });
                }

                for scenario in &chapter.scenarios {
                    if !scenario_ids.insert(scenario.id.clone()) {
                        return Err(ContentError::DuplicateScenario(scenario.id.clone()));
                    }
                    check_prompt(&scenario.id, scenario)?;
                }

                let boss = &chapter.boss;
                if boss.health == 0 {
                    return Err(ContentError::BossWithoutHealth(boss.id.clone()));
                }
                if boss.health > MAX_STAT {
                    return Err(ContentError::OutOfRange {
                        label: boss.id.clone(),
                        value: boss.health,
                    });
                }
                if boss.attacks.is_empty() {
                    return Err(ContentError::BossWithoutAttacks(boss.id.clone()));
                }
                for attack in &boss.attacks {
                    let label = format!("{}/{}", boss.id, attack.name);
                    if attack.damage == 0 {
                        return Err(ContentError::HarmlessAttack(label));
                    }
                    if attack.damage > MAX_STAT {
                        return Err(ContentError::OutOfRange {
                            label,
                            value: attack.damage,
                        });
                    }
                    check_prompt(&label, &attack.scenario)?;
                }
            }
        }

        for role in Role::ALL {
            if !roles.contains_key(&role) {
                return Err(ContentError::EmptyRole(role));
            }
        }

        Ok(Catalog { roles })
    }

    pub fn chapters(&self, role: Role) -> &[Chapter] {
        self.roles.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Chapters are 1-based; anything outside the role's range is `None`.
    pub fn chapter(&self, role: Role, number: u32) -> Option<&Chapter> {
        let index = number.checked_sub(1)? as usize;
        self.chapters(role).get(index)
    }

    pub fn chapter_count(&self, role: Role) -> usize {
        self.chapters(role).len()
    }

    pub fn scenario_count(&self) -> usize {
        self.roles
            .values()
            .flatten()
            .map(|c| c.scenarios.len())
            .sum()
    }
}

fn check_prompt(label: &str, prompt: &impl Prompt) -> Result<(), ContentError> {
    let choices = prompt.choices();
    if choices.len() < 2 {
        return Err(ContentError::TooFewChoices(label.to_string()));
    }

    let mut seen = HashSet::new();
    for choice in choices {
        if !seen.insert(choice.id.as_str()) {
            return Err(ContentError::DuplicateChoice {
                prompt: label.to_string(),
                choice: choice.id.clone(),
            });
        }
    }

    // ids are unique by now, so "contains" means "matches exactly one"
    if !seen.contains(prompt.correct()) {
        return Err(ContentError::UnknownCorrect {
            prompt: label.to_string(),
            correct: prompt.correct().to_string(),
        });
    }
    Ok(())
}
